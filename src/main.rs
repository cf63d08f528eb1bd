#![no_std]
#![no_main]

use core::sync::atomic::Ordering;

use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, Config as I2cConfig};
use embassy_time::{Duration, Timer};
use {defmt_rtt as _, panic_probe as _};

mod config;
mod data;
mod drivers;
mod kinematics;
mod tasks;
mod utils;

use crate::config::hardware::frequencies::I2C_FREQUENCY;
use crate::config::hardware::system::MAIN_LOOP_PERIOD_MS;
use crate::data::{CHANNELS, SYSTEM_STATE};
use crate::tasks::*;
use utils::system_info;

/// Точка входа в программу
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    // Инициализация HAL Raspberry Pi Pico
    let p = embassy_rp::init(Default::default());

    defmt::info!("=== DroidCopter контроллер роторов v0.1.0 ===");
    defmt::info!("Инициализация системы...");
    // Вывод информации о частотах
    system_info::print_clock_info();

    // Проверка корректности частот
    if let Err(e) = system_info::validate_clocks() {
        defmt::error!("Ошибка конфигурации частот: {}", e);
        panic!("Invalid clock configuration");
    }

    // Настройка светодиода для индикации состояния
    let mut led = Output::new(p.PIN_25, Level::Low);

    // Мигаем светодиодом при старте
    for _ in 0..3 {
        led.set_high();
        Timer::after(Duration::from_millis(100)).await;
        led.set_low();
        Timer::after(Duration::from_millis(100)).await;
    }

    // Кнопка включения/выключения мониторинга (замыкается на землю)
    let monitor_button = Input::new(p.PIN_15, Pull::Up);

    // Инициализация I2C для датчиков (IMU и магнитометр)
    let i2c = {
        let sda = p.PIN_4; // GPIO4 - SDA
        let scl = p.PIN_5; // GPIO5 - SCL

        let mut config = I2cConfig::default();
        config.frequency = I2C_FREQUENCY; // 400 kHz для быстрого обмена

        i2c::I2c::new_blocking(p.I2C0, scl, sda, config)
    };

    // Мониторинг датчиков включен с самого старта
    SYSTEM_STATE.monitoring.store(true, Ordering::Relaxed);

    // Запуск асинхронных задач
    defmt::info!("Запуск задач...");

    // Задача опроса датчиков
    spawner.spawn(sensor_task::task(i2c)).unwrap();

    // Задача расчета скоростей роторов
    spawner.spawn(rotor_task::task()).unwrap();

    defmt::info!("Система инициализирована. Ожидание готовности датчиков...");

    // Ждем первые измерения со всех датчиков
    loop {
        if SYSTEM_STATE.is_ready().await {
            defmt::info!("Все датчики отдали первые измерения!");
            break;
        }
        Timer::after(Duration::from_millis(500)).await;
    }

    let rotor_receiver = CHANNELS.rotor_channel.receiver();
    let mut last_button_level = monitor_button.get_level();
    let mut status_counter = 0u32;

    // Основной цикл: кнопка мониторинга и лог состояния роторов
    loop {
        // Переключение мониторинга по нажатию кнопки (фронт high -> low,
        // период цикла работает как антидребезг)
        let level = monitor_button.get_level();
        if level == Level::Low && last_button_level == Level::High {
            let monitoring = !SYSTEM_STATE.monitoring.load(Ordering::Relaxed);
            SYSTEM_STATE.monitoring.store(monitoring, Ordering::Relaxed);

            if monitoring {
                defmt::info!("Мониторинг датчиков включен");
            } else {
                defmt::info!("Мониторинг датчиков выключен");
            }
        }
        last_button_level = level;

        // Светодиод показывает состояние мониторинга
        if SYSTEM_STATE.monitoring.load(Ordering::Relaxed) {
            led.set_high();
        } else {
            led.set_low();
        }

        // Забираем из канала самый свежий расчет
        let mut latest = None;
        while let Ok(rotor_speeds) = rotor_receiver.try_receive() {
            latest = Some(rotor_speeds);
        }

        // Раз в секунду выводим скорость первого ротора
        status_counter += 1;
        if status_counter >= (1000 / MAIN_LOOP_PERIOD_MS) as u32 {
            status_counter = 0;
            if let Some(rotor_speeds) = latest {
                defmt::info!("Ротор 1: {}", rotor_speeds.x);
            }
        }

        Timer::after(Duration::from_millis(MAIN_LOOP_PERIOD_MS)).await;
    }
}
