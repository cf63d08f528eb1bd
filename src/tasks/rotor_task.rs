// src/tasks/rotor_task.rs
use core::sync::atomic::Ordering;
use embassy_time::Duration;

use crate::config::hardware::system::ROTOR_UPDATE_RATE_HZ;
use crate::data::{CHANNELS, SYSTEM_STATE};
use crate::kinematics::RotorController;

#[embassy_executor::task]
pub async fn task() {
    defmt::info!("Запуск задачи расчета скоростей роторов");

    let mut rotor_controller = RotorController::new();

    // Отправитель результатов расчета
    let rotor_sender = CHANNELS.rotor_channel.sender();

    let mut ticker = embassy_time::Ticker::every(Duration::from_hz(ROTOR_UPDATE_RATE_HZ as u64));

    loop {
        ticker.next().await;

        // Пока мониторинг выключен, считать нечего
        if !SYSTEM_STATE.monitoring.load(Ordering::Relaxed) {
            continue;
        }

        // Снимок датчиков и расчет; None - датчики еще не готовы
        let Some(rotor_speeds) = rotor_controller.calculate_rotor_speeds().await else {
            continue;
        };

        // Обновляем глобальное состояние
        *SYSTEM_STATE.last_rotor_speeds.lock().await = Some(rotor_speeds);

        // Отправляем результат в главный цикл
        if let Err(_) = rotor_sender.try_send(rotor_speeds) {
            // Буфер переполнен - главный цикл читает медленнее, чем мы считаем,
            // старые значения можно терять
        }

        #[cfg(feature = "debug-rotors")]
        defmt::debug!(
            "Роторы: [{}, {}, {}, {}]",
            rotor_speeds.x,
            rotor_speeds.y,
            rotor_speeds.z,
            rotor_speeds.w
        );
    }
}
