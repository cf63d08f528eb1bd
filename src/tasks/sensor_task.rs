use core::sync::atomic::Ordering;
use embassy_rp::i2c::{Blocking, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_time::Duration;

use crate::data::SYSTEM_STATE;
use crate::drivers::imu::Mpu6500;
use crate::drivers::mag::Hmc5983;

use crate::config::hardware::system::{
    GYRO_CALIBRATION_SAMPLES, IMU_SAMPLE_RATE_HZ, MAG_SAMPLE_RATE_HZ, SENSOR_ERROR_LIMIT,
};

#[embassy_executor::task]
pub async fn task(mut i2c: I2c<'static, I2C0, Blocking>) {
    // Инициализация MPU6500 (акселерометр + гироскоп)
    let mut imu = match Mpu6500::new(&mut i2c).await {
        Ok(imu) => {
            defmt::info!("MPU6500 инициализирован успешно");
            imu
        }
        Err(e) => {
            defmt::error!("Ошибка инициализации MPU6500: {}", e);
            return;
        }
    };

    // Инициализация HMC5983 (магнитометр)
    let mag = match Hmc5983::new(&mut i2c).await {
        Ok(mag) => {
            defmt::info!("HMC5983 инициализирован успешно");
            mag
        }
        Err(e) => {
            defmt::error!("Ошибка инициализации HMC5983: {}", e);
            return;
        }
    };

    // === Калибровка датчиков ===

    defmt::info!("Калибровка гироскопа, не двигайте устройство...");
    if let Err(e) = imu.calibrate_gyro(&mut i2c, GYRO_CALIBRATION_SAMPLES).await {
        defmt::error!("Ошибка калибровки гироскопа: {}", e);
        return;
    }
    defmt::info!("Калибровка завершена");

    // === Основной цикл опроса ===
    let mut ticker = embassy_time::Ticker::every(Duration::from_hz(IMU_SAMPLE_RATE_HZ as u64));

    // Делитель частоты для магнитометра: 100Hz / 20Hz = 5
    const MAG_DIVIDER: u8 = (IMU_SAMPLE_RATE_HZ / MAG_SAMPLE_RATE_HZ) as u8;
    let mut mag_counter = 0u8;
    let mut error_count = 0u32;

    loop {
        ticker.next().await;

        // Мониторинг выключен - датчики не опрашиваются, состояние не меняется
        if !SYSTEM_STATE.monitoring.load(Ordering::Relaxed) {
            continue;
        }

        // === Чтение IMU (100 Hz) ===
        match imu.read_all(&mut i2c).await {
            Ok(imu_data) => {
                error_count = 0;

                *SYSTEM_STATE.accelerometer.lock().await = Some(imu_data.accel);
                *SYSTEM_STATE.gyroscope.lock().await = Some(imu_data.gyro);

                #[cfg(feature = "debug-sensors")]
                defmt::trace!(
                    "IMU: accel=({}, {}, {}) м/с² gyro=({}, {}, {}) рад/с",
                    imu_data.accel.x,
                    imu_data.accel.y,
                    imu_data.accel.z,
                    imu_data.gyro.x,
                    imu_data.gyro.y,
                    imu_data.gyro.z
                );
            }
            Err(e) => {
                defmt::error!("Ошибка чтения IMU: {}", e);
                error_count += 1;
            }
        }

        // === Чтение магнитометра (20 Hz) ===
        mag_counter += 1;
        if mag_counter >= MAG_DIVIDER {
            mag_counter = 0;

            match mag.read(&mut i2c).await {
                Ok(mag_data) => {
                    *SYSTEM_STATE.magnetic_field.lock().await = Some(mag_data.field);

                    #[cfg(feature = "debug-sensors")]
                    defmt::trace!(
                        "Магнитометр: ({}, {}, {}) мкТл, темп={} °C",
                        mag_data.field.x,
                        mag_data.field.y,
                        mag_data.field.z,
                        mag_data.temperature
                    );
                }
                Err(e) => {
                    defmt::error!("Ошибка чтения магнитометра: {}", e);
                    error_count += 1;
                }
            }
        }

        // Слишком много ошибок подряд - выключаем мониторинг
        if error_count > SENSOR_ERROR_LIMIT {
            defmt::error!("Слишком много ошибок датчиков, мониторинг остановлен!");
            SYSTEM_STATE.monitoring.store(false, Ordering::Relaxed);
            error_count = 0;
        }
    }
}
