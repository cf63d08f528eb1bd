//! Конфигурация аппаратного обеспечения контроллера роторов

/// Конфигурация пинов GPIO
pub mod pins {

    /// I2C для датчиков (IMU, магнитометр)
    pub mod i2c {
        /// Пин SDA для I2C0
        pub const SDA_PIN: u8 = 4;  // GPIO4
        /// Пин SCL для I2C0
        pub const SCL_PIN: u8 = 5;  // GPIO5
    }

    /// Дополнительные пины
    pub mod misc {
        /// Встроенный светодиод на Pico
        pub const LED_PIN: u8 = 25;    // GPIO25

        /// Пин кнопки включения/выключения мониторинга датчиков
        pub const MONITOR_BUTTON_PIN: u8 = 15; // GPIO15
    }
}

/// Конфигурация частот и скоростей
pub mod frequencies {
    /// Частота I2C шины (Гц)
    pub const I2C_FREQUENCY: u32 = 400_000; // 400 kHz
}

/// Адреса I2C устройств
pub mod i2c_addresses {
    /// Адрес MPU6500 IMU
    pub const MPU6500_ADDR: u8 = 0x68;

    /// Альтернативный адрес MPU6500 (если AD0 = HIGH)
    pub const MPU6500_ADDR_ALT: u8 = 0x69;

    /// Адрес магнитометра HMC5983
    pub const HMC5983_ADDR: u8 = 0x1E;
}

/// Параметры системы
pub mod system {
    /// Частота опроса IMU (Гц)
    pub const IMU_SAMPLE_RATE_HZ: u32 = 100;

    /// Частота опроса магнитометра (Гц)
    pub const MAG_SAMPLE_RATE_HZ: u32 = 20;

    /// Частота расчета скоростей роторов (Гц)
    pub const ROTOR_UPDATE_RATE_HZ: u32 = 50;

    /// Период главного цикла (мс)
    pub const MAIN_LOOP_PERIOD_MS: u64 = 100;

    /// Количество измерений для калибровки гироскопа
    pub const GYRO_CALIBRATION_SAMPLES: u16 = 100;

    /// Предел подряд идущих ошибок чтения датчиков
    pub const SENSOR_ERROR_LIMIT: u32 = 100;
}
