// src/data/mod.rs
use core::sync::atomic::AtomicBool;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::mutex::Mutex;
use nalgebra::{Vector3, Vector4};

/// Размер буфера канала скоростей роторов
const ROTOR_CHANNEL_SIZE: usize = 5;

/// Скорости четырех роторов
pub type RotorSpeeds = Vector4<f32>;

/// Снимок данных со всех датчиков для одного расчета
#[derive(Clone, Copy, Debug)]
pub struct SensorData {
    /// Ускорение (м/с²)
    pub accelerometer: Vector3<f32>,
    /// Угловая скорость (рад/с)
    pub gyroscope: Vector3<f32>,
    /// Магнитное поле (мкТл)
    pub magnetic_field: Vector3<f32>,
}

/// Общее состояние системы
///
/// Каждый датчик лежит под собственным мьютексом: задача опроса пишет свой
/// вектор независимо от остальных, расчет роторов снимает все три разом.
pub struct SystemState {
    /// Включен ли мониторинг датчиков
    pub monitoring: AtomicBool,
    pub accelerometer: Mutex<CriticalSectionRawMutex, Option<Vector3<f32>>>,
    pub gyroscope: Mutex<CriticalSectionRawMutex, Option<Vector3<f32>>>,
    pub magnetic_field: Mutex<CriticalSectionRawMutex, Option<Vector3<f32>>>,
    /// Последний результат расчета скоростей роторов
    pub last_rotor_speeds: Mutex<CriticalSectionRawMutex, Option<RotorSpeeds>>,
}

/// Каналы для передачи данных между задачами
pub struct DataChannels {
    /// Канал рассчитанных скоростей роторов
    pub rotor_channel: Channel<CriticalSectionRawMutex, RotorSpeeds, ROTOR_CHANNEL_SIZE>,
}

impl DataChannels {
    pub const fn new() -> Self {
        Self {
            rotor_channel: Channel::new(),
        }
    }
}

impl SystemState {
    pub const fn new() -> Self {
        Self {
            monitoring: AtomicBool::new(false),
            accelerometer: Mutex::new(None),
            gyroscope: Mutex::new(None),
            magnetic_field: Mutex::new(None),
            last_rotor_speeds: Mutex::new(None),
        }
    }

    /// Снимок данных всех датчиков
    ///
    /// Порядок захвата фиксированный: магнитометр, гироскоп, акселерометр.
    /// Возвращает None, пока хотя бы один датчик не отдал первое измерение.
    pub async fn snapshot_sensors(&self) -> Option<SensorData> {
        let magnetic_field = (*self.magnetic_field.lock().await)?;
        let gyroscope = (*self.gyroscope.lock().await)?;
        let accelerometer = (*self.accelerometer.lock().await)?;

        Some(SensorData {
            accelerometer,
            gyroscope,
            magnetic_field,
        })
    }

    /// Проверка готовности датчиков: все три отдали хотя бы одно измерение
    pub async fn is_ready(&self) -> bool {
        let accel_ok = self.accelerometer.lock().await.is_some();
        let gyro_ok = self.gyroscope.lock().await.is_some();
        let mag_ok = self.magnetic_field.lock().await.is_some();

        accel_ok && gyro_ok && mag_ok
    }
}

// Статические экземпляры для глобального доступа
pub static CHANNELS: DataChannels = DataChannels::new();
pub static SYSTEM_STATE: SystemState = SystemState::new();
