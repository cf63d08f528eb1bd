//! Ядро расчета скоростей роторов из данных датчиков

use crate::data::{RotorSpeeds, SensorData};

/// Расчет скоростей четырех роторов по текущим данным датчиков
///
/// Пока это заглушка: в роторы копируются первые компоненты векторов
/// датчиков, четвертый ротор всегда 0. Функция чистая, без состояния,
/// входные данные не изменяет.
///
/// TODO: заменить заглушку реальным расчетом смешения роторов
pub fn compute_rotor_speeds(sensor_data: &SensorData) -> RotorSpeeds {
    defmt::debug!("ACCELEROMETER: {}", sensor_data.accelerometer.x);
    defmt::debug!("GYROSCOPE: {}", sensor_data.gyroscope.x);
    defmt::debug!("MAGNETIC_FIELD: {}", sensor_data.magnetic_field.x);

    RotorSpeeds::new(
        sensor_data.accelerometer.x,
        sensor_data.gyroscope.x,
        sensor_data.magnetic_field.x,
        0.0,
    )
}

// Модульные тесты
#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;
    use num_traits::Float;

    fn make_sensor_data(accel: f32, gyro: f32, mag: f32) -> SensorData {
        SensorData {
            accelerometer: Vector3::new(accel, 0.0, 0.0),
            gyroscope: Vector3::new(gyro, 0.0, 0.0),
            magnetic_field: Vector3::new(mag, 0.0, 0.0),
        }
    }

    #[test]
    fn test_first_components_copied() {
        let speeds = compute_rotor_speeds(&make_sensor_data(1.0, 2.0, 3.0));
        assert_eq!(speeds.x, 1.0);
        assert_eq!(speeds.y, 2.0);
        assert_eq!(speeds.z, 3.0);
        assert_eq!(speeds.w, 0.0);
    }

    #[test]
    fn test_zero_input() {
        let speeds = compute_rotor_speeds(&make_sensor_data(0.0, 0.0, 0.0));
        assert_eq!(speeds, RotorSpeeds::zeros());
    }

    #[test]
    fn test_negative_values() {
        let speeds = compute_rotor_speeds(&make_sensor_data(-1.0, -0.5, -30.0));
        assert_eq!(speeds.x, -1.0);
        assert_eq!(speeds.y, -0.5);
        assert_eq!(speeds.z, -30.0);
    }

    #[test]
    fn test_fourth_rotor_always_zero() {
        let speeds = compute_rotor_speeds(&make_sensor_data(9.81, 0.17, 48.5));
        assert_eq!(speeds.w, 0.0);
    }

    #[test]
    fn test_other_components_ignored() {
        // Используются только первые компоненты векторов
        let data = SensorData {
            accelerometer: Vector3::new(1.5, 100.0, -100.0),
            gyroscope: Vector3::new(0.2, 7.0, 8.0),
            magnetic_field: Vector3::new(42.0, -3.0, 55.0),
        };
        let speeds = compute_rotor_speeds(&data);
        assert!((speeds.x - 1.5).abs() < f32::EPSILON);
        assert!((speeds.y - 0.2).abs() < f32::EPSILON);
        assert!((speeds.z - 42.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_idempotent() {
        // Скрытого состояния нет: повторный вызов дает тот же результат
        let data = make_sensor_data(1.0, 2.0, 3.0);
        let first = compute_rotor_speeds(&data);
        let second = compute_rotor_speeds(&data);
        assert_eq!(first, second);
    }
}
