//! Кинематика: расчет скоростей роторов по данным датчиков

pub mod rotor_control;

pub use rotor_control::compute_rotor_speeds;

use crate::data::{RotorSpeeds, SYSTEM_STATE};

/// Контроллер роторов
///
/// Снимает текущие данные датчиков из общего состояния и прогоняет их
/// через ядро расчета. Хранит последний результат.
pub struct RotorController {
    rotor_speeds: RotorSpeeds,
}

impl RotorController {
    /// Создание нового контроллера роторов
    pub fn new() -> Self {
        Self {
            rotor_speeds: RotorSpeeds::zeros(),
        }
    }

    /// Расчет скоростей роторов по текущим данным датчиков
    ///
    /// Возвращает None, пока датчики не готовы (нет полного снимка).
    pub async fn calculate_rotor_speeds(&mut self) -> Option<RotorSpeeds> {
        let sensor_data = SYSTEM_STATE.snapshot_sensors().await?;

        self.rotor_speeds = compute_rotor_speeds(&sensor_data);
        Some(self.rotor_speeds)
    }

    /// Последний рассчитанный результат
    pub fn last_rotor_speeds(&self) -> RotorSpeeds {
        self.rotor_speeds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controller_starts_at_zero() {
        let controller = RotorController::new();
        assert_eq!(controller.last_rotor_speeds(), RotorSpeeds::zeros());
    }
}
