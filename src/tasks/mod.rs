pub mod rotor_task;
pub mod sensor_task;
