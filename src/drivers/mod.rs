pub mod imu;
pub mod mag;
