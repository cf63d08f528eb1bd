pub(crate) mod mpu6500;

pub use mpu6500::{ImuData, Mpu6500, Mpu6500Error};
