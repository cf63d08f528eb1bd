pub(crate) mod hmc5983;

pub use hmc5983::{Hmc5983, Hmc5983Error, MagData};
