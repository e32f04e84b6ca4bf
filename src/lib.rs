//! pdw-sim — a time-stepped simulator of radar pulse generation and
//! passive-sensor reception, producing a stream of Pulse Descriptor Words
//! (PDWs) degraded by configurable detection and measurement error models.

pub mod config;
pub mod error;
pub mod error_model;
pub mod kinematics;
pub mod lobe;
pub mod modulation;
pub mod pdw;
pub mod radar;
pub mod scenario;
pub mod sensor;
pub mod sink;
pub mod units;

pub use error::{SimError, SimResult};
pub use pdw::Pdw;
pub use scenario::Scenario;
