//! error.rs — the four fatal error kinds from spec.md §7
//!
//! All four are fatal at the point of detection; the core makes no attempt
//! to repair a malformed scenario. No variant is expected to occur once a
//! `Scenario` has been successfully built from a `RawConfig` — the hot loop
//! is infallible (spec.md §7).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("configuration error{}: {field}: {message}", radar_or_sensor.as_ref().map(|n| format!(" in '{n}'")).unwrap_or_default())]
    Configuration {
        radar_or_sensor: Option<String>,
        field: String,
        message: String,
    },

    #[error("unit error: {message}")]
    Unit { message: String },

    #[error("invariant violation: {message}")]
    InvariantViolation { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl SimError {
    pub fn config(radar_or_sensor: impl Into<String>, field: impl Into<String>, message: impl Into<String>) -> Self {
        SimError::Configuration {
            radar_or_sensor: Some(radar_or_sensor.into()),
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn config_global(field: impl Into<String>, message: impl Into<String>) -> Self {
        SimError::Configuration {
            radar_or_sensor: None,
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        SimError::InvariantViolation {
            message: message.into(),
        }
    }
}

pub type SimResult<T> = Result<T, SimError>;
