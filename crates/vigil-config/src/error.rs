//! Configuration error types.

use thiserror::Error;

/// Errors raised while loading or resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {0}: {1}")]
    Read(String, #[source] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("monitor '{monitor}': missing required field '{field}'")]
    Missing { monitor: String, field: &'static str },

    #[error("monitor '{monitor}': invalid duration '{value}' for '{field}'")]
    InvalidDuration {
        monitor: String,
        field: &'static str,
        value: String,
    },

    #[error(
        "monitor '{monitor}': status code range is inverted ({min} > {max})"
    )]
    InvalidStatusCodeRange { monitor: String, min: u16, max: u16 },

    #[error(
        "monitor '{monitor}': anomaly thresholds must be non-decreasing \
         (degraded={degraded}, partial_outage={partial}, major_outage={major})"
    )]
    InvalidThresholds {
        monitor: String,
        degraded: u32,
        partial: u32,
        major: u32,
    },

    #[error("monitor '{monitor}': unsupported HTTP method '{method}'")]
    InvalidMethod { monitor: String, method: String },

    #[error("monitor '{monitor}': '{field}' must be a non-zero duration")]
    ZeroDuration { monitor: String, field: &'static str },

    #[error("status page entry {index}: missing required field '{field}'")]
    MissingStatusPageField { index: usize, field: &'static str },

    #[error("status page entry {index}: invalid duration '{value}' for 'fetch_rate'")]
    InvalidFetchRate { index: usize, value: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
