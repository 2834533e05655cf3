//! vigil-config — configuration loading for the Vigil agent.
//!
//! Configuration is a JSON document with three sections:
//!
//! ```text
//! {
//!   "status_pages": { "statuspage.io": [ { "url", "page_id", "token", "fetch_rate" } ] },
//!   "default_configuration": { "http_status": { ... } },
//!   "monitors": { "http_status": [ { ... } ] }
//! }
//! ```
//!
//! Every per-monitor field is optional in the raw schema; resolution
//! layers each monitor entry over `default_configuration` and fails with
//! a named error if a required field is present in neither. Durations are
//! human-readable strings (`"500ms"`, `"30s"`, `"5m"`).
//!
//! An optional second document carrying only the `status_pages` section
//! can be overlaid on the main file, replacing its section wholesale.

pub mod duration;
pub mod error;
pub mod resolved;
pub mod schema;

pub use duration::parse_duration;
pub use error::{ConfigError, ConfigResult};
pub use resolved::{AnomalyConfig, Config, MonitorConfig, StatusPageIoConfig};
pub use schema::{RawConfig, RawStatusPages};

use std::path::Path;

/// Load and parse a raw configuration document from disk.
pub fn load_raw(path: &Path) -> ConfigResult<RawConfig> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Read(path.display().to_string(), e))?;
    Ok(serde_json::from_str(&text)?)
}

/// Load the status-pages overlay document from disk.
pub fn load_status_pages(path: &Path) -> ConfigResult<RawStatusPages> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Read(path.display().to_string(), e))?;
    Ok(serde_json::from_str(&text)?)
}
