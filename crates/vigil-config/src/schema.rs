//! Raw JSON configuration schema.
//!
//! Every per-monitor field is optional here; requiredness is enforced
//! during resolution, after layering over `default_configuration`.

use serde::Deserialize;

/// Top-level configuration document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfig {
    #[serde(default)]
    pub status_pages: Option<RawStatusPages>,
    #[serde(default)]
    pub default_configuration: Option<RawDefaults>,
    #[serde(default)]
    pub monitors: Option<RawMonitors>,
}

/// The `status_pages` section, keyed by backend kind.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStatusPages {
    #[serde(rename = "statuspage.io", default)]
    pub statuspage_io: Vec<RawStatusPageIo>,
}

/// Connection parameters for one statuspage.io page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStatusPageIo {
    pub url: Option<String>,
    pub page_id: Option<String>,
    pub token: Option<String>,
    pub fetch_rate: Option<String>,
}

/// The `default_configuration` section: a template monitor entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDefaults {
    #[serde(default)]
    pub http_status: Option<RawHttpStatus>,
}

/// The `monitors` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMonitors {
    #[serde(default)]
    pub http_status: Vec<RawHttpStatus>,
}

/// One HTTP status monitor entry, or the default template.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawHttpStatus {
    pub component_name: Option<String>,
    pub target: Option<String>,
    pub method: Option<String>,
    pub status_code_min: Option<u16>,
    pub status_code_max: Option<u16>,
    pub timeout: Option<String>,
    pub monitoring_history: Option<String>,
    pub initial_delay: Option<String>,
    pub period: Option<String>,
    pub anomalies_detection: Option<RawAnomalies>,
}

/// Anomaly-detection block of a monitor entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAnomalies {
    pub degraded_performance_threshold: Option<u32>,
    pub partial_outage_threshold: Option<u32>,
    pub major_outage_threshold: Option<u32>,
    pub period: Option<String>,
    pub initial_delay: Option<String>,
}

impl RawHttpStatus {
    /// Layer `self` over a default template: a field set here wins,
    /// otherwise the default's value is used. The nested anomaly block
    /// is layered field-by-field as well.
    pub fn with_defaults(&self, defaults: &RawHttpStatus) -> RawHttpStatus {
        RawHttpStatus {
            component_name: self
                .component_name
                .clone()
                .or_else(|| defaults.component_name.clone()),
            target: self.target.clone().or_else(|| defaults.target.clone()),
            method: self.method.clone().or_else(|| defaults.method.clone()),
            status_code_min: self.status_code_min.or(defaults.status_code_min),
            status_code_max: self.status_code_max.or(defaults.status_code_max),
            timeout: self.timeout.clone().or_else(|| defaults.timeout.clone()),
            monitoring_history: self
                .monitoring_history
                .clone()
                .or_else(|| defaults.monitoring_history.clone()),
            initial_delay: self
                .initial_delay
                .clone()
                .or_else(|| defaults.initial_delay.clone()),
            period: self.period.clone().or_else(|| defaults.period.clone()),
            anomalies_detection: match (&self.anomalies_detection, &defaults.anomalies_detection)
            {
                (Some(own), Some(default)) => Some(own.with_defaults(default)),
                (Some(own), None) => Some(own.clone()),
                (None, Some(default)) => Some(default.clone()),
                (None, None) => None,
            },
        }
    }
}

impl RawAnomalies {
    pub fn with_defaults(&self, defaults: &RawAnomalies) -> RawAnomalies {
        RawAnomalies {
            degraded_performance_threshold: self
                .degraded_performance_threshold
                .or(defaults.degraded_performance_threshold),
            partial_outage_threshold: self
                .partial_outage_threshold
                .or(defaults.partial_outage_threshold),
            major_outage_threshold: self
                .major_outage_threshold
                .or(defaults.major_outage_threshold),
            period: self.period.clone().or_else(|| defaults.period.clone()),
            initial_delay: self
                .initial_delay
                .clone()
                .or_else(|| defaults.initial_delay.clone()),
        }
    }
}
