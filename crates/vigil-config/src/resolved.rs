//! Fully-resolved configuration.
//!
//! Resolution layers each monitor entry over the default template,
//! parses durations, and validates the result. Resolved values are
//! immutable for the process lifetime.

use std::ops::RangeInclusive;
use std::time::Duration;

use crate::error::{ConfigError, ConfigResult};
use crate::parse_duration;
use crate::schema::{RawConfig, RawHttpStatus, RawStatusPages};

/// Resolved agent configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub status_pages: Vec<StatusPageIoConfig>,
    pub monitors: Vec<MonitorConfig>,
}

/// Connection parameters for one statuspage.io page.
#[derive(Debug, Clone)]
pub struct StatusPageIoConfig {
    pub url: String,
    pub page_id: String,
    pub token: String,
    /// How often the component cache is refreshed.
    pub fetch_rate: Duration,
}

/// One fully-resolved HTTP status monitor.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub component_name: String,
    pub target: String,
    pub method: String,
    pub status_code_min: u16,
    pub status_code_max: u16,
    pub timeout: Duration,
    /// How far back the history window reaches.
    pub monitoring_history: Duration,
    pub initial_delay: Duration,
    pub period: Duration,
    pub anomalies: AnomalyConfig,
}

/// Anomaly-detection parameters for one monitor.
#[derive(Debug, Clone)]
pub struct AnomalyConfig {
    pub degraded_threshold: u32,
    pub partial_outage_threshold: u32,
    pub major_outage_threshold: u32,
    pub period: Duration,
    pub initial_delay: Duration,
}

impl MonitorConfig {
    /// The closed status-code interval counted as a successful poll.
    pub fn acceptable_range(&self) -> RangeInclusive<u16> {
        self.status_code_min..=self.status_code_max
    }
}

impl Config {
    /// Resolve a raw document, optionally replacing its `status_pages`
    /// section with a separately loaded overlay.
    pub fn resolve(
        raw: RawConfig,
        status_pages_overlay: Option<RawStatusPages>,
    ) -> ConfigResult<Config> {
        let status_pages = status_pages_overlay
            .or(raw.status_pages)
            .unwrap_or_default();

        let mut pages = Vec::with_capacity(status_pages.statuspage_io.len());
        for (index, entry) in status_pages.statuspage_io.iter().enumerate() {
            let required = |value: &Option<String>, field| {
                value
                    .clone()
                    .ok_or(ConfigError::MissingStatusPageField { index, field })
            };
            let fetch_rate_raw = required(&entry.fetch_rate, "fetch_rate")?;
            let fetch_rate = parse_duration(&fetch_rate_raw).ok_or_else(|| {
                ConfigError::InvalidFetchRate {
                    index,
                    value: fetch_rate_raw.clone(),
                }
            })?;
            pages.push(StatusPageIoConfig {
                url: required(&entry.url, "url")?,
                page_id: required(&entry.page_id, "page_id")?,
                token: required(&entry.token, "token")?,
                fetch_rate,
            });
        }

        let defaults = raw
            .default_configuration
            .and_then(|d| d.http_status)
            .unwrap_or_default();

        let entries = raw.monitors.map(|m| m.http_status).unwrap_or_default();
        let mut monitors = Vec::with_capacity(entries.len());
        for entry in &entries {
            monitors.push(resolve_monitor(&entry.with_defaults(&defaults))?);
        }

        Ok(Config {
            status_pages: pages,
            monitors,
        })
    }
}

fn resolve_monitor(raw: &RawHttpStatus) -> ConfigResult<MonitorConfig> {
    // The component name doubles as the identity in every error message;
    // fall back to the target URL when it is the missing field.
    let monitor = raw
        .component_name
        .clone()
        .or_else(|| raw.target.clone())
        .unwrap_or_else(|| "<unnamed>".to_string());

    let missing = |field| ConfigError::Missing {
        monitor: monitor.clone(),
        field,
    };

    let duration = |value: &Option<String>, field| -> ConfigResult<Duration> {
        let text = value.as_ref().ok_or_else(|| missing(field))?;
        parse_duration(text).ok_or_else(|| ConfigError::InvalidDuration {
            monitor: monitor.clone(),
            field,
            value: text.clone(),
        })
    };

    let component_name = raw.component_name.clone().ok_or_else(|| missing("component_name"))?;
    let target = raw.target.clone().ok_or_else(|| missing("target"))?;
    let method = raw
        .method
        .clone()
        .unwrap_or_else(|| "GET".to_string())
        .to_ascii_uppercase();
    const METHODS: [&str; 7] = ["GET", "HEAD", "POST", "PUT", "DELETE", "OPTIONS", "PATCH"];
    if !METHODS.contains(&method.as_str()) {
        return Err(ConfigError::InvalidMethod {
            monitor: monitor.clone(),
            method,
        });
    }
    let status_code_min = raw.status_code_min.ok_or_else(|| missing("status_code_min"))?;
    let status_code_max = raw.status_code_max.ok_or_else(|| missing("status_code_max"))?;
    let timeout = duration(&raw.timeout, "timeout")?;
    let monitoring_history = duration(&raw.monitoring_history, "monitoring_history")?;
    let initial_delay = duration(&raw.initial_delay, "initial_delay")?;
    let period = duration(&raw.period, "period")?;

    let anomalies_raw = raw
        .anomalies_detection
        .as_ref()
        .ok_or_else(|| missing("anomalies_detection"))?;
    let anomalies = AnomalyConfig {
        degraded_threshold: anomalies_raw
            .degraded_performance_threshold
            .ok_or_else(|| missing("anomalies_detection.degraded_performance_threshold"))?,
        partial_outage_threshold: anomalies_raw
            .partial_outage_threshold
            .ok_or_else(|| missing("anomalies_detection.partial_outage_threshold"))?,
        major_outage_threshold: anomalies_raw
            .major_outage_threshold
            .ok_or_else(|| missing("anomalies_detection.major_outage_threshold"))?,
        period: duration(&anomalies_raw.period, "anomalies_detection.period")?,
        initial_delay: duration(
            &anomalies_raw.initial_delay,
            "anomalies_detection.initial_delay",
        )?,
    };

    if status_code_min > status_code_max {
        return Err(ConfigError::InvalidStatusCodeRange {
            monitor,
            min: status_code_min,
            max: status_code_max,
        });
    }
    if anomalies.degraded_threshold > anomalies.partial_outage_threshold
        || anomalies.partial_outage_threshold > anomalies.major_outage_threshold
    {
        return Err(ConfigError::InvalidThresholds {
            monitor,
            degraded: anomalies.degraded_threshold,
            partial: anomalies.partial_outage_threshold,
            major: anomalies.major_outage_threshold,
        });
    }
    if period.is_zero() {
        return Err(ConfigError::ZeroDuration {
            monitor,
            field: "period",
        });
    }
    if anomalies.period.is_zero() {
        return Err(ConfigError::ZeroDuration {
            monitor,
            field: "anomalies_detection.period",
        });
    }

    Ok(MonitorConfig {
        component_name,
        target,
        method,
        status_code_min,
        status_code_max,
        timeout,
        monitoring_history,
        initial_delay,
        period,
        anomalies,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{RawAnomalies, RawMonitors};

    fn full_defaults() -> RawHttpStatus {
        RawHttpStatus {
            component_name: None,
            target: None,
            method: Some("GET".into()),
            status_code_min: Some(200),
            status_code_max: Some(399),
            timeout: Some("10s".into()),
            monitoring_history: Some("5m".into()),
            initial_delay: Some("0s".into()),
            period: Some("30s".into()),
            anomalies_detection: Some(RawAnomalies {
                degraded_performance_threshold: Some(2),
                partial_outage_threshold: Some(4),
                major_outage_threshold: Some(6),
                period: Some("1m".into()),
                initial_delay: Some("30s".into()),
            }),
        }
    }

    fn raw_with(monitor: RawHttpStatus) -> RawConfig {
        RawConfig {
            status_pages: None,
            default_configuration: Some(crate::schema::RawDefaults {
                http_status: Some(full_defaults()),
            }),
            monitors: Some(RawMonitors {
                http_status: vec![monitor],
            }),
        }
    }

    fn minimal_monitor() -> RawHttpStatus {
        RawHttpStatus {
            component_name: Some("API".into()),
            target: Some("https://api.example.org/health".into()),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_fill_missing_fields() {
        let config = Config::resolve(raw_with(minimal_monitor()), None).unwrap();
        let monitor = &config.monitors[0];
        assert_eq!(monitor.component_name, "API");
        assert_eq!(monitor.period, Duration::from_secs(30));
        assert_eq!(monitor.acceptable_range(), 200..=399);
        assert_eq!(monitor.anomalies.major_outage_threshold, 6);
    }

    #[test]
    fn per_monitor_value_wins() {
        let mut monitor = minimal_monitor();
        monitor.period = Some("5s".into());
        let config = Config::resolve(raw_with(monitor), None).unwrap();
        assert_eq!(config.monitors[0].period, Duration::from_secs(5));
    }

    #[test]
    fn missing_required_field_is_an_error() {
        let mut monitor = minimal_monitor();
        monitor.component_name = None;
        let err = Config::resolve(raw_with(monitor), None).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Missing { field: "component_name", .. }
        ));
    }

    #[test]
    fn non_monotonic_thresholds_are_rejected() {
        let mut monitor = minimal_monitor();
        monitor.anomalies_detection = Some(RawAnomalies {
            degraded_performance_threshold: Some(5),
            partial_outage_threshold: Some(3),
            ..Default::default()
        });
        let err = Config::resolve(raw_with(monitor), None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidThresholds { .. }));
    }

    #[test]
    fn inverted_status_code_range_is_rejected() {
        let mut monitor = minimal_monitor();
        monitor.status_code_min = Some(400);
        monitor.status_code_max = Some(200);
        let err = Config::resolve(raw_with(monitor), None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidStatusCodeRange { .. }));
    }

    #[test]
    fn bad_duration_names_the_field() {
        let mut monitor = minimal_monitor();
        monitor.timeout = Some("whenever".into());
        let err = Config::resolve(raw_with(monitor), None).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidDuration { field: "timeout", .. }
        ));
    }

    #[test]
    fn method_is_normalized_and_validated() {
        let mut monitor = minimal_monitor();
        monitor.method = Some("head".into());
        let config = Config::resolve(raw_with(monitor), None).unwrap();
        assert_eq!(config.monitors[0].method, "HEAD");

        let mut monitor = minimal_monitor();
        monitor.method = Some("FROBNICATE".into());
        let err = Config::resolve(raw_with(monitor), None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMethod { .. }));
    }

    #[test]
    fn status_pages_overlay_replaces_section() {
        let raw = raw_with(minimal_monitor());
        let overlay: RawStatusPages = serde_json::from_str(
            r#"{ "statuspage.io": [
                { "url": "https://api.statuspage.io/v1/", "page_id": "p1",
                  "token": "t", "fetch_rate": "2m" }
            ] }"#,
        )
        .unwrap();

        let config = Config::resolve(raw, Some(overlay)).unwrap();
        assert_eq!(config.status_pages.len(), 1);
        assert_eq!(config.status_pages[0].page_id, "p1");
        assert_eq!(config.status_pages[0].fetch_rate, Duration::from_secs(120));
    }

    #[test]
    fn status_page_entry_requires_token() {
        let raw = RawConfig {
            status_pages: Some(
                serde_json::from_str(
                    r#"{ "statuspage.io": [
                        { "url": "https://api.statuspage.io/v1/", "page_id": "p1",
                          "fetch_rate": "2m" }
                    ] }"#,
                )
                .unwrap(),
            ),
            ..Default::default()
        };
        let err = Config::resolve(raw, None).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingStatusPageField { field: "token", .. }
        ));
    }
}
