//! The discrete health scale assigned to monitored components.

use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Health level of a component, ordered from least to most severe.
///
/// `UnderMaintenance` is remote-only: it is never computed locally, only
/// observed on a status backend, where it suppresses automated updates.
/// `Unknown` models a status string the backend returned that we do not
/// recognize; it has no outward wire representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Unknown,
    Operational,
    UnderMaintenance,
    DegradedPerformance,
    PartialOutage,
    MajorOutage,
}

impl<'de> Deserialize<'de> for Severity {
    /// Unrecognized status strings map to `Unknown` rather than failing
    /// the whole listing.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(match s.as_str() {
            "operational" => Severity::Operational,
            "under_maintenance" => Severity::UnderMaintenance,
            "degraded_performance" => Severity::DegradedPerformance,
            "partial_outage" => Severity::PartialOutage,
            "major_outage" => Severity::MajorOutage,
            _ => Severity::Unknown,
        })
    }
}

/// Error returned when attempting to transmit [`Severity::Unknown`].
#[derive(Debug, Error)]
#[error("severity 'unknown' has no wire representation")]
pub struct UnknownSeverity;

impl Severity {
    /// The statuspage-style wire vocabulary for this severity.
    ///
    /// `Unknown` is deliberately unrepresentable: locally computed
    /// severities are always one of the four operational levels, so an
    /// `Unknown` reaching this point is a programming error surfaced as
    /// an explicit failure rather than an empty string on the wire.
    pub fn as_wire(&self) -> Result<&'static str, UnknownSeverity> {
        match self {
            Severity::Unknown => Err(UnknownSeverity),
            Severity::Operational => Ok("operational"),
            Severity::UnderMaintenance => Ok("under_maintenance"),
            Severity::DegradedPerformance => Ok("degraded_performance"),
            Severity::PartialOutage => Ok("partial_outage"),
            Severity::MajorOutage => Ok("major_outage"),
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Severity::Unknown => "unknown",
            Severity::Operational => "operational",
            Severity::UnderMaintenance => "under_maintenance",
            Severity::DegradedPerformance => "degraded_performance",
            Severity::PartialOutage => "partial_outage",
            Severity::MajorOutage => "major_outage",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_tracks_severity() {
        assert!(Severity::Operational < Severity::DegradedPerformance);
        assert!(Severity::DegradedPerformance < Severity::PartialOutage);
        assert!(Severity::PartialOutage < Severity::MajorOutage);
        assert!(Severity::Unknown < Severity::Operational);
    }

    #[test]
    fn wire_vocabulary() {
        assert_eq!(Severity::Operational.as_wire().unwrap(), "operational");
        assert_eq!(
            Severity::DegradedPerformance.as_wire().unwrap(),
            "degraded_performance"
        );
        assert_eq!(Severity::PartialOutage.as_wire().unwrap(), "partial_outage");
        assert_eq!(Severity::MajorOutage.as_wire().unwrap(), "major_outage");
        assert_eq!(
            Severity::UnderMaintenance.as_wire().unwrap(),
            "under_maintenance"
        );
    }

    #[test]
    fn unknown_is_not_transmittable() {
        assert!(Severity::Unknown.as_wire().is_err());
    }

    #[test]
    fn deserializes_wire_strings() {
        let s: Severity = serde_json::from_str("\"major_outage\"").unwrap();
        assert_eq!(s, Severity::MajorOutage);
        let s: Severity = serde_json::from_str("\"under_maintenance\"").unwrap();
        assert_eq!(s, Severity::UnderMaintenance);
    }

    #[test]
    fn unrecognized_wire_string_maps_to_unknown() {
        let s: Severity = serde_json::from_str("\"definitely_not_a_status\"").unwrap();
        assert_eq!(s, Severity::Unknown);
    }
}
