//! Reducing a history window to a severity level.

use std::ops::RangeInclusive;

use vigil_config::AnomalyConfig;
use vigil_core::{Outcome, Severity};

/// Count outcomes in a window snapshot that fall outside the acceptable
/// status-code range (429 excluded, transport failures included).
pub fn count_anomalies(snapshot: &[Outcome], acceptable: &RangeInclusive<u16>) -> u32 {
    snapshot
        .iter()
        .filter(|outcome| outcome.is_anomalous(acceptable))
        .count() as u32
}

/// Map an anomaly count to a severity through the ordered thresholds.
///
/// Checked most-severe first: with non-decreasing thresholds this
/// guarantees the worst matching severity wins even when a smaller
/// threshold is also exceeded.
pub fn severity_from_count(anomalies: &AnomalyConfig, count: u32) -> Severity {
    if count >= anomalies.major_outage_threshold {
        Severity::MajorOutage
    } else if count >= anomalies.partial_outage_threshold {
        Severity::PartialOutage
    } else if count >= anomalies.degraded_threshold {
        Severity::DegradedPerformance
    } else {
        Severity::Operational
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn thresholds(degraded: u32, partial: u32, major: u32) -> AnomalyConfig {
        AnomalyConfig {
            degraded_threshold: degraded,
            partial_outage_threshold: partial,
            major_outage_threshold: major,
            period: Duration::from_secs(60),
            initial_delay: Duration::from_secs(0),
        }
    }

    fn outcomes(codes: &[u16]) -> Vec<Outcome> {
        codes.iter().map(|&c| Outcome::received(c)).collect()
    }

    #[test]
    fn mapping_is_monotonic_in_count() {
        let config = thresholds(2, 4, 6);
        let mut last = Severity::Operational;
        for count in 0..20 {
            let severity = severity_from_count(&config, count);
            assert!(severity >= last, "severity regressed at count {count}");
            last = severity;
        }
    }

    #[test]
    fn boundaries_land_on_the_worst_matching_severity() {
        let config = thresholds(2, 4, 6);
        assert_eq!(severity_from_count(&config, 0), Severity::Operational);
        assert_eq!(severity_from_count(&config, 1), Severity::Operational);
        assert_eq!(severity_from_count(&config, 2), Severity::DegradedPerformance);
        assert_eq!(severity_from_count(&config, 3), Severity::DegradedPerformance);
        assert_eq!(severity_from_count(&config, 4), Severity::PartialOutage);
        assert_eq!(severity_from_count(&config, 6), Severity::MajorOutage);
        assert_eq!(severity_from_count(&config, 60), Severity::MajorOutage);
    }

    #[test]
    fn equal_thresholds_still_pick_the_most_severe() {
        let config = thresholds(3, 3, 3);
        assert_eq!(severity_from_count(&config, 2), Severity::Operational);
        assert_eq!(severity_from_count(&config, 3), Severity::MajorOutage);
    }

    #[test]
    fn mixed_window_counts_only_out_of_range() {
        // range [200,399], three 500s in a window of ten.
        let snapshot = outcomes(&[200, 200, 500, 200, 500, 200, 500, 200, 200, 200]);
        let count = count_anomalies(&snapshot, &(200..=399));
        assert_eq!(count, 3);
        assert_eq!(
            severity_from_count(&thresholds(2, 4, 6), count),
            Severity::DegradedPerformance
        );
    }

    #[test]
    fn sustained_failures_reach_major_outage() {
        let snapshot = outcomes(&[503, 503, 503, 503, 503, 503, 503, 200, 200, 200]);
        let count = count_anomalies(&snapshot, &(200..=399));
        assert_eq!(count, 7);
        assert_eq!(
            severity_from_count(&thresholds(2, 4, 6), count),
            Severity::MajorOutage
        );
    }

    #[test]
    fn rate_limited_polls_are_not_anomalies() {
        let snapshot = outcomes(&[429, 429, 429, 429]);
        assert_eq!(count_anomalies(&snapshot, &(200..=399)), 0);
    }

    #[test]
    fn transport_failures_count_as_anomalies() {
        let mut snapshot = outcomes(&[200, 200]);
        snapshot.push(Outcome::transport_error("connection refused"));
        assert_eq!(count_anomalies(&snapshot, &(200..=399)), 1);
    }
}
