//! Recorded results of individual poll attempts.

use std::ops::RangeInclusive;
use std::time::SystemTime;

/// Classification of a single poll: either a real HTTP status code, or a
/// sentinel for a transport-level failure where no response was received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStatus {
    Code(u16),
    TransportError,
}

/// One poll result. Created once per poll cycle, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// When the poll was issued.
    pub at: SystemTime,
    pub status: PollStatus,
    /// Captured failure cause for transport errors.
    pub cause: Option<String>,
}

impl Outcome {
    /// An outcome for a received response.
    pub fn received(code: u16) -> Self {
        Self {
            at: SystemTime::now(),
            status: PollStatus::Code(code),
            cause: None,
        }
    }

    /// An outcome for a failed transport (timeout, refused connection, ...).
    pub fn transport_error(cause: impl Into<String>) -> Self {
        Self {
            at: SystemTime::now(),
            status: PollStatus::TransportError,
            cause: Some(cause.into()),
        }
    }

    /// Whether this outcome counts as an anomaly against the acceptable
    /// status-code range.
    ///
    /// 429 (Too Many Requests) indicates rate limiting by the target and
    /// is treated as a success regardless of the configured range.
    pub fn is_anomalous(&self, acceptable: &RangeInclusive<u16>) -> bool {
        match self.status {
            PollStatus::Code(429) => false,
            PollStatus::Code(code) => !acceptable.contains(&code),
            PollStatus::TransportError => true,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.status, &self.cause) {
            (PollStatus::Code(code), _) => write!(f, "status={code}"),
            (PollStatus::TransportError, Some(cause)) => {
                write!(f, "transport error: {cause}")
            }
            (PollStatus::TransportError, None) => write!(f, "transport error"),
        }
    }
}
