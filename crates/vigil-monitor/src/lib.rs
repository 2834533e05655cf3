//! vigil-monitor — per-target HTTP status monitoring.
//!
//! Each monitored target gets one [`HttpStatusMonitor`] running two
//! independent periodic loops:
//!
//! ```text
//! poll loop (fixed rate)          evaluate loop (fixed delay)
//!   HTTP request ─ classify          snapshot window
//!   record Outcome ──► HistoryWindow ──► count anomalies
//!                                      map count → Severity
//!                                      reconcile on every backend
//! ```
//!
//! Both loops start after their configured initial delay plus a random
//! jitter of up to one minute, so many targets sharing the same config
//! never fire in lockstep.
//!
//! Recoverable failures (timeouts, refused connections, out-of-range
//! status codes, backend update failures) are recorded or logged inside
//! the cycle and never escalate; a panic inside a loop is deliberately
//! not caught and surfaces through the task's `JoinHandle` so the daemon
//! can treat it as fatal.

pub mod evaluator;
pub mod jitter;
pub mod monitor;

pub use evaluator::{count_anomalies, severity_from_count};
pub use monitor::HttpStatusMonitor;
