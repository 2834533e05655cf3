//! vigil-core — domain types shared across the Vigil subsystems.
//!
//! Provides the health [`Severity`] scale, per-poll [`Outcome`] records,
//! the bounded per-target [`HistoryWindow`], and the backend-agnostic
//! [`RemoteComponent`] view cached by the status reconciler.
//!
//! All types are `Send` + `Sync`; the history window is safe to share
//! between the poll task (writer) and the anomaly-detection task (reader)
//! of a single target.

pub mod component;
pub mod outcome;
pub mod severity;
pub mod window;

pub use component::RemoteComponent;
pub use outcome::{Outcome, PollStatus};
pub use severity::{Severity, UnknownSeverity};
pub use window::HistoryWindow;
