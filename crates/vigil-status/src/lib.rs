//! vigil-status — reconciling computed health onto status backends.
//!
//! # Architecture
//!
//! ```text
//! Reconciler (one per backend)
//!   ├── cached Vec<RemoteComponent>, replaced wholesale on refresh
//!   ├── reconcile(name, severity) — diff against cache, update on change
//!   ├── on successful update: spawn a non-blocking cache refresh
//!   └── periodic refresh loop (fixed delay, watch-channel shutdown)
//! ComponentRegistry (capability trait)
//!   └── StatusPageIo — bearer-auth REST client for statuspage.io
//! ```
//!
//! The reconciler is backend-agnostic: it depends only on the
//! [`ComponentRegistry`] capability, so additional status-page services
//! can be registered alongside statuspage.io.

pub mod error;
pub mod reconciler;
pub mod registry;
pub mod statuspage;

pub use error::{BackendError, BackendResult};
pub use reconciler::Reconciler;
pub use registry::ComponentRegistry;
pub use statuspage::StatusPageIo;
