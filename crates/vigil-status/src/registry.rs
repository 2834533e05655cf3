//! The component registry capability.

use async_trait::async_trait;

use vigil_core::{RemoteComponent, Severity};

use crate::error::BackendResult;

/// A status backend that can list its components and update the status
/// of a single one.
///
/// Implementations are registered with one [`crate::Reconciler`] each;
/// the reconciler owns caching and diffing, the registry owns the wire.
#[async_trait]
pub trait ComponentRegistry: Send + Sync {
    /// Human-readable backend identity for log lines.
    fn name(&self) -> String;

    /// Fetch the full, ordered component list.
    async fn list_components(&self) -> BackendResult<Vec<RemoteComponent>>;

    /// Set one component's status. Descriptive fields of `component` are
    /// carried through unchanged; only the status changes.
    async fn update_status(
        &self,
        component: &RemoteComponent,
        severity: Severity,
    ) -> BackendResult<()>;
}
