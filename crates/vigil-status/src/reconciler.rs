//! Diff-based status reconciliation against one backend.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{RwLock, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use vigil_core::{RemoteComponent, Severity};

use crate::error::BackendResult;
use crate::registry::ComponentRegistry;

/// Locally cached view of one backend's components, plus the logic that
/// pushes computed severities onto it.
///
/// `Clone` + `Send` + `Sync` (backed by `Arc`), so one reconciler per
/// backend is shared by every monitor. The cache is replaced wholesale
/// on every refresh, never merged, so readers always observe a
/// consistent listing.
#[derive(Clone)]
pub struct Reconciler {
    inner: Arc<Inner>,
}

struct Inner {
    registry: Arc<dyn ComponentRegistry>,
    components: RwLock<Vec<RemoteComponent>>,
    fetch_rate: Duration,
}

impl Reconciler {
    pub fn new(registry: Arc<dyn ComponentRegistry>, fetch_rate: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                registry,
                components: RwLock::new(Vec::new()),
                fetch_rate,
            }),
        }
    }

    /// Replace the cached component list with a fresh fetch.
    pub async fn refresh(&self) -> BackendResult<usize> {
        let fresh = self.inner.registry.list_components().await?;
        let count = fresh.len();
        debug!(
            backend = %self.inner.registry.name(),
            count,
            names = %fresh.iter().map(|c| c.name.as_str()).collect::<Vec<_>>().join(", "),
            "component cache refreshed"
        );
        *self.inner.components.write().await = fresh;
        Ok(count)
    }

    /// Current cached components.
    pub async fn components(&self) -> Vec<RemoteComponent> {
        self.inner.components.read().await.clone()
    }

    /// Push `severity` for the named component if the backend disagrees.
    ///
    /// Skips silently when remote and computed status already match, and
    /// always skips components marked under maintenance. A successful
    /// update triggers a cache refresh in the background; a failed one
    /// leaves the cache untouched so the next cycle re-attempts while
    /// the discrepancy persists.
    pub async fn reconcile(&self, component_name: &str, severity: Severity) {
        let cached = {
            let components = self.inner.components.read().await;
            components.iter().find(|c| c.name == component_name).cloned()
        };

        let Some(component) = cached else {
            error!(
                backend = %self.inner.registry.name(),
                component = component_name,
                "no remote component with this name; check the monitor configuration"
            );
            return;
        };

        if component.status == Severity::UnderMaintenance {
            info!(
                backend = %self.inner.registry.name(),
                component = component_name,
                "component is under maintenance, its status won't be updated"
            );
            return;
        }
        if component.status == severity {
            debug!(
                backend = %self.inner.registry.name(),
                component = component_name,
                status = %severity,
                "remote and computed status already match"
            );
            return;
        }

        match self.inner.registry.update_status(&component, severity).await {
            Ok(()) => {
                info!(
                    backend = %self.inner.registry.name(),
                    component = component_name,
                    from = %component.status,
                    to = %severity,
                    "component status updated"
                );
                // Refresh without blocking this cycle: the backend may
                // derive a slightly different state than what was sent.
                let reconciler = self.clone();
                tokio::spawn(async move {
                    if let Err(e) = reconciler.refresh().await {
                        error!(
                            backend = %reconciler.inner.registry.name(),
                            error = %e,
                            "post-update cache refresh failed"
                        );
                    }
                });
            }
            Err(e) => {
                error!(
                    backend = %self.inner.registry.name(),
                    component = component_name,
                    from = %component.status,
                    to = %severity,
                    error = %e,
                    "failed to update component status"
                );
            }
        }
    }

    /// Periodic cache refresh at the configured fetch rate, fixed-delay
    /// semantics, until the shutdown signal flips.
    pub fn spawn_refresh_loop(&self, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        let reconciler = self.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = tokio::time::sleep(reconciler.inner.fetch_rate) => {
                        if let Err(e) = reconciler.refresh().await {
                            error!(
                                backend = %reconciler.inner.registry.name(),
                                error = %e,
                                "periodic component refresh failed"
                            );
                        }
                    }
                    _ = shutdown.changed() => {
                        debug!(
                            backend = %reconciler.inner.registry.name(),
                            "refresh loop shutting down"
                        );
                        break;
                    }
                }
            }
        })
    }
}
