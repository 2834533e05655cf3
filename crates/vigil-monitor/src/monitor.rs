//! The per-target monitor and its two scheduled loops.

use std::sync::Arc;

use reqwest::Method;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use vigil_config::MonitorConfig;
use vigil_core::{HistoryWindow, Outcome, Severity};
use vigil_status::Reconciler;

use crate::evaluator::{count_anomalies, severity_from_count};
use crate::jitter::startup_jitter;

/// Monitors one HTTP target: polls it on a fixed rate, evaluates the
/// recent history on a fixed delay, and reconciles the computed severity
/// onto every registered backend.
pub struct HttpStatusMonitor {
    config: MonitorConfig,
    method: Method,
    client: reqwest::Client,
    window: HistoryWindow,
    reconcilers: Vec<Reconciler>,
}

impl HttpStatusMonitor {
    /// Build a monitor around a shared HTTP transport. The window is
    /// sized so that `monitoring_history` worth of polls fit.
    pub fn new(
        config: MonitorConfig,
        client: reqwest::Client,
        reconcilers: Vec<Reconciler>,
    ) -> Self {
        // Config resolution only admits known verbs.
        let method = Method::from_bytes(config.method.as_bytes()).unwrap_or(Method::GET);
        let window = HistoryWindow::for_cadence(config.monitoring_history, config.period);
        Self {
            config,
            method,
            client,
            window,
            reconcilers,
        }
    }

    pub fn component_name(&self) -> &str {
        &self.config.component_name
    }

    /// One poll cycle: issue the request, classify the outcome, record it.
    ///
    /// Transport failures are data, not errors: they become a sentinel
    /// outcome with the captured cause and feed the anomaly count.
    pub async fn poll(&self) {
        let outcome = match self
            .client
            .request(self.method.clone(), &self.config.target)
            .timeout(self.config.timeout)
            .send()
            .await
        {
            Ok(response) => {
                let code = response.status().as_u16();
                // Drain the body; only the status code matters.
                match response.bytes().await {
                    Ok(_) => Outcome::received(code),
                    Err(e) => Outcome::transport_error(e.to_string()),
                }
            }
            Err(e) => Outcome::transport_error(e.to_string()),
        };

        if outcome.is_anomalous(&self.config.acceptable_range()) {
            warn!(target = %self.config.target, %outcome, "poll failed");
        } else {
            debug!(target = %self.config.target, %outcome, "poll succeeded");
        }
        self.window.record(outcome).await;
    }

    /// One evaluation cycle: reduce the window to a severity and hand it
    /// to every reconciler. Returns the computed severity.
    pub async fn detect_anomalies(&self) -> Severity {
        let snapshot = self.window.snapshot().await;
        let count = count_anomalies(&snapshot, &self.config.acceptable_range());
        let severity = severity_from_count(&self.config.anomalies, count);
        debug!(
            component = %self.config.component_name,
            status = %severity,
            anomalies = count,
            window = snapshot.len(),
            "anomaly evaluation"
        );
        for reconciler in &self.reconcilers {
            reconciler
                .reconcile(&self.config.component_name, severity)
                .await;
        }
        severity
    }

    /// Spawn the two loops for this monitor.
    ///
    /// The poll loop runs at a fixed rate (`period`); an overrunning poll
    /// delays the next tick instead of piling up, so at most one poll per
    /// target is ever in flight. The evaluation loop runs with a fixed
    /// delay (`anomalies.period`) measured from the end of each
    /// evaluation. Both first runs are pushed back by the configured
    /// initial delay plus up to one minute of jitter.
    pub fn schedule(
        self: Arc<Self>,
        shutdown: watch::Receiver<bool>,
    ) -> (JoinHandle<()>, JoinHandle<()>) {
        info!(
            component = %self.config.component_name,
            target = %self.config.target,
            period = ?self.config.period,
            "monitor scheduled"
        );

        let monitor = Arc::clone(&self);
        let mut poll_shutdown = shutdown.clone();
        let poll_handle = tokio::spawn(async move {
            let delay =
                monitor.config.initial_delay + startup_jitter(&mut rand::thread_rng());
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = poll_shutdown.changed() => return,
            }

            let mut ticker = tokio::time::interval(monitor.config.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => monitor.poll().await,
                    _ = poll_shutdown.changed() => {
                        debug!(component = %monitor.config.component_name, "poll loop shutting down");
                        break;
                    }
                }
            }
        });

        let monitor = self;
        let mut eval_shutdown = shutdown;
        let eval_handle = tokio::spawn(async move {
            let delay = monitor.config.anomalies.initial_delay
                + startup_jitter(&mut rand::thread_rng());
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = eval_shutdown.changed() => return,
            }

            loop {
                monitor.detect_anomalies().await;
                tokio::select! {
                    _ = tokio::time::sleep(monitor.config.anomalies.period) => {}
                    _ = eval_shutdown.changed() => {
                        debug!(component = %monitor.config.component_name, "evaluation loop shutting down");
                        break;
                    }
                }
            }
        });

        (poll_handle, eval_handle)
    }
}
