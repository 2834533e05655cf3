//! vigild — the Vigil monitoring daemon.
//!
//! Single binary that assembles the agent:
//! - Configuration load + default/override resolution
//! - Shared pooled HTTP transport
//! - One reconciler per configured status page (initial blocking fetch,
//!   then a periodic cache refresh)
//! - Two scheduled loops per monitored target (poll + evaluate)
//!
//! # Usage
//!
//! ```text
//! vigild --configuration /etc/vigil/config.json [--status-pages /etc/vigil/pages.json]
//! ```
//!
//! The process runs until Ctrl-C, a startup/config failure, or a panic in
//! a monitoring loop. A panicking loop is treated as a systemic fault and
//! terminates the whole process rather than silently leaving one target
//! unmonitored.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use vigil_config::Config;
use vigil_monitor::HttpStatusMonitor;
use vigil_status::{ComponentRegistry, Reconciler, StatusPageIo};

#[derive(Parser)]
#[command(name = "vigild", about = "Vigil health-monitoring agent", version)]
struct Cli {
    /// Configuration file (JSON).
    #[arg(short = 'c', long = "configuration", value_name = "FILE")]
    configuration: PathBuf,

    /// Separate status pages configuration file (JSON); replaces the
    /// main file's `status_pages` section.
    #[arg(short = 's', long = "status-pages", value_name = "FILE")]
    status_pages: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,vigild=debug,vigil=debug".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    run(cli).await
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    info!("vigil agent starting");

    let raw = vigil_config::load_raw(&cli.configuration)?;
    let overlay = match &cli.status_pages {
        Some(path) => Some(vigil_config::load_status_pages(path)?),
        None => None,
    };
    let config = Config::resolve(raw, overlay)?;
    info!(
        monitors = config.monitors.len(),
        status_pages = config.status_pages.len(),
        "configuration loaded"
    );

    // One pooled transport shared by polls and backend calls.
    let client = reqwest::Client::builder()
        .user_agent(concat!("vigil/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Backends. The component cache must be populated before any monitor
    // evaluates, so the first fetch is awaited here and a failure aborts
    // startup.
    let mut reconcilers = Vec::new();
    let mut refresh_handles = Vec::new();
    for page in &config.status_pages {
        let backend = Arc::new(StatusPageIo::new(client.clone(), page));
        let reconciler = Reconciler::new(backend as Arc<dyn ComponentRegistry>, page.fetch_rate);
        let count = reconciler.refresh().await?;
        info!(page_id = %page.page_id, components = count, "status page initialized");
        refresh_handles.push(reconciler.spawn_refresh_loop(shutdown_rx.clone()));
        reconcilers.push(reconciler);
    }

    // Monitors: two loops per target, supervised through a JoinSet.
    let mut loops: JoinSet<Result<(), tokio::task::JoinError>> = JoinSet::new();
    for monitor_config in config.monitors {
        let monitor = Arc::new(HttpStatusMonitor::new(
            monitor_config,
            client.clone(),
            reconcilers.clone(),
        ));
        let (poll_handle, eval_handle) = monitor.schedule(shutdown_rx.clone());
        loops.spawn(poll_handle);
        loops.spawn(eval_handle);
    }

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                let _ = shutdown_tx.send(true);
                break;
            }
            Some(joined) = loops.join_next() => {
                match joined {
                    // A panicking loop means the runtime is compromised:
                    // fail fast instead of leaving stale statuses public.
                    Ok(Err(e)) if e.is_panic() => {
                        error!(error = %e, "monitor loop panicked");
                        let _ = shutdown_tx.send(true);
                        return Err(anyhow::anyhow!("fatal monitor fault: {e}"));
                    }
                    Err(e) if e.is_panic() => {
                        error!(error = %e, "monitor supervision task panicked");
                        let _ = shutdown_tx.send(true);
                        return Err(anyhow::anyhow!("fatal monitor fault: {e}"));
                    }
                    Ok(Err(e)) | Err(e) => {
                        debug!(error = %e, "monitor loop cancelled");
                    }
                    Ok(Ok(())) => {
                        warn!("monitor loop exited unexpectedly");
                    }
                }
            }
        }
    }

    // Let the remaining loops wind down.
    while loops.join_next().await.is_some() {}
    for handle in refresh_handles {
        let _ = handle.await;
    }

    info!("vigil agent stopped");
    Ok(())
}
