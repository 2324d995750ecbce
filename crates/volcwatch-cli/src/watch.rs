//! Periodic refresh loop.
//!
//! Runs one refresh immediately, then registers a repeated job on a
//! [`JobScheduler`]. A failed cycle leaves the last good snapshot in place
//! and re-emits it with a warning about its age. Cycles are not serialized
//! against each other; if two overlap, the one that finishes last replaces
//! the snapshot.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tokio_cron_scheduler::{Job, JobScheduler};
use volcwatch_core::AppConfig;
use volcwatch_sources::HansClient;

use crate::refresh::{refresh_snapshot, Snapshot};
use crate::render::{render_snapshot, OutputFormat};

pub(crate) async fn run_watch(
    config: AppConfig,
    interval_secs: u64,
    include_monitored: bool,
    format: OutputFormat,
) -> anyhow::Result<()> {
    anyhow::ensure!(interval_secs > 0, "refresh interval must be at least 1 second");

    let config = Arc::new(config);
    let client = Arc::new(HansClient::from_config(&config)?);
    let latest: Arc<RwLock<Option<Snapshot>>> = Arc::new(RwLock::new(None));

    run_cycle(&client, &config, include_monitored, format, &latest).await;

    let mut scheduler = JobScheduler::new().await?;
    let job = {
        let client = Arc::clone(&client);
        let config = Arc::clone(&config);
        let latest = Arc::clone(&latest);
        Job::new_repeated_async(Duration::from_secs(interval_secs), move |_uuid, _lock| {
            let client = Arc::clone(&client);
            let config = Arc::clone(&config);
            let latest = Arc::clone(&latest);

            Box::pin(async move {
                run_cycle(&client, &config, include_monitored, format, &latest).await;
            })
        })?
    };
    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!(interval_secs, "watching volcano status; press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;

    tracing::info!("shutting down refresh scheduler");
    scheduler.shutdown().await?;
    Ok(())
}

async fn run_cycle(
    client: &HansClient,
    config: &AppConfig,
    include_monitored: bool,
    format: OutputFormat,
    latest: &RwLock<Option<Snapshot>>,
) {
    let snapshot = match refresh_snapshot(client, config, include_monitored).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "volcano refresh failed; keeping last snapshot");
            if let Some(rendered) = stale_output(latest, format, Utc::now()).await {
                print!("{rendered}");
            }
            return;
        }
    };

    match render_snapshot(&snapshot, format) {
        Ok(rendered) => print!("{rendered}"),
        Err(e) => tracing::error!(error = %e, "failed to render volcano snapshot"),
    }

    let count = snapshot.records.len();
    let previous = latest.write().await.replace(snapshot);
    tracing::debug!(
        count,
        previous_count = previous.map(|p| p.records.len()),
        "volcano snapshot replaced"
    );
}

/// The last good snapshot rendered again, or `None` before the first success.
async fn stale_output(
    latest: &RwLock<Option<Snapshot>>,
    format: OutputFormat,
    now: DateTime<Utc>,
) -> Option<String> {
    let guard = latest.read().await;
    let Some(snapshot) = guard.as_ref() else {
        tracing::warn!("no earlier volcano snapshot to fall back to");
        return None;
    };

    tracing::warn!(
        age_secs = (now - snapshot.refreshed_at).num_seconds(),
        count = snapshot.records.len(),
        refreshed_at = %snapshot.refreshed_at,
        "showing last good volcano snapshot"
    );
    match render_snapshot(snapshot, format) {
        Ok(rendered) => Some(rendered),
        Err(e) => {
            tracing::error!(error = %e, "failed to render volcano snapshot");
            None
        }
    }
}
