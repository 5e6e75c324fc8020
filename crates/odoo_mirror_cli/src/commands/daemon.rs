use std::sync::Arc;

use odoo_mirror::SyncScheduler;

use crate::config::Config;
use crate::shutdown;

use super::sync::build_orchestrator;

pub(crate) async fn handle_daemon(
    interval_minutes: Option<u64>,
    no_initial_sync: bool,
    config: &Config,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let orchestrator = Arc::new(build_orchestrator(config, database_url).await?);
    let run_on_start = config.sync.run_on_start && !no_initial_sync;

    let scheduler = SyncScheduler::new(orchestrator, config.sync_interval(interval_minutes))
        .with_run_on_start(run_on_start);

    tracing::info!(
        interval_secs = scheduler.interval().as_secs(),
        run_on_start,
        "Starting sync daemon"
    );
    scheduler.start();

    let waited = shutdown::wait_for_shutdown().await;

    scheduler.stop().await;
    tracing::info!("Sync daemon stopped");

    waited.map_err(Into::into)
}
