//! Periodic sync scheduling.
//!
//! [`SyncScheduler`] owns a background tokio task that calls
//! [`SyncOrchestrator::sync_all`] on a fixed interval. It is constructed
//! explicitly and started/stopped by its owner; nothing here is global.
//!
//! Runs never overlap: scheduled ticks and [`SyncScheduler::run_now`] share
//! one lock, and ticks missed while a run is in progress are skipped.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{Mutex as AsyncMutex, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::sync::{FullSyncResult, SyncOrchestrator};

/// Default interval between scheduled runs.
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(15 * 60);

const MIN_SYNC_INTERVAL: Duration = Duration::from_secs(1);

struct RunningTask {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

pub struct SyncScheduler {
    orchestrator: Arc<SyncOrchestrator>,
    interval: Duration,
    run_on_start: bool,
    run_lock: Arc<AsyncMutex<()>>,
    task: Mutex<Option<RunningTask>>,
}

impl SyncScheduler {
    /// Create a stopped scheduler. Intervals below one second are raised to
    /// one second.
    pub fn new(orchestrator: Arc<SyncOrchestrator>, interval: Duration) -> Self {
        Self {
            orchestrator,
            interval: interval.max(MIN_SYNC_INTERVAL),
            run_on_start: true,
            run_lock: Arc::new(AsyncMutex::new(())),
            task: Mutex::new(None),
        }
    }

    /// Whether the first run happens immediately on `start` (default) or
    /// after one interval.
    #[must_use]
    pub fn with_run_on_start(mut self, run_on_start: bool) -> Self {
        self.run_on_start = run_on_start;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Spawn the scheduling task. Returns `false` if it was already running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) -> bool {
        let mut slot = self.task.lock().unwrap_or_else(|e| e.into_inner());
        if slot.as_ref().is_some_and(|t| !t.handle.is_finished()) {
            tracing::warn!("Sync scheduler is already running");
            return false;
        }

        let (shutdown, shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn(run_loop(
            Arc::clone(&self.orchestrator),
            Arc::clone(&self.run_lock),
            self.interval,
            self.run_on_start,
            shutdown_rx,
        ));
        *slot = Some(RunningTask { shutdown, handle });

        tracing::info!(
            interval_secs = self.interval.as_secs(),
            run_on_start = self.run_on_start,
            "Sync scheduler started"
        );
        true
    }

    /// Signal the task to stop and wait for it. A run in progress finishes
    /// first. Returns `false` if the scheduler was not running.
    pub async fn stop(&self) -> bool {
        let task = self.task.lock().unwrap_or_else(|e| e.into_inner()).take();
        let Some(task) = task else {
            tracing::warn!("Sync scheduler is not running");
            return false;
        };

        // The receiver is gone if the task already exited; nothing to signal then.
        let _ = task.shutdown.send(());
        if let Err(e) = task.handle.await {
            tracing::error!("Sync scheduler task ended abnormally: {}", e);
        }

        tracing::info!("Sync scheduler stopped");
        true
    }

    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .is_some_and(|t| !t.handle.is_finished())
    }

    /// Run a full sync now, waiting for any scheduled run to finish first.
    pub async fn run_now(&self) -> FullSyncResult {
        tracing::info!("Manual sync triggered");
        run_job(&self.orchestrator, &self.run_lock).await
    }
}

async fn run_loop(
    orchestrator: Arc<SyncOrchestrator>,
    run_lock: Arc<AsyncMutex<()>>,
    interval: Duration,
    run_on_start: bool,
    mut shutdown: oneshot::Receiver<()>,
) {
    let first = if run_on_start {
        Instant::now()
    } else {
        Instant::now() + interval
    };
    let mut ticker = tokio::time::interval_at(first, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                run_job(&orchestrator, &run_lock).await;
            }
        }
    }
}

async fn run_job(orchestrator: &SyncOrchestrator, run_lock: &AsyncMutex<()>) -> FullSyncResult {
    let _guard = run_lock.lock().await;

    let full = orchestrator.sync_all().await;
    if full.was_successful() {
        tracing::info!(
            inserted = full.total_inserted(),
            updated = full.total_updated(),
            deleted = full.total_deleted(),
            "Sync finished"
        );
    } else {
        for (name, failure) in full.failures() {
            tracing::error!(entity = %name, "Sync of {} failed: {}", name, failure);
        }
        tracing::warn!(
            errors = full.total_errors(),
            failed_kinds = full.error_count,
            "Sync finished with errors"
        );
    }
    full
}
