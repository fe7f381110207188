//! # Service Container
//!
//! Owns the adapters and services and shares them by `Arc`.
//!
//! ```text
//! InMemoryLedger ──► CachedLedgerReader ──► ReconcilerService ──► CampaignAdmin
//!        │                   │                    │
//!        │                   └──────────────► SyncJob
//!        └──(writer)──► ActionRecorder ◄── InMemoryCacheStore
//! ```

use crate::config::RuntimeConfig;
use cl_01_ledger_gateway::{CachedLedgerReader, InMemoryLedger, LedgerReader};
use cl_02_cache_store::InMemoryCacheStore;
use cl_03_reconciliation::{ReconcilerService, SyncApi, SyncError, SyncJob, SyncReport};
use cl_04_action_recorder::ActionRecorder;
use cl_05_campaign_admin::CampaignAdmin;
use shared_types::{SystemTimeSource, TimeSource};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

/// Ledger reader shared by reconciliation, sync and administration.
pub type Reader = CachedLedgerReader<InMemoryLedger>;

pub type Reconciler = ReconcilerService<Reader, InMemoryCacheStore>;
pub type Sweeper = SyncJob<Reader, InMemoryCacheStore>;
pub type Recorder = ActionRecorder<InMemoryLedger, InMemoryCacheStore>;
pub type Admin = CampaignAdmin<Reader, InMemoryLedger, InMemoryCacheStore>;

/// All subsystems wired onto the in-memory adapters.
pub struct CampaignRuntime {
    pub config: RuntimeConfig,
    pub time: Arc<dyn TimeSource>,
    pub ledger: Arc<InMemoryLedger>,
    pub reader: Arc<Reader>,
    pub store: Arc<InMemoryCacheStore>,
    pub reconciler: Arc<Reconciler>,
    pub sync: Sweeper,
    pub recorder: Recorder,
    pub admin: Admin,
}

impl CampaignRuntime {
    /// Wire against the wall clock.
    pub fn new(config: RuntimeConfig) -> Self {
        Self::with_time(config, Arc::new(SystemTimeSource))
    }

    pub fn with_time(config: RuntimeConfig, time: Arc<dyn TimeSource>) -> Self {
        let ledger = Arc::new(InMemoryLedger::new(
            config.ledger_admin.clone(),
            Arc::clone(&time),
        ));
        let reader = Arc::new(CachedLedgerReader::new(
            Arc::clone(&ledger),
            config.ledger_cache.clone(),
        ));
        let store = Arc::new(InMemoryCacheStore::new());

        let reconciler = Arc::new(ReconcilerService::new(
            Arc::clone(&reader),
            Arc::clone(&store),
            Arc::clone(&time),
            config.reconciler.clone(),
        ));
        let sync = SyncJob::new(
            Arc::clone(&reader),
            Arc::clone(&store),
            Arc::clone(&time),
            config.sync.clone(),
        );
        let recorder = ActionRecorder::new(
            Arc::clone(&ledger),
            Arc::clone(&store),
            Arc::clone(&time),
            config.recorder.clone(),
        )
        .with_ledger_reader(Arc::clone(&reader) as Arc<dyn LedgerReader>);
        let admin = CampaignAdmin::new(
            Arc::clone(&reader),
            Arc::clone(&ledger),
            Arc::clone(&store),
            Arc::clone(&reconciler),
            Arc::clone(&time),
            config.admin.clone(),
        );

        info!(
            ledger_admin = %config.ledger_admin,
            whitelist = config.admin.whitelist.len(),
            max_concurrent_reads = config.sync.max_concurrent_reads,
            "[runtime] subsystems wired"
        );

        Self {
            config,
            time,
            ledger,
            reader,
            store,
            reconciler,
            sync,
            recorder,
            admin,
        }
    }

    /// One sync sweep, logged.
    pub async fn sweep(&self) -> Result<SyncReport, SyncError> {
        match self.sync.run_sync().await {
            Ok(report) => {
                info!(
                    processed = report.processed,
                    updated = report.updated,
                    invalidated = report.invalidated,
                    skipped = report.skipped,
                    errored = report.errored,
                    "[runtime] sweep finished"
                );
                Ok(report)
            }
            Err(err) => {
                error!(error = %err, "[runtime] sweep aborted");
                Err(err)
            }
        }
    }

    /// Sweep every `interval` until `shutdown` resolves.
    ///
    /// A failed sweep is logged and the loop carries on; the next sweep
    /// re-derives everything from the ledger. Returns the number of sweeps
    /// that completed.
    pub async fn run_periodic<F>(&self, interval: Duration, shutdown: F) -> u64
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        let mut completed = 0;
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!(completed, "[runtime] shutdown requested");
                    break;
                }
                _ = ticker.tick() => {
                    if self.sweep().await.is_ok() {
                        completed += 1;
                    }
                }
            }
        }
        completed
    }
}
