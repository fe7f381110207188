//! # Sync Batch Job
//!
//! Sweeps every non-deleted cache record against the ledger.
//!
//! 1. Enumerate records and read the ledger campaign count once. Either
//!    failing aborts the sweep before anything is written.
//! 2. Records whose `ledger_id` is at or beyond the count are invalidated
//!    without a ledger read.
//! 3. The remaining records are read concurrently (bounded by
//!    `max_concurrent_reads`) and reconciled. A failed read is recorded in
//!    the report and the sweep moves on.
//! 4. All patches are committed in one atomic batch.
//!
//! The sweep only writes what differs from the ledger, so re-running it
//! after an aborted commit converges to the same state.

use crate::domain::{reconcile, SyncReport};
use crate::error::{SyncError, SyncResult};
use crate::ports::inbound::SyncApi;
use async_trait::async_trait;
use cl_01_ledger_gateway::LedgerReader;
use cl_02_cache_store::{CacheStore, CampaignStore, RecordFilter};
use shared_types::{CampaignPatch, LedgerError, TimeSource};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Sync sweep configuration
#[derive(Clone, Debug)]
pub struct SyncConfig {
    /// Upper bound on in-flight ledger reads.
    pub max_concurrent_reads: usize,
    /// Read through `read_campaign_fresh` instead of the read cache.
    pub fresh_reads: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_concurrent_reads: 8,
            fresh_reads: true,
        }
    }
}

pub struct SyncJob<L, S> {
    ledger: Arc<L>,
    store: Arc<S>,
    time: Arc<dyn TimeSource>,
    config: SyncConfig,
}

impl<L, S> SyncJob<L, S>
where
    L: LedgerReader + 'static,
    S: CacheStore,
{
    pub fn new(ledger: Arc<L>, store: Arc<S>, time: Arc<dyn TimeSource>, config: SyncConfig) -> Self {
        Self {
            ledger,
            store,
            time,
            config,
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }
}

#[async_trait]
impl<L, S> SyncApi for SyncJob<L, S>
where
    L: LedgerReader + 'static,
    S: CacheStore,
{
    async fn run_sync(&self) -> SyncResult<SyncReport> {
        let started = Instant::now();
        let listing = self
            .store
            .list_where(&RecordFilter::not_deleted())
            .await
            .map_err(SyncError::Enumerate)?;
        let count = if self.config.fresh_reads {
            self.ledger.read_campaign_count_fresh().await
        } else {
            self.ledger.read_campaign_count().await
        }
        .map_err(SyncError::CountUnavailable)?;
        let now = self.time.now();

        let mut report = SyncReport::default();
        for (id, err) in listing.malformed {
            report.record_error(id, err.to_string());
        }

        let mut patches: Vec<(String, CampaignPatch)> = Vec::new();
        let limiter = Arc::new(Semaphore::new(self.config.max_concurrent_reads.max(1)));
        let mut reads = JoinSet::new();

        for record in listing.records {
            report.processed += 1;
            if record.invalid {
                report.skipped += 1;
                continue;
            }
            if record.ledger_id >= count {
                debug!(
                    campaign_id = %record.id,
                    ledger_id = record.ledger_id,
                    count,
                    "[cl-03] ledger id out of range"
                );
                patches.push((record.id, CampaignPatch::invalidation()));
                report.invalidated += 1;
                continue;
            }

            let ledger = Arc::clone(&self.ledger);
            let limiter = Arc::clone(&limiter);
            let fresh = self.config.fresh_reads;
            reads.spawn(async move {
                let result = match limiter.acquire_owned().await {
                    Ok(_permit) if fresh => ledger.read_campaign_fresh(record.ledger_id).await,
                    Ok(_permit) => ledger.read_campaign(record.ledger_id).await,
                    Err(_) => Err(LedgerError::Transient {
                        reason: "read limiter closed".to_string(),
                    }),
                };
                (record, result)
            });
        }

        while let Some(joined) = reads.join_next().await {
            let (record, result) = match joined {
                Ok(pair) => pair,
                Err(join_err) => {
                    error!(error = %join_err, "[cl-03] ledger read task failed");
                    report.record_error("<unknown>", join_err.to_string());
                    continue;
                }
            };
            match result {
                Ok(view) => {
                    let reconciliation = reconcile(&record, &view, now);
                    if reconciliation.changed() {
                        report.updated += 1;
                        patches.push((record.id, reconciliation.patch));
                    }
                }
                Err(err) if err.is_not_found() => {
                    patches.push((record.id, CampaignPatch::invalidation()));
                    report.invalidated += 1;
                }
                Err(err) => {
                    warn!(
                        campaign_id = %record.id,
                        ledger_id = record.ledger_id,
                        error = %err,
                        "[cl-03] ledger read failed, record left untouched"
                    );
                    report.record_error(record.id, err.to_string());
                }
            }
        }

        patches.sort_by(|a, b| a.0.cmp(&b.0));
        report.errors.sort();

        if !patches.is_empty() {
            self.store
                .commit_patches(&patches)
                .await
                .map_err(|error| SyncError::CommitFailed {
                    patches: patches.len(),
                    error,
                })?;
        }

        info!(
            processed = report.processed,
            updated = report.updated,
            invalidated = report.invalidated,
            skipped = report.skipped,
            errored = report.errored,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "[cl-03] sync sweep complete"
        );
        Ok(report)
    }
}
