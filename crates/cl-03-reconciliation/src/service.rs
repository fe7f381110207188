//! Reconciler Service
//!
//! Loads a cache record, reads its ledger view, runs the pure merge and
//! issues a merge write only for the fields that changed.

use crate::domain::{eligibility, invalidate, reconcile, CampaignMergedView, Reconciliation};
use crate::error::{ReconcileError, ReconcileResult};
use crate::ports::inbound::{CampaignSnapshot, ReconcileOutcome, ReconcilerApi};
use async_trait::async_trait;
use cl_01_ledger_gateway::LedgerReader;
use cl_02_cache_store::{CacheStore, CampaignStore};
use shared_types::{
    Address, CampaignCacheRecord, CampaignLedgerView, LedgerId, LedgerResult, PriorMarkers,
    TimeSource,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Reconciler configuration
#[derive(Clone, Debug, Default)]
pub struct ReconcilerConfig {
    /// Bypass the ledger read cache on every read.
    pub always_fresh_reads: bool,
}

/// Reconciles single campaigns on demand.
pub struct ReconcilerService<L, S> {
    ledger: Arc<L>,
    store: Arc<S>,
    time: Arc<dyn TimeSource>,
    config: ReconcilerConfig,
}

impl<L: LedgerReader, S: CacheStore> ReconcilerService<L, S> {
    pub fn new(
        ledger: Arc<L>,
        store: Arc<S>,
        time: Arc<dyn TimeSource>,
        config: ReconcilerConfig,
    ) -> Self {
        Self {
            ledger,
            store,
            time,
            config,
        }
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    async fn load(&self, campaign_id: &str) -> ReconcileResult<CampaignCacheRecord> {
        self.store
            .get_record(campaign_id)
            .await?
            .ok_or_else(|| ReconcileError::RecordNotFound {
                campaign_id: campaign_id.to_string(),
            })
    }

    async fn read_ledger(&self, ledger_id: LedgerId, fresh: bool) -> LedgerResult<CampaignLedgerView> {
        if fresh || self.config.always_fresh_reads {
            self.ledger.read_campaign_fresh(ledger_id).await
        } else {
            self.ledger.read_campaign(ledger_id).await
        }
    }

    async fn reconcile_record(
        &self,
        record: &CampaignCacheRecord,
        fresh: bool,
    ) -> ReconcileResult<ReconcileOutcome> {
        let now = self.time.now();
        if !record.accepts_ledger_updates() {
            debug!(
                campaign_id = %record.id,
                deleted = record.deleted,
                invalid = record.invalid,
                "[cl-03] record excluded from ledger trust"
            );
            return Ok(ReconcileOutcome {
                view: CampaignMergedView::from_cache(record, now),
                changed: false,
            });
        }

        let reconciliation = match self.read_ledger(record.ledger_id, fresh).await {
            Ok(view) => reconcile(record, &view, now),
            Err(err) if err.is_not_found() => {
                warn!(
                    campaign_id = %record.id,
                    ledger_id = record.ledger_id,
                    "[cl-03] ledger id does not resolve, invalidating"
                );
                invalidate(record, now)
            }
            Err(error) => {
                return Err(ReconcileError::TransientReadFailure {
                    ledger_id: record.ledger_id,
                    error,
                })
            }
        };
        self.persist(&record.id, reconciliation).await
    }

    async fn persist(
        &self,
        campaign_id: &str,
        reconciliation: Reconciliation,
    ) -> ReconcileResult<ReconcileOutcome> {
        let changed = reconciliation.changed();
        if changed {
            self.store
                .merge_patch(campaign_id, &reconciliation.patch)
                .await?;
            info!(
                campaign_id = %campaign_id,
                patch = ?reconciliation.patch,
                "[cl-03] cache record reconciled"
            );
        }
        Ok(ReconcileOutcome {
            view: reconciliation.view,
            changed,
        })
    }
}

#[async_trait]
impl<L: LedgerReader, S: CacheStore> ReconcilerApi for ReconcilerService<L, S> {
    async fn reconcile_campaign(&self, campaign_id: &str) -> ReconcileResult<ReconcileOutcome> {
        let record = self.load(campaign_id).await?;
        self.reconcile_record(&record, false).await
    }

    async fn reconcile_campaign_fresh(
        &self,
        campaign_id: &str,
    ) -> ReconcileResult<ReconcileOutcome> {
        let record = self.load(campaign_id).await?;
        self.reconcile_record(&record, true).await
    }

    async fn revalidate(&self, campaign_id: &str) -> ReconcileResult<ReconcileOutcome> {
        let record = self.load(campaign_id).await?;
        if record.deleted {
            return Err(ReconcileError::Deleted {
                campaign_id: record.id,
            });
        }
        let now = self.time.now();

        let count = self
            .ledger
            .read_campaign_count_fresh()
            .await
            .map_err(|error| ReconcileError::TransientReadFailure {
                ledger_id: record.ledger_id,
                error,
            })?;
        if record.ledger_id >= count {
            debug!(
                campaign_id = %record.id,
                ledger_id = record.ledger_id,
                count,
                "[cl-03] ledger id beyond campaign count"
            );
            self.persist(&record.id, invalidate(&record, now)).await?;
            return Err(ReconcileError::MappingUnconfirmed {
                ledger_id: record.ledger_id,
            });
        }

        let ledger = match self.ledger.read_campaign_fresh(record.ledger_id).await {
            Ok(view) => view,
            Err(err) if err.is_not_found() => {
                self.persist(&record.id, invalidate(&record, now)).await?;
                return Err(ReconcileError::MappingUnconfirmed {
                    ledger_id: record.ledger_id,
                });
            }
            Err(error) => {
                return Err(ReconcileError::TransientReadFailure {
                    ledger_id: record.ledger_id,
                    error,
                })
            }
        };

        let mut trusted = record.clone();
        trusted.invalid = false;
        let mut reconciliation = reconcile(&trusted, &ledger, now);
        if record.invalid {
            reconciliation.patch.invalid = Some(false);
            info!(
                campaign_id = %record.id,
                ledger_id = record.ledger_id,
                "[cl-03] ledger mapping confirmed, clearing invalid flag"
            );
        }
        self.persist(&record.id, reconciliation).await
    }

    async fn campaign_snapshot(
        &self,
        campaign_id: &str,
        user: Option<&Address>,
    ) -> ReconcileResult<CampaignSnapshot> {
        let record = self.load(campaign_id).await?;
        let (view, from_cache_only) = match self.reconcile_record(&record, false).await {
            Ok(outcome) => (outcome.view, false),
            Err(ReconcileError::TransientReadFailure { error, .. }) => {
                warn!(
                    campaign_id = %campaign_id,
                    error = %error,
                    "[cl-03] ledger unavailable, serving cached fields"
                );
                (CampaignMergedView::from_cache(&record, self.time.now()), true)
            }
            Err(other) => return Err(other),
        };

        let prior = match user {
            Some(user) => self.store.prior_markers(campaign_id, user).await?,
            None => PriorMarkers::none(),
        };

        let mut grant = eligibility(&view, user, &prior);
        if let (Some(user), true) = (user, grant.is_votable) {
            // A confirmed vote whose marker write failed is only visible on the ledger.
            match self.ledger.has_voted(record.ledger_id, user).await {
                Ok(true) => {
                    debug!(
                        campaign_id = %campaign_id,
                        user = %user,
                        "[cl-03] vote found on ledger without a marker"
                    );
                    grant.is_votable = false;
                }
                Ok(false) => {}
                Err(error) => {
                    warn!(
                        campaign_id = %campaign_id,
                        error = %error,
                        "[cl-03] has_voted unavailable, using markers only"
                    );
                }
            }
        }

        Ok(CampaignSnapshot {
            eligibility: grant,
            view,
            from_cache_only,
        })
    }
}
