//! Driving Ports (API - Inbound)

use crate::domain::{CampaignMergedView, Eligibility, SyncReport};
use crate::error::{ReconcileResult, SyncResult};
use async_trait::async_trait;
use shared_types::Address;

/// Result of reconciling one campaign.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub view: CampaignMergedView,
    /// A merge write was issued.
    pub changed: bool,
}

/// Merged view plus the acting user's grants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CampaignSnapshot {
    pub view: CampaignMergedView,
    pub eligibility: Eligibility,
    /// Built from cached fields because the ledger could not be read.
    pub from_cache_only: bool,
}

/// Primary reconciliation API.
#[async_trait]
pub trait ReconcilerApi: Send + Sync {
    /// Reconcile one cache record against its ledger view and merge-write
    /// the changed ledger-derived fields.
    ///
    /// An unknown ledger id invalidates the record. Any other ledger
    /// failure is returned without touching the cache.
    async fn reconcile_campaign(&self, campaign_id: &str) -> ReconcileResult<ReconcileOutcome>;

    /// Same as `reconcile_campaign` but bypassing the ledger read cache.
    async fn reconcile_campaign_fresh(&self, campaign_id: &str)
        -> ReconcileResult<ReconcileOutcome>;

    /// Administrative override: clear `invalid` once a fresh ledger read
    /// confirms the mapping. Never called by the sweep.
    async fn revalidate(&self, campaign_id: &str) -> ReconcileResult<ReconcileOutcome>;

    /// Reconciled view with per-user eligibility. Falls back to cached
    /// fields when the ledger is transiently unavailable.
    async fn campaign_snapshot(
        &self,
        campaign_id: &str,
        user: Option<&Address>,
    ) -> ReconcileResult<CampaignSnapshot>;
}

/// Operator-triggered sweep.
#[async_trait]
pub trait SyncApi: Send + Sync {
    async fn run_sync(&self) -> SyncResult<SyncReport>;
}
