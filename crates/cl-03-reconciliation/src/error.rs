//! Error types for the reconciliation subsystem

use shared_types::{LedgerError, LedgerId, StoreError};
use thiserror::Error;

/// Errors from reconciling a single campaign.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// No cache record under this id
    #[error("Campaign record not found: {campaign_id}")]
    RecordNotFound { campaign_id: String },

    /// Record is soft-deleted; no ledger trust is applied
    #[error("Campaign {campaign_id} is deleted")]
    Deleted { campaign_id: String },

    /// Ledger read failed for a reason other than an unknown id.
    /// Nothing was written.
    #[error("Ledger read failed for campaign {ledger_id}: {error}")]
    TransientReadFailure {
        ledger_id: LedgerId,
        #[source]
        error: LedgerError,
    },

    /// Re-validation could not confirm the ledger mapping
    #[error("Ledger id {ledger_id} does not resolve to a campaign")]
    MappingUnconfirmed { ledger_id: LedgerId },

    #[error("Cache store error: {0}")]
    Store(#[from] StoreError),
}

/// Errors that abort a whole sync sweep. Per-record failures are reported
/// in `SyncReport` instead.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Failed to enumerate cached campaigns: {0}")]
    Enumerate(#[source] StoreError),

    #[error("Ledger campaign count unavailable: {0}")]
    CountUnavailable(#[source] LedgerError),

    #[error("Atomic commit of {patches} patches failed: {error}")]
    CommitFailed {
        patches: usize,
        #[source]
        error: StoreError,
    },
}

pub type ReconcileResult<T> = Result<T, ReconcileError>;
pub type SyncResult<T> = Result<T, SyncError>;
