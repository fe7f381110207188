//! Error types for campaign administration

use cl_03_reconciliation::ReconcileError;
use shared_types::{Address, LedgerError, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdminError {
    /// Caller is neither the ledger admin nor whitelisted
    #[error("Address {user} is not an administrator")]
    Unauthorized { user: Address },

    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Campaign not found: {campaign_id}")]
    CampaignNotFound { campaign_id: String },

    #[error("Campaign {campaign_id} is deleted")]
    Deleted { campaign_id: String },

    /// Ledger refused or failed the transaction
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Create confirmed but the receipt carried no campaign id
    #[error("Transaction {tx_hash} confirmed without a campaign id")]
    MissingCampaignId { tx_hash: String },

    /// Ledger succeeded but the cache write did not
    #[error("Cache write failed after transaction {tx_hash}: {reason}")]
    PersistenceFailure { tx_hash: String, reason: String },

    #[error("Reconciliation failed: {0}")]
    Reconcile(#[from] ReconcileError),

    #[error("Cache store error: {0}")]
    Store(#[from] StoreError),
}

pub type AdminResult<T> = Result<T, AdminError>;
