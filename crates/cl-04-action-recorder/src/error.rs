//! Error types for the action recorder
//!
//! `AlreadyRecorded` is deliberately absent: a duplicate action is a
//! successful no-op (`ActionOutcome::AlreadyRecorded`).

use shared_types::{LedgerError, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecorderError {
    /// Acting account has no voting weight
    #[error("Insufficient voting weight: {reason}")]
    InsufficientWeight { reason: String },

    /// The ledger refused the vote; reason is the ledger's own message
    #[error("Rejected by ledger: {reason}")]
    RejectedByLedger { reason: String },

    /// Wallet declined to sign
    #[error("Transaction rejected by user")]
    UserCancelled,

    /// Network / timeout talking to the ledger
    #[error("Ledger temporarily unavailable: {reason}")]
    TransientReadFailure { reason: String },

    /// The ledger (or marker) write succeeded but a follow-up cache write
    /// failed. A later reconciliation heals ledger-derived fields.
    #[error("Cache write failed after the action was accepted: {reason}")]
    PersistenceFailure {
        tx_hash: Option<String>,
        reason: String,
    },

    #[error("Campaign not found: {campaign_id}")]
    CampaignNotFound { campaign_id: String },

    #[error("Comment not found: {campaign_id}/{comment_id}")]
    CommentNotFound {
        campaign_id: String,
        comment_id: String,
    },

    /// Local pre-check refused the action
    #[error("Action not permitted: {reason}")]
    Ineligible { reason: String },

    /// A vote by this user on this campaign is already being submitted
    #[error("A vote for this campaign is already awaiting confirmation")]
    SubmissionInFlight,

    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Cache store error: {0}")]
    Store(#[from] StoreError),
}

impl From<LedgerError> for RecorderError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InsufficientWeight { reason } => RecorderError::InsufficientWeight { reason },
            LedgerError::Rejected { reason } => RecorderError::RejectedByLedger { reason },
            LedgerError::UserCancelled => RecorderError::UserCancelled,
            LedgerError::NotFound { .. } => RecorderError::RejectedByLedger {
                reason: err.to_string(),
            },
            LedgerError::Transient { reason } => RecorderError::TransientReadFailure { reason },
            LedgerError::UnknownTransaction { .. } => RecorderError::TransientReadFailure {
                reason: err.to_string(),
            },
        }
    }
}

pub type RecorderResult<T> = Result<T, RecorderError>;
