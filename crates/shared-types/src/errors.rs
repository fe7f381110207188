//! # Error Types
//!
//! Errors that cross subsystem boundaries: ledger access and cache access.

use crate::entities::LedgerId;
use thiserror::Error;

/// Errors raised by the ledger reader/writer ports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Ledger id was never created. Triggers invalidation.
    #[error("Campaign {ledger_id} does not exist on the ledger")]
    NotFound { ledger_id: LedgerId },

    /// Network / timeout. Retry later, no state change.
    #[error("Transient ledger failure: {reason}")]
    Transient { reason: String },

    /// Acting account has no voting weight (or no funds to pay for it).
    #[error("Insufficient voting weight: {reason}")]
    InsufficientWeight { reason: String },

    /// The ledger refused the mutation (already voted, window closed, ...).
    #[error("Rejected by ledger: {reason}")]
    Rejected { reason: String },

    /// Wallet-level rejection.
    #[error("Transaction rejected by user")]
    UserCancelled,

    /// Handle does not name a submitted transaction.
    #[error("Unknown transaction: {tx_hash}")]
    UnknownTransaction { tx_hash: String },
}

impl LedgerError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LedgerError::NotFound { .. })
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, LedgerError::Transient { .. })
    }
}

/// Errors raised by the cache store port.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Target document does not exist.
    #[error("Document not found: {path}")]
    NotFound { path: String },

    /// Document failed boundary validation.
    #[error("Malformed document at {path}: {reason}")]
    MalformedDocument { path: String, reason: String },

    /// Field targeted by an increment is not an unsigned integer.
    #[error("Field {field} at {path} is not numeric")]
    NotNumeric { path: String, field: String },

    /// Write could not be applied.
    #[error("Write failed at {path}: {reason}")]
    WriteFailed { path: String, reason: String },

    /// Atomic batch was rejected as a whole.
    #[error("Batch commit failed: {reason}")]
    BatchFailed { reason: String },

    /// Store unreachable.
    #[error("Store unavailable: {reason}")]
    Unavailable { reason: String },
}

pub type LedgerResult<T> = Result<T, LedgerError>;
pub type StoreResult<T> = Result<T, StoreError>;
