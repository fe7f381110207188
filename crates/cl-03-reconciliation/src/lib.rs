//! # cl-03-reconciliation
//!
//! Keeps the document cache in line with the ledger.
//!
//! ## Overview
//!
//! - **Reconciler**: `reconcile(record, ledger_view, now)` computes the
//!   canonical merged view and the minimal patch of ledger-derived fields.
//!   `ReconcilerService` loads, reads, merges and merge-writes one record.
//! - **Eligibility Engine**: `eligibility(view, user, prior_markers)` is a
//!   pure function granting vote / like rights and a status label.
//! - **Sync Batch Job**: `SyncJob::run_sync` sweeps every non-deleted record
//!   and commits all patches atomically.
//!
//! ## Trust Rules
//!
//! | Record state | Ledger read ok          | Ledger id unknown | Other ledger failure |
//! |--------------|-------------------------|-------------------|----------------------|
//! | normal       | merge changed fields    | invalidate        | error, no write      |
//! | `invalid`    | unchanged               | unchanged         | unchanged            |
//! | `deleted`    | unchanged               | unchanged         | unchanged            |
//!
//! `invalid` is cleared only by `ReconcilerApi::revalidate`, which reads
//! past any ledger read cache.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;
pub mod sync;

pub use domain::{
    eligibility, reconcile, CampaignMergedView, Eligibility, Reconciliation, StatusLabel,
    SyncReport,
};
pub use error::{ReconcileError, ReconcileResult, SyncError, SyncResult};
pub use ports::inbound::{CampaignSnapshot, ReconcileOutcome, ReconcilerApi, SyncApi};
pub use service::{ReconcilerConfig, ReconcilerService};
pub use sync::{SyncConfig, SyncJob};
