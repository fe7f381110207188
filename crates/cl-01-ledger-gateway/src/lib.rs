//! # cl-01-ledger-gateway
//!
//! Read-only and mutating access to the authoritative campaign ledger.
//!
//! ## Overview
//!
//! - **Ledger Reader**: campaign views, campaign count, admin identity.
//!   Pure queries with no side effects.
//! - **Ledger Writer**: submits create / status-update / vote intents and
//!   reports the eventual confirmation.
//! - **Revert classification**: raw ledger failure messages are mapped onto
//!   `LedgerError` kinds the rest of the system can act on.
//!
//! ## Architecture
//!
//! ```text
//! Reconciler (3) ──read_campaign──→ CachedLedgerReader ──miss/stale──→ Ledger
//! Recorder (4) ──submit_vote / await_confirmation──────────────────→ Ledger
//! Admin (5) ──submit_create / submit_status_update─────────────────→ Ledger
//! ```
//!
//! ## Staleness
//!
//! `CachedLedgerReader` serves views for a bounded window. A stale view may
//! refresh tallies and status but is never used to clear an `invalid` flag;
//! administrative re-validation reads through `read_campaign_fresh`.

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::{CachedLedgerReader, InMemoryLedger, LedgerCacheConfig};
pub use domain::revert::{classify_revert, revert_reasons};
pub use ports::outbound::{LedgerReader, LedgerWriter};
