//! # cl-05-campaign-admin
//!
//! Administrative operations on campaigns.
//!
//! - **Create**: ledger first, cache second. The cache record is written
//!   only after the create transaction confirms, under the ledger id taken
//!   from the receipt.
//! - **Update status**: ledger transaction, then a fresh reconciliation.
//! - **Soft delete**: sets `deleted`, which is never cleared.
//! - **Re-validate**: the only path that clears `invalid`.
//!
//! Callers must be the ledger admin or on the configured whitelist. The
//! ledger still enforces its own admin check on every mutation.

pub mod domain;
pub mod error;
pub mod service;

pub use domain::{CreatedCampaign, NewCampaign, DEFAULT_DURATION_SECS};
pub use error::{AdminError, AdminResult};
pub use service::{AdminConfig, CampaignAdmin};
