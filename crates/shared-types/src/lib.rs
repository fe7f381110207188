//! # Shared Types Crate
//!
//! This crate contains the campaign data model shared by every subsystem.
//!
//! ## Design Principles
//!
//! - **Ledger is authoritative**: `CampaignLedgerView` is an immutable snapshot
//!   of chain state; a newer read always supersedes an older one.
//! - **Cache is derived**: `CampaignCacheRecord` holds a reconciled copy of the
//!   ledger fields plus off-chain-only attributes (content, likes, comments).
//! - **Merge-only writes**: every cache mutation is expressed as a
//!   `CampaignPatch` (a subset of fields), never a full-record replacement.
//! - **Markers gate actions**: a `UserActionMarker` document's existence is the
//!   at-most-once guarantee for like / vote / comment-like.

pub mod documents;
pub mod entities;
pub mod errors;
pub mod time;

pub use documents::*;
pub use entities::*;
pub use errors::*;
pub use time::*;
