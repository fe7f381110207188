//! # cl-02-cache-store
//!
//! Durable document store holding the derived campaign cache.
//!
//! ## Overview
//!
//! - **Documents**: schemaless JSON objects addressed by `DocumentPath`.
//! - **Merge writes**: only the supplied fields are written; concurrent
//!   writers touching disjoint fields never clobber each other.
//! - **Compare-and-create**: `create_if_absent` fails over to
//!   `CreateOutcome::AlreadyExists` instead of overwriting. This is the only
//!   concurrency-control primitive in the system.
//! - **Atomic increment** for counters with no ledger counterpart
//!   (`likeCount`, `commentCount`).
//! - **Atomic batch commit** used by the sync sweep.
//!
//! ## Boundary Validation
//!
//! Raw documents are turned into typed records in `domain::codec`. Missing
//! optional fields are normalised; missing or mistyped required fields are
//! rejected with `StoreError::MalformedDocument`.

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::InMemoryCacheStore;
pub use domain::{RecordFilter, RecordListing};
pub use ports::outbound::{CacheStore, CampaignStore, CreateOutcome};
