//! Ports module for the cache store

pub mod outbound;

pub use outbound::{CacheStore, CampaignStore, CreateOutcome};
