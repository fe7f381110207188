//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implementations of the ledger ports.

mod cached_reader;
mod memory_ledger;

pub use cached_reader::{CachedLedgerReader, LedgerCacheConfig};
pub use memory_ledger::InMemoryLedger;
