//! Domain layer for the ledger gateway.

pub mod revert;

pub use revert::{classify_revert, revert_reasons};
