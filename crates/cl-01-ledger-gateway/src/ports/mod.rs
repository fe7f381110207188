//! Ports module for the ledger gateway

pub mod outbound;

pub use outbound::{LedgerReader, LedgerWriter};
