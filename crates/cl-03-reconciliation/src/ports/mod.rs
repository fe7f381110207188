//! Ports layer. Outbound dependencies are the `LedgerReader` and
//! `CacheStore` ports of cl-01 and cl-02.

pub mod inbound;
