//! Ports layer. Outbound dependencies are `LedgerWriter` / `LedgerReader`
//! (cl-01) and `CacheStore` (cl-02).

pub mod inbound;
