//! # Campaign-Ledger Test Suite
//!
//! Cross-subsystem scenarios run against the same wiring the
//! `campaign-sync` binary uses, on a manually driven clock.
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── harness.rs         # runtime + clock fixture
//!     ├── actions.rs         # at-most-once likes and votes
//!     ├── reconciliation.rs  # merge-only writes, expiry, monotonic invalid
//!     ├── sweep.rs           # batch sync job
//!     └── admin.rs           # create / status / delete / re-validate
//! ```
//!
//! ```bash
//! cargo test -p cl-tests
//! cargo test -p cl-tests integration::sweep::
//! ```

pub mod integration;
