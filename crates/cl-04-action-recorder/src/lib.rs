//! # cl-04-action-recorder
//!
//! Records user actions so that none is ever counted twice.
//!
//! ## Guarantees
//!
//! - **Like / comment-like**: the marker document (keyed by the user's
//!   address) is created with compare-and-create before the counter is
//!   incremented. Of any number of concurrent calls exactly one increments.
//! - **Vote**: the ledger is the guard. The vote is submitted, confirmation
//!   awaited, and only then is the marker written. Local tallies are never
//!   incremented; the next reconciliation reads them from the ledger.
//! - **No automatic retries** of ledger-mutating calls.
//!
//! ## Vote States
//!
//! ```text
//! Unrecorded ──submit──→ Submitting (in-process only) ──confirmed──→ Recorded
//!                              │
//!                              └──failed / cancelled──→ Unrecorded
//! ```
//!
//! `Submitting` is visible through `pending_vote()` for an optimistic
//! "pending confirmation" indicator and is never persisted.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use domain::{ActionOutcome, PendingVote, VoteOutcome};
pub use error::{RecorderError, RecorderResult};
pub use ports::inbound::ActionRecorderApi;
pub use service::{ActionRecorder, RecorderConfig};
