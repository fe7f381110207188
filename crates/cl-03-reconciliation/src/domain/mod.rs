//! Domain layer: pure functions, no I/O.

pub mod eligibility;
pub mod merge;
pub mod report;

pub use eligibility::{eligibility, Eligibility, StatusLabel};
pub use merge::{invalidate, is_live, reconcile, resolve_status, CampaignMergedView, Reconciliation};
pub use report::SyncReport;
