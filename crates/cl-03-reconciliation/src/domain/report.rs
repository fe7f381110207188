//! Sync sweep report.

use serde::Serialize;

/// Outcome counters of one sweep.
///
/// - `processed`: well-formed, non-deleted records enumerated
/// - `updated`: records whose ledger-derived fields changed
/// - `invalidated`: records newly marked invalid
/// - `skipped`: records already invalid
/// - `errored`: records left untouched because of an error
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub processed: usize,
    pub updated: usize,
    pub invalidated: usize,
    pub skipped: usize,
    pub errored: usize,
    /// `(record id, reason)` per errored record.
    pub errors: Vec<(String, String)>,
}

impl SyncReport {
    pub fn record_error(&mut self, id: impl Into<String>, reason: impl Into<String>) {
        self.errored += 1;
        self.errors.push((id.into(), reason.into()));
    }

    /// Number of records written by the sweep.
    pub fn written(&self) -> usize {
        self.updated + self.invalidated
    }
}
