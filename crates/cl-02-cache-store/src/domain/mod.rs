//! Domain layer for the cache store.

pub mod codec;

use shared_types::{CampaignCacheRecord, LedgerId, StoreError};

/// Predicate for `list_where`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub include_deleted: bool,
    pub include_invalid: bool,
    pub ledger_id: Option<LedgerId>,
}

impl RecordFilter {
    /// Every record that has not been soft-deleted.
    pub fn not_deleted() -> Self {
        Self {
            include_deleted: false,
            include_invalid: true,
            ledger_id: None,
        }
    }

    pub fn all() -> Self {
        Self {
            include_deleted: true,
            include_invalid: true,
            ledger_id: None,
        }
    }

    pub fn with_ledger_id(mut self, ledger_id: LedgerId) -> Self {
        self.ledger_id = Some(ledger_id);
        self
    }

    pub fn matches(&self, record: &CampaignCacheRecord) -> bool {
        (self.include_deleted || !record.deleted)
            && (self.include_invalid || !record.invalid)
            && self.ledger_id.map_or(true, |id| id == record.ledger_id)
    }
}

/// Result of `list_where`: valid records plus documents that failed
/// boundary validation.
#[derive(Clone, Debug, Default)]
pub struct RecordListing {
    pub records: Vec<CampaignCacheRecord>,
    pub malformed: Vec<(String, StoreError)>,
}
