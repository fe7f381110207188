//! # Merge
//!
//! Pure reconciliation of one cache record against one ledger view.
//!
//! ## Status Resolution
//!
//! | Ledger state                                | Resolved status |
//! |---------------------------------------------|-----------------|
//! | `is_deleted` or index outside 0..=3         | `Ended`         |
//! | `Live`, `end_time > now`                    | `Live`          |
//! | `Live`, `end_time <= now` (or unset)        | `Ended`         |
//! | `Created`/`Active`/`Approved`, any end      | as on ledger    |
//! | `Ended`                                     | `Ended`         |
//!
//! Only `Live` is resolved against the clock.

use shared_types::{
    Address, CampaignCacheRecord, CampaignLedgerView, CampaignPatch, CampaignStatus, LedgerId,
    SocialLinks, UnixSeconds,
};

/// Canonical view of a campaign: ledger truth for tallies, status, end
/// date and abstain permission, cache truth for everything else. Never persisted as such.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CampaignMergedView {
    pub campaign_id: String,
    pub ledger_id: LedgerId,
    pub author: Address,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub social_links: SocialLinks,
    pub created_at: UnixSeconds,
    pub yes_votes: u64,
    pub no_votes: u64,
    pub abstain_votes: u64,
    pub status: CampaignStatus,
    pub end_date: Option<UnixSeconds>,
    pub allow_abstain: bool,
    pub comment_count: u64,
    pub like_count: u64,
    /// Voting window open right now.
    pub is_live: bool,
    pub invalid: bool,
    pub deleted: bool,
}

impl CampaignMergedView {
    /// View built from the cache alone (ledger unavailable or not trusted).
    pub fn from_cache(record: &CampaignCacheRecord, now: UnixSeconds) -> Self {
        let is_live = record.accepts_ledger_updates()
            && record.cached_status == CampaignStatus::Live
            && record.cached_end_date.is_some_and(|end| end > now);
        Self {
            campaign_id: record.id.clone(),
            ledger_id: record.ledger_id,
            author: record.author.clone(),
            title: record.title.clone(),
            content: record.content.clone(),
            image: record.image.clone(),
            social_links: record.social_links.clone(),
            created_at: record.created_at,
            yes_votes: record.cached_yes_votes,
            no_votes: record.cached_no_votes,
            abstain_votes: record.cached_abstain_votes,
            status: record.cached_status,
            end_date: record.cached_end_date,
            allow_abstain: record.allow_abstain,
            comment_count: record.comment_count,
            like_count: record.like_count,
            is_live,
            invalid: record.invalid,
            deleted: record.deleted,
        }
    }

    pub fn total_votes(&self) -> u64 {
        self.yes_votes
            .saturating_add(self.no_votes)
            .saturating_add(self.abstain_votes)
    }
}

/// Result of a reconciliation: the merged view and the minimal patch that
/// brings the stored record in line with it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reconciliation {
    pub view: CampaignMergedView,
    pub patch: CampaignPatch,
}

impl Reconciliation {
    pub fn changed(&self) -> bool {
        !self.patch.is_empty()
    }

    fn unchanged(record: &CampaignCacheRecord, now: UnixSeconds) -> Self {
        Self {
            view: CampaignMergedView::from_cache(record, now),
            patch: CampaignPatch::default(),
        }
    }
}

/// `isLive`: raw status is `Live` and the ledger window has not closed.
pub fn is_live(ledger: &CampaignLedgerView, now: UnixSeconds) -> bool {
    !ledger.is_deleted
        && CampaignStatus::from_ledger_index(ledger.status_raw) == CampaignStatus::Live
        && ledger.end_time > now
}

/// Map ledger state onto the five-stage lifecycle at `now`.
pub fn resolve_status(ledger: &CampaignLedgerView, now: UnixSeconds) -> CampaignStatus {
    if ledger.is_deleted {
        return CampaignStatus::Ended;
    }
    match CampaignStatus::from_ledger_index(ledger.status_raw) {
        CampaignStatus::Live if !is_live(ledger, now) => CampaignStatus::Ended,
        status => status,
    }
}

/// Reconcile `record` against a ledger view read at `now`.
///
/// Deleted and invalid records are returned as-is with an empty patch.
pub fn reconcile(
    record: &CampaignCacheRecord,
    ledger: &CampaignLedgerView,
    now: UnixSeconds,
) -> Reconciliation {
    if !record.accepts_ledger_updates() {
        return Reconciliation::unchanged(record, now);
    }

    let status = resolve_status(ledger, now);
    // an unset ledger end never erases a known one
    let end_date = if ledger.has_end_time() {
        Some(ledger.end_time)
    } else {
        record.cached_end_date
    };

    let mut patch = CampaignPatch::default();
    if record.cached_yes_votes != ledger.yes_votes {
        patch.cached_yes_votes = Some(ledger.yes_votes);
    }
    if record.cached_no_votes != ledger.no_votes {
        patch.cached_no_votes = Some(ledger.no_votes);
    }
    if record.cached_abstain_votes != ledger.abstain_votes {
        patch.cached_abstain_votes = Some(ledger.abstain_votes);
    }
    if record.cached_status != status {
        patch.cached_status = Some(status);
    }
    if record.cached_end_date != end_date {
        patch.cached_end_date = end_date;
    }
    if record.allow_abstain != ledger.allow_abstain {
        patch.allow_abstain = Some(ledger.allow_abstain);
    }

    let mut merged = record.clone();
    patch.apply_to(&mut merged);
    if merged.title.is_empty() {
        merged.title = ledger.title.clone();
    }

    let mut view = CampaignMergedView::from_cache(&merged, now);
    view.is_live = is_live(ledger, now);

    Reconciliation { view, patch }
}

/// Reconciliation for a ledger id that does not resolve.
///
/// Already-invalid and deleted records are left alone.
pub fn invalidate(record: &CampaignCacheRecord, now: UnixSeconds) -> Reconciliation {
    if !record.accepts_ledger_updates() {
        return Reconciliation::unchanged(record, now);
    }
    let patch = CampaignPatch::invalidation();
    let mut merged = record.clone();
    patch.apply_to(&mut merged);
    Reconciliation {
        view: CampaignMergedView::from_cache(&merged, now),
        patch,
    }
}
