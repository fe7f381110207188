//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Ledger**: `CampaignLedgerView`, `TxHandle`, `TxReceipt`, `TxConfirmation`
//! - **Cache**: `CampaignCacheRecord`, `CampaignPatch`, `Comment`
//! - **Actions**: `ActionKind`, `ActionTarget`, `UserActionMarker`

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// CLUSTER A: IDENTIFIERS
// =============================================================================

/// Index of a campaign on the ledger. Stable once assigned.
pub type LedgerId = u64;

/// Unix timestamp in seconds.
pub type UnixSeconds = u64;

/// A wallet address.
///
/// Always held in lowercase so it can double as a document key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Normalise a raw address (trim + lowercase).
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Address {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<&str> for Address {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

// =============================================================================
// CLUSTER B: LIFECYCLE
// =============================================================================

/// Campaign lifecycle stage.
///
/// The ledger stores this as an index: 0 Created, 1 Active, 2 Live,
/// 3 Approved, 4 Ended. The ledger also uses index 5 for its own
/// deletion marker, which the cache never distinguishes from `Ended`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CampaignStatus {
    Created,
    Active,
    Live,
    Approved,
    Ended,
}

impl CampaignStatus {
    pub const ALL: [CampaignStatus; 5] = [
        CampaignStatus::Created,
        CampaignStatus::Active,
        CampaignStatus::Live,
        CampaignStatus::Approved,
        CampaignStatus::Ended,
    ];

    /// Map a raw ledger index. Anything outside 0..=3 is `Ended`.
    pub fn from_ledger_index(raw: u8) -> Self {
        match raw {
            0 => CampaignStatus::Created,
            1 => CampaignStatus::Active,
            2 => CampaignStatus::Live,
            3 => CampaignStatus::Approved,
            _ => CampaignStatus::Ended,
        }
    }

    pub fn ledger_index(self) -> u8 {
        match self {
            CampaignStatus::Created => 0,
            CampaignStatus::Active => 1,
            CampaignStatus::Live => 2,
            CampaignStatus::Approved => 3,
            CampaignStatus::Ended => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CampaignStatus::Created => "Created",
            CampaignStatus::Active => "Active",
            CampaignStatus::Live => "Live",
            CampaignStatus::Approved => "Approved",
            CampaignStatus::Ended => "Ended",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(raw.trim()))
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ledger index used for a ledger-side deleted campaign.
pub const LEDGER_STATUS_DELETED: u8 = 5;

/// Ballot option.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteOption {
    Yes,
    No,
    Abstain,
}

impl VoteOption {
    /// Vote type index on the ledger.
    pub fn ledger_index(self) -> u8 {
        match self {
            VoteOption::Yes => 0,
            VoteOption::No => 1,
            VoteOption::Abstain => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VoteOption::Yes => "yes",
            VoteOption::No => "no",
            VoteOption::Abstain => "abstain",
        }
    }
}

impl fmt::Display for VoteOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// CLUSTER C: LEDGER
// =============================================================================

/// Authoritative campaign state as read from the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignLedgerView {
    pub id: LedgerId,
    pub title: String,
    /// Raw status index; see `CampaignStatus::from_ledger_index`.
    pub status_raw: u8,
    pub yes_votes: u64,
    pub no_votes: u64,
    pub abstain_votes: u64,
    pub start_time: UnixSeconds,
    /// `0` means no end is set on the ledger.
    pub end_time: UnixSeconds,
    pub allow_abstain: bool,
    pub is_deleted: bool,
}

impl CampaignLedgerView {
    pub fn has_end_time(&self) -> bool {
        self.end_time > 0
    }
}

/// Handle to a submitted ledger transaction.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxHandle {
    pub tx_hash: String,
}

impl TxHandle {
    pub fn new(tx_hash: impl Into<String>) -> Self {
        Self {
            tx_hash: tx_hash.into(),
        }
    }
}

impl fmt::Display for TxHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tx_hash)
    }
}

/// Receipt of a confirmed transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub tx_hash: String,
    pub block_number: u64,
    /// Ledger id assigned by a confirmed create-campaign transaction.
    pub created_campaign: Option<LedgerId>,
}

/// Final outcome of a submitted transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TxConfirmation {
    Confirmed(TxReceipt),
    Failed { reason: String },
}

// =============================================================================
// CLUSTER D: CACHE
// =============================================================================

/// Document field names used by the cache. Kept in one place so partial
/// writes and atomic increments agree on spelling.
pub mod fields {
    pub const LEDGER_ID: &str = "ledgerId";
    pub const AUTHOR: &str = "author";
    pub const CACHED_YES_VOTES: &str = "cachedYesVotes";
    pub const CACHED_NO_VOTES: &str = "cachedNoVotes";
    pub const CACHED_ABSTAIN_VOTES: &str = "cachedAbstainVotes";
    pub const CACHED_STATUS: &str = "cachedStatus";
    pub const CACHED_END_DATE: &str = "cachedEndDate";
    pub const COMMENT_COUNT: &str = "commentCount";
    pub const LIKE_COUNT: &str = "likeCount";
    pub const INVALID: &str = "invalid";
    pub const DELETED: &str = "deleted";
}

/// Optional social links shown next to a campaign.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discord: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// Off-chain campaign record.
///
/// `id` is the opaque document key; it is not stored inside the document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignCacheRecord {
    #[serde(skip)]
    pub id: String,
    pub ledger_id: LedgerId,
    pub author: Address,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub social_links: SocialLinks,
    pub created_at: UnixSeconds,
    pub cached_yes_votes: u64,
    pub cached_no_votes: u64,
    pub cached_abstain_votes: u64,
    pub cached_status: CampaignStatus,
    pub cached_end_date: Option<UnixSeconds>,
    pub allow_abstain: bool,
    pub comment_count: u64,
    pub like_count: u64,
    pub invalid: bool,
    pub deleted: bool,
}

impl CampaignCacheRecord {
    /// Fresh record for a campaign the ledger has just confirmed.
    pub fn new(id: impl Into<String>, ledger_id: LedgerId, author: Address) -> Self {
        Self {
            id: id.into(),
            ledger_id,
            author,
            title: String::new(),
            content: String::new(),
            image: None,
            social_links: SocialLinks::default(),
            created_at: 0,
            cached_yes_votes: 0,
            cached_no_votes: 0,
            cached_abstain_votes: 0,
            cached_status: CampaignStatus::Created,
            cached_end_date: None,
            allow_abstain: false,
            comment_count: 0,
            like_count: 0,
            invalid: false,
            deleted: false,
        }
    }

    /// Whether ledger truth may still be applied to this record.
    pub fn accepts_ledger_updates(&self) -> bool {
        !self.deleted && !self.invalid
    }
}

/// Partial-field update of a `CampaignCacheRecord`.
///
/// Only `Some` fields are serialized, so a store merges exactly the fields
/// present and leaves everything else (comment counts, likes, content) alone.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_yes_votes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_no_votes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_abstain_votes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_status: Option<CampaignStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_end_date: Option<UnixSeconds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_abstain: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,
}

impl CampaignPatch {
    /// Patch applied when a ledger id cannot be resolved.
    pub fn invalidation() -> Self {
        Self {
            invalid: Some(true),
            cached_status: Some(CampaignStatus::Ended),
            ..Self::default()
        }
    }

    /// Admin soft delete.
    pub fn soft_delete() -> Self {
        Self {
            deleted: Some(true),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn is_invalidation(&self) -> bool {
        self.invalid == Some(true)
    }

    /// Apply the patch to an in-memory record, mirroring a store merge.
    pub fn apply_to(&self, record: &mut CampaignCacheRecord) {
        if let Some(v) = self.cached_yes_votes {
            record.cached_yes_votes = v;
        }
        if let Some(v) = self.cached_no_votes {
            record.cached_no_votes = v;
        }
        if let Some(v) = self.cached_abstain_votes {
            record.cached_abstain_votes = v;
        }
        if let Some(v) = self.cached_status {
            record.cached_status = v;
        }
        if let Some(v) = self.cached_end_date {
            record.cached_end_date = Some(v);
        }
        if let Some(v) = self.allow_abstain {
            record.allow_abstain = v;
        }
        if let Some(v) = self.invalid {
            record.invalid = v;
        }
        if let Some(v) = self.deleted {
            record.deleted = v;
        }
    }
}

/// A stored comment. Text is kept verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(skip)]
    pub id: String,
    pub text: String,
    pub user: Address,
    pub timestamp: UnixSeconds,
    #[serde(default)]
    pub like_count: u64,
}

// =============================================================================
// CLUSTER E: ACTIONS
// =============================================================================

/// Kind of user action guarded by a marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    Like,
    Vote,
    CommentLike,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Like => f.write_str("like"),
            ActionKind::Vote => f.write_str("vote"),
            ActionKind::CommentLike => f.write_str("comment-like"),
        }
    }
}

/// Entity an action is recorded against.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ActionTarget {
    Campaign { campaign_id: String },
    Comment {
        campaign_id: String,
        comment_id: String,
    },
}

impl ActionTarget {
    pub fn campaign(campaign_id: impl Into<String>) -> Self {
        ActionTarget::Campaign {
            campaign_id: campaign_id.into(),
        }
    }

    pub fn comment(campaign_id: impl Into<String>, comment_id: impl Into<String>) -> Self {
        ActionTarget::Comment {
            campaign_id: campaign_id.into(),
            comment_id: comment_id.into(),
        }
    }

    pub fn campaign_id(&self) -> &str {
        match self {
            ActionTarget::Campaign { campaign_id } => campaign_id,
            ActionTarget::Comment { campaign_id, .. } => campaign_id,
        }
    }
}

/// Per-user, per-action, per-entity marker. Append-only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserActionMarker {
    pub kind: ActionKind,
    pub user: Address,
    pub recorded_at: UnixSeconds,
    /// Chosen option (vote markers only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option: Option<VoteOption>,
    /// Confirmed transaction (vote markers only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
}

impl UserActionMarker {
    pub fn like(kind: ActionKind, user: Address, recorded_at: UnixSeconds) -> Self {
        Self {
            kind,
            user,
            recorded_at,
            option: None,
            tx_hash: None,
        }
    }

    pub fn vote(
        user: Address,
        option: VoteOption,
        tx_hash: impl Into<String>,
        recorded_at: UnixSeconds,
    ) -> Self {
        Self {
            kind: ActionKind::Vote,
            user,
            recorded_at,
            option: Some(option),
            tx_hash: Some(tx_hash.into()),
        }
    }
}

/// Markers already held by one user for one campaign.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PriorMarkers {
    pub like: Option<UserActionMarker>,
    pub vote: Option<UserActionMarker>,
}

impl PriorMarkers {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn voted_option(&self) -> Option<VoteOption> {
        self.vote.as_ref().and_then(|m| m.option)
    }
}
