//! # Document Codec
//!
//! Typed records ⇄ raw documents, validated at the store boundary.
//!
//! Required campaign fields: `ledgerId` (unsigned integer), `author`
//! (string). Everything else is optional and normalised: counters default to
//! `0`, flags to `false`, status to `Created`. Unknown fields are ignored.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared_types::{
    Address, CampaignCacheRecord, CampaignPatch, CampaignStatus, Comment, Document, LedgerId,
    SocialLinks, StoreError, StoreResult, UnixSeconds, UserActionMarker,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCampaignDocument {
    ledger_id: LedgerId,
    author: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    social_links: Option<SocialLinks>,
    #[serde(default)]
    created_at: UnixSeconds,
    #[serde(default)]
    cached_yes_votes: u64,
    #[serde(default)]
    cached_no_votes: u64,
    #[serde(default)]
    cached_abstain_votes: u64,
    #[serde(default)]
    cached_status: Option<CampaignStatus>,
    #[serde(default)]
    cached_end_date: Option<UnixSeconds>,
    #[serde(default)]
    allow_abstain: bool,
    #[serde(default)]
    comment_count: u64,
    #[serde(default)]
    like_count: u64,
    #[serde(default)]
    invalid: bool,
    #[serde(default)]
    deleted: bool,
}

fn malformed(path: &str, err: impl std::fmt::Display) -> StoreError {
    StoreError::MalformedDocument {
        path: path.to_string(),
        reason: err.to_string(),
    }
}

fn to_document<T: Serialize>(path: &str, value: &T) -> StoreResult<Document> {
    match serde_json::to_value(value).map_err(|e| malformed(path, e))? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(malformed(path, format!("expected object, got {other}"))),
    }
}

fn from_document<T: DeserializeOwned>(path: &str, doc: &Document) -> StoreResult<T> {
    serde_json::from_value(serde_json::Value::Object(doc.clone())).map_err(|e| malformed(path, e))
}

/// Decode and normalise a campaign document.
pub fn record_from_document(id: &str, doc: &Document) -> StoreResult<CampaignCacheRecord> {
    let path = format!("campaigns/{id}");
    let raw: RawCampaignDocument = from_document(&path, doc)?;
    let author = Address::new(raw.author);
    if author.is_empty() {
        return Err(malformed(&path, "author must not be empty"));
    }

    Ok(CampaignCacheRecord {
        id: id.to_string(),
        ledger_id: raw.ledger_id,
        author,
        title: raw.title,
        content: raw.content,
        image: raw.image.filter(|s| !s.is_empty()),
        social_links: raw.social_links.unwrap_or_default(),
        created_at: raw.created_at,
        cached_yes_votes: raw.cached_yes_votes,
        cached_no_votes: raw.cached_no_votes,
        cached_abstain_votes: raw.cached_abstain_votes,
        cached_status: raw.cached_status.unwrap_or(CampaignStatus::Created),
        cached_end_date: raw.cached_end_date,
        allow_abstain: raw.allow_abstain,
        comment_count: raw.comment_count,
        like_count: raw.like_count,
        invalid: raw.invalid,
        deleted: raw.deleted,
    })
}

pub fn record_to_document(record: &CampaignCacheRecord) -> StoreResult<Document> {
    to_document(&format!("campaigns/{}", record.id), record)
}

/// Partial document holding only the patch's fields.
pub fn patch_to_document(id: &str, patch: &CampaignPatch) -> StoreResult<Document> {
    to_document(&format!("campaigns/{id}"), patch)
}

pub fn marker_from_document(path: &str, doc: &Document) -> StoreResult<UserActionMarker> {
    from_document(path, doc)
}

pub fn marker_to_document(path: &str, marker: &UserActionMarker) -> StoreResult<Document> {
    to_document(path, marker)
}

pub fn comment_from_document(path: &str, id: &str, doc: &Document) -> StoreResult<Comment> {
    let mut comment: Comment = from_document(path, doc)?;
    comment.id = id.to_string();
    Ok(comment)
}

pub fn comment_to_document(path: &str, comment: &Comment) -> StoreResult<Document> {
    to_document(path, comment)
}
