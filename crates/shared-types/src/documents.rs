//! # Document Paths
//!
//! Logical layout of the cache store:
//!
//! ```text
//! campaigns/{campaign_id}
//! campaigns/{campaign_id}/likes/{address}
//! campaigns/{campaign_id}/votes/{address}
//! campaigns/{campaign_id}/comments/{comment_id}
//! campaigns/{campaign_id}/comments/{comment_id}/likes/{address}
//! ```
//!
//! Marker documents are keyed by the lowercase user address, so the natural
//! document key is the uniqueness constraint for at-most-once actions.

use crate::entities::{ActionKind, ActionTarget, Address};
use std::fmt;

/// A schemaless document as held by the store.
pub type Document = serde_json::Map<String, serde_json::Value>;

pub const CAMPAIGNS: &str = "campaigns";
pub const LIKES: &str = "likes";
pub const VOTES: &str = "votes";
pub const COMMENTS: &str = "comments";

/// Path to a collection (odd number of segments).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionPath(Vec<String>);

impl CollectionPath {
    pub fn campaigns() -> Self {
        Self(vec![CAMPAIGNS.to_string()])
    }

    pub fn comments(campaign_id: &str) -> Self {
        Self(vec![
            CAMPAIGNS.to_string(),
            campaign_id.to_string(),
            COMMENTS.to_string(),
        ])
    }

    /// Document inside this collection.
    pub fn doc(&self, key: impl Into<String>) -> DocumentPath {
        let mut segments = self.0.clone();
        segments.push(key.into());
        DocumentPath(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

/// Path to a document (even number of segments).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentPath(Vec<String>);

impl DocumentPath {
    pub fn campaign(campaign_id: &str) -> Self {
        CollectionPath::campaigns().doc(campaign_id)
    }

    pub fn comment(campaign_id: &str, comment_id: &str) -> Self {
        CollectionPath::comments(campaign_id).doc(comment_id)
    }

    /// Marker document for `(target, kind, user)`.
    ///
    /// Comment targets only carry likes; a vote/like kind on a comment
    /// target still resolves under the comment's `likes` collection.
    pub fn marker(target: &ActionTarget, kind: ActionKind, user: &Address) -> Self {
        match target {
            ActionTarget::Campaign { campaign_id } => {
                let sub = match kind {
                    ActionKind::Vote => VOTES,
                    ActionKind::Like | ActionKind::CommentLike => LIKES,
                };
                Self(vec![
                    CAMPAIGNS.to_string(),
                    campaign_id.clone(),
                    sub.to_string(),
                    user.as_str().to_string(),
                ])
            }
            ActionTarget::Comment {
                campaign_id,
                comment_id,
            } => Self(vec![
                CAMPAIGNS.to_string(),
                campaign_id.clone(),
                COMMENTS.to_string(),
                comment_id.clone(),
                LIKES.to_string(),
                user.as_str().to_string(),
            ]),
        }
    }

    /// Document the counter for `target` lives on.
    pub fn counter_owner(target: &ActionTarget) -> Self {
        match target {
            ActionTarget::Campaign { campaign_id } => Self::campaign(campaign_id),
            ActionTarget::Comment {
                campaign_id,
                comment_id,
            } => Self::comment(campaign_id, comment_id),
        }
    }

    /// Final segment (the document key).
    pub fn key(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or_default()
    }

    /// Collection containing this document.
    pub fn parent(&self) -> CollectionPath {
        CollectionPath(self.0[..self.0.len().saturating_sub(1)].to_vec())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}
