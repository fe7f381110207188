//! Driving Ports (API - Inbound)

use crate::domain::{ActionOutcome, PendingVote, VoteOutcome};
use crate::error::RecorderResult;
use async_trait::async_trait;
use shared_types::{Address, Comment, VoteOption};

/// At-most-once recording of user actions.
#[async_trait]
pub trait ActionRecorderApi: Send + Sync {
    /// Like a campaign. Idempotent per (campaign, user).
    async fn record_like(&self, campaign_id: &str, user: &Address) -> RecorderResult<ActionOutcome>;

    /// Like a comment. Idempotent per (comment, user).
    async fn record_comment_like(
        &self,
        campaign_id: &str,
        comment_id: &str,
        user: &Address,
    ) -> RecorderResult<ActionOutcome>;

    /// Submit a weighted vote and record it once the ledger confirms.
    ///
    /// Local tallies are never touched; they follow on the next
    /// reconciliation.
    async fn record_vote(
        &self,
        campaign_id: &str,
        user: &Address,
        option: VoteOption,
        weight: u64,
    ) -> RecorderResult<VoteOutcome>;

    /// Store a comment verbatim and bump the campaign's comment count.
    async fn add_comment(
        &self,
        campaign_id: &str,
        user: &Address,
        text: &str,
    ) -> RecorderResult<Comment>;

    /// Vote submission currently awaiting confirmation, if any.
    fn pending_vote(&self, campaign_id: &str, user: &Address) -> Option<PendingVote>;
}
