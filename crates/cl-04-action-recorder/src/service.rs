//! Action Recorder Service
//!
//! ## Likes (campaign and comment)
//!
//! ```text
//! marker exists? ──yes──→ AlreadyRecorded
//!       │no
//! create_if_absent(marker) ──AlreadyExists──→ AlreadyRecorded (lost the race)
//!       │Created
//! atomic_increment(likeCount) ──→ Recorded
//! ```
//!
//! ## Votes
//!
//! ```text
//! marker exists? ──yes──→ AlreadyRecorded
//!       │no
//! local pre-checks → has_voted? ──yes──→ RejectedByLedger (no submission)
//!       │no
//! claim pending slot → submit_vote → await_confirmation
//!       │Confirmed
//! create_if_absent(vote marker) ──→ Recorded
//! ```
//!
//! The marker is written only after full confirmation. Tallies are never
//! incremented here.

use crate::domain::{
    validate_comment, ActionOutcome, PendingVote, PendingVotes, VoteOutcome,
    DEFAULT_MAX_COMMENT_CHARS,
};
use crate::error::{RecorderError, RecorderResult};
use crate::ports::inbound::ActionRecorderApi;
use async_trait::async_trait;
use cl_01_ledger_gateway::{classify_revert, revert_reasons, LedgerReader, LedgerWriter};
use cl_02_cache_store::{CacheStore, CampaignStore, CreateOutcome};
use cl_03_reconciliation::{eligibility, CampaignMergedView, StatusLabel};
use shared_types::{
    fields, ActionKind, ActionTarget, Address, CampaignCacheRecord, Comment, DocumentPath,
    TimeSource, TxConfirmation, UserActionMarker, VoteOption,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Recorder configuration
#[derive(Clone, Debug)]
pub struct RecorderConfig {
    /// Maximum comment length in characters.
    pub max_comment_chars: usize,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            max_comment_chars: DEFAULT_MAX_COMMENT_CHARS,
        }
    }
}

pub struct ActionRecorder<W, S> {
    writer: Arc<W>,
    store: Arc<S>,
    /// Ledger reads for the already-voted check, and the read cache to
    /// invalidate after a confirmed vote.
    reader: Option<Arc<dyn LedgerReader>>,
    time: Arc<dyn TimeSource>,
    config: RecorderConfig,
    pending: PendingVotes,
}

impl<W: LedgerWriter, S: CacheStore> ActionRecorder<W, S> {
    pub fn new(
        writer: Arc<W>,
        store: Arc<S>,
        time: Arc<dyn TimeSource>,
        config: RecorderConfig,
    ) -> Self {
        Self {
            writer,
            store,
            reader: None,
            time,
            config,
            pending: PendingVotes::new(),
        }
    }

    /// Check the ledger for an existing vote before submitting, and drop the
    /// cached ledger view of a campaign once a vote confirms.
    pub fn with_ledger_reader(mut self, reader: Arc<dyn LedgerReader>) -> Self {
        self.reader = Some(reader);
        self
    }

    fn require_user(user: &Address) -> RecorderResult<()> {
        if user.is_empty() {
            return Err(RecorderError::InvalidInput {
                reason: "an acting user is required".to_string(),
            });
        }
        Ok(())
    }

    async fn load_campaign(&self, campaign_id: &str) -> RecorderResult<CampaignCacheRecord> {
        self.store
            .get_record(campaign_id)
            .await?
            .ok_or_else(|| RecorderError::CampaignNotFound {
                campaign_id: campaign_id.to_string(),
            })
    }

    fn require_not_deleted(record: &CampaignCacheRecord) -> RecorderResult<()> {
        if record.deleted {
            return Err(RecorderError::Ineligible {
                reason: "campaign is deleted".to_string(),
            });
        }
        Ok(())
    }

    /// Marker gate + counter increment shared by campaign and comment likes.
    async fn record_like_on(
        &self,
        target: ActionTarget,
        kind: ActionKind,
        user: &Address,
    ) -> RecorderResult<ActionOutcome> {
        let marker = UserActionMarker::like(kind, user.clone(), self.time.now());
        if self.store.create_marker(&target, &marker).await? == CreateOutcome::AlreadyExists {
            debug!(?target, %user, %kind, "[cl-04] lost marker race, already recorded");
            return Ok(ActionOutcome::AlreadyRecorded);
        }

        let counter = DocumentPath::counter_owner(&target);
        let likes = self
            .store
            .atomic_increment(&counter, fields::LIKE_COUNT, 1)
            .await
            .map_err(|e| {
                error!(path = %counter, error = %e, "[cl-04] marker written but like count not incremented");
                RecorderError::PersistenceFailure {
                    tx_hash: None,
                    reason: e.to_string(),
                }
            })?;
        info!(path = %counter, %user, %kind, likes, "[cl-04] like recorded");
        Ok(ActionOutcome::Recorded)
    }
}

#[async_trait]
impl<W: LedgerWriter, S: CacheStore> ActionRecorderApi for ActionRecorder<W, S> {
    async fn record_like(&self, campaign_id: &str, user: &Address) -> RecorderResult<ActionOutcome> {
        Self::require_user(user)?;
        let record = self.load_campaign(campaign_id).await?;
        let prior = self.store.prior_markers(campaign_id, user).await?;
        if prior.like.is_some() {
            return Ok(ActionOutcome::AlreadyRecorded);
        }

        let view = CampaignMergedView::from_cache(&record, self.time.now());
        let grant = eligibility(&view, Some(user), &prior);
        if !grant.is_likeable {
            return Err(RecorderError::Ineligible {
                reason: format!("campaign is {}", grant.label),
            });
        }
        self.record_like_on(ActionTarget::campaign(campaign_id), ActionKind::Like, user)
            .await
    }

    async fn record_comment_like(
        &self,
        campaign_id: &str,
        comment_id: &str,
        user: &Address,
    ) -> RecorderResult<ActionOutcome> {
        Self::require_user(user)?;
        let record = self.load_campaign(campaign_id).await?;
        Self::require_not_deleted(&record)?;
        if self.store.get_comment(campaign_id, comment_id).await?.is_none() {
            return Err(RecorderError::CommentNotFound {
                campaign_id: campaign_id.to_string(),
                comment_id: comment_id.to_string(),
            });
        }

        let target = ActionTarget::comment(campaign_id, comment_id);
        if self
            .store
            .get_marker(&target, ActionKind::CommentLike, user)
            .await?
            .is_some()
        {
            return Ok(ActionOutcome::AlreadyRecorded);
        }
        self.record_like_on(target, ActionKind::CommentLike, user).await
    }

    async fn record_vote(
        &self,
        campaign_id: &str,
        user: &Address,
        option: VoteOption,
        weight: u64,
    ) -> RecorderResult<VoteOutcome> {
        Self::require_user(user)?;
        let record = self.load_campaign(campaign_id).await?;
        let prior = self.store.prior_markers(campaign_id, user).await?;
        if let Some(marker) = &prior.vote {
            return Ok(VoteOutcome::AlreadyRecorded {
                option: marker.option,
            });
        }

        // Window, status and abstain permission are the ledger's call; the
        // cache may be stale.
        let now = self.time.now();
        let grant = eligibility(&CampaignMergedView::from_cache(&record, now), Some(user), &prior);
        if matches!(grant.label, StatusLabel::Deleted | StatusLabel::Invalid) {
            return Err(RecorderError::Ineligible {
                reason: format!("campaign is {}", grant.label),
            });
        }
        if weight == 0 {
            return Err(RecorderError::InsufficientWeight {
                reason: "voting weight must be greater than zero".to_string(),
            });
        }

        let ledger_id = record.ledger_id;
        if let Some(reader) = &self.reader {
            match reader.has_voted(ledger_id, user).await {
                Ok(true) => {
                    warn!(campaign_id, ledger_id, %user, "[cl-04] vote already on ledger without a marker");
                    return Err(RecorderError::RejectedByLedger {
                        reason: revert_reasons::ALREADY_VOTED.to_string(),
                    });
                }
                Ok(false) => {}
                Err(e) => {
                    debug!(campaign_id, ledger_id, error = %e, "[cl-04] has_voted unavailable, submitting anyway");
                }
            }
        }

        let in_flight = self
            .pending
            .try_begin(campaign_id, user, option, now)
            .ok_or(RecorderError::SubmissionInFlight)?;

        let tx = self
            .writer
            .submit_vote(user, ledger_id, option, weight)
            .await
            .map_err(|e| {
                warn!(campaign_id, ledger_id, %user, error = %e, "[cl-04] vote submission refused");
                RecorderError::from(e)
            })?;
        in_flight.attach(tx.clone());
        debug!(campaign_id, tx_hash = %tx, "[cl-04] vote submitted, awaiting confirmation");

        let receipt = match self.writer.await_confirmation(&tx).await? {
            TxConfirmation::Confirmed(receipt) => receipt,
            TxConfirmation::Failed { reason } => {
                warn!(campaign_id, tx_hash = %tx, reason = %reason, "[cl-04] vote failed on inclusion");
                return Err(classify_revert(Some(ledger_id), &reason).into());
            }
        };

        if let Some(reader) = &self.reader {
            reader.invalidate(ledger_id);
        }

        let marker = UserActionMarker::vote(user.clone(), option, receipt.tx_hash.clone(), self.time.now());
        let created = self
            .store
            .create_marker(&ActionTarget::campaign(campaign_id), &marker)
            .await
            .map_err(|e| {
                error!(
                    campaign_id,
                    tx_hash = %receipt.tx_hash,
                    error = %e,
                    "[cl-04] vote confirmed on ledger but marker write failed"
                );
                RecorderError::PersistenceFailure {
                    tx_hash: Some(receipt.tx_hash.clone()),
                    reason: e.to_string(),
                }
            })?;
        if created == CreateOutcome::AlreadyExists {
            warn!(campaign_id, %user, "[cl-04] vote marker already present after confirmation");
        }

        info!(
            campaign_id,
            ledger_id,
            %user,
            %option,
            tx_hash = %receipt.tx_hash,
            "[cl-04] vote recorded"
        );
        Ok(VoteOutcome::Recorded {
            option,
            tx_hash: receipt.tx_hash,
            block_number: receipt.block_number,
        })
    }

    async fn add_comment(
        &self,
        campaign_id: &str,
        user: &Address,
        text: &str,
    ) -> RecorderResult<Comment> {
        Self::require_user(user)?;
        let text = validate_comment(text, self.config.max_comment_chars)
            .map_err(|reason| RecorderError::InvalidInput { reason })?;
        let record = self.load_campaign(campaign_id).await?;
        Self::require_not_deleted(&record)?;

        let mut comment = Comment {
            id: String::new(),
            text: text.to_string(),
            user: user.clone(),
            timestamp: self.time.now(),
            like_count: 0,
        };
        comment.id = self.store.insert_comment(campaign_id, &comment).await?;

        self.store
            .atomic_increment(&DocumentPath::campaign(campaign_id), fields::COMMENT_COUNT, 1)
            .await
            .map_err(|e| RecorderError::PersistenceFailure {
                tx_hash: None,
                reason: e.to_string(),
            })?;
        debug!(campaign_id, comment_id = %comment.id, "[cl-04] comment added");
        Ok(comment)
    }

    fn pending_vote(&self, campaign_id: &str, user: &Address) -> Option<PendingVote> {
        self.pending.get(campaign_id, user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cl_01_ledger_gateway::InMemoryLedger;
    use cl_02_cache_store::InMemoryCacheStore;
    use shared_types::{
        CampaignStatus, LedgerId, LedgerResult, ManualTimeSource, TxHandle,
    };
    use tokio::sync::Notify;

    const NOW: u64 = 1_700_000_000;

    type Recorder = ActionRecorder<InMemoryLedger, InMemoryCacheStore>;

    struct Harness {
        ledger: Arc<InMemoryLedger>,
        store: Arc<InMemoryCacheStore>,
        time: Arc<ManualTimeSource>,
        recorder: Arc<Recorder>,
        ledger_id: LedgerId,
    }

    async fn harness() -> Harness {
        let time = Arc::new(ManualTimeSource::new(NOW));
        let ledger = Arc::new(InMemoryLedger::new(Address::new("0xAD"), time.clone()));
        let store = Arc::new(InMemoryCacheStore::new());
        let ledger_id = ledger.seed_campaign("Fund the bridge", CampaignStatus::Live, NOW + 3_600, false);

        let mut record = CampaignCacheRecord::new("c1", ledger_id, Address::new("0xAuthor"));
        record.cached_status = CampaignStatus::Live;
        record.cached_end_date = Some(NOW + 3_600);
        store.insert_record(&record).await.unwrap();

        let recorder = Arc::new(
            ActionRecorder::new(ledger.clone(), store.clone(), time.clone(), RecorderConfig::default())
                .with_ledger_reader(ledger.clone()),
        );
        Harness {
            ledger,
            store,
            time,
            recorder,
            ledger_id,
        }
    }

    fn alice() -> Address {
        Address::new("0xA11CE")
    }

    #[tokio::test]
    async fn test_like_is_idempotent() {
        let h = harness().await;
        assert_eq!(
            h.recorder.record_like("c1", &alice()).await.unwrap(),
            ActionOutcome::Recorded
        );
        assert_eq!(
            h.recorder.record_like("c1", &alice()).await.unwrap(),
            ActionOutcome::AlreadyRecorded
        );
        assert_eq!(h.store.get_record("c1").await.unwrap().unwrap().like_count, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_likes_count_once() {
        let h = harness().await;
        let mut handles = Vec::new();
        for _ in 0..8 {
            let recorder = h.recorder.clone();
            handles.push(tokio::spawn(async move {
                recorder.record_like("c1", &alice()).await.unwrap()
            }));
        }
        let mut recorded = 0;
        for handle in handles {
            if handle.await.unwrap() == ActionOutcome::Recorded {
                recorded += 1;
            }
        }
        assert_eq!(recorded, 1);
        assert_eq!(h.store.get_record("c1").await.unwrap().unwrap().like_count, 1);
    }

    #[tokio::test]
    async fn test_like_rejections() {
        let h = harness().await;
        assert!(matches!(
            h.recorder.record_like("nope", &alice()).await.unwrap_err(),
            RecorderError::CampaignNotFound { .. }
        ));
        assert!(matches!(
            h.recorder.record_like("c1", &Address::new("")).await.unwrap_err(),
            RecorderError::InvalidInput { .. }
        ));

        h.store
            .merge_patch("c1", &shared_types::CampaignPatch::soft_delete())
            .await
            .unwrap();
        assert!(matches!(
            h.recorder.record_like("c1", &alice()).await.unwrap_err(),
            RecorderError::Ineligible { .. }
        ));
        assert_eq!(h.store.get_record("c1").await.unwrap().unwrap().like_count, 0);
    }

    #[tokio::test]
    async fn test_like_counter_failure_is_persistence_failure() {
        let h = harness().await;
        h.store.fail_next_increments(1);
        let err = h.recorder.record_like("c1", &alice()).await.unwrap_err();
        assert!(matches!(
            err,
            RecorderError::PersistenceFailure { tx_hash: None, .. }
        ));

        // marker is the gate: a retry never increments twice
        assert_eq!(
            h.recorder.record_like("c1", &alice()).await.unwrap(),
            ActionOutcome::AlreadyRecorded
        );
        assert_eq!(h.store.get_record("c1").await.unwrap().unwrap().like_count, 0);
    }

    #[tokio::test]
    async fn test_comments_and_comment_likes() {
        let h = harness().await;
        let comment = h
            .recorder
            .add_comment("c1", &alice(), "  Verbatim *text*  ")
            .await
            .unwrap();
        assert_eq!(comment.text, "  Verbatim *text*  ");
        assert_eq!(h.store.get_record("c1").await.unwrap().unwrap().comment_count, 1);

        assert_eq!(
            h.recorder
                .record_comment_like("c1", &comment.id, &alice())
                .await
                .unwrap(),
            ActionOutcome::Recorded
        );
        assert_eq!(
            h.recorder
                .record_comment_like("c1", &comment.id, &alice())
                .await
                .unwrap(),
            ActionOutcome::AlreadyRecorded
        );
        let stored = h.store.get_comment("c1", &comment.id).await.unwrap().unwrap();
        assert_eq!(stored.like_count, 1);
        assert_eq!(h.store.get_record("c1").await.unwrap().unwrap().like_count, 0);

        assert!(matches!(
            h.recorder
                .record_comment_like("c1", "missing", &alice())
                .await
                .unwrap_err(),
            RecorderError::CommentNotFound { .. }
        ));
        assert!(matches!(
            h.recorder.add_comment("c1", &alice(), "   ").await.unwrap_err(),
            RecorderError::InvalidInput { .. }
        ));
    }

    #[tokio::test]
    async fn test_vote_recorded_after_confirmation_without_local_tally() {
        let h = harness().await;
        let outcome = h
            .recorder
            .record_vote("c1", &alice(), VoteOption::Yes, 40)
            .await
            .unwrap();
        let tx_hash = match outcome {
            VoteOutcome::Recorded { tx_hash, .. } => tx_hash,
            other => panic!("expected a recorded vote, got {other:?}"),
        };

        let ledger_view = h.ledger.read_campaign(h.ledger_id).await.unwrap();
        assert_eq!(ledger_view.yes_votes, 40);

        let marker = h
            .store
            .get_marker(&ActionTarget::campaign("c1"), ActionKind::Vote, &alice())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(marker.option, Some(VoteOption::Yes));
        assert_eq!(marker.tx_hash, Some(tx_hash));

        assert_eq!(h.store.get_record("c1").await.unwrap().unwrap().cached_yes_votes, 0);
        assert!(h.recorder.pending_vote("c1", &alice()).is_none());
    }

    #[tokio::test]
    async fn test_second_vote_is_already_recorded() {
        let h = harness().await;
        h.recorder
            .record_vote("c1", &alice(), VoteOption::Yes, 1)
            .await
            .unwrap();
        let submitted = h.ledger.submitted_count();

        let again = h
            .recorder
            .record_vote("c1", &alice(), VoteOption::No, 1)
            .await
            .unwrap();
        assert_eq!(
            again,
            VoteOutcome::AlreadyRecorded {
                option: Some(VoteOption::Yes)
            }
        );
        assert_eq!(h.ledger.submitted_count(), submitted);
    }

    #[tokio::test]
    async fn test_ledger_rejects_vote_without_local_marker() {
        let h = harness().await;
        let tx = h
            .ledger
            .submit_vote(&alice(), h.ledger_id, VoteOption::Yes, 1)
            .await
            .unwrap();
        h.ledger.await_confirmation(&tx).await.unwrap();

        let err = h
            .recorder
            .record_vote("c1", &alice(), VoteOption::No, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, RecorderError::RejectedByLedger { .. }));
        assert!(h
            .store
            .get_marker(&ActionTarget::campaign("c1"), ActionKind::Vote, &alice())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_cancelled_vote_is_retryable() {
        let h = harness().await;
        h.ledger.cancel_next_submission();
        let err = h
            .recorder
            .record_vote("c1", &alice(), VoteOption::Yes, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, RecorderError::UserCancelled));
        assert!(h.recorder.pending_vote("c1", &alice()).is_none());

        let retry = h
            .recorder
            .record_vote("c1", &alice(), VoteOption::Yes, 1)
            .await
            .unwrap();
        assert!(retry.is_recorded());
    }

    #[tokio::test]
    async fn test_marker_failure_after_confirmation() {
        let h = harness().await;
        h.store.fail_next_writes(1);
        let err = h
            .recorder
            .record_vote("c1", &alice(), VoteOption::Yes, 3)
            .await
            .unwrap_err();
        match err {
            RecorderError::PersistenceFailure { tx_hash, .. } => assert!(tx_hash.is_some()),
            other => panic!("expected persistence failure, got {other:?}"),
        }
        assert!(h.ledger.has_voted(h.ledger_id, &alice()).await.unwrap());
        assert_eq!(h.ledger.read_campaign(h.ledger_id).await.unwrap().yes_votes, 3);

        // the retry is answered from the ledger without a new transaction
        let submitted = h.ledger.submitted_count();
        let retry = h
            .recorder
            .record_vote("c1", &alice(), VoteOption::Yes, 3)
            .await
            .unwrap_err();
        match retry {
            RecorderError::RejectedByLedger { reason } => {
                assert_eq!(reason, revert_reasons::ALREADY_VOTED)
            }
            other => panic!("expected ledger rejection, got {other:?}"),
        }
        assert_eq!(h.ledger.submitted_count(), submitted);
        assert_eq!(h.ledger.read_campaign(h.ledger_id).await.unwrap().yes_votes, 3);
    }

    #[tokio::test]
    async fn test_local_prechecks_do_not_submit() {
        let h = harness().await;
        assert!(matches!(
            h.recorder
                .record_vote("c1", &alice(), VoteOption::Yes, 0)
                .await
                .unwrap_err(),
            RecorderError::InsufficientWeight { .. }
        ));
        h.store
            .merge_patch("c1", &shared_types::CampaignPatch::invalidation())
            .await
            .unwrap();
        assert!(matches!(
            h.recorder
                .record_vote("c1", &alice(), VoteOption::Yes, 1)
                .await
                .unwrap_err(),
            RecorderError::Ineligible { .. }
        ));
        assert_eq!(h.ledger.submitted_count(), 0);
    }

    #[tokio::test]
    async fn test_abstain_permission_is_left_to_the_ledger() {
        let h = harness().await;
        let err = h
            .recorder
            .record_vote("c1", &alice(), VoteOption::Abstain, 1)
            .await
            .unwrap_err();
        match err {
            RecorderError::RejectedByLedger { reason } => {
                assert_eq!(reason, revert_reasons::ABSTAIN_NOT_ALLOWED)
            }
            other => panic!("expected ledger rejection, got {other:?}"),
        }
        assert_eq!(h.ledger.submitted_count(), 0);

        // a record that predates the abstain flag still reaches the ledger
        let lid = h
            .ledger
            .seed_campaign("Abstain ok", CampaignStatus::Live, NOW + 3_600, true);
        let mut legacy = CampaignCacheRecord::new("c2", lid, Address::new("0xAuthor"));
        legacy.cached_status = CampaignStatus::Live;
        legacy.cached_end_date = Some(NOW + 3_600);
        h.store.insert_record(&legacy).await.unwrap();
        assert!(!legacy.allow_abstain);

        let outcome = h
            .recorder
            .record_vote("c2", &alice(), VoteOption::Abstain, 2)
            .await
            .unwrap();
        assert!(outcome.is_recorded());
        assert_eq!(h.ledger.read_campaign(lid).await.unwrap().abstain_votes, 2);
    }

    #[tokio::test]
    async fn test_closed_window_is_left_to_the_ledger() {
        let h = harness().await;
        h.time.advance(7_200);
        let err = h
            .recorder
            .record_vote("c1", &alice(), VoteOption::Yes, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, RecorderError::RejectedByLedger { .. }));
    }

    /// Writer whose confirmations wait for the test to open a gate.
    struct GatedWriter {
        inner: Arc<InMemoryLedger>,
        gate: Notify,
    }

    #[async_trait]
    impl LedgerWriter for GatedWriter {
        async fn submit_vote(
            &self,
            sender: &Address,
            ledger_id: LedgerId,
            option: VoteOption,
            weight: u64,
        ) -> LedgerResult<TxHandle> {
            self.inner.submit_vote(sender, ledger_id, option, weight).await
        }

        async fn submit_create(
            &self,
            sender: &Address,
            title: &str,
            duration_secs: u64,
            allow_abstain: bool,
        ) -> LedgerResult<TxHandle> {
            self.inner
                .submit_create(sender, title, duration_secs, allow_abstain)
                .await
        }

        async fn submit_status_update(
            &self,
            sender: &Address,
            ledger_id: LedgerId,
            status: CampaignStatus,
        ) -> LedgerResult<TxHandle> {
            self.inner.submit_status_update(sender, ledger_id, status).await
        }

        async fn await_confirmation(&self, tx: &TxHandle) -> LedgerResult<TxConfirmation> {
            self.gate.notified().await;
            self.inner.await_confirmation(tx).await
        }
    }

    #[tokio::test]
    async fn test_in_flight_vote_blocks_resubmission_and_fails_cleanly() {
        let h = harness().await;
        let writer = Arc::new(GatedWriter {
            inner: h.ledger.clone(),
            gate: Notify::new(),
        });
        let recorder = Arc::new(ActionRecorder::new(
            writer.clone(),
            h.store.clone(),
            h.time.clone(),
            RecorderConfig::default(),
        ));

        let task = {
            let recorder = recorder.clone();
            tokio::spawn(async move {
                recorder
                    .record_vote("c1", &alice(), VoteOption::Yes, 2)
                    .await
            })
        };
        while recorder
            .pending_vote("c1", &alice())
            .and_then(|p| p.tx)
            .is_none()
        {
            tokio::task::yield_now().await;
        }

        assert!(matches!(
            recorder
                .record_vote("c1", &alice(), VoteOption::No, 2)
                .await
                .unwrap_err(),
            RecorderError::SubmissionInFlight
        ));

        // status changes before inclusion
        h.ledger
            .set_status_raw(h.ledger_id, CampaignStatus::Ended.ledger_index());
        writer.gate.notify_one();

        let err = task.await.unwrap().unwrap_err();
        assert!(matches!(err, RecorderError::RejectedByLedger { .. }));
        assert!(recorder.pending_vote("c1", &alice()).is_none());
        assert!(h
            .store
            .get_marker(&ActionTarget::campaign("c1"), ActionKind::Vote, &alice())
            .await
            .unwrap()
            .is_none());
    }
}
