//! # At-Most-Once Actions
//!
//! Likes, votes and comment likes through the recorder against the shared
//! store and ledger.
//!
//! ## Flow Tested:
//!
//! 1. **Recorder (4) → Cache Store (2)**: marker compare-and-create gates the
//!    like counter
//! 2. **Recorder (4) → Ledger (1)**: vote submitted, marker written only after
//!    confirmation
//! 3. **Reconciler (3)**: tallies reach the cache only through reconciliation

#[cfg(test)]
mod tests {
    use crate::integration::harness::{user, Harness};
    use cl_01_ledger_gateway::{LedgerReader, LedgerWriter};
    use cl_02_cache_store::CampaignStore;
    use cl_03_reconciliation::ReconcilerApi;
    use cl_04_action_recorder::{ActionOutcome, ActionRecorderApi, RecorderError, VoteOutcome};
    use rand::seq::SliceRandom;
    use shared_types::{TxConfirmation, VoteOption};

    #[tokio::test]
    async fn test_like_twice_counts_once() {
        let h = Harness::new();
        let (id, _) = h.live_campaign("Likes").await;
        let alice = user(1);

        let first = h.rt.recorder.record_like(&id, &alice).await.unwrap();
        let second = h.rt.recorder.record_like(&id, &alice).await.unwrap();

        assert_eq!(first, ActionOutcome::Recorded);
        assert_eq!(second, ActionOutcome::AlreadyRecorded);
        assert_eq!(h.record(&id).await.like_count, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_racing_likes_from_one_user_count_once() {
        let h = Harness::new();
        let (id, _) = h.live_campaign("Race").await;
        let before = h.record(&id).await.like_count;

        let mut handles = Vec::new();
        for _ in 0..8 {
            let rt = h.rt.clone();
            let id = id.clone();
            handles.push(tokio::spawn(async move {
                rt.recorder.record_like(&id, &user(7)).await.unwrap()
            }));
        }

        let mut recorded = 0;
        for handle in handles {
            if handle.await.unwrap() == ActionOutcome::Recorded {
                recorded += 1;
            }
        }

        assert_eq!(recorded, 1);
        assert_eq!(h.record(&id).await.like_count - before, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_likes_from_many_users() {
        let h = Harness::new();
        let (id, _) = h.live_campaign("Crowd").await;

        let mut users: Vec<u32> = (1..=20).chain(1..=20).collect();
        users.shuffle(&mut rand::thread_rng());

        let mut handles = Vec::new();
        for n in users {
            let rt = h.rt.clone();
            let id = id.clone();
            handles.push(tokio::spawn(async move {
                rt.recorder.record_like(&id, &user(n)).await.unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(h.record(&id).await.like_count, 20);
    }

    #[tokio::test]
    async fn test_comment_likes_are_per_comment() {
        let h = Harness::new();
        let (id, _) = h.live_campaign("Comments").await;

        let first = h.rt.recorder.add_comment(&id, &user(1), "first").await.unwrap();
        let second = h.rt.recorder.add_comment(&id, &user(2), "second").await.unwrap();

        let rec = &h.rt.recorder;
        assert_eq!(
            rec.record_comment_like(&id, &first.id, &user(3)).await.unwrap(),
            ActionOutcome::Recorded
        );
        assert_eq!(
            rec.record_comment_like(&id, &first.id, &user(3)).await.unwrap(),
            ActionOutcome::AlreadyRecorded
        );
        assert_eq!(
            rec.record_comment_like(&id, &second.id, &user(3)).await.unwrap(),
            ActionOutcome::Recorded
        );

        let comments = h.rt.store.list_comments(&id).await.unwrap();
        assert_eq!(comments.len(), 2);
        assert!(comments.iter().all(|c| c.like_count == 1));
        assert_eq!(h.record(&id).await.comment_count, 2);
        // comment likes never touch the campaign counter
        assert_eq!(h.record(&id).await.like_count, 0);
    }

    #[tokio::test]
    async fn test_second_vote_is_already_recorded_without_resubmission() {
        let h = Harness::new();
        let (id, _) = h.live_campaign("Vote").await;
        let alice = user(1);
        let submitted = h.rt.ledger.submitted_count();

        let first = h
            .rt
            .recorder
            .record_vote(&id, &alice, VoteOption::Yes, 2)
            .await
            .unwrap();
        assert!(first.is_recorded());
        assert_eq!(h.rt.ledger.submitted_count(), submitted + 1);

        let second = h
            .rt
            .recorder
            .record_vote(&id, &alice, VoteOption::No, 2)
            .await
            .unwrap();
        assert_eq!(
            second,
            VoteOutcome::AlreadyRecorded {
                option: Some(VoteOption::Yes)
            }
        );
        assert_eq!(h.rt.ledger.submitted_count(), submitted + 1);

        let markers = h.rt.store.prior_markers(&id, &alice).await.unwrap();
        assert_eq!(markers.voted_option(), Some(VoteOption::Yes));
    }

    #[tokio::test]
    async fn test_vote_tally_arrives_only_through_reconciliation() {
        let h = Harness::new();
        let (id, _) = h.live_campaign("Tally").await;

        h.rt.recorder
            .record_vote(&id, &user(1), VoteOption::Yes, 3)
            .await
            .unwrap();
        h.rt.recorder
            .record_vote(&id, &user(2), VoteOption::Abstain, 1)
            .await
            .unwrap();
        let cached = h.record(&id).await;
        assert_eq!((cached.cached_yes_votes, cached.cached_abstain_votes), (0, 0));

        let outcome = h.rt.reconciler.reconcile_campaign(&id).await.unwrap();
        assert!(outcome.changed);
        assert_eq!(outcome.view.yes_votes, 3);
        assert_eq!(outcome.view.abstain_votes, 1);

        let again = h.rt.reconciler.reconcile_campaign(&id).await.unwrap();
        assert!(!again.changed);
        assert_eq!(h.record(&id).await.cached_yes_votes, 3);
    }

    #[tokio::test]
    async fn test_vote_cast_through_another_client_is_rejected() {
        let h = Harness::new();
        let (id, ledger_id) = h.live_campaign("Elsewhere").await;
        let alice = user(1);

        let tx = h
            .rt
            .ledger
            .submit_vote(&alice, ledger_id, VoteOption::Yes, 1)
            .await
            .unwrap();
        assert!(matches!(
            h.rt.ledger.await_confirmation(&tx).await.unwrap(),
            TxConfirmation::Confirmed(_)
        ));

        let err = h
            .rt
            .recorder
            .record_vote(&id, &alice, VoteOption::No, 1)
            .await
            .unwrap_err();
        match err {
            RecorderError::RejectedByLedger { reason } => {
                assert!(reason.contains("already voted"), "{reason}")
            }
            other => panic!("unexpected {other:?}"),
        }
        let markers = h.rt.store.prior_markers(&id, &alice).await.unwrap();
        assert!(markers.vote.is_none());
    }

    #[tokio::test]
    async fn test_cancelled_vote_is_retryable() {
        let h = Harness::new();
        let (id, _) = h.live_campaign("Cancel").await;
        let alice = user(1);

        h.rt.ledger.cancel_next_submission();
        let err = h
            .rt
            .recorder
            .record_vote(&id, &alice, VoteOption::Yes, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, RecorderError::UserCancelled));
        assert!(h.rt.store.prior_markers(&id, &alice).await.unwrap().vote.is_none());

        let retry = h
            .rt
            .recorder
            .record_vote(&id, &alice, VoteOption::Yes, 1)
            .await
            .unwrap();
        assert!(retry.is_recorded());
    }

    #[tokio::test]
    async fn test_vote_confirmed_without_marker_is_not_resubmitted() {
        let h = Harness::new();
        let (id, ledger_id) = h.live_campaign("Lost marker").await;
        let alice = user(1);

        h.rt.store.fail_next_writes(1);
        let err = h
            .rt
            .recorder
            .record_vote(&id, &alice, VoteOption::Yes, 2)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RecorderError::PersistenceFailure { tx_hash: Some(_), .. }
        ));

        let snapshot = h
            .rt
            .reconciler
            .campaign_snapshot(&id, Some(&alice))
            .await
            .unwrap();
        assert!(!snapshot.eligibility.is_votable);

        let submitted = h.rt.ledger.submitted_count();
        let retry = h
            .rt
            .recorder
            .record_vote(&id, &alice, VoteOption::Yes, 2)
            .await
            .unwrap_err();
        match retry {
            RecorderError::RejectedByLedger { reason } => {
                assert!(reason.contains("already voted"), "{reason}")
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(h.rt.ledger.submitted_count(), submitted);

        // the tally itself still reaches the cache
        let outcome = h.rt.reconciler.reconcile_campaign_fresh(&id).await.unwrap();
        assert_eq!(outcome.view.yes_votes, 2);
        assert_eq!(h.rt.ledger.read_campaign_fresh(ledger_id).await.unwrap().yes_votes, 2);
    }
}
