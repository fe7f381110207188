//! # Reconciliation Properties
//!
//! Single-campaign reconciliation through `ReconcilerService` and the pure
//! `reconcile` / `eligibility` pair.

#[cfg(test)]
mod tests {
    use crate::integration::harness::{user, Harness, NOW};
    use cl_01_ledger_gateway::LedgerReader;
    use cl_03_reconciliation::{
        eligibility, reconcile, CampaignMergedView, ReconcileError, ReconcilerApi, StatusLabel,
    };
    use cl_04_action_recorder::ActionRecorderApi;
    use shared_types::{ActionKind, CampaignStatus, PriorMarkers, UserActionMarker, VoteOption};

    #[tokio::test]
    async fn test_reconcile_leaves_cache_only_fields_alone() {
        let h = Harness::new();
        let (id, ledger_id) = h.live_campaign("Merge").await;
        h.rt.recorder.add_comment(&id, &user(1), "one").await.unwrap();
        h.rt.recorder.add_comment(&id, &user(2), "two").await.unwrap();
        h.rt.recorder.record_like(&id, &user(3)).await.unwrap();

        // differs from the ledger only in cache-only fields
        let quiet = h.rt.reconciler.reconcile_campaign_fresh(&id).await.unwrap();
        assert!(!quiet.changed);

        h.rt.ledger.set_tallies(ledger_id, 4, 1, 0);
        let writes = h.rt.store.merge_write_count();
        let outcome = h.rt.reconciler.reconcile_campaign_fresh(&id).await.unwrap();
        assert!(outcome.changed);
        assert_eq!(h.rt.store.merge_write_count(), writes + 1);

        let record = h.record(&id).await;
        assert_eq!((record.cached_yes_votes, record.cached_no_votes), (4, 1));
        assert_eq!(record.comment_count, 2);
        assert_eq!(record.like_count, 1);
        assert_eq!(record.content, "body");
    }

    #[tokio::test]
    async fn test_expired_live_campaign_resolves_to_ended() {
        let h = Harness::new();
        let ledger_id =
            h.rt.ledger
                .seed_campaign("Old", CampaignStatus::Live, NOW - 100, false);
        let cached = h.cache_record("expired", ledger_id).await;

        let outcome = h.rt.reconciler.reconcile_campaign("expired").await.unwrap();
        assert!(outcome.changed);
        assert_eq!(outcome.view.status, CampaignStatus::Ended);
        assert!(!outcome.view.is_live);
        assert_eq!(outcome.view.end_date, Some(NOW - 100));
        assert_eq!(h.record("expired").await.cached_status, CampaignStatus::Ended);

        for n in 1..=5 {
            let snapshot = h
                .rt
                .reconciler
                .campaign_snapshot("expired", Some(&user(n)))
                .await
                .unwrap();
            assert!(!snapshot.eligibility.is_votable);
            assert_eq!(snapshot.eligibility.label, StatusLabel::Ended);
        }

        // the pure function agrees with the service
        let view = h.rt.reader.read_campaign_fresh(ledger_id).await.unwrap();
        let pure = reconcile(&cached, &view, NOW);
        assert_eq!(pure.view.status, CampaignStatus::Ended);
    }

    #[tokio::test]
    async fn test_eligibility_is_deterministic() {
        let h = Harness::new();
        let (id, _) = h.live_campaign("Determinism").await;
        let record = h.record(&id).await;
        let view = CampaignMergedView::from_cache(&record, NOW);
        let alice = user(1);

        let none = PriorMarkers::none();
        let first = eligibility(&view, Some(&alice), &none);
        let second = eligibility(&view, Some(&alice), &none);
        assert_eq!(first, second);
        assert!(first.is_votable && first.is_likeable);

        let voted = PriorMarkers {
            like: None,
            vote: Some(UserActionMarker::vote(alice.clone(), VoteOption::No, "0xabc", NOW)),
        };
        let after_vote = eligibility(&view, Some(&alice), &voted);
        assert!(!after_vote.is_votable);
        assert!(after_vote.is_likeable);
        assert_eq!(after_vote.voted_option, Some(VoteOption::No));
        assert_eq!(after_vote, eligibility(&view, Some(&alice), &voted));

        let liked = PriorMarkers {
            like: Some(UserActionMarker::like(ActionKind::Like, alice.clone(), NOW)),
            vote: None,
        };
        assert!(!eligibility(&view, Some(&alice), &liked).is_likeable);

        let anonymous = eligibility(&view, None, &none);
        assert!(!anonymous.is_votable && !anonymous.is_likeable);

        // time only enters through the explicit `now`
        let later = CampaignMergedView::from_cache(&record, NOW + 30 * 86_400);
        assert!(!eligibility(&later, Some(&alice), &none).is_votable);
        assert!(eligibility(&view, Some(&alice), &none).is_votable);
    }

    #[tokio::test]
    async fn test_invalid_flag_survives_reconciliation() {
        let h = Harness::new();
        h.cache_record("ghost", 2).await;

        let outcome = h.rt.reconciler.reconcile_campaign("ghost").await.unwrap();
        assert!(outcome.changed);
        assert!(outcome.view.invalid);
        assert_eq!(outcome.view.status, CampaignStatus::Ended);

        // the ledger id becomes resolvable later
        for title in ["a", "b", "c"] {
            h.live_campaign(title).await;
        }
        for _ in 0..2 {
            let again = h.rt.reconciler.reconcile_campaign_fresh("ghost").await.unwrap();
            assert!(!again.changed);
            assert!(again.view.invalid);
        }
        let record = h.record("ghost").await;
        assert!(record.invalid);
        assert_eq!(record.cached_status, CampaignStatus::Ended);
    }

    #[tokio::test]
    async fn test_transient_failure_leaves_cache_untouched() {
        let h = Harness::new();
        let (id, ledger_id) = h.live_campaign("Flaky").await;
        h.rt.ledger.set_tallies(ledger_id, 9, 0, 0);
        h.rt.ledger.fail_next_reads(1);
        let before = h.record(&id).await;

        let err = h.rt.reconciler.reconcile_campaign_fresh(&id).await.unwrap_err();
        assert!(matches!(err, ReconcileError::TransientReadFailure { .. }));
        assert_eq!(h.record(&id).await, before);
        assert!(!before.invalid);

        let retried = h.rt.reconciler.reconcile_campaign_fresh(&id).await.unwrap();
        assert!(retried.changed);
        assert_eq!(h.record(&id).await.cached_yes_votes, 9);
    }
}
