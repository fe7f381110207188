//! # Campaign Administration
//!
//! Create-campaign lifecycle and the administrative overrides, end to end.

#[cfg(test)]
mod tests {
    use crate::integration::harness::{user, Harness, NOW};
    use cl_03_reconciliation::{ReconcileError, ReconcilerApi, StatusLabel};
    use cl_04_action_recorder::{ActionRecorderApi, RecorderError};
    use cl_05_campaign_admin::{AdminError, NewCampaign};
    use node_runtime::RuntimeConfig;
    use shared_types::{CampaignStatus, LedgerError, VoteOption};

    #[tokio::test]
    async fn test_campaign_lifecycle() {
        let h = Harness::new();
        let admin = h.admin();

        let created = h
            .rt
            .admin
            .create_campaign(
                &admin,
                NewCampaign::new("Lifecycle", "full run").ending_at(NOW + 600),
            )
            .await
            .unwrap();
        assert_eq!(created.record.cached_status, CampaignStatus::Live);
        assert_eq!(created.record.cached_end_date, Some(NOW + 600));
        assert_eq!(created.record.image.as_deref(), Some("/placeholder.svg"));
        let id = created.campaign_id;

        h.rt.recorder
            .record_vote(&id, &user(1), VoteOption::Yes, 4)
            .await
            .unwrap();

        let approved = h
            .rt
            .admin
            .update_status(&admin, &id, CampaignStatus::Approved)
            .await
            .unwrap();
        assert!(approved.changed);
        assert_eq!(approved.view.status, CampaignStatus::Approved);
        assert_eq!(approved.view.yes_votes, 4);

        let snapshot = h
            .rt
            .reconciler
            .campaign_snapshot(&id, Some(&user(2)))
            .await
            .unwrap();
        assert!(!snapshot.eligibility.is_votable);
        assert!(snapshot.eligibility.is_likeable);
        assert_eq!(snapshot.eligibility.label, StatusLabel::Approved);

        h.time.advance(3_600);
        let later = h.rt.reconciler.reconcile_campaign_fresh(&id).await.unwrap();
        // an approved campaign keeps its stage after the window
        assert_eq!(later.view.status, CampaignStatus::Approved);
    }

    #[tokio::test]
    async fn test_non_admin_is_rejected_before_the_ledger() {
        let h = Harness::new();
        let before = h.rt.ledger.submitted_count();

        let err = h
            .rt
            .admin
            .create_campaign(&user(9), NewCampaign::new("Nope", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::Unauthorized { .. }));
        assert_eq!(h.rt.ledger.submitted_count(), before);
    }

    #[tokio::test]
    async fn test_whitelisted_user_still_needs_the_ledger_admin() {
        let mut config = RuntimeConfig::default();
        config.admin.whitelist = vec![user(5)];
        let h = Harness::with_config(config);

        assert!(h.rt.admin.is_admin(&user(5)).await.unwrap());
        let err = h
            .rt
            .admin
            .create_campaign(&user(5), NewCampaign::new("Whitelisted", ""))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AdminError::Ledger(LedgerError::Rejected { .. })
        ));
        assert!(h
            .rt
            .admin
            .list_campaigns(&user(5), &Default::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_revalidate_is_the_only_way_back_from_invalid() {
        let h = Harness::new();
        let admin = h.admin();
        h.cache_record("imported", 1).await;
        h.live_campaign("first").await;

        let report = h.rt.sweep().await.unwrap();
        assert_eq!(report.invalidated, 1);

        // still unresolvable
        let err = h.rt.admin.revalidate(&admin, "imported").await.unwrap_err();
        assert!(matches!(
            err,
            AdminError::Reconcile(ReconcileError::MappingUnconfirmed { ledger_id: 1 })
        ));
        assert!(h.record("imported").await.invalid);

        h.live_campaign("second").await;
        let swept = h.rt.sweep().await.unwrap();
        assert_eq!(swept.skipped, 1);
        assert!(h.record("imported").await.invalid);

        let outcome = h.rt.admin.revalidate(&admin, "imported").await.unwrap();
        assert!(outcome.changed);
        assert!(!outcome.view.invalid);
        assert_eq!(outcome.view.status, CampaignStatus::Live);
        let record = h.record("imported").await;
        assert!(!record.invalid);
        assert_eq!(record.cached_status, CampaignStatus::Live);
    }

    #[tokio::test]
    async fn test_soft_delete_is_terminal() {
        let h = Harness::new();
        let admin = h.admin();
        let (id, _) = h.live_campaign("Doomed").await;

        assert!(h.rt.admin.soft_delete(&admin, &id).await.unwrap());
        assert!(!h.rt.admin.soft_delete(&admin, &id).await.unwrap());

        let like = h.rt.recorder.record_like(&id, &user(1)).await.unwrap_err();
        assert!(matches!(like, RecorderError::Ineligible { .. }));

        assert!(matches!(
            h.rt.admin.revalidate(&admin, &id).await.unwrap_err(),
            AdminError::Reconcile(ReconcileError::Deleted { .. })
        ));
        assert!(matches!(
            h.rt
                .admin
                .update_status(&admin, &id, CampaignStatus::Live)
                .await
                .unwrap_err(),
            AdminError::Deleted { .. }
        ));

        let snapshot = h.rt.reconciler.campaign_snapshot(&id, Some(&user(1))).await.unwrap();
        assert_eq!(snapshot.eligibility.label, StatusLabel::Deleted);
        assert!(h.record(&id).await.deleted);
    }
}
