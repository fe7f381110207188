//! # Sync Sweep
//!
//! The batch job over every non-deleted cache record.
//!
//! ## Flow Tested:
//!
//! 1. **Sync (3) → Cache Store (2)**: enumerate records, one atomic commit
//! 2. **Sync (3) → Ledger (1)**: campaign count once, bounded concurrent reads
//! 3. **Admin (5)**: soft-deleted records drop out of the sweep

#[cfg(test)]
mod tests {
    use crate::integration::harness::{Harness, NOW};
    use cl_03_reconciliation::SyncError;
    use serde_json::json;
    use shared_types::{CampaignStatus, DocumentPath};

    /// Ledger with `count` live campaigns.
    fn seed_ledger(h: &Harness, count: u64) {
        for n in 0..count {
            h.rt.ledger
                .seed_campaign(&format!("c{n}"), CampaignStatus::Live, NOW + 86_400, false);
        }
    }

    #[tokio::test]
    async fn test_out_of_range_record_is_invalidated_others_reconcile() {
        let h = Harness::new();
        seed_ledger(&h, 50);
        h.cache_record("r1", 3).await;
        h.cache_record("r2", 50).await;
        h.cache_record("r3", 7).await;
        h.rt.ledger.set_tallies(3, 5, 1, 0);
        h.rt.ledger.set_tallies(7, 0, 4, 0);
        let writes = h.rt.store.merge_write_count();

        let report = h.rt.sweep().await.unwrap();

        assert_eq!(report.processed, 3);
        assert_eq!(report.invalidated, 1);
        assert_eq!(report.updated, 2);
        assert_eq!(report.errored, 0);
        // single batch commit
        assert_eq!(h.rt.store.merge_write_count(), writes + 1);

        let r2 = h.record("r2").await;
        assert!(r2.invalid);
        assert_eq!(r2.cached_status, CampaignStatus::Ended);
        assert_eq!(h.record("r1").await.cached_yes_votes, 5);
        assert_eq!(h.record("r3").await.cached_no_votes, 4);
        assert!(!h.record("r1").await.invalid);
    }

    #[tokio::test]
    async fn test_sweep_is_rerunnable() {
        let h = Harness::new();
        seed_ledger(&h, 2);
        h.cache_record("a", 0).await;
        h.cache_record("b", 9).await;
        h.rt.ledger.set_tallies(0, 2, 2, 0);

        let first = h.rt.sweep().await.unwrap();
        assert_eq!(first.written(), 2);

        let second = h.rt.sweep().await.unwrap();
        assert_eq!(second.written(), 0);
        assert_eq!(second.skipped, 1);
        assert!(h.record("b").await.invalid);
    }

    #[tokio::test]
    async fn test_deleted_records_are_not_swept() {
        let h = Harness::new();
        let (kept, _) = h.live_campaign("kept").await;
        let (gone, gone_ledger_id) = h.live_campaign("gone").await;
        assert!(h.rt.admin.soft_delete(&h.admin(), &gone).await.unwrap());
        h.rt.ledger.set_tallies(gone_ledger_id, 10, 0, 0);

        let report = h.rt.sweep().await.unwrap();
        assert_eq!(report.processed, 1);
        assert_eq!(report.written(), 0);
        assert_eq!(h.record(&gone).await.cached_yes_votes, 0);
        assert!(!h.record(&kept).await.deleted);
    }

    #[tokio::test]
    async fn test_bad_records_do_not_abort_the_sweep() {
        let h = Harness::new();
        seed_ledger(&h, 3);
        for (id, ledger_id) in [("a", 0), ("b", 1), ("c", 2)] {
            h.cache_record(id, ledger_id).await;
            h.rt.ledger.set_tallies(ledger_id, 1, 0, 0);
        }
        h.rt.store.put_raw(
            DocumentPath::campaign("broken"),
            json!({"title": "no ledger id"}).as_object().cloned().unwrap(),
        );
        h.rt.ledger.fail_next_reads(1);

        let report = h.rt.sweep().await.unwrap();
        assert_eq!(report.processed, 3);
        assert_eq!(report.errored, 2);
        assert_eq!(report.updated, 2);
        assert!(report.errors.iter().any(|(id, _)| id == "broken"));

        // the transiently failed record converges on the next run
        let rerun = h.rt.sweep().await.unwrap();
        assert_eq!(rerun.updated, 1);
        for id in ["a", "b", "c"] {
            assert_eq!(h.record(id).await.cached_yes_votes, 1);
        }
    }

    #[tokio::test]
    async fn test_failed_commit_writes_nothing() {
        let h = Harness::new();
        seed_ledger(&h, 2);
        h.cache_record("a", 0).await;
        h.cache_record("b", 5).await;
        h.rt.ledger.set_tallies(0, 3, 0, 0);
        h.rt.store.fail_next_writes(1);

        match h.rt.sweep().await {
            Err(SyncError::CommitFailed { patches, .. }) => assert_eq!(patches, 2),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(h.record("a").await.cached_yes_votes, 0);
        assert!(!h.record("b").await.invalid);

        let report = h.rt.sweep().await.unwrap();
        assert_eq!(report.written(), 2);
        assert_eq!(h.record("a").await.cached_yes_votes, 3);
        assert!(h.record("b").await.invalid);
    }
}
