//! Shared fixture: a fully wired runtime on a manual clock.

use cl_02_cache_store::{CampaignStore, CreateOutcome};
use cl_05_campaign_admin::NewCampaign;
use node_runtime::{CampaignRuntime, RuntimeConfig};
use shared_types::{Address, CampaignCacheRecord, CampaignStatus, LedgerId, ManualTimeSource};
use std::sync::Arc;

pub const NOW: u64 = 1_700_000_000;

pub fn user(n: u32) -> Address {
    Address::new(format!("0x{n:040x}"))
}

pub struct Harness {
    pub rt: Arc<CampaignRuntime>,
    pub time: Arc<ManualTimeSource>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        let time = Arc::new(ManualTimeSource::new(NOW));
        let rt = CampaignRuntime::with_time(config, time.clone());
        Self {
            rt: Arc::new(rt),
            time,
        }
    }

    pub fn admin(&self) -> Address {
        self.rt.config.ledger_admin.clone()
    }

    /// Create a live campaign through the admin service.
    pub async fn live_campaign(&self, title: &str) -> (String, LedgerId) {
        let created = self
            .rt
            .admin
            .create_campaign(&self.admin(), NewCampaign::new(title, "body").with_abstain())
            .await
            .unwrap();
        (created.campaign_id, created.ledger_id)
    }

    /// Write a cache record directly, as another writer would.
    pub async fn cache_record(&self, id: &str, ledger_id: LedgerId) -> CampaignCacheRecord {
        let mut record = CampaignCacheRecord::new(id, ledger_id, self.admin());
        record.title = format!("cached {id}");
        record.created_at = NOW;
        record.cached_status = CampaignStatus::Live;
        record.cached_end_date = Some(NOW + 86_400);
        assert_eq!(
            self.rt.store.insert_record(&record).await.unwrap(),
            CreateOutcome::Created
        );
        record
    }

    pub async fn record(&self, id: &str) -> CampaignCacheRecord {
        self.rt.store.get_record(id).await.unwrap().unwrap()
    }
}
