//! Campaign Administration Service
//!
//! Create-campaign lifecycle and administrative overrides. Every ledger
//! mutation is confirmed before the cache is touched, and ledger-derived
//! cache fields are only ever written by reconciliation.

use crate::domain::{CreatedCampaign, NewCampaign, DEFAULT_DURATION_SECS};
use crate::error::{AdminError, AdminResult};
use cl_01_ledger_gateway::{classify_revert, LedgerReader, LedgerWriter};
use cl_02_cache_store::{CacheStore, CampaignStore, CreateOutcome, RecordFilter};
use cl_03_reconciliation::{reconcile, ReconcileOutcome, ReconcilerApi, ReconcilerService};
use shared_types::{
    Address, CampaignCacheRecord, CampaignPatch, CampaignStatus, LedgerId, TimeSource,
    TxConfirmation, TxHandle, TxReceipt,
};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Administration configuration
#[derive(Clone, Debug)]
pub struct AdminConfig {
    /// Addresses allowed to administer besides the ledger admin.
    pub whitelist: Vec<Address>,
    /// Voting window used when a request carries no end time.
    pub default_duration_secs: u64,
    /// Image stored when a request carries none.
    pub placeholder_image: Option<String>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            whitelist: Vec::new(),
            default_duration_secs: DEFAULT_DURATION_SECS,
            placeholder_image: Some("/placeholder.svg".to_string()),
        }
    }
}

pub struct CampaignAdmin<R, W, S> {
    reader: Arc<R>,
    writer: Arc<W>,
    store: Arc<S>,
    reconciler: Arc<ReconcilerService<R, S>>,
    time: Arc<dyn TimeSource>,
    config: AdminConfig,
}

impl<R, W, S> CampaignAdmin<R, W, S>
where
    R: LedgerReader,
    W: LedgerWriter,
    S: CacheStore,
{
    pub fn new(
        reader: Arc<R>,
        writer: Arc<W>,
        store: Arc<S>,
        reconciler: Arc<ReconcilerService<R, S>>,
        time: Arc<dyn TimeSource>,
        config: AdminConfig,
    ) -> Self {
        Self {
            reader,
            writer,
            store,
            reconciler,
            time,
            config,
        }
    }

    /// Ledger admin or whitelisted.
    pub async fn is_admin(&self, user: &Address) -> AdminResult<bool> {
        if user.is_empty() {
            return Ok(false);
        }
        if self.config.whitelist.contains(user) {
            return Ok(true);
        }
        Ok(&self.reader.read_admin().await? == user)
    }

    async fn authorize(&self, user: &Address) -> AdminResult<()> {
        if self.is_admin(user).await? {
            Ok(())
        } else {
            warn!(%user, "[cl-05] rejected non-admin request");
            Err(AdminError::Unauthorized { user: user.clone() })
        }
    }

    async fn load(&self, campaign_id: &str) -> AdminResult<CampaignCacheRecord> {
        self.store
            .get_record(campaign_id)
            .await?
            .ok_or_else(|| AdminError::CampaignNotFound {
                campaign_id: campaign_id.to_string(),
            })
    }

    async fn confirm(&self, tx: &TxHandle, ledger_id: Option<LedgerId>) -> AdminResult<TxReceipt> {
        match self.writer.await_confirmation(tx).await? {
            TxConfirmation::Confirmed(receipt) => Ok(receipt),
            TxConfirmation::Failed { reason } => {
                warn!(tx_hash = %tx, reason = %reason, "[cl-05] transaction failed on inclusion");
                Err(classify_revert(ledger_id, &reason).into())
            }
        }
    }

    /// Create a campaign on the ledger, then cache it under a new opaque id.
    pub async fn create_campaign(
        &self,
        admin: &Address,
        request: NewCampaign,
    ) -> AdminResult<CreatedCampaign> {
        self.authorize(admin).await?;
        let now = self.time.now();
        let duration = request
            .duration_secs(now, self.config.default_duration_secs)
            .map_err(|reason| AdminError::InvalidInput { reason })?;
        let title = request.title.trim().to_string();

        let tx = self
            .writer
            .submit_create(admin, &title, duration, request.allow_abstain)
            .await?;
        let receipt = self.confirm(&tx, None).await?;
        let ledger_id = receipt
            .created_campaign
            .ok_or_else(|| AdminError::MissingCampaignId {
                tx_hash: receipt.tx_hash.clone(),
            })?;

        let mut record = CampaignCacheRecord::new(Uuid::new_v4().simple().to_string(), ledger_id, admin.clone());
        record.title = title;
        record.content = request.content;
        record.image = request
            .image
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.config.placeholder_image.clone());
        record.social_links = request.social_links;
        record.created_at = now;
        record.allow_abstain = request.allow_abstain;

        // the campaign count changed
        self.reader.invalidate(ledger_id);
        match self.reader.read_campaign_fresh(ledger_id).await {
            Ok(view) => reconcile(&record, &view, self.time.now()).patch.apply_to(&mut record),
            Err(err) => {
                // left for the next sweep
                warn!(ledger_id, error = %err, "[cl-05] created campaign not yet readable");
                record.cached_status = CampaignStatus::Live;
                record.cached_end_date = Some(now.saturating_add(duration));
            }
        }

        let persistence_failure = |reason: String| AdminError::PersistenceFailure {
            tx_hash: receipt.tx_hash.clone(),
            reason,
        };
        match self.store.insert_record(&record).await {
            Ok(CreateOutcome::Created) => {}
            Ok(CreateOutcome::AlreadyExists) => {
                return Err(persistence_failure(format!("record id {} already taken", record.id)))
            }
            Err(err) => return Err(persistence_failure(err.to_string())),
        }

        info!(
            campaign_id = %record.id,
            ledger_id,
            tx_hash = %receipt.tx_hash,
            "[cl-05] campaign created"
        );
        Ok(CreatedCampaign {
            campaign_id: record.id.clone(),
            ledger_id,
            tx_hash: receipt.tx_hash,
            record,
        })
    }

    /// Move a campaign to `status` on the ledger and reconcile the cache
    /// from a fresh read. The cache status is never taken from the request.
    pub async fn update_status(
        &self,
        admin: &Address,
        campaign_id: &str,
        status: CampaignStatus,
    ) -> AdminResult<ReconcileOutcome> {
        self.authorize(admin).await?;
        let record = self.load(campaign_id).await?;
        if record.deleted {
            return Err(AdminError::Deleted {
                campaign_id: record.id,
            });
        }

        let tx = self
            .writer
            .submit_status_update(admin, record.ledger_id, status)
            .await?;
        self.confirm(&tx, Some(record.ledger_id)).await?;
        info!(campaign_id, ledger_id = record.ledger_id, %status, "[cl-05] status updated on ledger");

        Ok(self.reconciler.reconcile_campaign_fresh(campaign_id).await?)
    }

    /// Soft delete. Returns `false` if the record was already deleted.
    pub async fn soft_delete(&self, admin: &Address, campaign_id: &str) -> AdminResult<bool> {
        self.authorize(admin).await?;
        let record = self.load(campaign_id).await?;
        if record.deleted {
            return Ok(false);
        }
        self.store
            .merge_patch(campaign_id, &CampaignPatch::soft_delete())
            .await?;
        info!(campaign_id, "[cl-05] campaign soft-deleted");
        Ok(true)
    }

    /// Explicit override clearing `invalid` after a fresh ledger read
    /// confirms the mapping.
    pub async fn revalidate(&self, admin: &Address, campaign_id: &str) -> AdminResult<ReconcileOutcome> {
        self.authorize(admin).await?;
        Ok(self.reconciler.revalidate(campaign_id).await?)
    }

    /// Records for the admin listing.
    pub async fn list_campaigns(
        &self,
        admin: &Address,
        filter: &RecordFilter,
    ) -> AdminResult<Vec<CampaignCacheRecord>> {
        self.authorize(admin).await?;
        let mut records = self.store.list_where(filter).await?.records;
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(records)
    }
}
