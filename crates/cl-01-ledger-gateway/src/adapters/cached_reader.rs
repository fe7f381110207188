//! # Staleness-Bounded Ledger Read Cache
//!
//! Wraps any `LedgerReader` and serves campaign views, the campaign count and
//! the admin identity from memory for a short window to bound read
//! amplification when many callers reconcile the same campaign.
//!
//! ## Rules
//!
//! - Errors are never cached.
//! - `read_campaign_fresh` and `read_campaign_count_fresh` always reach the
//!   inner reader and refresh the entry.
//! - `has_voted` is never cached; it guards user actions.

use crate::ports::outbound::LedgerReader;
use async_trait::async_trait;
use lru::LruCache;
use parking_lot::Mutex;
use shared_types::{Address, CampaignLedgerView, LedgerId, LedgerResult};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::trace;

/// Read cache configuration.
#[derive(Clone, Debug)]
pub struct LedgerCacheConfig {
    /// How long a view may be served without re-reading the ledger.
    pub staleness: Duration,
    /// Maximum number of campaign views held.
    pub capacity: usize,
}

impl Default for LedgerCacheConfig {
    fn default() -> Self {
        Self {
            staleness: Duration::from_secs(30),
            capacity: 1024,
        }
    }
}

#[derive(Clone)]
struct Timed<T> {
    at: Instant,
    value: T,
}

impl<T: Clone> Timed<T> {
    fn fresh(&self, staleness: Duration) -> Option<T> {
        (self.at.elapsed() < staleness).then(|| self.value.clone())
    }
}

/// Caching decorator over a `LedgerReader`.
pub struct CachedLedgerReader<R: LedgerReader> {
    inner: Arc<R>,
    config: LedgerCacheConfig,
    views: Mutex<LruCache<LedgerId, Timed<CampaignLedgerView>>>,
    count: Mutex<Option<Timed<u64>>>,
    admin: Mutex<Option<Timed<Address>>>,
}

impl<R: LedgerReader> CachedLedgerReader<R> {
    pub fn new(inner: Arc<R>, config: LedgerCacheConfig) -> Self {
        let capacity = NonZeroUsize::new(config.capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            config,
            views: Mutex::new(LruCache::new(capacity)),
            count: Mutex::new(None),
            admin: Mutex::new(None),
        }
    }

    /// Underlying reader.
    pub fn inner(&self) -> &Arc<R> {
        &self.inner
    }

    /// Number of campaign views currently held.
    pub fn cached_views(&self) -> usize {
        self.views.lock().len()
    }

    fn store_count(&self, count: u64) {
        *self.count.lock() = Some(Timed {
            at: Instant::now(),
            value: count,
        });
    }

    fn store_view(&self, view: &CampaignLedgerView) {
        self.views.lock().put(
            view.id,
            Timed {
                at: Instant::now(),
                value: view.clone(),
            },
        );
    }
}

#[async_trait]
impl<R: LedgerReader + 'static> LedgerReader for CachedLedgerReader<R> {
    async fn read_campaign(&self, ledger_id: LedgerId) -> LedgerResult<CampaignLedgerView> {
        let hit = self
            .views
            .lock()
            .get(&ledger_id)
            .and_then(|t| t.fresh(self.config.staleness));
        if let Some(view) = hit {
            trace!(ledger_id, "[cl-01] ledger view served from cache");
            return Ok(view);
        }
        let view = self.inner.read_campaign(ledger_id).await?;
        self.store_view(&view);
        Ok(view)
    }

    async fn read_campaign_fresh(&self, ledger_id: LedgerId) -> LedgerResult<CampaignLedgerView> {
        let view = self.inner.read_campaign_fresh(ledger_id).await?;
        self.store_view(&view);
        Ok(view)
    }

    async fn read_campaign_count(&self) -> LedgerResult<u64> {
        if let Some(count) = self
            .count
            .lock()
            .as_ref()
            .and_then(|t| t.fresh(self.config.staleness))
        {
            return Ok(count);
        }
        let count = self.inner.read_campaign_count().await?;
        self.store_count(count);
        Ok(count)
    }

    async fn read_campaign_count_fresh(&self) -> LedgerResult<u64> {
        let count = self.inner.read_campaign_count_fresh().await?;
        self.store_count(count);
        Ok(count)
    }

    async fn read_admin(&self) -> LedgerResult<Address> {
        if let Some(admin) = self
            .admin
            .lock()
            .as_ref()
            .and_then(|t| t.fresh(self.config.staleness))
        {
            return Ok(admin);
        }
        let admin = self.inner.read_admin().await?;
        *self.admin.lock() = Some(Timed {
            at: Instant::now(),
            value: admin.clone(),
        });
        Ok(admin)
    }

    async fn has_voted(&self, ledger_id: LedgerId, voter: &Address) -> LedgerResult<bool> {
        self.inner.has_voted(ledger_id, voter).await
    }

    fn invalidate(&self, ledger_id: LedgerId) {
        self.views.lock().pop(&ledger_id);
        // A confirmed create changes the count.
        *self.count.lock() = None;
    }
}
