//! Campaign creation requests.

use shared_types::{CampaignCacheRecord, LedgerId, SocialLinks, UnixSeconds};

/// Default voting window when no end time is given.
pub const DEFAULT_DURATION_SECS: u64 = 7 * 24 * 60 * 60;

/// Admin request to open a new campaign.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewCampaign {
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub social_links: SocialLinks,
    /// Explicit end of the voting window. `None` uses the default duration.
    pub end_time: Option<UnixSeconds>,
    pub allow_abstain: bool,
}

impl NewCampaign {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn ending_at(mut self, end_time: UnixSeconds) -> Self {
        self.end_time = Some(end_time);
        self
    }

    pub fn with_abstain(mut self) -> Self {
        self.allow_abstain = true;
        self
    }

    /// Check the request and compute the ledger duration.
    pub fn duration_secs(&self, now: UnixSeconds, default_duration: u64) -> Result<u64, String> {
        if self.title.trim().is_empty() {
            return Err("title must not be empty".to_string());
        }
        match self.end_time {
            Some(end) if end <= now => Err(format!("end time {end} is not in the future")),
            Some(end) => Ok(end - now),
            None if default_duration == 0 => Err("default duration is zero".to_string()),
            None => Ok(default_duration),
        }
    }
}

/// A campaign confirmed on the ledger and written to the cache.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreatedCampaign {
    pub campaign_id: String,
    pub ledger_id: LedgerId,
    pub tx_hash: String,
    pub record: CampaignCacheRecord,
}
