//! Demo data for a fresh in-memory deployment.
//!
//! Creates a handful of campaigns through the admin service, records votes,
//! likes and comments through the recorder, then leaves the cache behind the
//! ledger in two ways so the first sweep has work to do:
//!
//! - tallies moved on the ledger without a local reconciliation
//! - a cache record pointing at a ledger id that was never created

use crate::container::CampaignRuntime;
use anyhow::{Context, Result};
use cl_02_cache_store::{CampaignStore, CreateOutcome};
use cl_04_action_recorder::ActionRecorderApi;
use cl_05_campaign_admin::NewCampaign;
use shared_types::{Address, CampaignCacheRecord, CampaignStatus, VoteOption};
use tracing::{info, warn};

/// Ledger id no demo campaign will reach.
pub const ORPHAN_LEDGER_ID: u64 = 50;

/// Ids produced by the seed.
#[derive(Debug, Clone)]
pub struct DemoSeed {
    pub campaign_ids: Vec<String>,
    pub orphan_id: String,
}

fn voter(n: u8) -> Address {
    Address::new(format!("0x{:040x}", 0xb0b0 + u64::from(n)))
}

/// Populate `runtime` with demo campaigns and activity.
pub async fn seed_demo(runtime: &CampaignRuntime) -> Result<DemoSeed> {
    let admin = runtime.config.ledger_admin.clone();
    let now = runtime.time.now();

    let requests = [
        NewCampaign::new(
            "Treasury allocation",
            "Release 5% of the treasury to the infrastructure fund.",
        ),
        NewCampaign::new("Protocol upgrade", "Adopt the v2 fee schedule.").with_abstain(),
        NewCampaign::new("Community grant", "Fund the translation effort.")
            .ending_at(now.saturating_add(3_600)),
    ];

    let mut campaign_ids = Vec::with_capacity(requests.len());
    for request in requests {
        let title = request.title.clone();
        let created = runtime
            .admin
            .create_campaign(&admin, request)
            .await
            .with_context(|| format!("creating demo campaign {title:?}"))?;
        campaign_ids.push(created.campaign_id);
    }

    let ballots = [
        (0, 1, VoteOption::Yes, 3),
        (0, 2, VoteOption::No, 1),
        (1, 1, VoteOption::Abstain, 2),
        (1, 3, VoteOption::Yes, 5),
    ];
    for (campaign, who, option, weight) in ballots {
        runtime
            .recorder
            .record_vote(&campaign_ids[campaign], &voter(who), option, weight)
            .await
            .with_context(|| format!("recording demo vote on {}", campaign_ids[campaign]))?;
    }

    for who in 1..=3 {
        runtime
            .recorder
            .record_like(&campaign_ids[0], &voter(who))
            .await
            .context("recording demo like")?;
    }
    let comment = runtime
        .recorder
        .add_comment(&campaign_ids[1], &voter(2), "Does this change gas costs?")
        .await
        .context("adding demo comment")?;
    runtime
        .recorder
        .record_comment_like(&campaign_ids[1], &comment.id, &voter(1))
        .await
        .context("liking demo comment")?;

    // votes arriving through another client, not yet reconciled
    let grant = runtime
        .store
        .get_record(&campaign_ids[2])
        .await?
        .context("demo grant campaign vanished")?;
    runtime.ledger.set_tallies(grant.ledger_id, 7, 2, 0);

    let mut orphan = CampaignCacheRecord::new("demo-orphan", ORPHAN_LEDGER_ID, admin);
    orphan.title = "Imported campaign".to_string();
    orphan.created_at = now;
    orphan.cached_status = CampaignStatus::Live;
    if runtime.store.insert_record(&orphan).await? == CreateOutcome::AlreadyExists {
        warn!(orphan_id = %orphan.id, "[runtime] demo orphan already present");
    }

    info!(
        campaigns = campaign_ids.len(),
        orphan_id = %orphan.id,
        "[runtime] demo data seeded"
    );
    Ok(DemoSeed {
        campaign_ids,
        orphan_id: orphan.id,
    })
}
