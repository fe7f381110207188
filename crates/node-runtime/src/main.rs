//! # campaign-sync
//!
//! Wires the reconciliation core onto in-memory adapters and runs the sync
//! sweep, either once (`CL_SYNC_INTERVAL_SECS=0`) or periodically until
//! Ctrl-C.

use anyhow::{Context, Result};
use node_runtime::{init_tracing, seed_demo, CampaignRuntime, RuntimeConfig};
use std::time::Duration;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let config = RuntimeConfig::from_env().context("loading configuration")?;
    config.validate().context("validating configuration")?;
    init_tracing(&config).context("initialising tracing")?;

    info!(
        interval_secs = config.sync_interval_secs,
        demo_seed = config.demo_seed,
        "[runtime] starting campaign-sync"
    );

    let interval = config.sync_interval_secs;
    let runtime = CampaignRuntime::new(config);
    if runtime.config.demo_seed {
        seed_demo(&runtime).await.context("seeding demo data")?;
    }

    if interval == 0 {
        let report = runtime.sweep().await.context("sync sweep")?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let completed = runtime
        .run_periodic(Duration::from_secs(interval), async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!(error = %err, "[runtime] ctrl-c handler unavailable");
                std::future::pending::<()>().await;
            }
        })
        .await;

    info!(completed, "[runtime] stopped");
    Ok(())
}
