//! # Runtime Configuration
//!
//! Groups the per-subsystem config structs and overrides them from `CL_*`
//! environment variables.
//!
//! | Variable | Field |
//! |----------|-------|
//! | `CL_LOG_LEVEL` | `log_level` |
//! | `CL_JSON_LOGS` | `json_logs` |
//! | `CL_SYNC_INTERVAL_SECS` | `sync_interval_secs` (0 = run once) |
//! | `CL_LEDGER_STALENESS_SECS` | `ledger_cache.staleness` |
//! | `CL_SYNC_MAX_CONCURRENT_READS` | `sync.max_concurrent_reads` |
//! | `CL_ADMIN_WHITELIST` | `admin.whitelist` (comma separated) |
//! | `CL_LEDGER_ADMIN` | `ledger_admin` |
//! | `CL_DEMO_SEED` | `demo_seed` |

use cl_01_ledger_gateway::LedgerCacheConfig;
use cl_03_reconciliation::{ReconcilerConfig, SyncConfig};
use cl_04_action_recorder::RecorderConfig;
use cl_05_campaign_admin::AdminConfig;
use shared_types::Address;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Address administering the in-memory ledger unless overridden.
pub const DEFAULT_LEDGER_ADMIN: &str = "0x00000000000000000000000000000000000ad31e";

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Default `EnvFilter` directive. `RUST_LOG` takes precedence.
    pub log_level: String,
    /// Emit JSON log lines instead of the human-readable format.
    pub json_logs: bool,
    /// Seconds between sync sweeps. Zero runs a single sweep and exits.
    pub sync_interval_secs: u64,
    /// Populate the in-memory ledger and cache with demo campaigns.
    pub demo_seed: bool,
    /// Admin identity of the in-memory ledger.
    pub ledger_admin: Address,
    pub ledger_cache: LedgerCacheConfig,
    pub reconciler: ReconcilerConfig,
    pub sync: SyncConfig,
    pub recorder: RecorderConfig,
    pub admin: AdminConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            sync_interval_secs: 0,
            demo_seed: false,
            ledger_admin: Address::new(DEFAULT_LEDGER_ADMIN),
            ledger_cache: LedgerCacheConfig::default(),
            reconciler: ReconcilerConfig::default(),
            sync: SyncConfig::default(),
            recorder: RecorderConfig::default(),
            admin: AdminConfig::default(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} has an invalid value {value:?}")]
    InvalidValue { var: &'static str, value: String },

    #[error("sync.max_concurrent_reads must be at least 1")]
    ZeroConcurrency,

    #[error("ledger_cache.capacity must be at least 1")]
    ZeroCacheCapacity,

    #[error("admin.default_duration_secs must be at least 1")]
    ZeroDefaultDuration,

    #[error("recorder.max_comment_chars must be at least 1")]
    ZeroCommentLength,

    #[error("ledger admin address is empty")]
    EmptyLedgerAdmin,
}

impl RuntimeConfig {
    /// Defaults overridden from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Defaults overridden through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        if let Some(level) = get("CL_LOG_LEVEL") {
            config.log_level = level.trim().to_string();
        }
        if let Some(raw) = get("CL_JSON_LOGS") {
            config.json_logs = parse_flag("CL_JSON_LOGS", &raw)?;
        }
        if let Some(raw) = get("CL_DEMO_SEED") {
            config.demo_seed = parse_flag("CL_DEMO_SEED", &raw)?;
        }
        if let Some(raw) = get("CL_SYNC_INTERVAL_SECS") {
            config.sync_interval_secs = parse_num("CL_SYNC_INTERVAL_SECS", &raw)?;
        }
        if let Some(raw) = get("CL_LEDGER_STALENESS_SECS") {
            let secs: u64 = parse_num("CL_LEDGER_STALENESS_SECS", &raw)?;
            config.ledger_cache.staleness = Duration::from_secs(secs);
        }
        if let Some(raw) = get("CL_SYNC_MAX_CONCURRENT_READS") {
            config.sync.max_concurrent_reads = parse_num("CL_SYNC_MAX_CONCURRENT_READS", &raw)?;
        }
        if let Some(raw) = get("CL_ADMIN_WHITELIST") {
            config.admin.whitelist = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(Address::new)
                .collect();
        }
        if let Some(raw) = get("CL_LEDGER_ADMIN") {
            config.ledger_admin = Address::new(raw.trim());
        }

        Ok(config)
    }

    /// Reject values the services cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sync.max_concurrent_reads == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.ledger_cache.capacity == 0 {
            return Err(ConfigError::ZeroCacheCapacity);
        }
        if self.admin.default_duration_secs == 0 {
            return Err(ConfigError::ZeroDefaultDuration);
        }
        if self.recorder.max_comment_chars == 0 {
            return Err(ConfigError::ZeroCommentLength);
        }
        if self.ledger_admin.is_empty() {
            return Err(ConfigError::EmptyLedgerAdmin);
        }
        Ok(())
    }
}

fn parse_num<T: FromStr>(var: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        var,
        value: raw.to_string(),
    })
}

fn parse_flag(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var,
            value: raw.to_string(),
        }),
    }
}
