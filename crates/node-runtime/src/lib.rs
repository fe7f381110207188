//! # Node Runtime Library
//!
//! Configuration, tracing setup and service wiring for the `campaign-sync`
//! binary, exposed as a library for tests.

pub mod config;
pub mod container;
pub mod demo;
pub mod telemetry;

pub use config::{ConfigError, RuntimeConfig};
pub use container::CampaignRuntime;
pub use demo::{seed_demo, DemoSeed};
pub use telemetry::init_tracing;
