//! Run configuration, built once from the parsed command line.

use crate::cli::Cli;
use crate::error::{DdnsError, Result};
use crate::resolver::TargetSource;
use std::time::Duration;

/// Default delay between propagation checks.
pub const DEFAULT_WAIT_DELAY: Duration = Duration::from_secs(30);

/// Default number of propagation checks.
pub const DEFAULT_WAIT_MAX_ATTEMPTS: u32 = 60;

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// DNS record name (e.g., "home.example.com").
    pub domain: String,
    /// Route53 hosted zone id.
    pub zone_id: String,
    /// Record TTL in seconds.
    pub ttl: i64,
    /// Where the target IP comes from.
    pub source: TargetSource,
    /// Block until the change is in sync.
    pub wait: bool,
    /// Region override for the Route53 client.
    pub region: Option<String>,
    /// Base URL of the instance metadata service.
    pub metadata_endpoint: String,
    /// Propagation polling settings.
    pub waiter: WaiterConfig,
}

/// Propagation polling settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaiterConfig {
    pub delay: Duration,
    pub max_attempts: u32,
}

impl Default for WaiterConfig {
    fn default() -> Self {
        Self {
            delay: DEFAULT_WAIT_DELAY,
            max_attempts: DEFAULT_WAIT_MAX_ATTEMPTS,
        }
    }
}

impl Config {
    /// Build and validate the configuration from parsed arguments.
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let domain = required(cli.domain, "--domain")?;
        let zone_id = required(cli.zone_id, "--zone")?;
        let source = TargetSource::select(cli.ip, cli.ip_file, cli.ip_metadata)?;

        if cli.wait_max_attempts == 0 {
            return Err(DdnsError::Config(
                "--wait-max-attempts must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            domain,
            zone_id,
            ttl: cli.ttl,
            source,
            wait: cli.wait,
            region: cli.region.filter(|r| !r.trim().is_empty()),
            metadata_endpoint: cli.metadata_endpoint,
            waiter: WaiterConfig {
                delay: Duration::from_secs(cli.wait_delay),
                max_attempts: cli.wait_max_attempts,
            },
        })
    }
}

fn required(value: Option<String>, flag: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(DdnsError::Validation(format!("{} is required", flag))),
    }
}
