//! Resolve, update, and optionally wait.

use crate::config::Config;
use crate::error::{DdnsError, Result};
use crate::providers::{ChangeInfo, DnsProvider};
use crate::resolver::TargetResolver;
use crate::updater::RecordUpdater;
use crate::waiter::PropagationWaiter;

/// How far a successful run got.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The change was accepted but propagation was not awaited.
    Sent(ChangeInfo),
    /// The provider reported the change in sync.
    Applied(ChangeInfo),
}

impl Outcome {
    pub fn change(&self) -> &ChangeInfo {
        match self {
            Outcome::Sent(change) | Outcome::Applied(change) => change,
        }
    }
}

/// Run one update.
pub async fn run(
    config: &Config,
    resolver: &TargetResolver,
    provider: &dyn DnsProvider,
) -> Result<Outcome> {
    let target = resolver.resolve(&config.source).await?;
    if target.trim().is_empty() {
        return Err(DdnsError::Validation(format!(
            "resolved target for {} is empty",
            config.domain
        )));
    }

    let change = RecordUpdater::new(provider)
        .update(&config.domain, &config.zone_id, config.ttl, &target)
        .await?;

    if !config.wait {
        return Ok(Outcome::Sent(change));
    }

    let applied = PropagationWaiter::new(provider, config.waiter)
        .wait(&change)
        .await?;
    Ok(Outcome::Applied(applied))
}
