//! Polling a submitted change until it is in sync.

use crate::config::WaiterConfig;
use crate::error::{Operation, ProviderError, Result};
use crate::providers::{ChangeInfo, DnsProvider};

/// Polls the provider until a change reaches `INSYNC`.
pub struct PropagationWaiter<'a> {
    provider: &'a dyn DnsProvider,
    config: WaiterConfig,
}

impl<'a> PropagationWaiter<'a> {
    pub fn new(provider: &'a dyn DnsProvider, config: WaiterConfig) -> Self {
        Self { provider, config }
    }

    /// Block until `change` is in sync. Poll errors end the wait immediately;
    /// running out of attempts fails with `ResourceNotReady`.
    pub async fn wait(&self, change: &ChangeInfo) -> Result<ChangeInfo> {
        tracing::info!(
            "waiting changes to propagate: {}",
            change.comment.as_deref().unwrap_or_default()
        );

        for attempt in 1..=self.config.max_attempts {
            let current = self.provider.get_change(&change.id).await?;
            if current.is_in_sync() {
                tracing::debug!("change {} in sync after {} check(s)", current.id, attempt);
                return Ok(current);
            }

            tracing::debug!(
                "change {} is {} (check {}/{})",
                current.id,
                current.status,
                attempt,
                self.config.max_attempts
            );

            if attempt < self.config.max_attempts {
                tokio::time::sleep(self.config.delay).await;
            }
        }

        Err(ProviderError::new(
            Operation::WaitForChange,
            "ResourceNotReady",
            format!(
                "exceeded wait attempts ({}) for change {}",
                self.config.max_attempts, change.id
            ),
        )
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DdnsError;
    use crate::providers::{ChangeStatus, MockDnsProvider};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn change(status: ChangeStatus) -> ChangeInfo {
        ChangeInfo {
            id: "/change/C1".to_string(),
            status,
            comment: Some("Sample update.".to_string()),
            submitted_at: None,
        }
    }

    fn fast(max_attempts: u32) -> WaiterConfig {
        WaiterConfig {
            delay: Duration::ZERO,
            max_attempts,
        }
    }

    #[tokio::test]
    async fn test_wait_until_in_sync() {
        let calls = Arc::new(AtomicU32::new(0));
        let seen = calls.clone();

        let mut provider = MockDnsProvider::new();
        provider
            .expect_get_change()
            .withf(|id| id == "/change/C1")
            .times(3)
            .returning(move |_| {
                let n = seen.fetch_add(1, Ordering::SeqCst);
                Ok(change(if n < 2 {
                    ChangeStatus::Pending
                } else {
                    ChangeStatus::InSync
                }))
            });

        let done = PropagationWaiter::new(&provider, fast(10))
            .wait(&change(ChangeStatus::Pending))
            .await
            .unwrap();

        assert!(done.is_in_sync());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_wait_exhausts_attempts() {
        let mut provider = MockDnsProvider::new();
        provider
            .expect_get_change()
            .times(3)
            .returning(|_| Ok(change(ChangeStatus::Pending)));

        let err = PropagationWaiter::new(&provider, fast(3))
            .wait(&change(ChangeStatus::Pending))
            .await
            .unwrap_err();

        match err {
            DdnsError::Provider(e) => {
                assert_eq!(e.code, "ResourceNotReady");
                assert_eq!(e.operation, Operation::WaitForChange);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_wait_stops_on_poll_error() {
        let mut provider = MockDnsProvider::new();
        provider.expect_get_change().times(1).returning(|_| {
            Err(ProviderError::new(Operation::GetChange, "NoSuchChange", "no change").into())
        });

        let err = PropagationWaiter::new(&provider, fast(5))
            .wait(&change(ChangeStatus::Pending))
            .await
            .unwrap_err();

        assert!(matches!(err, DdnsError::Provider(e) if e.code == "NoSuchChange"));
    }
}
