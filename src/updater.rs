//! Submission of the record upsert.

use crate::error::Result;
use crate::providers::{ChangeInfo, DnsProvider, RecordUpdate};

/// Submits one A record upsert through a provider.
pub struct RecordUpdater<'a> {
    provider: &'a dyn DnsProvider,
}

impl<'a> RecordUpdater<'a> {
    pub fn new(provider: &'a dyn DnsProvider) -> Self {
        Self { provider }
    }

    /// Upsert `domain` in `zone_id` to point at `target`.
    pub async fn update(
        &self,
        domain: &str,
        zone_id: &str,
        ttl: i64,
        target: &str,
    ) -> Result<ChangeInfo> {
        let update = RecordUpdate::new(domain, zone_id, target, ttl);

        tracing::info!("setting {} to IP {} in zone {}", domain, target, zone_id);

        let change = self.provider.submit(&update).await?;
        match change.submitted_at {
            Some(at) => tracing::debug!(
                "{} accepted change {} with status {} at {}",
                self.provider.name(),
                change.id,
                change.status,
                at.to_rfc3339()
            ),
            None => tracing::debug!(
                "{} accepted change {} with status {}",
                self.provider.name(),
                change.id,
                change.status
            ),
        }

        Ok(change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DdnsError, Operation, ProviderError};
    use crate::providers::{ChangeStatus, MockDnsProvider};
    use chrono::Utc;

    #[tokio::test]
    async fn test_update_submits_upsert() {
        let mut provider = MockDnsProvider::new();
        provider.expect_name().return_const("mock");
        provider
            .expect_submit()
            .withf(|u| {
                u.domain == "example.com"
                    && u.zone_id == "Z123"
                    && u.target == "203.0.113.9"
                    && u.ttl == 120
            })
            .times(1)
            .returning(|_| {
                Ok(ChangeInfo {
                    id: "C1".to_string(),
                    status: ChangeStatus::Pending,
                    comment: Some("Sample update.".to_string()),
                    submitted_at: Some(Utc::now()),
                })
            });

        let change = RecordUpdater::new(&provider)
            .update("example.com", "Z123", 120, "203.0.113.9")
            .await
            .unwrap();

        assert_eq!(change.id, "C1");
        assert_eq!(change.status, ChangeStatus::Pending);
    }

    #[tokio::test]
    async fn test_update_propagates_provider_error() {
        let mut provider = MockDnsProvider::new();
        provider.expect_submit().times(1).returning(|_| {
            Err(ProviderError::new(
                Operation::ChangeRecordSets,
                "InvalidChangeBatch",
                "RRSet with DNS name example.com. is not permitted",
            )
            .into())
        });

        let err = RecordUpdater::new(&provider)
            .update("example.com", "Z123", 60, "203.0.113.9")
            .await
            .unwrap_err();

        match err {
            DdnsError::Provider(e) => assert_eq!(e.code, "InvalidChangeBatch"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
