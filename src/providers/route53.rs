//! AWS Route53 provider.

use super::{ChangeInfo, ChangeStatus, DnsProvider, RecordUpdate};
use crate::error::{DdnsError, Operation, ProviderError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusoto_core::{Region, RusotoError};
use rusoto_route53::{
    Change, ChangeBatch, ChangeResourceRecordSetsError, ChangeResourceRecordSetsRequest,
    GetChangeError, GetChangeRequest, ResourceRecord, ResourceRecordSet, Route53,
    Route53Client,
};
use std::str::FromStr;

/// Route53 DNS provider.
pub struct Route53Provider {
    client: Route53Client,
}

impl Route53Provider {
    /// Create a provider, using the SDK's region resolution unless a region
    /// is given.
    pub fn new(region: Option<&str>) -> Result<Self> {
        let region = match region {
            Some(name) => Region::from_str(name)
                .map_err(|e| DdnsError::Config(format!("invalid region {}: {}", name, e)))?,
            None => Region::default(),
        };
        tracing::debug!("using Route53 region {}", region.name());

        Ok(Self::with_client(Route53Client::new(region)))
    }

    /// Create with an existing client (custom endpoint or credentials).
    pub fn with_client(client: Route53Client) -> Self {
        Self { client }
    }
}

/// Build the Route53 request for an upsert.
pub(crate) fn change_request(update: &RecordUpdate) -> ChangeResourceRecordSetsRequest {
    ChangeResourceRecordSetsRequest {
        hosted_zone_id: update.zone_id.clone(),
        change_batch: ChangeBatch {
            changes: vec![Change {
                action: update.action().to_string(),
                resource_record_set: ResourceRecordSet {
                    name: update.domain.clone(),
                    type_: update.record_type().to_string(),
                    resource_records: Some(vec![ResourceRecord {
                        value: update.target.clone(),
                    }]),
                    ttl: Some(update.ttl),
                    weight: Some(update.weight()),
                    set_identifier: Some(update.set_identifier().to_string()),
                    ..ResourceRecordSet::default()
                },
            }],
            comment: Some(update.comment().to_string()),
        },
    }
}

/// Change ids come back as `/change/<id>`; the API path wants the bare id.
pub(crate) fn change_id(id: &str) -> &str {
    id.strip_prefix("/change/").unwrap_or(id)
}

pub(crate) fn change_info(info: rusoto_route53::ChangeInfo) -> ChangeInfo {
    let submitted_at = DateTime::parse_from_rfc3339(&info.submitted_at)
        .ok()
        .map(|t| t.with_timezone(&Utc));

    ChangeInfo {
        id: info.id,
        status: ChangeStatus::parse(&info.status),
        comment: info.comment,
        submitted_at,
    }
}

/// Route53 error codes for service errors.
pub(crate) trait ServiceCode {
    fn code_and_message(&self) -> (&'static str, &str);
}

impl ServiceCode for ChangeResourceRecordSetsError {
    fn code_and_message(&self) -> (&'static str, &str) {
        match self {
            ChangeResourceRecordSetsError::InvalidChangeBatch(m) => ("InvalidChangeBatch", m),
            ChangeResourceRecordSetsError::InvalidInput(m) => ("InvalidInput", m),
            ChangeResourceRecordSetsError::NoSuchHealthCheck(m) => ("NoSuchHealthCheck", m),
            ChangeResourceRecordSetsError::NoSuchHostedZone(m) => ("NoSuchHostedZone", m),
            ChangeResourceRecordSetsError::PriorRequestNotComplete(m) => {
                ("PriorRequestNotComplete", m)
            }
        }
    }
}

impl ServiceCode for GetChangeError {
    fn code_and_message(&self) -> (&'static str, &str) {
        match self {
            GetChangeError::InvalidInput(m) => ("InvalidInput", m),
            GetChangeError::NoSuchChange(m) => ("NoSuchChange", m),
        }
    }
}

/// Classify a rusoto error into a [`ProviderError`].
pub(crate) fn classify<E: ServiceCode>(operation: Operation, err: RusotoError<E>) -> ProviderError {
    match err {
        RusotoError::Service(e) => {
            let (code, message) = e.code_and_message();
            ProviderError::new(operation, code, message)
        }
        RusotoError::HttpDispatch(e) => {
            ProviderError::new(operation, "RequestError", "send request failed").with_source(e)
        }
        RusotoError::Credentials(e) => ProviderError::new(
            operation,
            "NoCredentialProviders",
            "no valid providers in chain",
        )
        .with_source(e),
        RusotoError::Validation(m) => ProviderError::new(operation, "ValidationError", m),
        RusotoError::ParseError(m) => ProviderError::new(operation, "SerializationError", m),
        RusotoError::Unknown(response) => ProviderError::new(
            operation,
            "UnknownError",
            format!("HTTP {}: {}", response.status, response.body_as_str()),
        ),
        RusotoError::Blocking => {
            ProviderError::new(operation, "RequestError", "failed to run blocking future")
        }
    }
}

#[async_trait]
impl DnsProvider for Route53Provider {
    fn name(&self) -> &'static str {
        "route53"
    }

    async fn submit(&self, update: &RecordUpdate) -> Result<ChangeInfo> {
        let response = self
            .client
            .change_resource_record_sets(change_request(update))
            .await
            .map_err(|e| classify(Operation::ChangeRecordSets, e))?;

        Ok(change_info(response.change_info))
    }

    async fn get_change(&self, id: &str) -> Result<ChangeInfo> {
        let response = self
            .client
            .get_change(GetChangeRequest {
                id: change_id(id).to_string(),
            })
            .await
            .map_err(|e| classify(Operation::GetChange, e))?;

        Ok(change_info(response.change_info))
    }
}
