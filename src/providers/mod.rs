//! DNS provider abstraction and the Route53 implementation.

mod route53;

pub use route53::Route53Provider;

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;

/// Weight given to the record set; every update writes a single weighted record.
pub const RECORD_WEIGHT: i64 = 1;

/// Set identifier attached to the weighted record set.
pub const SET_IDENTIFIER: &str = "Arbitrary Id describing this change set";

/// Comment attached to every change batch.
pub const CHANGE_COMMENT: &str = "Sample update.";

/// Change action; records are always created or replaced.
pub const ACTION_UPSERT: &str = "UPSERT";

/// Address record type.
pub const RECORD_TYPE_A: &str = "A";

/// A single A record upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordUpdate {
    pub domain: String,
    pub zone_id: String,
    pub target: String,
    pub ttl: i64,
}

impl RecordUpdate {
    pub fn new(
        domain: impl Into<String>,
        zone_id: impl Into<String>,
        target: impl Into<String>,
        ttl: i64,
    ) -> Self {
        Self {
            domain: domain.into(),
            zone_id: zone_id.into(),
            target: target.into(),
            ttl,
        }
    }

    pub fn action(&self) -> &'static str {
        ACTION_UPSERT
    }

    pub fn record_type(&self) -> &'static str {
        RECORD_TYPE_A
    }

    pub fn weight(&self) -> i64 {
        RECORD_WEIGHT
    }

    pub fn set_identifier(&self) -> &'static str {
        SET_IDENTIFIER
    }

    pub fn comment(&self) -> &'static str {
        CHANGE_COMMENT
    }
}

/// Propagation state of a submitted change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeStatus {
    Pending,
    InSync,
    Other(String),
}

impl ChangeStatus {
    pub fn parse(status: &str) -> Self {
        match status {
            "PENDING" => ChangeStatus::Pending,
            "INSYNC" => ChangeStatus::InSync,
            other => ChangeStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeStatus::Pending => f.write_str("PENDING"),
            ChangeStatus::InSync => f.write_str("INSYNC"),
            ChangeStatus::Other(s) => f.write_str(s),
        }
    }
}

/// Change handle returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeInfo {
    pub id: String,
    pub status: ChangeStatus,
    pub comment: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl ChangeInfo {
    pub fn is_in_sync(&self) -> bool {
        self.status == ChangeStatus::InSync
    }
}

/// Trait for DNS providers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Get the provider name.
    fn name(&self) -> &'static str;

    /// Submit an upsert of the record.
    async fn submit(&self, update: &RecordUpdate) -> Result<ChangeInfo>;

    /// Look up the current state of a submitted change.
    async fn get_change(&self, id: &str) -> Result<ChangeInfo>;
}
