//! Resolution of the IP address to publish.

use crate::error::{DdnsError, Result};
use crate::metadata::InstanceMetadataClient;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Where the target IP comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSource {
    /// Use the given value as-is.
    Explicit(String),
    /// Use the first line of a file.
    File(PathBuf),
    /// Ask the instance metadata service for the public IPv4.
    Metadata,
}

impl TargetSource {
    /// Pick a source from the command line options.
    ///
    /// An explicit IP wins over a file, which wins over metadata. An empty
    /// explicit IP counts as not given.
    pub fn select(ip: Option<String>, ip_file: Option<PathBuf>, metadata: bool) -> Result<Self> {
        if let Some(ip) = ip.filter(|ip| !ip.is_empty()) {
            return Ok(TargetSource::Explicit(ip));
        }
        if let Some(path) = ip_file.filter(|p| !p.as_os_str().is_empty()) {
            return Ok(TargetSource::File(path));
        }
        if metadata {
            return Ok(TargetSource::Metadata);
        }
        Err(DdnsError::Validation(
            "one of --ip, --ip-file or --ip-metadata is required".to_string(),
        ))
    }
}

/// Turns a [`TargetSource`] into the IP string to publish.
pub struct TargetResolver {
    metadata: InstanceMetadataClient,
}

impl TargetResolver {
    pub fn new(metadata: InstanceMetadataClient) -> Self {
        Self { metadata }
    }

    /// Resolve the target. The result is not checked for IP syntax and may
    /// be empty when a file's first line is blank.
    pub async fn resolve(&self, source: &TargetSource) -> Result<String> {
        let target = match source {
            TargetSource::Explicit(ip) => ip.clone(),
            TargetSource::File(path) => read_first_line(path).await?,
            TargetSource::Metadata => self.metadata.public_ipv4().await?,
        };

        tracing::debug!("resolved target {:?} from {:?}", target, source);
        Ok(target)
    }
}

async fn read_first_line(path: &Path) -> Result<String> {
    let io_err = |source| DdnsError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = tokio::fs::File::open(path).await.map_err(io_err)?;
    let mut lines = BufReader::new(file).lines();
    let line = lines.next_line().await.map_err(io_err)?;

    Ok(line.unwrap_or_default().trim().to_string())
}
