//! Error types for route53-ddns.

use std::error::Error as StdError;
use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for route53-ddns.
pub type Result<T> = std::result::Result<T, DdnsError>;

/// Boxed underlying cause carried by provider errors.
pub type Cause = Box<dyn StdError + Send + Sync + 'static>;

/// DDNS error types.
#[derive(Error, Debug)]
pub enum DdnsError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input rejected before anything was sent to the provider.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Reading the IP file failed.
    #[error("can't read ip file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The instance metadata service could not be reached.
    #[error("Metadata service unavailable: {0}")]
    MetadataUnavailable(String),

    /// The metadata service answered but the query failed.
    #[error("Metadata error: {0}")]
    Metadata(String),

    /// Structured error reported by the DNS provider.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Network/HTTP error.
    #[error("Network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for DdnsError {
    fn from(e: reqwest::Error) -> Self {
        DdnsError::Network(e.to_string())
    }
}

impl DdnsError {
    /// Whether the error stems from bad input rather than a failed operation.
    pub fn is_usage(&self) -> bool {
        matches!(self, DdnsError::Config(_) | DdnsError::Validation(_))
    }
}

/// Provider call that produced a [`ProviderError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ChangeRecordSets,
    GetChange,
    WaitForChange,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::ChangeRecordSets => "ChangeResourceRecordSets",
            Operation::GetChange => "GetChange",
            Operation::WaitForChange => "WaitUntilResourceRecordSetsChanged",
        };
        f.write_str(name)
    }
}

/// Error returned by the DNS provider, with its machine-readable code and
/// the transport or credential failure underneath it, if any.
#[derive(Debug)]
pub struct ProviderError {
    pub operation: Operation,
    pub code: String,
    pub message: String,
    pub source: Option<Cause>,
}

impl ProviderError {
    pub fn new(operation: Operation, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            operation,
            code: code.into(),
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<Cause>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.code, self.message, self.operation)?;
        if let Some(source) = &self.source {
            write!(f, "\ncaused by: {}", source)?;
        }
        Ok(())
    }
}

impl StdError for ProviderError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

/// Report a terminal error.
///
/// Provider errors log their code and message, then the full text, and
/// finally print the wrapped cause to `out` when there is one. Everything
/// else is printed to `out` as-is.
pub fn report(err: &DdnsError, out: &mut impl Write) -> io::Result<()> {
    match err {
        DdnsError::Provider(provider) => {
            tracing::error!("Error: {} {}", provider.code, provider.message);
            tracing::error!("Error: {}", provider);
            if let Some(cause) = &provider.source {
                writeln!(out, "{}", cause)?;
            }
        }
        other => writeln!(out, "{}", other)?,
    }
    out.flush()
}
