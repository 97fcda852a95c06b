//! EC2 instance metadata client.

use crate::error::{DdnsError, Result};
use std::time::Duration;

/// Link-local address of the instance metadata service.
pub const DEFAULT_ENDPOINT: &str = "http://169.254.169.254";

const TOKEN_PATH: &str = "/latest/api/token";
const METADATA_PATH: &str = "/latest/meta-data";
const TOKEN_TTL_HEADER: &str = "x-aws-ec2-metadata-token-ttl-seconds";
const TOKEN_HEADER: &str = "x-aws-ec2-metadata-token";
const TOKEN_TTL_SECS: u32 = 21600;

/// Client for the instance metadata service.
///
/// Tries the session-token protocol first and falls back to plain reads when
/// no token can be obtained.
pub struct InstanceMetadataClient {
    client: reqwest::Client,
    endpoint: String,
}

impl InstanceMetadataClient {
    /// Create a client for the given base endpoint.
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        })
    }

    /// Whether the service answers at all, judged by fetching `instance-id`.
    pub async fn is_available(&self) -> bool {
        let token = self.fetch_token().await;
        self.check_instance_id(token.as_deref()).await
    }

    /// Fetch a metadata attribute, e.g. `public-ipv4`.
    pub async fn get_metadata(&self, path: &str) -> Result<String> {
        let token = self.fetch_token().await;
        self.read(path, token.as_deref()).await
    }

    /// Fetch the public IPv4 address, failing if the service is unreachable.
    /// One session token covers both the availability check and the read.
    pub async fn public_ipv4(&self) -> Result<String> {
        let token = self.fetch_token().await;
        if !self.check_instance_id(token.as_deref()).await {
            return Err(DdnsError::MetadataUnavailable(self.endpoint.clone()));
        }
        self.read("public-ipv4", token.as_deref()).await
    }

    async fn check_instance_id(&self, token: Option<&str>) -> bool {
        match self.read("instance-id", token).await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!("metadata service at {} not available: {}", self.endpoint, e);
                false
            }
        }
    }

    async fn read(&self, path: &str, token: Option<&str>) -> Result<String> {
        let url = format!("{}{}/{}", self.endpoint, METADATA_PATH, path.trim_start_matches('/'));

        let mut request = self.client.get(&url);
        if let Some(token) = token {
            request = request.header(TOKEN_HEADER, token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DdnsError::Metadata(format!(
                "EC2MetadataError: HTTP {} fetching {}",
                status, path
            )));
        }

        let body = response.text().await?;
        Ok(body.trim().to_string())
    }

    async fn fetch_token(&self) -> Option<String> {
        let url = format!("{}{}", self.endpoint, TOKEN_PATH);
        let response = self
            .client
            .put(&url)
            .header(TOKEN_TTL_HEADER, TOKEN_TTL_SECS.to_string())
            .send()
            .await;

        match response {
            Ok(r) if r.status().is_success() => r.text().await.ok().map(|t| t.trim().to_string()),
            Ok(r) => {
                tracing::trace!("metadata token request returned {}, using unauthenticated reads", r.status());
                None
            }
            Err(e) => {
                tracing::trace!("metadata token request failed: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_public_ipv4_single_token() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/latest/api/token"))
            .and(header(TOKEN_TTL_HEADER, "21600"))
            .respond_with(ResponseTemplate::new(200).set_body_string("session-token"))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/latest/meta-data/instance-id"))
            .and(header(TOKEN_HEADER, "session-token"))
            .respond_with(ResponseTemplate::new(200).set_body_string("i-0abc"))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/latest/meta-data/public-ipv4"))
            .and(header(TOKEN_HEADER, "session-token"))
            .respond_with(ResponseTemplate::new(200).set_body_string("198.51.100.7\n"))
            .mount(&mock_server)
            .await;

        let client = InstanceMetadataClient::new(mock_server.uri()).unwrap();
        assert_eq!(client.public_ipv4().await.unwrap(), "198.51.100.7");
    }

    #[tokio::test]
    async fn test_falls_back_without_token() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/latest/api/token"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/latest/meta-data/instance-id"))
            .respond_with(ResponseTemplate::new(200).set_body_string("i-0abc"))
            .mount(&mock_server)
            .await;

        let client = InstanceMetadataClient::new(format!("{}/", mock_server.uri())).unwrap();
        assert!(client.is_available().await);
        assert_eq!(client.get_metadata("/instance-id").await.unwrap(), "i-0abc");
    }

    #[tokio::test]
    async fn test_unavailable() {
        let mock_server = MockServer::start().await;

        let client = InstanceMetadataClient::new(mock_server.uri()).unwrap();
        let err = client.public_ipv4().await.unwrap_err();
        assert!(matches!(err, DdnsError::MetadataUnavailable(_)));
    }

    #[tokio::test]
    async fn test_missing_attribute() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/latest/meta-data/instance-id"))
            .respond_with(ResponseTemplate::new(200).set_body_string("i-0abc"))
            .mount(&mock_server)
            .await;

        let client = InstanceMetadataClient::new(mock_server.uri()).unwrap();
        let err = client.public_ipv4().await.unwrap_err();
        assert!(matches!(err, DdnsError::Metadata(msg) if msg.contains("404")));
    }
}
