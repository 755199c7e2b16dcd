//! Archive metadata HTTP client
//!
//! Fetches `/metadata/{identifier}` from the archive service. Pacing is the
//! caller's job: share one [`RateLimiter`](super::RateLimiter) across all
//! requests to stay under one call per second.

use super::domain::{MetadataError, RecordingMetadata};
use super::{adapter, dto};

/// Default service root.
pub const DEFAULT_BASE_URL: &str = "https://archive.org";

/// User agent string sent with every request
const USER_AGENT: &str = concat!(
    "showpicker/",
    env!("CARGO_PKG_VERSION"),
    " (concert recording selector)"
);

/// Archive metadata API client
#[derive(Debug, Clone)]
pub struct ArchiveClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl ArchiveClient {
    /// Create a client for the public service
    pub fn new() -> Result<Self, MetadataError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client against a custom base URL (mirrors, tests)
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, MetadataError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| MetadataError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL for the metadata of one recording
    pub fn metadata_url(&self, identifier: &str) -> String {
        format!("{}/metadata/{}", self.base_url, urlencoding::encode(identifier))
    }

    /// URL a file of a recording can be streamed from
    pub fn download_url(&self, identifier: &str, file_name: &str) -> String {
        download_url(&self.base_url, identifier, file_name)
    }

    /// Fetch and convert the metadata for one recording
    pub async fn fetch_metadata(&self, identifier: &str) -> Result<RecordingMetadata, MetadataError> {
        let response = self.send_metadata_request(identifier).await?;
        adapter::to_metadata(identifier, response)
    }

    /// Send the HTTP request and parse the response
    async fn send_metadata_request(
        &self,
        identifier: &str,
    ) -> Result<dto::MetadataResponse, MetadataError> {
        let url = self.metadata_url(identifier);
        tracing::debug!(%url, "Fetching recording metadata");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| MetadataError::Network(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(MetadataError::NotFound(identifier.to_string()));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MetadataError::RateLimited);
        }

        if !status.is_success() {
            return Err(MetadataError::Http {
                status: status.as_u16(),
            });
        }

        response
            .json::<dto::MetadataResponse>()
            .await
            .map_err(|e| MetadataError::Parse(e.to_string()))
    }
}

/// `{base}/download/{identifier}/{file}` with each path segment encoded.
pub fn download_url(base_url: &str, identifier: &str, file_name: &str) -> String {
    let file_path = file_name
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");
    format!(
        "{}/download/{}/{}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(identifier),
        file_path
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = ArchiveClient::new().unwrap();
        assert_eq!(client.base_url(), "https://archive.org");
    }

    #[test]
    fn test_client_with_custom_url() {
        let client = ArchiveClient::with_base_url("http://localhost:8080/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(
            client.metadata_url("gd77-05-08.sbd"),
            "http://localhost:8080/metadata/gd77-05-08.sbd"
        );
    }

    #[test]
    fn test_download_url_encodes_segments() {
        assert_eq!(
            download_url("https://archive.org", "gd77", "disc 1/01 Intro.flac"),
            "https://archive.org/download/gd77/disc%201/01%20Intro.flac"
        );
    }

    #[test]
    fn test_user_agent_format() {
        assert!(USER_AGENT.starts_with("showpicker/"));
    }
}
