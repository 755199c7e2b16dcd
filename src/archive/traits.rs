//! Trait definition for the remote metadata collaborator.
//!
//! Enables dependency injection: the selector is written against
//! [`MetadataApi`], production passes an [`ArchiveClient`], tests pass a mock.

use async_trait::async_trait;

use super::client::ArchiveClient;
use super::domain::{MetadataError, RecordingMetadata};

/// Per-recording metadata lookup.
#[async_trait]
pub trait MetadataApi: Send + Sync {
    /// Fetch descriptive metadata for one recording.
    async fn metadata(&self, identifier: &str) -> Result<RecordingMetadata, MetadataError>;
}

#[async_trait]
impl MetadataApi for ArchiveClient {
    async fn metadata(&self, identifier: &str) -> Result<RecordingMetadata, MetadataError> {
        self.fetch_metadata(identifier).await
    }
}

#[async_trait]
impl<T: MetadataApi + ?Sized> MetadataApi for std::sync::Arc<T> {
    async fn metadata(&self, identifier: &str) -> Result<RecordingMetadata, MetadataError> {
        (**self).metadata(identifier).await
    }
}
