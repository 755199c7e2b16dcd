//! Remote recording metadata.
//!
//! # Architecture
//!
//! - **Domain models** (`domain.rs`) - what the rest of the crate sees
//! - **API DTOs** (`dto.rs`) - exact response shapes
//! - **Adapter** (`adapter.rs`) - DTO to domain conversion
//! - **Client** (`client.rs`) - HTTP access
//! - **Rate limiter** (`rate_limiter.rs`) - one outbound call per interval
//! - **Traits** (`traits.rs`) - the [`MetadataApi`] seam plus test mocks

mod adapter;
mod client;
pub mod domain;
pub mod dto;
pub mod rate_limiter;
pub mod traits;

pub use adapter::to_metadata;
pub use client::{ArchiveClient, DEFAULT_BASE_URL, download_url};
pub use domain::{MetadataError, RecordingMetadata, RemoteFile};
pub use rate_limiter::{DEFAULT_MIN_INTERVAL, RateLimiter};
pub use traits::MetadataApi;
