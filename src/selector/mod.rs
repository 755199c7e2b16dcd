//! Choosing which recording of a performance to play.
//!
//! [`RecordingSelector`] gathers candidates from a [`ShowCatalog`](crate::catalog::ShowCatalog),
//! optionally enriches them through a [`MetadataApi`](crate::archive::MetadataApi)
//! and ranks them with the scoring engine. [`tracks_for`] turns the winner's
//! file list into a playlist for the player.

pub mod inference;
mod service;
mod tracks;

pub use inference::{infer_format, infer_source_type, to_quality};
pub use service::{
    EnrichmentStatus, RecordingSelector, SelectedRecording, SelectionOutcome, SelectorOptions,
};
pub use tracks::tracks_for;
