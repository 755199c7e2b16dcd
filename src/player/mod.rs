//! Playback of a selected recording's tracks.
//!
//! # Architecture
//!
//! ```text
//!   commands (play, seek, next...)        backend signals (can-play, ended,
//!                │                         time update, source error)
//!                ▼                                      │
//!   ┌──────────────────────────────────────────────────┴───┐
//!   │                  PlaybackEngine                      │
//!   │   owns PlaybackSession (playlist, state, position)   │
//!   └───────────────┬───────────────────────┬──────────────┘
//!                   │ AudioBackend          │ PlaybackObserver
//!                   ▼                       ▼
//!            audio element          UI / ChannelObserver
//! ```

mod engine;
mod events;
mod queue;
mod state;
mod traits;

pub use engine::{PlaybackEngine, RESTART_THRESHOLD_SECS, clamp_position, clamp_volume};
pub use events::{ChannelObserver, PlayerEvent};
pub use queue::Playlist;
pub use state::{
    AudioTrack, PlaybackSession, PlaybackSnapshot, PlaybackState, format_duration,
    normalize_duration,
};
pub use traits::{AudioBackend, NullObserver, PlaybackObserver, SilentBackend};

/// Player errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlaybackError {
    #[error("Failed to start '{track}': {message}")]
    SourceFailed { track: String, message: String },

    #[error("No track loaded")]
    NoTrack,

    #[error("Audio backend error: {0}")]
    Backend(String),
}
