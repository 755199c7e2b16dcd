//! Playback state and track types.

use serde::{Deserialize, Serialize};

use super::queue::Playlist;

/// Current playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// Nothing playing: initial, after the playlist ran out, after teardown
    #[default]
    Idle,
    /// Source assigned, not yet playable
    Loading,
    Playing,
    Paused,
    /// Source failed; cleared by a retry or a new load
    Error,
}

impl PlaybackState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Error => "error",
        }
    }
}

/// One playable file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioTrack {
    pub url: String,
    pub title: String,
    /// Seconds; 0 when unknown
    pub duration: f64,
    pub format: String,
    pub size_bytes: u64,
    /// Position in its playlist, 0-based
    pub index: usize,
}

/// The single active session: playlist, position and transport state.
///
/// Replaced wholesale when a new show is loaded.
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    pub(crate) playlist: Playlist,
    pub(crate) state: PlaybackState,
    /// Seconds into the current track
    pub(crate) position: f64,
    /// Seconds; 0 when unknown
    pub(crate) duration: f64,
    /// 0.0 - 1.0
    pub(crate) volume: f32,
}

impl PlaybackSession {
    pub(crate) fn new(playlist: Playlist, volume: f32) -> Self {
        Self {
            playlist,
            state: PlaybackState::Idle,
            position: 0.0,
            duration: 0.0,
            volume,
        }
    }
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self::new(Playlist::empty(), 1.0)
    }
}

/// Point-in-time copy of the engine's state for consumers.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSnapshot {
    pub state: PlaybackState,
    pub track: Option<AudioTrack>,
    pub index: usize,
    pub track_count: usize,
    pub position: f64,
    pub duration: f64,
    pub volume: f32,
}

impl PlaybackSnapshot {
    /// Get position as a fraction (0.0 - 1.0).
    pub fn position_fraction(&self) -> f64 {
        if self.duration <= 0.0 {
            0.0
        } else {
            (self.position / self.duration).clamp(0.0, 1.0)
        }
    }

    /// Format position as MM:SS.
    pub fn position_str(&self) -> String {
        format_duration(self.position)
    }

    /// Format duration as MM:SS.
    pub fn duration_str(&self) -> String {
        format_duration(self.duration)
    }
}

/// Durations of 0, NaN, infinity or below zero all mean "unknown", reported as 0.
pub fn normalize_duration(duration: f64) -> f64 {
    if duration.is_finite() && duration > 0.0 {
        duration
    } else {
        0.0
    }
}

/// Format seconds as MM:SS or HH:MM:SS.
pub fn format_duration(seconds: f64) -> String {
    let secs = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;
    let secs = secs % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{}:{:02}", mins, secs)
    }
}
