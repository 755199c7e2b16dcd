//! Seams between the engine and the outside world.
//!
//! The engine drives an [`AudioBackend`] and reports to a
//! [`PlaybackObserver`]. Neither knows about the other.

use super::PlaybackError;
use super::state::{AudioTrack, PlaybackState};

/// The audio element the engine controls.
///
/// Completion, readiness and errors come back through the engine's
/// `on_*` signal methods, called by whoever owns the backend.
pub trait AudioBackend {
    /// Assign a new source. Playback does not start.
    fn load(&mut self, track: &AudioTrack);

    /// Start or resume playback of the loaded source.
    fn play(&mut self) -> Result<(), PlaybackError>;

    fn pause(&mut self);

    /// Move the playhead, seconds.
    fn seek(&mut self, position: f64);

    /// 0.0 - 1.0
    fn set_volume(&mut self, volume: f32);

    /// Stop and drop the current source.
    fn stop(&mut self);

    /// Release the underlying resource for good.
    fn release(&mut self);
}

/// Receives engine notifications.
///
/// All methods default to no-ops so consumers implement only what they use.
pub trait PlaybackObserver {
    fn on_state_change(&mut self, _state: PlaybackState) {}

    /// `None` when the playlist ran out or was cleared.
    fn on_track_change(&mut self, _track: Option<&AudioTrack>) {}

    /// Seconds; `duration` is 0 when unknown.
    fn on_progress(&mut self, _current: f64, _duration: f64) {}

    fn on_error(&mut self, _message: &str, _track: Option<&AudioTrack>) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl PlaybackObserver for NullObserver {}

/// Backend with no audio output; every call succeeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentBackend;

impl AudioBackend for SilentBackend {
    fn load(&mut self, _track: &AudioTrack) {}

    fn play(&mut self) -> Result<(), PlaybackError> {
        Ok(())
    }

    fn pause(&mut self) {}

    fn seek(&mut self, _position: f64) {}

    fn set_volume(&mut self, _volume: f32) {}

    fn stop(&mut self) {}

    fn release(&mut self) {}
}
