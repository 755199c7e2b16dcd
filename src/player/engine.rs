//! The playback state machine.
//!
//! ```text
//!            load_playlist            on_can_play            play
//!   Idle ───────────────▶ Loading ───────────────▶ Paused ◀──────▶ Playing
//!    ▲                      │                        ▲      pause     │
//!    │   playlist ran out   │ source error           │ play (retry)   │ track finished
//!    └──────────────────────┴──────▶ Error ──────────┘                ▼
//!                                                              advance: next or Idle
//! ```
//!
//! Every transition happens inside one `&mut self` call, so the engine needs
//! no locking. Audio callbacks reach it through the `on_*` methods.

use super::PlaybackError;
use crate::config::PlaybackConfig;
use super::queue::Playlist;
use super::state::{
    AudioTrack, PlaybackSession, PlaybackSnapshot, PlaybackState, normalize_duration,
};
use super::traits::{AudioBackend, PlaybackObserver};

/// Past this many seconds, "previous" restarts the current track.
pub const RESTART_THRESHOLD_SECS: f64 = 3.0;

/// Clamp a seek target into `[0, upper]`. NaN maps to 0.
pub fn clamp_position(target: f64, upper: f64) -> f64 {
    let upper = normalize_duration(upper);
    if target.is_nan() {
        0.0
    } else {
        target.clamp(0.0, upper)
    }
}

/// Clamp a volume into `[0, 1]`. NaN keeps `current`.
pub fn clamp_volume(volume: f32, current: f32) -> f32 {
    if volume.is_nan() {
        current
    } else {
        volume.clamp(0.0, 1.0)
    }
}

/// Owns the session and drives the backend.
pub struct PlaybackEngine<B: AudioBackend, O: PlaybackObserver> {
    backend: B,
    observer: O,
    session: PlaybackSession,
}

impl<B: AudioBackend, O: PlaybackObserver> PlaybackEngine<B, O> {
    pub fn new(backend: B, observer: O) -> Self {
        Self {
            backend,
            observer,
            session: PlaybackSession::default(),
        }
    }

    /// Engine starting at the configured volume.
    pub fn with_config(backend: B, observer: O, config: &PlaybackConfig) -> Self {
        let mut engine = Self::new(backend, observer);
        engine.set_volume(config.volume);
        engine
    }

    // ---- Commands ----

    /// Replace the session with a new playlist starting at `start_index`.
    ///
    /// The index is clamped into range. An empty list leaves the engine idle.
    pub fn load_playlist(&mut self, tracks: Vec<AudioTrack>, start_index: usize) {
        if tracks.is_empty() {
            tracing::debug!("Empty playlist, going idle");
            self.backend.stop();
            self.replace_session(Playlist::empty());
            self.observer.on_track_change(None);
            self.set_state(PlaybackState::Idle);
            return;
        }

        tracing::info!(tracks = tracks.len(), start_index, "Loading playlist");
        self.replace_session(Playlist::new(tracks, start_index));
        self.load_current();
    }

    /// Start or resume playback. Also the retry path out of `Error`.
    pub fn play(&mut self) -> Result<(), PlaybackError> {
        let Some(title) = self.session.playlist.current().map(|t| t.title.clone()) else {
            return Err(PlaybackError::NoTrack);
        };

        match self.backend.play() {
            Ok(()) => {
                self.set_state(PlaybackState::Playing);
                Ok(())
            }
            Err(err) => {
                let message = err.to_string();
                self.fail(&message);
                Err(PlaybackError::SourceFailed {
                    track: title,
                    message,
                })
            }
        }
    }

    /// Pause. Only meaningful while playing.
    pub fn pause(&mut self) {
        if self.session.state == PlaybackState::Playing {
            self.backend.pause();
            self.set_state(PlaybackState::Paused);
        }
    }

    pub fn toggle_play_pause(&mut self) -> Result<(), PlaybackError> {
        if self.session.state == PlaybackState::Playing {
            self.pause();
            Ok(())
        } else {
            self.play()
        }
    }

    /// Halt and rewind the current track, keeping it loaded.
    pub fn stop(&mut self) {
        if self.session.playlist.current().is_none() {
            return;
        }
        self.backend.pause();
        self.backend.seek(0.0);
        self.session.position = 0.0;
        self.set_state(PlaybackState::Idle);
        self.emit_progress();
    }

    /// Advance and auto-play, or go idle on the last track.
    pub fn next(&mut self) {
        if self.session.playlist.current().is_none() {
            return;
        }
        self.advance();
    }

    /// Restart the track if past the threshold, otherwise step back.
    pub fn previous(&mut self) {
        if self.session.playlist.current().is_none() {
            // Ran off the end: bring back the last track.
            if self.session.playlist.reload().is_some() {
                self.load_current();
                self.autoplay();
            }
            return;
        }

        if self.session.position > RESTART_THRESHOLD_SECS {
            self.seek_to(0.0);
        } else if self.session.playlist.previous().is_some() {
            self.load_current();
            self.autoplay();
        } else {
            self.seek_to(0.0);
        }
    }

    /// Load and play the track at `index`. Out of range is ignored.
    pub fn jump_to(&mut self, index: usize) -> bool {
        if self.session.playlist.jump_to(index).is_none() {
            tracing::warn!(index, len = self.session.playlist.len(), "Ignoring jump out of range");
            return false;
        }
        self.load_current();
        self.autoplay();
        true
    }

    /// Seek within the current track; returns the position actually applied.
    ///
    /// With an unknown duration the only valid position is 0.
    pub fn seek_to(&mut self, target: f64) -> f64 {
        let position = clamp_position(target, self.session.duration);
        self.session.position = position;
        if self.session.playlist.current().is_some() {
            self.backend.seek(position);
        }
        self.emit_progress();
        position
    }

    /// Set the volume; returns the value actually applied.
    pub fn set_volume(&mut self, volume: f32) -> f32 {
        let volume = clamp_volume(volume, self.session.volume);
        self.session.volume = volume;
        self.backend.set_volume(volume);
        volume
    }

    /// Release the backend and clear the session.
    pub fn teardown(&mut self) {
        tracing::debug!("Tearing down playback engine");
        self.backend.release();
        self.replace_session(Playlist::empty());
        self.observer.on_track_change(None);
        self.set_state(PlaybackState::Idle);
    }

    // ---- Backend signals ----

    /// The loaded source can start playing.
    pub fn on_can_play(&mut self) {
        if self.session.state == PlaybackState::Loading {
            self.set_state(PlaybackState::Paused);
        }
    }

    /// Ignored when nothing is loaded (a late signal after the end).
    pub fn on_track_finished(&mut self) {
        if self.session.playlist.current().is_none() {
            return;
        }
        self.advance();
    }

    /// Periodic position report from the backend.
    pub fn on_time_update(&mut self, current: f64, duration: f64) {
        let reported = normalize_duration(duration);
        if reported > 0.0 {
            self.session.duration = reported;
        }
        self.session.position = clamp_position(current, self.position_bound());
        self.emit_progress();
    }

    pub fn on_duration_known(&mut self, duration: f64) {
        self.session.duration = normalize_duration(duration);
        self.session.position = clamp_position(self.session.position, self.position_bound());
        self.emit_progress();
    }

    /// The source failed; wait for the caller to retry.
    pub fn on_source_error(&mut self, message: &str) {
        self.fail(message);
    }

    // ---- Accessors ----

    pub fn state(&self) -> PlaybackState {
        self.session.state
    }

    pub fn current_track(&self) -> Option<&AudioTrack> {
        self.session.playlist.current()
    }

    pub fn current_index(&self) -> usize {
        self.session.playlist.index()
    }

    pub fn position(&self) -> f64 {
        self.session.position
    }

    /// Seconds, 0 when unknown.
    pub fn duration(&self) -> f64 {
        normalize_duration(self.session.duration)
    }

    pub fn volume(&self) -> f32 {
        self.session.volume
    }

    pub fn playlist(&self) -> &Playlist {
        &self.session.playlist
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            state: self.session.state,
            track: self.session.playlist.current().cloned(),
            index: self.session.playlist.index(),
            track_count: self.session.playlist.len(),
            position: self.session.position,
            duration: self.duration(),
            volume: self.session.volume,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    // ---- Internals ----

    /// New session, same volume. The old state is carried over so the
    /// following `set_state` reports the change.
    fn replace_session(&mut self, playlist: Playlist) {
        let mut session = PlaybackSession::new(playlist, self.session.volume);
        session.state = self.session.state;
        self.session = session;
    }

    /// Assign the current track to the backend and enter `Loading`.
    fn load_current(&mut self) {
        let Some(track) = self.session.playlist.current() else {
            return;
        };
        self.session.position = 0.0;
        self.session.duration = normalize_duration(track.duration);
        tracing::debug!(index = track.index, title = %track.title, "Loading track");
        self.backend.load(track);
        self.observer.on_track_change(Some(track));
        self.set_state(PlaybackState::Loading);
        self.emit_progress();
    }

    fn advance(&mut self) {
        if self.session.playlist.skip_forward().is_some() {
            self.load_current();
            self.autoplay();
        } else {
            self.finish();
        }
    }

    /// Play after a navigation. Failures are already reported through the
    /// `Error` state and observer.
    fn autoplay(&mut self) {
        if let Err(err) = self.play() {
            tracing::debug!(%err, "Auto-play failed");
        }
    }

    /// The playlist ran out.
    fn finish(&mut self) {
        tracing::debug!("End of playlist");
        self.backend.stop();
        self.session.playlist.unload();
        self.session.position = 0.0;
        self.session.duration = 0.0;
        self.observer.on_track_change(None);
        self.set_state(PlaybackState::Idle);
        self.emit_progress();
    }

    fn fail(&mut self, message: &str) {
        self.set_state(PlaybackState::Error);
        let track = self.session.playlist.current();
        tracing::warn!(
            error = message,
            track = track.map(|t| t.title.as_str()).unwrap_or("-"),
            "Playback failed"
        );
        self.observer.on_error(message, track);
    }

    /// Upper bound for the reported position: the duration, or unbounded
    /// while it is unknown.
    fn position_bound(&self) -> f64 {
        if self.session.duration > 0.0 {
            self.session.duration
        } else {
            f64::MAX
        }
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.session.state == state {
            return;
        }
        tracing::debug!(from = self.session.state.as_str(), to = state.as_str(), "Playback state");
        self.session.state = state;
        self.observer.on_state_change(state);
    }

    fn emit_progress(&mut self) {
        let duration = normalize_duration(self.session.duration);
        self.observer.on_progress(self.session.position, duration);
    }
}
