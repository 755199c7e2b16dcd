//! Channel-backed observer for consumers on another thread.

use crossbeam_channel::{Receiver, Sender, unbounded};

use super::state::{AudioTrack, PlaybackState};
use super::traits::PlaybackObserver;

/// Owned form of a [`PlaybackObserver`] notification.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    StateChanged(PlaybackState),
    TrackChanged(Option<AudioTrack>),
    Progress { current: f64, duration: f64 },
    Error {
        message: String,
        track: Option<AudioTrack>,
    },
}

/// Forwards notifications over a channel without ever blocking the engine.
///
/// State, track and error events are always delivered. Progress events are
/// dropped (and counted) once `progress_backlog` events are waiting, so a
/// slow consumer only loses position updates.
#[derive(Debug)]
pub struct ChannelObserver {
    tx: Sender<PlayerEvent>,
    progress_backlog: usize,
    dropped: u64,
}

impl ChannelObserver {
    pub fn new(progress_backlog: usize) -> (Self, Receiver<PlayerEvent>) {
        let (tx, rx) = unbounded();
        (
            Self {
                tx,
                progress_backlog,
                dropped: 0,
            },
            rx,
        )
    }

    /// Events discarded: progress under backpressure, or anything once the
    /// receiver is gone.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    fn send(&mut self, event: PlayerEvent) {
        if self.tx.send(event).is_err() {
            self.dropped += 1;
        }
    }

    fn send_progress(&mut self, current: f64, duration: f64) {
        if self.tx.len() >= self.progress_backlog {
            self.dropped += 1;
            tracing::trace!("Player event backlog full, dropping progress");
            return;
        }
        self.send(PlayerEvent::Progress { current, duration });
    }
}

impl PlaybackObserver for ChannelObserver {
    fn on_state_change(&mut self, state: PlaybackState) {
        self.send(PlayerEvent::StateChanged(state));
    }

    fn on_track_change(&mut self, track: Option<&AudioTrack>) {
        self.send(PlayerEvent::TrackChanged(track.cloned()));
    }

    fn on_progress(&mut self, current: f64, duration: f64) {
        self.send_progress(current, duration);
    }

    fn on_error(&mut self, message: &str, track: Option<&AudioTrack>) {
        self.send(PlayerEvent::Error {
            message: message.to_string(),
            track: track.cloned(),
        });
    }
}
