//! Playlist with current position tracking.

use super::state::AudioTrack;

/// Ordered tracks of one show plus the current position.
///
/// The index always points into `tracks` (or is 0 for an empty playlist).
/// `loaded` is false once the playlist has run out or was never started.
#[derive(Debug, Clone, Default)]
pub struct Playlist {
    tracks: Vec<AudioTrack>,
    index: usize,
    loaded: bool,
}

impl Playlist {
    /// Create a playlist positioned at `start_index`, clamped into range.
    ///
    /// Track indices are rewritten to match their position.
    pub fn new(mut tracks: Vec<AudioTrack>, start_index: usize) -> Self {
        for (i, track) in tracks.iter_mut().enumerate() {
            track.index = i;
        }
        let loaded = !tracks.is_empty();
        let index = start_index.min(tracks.len().saturating_sub(1));
        Self {
            tracks,
            index,
            loaded,
        }
    }

    /// Create an empty playlist.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check if playlist is empty.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Get playlist length.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// All tracks in order.
    pub fn tracks(&self) -> &[AudioTrack] {
        &self.tracks
    }

    /// Current index (meaningful when a track is loaded).
    pub fn index(&self) -> usize {
        self.index
    }

    /// The loaded track, if any.
    pub fn current(&self) -> Option<&AudioTrack> {
        if self.loaded {
            self.tracks.get(self.index)
        } else {
            None
        }
    }

    pub fn last_index(&self) -> usize {
        self.tracks.len().saturating_sub(1)
    }

    /// Whether a track follows the current one.
    pub fn has_next(&self) -> bool {
        self.loaded && self.index < self.last_index()
    }

    /// Move to the next track. Returns `None` at the end.
    pub fn skip_forward(&mut self) -> Option<&AudioTrack> {
        if !self.has_next() {
            return None;
        }
        self.index += 1;
        self.tracks.get(self.index)
    }

    /// Move to the previous track. Returns `None` on the first track.
    pub fn previous(&mut self) -> Option<&AudioTrack> {
        if !self.loaded || self.index == 0 {
            return None;
        }
        self.index -= 1;
        self.tracks.get(self.index)
    }

    /// Jump to a specific index.
    pub fn jump_to(&mut self, index: usize) -> Option<&AudioTrack> {
        if index >= self.tracks.len() {
            return None;
        }
        self.index = index;
        self.loaded = true;
        self.tracks.get(self.index)
    }

    /// Mark the playlist as finished; the index stays where it was.
    pub fn unload(&mut self) {
        self.loaded = false;
    }

    /// Re-load the track at the current index after [`unload`](Self::unload).
    pub fn reload(&mut self) -> Option<&AudioTrack> {
        if self.tracks.is_empty() {
            return None;
        }
        self.loaded = true;
        self.tracks.get(self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_track(name: &str) -> AudioTrack {
        AudioTrack {
            url: format!("https://example.org/{}.flac", name),
            title: name.to_string(),
            duration: 300.0,
            format: "Flac".to_string(),
            size_bytes: 0,
            index: 99,
        }
    }

    fn make_playlist(n: usize, start: usize) -> Playlist {
        Playlist::new((0..n).map(|i| make_track(&format!("t{}", i))).collect(), start)
    }

    #[test]
    fn test_playlist_basic() {
        let mut list = make_playlist(3, 0);
        assert_eq!(list.len(), 3);
        assert_eq!(list.current().unwrap().title, "t0");
        assert_eq!(list.skip_forward().unwrap().title, "t1");
        assert_eq!(list.skip_forward().unwrap().title, "t2");
        assert!(list.skip_forward().is_none());
        assert_eq!(list.index(), 2);
        assert_eq!(list.previous().unwrap().title, "t1");
    }

    #[test]
    fn test_indices_rewritten() {
        let list = make_playlist(3, 0);
        let indices: Vec<_> = list.tracks().iter().map(|t| t.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_start_index_clamped() {
        let list = make_playlist(3, 10);
        assert_eq!(list.index(), 2);
        assert_eq!(list.current().unwrap().title, "t2");
    }

    #[test]
    fn test_empty_playlist() {
        let mut list = Playlist::new(Vec::new(), 5);
        assert!(list.is_empty());
        assert_eq!(list.index(), 0);
        assert!(list.current().is_none());
        assert!(list.skip_forward().is_none());
        assert!(list.previous().is_none());
        assert!(list.reload().is_none());
    }

    #[test]
    fn test_unload_and_reload() {
        let mut list = make_playlist(2, 1);
        list.unload();
        assert!(list.current().is_none());
        assert!(!list.has_next());
        assert!(list.previous().is_none());
        assert_eq!(list.reload().unwrap().title, "t1");
    }

    #[test]
    fn test_jump_to() {
        let mut list = make_playlist(4, 0);
        assert_eq!(list.jump_to(3).unwrap().title, "t3");
        assert!(list.jump_to(4).is_none());
        assert_eq!(list.index(), 3);
    }
}
