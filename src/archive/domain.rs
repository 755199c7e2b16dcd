//! Domain models for remote recording metadata.
//!
//! These types are OUR types - they don't change when the remote API changes.
//! Responses get converted into these types via the adapter.

/// Descriptive metadata for one recording, fetched by identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingMetadata {
    pub identifier: String,
    /// Free-text source chain
    pub source: Option<String>,
    pub taper: Option<String>,
    pub lineage: Option<String>,
    /// Every file in the recording
    pub files: Vec<RemoteFile>,
}

/// One file belonging to a recording.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemoteFile {
    pub name: String,
    /// Format label ("Flac", "VBR MP3", ...), empty if unknown
    pub format: String,
    pub size_bytes: Option<u64>,
    pub duration_secs: Option<f64>,
    pub title: Option<String>,
    pub track: Option<u32>,
    /// Whether this is an upload rather than a server-side derivative
    pub original: bool,
}

impl RemoteFile {
    pub fn new(name: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            format: format.into(),
            ..Default::default()
        }
    }

    /// Whether this file holds audio, judged by format label or extension.
    pub fn is_audio(&self) -> bool {
        const AUDIO_FORMATS: &[&str] = &["flac", "mp3", "shorten", "ogg", "vorbis", "wave", "aiff", "ape"];
        const AUDIO_EXTENSIONS: &[&str] = &[".flac", ".mp3", ".shn", ".ogg", ".wav", ".aif", ".aiff", ".ape", ".m4a"];
        const NON_AUDIO_MARKERS: &[&str] = &["fingerprint", "checksum", "spectrogram", "playlist", "m3u"];

        let format = self.format.to_lowercase();
        if NON_AUDIO_MARKERS.iter().any(|m| format.contains(m)) {
            return false;
        }
        if AUDIO_FORMATS.iter().any(|f| format.contains(f)) {
            return true;
        }
        let name = self.name.to_lowercase();
        AUDIO_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
    }
}

/// Errors that can occur while fetching remote metadata
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetadataError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API request failed: HTTP {status}")]
    Http { status: u16 },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("No metadata for '{0}'")]
    NotFound(String),

    #[error("Rate limited - try again later")]
    RateLimited,

    #[error("API reported an error: {0}")]
    Api(String),
}
