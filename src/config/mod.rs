//! Showpicker settings, kept in one TOML file.
//!
//! Location, per platform:
//! - Windows: %APPDATA%\showpicker\config.toml
//! - macOS: ~/Library/Application Support/showpicker/config.toml
//! - Linux: ~/.config/showpicker/config.toml
//!
//! The file is human-readable and editable. Weight changes made through
//! [`WeightSettings`](crate::quality::WeightSettings) are written back here.

mod preferences;

pub use preferences::{MemoryPreferenceStore, PreferenceStore, TomlPreferenceStore};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::archive::{DEFAULT_BASE_URL, DEFAULT_MIN_INTERVAL};
use crate::quality::{WeightProfile, WeightsError};

/// Everything showpicker reads from `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Active weight preset and the custom vector
    pub scoring: WeightProfile,

    /// Candidate selection settings
    pub selection: SelectionConfig,

    /// Remote metadata service
    pub archive: ArchiveConfig,

    /// Playback settings
    pub playback: PlaybackConfig,
}

/// Candidate selection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Fetch remote metadata when there is more than one candidate
    pub enrich: bool,

    /// Give up on enrichment after this long and score catalog data only
    pub enrichment_timeout_secs: u64,

    /// Minimum spacing between outbound metadata requests
    pub min_request_interval_ms: u64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            enrich: true,
            enrichment_timeout_secs: 30,
            min_request_interval_ms: DEFAULT_MIN_INTERVAL.as_millis() as u64,
        }
    }
}

impl SelectionConfig {
    pub fn enrichment_timeout(&self) -> Duration {
        Duration::from_secs(self.enrichment_timeout_secs)
    }

    pub fn min_request_interval(&self) -> Duration {
        Duration::from_millis(self.min_request_interval_ms)
    }
}

/// Remote metadata service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    pub base_url: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Playback settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Volume to start playback at (0.0 - 1.0)
    pub volume: f32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self { volume: 1.0 }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// `<os config dir>/showpicker`
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("showpicker"))
}

/// `<os config dir>/showpicker/config.toml`
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Read the settings file from its default location.
///
/// Never fails: a missing or unreadable file is logged and the defaults are
/// used instead.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("No OS config directory, falling back to default settings");
        return Config::default();
    };

    match load_from(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            tracing::warn!("Continuing with default settings");
            Config::default()
        }
    }
}

/// Load configuration from a specific file.
///
/// A missing file is not an error and yields the defaults.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "Settings file absent, using defaults");
        return Ok(Config::default());
    }

    let contents =
        std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
    let config =
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
    tracing::debug!(path = %path.display(), "Settings loaded");
    Ok(config)
}

/// Save configuration to the default location
pub fn save(config: &Config) -> Result<(), ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(&path, config)
}

/// Save configuration to a specific file
///
/// Creates the parent directory if it doesn't exist.
pub fn save_to(path: &Path, config: &Config) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Readers never see a half-written file
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!(path = %path.display(), "Settings saved");
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read config file {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Failed to parse config file {0}: {1}")]
    Parse(PathBuf, toml::de::Error),

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),

    #[error("Invalid scoring weights: {0}")]
    InvalidWeights(#[from] WeightsError),

    #[error("Preference store unavailable: {0}")]
    Store(String),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::{Preset, ScoringWeights};

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[scoring]"));
        assert!(toml.contains("[selection]"));
        assert!(toml.contains("[archive]"));
        assert!(toml.contains("[playback]"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.scoring = WeightProfile::custom(ScoringWeights::new(0.3, 0.3, 0.2, 0.1, 0.1));
        config.selection.enrich = false;
        config.playback.volume = 0.75;

        let toml = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();

        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml = r#"
[scoring]
preset = "audiophile"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.scoring.preset, Preset::Audiophile);
        assert_eq!(config.scoring.custom, ScoringWeights::BALANCED);
        assert!(config.selection.enrich);
        assert_eq!(config.selection.enrichment_timeout(), Duration::from_secs(30));
        assert_eq!(config.selection.min_request_interval(), Duration::from_secs(1));
        assert_eq!(config.archive.base_url, "https://archive.org");
        assert_eq!(config.playback.volume, 1.0);
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.archive.base_url = "http://localhost:9000".to_string();
        save_to(&path, &config).unwrap();

        assert!(!path.with_extension("toml.tmp").exists());
        assert_eq!(load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[scoring\npreset = ").unwrap();
        assert!(matches!(load_from(&path), Err(ConfigError::Parse(..))));
    }
}
