//! Where the weight selection lives between sessions.

use parking_lot::Mutex;
use std::path::{Path, PathBuf};

use super::{ConfigError, config_path, load_from, save_to};
use crate::quality::WeightProfile;

/// Persistence for the scoring weight selection.
pub trait PreferenceStore: Send + Sync {
    fn load_weights(&self) -> Result<WeightProfile, ConfigError>;

    fn save_weights(&self, profile: &WeightProfile) -> Result<(), ConfigError>;
}

/// Stores the `[scoring]` section of a TOML config file.
///
/// Saving rewrites the whole file and leaves the other sections intact.
#[derive(Debug, Clone)]
pub struct TomlPreferenceStore {
    path: PathBuf,
}

impl TomlPreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store backed by the default config file.
    pub fn default_location() -> Result<Self, ConfigError> {
        config_path().map(Self::new).ok_or(ConfigError::NoConfigDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for TomlPreferenceStore {
    fn load_weights(&self) -> Result<WeightProfile, ConfigError> {
        Ok(load_from(&self.path)?.scoring)
    }

    fn save_weights(&self, profile: &WeightProfile) -> Result<(), ConfigError> {
        let mut config = load_from(&self.path)?;
        config.scoring = *profile;
        save_to(&self.path, &config)
    }
}

/// Keeps the selection in memory.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    inner: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    profile: WeightProfile,
    saves: usize,
    fail_saves: bool,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(profile: WeightProfile) -> Self {
        Self {
            inner: Mutex::new(MemoryState {
                profile,
                ..Default::default()
            }),
        }
    }

    /// Number of successful saves.
    pub fn saves(&self) -> usize {
        self.inner.lock().saves
    }

    /// Make subsequent saves fail.
    pub fn set_fail_saves(&self, fail: bool) {
        self.inner.lock().fail_saves = fail;
    }

    pub fn stored(&self) -> WeightProfile {
        self.inner.lock().profile
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load_weights(&self) -> Result<WeightProfile, ConfigError> {
        Ok(self.inner.lock().profile)
    }

    fn save_weights(&self, profile: &WeightProfile) -> Result<(), ConfigError> {
        let mut state = self.inner.lock();
        if state.fail_saves {
            return Err(ConfigError::Store("saves disabled".to_string()));
        }
        state.profile = *profile;
        state.saves += 1;
        Ok(())
    }
}

impl<T: PreferenceStore + ?Sized> PreferenceStore for std::sync::Arc<T> {
    fn load_weights(&self) -> Result<WeightProfile, ConfigError> {
        (**self).load_weights()
    }

    fn save_weights(&self, profile: &WeightProfile) -> Result<(), ConfigError> {
        (**self).save_weights(profile)
    }
}
