//! Scoring weights and the named presets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::{ConfigError, PreferenceStore};

/// How far the component sum may drift from 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-3;

/// Relative importance of the five scoring components.
///
/// A valid vector has non-negative components summing to 1.0 (within
/// [`WEIGHT_SUM_TOLERANCE`]). Validation happens at the configuration
/// boundary; the scorer trusts whatever it is handed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub source_type: f64,
    pub format: f64,
    pub community_rating: f64,
    pub lineage: f64,
    pub taper: f64,
}

impl ScoringWeights {
    pub const BALANCED: Self = Self {
        source_type: 0.35,
        format: 0.25,
        community_rating: 0.20,
        lineage: 0.10,
        taper: 0.10,
    };

    pub const AUDIOPHILE: Self = Self {
        source_type: 0.40,
        format: 0.35,
        community_rating: 0.05,
        lineage: 0.15,
        taper: 0.05,
    };

    pub const CROWD_FAVORITE: Self = Self {
        source_type: 0.15,
        format: 0.10,
        community_rating: 0.60,
        lineage: 0.05,
        taper: 0.10,
    };

    pub fn new(source_type: f64, format: f64, community_rating: f64, lineage: f64, taper: f64) -> Self {
        Self {
            source_type,
            format,
            community_rating,
            lineage,
            taper,
        }
    }

    pub fn sum(&self) -> f64 {
        self.source_type + self.format + self.community_rating + self.lineage + self.taper
    }

    /// Components in scoring order, paired with their names.
    pub fn components(&self) -> [(&'static str, f64); 5] {
        [
            ("source_type", self.source_type),
            ("format", self.format),
            ("community_rating", self.community_rating),
            ("lineage", self.lineage),
            ("taper", self.taper),
        ]
    }

    /// Check that this vector can be used for scoring.
    pub fn validate(&self) -> Result<(), WeightsError> {
        for (name, value) in self.components() {
            if !value.is_finite() {
                return Err(WeightsError::NotFinite(name));
            }
            if value < 0.0 {
                return Err(WeightsError::Negative { component: name, value });
            }
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(WeightsError::BadSum(sum));
        }
        Ok(())
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self::BALANCED
    }
}

/// Rejected weight vector.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WeightsError {
    #[error("Weight '{0}' is not a finite number")]
    NotFinite(&'static str),

    #[error("Weight '{component}' is negative ({value})")]
    Negative { component: &'static str, value: f64 },

    #[error("Weights must sum to 1.0 (got {0:.4})")]
    BadSum(f64),

    #[error("Unknown preset '{0}' (expected balanced, audiophile, crowd_favorite or custom)")]
    UnknownPreset(String),
}

/// Named weight configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    #[default]
    Balanced,
    Audiophile,
    CrowdFavorite,
    /// User-supplied vector
    Custom,
}

impl Preset {
    /// Every preset, in display order.
    pub const ALL: [Preset; 4] = [
        Preset::Balanced,
        Preset::Audiophile,
        Preset::CrowdFavorite,
        Preset::Custom,
    ];

    /// Fixed vector for this preset, `None` for [`Preset::Custom`].
    pub fn weights(&self) -> Option<ScoringWeights> {
        match self {
            Self::Balanced => Some(ScoringWeights::BALANCED),
            Self::Audiophile => Some(ScoringWeights::AUDIOPHILE),
            Self::CrowdFavorite => Some(ScoringWeights::CROWD_FAVORITE),
            Self::Custom => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Balanced => "balanced",
            Self::Audiophile => "audiophile",
            Self::CrowdFavorite => "crowd_favorite",
            Self::Custom => "custom",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Balanced => "Source first, with format and community rating close behind",
            Self::Audiophile => "Source, format and lineage; ignores popularity",
            Self::CrowdFavorite => "What the community rated highest",
            Self::Custom => "User-defined weights",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = WeightsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "balanced" => Ok(Self::Balanced),
            "audiophile" => Ok(Self::Audiophile),
            "crowd_favorite" | "crowdfavorite" => Ok(Self::CrowdFavorite),
            "custom" => Ok(Self::Custom),
            _ => Err(WeightsError::UnknownPreset(s.to_string())),
        }
    }
}

/// The persisted weight selection: a preset plus the user's custom vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightProfile {
    pub preset: Preset,
    /// Used only when `preset` is [`Preset::Custom`]
    pub custom: ScoringWeights,
}

impl Default for WeightProfile {
    fn default() -> Self {
        Self {
            preset: Preset::Balanced,
            custom: ScoringWeights::BALANCED,
        }
    }
}

impl WeightProfile {
    pub fn preset(preset: Preset) -> Self {
        Self {
            preset,
            ..Default::default()
        }
    }

    pub fn custom(weights: ScoringWeights) -> Self {
        Self {
            preset: Preset::Custom,
            custom: weights,
        }
    }

    /// The vector scoring should use.
    pub fn active(&self) -> ScoringWeights {
        self.preset.weights().unwrap_or(self.custom)
    }

    pub fn validate(&self) -> Result<(), WeightsError> {
        self.active().validate()
    }
}

/// The session's weight selection, mutated only through validating setters.
///
/// Every successful change is persisted before it takes effect, so a failed
/// save leaves the active vector untouched.
pub struct WeightSettings<S: PreferenceStore> {
    store: S,
    profile: WeightProfile,
}

impl<S: PreferenceStore> WeightSettings<S> {
    /// Read the stored selection. An invalid stored vector falls back to
    /// [`Preset::Balanced`].
    pub fn load(store: S) -> Result<Self, ConfigError> {
        let stored = store.load_weights()?;
        let profile = match stored.validate() {
            Ok(()) => stored,
            Err(e) => {
                tracing::warn!(error = %e, "Stored weights are invalid, using balanced preset");
                WeightProfile::default()
            }
        };
        Ok(Self { store, profile })
    }

    /// The vector to score with.
    pub fn active(&self) -> ScoringWeights {
        self.profile.active()
    }

    pub fn preset(&self) -> Preset {
        self.profile.preset
    }

    pub fn profile(&self) -> &WeightProfile {
        &self.profile
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Switch presets. Choosing [`Preset::Custom`] re-activates the stored
    /// custom vector.
    pub fn set_preset(&mut self, preset: Preset) -> Result<(), ConfigError> {
        let next = WeightProfile {
            preset,
            custom: self.profile.custom,
        };
        self.apply(next)
    }

    /// Validate and activate a custom vector.
    pub fn set_custom(&mut self, weights: ScoringWeights) -> Result<(), ConfigError> {
        self.apply(WeightProfile::custom(weights))
    }

    fn apply(&mut self, next: WeightProfile) -> Result<(), ConfigError> {
        next.validate()?;
        self.store.save_weights(&next)?;
        tracing::info!(preset = %next.preset, weights = ?next.active(), "Scoring weights changed");
        self.profile = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryPreferenceStore;

    #[test]
    fn test_presets_are_valid() {
        for preset in Preset::ALL {
            if let Some(w) = preset.weights() {
                assert!(w.validate().is_ok(), "{} should be valid", preset);
            }
        }
    }

    #[test]
    fn test_sum_tolerance() {
        assert!(ScoringWeights::new(0.35, 0.25, 0.20, 0.10, 0.1009).validate().is_ok());
        assert!(matches!(
            ScoringWeights::new(0.35, 0.25, 0.20, 0.10, 0.102).validate(),
            Err(WeightsError::BadSum(_))
        ));
        assert!(matches!(
            ScoringWeights::new(0.5, 0.5, 0.5, 0.0, 0.0).validate(),
            Err(WeightsError::BadSum(_))
        ));
    }

    #[test]
    fn test_negative_and_nan_rejected() {
        let err = ScoringWeights::new(1.2, -0.2, 0.0, 0.0, 0.0).validate().unwrap_err();
        assert_eq!(
            err,
            WeightsError::Negative {
                component: "format",
                value: -0.2
            }
        );

        let err = ScoringWeights::new(f64::NAN, 0.5, 0.5, 0.0, 0.0).validate().unwrap_err();
        assert_eq!(err, WeightsError::NotFinite("source_type"));
    }

    #[test]
    fn test_preset_parse() {
        assert_eq!("crowd-favorite".parse::<Preset>().unwrap(), Preset::CrowdFavorite);
        assert_eq!("Audiophile".parse::<Preset>().unwrap(), Preset::Audiophile);
        assert!(matches!(
            "loudest".parse::<Preset>(),
            Err(WeightsError::UnknownPreset(_))
        ));
    }

    #[test]
    fn test_profile_active() {
        let custom = ScoringWeights::new(0.2, 0.2, 0.2, 0.2, 0.2);
        assert_eq!(WeightProfile::custom(custom).active(), custom);

        let mut profile = WeightProfile::custom(custom);
        profile.preset = Preset::Audiophile;
        assert_eq!(profile.active(), ScoringWeights::AUDIOPHILE);
    }

    #[test]
    fn test_profile_toml_roundtrip() {
        let profile = WeightProfile::custom(ScoringWeights::new(0.5, 0.2, 0.1, 0.1, 0.1));
        let text = toml::to_string_pretty(&profile).unwrap();
        assert!(text.contains("preset = \"custom\""));
        let parsed: WeightProfile = toml::from_str(&text).unwrap();
        assert_eq!(parsed, profile);
    }

    #[test]
    fn test_settings_set_preset_persists() {
        let mut settings = WeightSettings::load(MemoryPreferenceStore::new()).unwrap();
        assert_eq!(settings.preset(), Preset::Balanced);

        settings.set_preset(Preset::Audiophile).unwrap();
        assert_eq!(settings.active(), ScoringWeights::AUDIOPHILE);
        assert_eq!(settings.store().saves(), 1);
        assert_eq!(settings.store().stored().preset, Preset::Audiophile);
    }

    #[test]
    fn test_settings_invalid_custom_rejected_without_save() {
        let mut settings = WeightSettings::load(MemoryPreferenceStore::new()).unwrap();
        let err = settings
            .set_custom(ScoringWeights::new(0.5, 0.5, 0.5, 0.0, 0.0))
            .unwrap_err();

        assert!(matches!(err, ConfigError::InvalidWeights(WeightsError::BadSum(_))));
        assert_eq!(settings.active(), ScoringWeights::BALANCED);
        assert_eq!(settings.store().saves(), 0);
    }

    #[test]
    fn test_settings_failed_save_keeps_previous() {
        let store = MemoryPreferenceStore::new();
        store.set_fail_saves(true);
        let mut settings = WeightSettings::load(store).unwrap();

        assert!(settings.set_preset(Preset::CrowdFavorite).is_err());
        assert_eq!(settings.preset(), Preset::Balanced);
    }

    #[test]
    fn test_settings_custom_then_preset_keeps_custom_vector() {
        let custom = ScoringWeights::new(0.6, 0.1, 0.1, 0.1, 0.1);
        let mut settings = WeightSettings::load(MemoryPreferenceStore::new()).unwrap();
        settings.set_custom(custom).unwrap();
        settings.set_preset(Preset::Balanced).unwrap();
        settings.set_preset(Preset::Custom).unwrap();
        assert_eq!(settings.active(), custom);
        assert_eq!(settings.store().saves(), 3);
    }

    #[test]
    fn test_settings_load_invalid_stored_falls_back() {
        let bad = WeightProfile::custom(ScoringWeights::new(0.9, 0.9, 0.0, 0.0, 0.0));
        let settings = WeightSettings::load(MemoryPreferenceStore::with_profile(bad)).unwrap();
        assert_eq!(settings.preset(), Preset::Balanced);
        assert_eq!(settings.active(), ScoringWeights::BALANCED);
    }
}
