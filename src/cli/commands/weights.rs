//! Scoring weight commands.

use crate::config::TomlPreferenceStore;
use crate::quality::{Preset, ScoringWeights, WeightSettings};

fn settings() -> anyhow::Result<WeightSettings<TomlPreferenceStore>> {
    let store = TomlPreferenceStore::default_location()?;
    Ok(WeightSettings::load(store)?)
}

fn print_vector(weights: &ScoringWeights) {
    for (name, value) in weights.components() {
        println!("  {:<17} {:.3}", name, value);
    }
}

/// Show the active preset and weight vector
pub fn cmd_weights_show() -> anyhow::Result<()> {
    let settings = settings()?;
    println!("Preset: {} ({})", settings.preset(), settings.preset().description());
    print_vector(&settings.active());
    println!("Stored in {}", settings.store().path().display());
    Ok(())
}

/// List the built-in presets
pub fn cmd_weights_presets() -> anyhow::Result<()> {
    for preset in Preset::ALL {
        println!("{:<15} {}", preset.as_str(), preset.description());
        if let Some(weights) = preset.weights() {
            print_vector(&weights);
        }
    }
    Ok(())
}

/// Switch to a preset
pub fn cmd_weights_preset(name: &str) -> anyhow::Result<()> {
    let preset: Preset = name.parse()?;
    let mut settings = settings()?;
    settings.set_preset(preset)?;
    println!("Active preset: {}", preset);
    print_vector(&settings.active());
    Ok(())
}

/// Set a custom weight vector
pub fn cmd_weights_set(
    source_type: f64,
    format: f64,
    community_rating: f64,
    lineage: f64,
    taper: f64,
) -> anyhow::Result<()> {
    let weights = ScoringWeights::new(source_type, format, community_rating, lineage, taper);
    let mut settings = settings()?;
    settings.set_custom(weights)?;
    println!("Active preset: {}", Preset::Custom);
    print_vector(&settings.active());
    Ok(())
}
