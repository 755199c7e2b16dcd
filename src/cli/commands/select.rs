//! Ranking, selection, breakdown and playlist commands.

use tokio::runtime::Runtime;

use super::SelectionArgs;
use crate::archive::ArchiveClient;
use crate::catalog::{SqliteCatalog, open_catalog};
use crate::config::{self, Config, TomlPreferenceStore};
use crate::error::ResultExt;
use crate::player::format_duration;
use crate::quality::{ScoringWeights, WeightSettings};
use crate::selector::{
    RecordingSelector, SelectedRecording, SelectionOutcome, SelectorOptions, tracks_for,
};

type Selector = RecordingSelector<SqliteCatalog, ArchiveClient>;

/// Rank every recording of a date
pub fn cmd_rank(
    rt: &Runtime,
    args: &SelectionArgs,
    limit: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    rt.block_on(rank(args, limit, json))
}

async fn rank(args: &SelectionArgs, limit: Option<usize>, json: bool) -> anyhow::Result<()> {
    let (selector, weights) = build_selector(args).await?;
    let outcome = selector.ranked(args.date, &weights, limit).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }
    if outcome.is_not_found() {
        println!("No recordings found for {}", args.date);
        return Ok(());
    }

    print_header(&outcome);
    println!("{:>3}  {:>6}  {:<11}  {:<14}  IDENTIFIER", "#", "SCORE", "SOURCE", "FORMAT");
    for (i, entry) in outcome.ranked.iter().enumerate() {
        println!(
            "{:>3}  {:>6.2}  {:<11}  {:<14}  {}",
            i + 1,
            entry.score,
            entry
                .quality
                .source_type
                .map(|s| s.as_str())
                .unwrap_or("-"),
            truncate(&entry.quality.format, 14),
            entry.record.identifier
        );
    }
    Ok(())
}

/// Show the best recording of a date
pub fn cmd_select(rt: &Runtime, args: &SelectionArgs) -> anyhow::Result<()> {
    rt.block_on(select(args))
}

async fn select(args: &SelectionArgs) -> anyhow::Result<()> {
    let (selector, weights) = build_selector(args).await?;
    let outcome = selector.ranked(args.date, &weights, Some(1)).await?;

    let Some(best) = outcome.best() else {
        println!("No recordings found for {}", args.date);
        return Ok(());
    };

    print_header(&outcome);
    println!("Best:   {}", best.record.identifier);
    if let Some(ref title) = best.record.title {
        println!("Title:  {}", title);
    }
    if let Some(ref venue) = best.record.venue {
        println!("Venue:  {}", venue);
    }
    println!("Score:  {:.2}", best.score);
    print_flags(best);
    Ok(())
}

/// Explain every recording's score
pub fn cmd_breakdown(rt: &Runtime, args: &SelectionArgs) -> anyhow::Result<()> {
    rt.block_on(breakdown(args))
}

async fn breakdown(args: &SelectionArgs) -> anyhow::Result<()> {
    let (selector, weights) = build_selector(args).await?;
    let outcome = selector.ranked(args.date, &weights, None).await?;

    if outcome.is_not_found() {
        println!("No recordings found for {}", args.date);
        return Ok(());
    }

    print_header(&outcome);
    for entry in &outcome.ranked {
        println!();
        println!("{}  (total {:.2})", entry.record.identifier, entry.breakdown.total);
        for row in &entry.breakdown.components {
            println!(
                "  {:<17} {:>6.2} x {:.2} = {:>6.2}   {}",
                row.component,
                row.score,
                row.weight,
                row.contribution,
                truncate(&row.input, 40)
            );
        }
        print_flags(entry);
    }
    Ok(())
}

/// List the playlist of the best recording
pub fn cmd_tracks(rt: &Runtime, args: &SelectionArgs) -> anyhow::Result<()> {
    rt.block_on(tracks(args))
}

async fn tracks(args: &SelectionArgs) -> anyhow::Result<()> {
    let (selector, weights) = build_selector(args).await?;
    let Some(best) = selector.select_best(args.date, &weights).await? else {
        println!("No recordings found for {}", args.date);
        return Ok(());
    };

    let client = archive_client(&config::load())?;
    let metadata = match best.metadata {
        Some(metadata) => metadata,
        None => client
            .fetch_metadata(&best.record.identifier)
            .await
            .with_context(format!("Fetching file list for {}", best.record.identifier))?,
    };

    let tracks = tracks_for(
        client.base_url(),
        &best.record.identifier,
        &metadata.files,
        &best.quality.format,
    );
    if tracks.is_empty() {
        println!("{} has no playable files", best.record.identifier);
        return Ok(());
    }

    println!("{} ({})", best.record.identifier, tracks[0].format);
    let total: f64 = tracks.iter().map(|t| t.duration).sum();
    for track in &tracks {
        println!(
            "{:>3}. {:<40} {:>8}",
            track.index + 1,
            truncate(&track.title, 40),
            format_duration(track.duration)
        );
    }
    println!("{} tracks, {}", tracks.len(), format_duration(total));
    Ok(())
}

// ============================================================================
// Shared helper functions
// ============================================================================

async fn build_selector(args: &SelectionArgs) -> crate::Result<(Selector, ScoringWeights)> {
    let config = config::load();

    let db_url = format!("sqlite:{}", args.catalog.display());
    let catalog = open_catalog(&db_url)
        .await
        .with_context(format!("Opening catalog {}", args.catalog.display()))?;

    let mut options = SelectorOptions::from(&config.selection);
    if args.no_enrich {
        options.enrich = false;
    }

    let selector = RecordingSelector::new(catalog, archive_client(&config)?, options);
    Ok((selector, active_weights()))
}

fn archive_client(config: &Config) -> crate::Result<ArchiveClient> {
    ArchiveClient::with_base_url(config.archive.base_url.as_str())
        .with_context(format!("Creating client for {}", config.archive.base_url))
}

/// The stored weights, or the balanced preset when none can be read.
fn active_weights() -> ScoringWeights {
    match TomlPreferenceStore::default_location().and_then(WeightSettings::load) {
        Ok(settings) => settings.active(),
        Err(e) => {
            tracing::warn!("Could not load scoring weights ({}), using balanced", e);
            ScoringWeights::default()
        }
    }
}

fn print_header(outcome: &SelectionOutcome) {
    println!(
        "{}: {} recording(s), enrichment {:?}",
        outcome.date, outcome.candidates, outcome.enrichment
    );
}

fn print_flags(entry: &SelectedRecording) {
    let notes = entry.flags.descriptions();
    if !notes.is_empty() {
        println!("  notes: {}", notes.join(", "));
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", head)
    }
}
