//! CLI command definitions and dispatch.
//!
//! Each group of subcommands is implemented in its own submodule:
//! - `select`: ranking, selection, score breakdowns and playlists
//! - `weights`: showing and changing the scoring weights

mod select;
mod weights;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;

use crate::error::Error;

pub use select::{cmd_breakdown, cmd_rank, cmd_select, cmd_tracks};
pub use weights::{cmd_weights_preset, cmd_weights_presets, cmd_weights_set, cmd_weights_show};

/// Default catalog database file
const DEFAULT_CATALOG: &str = "showpicker.db";

/// Parse a performance date, strictly `YYYY-MM-DD`.
fn parse_show_date(text: &str) -> crate::Result<NaiveDate> {
    let well_formed = text.len() == 10
        && text.char_indices().all(|(i, c)| match i {
            4 | 7 => c == '-',
            _ => c.is_ascii_digit(),
        });
    if !well_formed {
        return Err(Error::invalid_input(format!(
            "'{}' is not a date (expected YYYY-MM-DD)",
            text
        )));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|e| Error::invalid_input(format!("'{}' is not a valid date: {}", text, e)))
}

/// Showpicker CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command that reads the catalog
#[derive(clap::Args, Debug, Clone)]
pub struct SelectionArgs {
    /// Performance date (YYYY-MM-DD)
    #[arg(value_parser = parse_show_date)]
    pub date: NaiveDate,
    /// Catalog database path
    #[arg(long, env = "SHOWPICKER_CATALOG", default_value = DEFAULT_CATALOG)]
    pub catalog: PathBuf,
    /// Score catalog data only, without fetching remote metadata
    #[arg(long)]
    pub no_enrich: bool,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Rank every recording of a performance
    Rank {
        #[command(flatten)]
        args: SelectionArgs,
        /// Show at most this many recordings
        #[arg(short, long)]
        limit: Option<usize>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the best recording of a performance
    Select {
        #[command(flatten)]
        args: SelectionArgs,
    },
    /// Explain how each recording's score was reached
    Breakdown {
        #[command(flatten)]
        args: SelectionArgs,
    },
    /// List the playlist of the best recording
    Tracks {
        #[command(flatten)]
        args: SelectionArgs,
    },
    /// Show or change the scoring weights
    Weights {
        #[command(subcommand)]
        command: WeightsCommand,
    },
}

/// Weight management subcommands
#[derive(Subcommand)]
pub enum WeightsCommand {
    /// Show the active preset and weight vector
    Show,
    /// List the built-in presets
    Presets,
    /// Switch to a preset (balanced, audiophile, crowd_favorite, custom)
    Preset {
        name: String,
    },
    /// Set a custom weight vector; components must sum to 1.0
    Set {
        source_type: f64,
        format: f64,
        community_rating: f64,
        lineage: f64,
        taper: f64,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Rank { args, limit, json } => {
            let rt = Runtime::new()?;
            cmd_rank(&rt, args, *limit, *json)
        }
        Commands::Select { args } => {
            let rt = Runtime::new()?;
            cmd_select(&rt, args)
        }
        Commands::Breakdown { args } => {
            let rt = Runtime::new()?;
            cmd_breakdown(&rt, args)
        }
        Commands::Tracks { args } => {
            let rt = Runtime::new()?;
            cmd_tracks(&rt, args)
        }
        Commands::Weights { command } => match command {
            WeightsCommand::Show => cmd_weights_show(),
            WeightsCommand::Presets => cmd_weights_presets(),
            WeightsCommand::Preset { name } => cmd_weights_preset(name),
            WeightsCommand::Set {
                source_type,
                format,
                community_rating,
                lineage,
                taper,
            } => cmd_weights_set(*source_type, *format, *community_rating, *lineage, *taper),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_rank() {
        let cli = Cli::try_parse_from([
            "showpicker",
            "rank",
            "1977-05-08",
            "--limit",
            "3",
            "--no-enrich",
            "--catalog",
            "shows.db",
        ])
        .unwrap();

        match cli.command {
            Commands::Rank { args, limit, json } => {
                assert_eq!(args.date, NaiveDate::from_ymd_opt(1977, 5, 8).unwrap());
                assert_eq!(limit, Some(3));
                assert!(args.no_enrich);
                assert!(!json);
                assert_eq!(args.catalog, PathBuf::from("shows.db"));
            }
            _ => panic!("expected rank"),
        }
    }

    #[test]
    fn test_parse_rejects_bad_date() {
        assert!(Cli::try_parse_from(["showpicker", "select", "77-5-8"]).is_err());
    }

    #[test]
    fn test_show_date_must_be_strict() {
        assert_eq!(
            parse_show_date("1977-05-08").unwrap(),
            NaiveDate::from_ymd_opt(1977, 5, 8).unwrap()
        );
        for bad in ["77-5-8", "77-05-08", "1977-5-8", "1977/05/08", "1977-02-30"] {
            assert!(
                matches!(parse_show_date(bad), Err(Error::InvalidInput(_))),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_parse_weights_set() {
        let cli =
            Cli::try_parse_from(["showpicker", "weights", "set", "0.4", "0.3", "0.1", "0.1", "0.1"])
                .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Weights {
                command: WeightsCommand::Set { source_type, .. }
            } if source_type == 0.4
        ));
    }
}
