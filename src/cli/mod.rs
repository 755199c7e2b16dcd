//! Command-line interface for showpicker.
//!
//! Ranks and selects recordings of a performance date, explains scores,
//! lists playlists and manages the scoring weights.

mod commands;

pub use commands::{Cli, Commands, WeightsCommand, run_command};
