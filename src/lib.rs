//! Showpicker - picks the best recording of an archived concert and plays it.
//!
//! - [`quality`]: weighted multi-criteria scoring of recordings
//! - [`selector`]: candidate gathering, enrichment and ranking for a date
//! - [`player`]: playback state machine over a track playlist
//! - [`catalog`], [`archive`], [`config`]: the collaborators around them

pub mod archive;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod player;
pub mod quality;
pub mod selector;
#[cfg(test)]
pub mod test_utils;

pub use error::{Error, Result};
