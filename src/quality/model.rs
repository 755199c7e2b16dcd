//! Recording quality attributes.
//!
//! These are the inputs to scoring. A [`RecordingQuality`] is assembled once per
//! candidate (from the catalog, optionally enriched with remote metadata) and is
//! only read while scores are computed.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where the audio of a recording was captured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Direct feed from the mixing board
    Soundboard,
    /// Blend of board and audience sources
    Matrix,
    /// Microphones in the crowd
    Audience,
    /// Source could not be determined
    Unknown,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Soundboard => "soundboard",
            Self::Matrix => "matrix",
            Self::Audience => "audience",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text that is not one of the exact source type names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unrecognized source type '{0}'")]
pub struct UnknownSourceType(pub String);

impl FromStr for SourceType {
    type Err = UnknownSourceType;

    /// Exact names only ("sbd" and friends are handled by inference).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "soundboard" => Ok(Self::Soundboard),
            "matrix" => Ok(Self::Matrix),
            "audience" => Ok(Self::Audience),
            "unknown" => Ok(Self::Unknown),
            _ => Err(UnknownSourceType(s.to_string())),
        }
    }
}

bitflags! {
    /// Provenance of a recording's attributes.
    ///
    /// Carried alongside scores so the consuming layer can explain where each
    /// input came from.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct AttributeFlags: u32 {
        /// Source type was inferred from free text
        const SOURCE_INFERRED = 1 << 0;
        /// Format was chosen from the remote file list
        const FORMAT_FROM_FILES = 1 << 1;
        /// Remote metadata was merged in
        const ENRICHED = 1 << 2;
        /// Remote metadata fetch failed, catalog data only
        const ENRICHMENT_FAILED = 1 << 3;
        /// Enrichment was abandoned because it took too long
        const ENRICHMENT_TIMED_OUT = 1 << 4;
        /// No lineage information available
        const NO_LINEAGE = 1 << 5;
        /// No taper information available
        const NO_TAPER = 1 << 6;
        /// No community reviews
        const NO_REVIEWS = 1 << 7;

        /// Any enrichment problem
        const DEGRADED = Self::ENRICHMENT_FAILED.bits() | Self::ENRICHMENT_TIMED_OUT.bits();
    }
}

impl AttributeFlags {
    /// Human-readable descriptions of all set flags.
    pub fn descriptions(&self) -> Vec<&'static str> {
        let mut descs = Vec::new();
        if self.contains(Self::SOURCE_INFERRED) {
            descs.push("Source inferred from text");
        }
        if self.contains(Self::FORMAT_FROM_FILES) {
            descs.push("Format chosen from file list");
        }
        if self.contains(Self::ENRICHED) {
            descs.push("Enriched with remote metadata");
        }
        if self.contains(Self::ENRICHMENT_FAILED) {
            descs.push("Remote metadata unavailable");
        }
        if self.contains(Self::ENRICHMENT_TIMED_OUT) {
            descs.push("Remote metadata timed out");
        }
        if self.contains(Self::NO_LINEAGE) {
            descs.push("No lineage");
        }
        if self.contains(Self::NO_TAPER) {
            descs.push("No taper");
        }
        if self.contains(Self::NO_REVIEWS) {
            descs.push("No reviews");
        }
        descs
    }
}

/// Quality attributes for one physical recording of a performance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingQuality {
    /// Opaque unique identifier
    pub identifier: String,
    /// Capture source (`None` when nothing at all is known)
    pub source_type: Option<SourceType>,
    /// Free-text encoding descriptor, e.g. "Flac" or "128Kbps MP3"
    pub format: String,
    /// Community average rating (0-5)
    pub avg_rating: f64,
    /// Number of community reviews
    pub num_reviews: u32,
    /// Generation/transfer description
    pub lineage: Option<String>,
    /// Recordist name
    pub taper: Option<String>,
}

impl RecordingQuality {
    /// A recording with only an identifier; every other attribute absent.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            source_type: None,
            format: String::new(),
            avg_rating: 0.0,
            num_reviews: 0,
            lineage: None,
            taper: None,
        }
    }

    pub fn with_source(mut self, source: SourceType) -> Self {
        self.source_type = Some(source);
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_rating(mut self, avg_rating: f64, num_reviews: u32) -> Self {
        self.avg_rating = avg_rating;
        self.num_reviews = num_reviews;
        self
    }

    pub fn with_lineage(mut self, lineage: impl Into<String>) -> Self {
        self.lineage = Some(lineage.into());
        self
    }

    pub fn with_taper(mut self, taper: impl Into<String>) -> Self {
        self.taper = Some(taper.into());
        self
    }

    /// Flags for attributes that are missing entirely.
    pub fn missing_flags(&self) -> AttributeFlags {
        let mut flags = AttributeFlags::empty();
        if is_blank(self.lineage.as_deref()) {
            flags |= AttributeFlags::NO_LINEAGE;
        }
        if is_blank(self.taper.as_deref()) {
            flags |= AttributeFlags::NO_TAPER;
        }
        if self.num_reviews == 0 {
            flags |= AttributeFlags::NO_REVIEWS;
        }
        flags
    }
}

/// True for `None` or whitespace-only text.
pub(crate) fn is_blank(text: Option<&str>) -> bool {
    text.map(|t| t.trim().is_empty()).unwrap_or(true)
}
