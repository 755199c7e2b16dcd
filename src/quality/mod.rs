//! Recording quality model and scoring engine.
//!
//! - [`model`]: per-recording attributes and their provenance flags
//! - [`weights`]: weight vectors, presets and validation
//! - [`scoring`]: pure functions turning attributes into scores
//!
//! Scoring never reads global state. Callers pass the active
//! [`ScoringWeights`] into every call.

pub mod model;
pub mod scoring;
pub mod weights;

pub use model::{AttributeFlags, RecordingQuality, SourceType, UnknownSourceType};
pub use scoring::{
    ComponentBreakdown, ComponentScores, FormatClass, LineageClass, ScoreBreakdown,
    ScoredRecording, breakdown, classify_format, classify_lineage, composite_score, rank_by,
    score_and_sort, select_best,
};
pub use weights::{
    Preset, ScoringWeights, WEIGHT_SUM_TOLERANCE, WeightProfile, WeightSettings, WeightsError,
};
