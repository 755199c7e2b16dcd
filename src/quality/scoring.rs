//! Recording quality scoring.
//!
//! Each attribute of a [`RecordingQuality`] maps to a component score in
//! 0-100; the composite score is the weighted sum of the five components.
//!
//! # Component rules
//!
//! | Component | Rule |
//! |---|---|
//! | source | soundboard 100, matrix 70, audience 40, unknown 50, absent 0 |
//! | format | lossless 100, VBR 85, bitrate tiers 90/75/60/45/30, mp3 70, ogg 75, other 50, empty 0 |
//! | rating | `avg/5*100 * (0.5 + 0.5*confidence)`, confidence from review count |
//! | lineage | master 100, generation N decays from 90, unparsed 60, absent 50 |
//! | taper | known name 100, otherwise 50 |
//!
//! Nothing in here fails: malformed or missing inputs fall back to the neutral
//! values above. The thresholds are tuned against real catalog data and must
//! not drift.

use serde::Serialize;

use super::model::{RecordingQuality, SourceType};
use super::weights::ScoringWeights;

/// Markers for lossless encodings.
const LOSSLESS_MARKERS: &[&str] = &["flac", "shn", "shorten", "ape"];

/// Recordists whose tapes are consistently well regarded.
const KNOWN_TAPERS: &[&str] = &[
    "charlie miller",
    "dan healy",
    "betty cantor",
    "rob eaton",
    "jerry moore",
    "dick latvala",
    "matt vernon",
    "bill koepke",
    "kevin tobin",
    "dan lafferty",
    "jim wise",
    "scott clugstone",
];

/// Neutral score for attributes we know nothing about.
const NEUTRAL: f64 = 50.0;

/// Encoding class parsed from a free-text format descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatClass {
    Lossless,
    Vbr,
    /// Constant bitrate in kbps
    Bitrate(u32),
    Mp3,
    Ogg,
    Other,
    Empty,
}

/// Lineage class parsed from a free-text generation description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineageClass {
    Absent,
    Master,
    Generation(u32),
    Unparsed,
}

/// Classify a format descriptor such as "Flac", "VBR MP3" or "128Kbps MP3".
pub fn classify_format(format: &str) -> FormatClass {
    let lower = format.trim().to_lowercase();
    if lower.is_empty() {
        return FormatClass::Empty;
    }
    if LOSSLESS_MARKERS.iter().any(|m| lower.contains(m)) {
        return FormatClass::Lossless;
    }
    if lower.contains("vbr") {
        return FormatClass::Vbr;
    }
    if let Some(kbps) = parse_bitrate(&lower) {
        return FormatClass::Bitrate(kbps);
    }
    if lower.contains("mp3") {
        return FormatClass::Mp3;
    }
    if lower.contains("ogg") || lower.contains("vorbis") {
        return FormatClass::Ogg;
    }
    FormatClass::Other
}

/// First run of digits immediately followed by `k`.
fn parse_bitrate(lower: &str) -> Option<u32> {
    let bytes = lower.as_bytes();
    let mut start = None;
    for (i, &b) in bytes.iter().enumerate() {
        if b.is_ascii_digit() {
            start.get_or_insert(i);
            continue;
        }
        if let Some(s) = start.take()
            && b == b'k'
        {
            return lower[s..i].parse().ok();
        }
    }
    None
}

/// Classify a lineage description such as "SBD > Master Reel > DAT" or "3rd gen".
pub fn classify_lineage(lineage: Option<&str>) -> LineageClass {
    let Some(text) = lineage.map(str::trim).filter(|t| !t.is_empty()) else {
        return LineageClass::Absent;
    };
    let lower = text.to_lowercase();
    if lower.contains("master") || lower.contains("original") {
        return LineageClass::Master;
    }
    match parse_generation(&lower) {
        Some(n) if n >= 1 => LineageClass::Generation(n),
        _ => LineageClass::Unparsed,
    }
}

/// Generation number from "m2" or "2nd gen" style tokens.
fn parse_generation(lower: &str) -> Option<u32> {
    let chars: Vec<char> = lower.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if !chars[i].is_ascii_digit() || (i > 0 && chars[i - 1].is_ascii_digit()) {
            i += 1;
            continue;
        }

        let start = i;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
        let digits: String = chars[start..i].iter().collect();
        let Ok(n) = digits.parse::<u32>() else {
            continue;
        };

        // "mN": an `m` that starts a word, digits that end one
        let m_prefixed = start > 0
            && chars[start - 1] == 'm'
            && (start < 2 || !chars[start - 2].is_alphanumeric());
        let word_ends = chars.get(i).is_none_or(|c| !c.is_alphanumeric());
        if m_prefixed && word_ends {
            return Some(n);
        }

        // "Nth gen", "N gen", "N-gen"
        let tail: String = chars[i..].iter().collect();
        let after_ordinal = ["st", "nd", "rd", "th"]
            .into_iter()
            .find_map(|suffix| tail.strip_prefix(suffix))
            .unwrap_or(tail.as_str());
        if after_ordinal.trim_start_matches([' ', '-']).starts_with("gen") {
            return Some(n);
        }
    }
    None
}

pub fn score_source(source: Option<SourceType>) -> f64 {
    match source {
        Some(SourceType::Soundboard) => 100.0,
        Some(SourceType::Matrix) => 70.0,
        Some(SourceType::Audience) => 40.0,
        Some(SourceType::Unknown) => NEUTRAL,
        None => 0.0,
    }
}

pub fn score_format(format: &str) -> f64 {
    match classify_format(format) {
        FormatClass::Lossless => 100.0,
        FormatClass::Vbr => 85.0,
        FormatClass::Bitrate(kbps) => match kbps {
            320.. => 90.0,
            256.. => 75.0,
            192.. => 60.0,
            128.. => 45.0,
            _ => 30.0,
        },
        FormatClass::Mp3 => 70.0,
        FormatClass::Ogg => 75.0,
        FormatClass::Other => NEUTRAL,
        FormatClass::Empty => 0.0,
    }
}

/// Rating scaled by how many people stand behind it.
///
/// Confidence reaches 1.0 at 99 reviews; with no reviews the rating still
/// counts for half.
pub fn score_rating(avg_rating: f64, num_reviews: u32) -> f64 {
    let avg = if avg_rating.is_finite() {
        avg_rating.clamp(0.0, 5.0)
    } else {
        0.0
    };
    let rating_score = avg / 5.0 * 100.0;
    let confidence = ((f64::from(num_reviews) + 1.0).log10() / 2.0).min(1.0);
    rating_score * (0.5 + 0.5 * confidence)
}

pub fn score_lineage(lineage: Option<&str>) -> f64 {
    match classify_lineage(lineage) {
        LineageClass::Absent => NEUTRAL,
        LineageClass::Master => 100.0,
        LineageClass::Generation(n) => (90.0 - 15.0 * f64::from(n - 1)).max(30.0),
        LineageClass::Unparsed => 60.0,
    }
}

pub fn score_taper(taper: Option<&str>) -> f64 {
    match taper.map(str::trim).filter(|t| !t.is_empty()) {
        Some(name) if is_known_taper(name) => 100.0,
        _ => NEUTRAL,
    }
}

fn is_known_taper(name: &str) -> bool {
    let lower = name.to_lowercase();
    KNOWN_TAPERS.iter().any(|known| lower.contains(known))
}

/// All five component scores for one recording.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComponentScores {
    pub source_type: f64,
    pub format: f64,
    pub community_rating: f64,
    pub lineage: f64,
    pub taper: f64,
}

impl ComponentScores {
    pub fn of(recording: &RecordingQuality) -> Self {
        Self {
            source_type: score_source(recording.source_type),
            format: score_format(&recording.format),
            community_rating: score_rating(recording.avg_rating, recording.num_reviews),
            lineage: score_lineage(recording.lineage.as_deref()),
            taper: score_taper(recording.taper.as_deref()),
        }
    }

    /// Unrounded weighted sum.
    fn weighted(&self, weights: &ScoringWeights) -> f64 {
        self.source_type * weights.source_type
            + self.format * weights.format
            + self.community_rating * weights.community_rating
            + self.lineage * weights.lineage
            + self.taper * weights.taper
    }
}

/// Weighted composite score, rounded to two decimals.
pub fn composite_score(recording: &RecordingQuality, weights: &ScoringWeights) -> f64 {
    round2(ComponentScores::of(recording).weighted(weights).clamp(0.0, 100.0))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A recording paired with its composite score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRecording {
    pub recording: RecordingQuality,
    pub score: f64,
}

/// Score arbitrary items and sort them best first.
///
/// The sort is stable: items with identical scores keep their input order.
pub fn rank_by<T, F>(items: Vec<T>, weights: &ScoringWeights, quality: F) -> Vec<(T, f64)>
where
    F: Fn(&T) -> &RecordingQuality,
{
    let mut scored: Vec<(T, f64)> = items
        .into_iter()
        .map(|item| {
            let score = composite_score(quality(&item), weights);
            (item, score)
        })
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored
}

/// Score every recording and return them best first (stable among ties).
pub fn score_and_sort(
    recordings: Vec<RecordingQuality>,
    weights: &ScoringWeights,
) -> Vec<ScoredRecording> {
    rank_by(recordings, weights, |r| r)
        .into_iter()
        .map(|(recording, score)| ScoredRecording { recording, score })
        .collect()
}

/// The best recording, or `None` when there are no candidates.
pub fn select_best(
    recordings: Vec<RecordingQuality>,
    weights: &ScoringWeights,
) -> Option<ScoredRecording> {
    score_and_sort(recordings, weights).into_iter().next()
}

/// One component's contribution to a composite score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentBreakdown {
    pub component: &'static str,
    /// The attribute as it was scored
    pub input: String,
    /// Component score (0-100)
    pub score: f64,
    pub weight: f64,
    /// `score * weight`
    pub contribution: f64,
}

/// Full explanation of a composite score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub identifier: String,
    pub components: Vec<ComponentBreakdown>,
    pub total: f64,
}

/// Explain how a recording's composite score was reached.
pub fn breakdown(recording: &RecordingQuality, weights: &ScoringWeights) -> ScoreBreakdown {
    let scores = ComponentScores::of(recording);
    let or_none = |value: Option<&str>| value.unwrap_or("(none)").to_string();

    let rows = [
        (
            "source_type",
            recording
                .source_type
                .map(|s| s.to_string())
                .unwrap_or_else(|| "(none)".to_string()),
            scores.source_type,
            weights.source_type,
        ),
        ("format", recording.format.clone(), scores.format, weights.format),
        (
            "community_rating",
            format!("{:.2} ({} reviews)", recording.avg_rating, recording.num_reviews),
            scores.community_rating,
            weights.community_rating,
        ),
        (
            "lineage",
            or_none(recording.lineage.as_deref()),
            scores.lineage,
            weights.lineage,
        ),
        (
            "taper",
            or_none(recording.taper.as_deref()),
            scores.taper,
            weights.taper,
        ),
    ];

    let components = rows
        .into_iter()
        .map(|(component, input, score, weight)| ComponentBreakdown {
            component,
            input,
            score: round2(score),
            weight,
            contribution: round2(score * weight),
        })
        .collect();

    ScoreBreakdown {
        identifier: recording.identifier.clone(),
        components,
        total: composite_score(recording, weights),
    }
}


/// Property-based tests using proptest
#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn source() -> impl Strategy<Value = Option<SourceType>> {
        prop::option::of(prop_oneof![
            Just(SourceType::Soundboard),
            Just(SourceType::Matrix),
            Just(SourceType::Audience),
            Just(SourceType::Unknown),
        ])
    }

    fn recording() -> impl Strategy<Value = RecordingQuality> {
        (
            source(),
            "[ a-zA-Z0-9]{0,16}",
            prop::num::f64::ANY,
            any::<u32>(),
            prop::option::of("[ a-z0-9>]{0,20}"),
            prop::option::of("[ a-zA-Z]{0,20}"),
        )
            .prop_map(|(source_type, format, avg_rating, num_reviews, lineage, taper)| {
                RecordingQuality {
                    identifier: "prop".to_string(),
                    source_type,
                    format,
                    avg_rating,
                    num_reviews,
                    lineage,
                    taper,
                }
            })
    }

    /// Weight vectors normalized to sum to 1, then nudged within tolerance.
    fn weights() -> impl Strategy<Value = ScoringWeights> {
        (
            prop::array::uniform5(0.0f64..1.0),
            -0.0009f64..0.0009,
        )
            .prop_filter("non-zero", |(raw, _)| raw.iter().sum::<f64>() > 0.01)
            .prop_map(|(raw, drift)| {
                let total: f64 = raw.iter().sum();
                let scale = (1.0 + drift) / total;
                ScoringWeights::new(
                    raw[0] * scale,
                    raw[1] * scale,
                    raw[2] * scale,
                    raw[3] * scale,
                    raw[4] * scale,
                )
            })
    }

    proptest! {
        /// Composite scores stay in range for any valid weight vector
        #[test]
        fn composite_in_range(rec in recording(), w in weights()) {
            let score = composite_score(&rec, &w);
            prop_assert!((0.0..=100.0).contains(&score), "score {}", score);
        }

        /// Component scores never leave 0-100
        #[test]
        fn components_in_range(rec in recording()) {
            let c = ComponentScores::of(&rec);
            for v in [c.source_type, c.format, c.community_rating, c.lineage, c.taper] {
                prop_assert!((0.0..=100.0).contains(&v));
            }
        }

        /// Sorting is descending and stable
        #[test]
        fn sort_descending_and_stable(recs in prop::collection::vec(recording(), 0..12)) {
            let tagged: Vec<_> = recs
                .into_iter()
                .enumerate()
                .map(|(i, r)| RecordingQuality { identifier: i.to_string(), ..r })
                .collect();
            let ranked = score_and_sort(tagged, &ScoringWeights::BALANCED);
            for pair in ranked.windows(2) {
                prop_assert!(pair[0].score >= pair[1].score);
                if pair[0].score == pair[1].score {
                    let a: usize = pair[0].recording.identifier.parse().unwrap();
                    let b: usize = pair[1].recording.identifier.parse().unwrap();
                    prop_assert!(a < b);
                }
            }
        }
    }
}
