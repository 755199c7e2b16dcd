//! Filling in attributes the catalog does not state outright.

use crate::archive::{RecordingMetadata, RemoteFile};
use crate::catalog::CatalogRecord;
use crate::quality::model::is_blank;
use crate::quality::scoring::score_format;
use crate::quality::{AttributeFlags, FormatClass, RecordingQuality, SourceType, classify_format};

/// Marker substrings per source type, checked in this order.
const SOURCE_MARKERS: &[(SourceType, &[&str])] = &[
    (SourceType::Soundboard, &["sbd", "soundboard"]),
    (SourceType::Matrix, &["matrix", "mtx"]),
    (SourceType::Audience, &["aud", "audience", "fob", "dfc"]),
];

/// Infer the source type from free text.
///
/// All fields are lowercased and searched together; the first source type
/// with a matching marker wins.
pub fn infer_source_type<'a>(fields: impl IntoIterator<Item = Option<&'a str>>) -> SourceType {
    let combined = fields
        .into_iter()
        .flatten()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ");

    SOURCE_MARKERS
        .iter()
        .find(|(_, markers)| markers.iter().any(|m| combined.contains(m)))
        .map(|(source, _)| *source)
        .unwrap_or(SourceType::Unknown)
}

/// Pick the format label that best represents a recording's file list.
///
/// Lossless beats a bitrate- or VBR-labelled MP3, which beats anything else
/// with a non-empty label. Among labelled MP3s the higher-scoring one wins.
pub fn infer_format(files: &[RemoteFile]) -> Option<String> {
    let audio: Vec<&RemoteFile> = files
        .iter()
        .filter(|f| f.is_audio() && !f.format.trim().is_empty())
        .collect();

    if let Some(lossless) = audio
        .iter()
        .find(|f| classify_format(&f.format) == FormatClass::Lossless)
    {
        return Some(lossless.format.clone());
    }

    let mut best_mp3: Option<(&RemoteFile, f64)> = None;
    for file in &audio {
        if matches!(
            classify_format(&file.format),
            FormatClass::Vbr | FormatClass::Bitrate(_)
        ) {
            let score = score_format(&file.format);
            if best_mp3.is_none_or(|(_, best)| score > best) {
                best_mp3 = Some((file, score));
            }
        }
    }
    if let Some((file, _)) = best_mp3 {
        return Some(file.format.clone());
    }

    audio.first().map(|f| f.format.clone())
}

fn non_blank(text: Option<&str>) -> Option<String> {
    if is_blank(text) {
        None
    } else {
        text.map(|t| t.trim().to_string())
    }
}

/// Build the scoring input for one candidate.
///
/// Remote values win over catalog values when both exist. A known catalog
/// source type is never overridden by inference; `Unknown` is inferred.
pub fn to_quality(
    record: &CatalogRecord,
    metadata: Option<&RecordingMetadata>,
) -> (RecordingQuality, AttributeFlags) {
    let mut flags = AttributeFlags::empty();
    if metadata.is_some() {
        flags |= AttributeFlags::ENRICHED;
    }

    let lineage = non_blank(metadata.and_then(|m| m.lineage.as_deref()))
        .or_else(|| non_blank(record.lineage.as_deref()));
    let taper = non_blank(metadata.and_then(|m| m.taper.as_deref()))
        .or_else(|| non_blank(record.taper.as_deref()));

    let format = match metadata.and_then(|m| infer_format(&m.files)) {
        Some(format) => {
            flags |= AttributeFlags::FORMAT_FROM_FILES;
            format
        }
        None => record.format.clone().unwrap_or_default(),
    };

    let source_type = match record.source_type {
        Some(explicit) if explicit != SourceType::Unknown => explicit,
        _ => {
            flags |= AttributeFlags::SOURCE_INFERRED;
            infer_source_type([
                metadata.and_then(|m| m.source.as_deref()),
                record.source.as_deref(),
                record.title.as_deref(),
                Some(record.identifier.as_str()),
            ])
        }
    };

    let quality = RecordingQuality {
        identifier: record.identifier.clone(),
        source_type: Some(source_type),
        format,
        avg_rating: record.avg_rating.unwrap_or(0.0),
        num_reviews: record.num_reviews.unwrap_or(0),
        lineage,
        taper,
    };
    flags |= quality.missing_flags();
    (quality, flags)
}
