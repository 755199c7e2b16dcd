//! Adapter layer: Convert archive DTOs to domain models
//!
//! This is the ONLY place where DTO types are converted to domain types.

use super::domain::{MetadataError, RecordingMetadata, RemoteFile};
use super::dto;

/// Convert a metadata response into [`RecordingMetadata`].
///
/// Fails with [`MetadataError::NotFound`] when the service returned an empty
/// object (its way of saying the identifier does not exist).
pub fn to_metadata(
    identifier: &str,
    response: dto::MetadataResponse,
) -> Result<RecordingMetadata, MetadataError> {
    if let Some(error) = response.error {
        return Err(MetadataError::Api(error));
    }

    let Some(item) = response.metadata else {
        return Err(MetadataError::NotFound(identifier.to_string()));
    };

    // The original uploader sometimes credits the transfer instead of the taper
    let taper = flatten(&item.taper).or_else(|| flatten(&item.transferer));

    Ok(RecordingMetadata {
        identifier: item.identifier.unwrap_or_else(|| identifier.to_string()),
        source: flatten(&item.source),
        taper,
        lineage: flatten(&item.lineage),
        files: response.files.into_iter().map(to_file).collect(),
    })
}

fn to_file(entry: dto::FileEntry) -> RemoteFile {
    RemoteFile {
        size_bytes: entry.size.as_deref().and_then(|s| s.trim().parse().ok()),
        duration_secs: entry.length.as_deref().and_then(parse_length),
        track: entry.track.as_deref().and_then(parse_track_number),
        original: entry.source.as_deref() == Some("original"),
        format: entry.format.unwrap_or_default(),
        title: entry.title.filter(|t| !t.trim().is_empty()),
        name: entry.name,
    }
}

/// Flatten a string-or-array field into one string.
fn flatten(value: &Option<serde_json::Value>) -> Option<String> {
    let text = match value {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str())
            .collect::<Vec<_>>()
            .join(" "),
        _ => return None,
    };
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Parse "323.45", "5:23" or "1:02:03" into seconds.
fn parse_length(length: &str) -> Option<f64> {
    let length = length.trim();
    if !length.contains(':') {
        return length.parse::<f64>().ok().filter(|s| s.is_finite() && *s >= 0.0);
    }

    let mut total = 0.0;
    for part in length.split(':') {
        let value: f64 = part.trim().parse().ok()?;
        total = total * 60.0 + value;
    }
    Some(total)
}

/// Parse "3" or "3/12" into a track number.
fn parse_track_number(track: &str) -> Option<u32> {
    track.split('/').next()?.trim().parse().ok()
}
