//! Turning a recording's file list into a playlist.

use crate::archive::{RemoteFile, download_url};
use crate::player::{AudioTrack, normalize_duration};
use crate::quality::classify_format;

use super::inference::infer_format;

/// Playable tracks of `identifier` in the chosen format, in play order.
///
/// Files are matched by format class, so "Flac" also picks up "24bit Flac".
/// When no file matches `format` the best format present in the list is used
/// instead. Order is track number, then file name; files without a track
/// number go last.
pub fn tracks_for(
    base_url: &str,
    identifier: &str,
    files: &[RemoteFile],
    format: &str,
) -> Vec<AudioTrack> {
    let mut chosen = matching(files, format);
    if chosen.is_empty()
        && let Some(fallback) = infer_format(files)
    {
        tracing::debug!(%identifier, wanted = format, using = %fallback, "No files in preferred format");
        chosen = matching(files, &fallback);
    }

    chosen.sort_by(|a, b| {
        a.track
            .unwrap_or(u32::MAX)
            .cmp(&b.track.unwrap_or(u32::MAX))
            .then_with(|| a.name.cmp(&b.name))
    });

    chosen
        .into_iter()
        .enumerate()
        .map(|(index, file)| AudioTrack {
            url: download_url(base_url, identifier, &file.name),
            title: file.title.clone().unwrap_or_else(|| display_name(&file.name)),
            duration: normalize_duration(file.duration_secs.unwrap_or(0.0)),
            format: file.format.clone(),
            size_bytes: file.size_bytes.unwrap_or(0),
            index,
        })
        .collect()
}

fn matching<'a>(files: &'a [RemoteFile], format: &str) -> Vec<&'a RemoteFile> {
    let wanted = classify_format(format);
    files
        .iter()
        .filter(|f| f.is_audio() && classify_format(&f.format) == wanted)
        .collect()
}

/// File name without directories or extension.
fn display_name(name: &str) -> String {
    let base = name.rsplit('/').next().unwrap_or(name);
    match base.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => base.to_string(),
    }
}
