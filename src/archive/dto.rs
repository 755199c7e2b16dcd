//! Archive metadata API Data Transfer Objects
//!
//! These types match what the `/metadata/{identifier}` endpoint returns.
//! DO NOT use these types outside the archive module - convert to domain types.
//!
//! Item-level metadata fields are loosely typed upstream: the same key may
//! hold a string or an array of strings, so they are kept as raw JSON values
//! and flattened by the adapter.

use serde::{Deserialize, Serialize};

/// Full item metadata response.
///
/// Unknown identifiers come back as an empty object, hence every field is
/// optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MetadataResponse {
    /// Item-level descriptive metadata
    pub metadata: Option<ItemMetadata>,
    /// Every file in the item (audio, checksums, artwork, ...)
    #[serde(default)]
    pub files: Vec<FileEntry>,
    /// Set when the service could not serve the item
    pub error: Option<String>,
}

/// Item-level metadata
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ItemMetadata {
    pub identifier: Option<String>,
    pub title: Option<serde_json::Value>,
    pub date: Option<serde_json::Value>,
    pub venue: Option<serde_json::Value>,
    /// Source chain, e.g. "SBD > Reels > DAT"
    pub source: Option<serde_json::Value>,
    pub lineage: Option<serde_json::Value>,
    pub taper: Option<serde_json::Value>,
    pub transferer: Option<serde_json::Value>,
}

/// One file in an item
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FileEntry {
    pub name: String,
    /// "original" or "derivative"
    pub source: Option<String>,
    /// Format label, e.g. "Flac", "VBR MP3", "64Kbps MP3"
    pub format: Option<String>,
    /// Size in bytes, as a string
    pub size: Option<String>,
    /// Duration: seconds ("323.45") or clock time ("5:23")
    pub length: Option<String>,
    pub title: Option<String>,
    /// Track number, "3" or "3/12"
    pub track: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_item_response() {
        let json = r#"{
            "metadata": {
                "identifier": "gd1977-05-08.sbd.miller",
                "title": "Grateful Dead Live at Barton Hall",
                "source": ["SBD > Reels", "DAT"],
                "taper": "Betty Cantor-Jackson"
            },
            "files": [
                {"name": "gd77-05-08d1t01.flac", "format": "Flac", "size": "34000123", "length": "5:23", "track": "01"},
                {"name": "gd77-05-08.ffp", "format": "Flac FingerPrint"}
            ],
            "reviews": [{"stars": "5"}]
        }"#;

        let response: MetadataResponse = serde_json::from_str(json).unwrap();
        let meta = response.metadata.unwrap();
        assert_eq!(meta.identifier.as_deref(), Some("gd1977-05-08.sbd.miller"));
        assert!(meta.source.unwrap().is_array());
        assert_eq!(response.files.len(), 2);
        assert_eq!(response.files[0].length.as_deref(), Some("5:23"));
    }

    #[test]
    fn test_parse_empty_object() {
        let response: MetadataResponse = serde_json::from_str("{}").unwrap();
        assert!(response.metadata.is_none());
        assert!(response.files.is_empty());
    }
}
