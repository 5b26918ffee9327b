//! Photo records and the persisted gallery index format
//!
//! The index is stored as a single JSON array under one key of the index
//! store. Each element carries `filepath` and, optionally, `webviewPath`.
//! Array order is display order, newest first.

use serde::{Deserialize, Serialize};

/// A persisted gallery entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRecord {
    /// Where the image bytes live in the blob store
    #[serde(rename = "filepath")]
    pub storage_path: String,

    /// A reference the view can render without further I/O.
    /// `None` until resolved.
    #[serde(
        rename = "webviewPath",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub display_reference: Option<String>,
}

impl PhotoRecord {
    /// Creates a record with no display reference yet
    pub fn unresolved(storage_path: impl Into<String>) -> Self {
        Self {
            storage_path: storage_path.into(),
            display_reference: None,
        }
    }

    /// Creates a record with a known display reference
    pub fn resolved(storage_path: impl Into<String>, display_reference: impl Into<String>) -> Self {
        Self {
            storage_path: storage_path.into(),
            display_reference: Some(display_reference.into()),
        }
    }

    /// Returns whether the view can render this record directly
    pub fn is_resolved(&self) -> bool {
        self.display_reference
            .as_deref()
            .is_some_and(|reference| !reference.is_empty())
    }
}

/// Serializes the gallery in index store format
pub fn encode_index(photos: &[PhotoRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string(photos)
}

/// Parses an index store value
///
/// Returns `None` when the value is not a JSON array of records. A JSON
/// `null` is read as an empty gallery.
pub fn decode_index(value: &str) -> Option<Vec<PhotoRecord>> {
    match serde_json::from_str::<Option<Vec<PhotoRecord>>>(value) {
        Ok(photos) => Some(photos.unwrap_or_default()),
        Err(e) => {
            tracing::debug!("Index value is not a photo list: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_with_persisted_keys() {
        let record = PhotoRecord::resolved("1704326400000.jpeg", "blob:http://localhost/1");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"filepath":"1704326400000.jpeg","webviewPath":"blob:http://localhost/1"}"#
        );
    }

    #[test]
    fn test_unresolved_record_omits_webview_path() {
        let record = PhotoRecord::unresolved("a.jpeg");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"filepath":"a.jpeg"}"#);
        assert!(!record.is_resolved());
    }

    #[test]
    fn test_empty_display_reference_is_not_resolved() {
        let record = PhotoRecord::resolved("a.jpeg", "");
        assert!(!record.is_resolved());
    }

    #[test]
    fn test_decode_preserves_order() {
        let photos = decode_index(r#"[{"filepath":"a.jpeg"},{"filepath":"b.jpeg"}]"#).unwrap();
        let paths: Vec<_> = photos.iter().map(|p| p.storage_path.as_str()).collect();
        assert_eq!(paths, vec!["a.jpeg", "b.jpeg"]);
        assert!(photos.iter().all(|p| p.display_reference.is_none()));
    }

    #[test]
    fn test_round_trip_keeps_pairs() {
        let photos = vec![
            PhotoRecord::resolved("file:///data/2.jpeg", "http://localhost/_capacitor_file_/data/2.jpeg"),
            PhotoRecord::unresolved("1.jpeg"),
        ];
        let encoded = encode_index(&photos).unwrap();
        assert_eq!(decode_index(&encoded).unwrap(), photos);
    }

    #[test]
    fn test_decode_null_is_empty() {
        assert_eq!(decode_index("null"), Some(vec![]));
    }

    #[test]
    fn test_decode_garbage_is_none() {
        assert!(decode_index("").is_none());
        assert!(decode_index("not json").is_none());
        assert!(decode_index(r#"{"filepath":"a.jpeg"}"#).is_none());
    }

    #[test]
    fn test_decode_ignores_unknown_keys() {
        let photos = decode_index(r#"[{"filepath":"a.jpeg","extra":1}]"#).unwrap();
        assert_eq!(photos, vec![PhotoRecord::unresolved("a.jpeg")]);
    }
}
