//! Image column storage shape
//!
//! The remote store keeps an item's images in a single text column. Legacy
//! rows hold one bare URI; current rows hold a JSON-encoded list of URIs.
//! [`ImageField`] resolves the two shapes once, at ingestion.

use serde_json::Value;

/// Decoded content of the `imageUrl` text column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageField {
    /// Legacy shape: the column is the URI itself
    Single(String),
    /// Current shape: the column is a JSON array of URIs
    List(Vec<String>),
}

impl ImageField {
    /// Resolve a raw column value. `None` for a missing or empty column.
    ///
    /// List entries that are not strings decode as empty strings so the
    /// ingestion repair pass can substitute the placeholder at the same
    /// position.
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let raw = raw.filter(|s| !s.is_empty())?;
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Array(values)) => Some(Self::List(
                values
                    .into_iter()
                    .map(|v| match v {
                        Value::String(s) => s,
                        _ => String::new(),
                    })
                    .collect(),
            )),
            _ => Some(Self::Single(raw.to_string())),
        }
    }

    /// Flatten into the ordered image list
    pub fn into_images(self) -> Vec<String> {
        match self {
            Self::Single(uri) => vec![uri],
            Self::List(uris) => uris,
        }
    }

    /// Encode an image list into the current column shape
    pub fn encode(images: &[String]) -> String {
        Value::from(images.to_vec()).to_string()
    }
}
