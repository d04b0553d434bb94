//! Page metadata exchanged between discovery, filtering and the cache.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A discovered page.
///
/// Only its serialized form is persisted, as part of a cache payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PageMetadata {
    /// Absolute page URL.
    pub url: String,
    /// Human-readable label, when one is known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl PageMetadata {
    pub fn new(url: impl Into<String>, title: Option<String>) -> Self {
        Self { url: url.into(), title }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_is_optional_on_the_wire() {
        let pages: Vec<PageMetadata> = serde_json::from_str(
            r#"[{"url":"https://example.com/a","title":"A"},{"url":"https://example.com/b"}]"#,
        )
        .unwrap();
        assert_eq!(pages[0].title.as_deref(), Some("A"));
        assert_eq!(pages[1].title, None);

        let json = serde_json::to_string(&pages[1]).unwrap();
        assert_eq!(json, r#"{"url":"https://example.com/b"}"#);
    }
}
