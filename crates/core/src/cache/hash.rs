//! Content-addressed cache locations.
//!
//! A key maps to `<origin label>/<sha256(key)>.json`. The raw key never
//! touches the filesystem, so arbitrary characters and lengths are safe.

use sha2::{Digest, Sha256};
use url::Url;

/// Partition used when no host can be recovered from the key.
pub const INVALID_ORIGIN: &str = "_invalid";

/// Suffix of every entry file.
pub const ENTRY_SUFFIX: &str = ".json";

/// Hex-encoded SHA-256 of the full key string.
pub fn hash_key(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}

/// File name of the entry stored under `key`.
pub fn entry_file_name(key: &str) -> String {
    format!("{}{ENTRY_SUFFIX}", hash_key(key))
}

/// Directory label partitioning entries by host.
///
/// The key is parsed as a URL first. Composite keys such as
/// `discovered_pages:limit=5:https://docs.example.com` fall back to the
/// first embedded `scheme://` URL. Anything else lands in [`INVALID_ORIGIN`].
pub fn origin_label(key: &str) -> String {
    embedded_url(key)
        .as_ref()
        .and_then(Url::host_str)
        .map(sanitize_label)
        .filter(|label| !label.is_empty())
        .unwrap_or_else(|| INVALID_ORIGIN.to_string())
}

fn embedded_url(key: &str) -> Option<Url> {
    if let Ok(url) = Url::parse(key)
        && url.has_host()
    {
        return Some(url);
    }

    let idx = key.find("://")?;
    let start = key[..idx]
        .rfind(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')))
        .map_or(0, |i| i + 1);

    Url::parse(&key[start..]).ok()
}

fn sanitize_label(host: &str) -> String {
    host.chars()
        .map(|c| {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' }
        })
        .collect()
}
