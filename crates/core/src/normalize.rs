//! URL normalization for cache keys.
//!
//! Collapses cosmetic spellings of the same resource onto one string:
//!
//! - Trim whitespace, default scheme to `https://`
//! - Canonicalize `http` to `https`
//! - Lowercase host, strip leading `www.` labels
//! - Root path becomes empty, trailing slashes are removed
//! - Drop fragment and userinfo, keep query string as-is
//!
//! Normalization is best effort: input that cannot be parsed is returned
//! unchanged.

use url::Url;

/// Normalize a URL string into its canonical cache-key form.
pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim();

    let candidate = if has_scheme(trimmed) { trimmed.to_string() } else { format!("https://{trimmed}") };

    match Url::parse(&candidate) {
        Ok(url) => assemble(url).unwrap_or_else(|| input.to_string()),
        Err(e) => {
            tracing::debug!(input, error = %e, "url normalization failed, using input as-is");
            input.to_string()
        }
    }
}

fn has_scheme(s: &str) -> bool {
    match s.find("://") {
        Some(idx) => {
            let scheme = &s[..idx];
            !scheme.is_empty()
                && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

fn assemble(mut url: Url) -> Option<String> {
    if url.scheme() == "http" {
        // Also drops an explicit :443 since it becomes the default port.
        url.set_scheme("https").ok()?;
    }

    let host = url.host_str()?.to_lowercase();
    let mut host = host.as_str();
    while let Some(rest) = host.strip_prefix("www.")
        && !rest.is_empty()
    {
        host = rest;
    }

    let path = url.path().trim_end_matches('/');

    let mut out = format!("{}://{}", url.scheme(), host);
    if let Some(port) = url.port() {
        out.push(':');
        out.push_str(&port.to_string());
    }
    out.push_str(path);
    if let Some(query) = url.query()
        && !query.is_empty()
    {
        out.push('?');
        out.push_str(query);
    }

    Some(out)
}
