//! Absolute URL resolution for photos and avatars.

/// Makes a marketplace-relative URL absolute.
///
/// `//cdn/x` gains an `https:` scheme, `/x` gains `https://<host>`, anything
/// else is returned trimmed but otherwise unchanged.
pub fn normalize_url(url: &str, host: &str) -> String {
    let url = url.trim();
    if url.is_empty() {
        return String::new();
    }

    if url.starts_with("//") {
        format!("https:{}", url)
    } else if url.starts_with('/') {
        format!("https://{}{}", host, url)
    } else {
        url.to_string()
    }
}
