//! Link normalization.
//!
//! Turns user input such as `example.com/page` into an absolute URL:
//! whitespace is trimmed, a missing scheme defaults to `https://`, and the
//! result must parse as an absolute HTTP(S) URL with a host.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Minimum length of a link after trimming.
pub const MIN_LINK_LENGTH: usize = 2;

/// Matches an explicit `<letters>://` scheme prefix.
static SCHEME_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]+://").expect("scheme pattern is valid"));

/// Errors that can occur during link normalization.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlNormalizationError {
    #[error("Link must be at least {MIN_LINK_LENGTH} characters")]
    TooShort,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL has no host")]
    MissingHost,
}

/// Normalizes a submitted link to an absolute URL.
///
/// # Normalization Rules
///
/// 1. Surrounding whitespace is removed
/// 2. Input without a `<letters>://` prefix gets `https://` prepended
/// 3. The result must parse as an absolute URL with a host
/// 4. Only HTTP and HTTPS are accepted
///
/// Host lowercasing, IDNA and default-port removal come from [`Url`] parsing.
/// Path, query and fragment are preserved.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_link("example.com").unwrap().as_str(), "https://example.com/");
/// assert_eq!(
///     normalize_link("  HTTP://Example.COM:80/a#b ").unwrap().as_str(),
///     "http://example.com/a#b"
/// );
/// ```
pub fn normalize_link(input: &str) -> Result<Url, UrlNormalizationError> {
    let trimmed = input.trim();
    if trimmed.chars().count() < MIN_LINK_LENGTH {
        return Err(UrlNormalizationError::TooShort);
    }

    let candidate = if SCHEME_PREFIX.is_match(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let url =
        Url::parse(&candidate).map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlNormalizationError::UnsupportedProtocol),
    }

    if url.host().is_none() {
        return Err(UrlNormalizationError::MissingHost);
    }

    Ok(url)
}
