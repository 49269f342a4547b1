//! Long URL validation and normalization before a link is stored.

use url::Url;

/// Longest URL accepted for shortening.
pub const MAX_URL_LENGTH: usize = 8192;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlNormalizationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("URL is longer than {MAX_URL_LENGTH} characters")]
    TooLong,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must contain a host")]
    MissingHost,
}

/// Normalizes a long URL to the form that is stored and redirected to.
///
/// Surrounding whitespace is trimmed, only `http`/`https` with a host are
/// accepted, the host is lowercased, default ports and fragments are dropped.
/// Path and query are kept byte for byte.
pub fn normalize_url(input: &str) -> Result<String, UrlNormalizationError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(UrlNormalizationError::Empty);
    }
    if input.len() > MAX_URL_LENGTH {
        return Err(UrlNormalizationError::TooLong);
    }

    let mut url =
        Url::parse(input).map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(UrlNormalizationError::UnsupportedProtocol);
    }

    // The url crate already lowercases special-scheme hosts and strips
    // default ports on parse.
    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlNormalizationError::MissingHost);
    }

    url.set_fragment(None);

    Ok(url.to_string())
}
