//! `Retry-After` header parsing.
//!
//! Only the delay-seconds form is understood. An HTTP-date value is
//! reported as [`TransportError::InvalidRetryAfter`] like any other
//! non-numeric value.

use crate::error::{RetryAfterError, TransportError};
use reqwest::header::{HeaderMap, RETRY_AFTER};

/// Read the number of seconds a 429 response asks us to wait.
///
/// A missing or empty header is [`TransportError::MissingRetryAfter`]. When
/// the header repeats, the first value wins.
pub fn parse_retry_after(headers: &HeaderMap) -> Result<u64, TransportError> {
    let Some(raw) = headers.get(RETRY_AFTER) else {
        return Err(TransportError::MissingRetryAfter);
    };
    if raw.is_empty() {
        return Err(TransportError::MissingRetryAfter);
    }

    let invalid = |source: RetryAfterError| TransportError::InvalidRetryAfter {
        value: String::from_utf8_lossy(raw.as_bytes()).into_owned(),
        source,
    };

    let text = raw.to_str().map_err(|e| invalid(e.into()))?;
    text.parse::<u64>().map_err(|e| invalid(e.into()))
}
