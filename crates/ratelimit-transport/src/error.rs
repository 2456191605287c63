//! Error types returned by transports.

use reqwest::header::ToStrError;
use std::num::ParseIntError;
use thiserror::Error;

/// Type-erased error produced by an underlying executor.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Everything that can go wrong while executing a request.
///
/// Only [`Transport`](TransportError::Transport) originates below the
/// decorator. The rate-limit variants are raised when a 429 response cannot
/// be acted on; none of them are retried.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network or protocol failure from the underlying executor, as-is.
    #[error("{0}")]
    Transport(#[source] BoxError),

    /// The server answered 429 without telling us how long to wait.
    #[error("rate limit reached but no Retry-After header")]
    MissingRetryAfter,

    /// The server answered 429 with a `Retry-After` we cannot use.
    #[error("unable to read Retry-After header {value:?} as seconds")]
    InvalidRetryAfter {
        /// Raw header value, lossily decoded.
        value: String,
        #[source]
        source: RetryAfterError,
    },

    /// The request body is a stream and cannot be sent a second time.
    #[error("request body is a stream and cannot be replayed")]
    UnreplayableBody,

    /// The caller's cancellation token fired first.
    #[error("request cancelled")]
    Cancelled,
}

impl TransportError {
    /// Wrap an executor failure.
    pub fn transport(err: impl Into<BoxError>) -> Self {
        TransportError::Transport(err.into())
    }

    /// Whether the server rate-limited us and the response could not be acted on.
    pub fn is_rate_limit(&self) -> bool {
        matches!(
            self,
            TransportError::MissingRetryAfter | TransportError::InvalidRetryAfter { .. }
        )
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError::Transport(Box::new(err))
    }
}

/// Why a `Retry-After` value could not be parsed.
#[derive(Debug, Error)]
pub enum RetryAfterError {
    #[error("header value is not visible ASCII")]
    NotAscii(#[from] ToStrError),
    #[error("header value is not a non-negative integer: {0}")]
    NotSeconds(#[from] ParseIntError),
}
