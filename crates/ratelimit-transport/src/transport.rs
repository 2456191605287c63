//! Request executor abstraction.
//!
//! The [`Transport`] trait is the seam between request construction and the
//! network: it takes a fully-built [`Request`] and yields a raw [`Response`].
//! [`ReqwestTransport`] is the real implementation; the rate-limit decorator
//! both consumes and implements the trait, so it can be stacked or swapped in
//! wherever a plain transport is expected.

use crate::error::TransportError;
use crate::{DEFAULT_TIMEOUT, USER_AGENT};
use reqwest::{Request, Response};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed future returned by [`Transport::execute`].
pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Response, TransportError>> + Send + 'a>>;

/// Executes a fully-formed HTTP request.
pub trait Transport: Send + Sync {
    fn execute(&self, request: Request) -> TransportFuture<'_>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn execute(&self, request: Request) -> TransportFuture<'_> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&self, request: Request) -> TransportFuture<'_> {
        (**self).execute(request)
    }
}

/// Copy a request so the copy can be sent without touching the original.
///
/// Headers are deep-copied. A buffered body is shared: `reqwest` keeps it
/// in reference-counted `Bytes`, so the copy points at the same buffer.
/// A streaming body can only be read once and is refused with
/// [`TransportError::UnreplayableBody`].
pub fn clone_request(request: &Request) -> Result<Request, TransportError> {
    request.try_clone().ok_or(TransportError::UnreplayableBody)
}

// ── reqwest ────────────────────────────────────────────────────────

/// [`Transport`] backed by a [`reqwest::Client`].
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Use an existing client, keeping its pool, TLS and timeout settings.
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Build a client with the crate user agent and a 120s timeout.
    pub fn with_defaults() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(DEFAULT_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }

    /// The wrapped client, for building requests.
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

impl Transport for ReqwestTransport {
    fn execute(&self, request: Request) -> TransportFuture<'_> {
        Box::pin(async move {
            self.client
                .execute(request)
                .await
                .map_err(TransportError::from)
        })
    }
}
