//! The rate-limit decorator.
//!
//! [`RateLimitTransport`] forwards every request to an inner [`Transport`].
//! When the answer is `429 Too Many Requests` it reads `Retry-After`, waits
//! the delay its [`RateLimitConfig`] computes, and sends a fresh copy of the
//! request. There is no attempt cap: the loop ends when the server stops
//! answering 429, when the 429 carries no usable `Retry-After`, when the inner
//! transport fails, or when the caller's cancellation token fires.
//!
//! Waiting is an awaited timer, so only the task that owns the request is
//! held up; other requests on the same transport proceed.

use crate::config::RateLimitConfig;
use crate::error::TransportError;
use crate::retry_after::parse_retry_after;
use crate::transport::{ReqwestTransport, Transport, TransportFuture, clone_request};
use reqwest::{Request, Response, StatusCode};
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Transport decorator that waits out 429 responses and resends the request.
#[derive(Debug, Clone)]
pub struct RateLimitTransport<T> {
    inner: T,
    config: RateLimitConfig,
}

impl RateLimitTransport<ReqwestTransport> {
    /// Decorate a [`reqwest::Client`] with the default configuration.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self::new(ReqwestTransport::new(client))
    }
}

impl<T: Transport> RateLimitTransport<T> {
    /// Wrap `inner` with the default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, RateLimitConfig::default())
    }

    pub fn with_config(inner: T, config: RateLimitConfig) -> Self {
        Self { inner, config }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Send `request`, waiting out any rate limiting.
    ///
    /// The caller's request is only read: each attempt sends its own copy
    /// (see [`clone_request`]), so nothing the inner transport does to the
    /// copy is visible afterwards.
    pub fn send(
        &self,
        request: &Request,
    ) -> impl Future<Output = Result<Response, TransportError>> + Send + '_ {
        let template = clone_request(request);
        async move { self.run(template?, None).await }
    }

    /// Like [`send`](Self::send), but gives up with
    /// [`TransportError::Cancelled`] as soon as `cancel` fires, whether an
    /// attempt is in flight or a wait is pending.
    pub fn send_with_cancel<'a>(
        &'a self,
        request: &Request,
        cancel: &'a CancellationToken,
    ) -> impl Future<Output = Result<Response, TransportError>> + Send + 'a {
        let template = clone_request(request);
        async move { self.run(template?, Some(cancel)).await }
    }

    async fn run(
        &self,
        template: Request,
        cancel: Option<&CancellationToken>,
    ) -> Result<Response, TransportError> {
        let mut attempt: u32 = 0;
        loop {
            attempt = attempt.saturating_add(1);
            let request = clone_request(&template)?;
            debug!(attempt, method = %request.method(), url = %request.url(), "sending request");

            let response = until_cancelled(cancel, self.inner.execute(request)).await??;
            let status = response.status();
            if status != StatusCode::TOO_MANY_REQUESTS {
                debug!(attempt, status = status.as_u16(), "request completed");
                return Ok(response);
            }

            let retry_after = match parse_retry_after(response.headers()) {
                Ok(secs) => secs,
                Err(e) => {
                    warn!(attempt, url = %template.url(), "rate limited: {e}");
                    return Err(e);
                }
            };
            // Release the connection before waiting.
            drop(response);

            let delay = self.config.delay_for(retry_after);
            info!(
                attempt,
                retry_after,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "Sleeping for {delay:?}"
            );
            until_cancelled(cancel, tokio::time::sleep(delay)).await?;
        }
    }
}

impl<T: Transport> Transport for RateLimitTransport<T> {
    fn execute(&self, request: Request) -> TransportFuture<'_> {
        Box::pin(async move { self.run(request, None).await })
    }
}

/// Drive `fut` to completion unless `cancel` fires first.
async fn until_cancelled<F: Future>(
    cancel: Option<&CancellationToken>,
    fut: F,
) -> Result<F::Output, TransportError> {
    match cancel {
        Some(token) => tokio::select! {
            biased;
            () = token.cancelled() => Err(TransportError::Cancelled),
            out = fut => Ok(out),
        },
        None => Ok(fut.await),
    }
}
