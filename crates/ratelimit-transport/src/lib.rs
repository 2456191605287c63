//! HTTP transport decorator that waits out rate limiting.
//!
//! `ratelimit-transport` wraps any request executor in a
//! [`RateLimitTransport`]. Every request goes through unchanged until the
//! server answers `429 Too Many Requests`; the decorator then reads the
//! `Retry-After` header, waits the delay its [`SleepPolicy`] derives from it,
//! and sends the request again. It keeps doing so until the server answers
//! with anything other than 429.
//!
//! # Getting started
//!
//! ```ignore
//! use ratelimit_transport::{RateLimitConfig, RateLimitTransport, ReqwestTransport, SleepPolicy};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ratelimit_transport::TransportError> {
//!     let config = RateLimitConfig::default().with_policy(SleepPolicy::Exact);
//!     let transport = RateLimitTransport::with_config(ReqwestTransport::with_defaults()?, config);
//!
//!     let request = transport
//!         .inner()
//!         .client()
//!         .get("https://api.example.com/v1/me")
//!         .bearer_auth("token")
//!         .build()?;
//!
//!     let response = transport.send(&request).await?;
//!     println!("{}", response.status());
//!     Ok(())
//! }
//! ```
//!
//! # Where to find things
//!
//! - **The decorator:** [`RateLimitTransport`] in [`rate_limit`]. Use
//!   [`send`](RateLimitTransport::send) for the plain contract or
//!   [`send_with_cancel`](RateLimitTransport::send_with_cancel) to abort a
//!   pending wait.
//! - **Plugging in an executor:** the [`Transport`] trait and the
//!   [`ReqwestTransport`] adapter in [`transport`].
//! - **Wait computation:** [`RateLimitConfig`] and [`SleepPolicy`] in [`config`].
//! - **Header parsing:** [`parse_retry_after`] in [`retry_after`].
//! - **Failures:** [`TransportError`] in [`error`].
//!
//! The crate never installs a tracing subscriber. The decorator reports each
//! wait as an `info` event and each attempt as a `debug` event; install
//! whatever subscriber the host application already uses to see them.

pub mod config;
pub mod error;
pub mod rate_limit;
pub mod retry_after;
pub mod transport;

use std::time::Duration;

pub use config::{RateLimitConfig, SleepPolicy};
pub use error::{BoxError, RetryAfterError, TransportError};
pub use rate_limit::RateLimitTransport;
pub use retry_after::parse_retry_after;
pub use transport::{ReqwestTransport, Transport, TransportFuture, clone_request};

// Re-export the cancellation token so callers don't need a direct tokio-util dependency.
pub use tokio_util::sync::CancellationToken;

// ── Constants ──────────────────────────────────────────────────────

/// User agent sent by [`ReqwestTransport::with_defaults`].
pub const USER_AGENT: &str = concat!("ratelimit-transport/", env!("CARGO_PKG_VERSION"));

/// Request timeout applied by [`ReqwestTransport::with_defaults`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
