//! Shared helpers for the integration tests: a scripted transport and a
//! tracing layer that records log messages.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};

use ratelimit_transport::{Transport, TransportError, TransportFuture};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Method, Request, Response, Url};
use tracing::Subscriber;
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context, Layer};

/// One scripted answer from [`ScriptedTransport`].
#[derive(Debug, Clone)]
pub enum Reply {
    /// Respond with this status and an optional `Retry-After` value.
    Status(u16, Option<&'static str>),
    /// Fail with a connection error carrying this message.
    Fail(&'static str),
}

/// Transport that plays back a script and records every request it sees.
///
/// Once the script runs out it answers 200. It also scribbles a header onto
/// each request it receives, so tests can check the caller never sees it.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Reply>>,
    seen: Mutex<Vec<HeaderMap>>,
}

impl ScriptedTransport {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(replies.into_iter().collect()),
            seen: Mutex::new(Vec::new()),
        })
    }

    /// Number of requests received.
    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    /// Headers of each received request, as they arrived.
    pub fn seen(&self) -> Vec<HeaderMap> {
        self.seen.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    fn execute(&self, mut request: Request) -> TransportFuture<'_> {
        // Record on first poll so a request abandoned before it is sent
        // doesn't count as a call.
        Box::pin(async move {
            self.seen.lock().unwrap().push(request.headers().clone());
            request
                .headers_mut()
                .insert("x-touched-by-transport", "yes".parse().unwrap());

            let reply = self.script.lock().unwrap().pop_front();
            match reply.unwrap_or(Reply::Status(200, None)) {
                Reply::Status(status, retry_after) => Ok(response(status, retry_after)),
                Reply::Fail(message) => Err(TransportError::transport(std::io::Error::new(
                    std::io::ErrorKind::ConnectionReset,
                    message,
                ))),
            }
        })
    }
}

pub fn response(status: u16, retry_after: Option<&str>) -> Response {
    let mut builder = http::Response::builder().status(status);
    if let Some(value) = retry_after {
        builder = builder.header(RETRY_AFTER, value);
    }
    Response::from(builder.body(format!("status {status}")).unwrap())
}

pub fn get(url: &str) -> Request {
    let mut request = Request::new(Method::GET, Url::parse(url).unwrap());
    request
        .headers_mut()
        .insert("authorization", "Bearer caller-token".parse().unwrap());
    request
}

// ── Log capture ─────────────────────────────────────────────────────

/// Layer that keeps the message of every event it sees.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<String>>>);

impl CapturedLogs {
    pub fn messages(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count_containing(&self, needle: &str) -> usize {
        self.messages().iter().filter(|m| m.contains(needle)).count()
    }
}

impl<S: Subscriber> Layer<S> for CapturedLogs {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        if let Ok(mut buf) = self.0.lock() {
            buf.push(visitor.message);
        }
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}
