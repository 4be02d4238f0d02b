//! Testing utilities for traversal.
//!
//! - [`MockExchange`]: a scripted request/response pair standing in for a
//!   host transport
//! - [`RecordingHandler`]: a pre-style handler that logs its label into the
//!   exchange trace and continues the chain
//! - [`RespondingHandler`]: a terminal-style handler that writes a body and
//!   finishes the request
//! - [`CountingHandler`]: counts invocations across any exchange type

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use traversal_core::{BoxError, Flow, Handler, Next, RequestContext, RequestHead};

/// A minimal in-memory exchange for driving the engine in tests.
#[derive(Debug)]
pub struct MockExchange {
    method: String,
    path: String,
    headers: Vec<(String, String)>,
    /// Response body written by handlers.
    pub body: String,
    /// Free-form execution trace handlers append to.
    pub trace: Vec<String>,
}

impl MockExchange {
    /// A scripted request with no headers.
    pub fn new(method: &str, path: &str) -> Self {
        Self {
            method: method.to_string(),
            path: path.to_string(),
            headers: Vec::new(),
            body: String::new(),
            trace: Vec::new(),
        }
    }

    /// Add a request header.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Mark this request XHR-like.
    pub fn xhr(self) -> Self {
        self.with_header("X-Requested-With", "XMLHttpRequest")
    }
}

impl RequestHead for MockExchange {
    fn method(&self) -> &str {
        &self.method
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Appends its label to the exchange trace, then continues the chain.
pub struct RecordingHandler {
    label: String,
}

impl RecordingHandler {
    /// A recording handler tagged with `label`.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl Handler<MockExchange> for RecordingHandler {
    async fn handle(
        &self,
        cx: &mut RequestContext<MockExchange>,
        next: Next<'_, MockExchange>,
    ) -> Result<Flow, BoxError> {
        cx.exchange.trace.push(self.label.clone());
        next.run(cx).await
    }
}

/// Writes a body into the exchange and finishes the request.
pub struct RespondingHandler {
    body: String,
}

impl RespondingHandler {
    /// A terminal handler that responds with `body`.
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}

impl Handler<MockExchange> for RespondingHandler {
    async fn handle(
        &self,
        cx: &mut RequestContext<MockExchange>,
        _next: Next<'_, MockExchange>,
    ) -> Result<Flow, BoxError> {
        cx.exchange.body.push_str(&self.body);
        Ok(Flow::Handled)
    }
}

/// Counts how many times it ran, then continues the chain.
pub struct CountingHandler {
    count: Arc<AtomicUsize>,
}

impl CountingHandler {
    /// A fresh counter at zero.
    pub fn new() -> Self {
        Self {
            count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// The current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl Default for CountingHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for CountingHandler {
    fn clone(&self) -> Self {
        Self {
            count: self.count.clone(),
        }
    }
}

impl<X: Send + 'static> Handler<X> for CountingHandler {
    async fn handle(
        &self,
        cx: &mut RequestContext<X>,
        next: Next<'_, X>,
    ) -> Result<Flow, BoxError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        next.run(cx).await
    }
}
