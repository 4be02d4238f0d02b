//! The handler contract and the continuation that drives a chain.
//!
//! Handlers execute strictly in the order the chain registry computed. Each
//! handler receives the request context and a [`Next`] continuation; it may
//! drive the continuation to hand control to the rest of the chain, or
//! finish the response itself and return [`Flow::Handled`] without doing so.
//! `Next` is consumed by value, so "invoke at most once" is enforced by
//! move semantics rather than by convention.
//!
//! The last handler's continuation is empty: driving it yields
//! [`Flow::Unhandled`], the host's own fall-through, so even a terminal
//! handler can decline to finish the response.
//!
//! # Static vs dynamic dispatch
//!
//! [`Handler`] uses native `async fn`-style returns for zero-cost static
//! dispatch. Chains store handlers type-erased as [`DynHandler`]; any
//! `Handler` converts automatically through the blanket impl.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::context::RequestContext;
use crate::error::BoxError;

/// What a handler chain produced for the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// The response was produced; the request is finished.
    Handled,
    /// Nothing produced a response; the host's not-found path applies.
    Unhandled,
}

/// One step of a handler chain.
pub trait Handler<X: Send>: Send + Sync + 'static {
    /// Handle the request, or drive `next` to pass it along the chain.
    ///
    /// Errors are not interpreted by the engine; they propagate to the host
    /// unchanged.
    fn handle(
        &self,
        cx: &mut RequestContext<X>,
        next: Next<'_, X>,
    ) -> impl Future<Output = Result<Flow, BoxError>> + Send;
}

/// Object-safe version of [`Handler`] for storage in chain tables.
pub trait DynHandler<X: Send>: Send + Sync + 'static {
    /// Called by [`Next::run`] (dynamic dispatch version of
    /// [`Handler::handle`]).
    fn handle_dyn<'a>(
        &'a self,
        cx: &'a mut RequestContext<X>,
        next: Next<'a, X>,
    ) -> BoxFuture<'a, Result<Flow, BoxError>>;
}

// Blanket implementation: any Handler is usable where a DynHandler is kept.
impl<X, T> DynHandler<X> for T
where
    X: Send + 'static,
    T: Handler<X>,
{
    fn handle_dyn<'a>(
        &'a self,
        cx: &'a mut RequestContext<X>,
        next: Next<'a, X>,
    ) -> BoxFuture<'a, Result<Flow, BoxError>> {
        Box::pin(self.handle(cx, next))
    }
}

/// Erase a handler for registration in a chain.
pub fn boxed<X, H>(handler: H) -> Arc<dyn DynHandler<X>>
where
    X: Send + 'static,
    H: Handler<X>,
{
    Arc::new(handler)
}

/// The continuation a handler drives to reach the rest of its chain.
///
/// A cursor over the ordered handler slice: [`Next::run`] invokes the next
/// handler with a continuation over the remainder, and an exhausted cursor
/// resolves to [`Flow::Unhandled`].
pub struct Next<'a, X: Send> {
    rest: &'a [Arc<dyn DynHandler<X>>],
}

impl<'a, X: Send + 'static> Next<'a, X> {
    /// A continuation over an ordered handler list. Created by the dispatch
    /// pipeline; handlers only ever consume one.
    pub fn new(rest: &'a [Arc<dyn DynHandler<X>>]) -> Self {
        Self { rest }
    }

    /// Hand the request to the rest of the chain.
    pub async fn run(self, cx: &mut RequestContext<X>) -> Result<Flow, BoxError> {
        match self.rest.split_first() {
            Some((head, rest)) => head.handle_dyn(cx, Next { rest }).await,
            None => Ok(Flow::Unhandled),
        }
    }

    /// How many handlers remain past this continuation.
    pub fn remaining(&self) -> usize {
        self.rest.len()
    }
}

/// Wraps a closure returning a boxed future as a [`Handler`].
///
/// ```rust,ignore
/// let guard = handler_fn(|cx: &mut RequestContext<MyExchange>, next| {
///     Box::pin(async move {
///         // inspect cx, then continue the chain
///         next.run(cx).await
///     })
/// });
/// ```
pub struct HandlerFn<F>(F);

/// Build a [`HandlerFn`] from a closure.
pub fn handler_fn<F>(f: F) -> HandlerFn<F> {
    HandlerFn(f)
}

impl<X, F> Handler<X> for HandlerFn<F>
where
    X: Send + 'static,
    F: for<'a> Fn(
            &'a mut RequestContext<X>,
            Next<'a, X>,
        ) -> BoxFuture<'a, Result<Flow, BoxError>>
        + Send
        + Sync
        + 'static,
{
    fn handle(
        &self,
        cx: &mut RequestContext<X>,
        next: Next<'_, X>,
    ) -> impl Future<Output = Result<Flow, BoxError>> + Send {
        async move { (self.0)(cx, next).await }
    }
}
