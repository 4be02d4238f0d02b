//! The dispatch pipeline: resolve, match, run the chain, or hand back.
//!
//! `dispatch` is the once-per-request entry point a host awaits. The engine
//! schedules nothing itself; suspension only happens inside handlers, and a
//! handler that neither completes the response nor drives its continuation
//! stalls the request — a caller obligation the engine cannot police.

use traversal_core::{BoxError, Flow, Next, RequestContext, RequestHead, Verb, is_xhr};

use crate::registry::Router;

/// How a dispatched request ended. Both arms return the host exchange so
/// the host can keep writing to it.
#[derive(Debug)]
pub enum Outcome<X> {
    /// A handler produced the response.
    Handled(X),
    /// No chain matched, or the chain fell through; the host must treat
    /// this exactly like an unrouted request (typically not-found).
    Unhandled(X),
}

impl<X> Outcome<X> {
    /// Whether a handler produced the response.
    pub fn is_handled(&self) -> bool {
        matches!(self, Outcome::Handled(_))
    }

    /// Recover the host exchange.
    pub fn into_exchange(self) -> X {
        match self {
            Outcome::Handled(x) | Outcome::Unhandled(x) => x,
        }
    }
}

impl<X: RequestHead + Send + 'static> Router<X> {
    /// Dispatch one request.
    ///
    /// Resolves the path, computes the ordered handler list for the matched
    /// node's selector key, and runs it under the continuation contract. An
    /// empty list returns [`Outcome::Unhandled`] with no other side effect.
    /// Handler errors propagate unchanged.
    pub async fn dispatch(&self, exchange: X) -> Result<Outcome<X>, BoxError> {
        let verb = Verb::new(exchange.method());
        let flavor = is_xhr(&exchange);
        tracing::debug!(verb = %verb, path = exchange.path(), flavor, "dispatching");

        let resolution = self.resolve(exchange.path());
        let key = resolution.request_key(verb.clone(), flavor);
        let handlers = match self.chains.get(resolution.node().id()) {
            Some(table) => table.matched(&key),
            None => Vec::new(),
        };

        if handlers.is_empty() {
            tracing::debug!(
                resource = resolution.node().id(),
                name = %key.name,
                "no chain matched, deferring to host"
            );
            return Ok(Outcome::Unhandled(exchange));
        }

        let (resource, name, subpath) = resolution.into_parts();
        let mut cx = RequestContext {
            exchange,
            resource,
            name,
            subpath,
            verb,
            xhr: flavor,
        };
        match Next::new(&handlers).run(&mut cx).await? {
            Flow::Handled => Ok(Outcome::Handled(cx.exchange)),
            Flow::Unhandled => Ok(Outcome::Unhandled(cx.exchange)),
        }
    }
}
