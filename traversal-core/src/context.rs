//! The host request boundary and the per-request context.
//!
//! The engine never touches a transport. The host hands it anything
//! implementing [`RequestHead`] — enough surface to read the method, the
//! path, and a header — and the engine threads that exchange value, by
//! ownership, through the handler chain inside a [`RequestContext`].

use std::sync::Arc;

use crate::node::ResourceNode;
use crate::selector::Verb;

/// The slice of a host request the engine needs to dispatch it.
///
/// `header` lookups are expected to be case-insensitive on the header name;
/// hosts with case-sensitive maps should normalize before implementing.
pub trait RequestHead {
    /// The HTTP method, in any case.
    fn method(&self) -> &str;

    /// The request path, `/`-delimited.
    fn path(&self) -> &str;

    /// A header value by name, if present.
    fn header(&self, name: &str) -> Option<&str>;
}

/// Whether the request looks XHR-like: `X-Requested-With` equal to
/// `xmlhttprequest`, compared case-insensitively. An absent header is
/// never XHR.
pub fn is_xhr<R: RequestHead + ?Sized>(req: &R) -> bool {
    req.header("x-requested-with")
        .or_else(|| req.header("X-Requested-With"))
        .is_some_and(|v| v.eq_ignore_ascii_case("xmlhttprequest"))
}

/// Request-scoped state handed to every handler in a matched chain.
///
/// Owns the host exchange for the duration of the chain; the dispatch
/// pipeline returns it to the host when the chain ends unhandled.
pub struct RequestContext<X> {
    /// The host's request/response exchange.
    pub exchange: X,
    /// The matched resource node.
    pub resource: Arc<ResourceNode>,
    /// The segment resolution could not consume, if any.
    pub name: Option<String>,
    /// Path segments past the unresolved one, order preserved, untouched.
    pub subpath: Vec<String>,
    /// The request method, case-normalized.
    pub verb: Verb,
    /// Whether the client looks XHR-like.
    pub xhr: bool,
}

impl<X> RequestContext<X> {
    /// Nearest ancestor of the matched node with the given resource id.
    pub fn traverse_to(&self, id: &str) -> Option<Arc<ResourceNode>> {
        self.resource.traverse_to(id)
    }

    /// Absolute path of the matched node.
    pub fn resource_url(&self) -> String {
        self.resource.url()
    }

    /// Absolute path of the matched node with one extra segment appended.
    pub fn resource_url_with(&self, extra: &str) -> String {
        self.resource.url_with(extra)
    }
}
