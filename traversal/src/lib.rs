//! # traversal
//!
//! Resource-tree path resolution and specificity-matched handler dispatch.
//!
//! A request's path is walked segment by segment against a registry of
//! resource factories, producing a per-request chain of
//! [`ResourceNode`] values that stops at the first unresolved segment.
//! Handler chains registered against the matched node's resource id are
//! then selected by a four-dimensional specificity match —
//! `ancestor → name → verb → flavor` — and executed in registration order
//! under a continuation contract.
//!
//! # Phases
//!
//! Configuration and serving are separated by construction. A
//! [`RouterBuilder`] accepts resources ([`ResourceDescriptor`]), a root,
//! and handler chains, failing fast on unknown ids, duplicates, and empty
//! chains; [`RouterBuilder::build`] verifies the remaining cross-references
//! and freezes everything into a [`Router`]. The router is read-only, so
//! concurrent dispatch needs no locking, while the nodes each request
//! builds are owned by that request alone.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut builder = RouterBuilder::new();
//! builder.register_resource(
//!     ResourceDescriptor::new("rootResource").children([("users", "usersResource")]),
//! )?;
//! builder.register_resource(
//!     ResourceDescriptor::new("usersResource").child("userResource"),
//! )?;
//! builder.register_resource(ResourceDescriptor::new("userResource"))?;
//! builder.set_root("rootResource")?;
//! builder.register_chain(
//!     "userResource",
//!     Selector::new(),
//!     ChainKind::Terminal,
//!     [boxed(ShowUser)],
//! )?;
//! let router = builder.build()?;
//!
//! // per request, from the host:
//! match router.dispatch(exchange).await? {
//!     Outcome::Handled(_) => {}
//!     Outcome::Unhandled(exchange) => host_not_found(exchange),
//! }
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod chain;
mod descriptor;
mod dispatch;
mod registry;
mod resolve;
pub mod testing;

// Re-exports
pub use chain::ChainKind;
pub use descriptor::{InitHook, ResourceDescriptor, SegmentValidator};
pub use dispatch::Outcome;
pub use registry::{Router, RouterBuilder};
pub use resolve::Resolution;

pub use traversal_core::{
    BoxError, Capabilities, ConfigError, Dim, DynHandler, Flow, Handler, HandlerFn, INDEX_NAME,
    Next, RequestContext, RequestHead, RequestKey, ResourceNode, Selector, Verb, boxed,
    handler_fn, is_xhr,
};
