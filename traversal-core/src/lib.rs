//! # traversal-core
//!
//! Core types and traits for the traversal dispatch engine.
//!
//! This crate has minimal dependencies and is the surface that handlers and
//! host adapters import; the engine itself — descriptors, the router
//! builder, the resolver, and the chain registry — lives in the `traversal`
//! crate.
//!
//! # Model
//!
//! An incoming request's path is resolved into a tree of per-request
//! [`ResourceNode`] values, deepest node matched. Handler chains are
//! registered against a four-dimensional [`Selector`]
//! (ancestor, name, verb, flavor) where every dimension is an exact value or
//! the wildcard, and the engine computes, per request, the ordered handler
//! list covering that request's [`RequestKey`]. Handlers run under a
//! continuation contract: each receives a [`Next`] it may drive at most
//! once, and a chain that never produces a response resolves to
//! [`Flow::Unhandled`] — the host's not-found path, never an engine error.
//!
//! # Error Types
//!
//! - [`ConfigError`] — configuration-phase failures, surfaced eagerly
//! - [`BoxError`] — opaque handler errors, passed through to the host

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod context;
mod error;
mod handler;
mod node;
mod selector;

// Re-exports
pub use context::{RequestContext, RequestHead, is_xhr};
pub use error::{BoxError, ConfigError};
pub use handler::{DynHandler, Flow, Handler, HandlerFn, Next, boxed, handler_fn};
pub use node::{Capabilities, ResourceNode};
pub use selector::{Dim, INDEX_NAME, RequestKey, Selector, Verb};
