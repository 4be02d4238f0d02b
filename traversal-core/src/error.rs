//! Error types for traversal.
//!
//! Configuration errors are surfaced synchronously by the builder API and
//! never deferred to request time: every resource id referenced as root,
//! chain target, or ancestor selector is checked before serving begins.
//!
//! Request-time has no error of its own — a request nothing matches is the
//! defined [`Unhandled`] outcome, and errors raised by handlers propagate to
//! the host as opaque [`BoxError`] values, untranslated.
//!
//! [`Unhandled`]: crate::Flow::Unhandled

use thiserror::Error;

/// A boxed error type carried through handler chains to the host.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised during the configuration phase, before serving starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A resource id was registered twice. Re-registration is always an
    /// error; descriptors are never silently overwritten.
    #[error("resource already registered: {0}")]
    DuplicateResource(String),

    /// A resource id was referenced but never registered.
    #[error("there is no registered resource: {0}")]
    UnknownResource(String),

    /// A descriptor failed shape validation.
    #[error("invalid descriptor for resource {id}: {reason}")]
    InvalidDescriptor {
        /// The offending resource id.
        id: String,
        /// Why the descriptor was rejected.
        reason: String,
    },

    /// A handler chain was registered with no handlers in it.
    #[error("a handler chain requires at least one handler")]
    EmptyHandlerChain,

    /// A chain was registered, or the router built, before a root resource
    /// was set.
    #[error("root resource has not been set yet")]
    RootNotSet,
}
