//! The configuration phase: resource registration, root selection, chain
//! registration, and the freeze into an immutable [`Router`].
//!
//! A [`RouterBuilder`] replaces the original design's global mutable
//! registry: configuration is an explicit value, `build()` marks the
//! boundary between the configuration phase and serving, and tests get
//! isolation by constructing a fresh builder instead of resetting shared
//! state.
//!
//! Checks are as eager as registration order allows. Duplicate ids,
//! malformed descriptors, empty handler lists, unknown chain targets, and
//! unknown ancestor selector ids fail at the registration call. `children`
//! and `child` factory references may point forward to resources registered
//! later, so those are verified at `build()` — still strictly before any
//! request is served.

use std::collections::HashMap;
use std::sync::Arc;

use traversal_core::{Capabilities, ConfigError, Dim, DynHandler, Selector};

use crate::chain::{ChainKind, ChainTable};
use crate::descriptor::{InitHook, ResourceDescriptor, SegmentValidator};

/// A registered resource in its serving-time form: descriptor fields with
/// the capability table shared for cheap per-node handout.
pub(crate) struct Factory {
    pub(crate) children: HashMap<String, String>,
    pub(crate) child: Option<String>,
    pub(crate) validate: Option<SegmentValidator>,
    pub(crate) init: Option<InitHook>,
    pub(crate) caps: Arc<Capabilities>,
}

impl Factory {
    fn new(descriptor: ResourceDescriptor) -> Self {
        Self {
            children: descriptor.children,
            child: descriptor.child,
            validate: descriptor.validate,
            init: descriptor.init,
            caps: Arc::new(descriptor.caps),
        }
    }
}

/// Collects resources and chains, then freezes them into a [`Router`].
pub struct RouterBuilder<X: Send> {
    resources: HashMap<String, Factory>,
    chains: HashMap<String, ChainTable<X>>,
    root: Option<String>,
}

impl<X: Send + 'static> Default for RouterBuilder<X> {
    fn default() -> Self {
        Self::new()
    }
}

impl<X: Send + 'static> RouterBuilder<X> {
    /// An empty builder.
    pub fn new() -> Self {
        Self {
            resources: HashMap::new(),
            chains: HashMap::new(),
            root: None,
        }
    }

    /// Register a resource descriptor under its id.
    ///
    /// Fails with [`ConfigError::DuplicateResource`] when the id is taken
    /// and [`ConfigError::InvalidDescriptor`] when the descriptor is
    /// malformed. Registration never overwrites.
    pub fn register_resource(&mut self, descriptor: ResourceDescriptor) -> Result<(), ConfigError> {
        descriptor
            .check_shape()
            .map_err(|reason| ConfigError::InvalidDescriptor {
                id: descriptor.id().to_string(),
                reason,
            })?;
        let id = descriptor.id().to_string();
        if self.resources.contains_key(&id) {
            return Err(ConfigError::DuplicateResource(id));
        }
        self.resources.insert(id, Factory::new(descriptor));
        Ok(())
    }

    /// Select the resource the resolver starts every walk from.
    pub fn set_root(&mut self, id: &str) -> Result<(), ConfigError> {
        self.check_resource(id)?;
        self.root = Some(id.to_string());
        Ok(())
    }

    /// Register a handler chain for `resource` at `selector`.
    ///
    /// Requires the root to be set first and the resource (and any exact
    /// ancestor in the selector) to be registered already; an empty handler
    /// list fails with [`ConfigError::EmptyHandlerChain`].
    pub fn register_chain(
        &mut self,
        resource: &str,
        selector: Selector,
        kind: ChainKind,
        handlers: impl IntoIterator<Item = Arc<dyn DynHandler<X>>>,
    ) -> Result<(), ConfigError> {
        if self.root.is_none() {
            return Err(ConfigError::RootNotSet);
        }
        self.check_resource(resource)?;
        if let Dim::Is(ancestor) = &selector.ancestor {
            self.check_resource(ancestor)?;
        }
        let handlers: Vec<Arc<dyn DynHandler<X>>> = handlers.into_iter().collect();
        if handlers.is_empty() {
            return Err(ConfigError::EmptyHandlerChain);
        }
        self.chains
            .entry(resource.to_string())
            .or_default()
            .register(kind, selector, handlers);
        Ok(())
    }

    /// Verify all cross-references and freeze the configuration into an
    /// immutable, concurrently shareable [`Router`].
    pub fn build(self) -> Result<Router<X>, ConfigError> {
        let root = self.root.ok_or(ConfigError::RootNotSet)?;
        for factory in self.resources.values() {
            for target in factory.children.values() {
                if !self.resources.contains_key(target) {
                    return Err(ConfigError::UnknownResource(target.clone()));
                }
            }
            if let Some(target) = &factory.child {
                if !self.resources.contains_key(target) {
                    return Err(ConfigError::UnknownResource(target.clone()));
                }
            }
        }
        Ok(Router {
            resources: self.resources,
            chains: self.chains,
            root,
        })
    }

    fn check_resource(&self, id: &str) -> Result<(), ConfigError> {
        if self.resources.contains_key(id) {
            Ok(())
        } else {
            Err(ConfigError::UnknownResource(id.to_string()))
        }
    }
}

/// The frozen engine: read-only after [`RouterBuilder::build`], safe to
/// share across concurrently served requests without locking.
pub struct Router<X: Send> {
    pub(crate) resources: HashMap<String, Factory>,
    pub(crate) chains: HashMap<String, ChainTable<X>>,
    pub(crate) root: String,
}

impl<X: Send> std::fmt::Debug for Router<X> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl<X: Send + 'static> Router<X> {
    /// The root resource id.
    pub fn root_id(&self) -> &str {
        &self.root
    }

    /// Whether a resource id is registered.
    pub fn has_resource(&self, id: &str) -> bool {
        self.resources.contains_key(id)
    }

    /// A registered resource's capability table.
    pub fn capabilities(&self, id: &str) -> Option<&Capabilities> {
        self.resources.get(id).map(|f| f.caps.as_ref())
    }
}
