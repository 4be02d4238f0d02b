//! Resource descriptors: the registered templates nodes are built from.
//!
//! A descriptor declares how a resource may be navigated to from its parent
//! (an exact `children` map, or a single validated `child` factory), an
//! optional `init` hook run on each freshly constructed node, and the
//! capability table the resource exposes to handlers. Descriptors are
//! validated once at registration and shared read-only afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use traversal_core::{Capabilities, ResourceNode};

/// Validates a path segment before the single `child` factory accepts it.
pub type SegmentValidator = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Lifecycle hook run on a node right after construction, before the node
/// is shared with the rest of the request.
pub type InitHook = Arc<dyn Fn(&mut ResourceNode) + Send + Sync>;

/// A registered template describing one resource kind.
#[derive(Clone)]
pub struct ResourceDescriptor {
    pub(crate) id: String,
    pub(crate) children: HashMap<String, String>,
    pub(crate) child: Option<String>,
    pub(crate) validate: Option<SegmentValidator>,
    pub(crate) init: Option<InitHook>,
    pub(crate) caps: Capabilities,
}

impl ResourceDescriptor {
    /// Start a descriptor for the resource `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            children: HashMap::new(),
            child: None,
            validate: None,
            init: None,
            caps: Capabilities::new(),
        }
    }

    /// The resource id this descriptor registers.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Declare exact child mappings: literal segment → factory id.
    ///
    /// Consulted before the single `child` factory during descent.
    pub fn children<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.children
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Declare the single downward factory, usable for any segment the
    /// validator accepts.
    pub fn child(mut self, factory: impl Into<String>) -> Self {
        self.child = Some(factory.into());
        self
    }

    /// Replace the default segment validator (non-empty segment).
    pub fn validate<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.validate = Some(Arc::new(f));
        self
    }

    /// Run a hook on every node built from this descriptor.
    pub fn init<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut ResourceNode) + Send + Sync + 'static,
    {
        self.init = Some(Arc::new(f));
        self
    }

    /// Expose a named capability to handlers.
    pub fn capability<T: Send + Sync + 'static>(
        mut self,
        name: impl Into<String>,
        value: T,
    ) -> Self {
        self.caps.insert(name, value);
        self
    }

    /// Shape validation performed at registration time. Cross-references to
    /// other resource ids are checked later, at the build step, so
    /// descriptors may refer to resources registered after them.
    pub(crate) fn check_shape(&self) -> Result<(), String> {
        if self.id.is_empty() {
            return Err("resource id must be non-empty".into());
        }
        for segment in self.children.keys() {
            if segment.is_empty() {
                return Err("child segment keys must be non-empty".into());
            }
            if segment.contains('/') {
                return Err(format!("child segment key contains '/': {segment}"));
            }
        }
        Ok(())
    }
}
