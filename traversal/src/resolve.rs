//! The resource tree resolver: path segments in, node chain out.
//!
//! Resolution walks `/`-split segments (empty segments from leading,
//! trailing, or doubled slashes are discarded) downward from the root,
//! descending through the exact `children` map first and the validated
//! single `child` factory second. The walk never fails: it stops at the
//! first segment no factory accepts, and that node becomes the match with
//! the failing segment as its logical `name` and the remainder, order
//! preserved, as its `subpath`.

use std::sync::Arc;

use traversal_core::{INDEX_NAME, RequestKey, ResourceNode, Verb};

use crate::registry::Router;

/// The outcome of resolving one request path.
pub struct Resolution {
    node: Arc<ResourceNode>,
    name: Option<String>,
    subpath: Vec<String>,
}

impl Resolution {
    /// The matched node: the deepest fully resolved node, or the deepest
    /// resolved ancestor of an unresolved remainder.
    pub fn node(&self) -> &Arc<ResourceNode> {
        &self.node
    }

    /// The first segment descent could not consume, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Segments past the unresolved one, unmodified.
    pub fn subpath(&self) -> &[String] {
        &self.subpath
    }

    /// Reduce to the four-dimensional key the chain registry matches on.
    pub(crate) fn request_key(&self, verb: Verb, flavor: bool) -> RequestKey {
        RequestKey {
            ancestor: self.node.parent().map(|p| p.id().to_string()),
            name: self
                .name
                .clone()
                .unwrap_or_else(|| INDEX_NAME.to_string()),
            verb,
            flavor,
        }
    }

    pub(crate) fn into_parts(self) -> (Arc<ResourceNode>, Option<String>, Vec<String>) {
        (self.node, self.name, self.subpath)
    }
}

impl<X: Send + 'static> Router<X> {
    /// Resolve a request path against the resource tree.
    ///
    /// A path of only separators yields the root node with no name and no
    /// subpath; this is never an error.
    pub fn resolve(&self, path: &str) -> Resolution {
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let mut node = self.instantiate(&self.root, None, None);

        while let Some(segment) = segments.next() {
            match self.descend(&node, segment) {
                Some(child) => {
                    tracing::trace!(segment, resource = child.id(), "descended");
                    node = child;
                }
                None => {
                    let subpath: Vec<String> = segments.map(str::to_string).collect();
                    tracing::trace!(
                        segment,
                        resource = node.id(),
                        "descent stopped, segment becomes logical name"
                    );
                    return Resolution {
                        node,
                        name: Some(segment.to_string()),
                        subpath,
                    };
                }
            }
        }

        Resolution {
            node,
            name: None,
            subpath: Vec::new(),
        }
    }

    /// One downward step: the exact `children` entry for the segment, else
    /// the single `child` factory when its validator accepts the segment.
    fn descend(&self, node: &Arc<ResourceNode>, segment: &str) -> Option<Arc<ResourceNode>> {
        let factory = &self.resources[node.id()];
        let target = if let Some(id) = factory.children.get(segment) {
            id
        } else if let Some(id) = &factory.child {
            let accepted = match &factory.validate {
                Some(validate) => validate(segment),
                None => !segment.is_empty(),
            };
            if !accepted {
                return None;
            }
            id
        } else {
            return None;
        };
        Some(self.instantiate(target, Some(segment.to_string()), Some(Arc::clone(node))))
    }

    fn instantiate(
        &self,
        id: &str,
        key: Option<String>,
        parent: Option<Arc<ResourceNode>>,
    ) -> Arc<ResourceNode> {
        // Factory presence is guaranteed by build-time reference checks.
        let factory = &self.resources[id];
        let mut node = ResourceNode::new(id, key, parent, Arc::clone(&factory.caps));
        if let Some(init) = &factory.init {
            init(&mut node);
        }
        Arc::new(node)
    }
}
