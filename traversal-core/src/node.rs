//! Per-request resource nodes and their capability tables.
//!
//! A [`ResourceNode`] is instantiated by the resolver for each path segment
//! it consumes. Nodes are owned by the single request that produced them —
//! they are never cached or shared across requests — and each non-root node
//! holds exactly one upward [`Arc`] to its parent, so the ancestor chain is
//! acyclic and bounded by the path length.
//!
//! Capabilities replace the original design's prototype-copied attributes:
//! an explicit name → value table where values are `Any`-typed and recovered
//! by downcast at the lookup site, not injected as loose properties.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A named table of `Any`-typed values a resource exposes to handlers.
///
/// Entries may be plain data or callables (any `Send + Sync` type works,
/// including `Arc<dyn Fn(..)>` values); handlers recover the concrete type
/// with [`Capabilities::get`].
#[derive(Default, Clone)]
pub struct Capabilities {
    entries: HashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl Capabilities {
    /// An empty capability table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a capability under `name`, replacing any previous entry.
    pub fn insert<T: Send + Sync + 'static>(&mut self, name: impl Into<String>, value: T) {
        self.entries.insert(name.into(), Arc::new(value));
    }

    /// Look up a capability and downcast it to `T`.
    pub fn get<T: 'static>(&self, name: &str) -> Option<&T> {
        self.entries.get(name).and_then(|v| v.downcast_ref::<T>())
    }

    /// Look up a capability as a shared handle.
    pub fn get_arc<T: Send + Sync + 'static>(&self, name: &str) -> Option<Arc<T>> {
        self.entries
            .get(name)
            .and_then(|v| Arc::clone(v).downcast::<T>().ok())
    }

    /// Whether a capability with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of entries in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

/// One node of the per-request resource tree.
pub struct ResourceNode {
    id: String,
    key: Option<String>,
    parent: Option<Arc<ResourceNode>>,
    caps: Arc<Capabilities>,
    locals: Capabilities,
}

impl ResourceNode {
    /// Construct a node. Called by the resolver; `key` is the literal path
    /// segment that produced the node and is absent only for the root.
    pub fn new(
        id: impl Into<String>,
        key: Option<String>,
        parent: Option<Arc<ResourceNode>>,
        caps: Arc<Capabilities>,
    ) -> Self {
        Self {
            id: id.into(),
            key,
            parent,
            caps,
            locals: Capabilities::new(),
        }
    }

    /// The resource id this node was instantiated from.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The literal path segment that produced this node.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// The parent node; `None` at the root.
    pub fn parent(&self) -> Option<&Arc<ResourceNode>> {
        self.parent.as_ref()
    }

    /// Look up a capability, preferring per-node locals over the
    /// descriptor's shared table.
    pub fn capability<T: 'static>(&self, name: &str) -> Option<&T> {
        self.locals.get(name).or_else(|| self.caps.get(name))
    }

    /// The per-node capability table, writable from an `init` hook.
    pub fn locals_mut(&mut self) -> &mut Capabilities {
        &mut self.locals
    }

    /// Walk the parent chain, exclusive of this node, and return the
    /// nearest ancestor with the given resource id.
    pub fn traverse_to(&self, id: &str) -> Option<Arc<ResourceNode>> {
        let mut cursor = self.parent.clone();
        while let Some(node) = cursor {
            if node.id == id {
                return Some(node);
            }
            cursor = node.parent.clone();
        }
        None
    }

    /// The absolute path of this node: its ancestor chain's keys joined
    /// with `/`. The exact inverse of resolution for nodes with no leftover
    /// subpath.
    pub fn url(&self) -> String {
        self.url_parts(None)
    }

    /// Like [`ResourceNode::url`], with one extra segment appended.
    pub fn url_with(&self, extra: &str) -> String {
        self.url_parts(Some(extra))
    }

    fn url_parts(&self, extra: Option<&str>) -> String {
        let mut parts: Vec<&str> = Vec::new();
        let mut cursor = Some(self);
        while let Some(node) = cursor {
            if let Some(key) = node.key.as_deref() {
                parts.push(key);
            }
            cursor = node.parent.as_deref();
        }
        parts.reverse();
        if let Some(extra) = extra {
            parts.push(extra);
        }
        format!("/{}", parts.join("/"))
    }
}

impl fmt::Display for ResourceNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<Resource[{}]>", self.id)
    }
}

impl fmt::Debug for ResourceNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceNode")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("parent", &self.parent.as_ref().map(|p| p.id()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{Capabilities, ResourceNode};
    use std::sync::Arc;

    fn chain() -> ResourceNode {
        let caps = Arc::new(Capabilities::new());
        let root = Arc::new(ResourceNode::new("root", None, None, Arc::clone(&caps)));
        let users = Arc::new(ResourceNode::new(
            "users",
            Some("users".into()),
            Some(root),
            Arc::clone(&caps),
        ));
        ResourceNode::new("user", Some("42".into()), Some(users), caps)
    }

    #[test]
    fn traverse_to_excludes_self() {
        let user = chain();
        assert_eq!(user.traverse_to("users").unwrap().id(), "users");
        assert_eq!(user.traverse_to("root").unwrap().id(), "root");
        assert!(user.traverse_to("user").is_none());
        assert!(user.traverse_to("missing").is_none());
    }

    #[test]
    fn url_joins_ancestor_keys() {
        let user = chain();
        assert_eq!(user.url(), "/users/42");
        assert_eq!(user.url_with("edit"), "/users/42/edit");
        assert_eq!(user.parent().unwrap().parent().unwrap().url(), "/");
    }

    #[test]
    fn capability_prefers_locals() {
        let mut caps = Capabilities::new();
        caps.insert("attr", "shared".to_string());
        let mut node = ResourceNode::new("root", None, None, Arc::new(caps));
        assert_eq!(node.capability::<String>("attr").unwrap(), "shared");

        node.locals_mut().insert("attr", "local".to_string());
        assert_eq!(node.capability::<String>("attr").unwrap(), "local");
        assert!(node.capability::<u32>("attr").is_none());
    }

    #[test]
    fn display_names_the_resource() {
        let node = chain();
        assert_eq!(node.to_string(), "#<Resource[user]>");
    }
}
