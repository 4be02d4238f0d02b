//! The chain registry: per-resource handler groups keyed by partial-wildcard
//! selectors, and the specificity match that picks the ordered subset to run.
//!
//! Storage is a 4-level nested lookup in fixed dimension order
//! `ancestor → name → verb → flavor`; each level holds an exact-value map
//! plus one wildcard slot. Two tables exist per resource: "pre" groups
//! (cross-cutting, zero or more may match) and "terminal" groups (at most
//! one matches, the response producer).
//!
//! Matching semantics:
//!
//! - **Terminal**: a single greedy walk — exact child if present, else the
//!   wildcard child, else no match. No backtracking across levels.
//! - **Pre**: an exhaustive lattice walk — at every level branch into both
//!   the exact child (when the request carries a value for that dimension)
//!   and the wildcard child, and every surviving leaf contributes. A guard
//!   registered for "all verbs, all names" and one for "this exact verb and
//!   name" both fire when both cover the request.
//! - **Merge**: every contributing group sorts by its registration sequence
//!   number, ascending, and the handler lists concatenate in that order. The
//!   counter is shared across both tables of a resource, so relative
//!   registration order between pre and terminal groups is what decides.
//!   With no terminal match the result is empty no matter how many pre
//!   groups covered the request.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use traversal_core::{Dim, DynHandler, RequestKey, Selector, Verb};

/// Which table a chain registers into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainKind {
    /// Cross-cutting handlers; every matching specificity tier fires.
    Pre,
    /// The single response-producing group; at most one matches.
    Terminal,
}

/// An ordered, non-empty handler list with its registration sequence number.
pub(crate) struct HandlerGroup<X: Send> {
    pub(crate) seq: u64,
    pub(crate) handlers: Vec<Arc<dyn DynHandler<X>>>,
}

/// One level of the nested selector map: exact values plus a wildcard slot.
pub(crate) struct Level<K, V> {
    exact: HashMap<K, V>,
    any: Option<V>,
}

impl<K, V> Default for Level<K, V> {
    fn default() -> Self {
        Self {
            exact: HashMap::new(),
            any: None,
        }
    }
}

impl<K: Eq + Hash, V> Level<K, V> {
    /// The child for a registration dimension, created on demand.
    fn child(&mut self, dim: Dim<K>) -> &mut V
    where
        V: Default,
    {
        match dim {
            Dim::Any => self.any.get_or_insert_with(V::default),
            Dim::Is(key) => self.exact.entry(key).or_default(),
        }
    }

    /// Store a leaf at a registration dimension, replacing any previous
    /// group registered at the exact same selector.
    fn put(&mut self, dim: Dim<K>, value: V) {
        match dim {
            Dim::Any => self.any = Some(value),
            Dim::Is(key) => {
                self.exact.insert(key, value);
            }
        }
    }

    /// Greedy selection for the terminal walk: exact child if the request
    /// carries a value present in the map, else the wildcard child.
    fn select(&self, key: Option<&K>) -> Option<&V> {
        key.and_then(|k| self.exact.get(k)).or(self.any.as_ref())
    }

    /// Exhaustive branching for the pre walk: both the exact child (when
    /// the request carries a value) and the wildcard child survive.
    fn branch<'t>(&'t self, key: Option<&K>, out: &mut Vec<&'t V>) {
        if let Some(v) = key.and_then(|k| self.exact.get(k)) {
            out.push(v);
        }
        if let Some(v) = &self.any {
            out.push(v);
        }
    }
}

type FlavorLevel<X> = Level<bool, HandlerGroup<X>>;
type VerbLevel<X> = Level<Verb, FlavorLevel<X>>;
type NameLevel<X> = Level<String, VerbLevel<X>>;
type AncestorLevel<X> = Level<String, NameLevel<X>>;

/// All chains registered for one resource id.
pub(crate) struct ChainTable<X: Send> {
    pre: AncestorLevel<X>,
    terminal: AncestorLevel<X>,
    next_seq: u64,
}

impl<X: Send + 'static> Default for ChainTable<X> {
    fn default() -> Self {
        Self {
            pre: Level::default(),
            terminal: Level::default(),
            next_seq: 0,
        }
    }
}

impl<X: Send + 'static> ChainTable<X> {
    /// Store a handler group at the selector's path, assigning the next
    /// sequence number from the counter shared by both tables.
    pub(crate) fn register(
        &mut self,
        kind: ChainKind,
        selector: Selector,
        handlers: Vec<Arc<dyn DynHandler<X>>>,
    ) {
        debug_assert!(!handlers.is_empty());
        let group = HandlerGroup {
            seq: self.next_seq,
            handlers,
        };
        self.next_seq += 1;

        let table = match kind {
            ChainKind::Pre => &mut self.pre,
            ChainKind::Terminal => &mut self.terminal,
        };
        table
            .child(selector.ancestor)
            .child(selector.name)
            .child(selector.verb)
            .put(selector.flavor, group);
    }

    /// The ordered handler list covering `key`: all matching pre groups plus
    /// the single most specific terminal group, merged by sequence number.
    /// Empty when no terminal group matches.
    pub(crate) fn matched(&self, key: &RequestKey) -> Vec<Arc<dyn DynHandler<X>>> {
        let Some(terminal) = self.terminal_group(key) else {
            return Vec::new();
        };
        let mut groups = self.pre_groups(key);
        groups.push(terminal);
        groups.sort_by_key(|g| g.seq);
        groups
            .into_iter()
            .flat_map(|g| g.handlers.iter().cloned())
            .collect()
    }

    fn terminal_group(&self, key: &RequestKey) -> Option<&HandlerGroup<X>> {
        self.terminal
            .select(key.ancestor.as_ref())?
            .select(Some(&key.name))?
            .select(Some(&key.verb))?
            .select(Some(&key.flavor))
    }

    fn pre_groups(&self, key: &RequestKey) -> Vec<&HandlerGroup<X>> {
        let mut names: Vec<&NameLevel<X>> = Vec::new();
        self.pre.branch(key.ancestor.as_ref(), &mut names);

        let mut verbs: Vec<&VerbLevel<X>> = Vec::new();
        for level in names {
            level.branch(Some(&key.name), &mut verbs);
        }

        let mut flavors: Vec<&FlavorLevel<X>> = Vec::new();
        for level in verbs {
            level.branch(Some(&key.verb), &mut flavors);
        }

        let mut groups: Vec<&HandlerGroup<X>> = Vec::new();
        for level in flavors {
            level.branch(Some(&key.flavor), &mut groups);
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::{ChainKind, ChainTable};
    use std::sync::Arc;
    use traversal_core::{
        BoxError, Flow, Handler, Next, RequestContext, RequestKey, Selector, Verb, boxed,
    };

    /// A handler recognizable by label; never actually executed here.
    struct Tagged(&'static str);

    impl Handler<()> for Tagged {
        async fn handle(
            &self,
            _cx: &mut RequestContext<()>,
            _next: Next<'_, ()>,
        ) -> Result<Flow, BoxError> {
            Ok(Flow::Handled)
        }
    }

    fn key(ancestor: Option<&str>, name: &str, verb: Verb, flavor: bool) -> RequestKey {
        RequestKey {
            ancestor: ancestor.map(str::to_string),
            name: name.to_string(),
            verb,
            flavor,
        }
    }

    fn table_with(regs: &[(ChainKind, Selector)]) -> ChainTable<()> {
        let mut table = ChainTable::default();
        for (kind, sel) in regs {
            table.register(*kind, sel.clone(), vec![boxed(Tagged("h"))]);
        }
        table
    }

    #[test]
    fn no_terminal_means_empty_even_with_pre() {
        let table = table_with(&[(ChainKind::Pre, Selector::new().any_name().any_verb())]);
        let matched = table.matched(&key(None, "index", Verb::GET, false));
        assert!(matched.is_empty());
    }

    #[test]
    fn terminal_prefers_exact_over_wildcard_per_level() {
        let mut table: ChainTable<()> = ChainTable::default();
        table.register(
            ChainKind::Terminal,
            Selector::new().any_name(),
            vec![boxed(Tagged("wild"))],
        );
        table.register(
            ChainKind::Terminal,
            Selector::new().name("index"),
            vec![boxed(Tagged("exact")), boxed(Tagged("exact2"))],
        );

        // Exact name wins: the two-handler group is chosen.
        let matched = table.matched(&key(None, "index", Verb::GET, false));
        assert_eq!(matched.len(), 2);

        // Unknown name falls back to the wildcard group.
        let matched = table.matched(&key(None, "other", Verb::GET, false));
        assert_eq!(matched.len(), 1);
    }

    #[test]
    fn terminal_walk_does_not_backtrack() {
        let mut table: ChainTable<()> = ChainTable::default();
        // Exact name "xxx" exists but only for POST; wildcard name covers GET.
        table.register(
            ChainKind::Terminal,
            Selector::new().name("xxx").verb(Verb::POST),
            vec![boxed(Tagged("post"))],
        );
        table.register(
            ChainKind::Terminal,
            Selector::new().any_name(),
            vec![boxed(Tagged("get"))],
        );

        // GET /xxx commits to the exact name level, finds no GET under it,
        // and fails rather than retrying the wildcard name.
        let matched = table.matched(&key(None, "xxx", Verb::GET, false));
        assert!(matched.is_empty());
    }

    #[test]
    fn pre_collects_every_covering_tier() {
        let mut table: ChainTable<()> = ChainTable::default();
        table.register(
            ChainKind::Pre,
            Selector::new().any_name().any_verb(),
            vec![boxed(Tagged("broad"))],
        );
        table.register(
            ChainKind::Pre,
            Selector::new().name("index").verb(Verb::GET),
            vec![boxed(Tagged("narrow"))],
        );
        table.register(
            ChainKind::Terminal,
            Selector::new(),
            vec![boxed(Tagged("view"))],
        );

        let matched = table.matched(&key(None, "index", Verb::GET, false));
        assert_eq!(matched.len(), 3);

        // A different name only covers the broad tier.
        let mut table2: ChainTable<()> = ChainTable::default();
        table2.register(
            ChainKind::Pre,
            Selector::new().any_name().any_verb(),
            vec![boxed(Tagged("broad"))],
        );
        table2.register(
            ChainKind::Terminal,
            Selector::new().name("other").any_verb(),
            vec![boxed(Tagged("view"))],
        );
        let matched = table2.matched(&key(None, "other", Verb::GET, false));
        assert_eq!(matched.len(), 2);
    }

    #[test]
    fn absent_ancestor_only_reaches_wildcard() {
        let mut table: ChainTable<()> = ChainTable::default();
        table.register(
            ChainKind::Terminal,
            Selector::new().ancestor("testResource").any_verb(),
            vec![boxed(Tagged("under-test"))],
        );

        // Root node has no parent, so the exact ancestor level is
        // unreachable and there is no wildcard to fall back to.
        assert!(
            table
                .matched(&key(None, "index", Verb::POST, false))
                .is_empty()
        );
        assert_eq!(
            table
                .matched(&key(Some("testResource"), "index", Verb::POST, false))
                .len(),
            1
        );
        // A different parent is an ancestor mismatch.
        assert!(
            table
                .matched(&key(Some("rootResource"), "index", Verb::POST, false))
                .is_empty()
        );
    }

    #[test]
    fn flavor_dimension_discriminates() {
        let mut table: ChainTable<()> = ChainTable::default();
        table.register(
            ChainKind::Terminal,
            Selector::new().flavor(true),
            vec![boxed(Tagged("xhr"))],
        );
        assert_eq!(table.matched(&key(None, "index", Verb::GET, true)).len(), 1);
        assert!(
            table
                .matched(&key(None, "index", Verb::GET, false))
                .is_empty()
        );
    }
}
