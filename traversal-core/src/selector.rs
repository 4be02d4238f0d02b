//! Selector dimensions for chain registration and matching.
//!
//! A chain is registered against a four-dimensional [`Selector`]:
//! `ancestor → name → verb → flavor`, in that fixed order. Each dimension is
//! either an exact value or the wildcard, expressed as the tagged sum
//! [`Dim`] rather than a sentinel string, so the wildcard can never collide
//! with a legitimate value (including `""` and `false`).
//!
//! At match time a request is reduced to a [`RequestKey`]: concrete values
//! only, with the logical name defaulting to [`INDEX_NAME`] when the path
//! resolved fully.

use std::borrow::Cow;
use std::fmt;

/// The logical name a request carries when its path resolved with no
/// leftover segment — the resource's own "index" view.
pub const INDEX_NAME: &str = "index";

/// One selector dimension: the wildcard, or an exact value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dim<T> {
    /// Matches any value of this dimension.
    Any,
    /// Matches exactly this value.
    Is(T),
}

impl<T> Dim<T> {
    /// Returns true for the wildcard.
    pub fn is_any(&self) -> bool {
        matches!(self, Dim::Any)
    }

    /// The exact value, if this dimension is not the wildcard.
    pub fn value(&self) -> Option<&T> {
        match self {
            Dim::Any => None,
            Dim::Is(v) => Some(v),
        }
    }
}

/// A case-normalized HTTP method.
///
/// Construction always upper-cases, so `Verb::new("post") == Verb::POST`
/// and registration and matching can never disagree on case.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Verb(Cow<'static, str>);

impl Verb {
    /// The GET method, the registration default.
    pub const GET: Verb = Verb(Cow::Borrowed("GET"));
    /// The POST method.
    pub const POST: Verb = Verb(Cow::Borrowed("POST"));
    /// The PUT method.
    pub const PUT: Verb = Verb(Cow::Borrowed("PUT"));
    /// The DELETE method.
    pub const DELETE: Verb = Verb(Cow::Borrowed("DELETE"));
    /// The PATCH method.
    pub const PATCH: Verb = Verb(Cow::Borrowed("PATCH"));
    /// The HEAD method.
    pub const HEAD: Verb = Verb(Cow::Borrowed("HEAD"));
    /// The OPTIONS method.
    pub const OPTIONS: Verb = Verb(Cow::Borrowed("OPTIONS"));

    /// Normalize an arbitrary method string into a `Verb`.
    pub fn new(method: &str) -> Self {
        let upper = method.to_ascii_uppercase();
        match upper.as_str() {
            "GET" => Verb::GET,
            "POST" => Verb::POST,
            "PUT" => Verb::PUT,
            "DELETE" => Verb::DELETE,
            "PATCH" => Verb::PATCH,
            "HEAD" => Verb::HEAD,
            "OPTIONS" => Verb::OPTIONS,
            _ => Verb(Cow::Owned(upper)),
        }
    }

    /// The normalized method string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The registration-side key for a handler chain.
///
/// Unspecified dimensions default to the wildcard, except `name` which
/// defaults to the literal [`INDEX_NAME`] and `verb` which defaults to GET:
/// a bare `Selector::new()` describes "the index view of this resource,
/// fetched with GET, under any parent, for any client flavor".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    /// Parent resource id, or the wildcard.
    pub ancestor: Dim<String>,
    /// Logical segment name, or the wildcard.
    pub name: Dim<String>,
    /// HTTP method, or the wildcard.
    pub verb: Dim<Verb>,
    /// XHR-like client flavor, or the wildcard.
    pub flavor: Dim<bool>,
}

impl Default for Selector {
    fn default() -> Self {
        Self {
            ancestor: Dim::Any,
            name: Dim::Is(INDEX_NAME.to_string()),
            verb: Dim::Is(Verb::GET),
            flavor: Dim::Any,
        }
    }
}

impl Selector {
    /// A selector with the registration defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Require an exact parent resource id.
    pub fn ancestor(mut self, id: impl Into<String>) -> Self {
        self.ancestor = Dim::Is(id.into());
        self
    }

    /// Require an exact logical name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Dim::Is(name.into());
        self
    }

    /// Match any logical name instead of the `"index"` default.
    pub fn any_name(mut self) -> Self {
        self.name = Dim::Any;
        self
    }

    /// Require an exact verb.
    pub fn verb(mut self, verb: Verb) -> Self {
        self.verb = Dim::Is(verb);
        self
    }

    /// Match any verb instead of the GET default.
    pub fn any_verb(mut self) -> Self {
        self.verb = Dim::Any;
        self
    }

    /// Require an exact client flavor.
    pub fn flavor(mut self, xhr: bool) -> Self {
        self.flavor = Dim::Is(xhr);
        self
    }
}

/// The match-side key derived from a resolved request.
#[derive(Debug, Clone)]
pub struct RequestKey {
    /// The matched node's parent resource id; `None` at the root.
    pub ancestor: Option<String>,
    /// The unresolved segment, or [`INDEX_NAME`] for a fully resolved path.
    pub name: String,
    /// The request method, case-normalized.
    pub verb: Verb,
    /// Whether the client looks XHR-like.
    pub flavor: bool,
}
