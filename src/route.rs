//! Route-facing data types: HTTP methods, extracted parameters, and the
//! outcome of a lookup.

use bitflags::bitflags;
use std::fmt;
use std::ops::Index;

bitflags! {
    /// HTTP methods represented as bit flags.
    ///
    /// A single flag selects the tree to register into or look up from; a
    /// union (`Method::GET | Method::PUT`) registers the same route under
    /// several methods at once, and is what [`Router::supported_methods`]
    /// returns.
    ///
    /// [`Router::supported_methods`]: crate::Router::supported_methods
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Method: u16 {
        const GET     = 1 << 0;
        const POST    = 1 << 1;
        const PUT     = 1 << 2;
        const DELETE  = 1 << 3;
        const PATCH   = 1 << 4;
        const HEAD    = 1 << 5;
        const OPTIONS = 1 << 6;
        const CONNECT = 1 << 7;
        const TRACE   = 1 << 8;
        const PURGE   = 1 << 9;
    }
}

impl Method {
    /// Parse an HTTP method from its name (case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Some(Method::GET),
            "POST" => Some(Method::POST),
            "PUT" => Some(Method::PUT),
            "DELETE" => Some(Method::DELETE),
            "PATCH" => Some(Method::PATCH),
            "HEAD" => Some(Method::HEAD),
            "OPTIONS" => Some(Method::OPTIONS),
            "CONNECT" => Some(Method::CONNECT),
            "TRACE" => Some(Method::TRACE),
            "PURGE" => Some(Method::PURGE),
            _ => None,
        }
    }

    /// Parse multiple HTTP methods into one set, ignoring unknown names.
    pub fn from_slice(methods: &[&str]) -> Self {
        let mut result = Method::empty();
        for method in methods {
            if let Some(m) = Self::from_str(method) {
                result |= m;
            }
        }
        result
    }

    /// Iterate the names of the methods in this set.
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        self.iter_names().map(|(name, _)| name)
    }
}

/// Comma-separated method names, directly usable as an `Allow` header value.
impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for name in self.names() {
            if !first {
                f.write_str(", ")?;
            }
            f.write_str(name)?;
            first = false;
        }
        Ok(())
    }
}

/// A single URL parameter: the wildcard's name and the path text it matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param<'k, 'v> {
    pub name: &'k str,
    pub value: &'v str,
}

/// The ordered list of parameters bound during one lookup.
///
/// One entry per wildcard traversed, in left-to-right path order: the first
/// wildcard in the pattern is index 0. Names borrow from the router, values
/// from the request path; this vector is the only allocation a lookup makes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params<'k, 'v>(Vec<Param<'k, 'v>>);

impl<'k, 'v> Params<'k, 'v> {
    pub(crate) fn new() -> Self {
        Self(Vec::new())
    }

    pub(crate) fn push(&mut self, name: &'k str, value: &'v str) {
        self.0.push(Param { name, value });
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.0.truncate(len);
    }

    /// The value of the first parameter registered under `name`, if any.
    pub fn get(&self, name: &str) -> Option<&'v str> {
        self.0.iter().find(|p| p.name == name).map(|p| p.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Param<'k, 'v>> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'k, 'v> Index<usize> for Params<'k, 'v> {
    type Output = Param<'k, 'v>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<'k, 'v> IntoIterator for Params<'k, 'v> {
    type Item = Param<'k, 'v>;
    type IntoIter = std::vec::IntoIter<Param<'k, 'v>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// The outcome of a [`Router::lookup`](crate::Router::lookup) call.
///
/// Exactly one variant holds for any request. For the redirect variants the
/// conventional status policy is 301 for GET requests and 307 for everything
/// else, so the method is preserved across the redirect; applying it is the
/// caller's job, the router only supplies the target path.
#[derive(Debug)]
pub enum Lookup<'r, 'p, H> {
    /// A route matched: its handler chain in registration order, plus the
    /// parameters bound along the way.
    Matched {
        handlers: &'r [H],
        params: Params<'r, 'p>,
    },
    /// No exact match, but adding or removing a trailing slash reaches a
    /// registered route. `path` is the suggested redirect target.
    TrailingSlashRedirect { path: String },
    /// No exact match, but a case-insensitive walk over the cleaned path
    /// found a registered route. `path` is the corrected target.
    FixedPathRedirect { path: String },
    /// Nothing matched and no correction applies.
    NotFound,
}

impl<'r, 'p, H> Lookup<'r, 'p, H> {
    /// The matched handler chain, if this lookup succeeded.
    pub fn handlers(&self) -> Option<&'r [H]> {
        match self {
            Lookup::Matched { handlers, .. } => Some(handlers),
            _ => None,
        }
    }

    /// The redirect target, if this lookup suggests one.
    pub fn redirect(&self) -> Option<&str> {
        match self {
            Lookup::TrailingSlashRedirect { path } | Lookup::FixedPathRedirect { path } => {
                Some(path)
            }
            _ => None,
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, Lookup::Matched { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Lookup::NotFound)
    }
}
