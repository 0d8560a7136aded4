//! Core router implementation: one tree per HTTP method behind a two-phase
//! builder/router lifecycle.

use crate::path::clean_path;
use crate::route::{Lookup, Method};
use crate::tree::Node;
use anyhow::{bail, Result};
use std::collections::HashMap;

/// Registration phase of the router.
///
/// Routes are inserted here, during single-threaded setup; [`build`] consumes
/// the builder into an immutable [`Router`]. Malformed patterns (a missing
/// leading `/`, conflicting wildcards, a catch-all that is not the final
/// segment, a duplicate method+path registration) are configuration bugs and
/// surface immediately as errors; a builder that returned an error should be
/// discarded, not reused.
///
/// [`build`]: RouterBuilder::build
pub struct RouterBuilder<H> {
    trees: HashMap<Method, Node<H>>,
    redirect_trailing_slash: bool,
    redirect_fixed_path: bool,
}

impl<H> Default for RouterBuilder<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> RouterBuilder<H> {
    /// Create a builder with path auto-correction, including trailing
    /// slashes, enabled.
    pub fn new() -> Self {
        Self {
            trees: HashMap::new(),
            redirect_trailing_slash: true,
            redirect_fixed_path: true,
        }
    }

    /// Whether a lookup miss may suggest the same path with the trailing
    /// slash toggled, when a route exists for that variant. Defaults to true.
    pub fn redirect_trailing_slash(mut self, enabled: bool) -> Self {
        self.redirect_trailing_slash = enabled;
        self
    }

    /// Whether a lookup miss may suggest a cleaned, case-corrected path when
    /// a route exists for it. Defaults to true.
    pub fn redirect_fixed_path(mut self, enabled: bool) -> Self {
        self.redirect_fixed_path = enabled;
        self
    }

    /// Register a handler chain for the given method(s) and path pattern.
    ///
    /// `methods` may be a union (`Method::GET | Method::PUT`); the chain is
    /// cloned into each method's tree. The pattern must start with `/` and
    /// may contain `:name` parameters and one final `*name` catch-all; the
    /// chain must be non-empty and is invoked in registration order by the
    /// caller.
    pub fn handle(&mut self, methods: Method, path: &str, handlers: Vec<H>) -> Result<()>
    where
        H: Clone,
    {
        if !path.starts_with('/') {
            bail!("path '{path}' must begin with '/'");
        }
        if methods.is_empty() {
            bail!("no method given for path '{path}'");
        }
        if handlers.is_empty() {
            bail!("no handlers given for path '{path}'");
        }

        let mut remaining = methods.iter().count();
        for method in methods.iter() {
            let root = self.trees.entry(method).or_insert_with(Node::new);

            // The last tree takes ownership of the chain
            remaining -= 1;
            if remaining == 0 {
                root.insert(path, handlers)?;
                break;
            }
            root.insert(path, handlers.clone())?;
        }

        tracing::debug!(methods = %methods, path, "route registered");
        Ok(())
    }

    /// Shortcut for `handle(Method::GET, path, handlers)`.
    pub fn get(&mut self, path: &str, handlers: Vec<H>) -> Result<()>
    where
        H: Clone,
    {
        self.handle(Method::GET, path, handlers)
    }

    /// Shortcut for `handle(Method::POST, path, handlers)`.
    pub fn post(&mut self, path: &str, handlers: Vec<H>) -> Result<()>
    where
        H: Clone,
    {
        self.handle(Method::POST, path, handlers)
    }

    /// Shortcut for `handle(Method::PUT, path, handlers)`.
    pub fn put(&mut self, path: &str, handlers: Vec<H>) -> Result<()>
    where
        H: Clone,
    {
        self.handle(Method::PUT, path, handlers)
    }

    /// Shortcut for `handle(Method::PATCH, path, handlers)`.
    pub fn patch(&mut self, path: &str, handlers: Vec<H>) -> Result<()>
    where
        H: Clone,
    {
        self.handle(Method::PATCH, path, handlers)
    }

    /// Shortcut for `handle(Method::DELETE, path, handlers)`.
    pub fn delete(&mut self, path: &str, handlers: Vec<H>) -> Result<()>
    where
        H: Clone,
    {
        self.handle(Method::DELETE, path, handlers)
    }

    /// Shortcut for `handle(Method::HEAD, path, handlers)`.
    pub fn head(&mut self, path: &str, handlers: Vec<H>) -> Result<()>
    where
        H: Clone,
    {
        self.handle(Method::HEAD, path, handlers)
    }

    /// Shortcut for `handle(Method::OPTIONS, path, handlers)`.
    pub fn options(&mut self, path: &str, handlers: Vec<H>) -> Result<()>
    where
        H: Clone,
    {
        self.handle(Method::OPTIONS, path, handlers)
    }

    /// Freeze the builder into an immutable, lookup-only [`Router`].
    pub fn build(self) -> Router<H> {
        Router {
            trees: self.trees,
            redirect_trailing_slash: self.redirect_trailing_slash,
            redirect_fixed_path: self.redirect_fixed_path,
        }
    }
}

/// The serve-phase router (optimized for concurrent reads).
///
/// This type admits no mutation: all route data is fixed at [`build`] time,
/// so any number of threads may call [`lookup`] simultaneously without
/// synchronization. Lookups never block and allocate only the parameter list
/// of the matched request.
///
/// [`build`]: RouterBuilder::build
/// [`lookup`]: Router::lookup
pub struct Router<H> {
    trees: HashMap<Method, Node<H>>,
    redirect_trailing_slash: bool,
    redirect_fixed_path: bool,
}

impl<H> Router<H> {
    /// Route a concrete request path for one method.
    ///
    /// Exactly one of the [`Lookup`] outcomes holds: a match with its handler
    /// chain and bound parameters, a trailing-slash or fixed-path redirect
    /// suggestion (subject to the builder's options; never for `/` or for
    /// CONNECT requests), or not-found. A method with no registered tree is
    /// not-found immediately.
    pub fn lookup<'r, 'p>(&'r self, method: Method, path: &'p str) -> Lookup<'r, 'p, H> {
        let root = match self.trees.get(&method) {
            Some(root) => root,
            None => return Lookup::NotFound,
        };

        let no_match = match root.get_value(path) {
            Ok((handlers, params)) => return Lookup::Matched { handlers, params },
            Err(no_match) => no_match,
        };

        if method == Method::CONNECT || path == "/" {
            return Lookup::NotFound;
        }

        if no_match.tsr && self.redirect_trailing_slash {
            let target = if path.len() > 1 && path.ends_with('/') {
                path[..path.len() - 1].to_string()
            } else {
                format!("{path}/")
            };
            return Lookup::TrailingSlashRedirect { path: target };
        }

        if self.redirect_fixed_path {
            // Remove superfluous elements first, then walk ignoring case
            if let Some(fixed) = root
                .find_case_insensitive_path(&clean_path(path), self.redirect_trailing_slash)
            {
                return Lookup::FixedPathRedirect { path: fixed };
            }
        }

        Lookup::NotFound
    }

    /// The set of methods for which some registered route matches the given
    /// concrete path; suitable for building an `Allow` header or answering a
    /// preflight request.
    pub fn supported_methods(&self, path: &str) -> Method {
        let mut result = Method::empty();
        for (&method, root) in &self.trees {
            if root.get_value(path).is_ok() {
                result |= method;
            }
        }
        result
    }
}
