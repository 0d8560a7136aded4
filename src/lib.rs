//! # radix-mux
//!
//! An HTTP request router backed by a compressed prefix tree (radix trie).
//!
//! One independent tree exists per HTTP method, providing fast routing with
//! support for:
//! - Static path segments
//! - Named parameters (`:name`), matching one segment
//! - Catch-all parameters (`*name`), matching the rest of the path
//! - Ordered handler chains per route
//! - Static-over-wildcard precedence with backtracking
//! - Trailing-slash redirect suggestions
//! - Case-insensitive fixed-path correction
//!
//! Routing follows a two-phase lifecycle: a [`RouterBuilder`] accepts
//! registrations during single-threaded setup, and [`RouterBuilder::build`]
//! consumes it into an immutable [`Router`] that only answers lookups, which
//! is why concurrent lookups need no synchronization.
//!
//! ## Example
//!
//! ```rust
//! use radix_mux::{Lookup, Method, RouterBuilder};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut builder = RouterBuilder::new();
//! builder.get("/api/users", vec!["list_users"])?;
//! builder.handle(
//!     Method::GET | Method::DELETE,
//!     "/api/users/:id",
//!     vec!["auth", "user_detail"],
//! )?;
//! builder.get("/static/*filepath", vec!["serve_file"])?;
//!
//! let router = builder.build();
//!
//! // Exact match
//! let result = router.lookup(Method::GET, "/api/users");
//! assert_eq!(result.handlers(), Some(&["list_users"][..]));
//!
//! // Match with parameter extraction
//! match router.lookup(Method::DELETE, "/api/users/123") {
//!     Lookup::Matched { handlers, params } => {
//!         assert_eq!(handlers, &["auth", "user_detail"]);
//!         assert_eq!(params.get("id"), Some("123"));
//!     }
//!     _ => unreachable!(),
//! }
//!
//! // Methods registered for a path, e.g. for an Allow header
//! let allowed = router.supported_methods("/api/users/123");
//! assert_eq!(allowed, Method::GET | Method::DELETE);
//! # Ok(())
//! # }
//! ```

mod path;
mod route;
mod router;
mod tree;

// Re-export public types
pub use path::clean_path;
pub use route::{Lookup, Method, Param, Params};
pub use router::{Router, RouterBuilder};

// Re-export anyhow types for convenience
pub use anyhow::{Context, Result};
