/// Trailing-slash and fixed-path redirect behavior.
///
/// A miss that is one slash or one case change away from a registered route
/// is reported as a redirect suggestion instead of a 404; the caller applies
/// 301 for GET and 307 for everything else.
use radix_mux::{Lookup, Method, RouterBuilder};

fn main() -> anyhow::Result<()> {
    let mut builder = RouterBuilder::new();
    builder.get("/docs", vec![serde_json::json!({"handler": "docs_index"})])?;
    builder.get("/Blog/Posts/", vec![serde_json::json!({"handler": "posts"})])?;
    builder.get("/files/*filepath", vec![serde_json::json!({"handler": "files"})])?;
    let router = builder.build();

    let probes = [
        "/docs",          // exact match
        "/docs/",         // trailing slash to strip
        "/blog/posts",    // wrong case and missing slash
        "/../Blog//Posts/", // cleaned, then matched
        "/files",         // catch-all needs the directory index
        "/nothing",       // a plain miss
    ];

    for path in probes {
        // GET gets the permanent status; other methods would use 307
        match router.lookup(Method::GET, path) {
            Lookup::Matched { handlers, .. } => {
                println!("{path:20} -> 200 {}", handlers[0]["handler"]);
            }
            Lookup::TrailingSlashRedirect { path: target } => {
                println!("{path:20} -> 301 {target} (trailing slash)");
            }
            Lookup::FixedPathRedirect { path: target } => {
                println!("{path:20} -> 301 {target} (fixed path)");
            }
            Lookup::NotFound => println!("{path:20} -> 404"),
        }
    }

    Ok(())
}
