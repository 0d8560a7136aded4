use radix_mux::{Lookup, Method, RouterBuilder};
use std::sync::Arc;

// A handler is anything invocable with the request context; here the context
// is just the matched path and the response is a string.
type Handler = Arc<dyn Fn(&str) -> String + Send + Sync>;

fn handler(name: &'static str) -> Handler {
    Arc::new(move |path| format!("{name}({path})"))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut builder: RouterBuilder<Handler> = RouterBuilder::new();

    builder.get("/", vec![handler("index")])?;
    builder.get("/api/users", vec![handler("list_users")])?;
    // Chains run in registration order; auth before the endpoint
    builder.handle(
        Method::GET | Method::PUT | Method::DELETE,
        "/api/users/:id",
        vec![handler("auth"), handler("user_detail")],
    )?;
    builder.get("/api/users/:id/posts", vec![handler("user_posts")])?;
    builder.get("/files/*filepath", vec![handler("serve_file")])?;

    let router = builder.build();

    for (method, path) in [
        (Method::GET, "/"),
        (Method::GET, "/api/users"),
        (Method::DELETE, "/api/users/42"),
        (Method::GET, "/api/users/42/posts"),
        (Method::GET, "/files/css/site.css"),
        (Method::POST, "/api/users/42"),
    ] {
        match router.lookup(method, path) {
            Lookup::Matched { handlers, params } => {
                let responses: Vec<String> = handlers.iter().map(|h| h(path)).collect();
                let params: Vec<String> = params
                    .iter()
                    .map(|p| format!("{}={}", p.name, p.value))
                    .collect();
                println!(
                    "{method} {path} -> {} [{}]",
                    responses.join(" -> "),
                    params.join(", "),
                );
            }
            Lookup::TrailingSlashRedirect { path: target }
            | Lookup::FixedPathRedirect { path: target } => {
                println!("{method} {path} -> redirect to {target}");
            }
            Lookup::NotFound => {
                let allowed = router.supported_methods(path);
                println!("{method} {path} -> 404 (Allow: {allowed})");
            }
        }
    }

    Ok(())
}
