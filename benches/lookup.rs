use criterion::{criterion_group, criterion_main, Criterion};
use radix_mux::{Method, Router, RouterBuilder};
use std::hint::black_box;

fn build_router() -> Router<&'static str> {
    let mut builder = RouterBuilder::new();
    builder.get("/", vec!["root"]).unwrap();
    builder.get("/api/users", vec!["users"]).unwrap();
    builder.get("/api/users/:id", vec!["user"]).unwrap();
    builder.get("/api/users/:id/posts", vec!["posts"]).unwrap();
    builder
        .get("/api/users/:id/posts/:post", vec!["post"])
        .unwrap();
    builder.get("/api/projects/:name", vec!["project"]).unwrap();
    builder.get("/static/*filepath", vec!["file"]).unwrap();
    // Sibling noise so priority ordering has something to do
    for path in [
        "/about", "/admin", "/alpha", "/beta", "/contact", "/docs", "/health", "/login",
        "/logout", "/metrics", "/pricing", "/search", "/settings", "/signup", "/status",
    ] {
        builder.get(path, vec!["page"]).unwrap();
    }
    builder.build()
}

fn bench_lookup(c: &mut Criterion) {
    let router = build_router();

    c.bench_function("lookup_static", |b| {
        b.iter(|| router.lookup(Method::GET, black_box("/api/users")))
    });

    c.bench_function("lookup_param", |b| {
        b.iter(|| router.lookup(Method::GET, black_box("/api/users/12345/posts/99")))
    });

    c.bench_function("lookup_catch_all", |b| {
        b.iter(|| router.lookup(Method::GET, black_box("/static/js/inc/framework.js")))
    });

    c.bench_function("lookup_miss_with_tsr", |b| {
        b.iter(|| router.lookup(Method::GET, black_box("/api/users/")))
    });

    c.bench_function("supported_methods", |b| {
        b.iter(|| router.supported_methods(black_box("/api/users/42")))
    });
}

criterion_group!(benches, bench_lookup);
criterion_main!(benches);
