/// Concurrent lookups against a shared router.
///
/// The builder/router split makes the serve phase read-only by construction:
/// once `build()` has run, any number of threads can share the router behind
/// an `Arc` and look up paths without locks.
use radix_mux::{Method, RouterBuilder};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    let mut builder = RouterBuilder::new();
    builder.get("/api/users", vec!["list_users"])?;
    builder.get("/api/users/:id", vec!["user_detail"])?;
    builder.get("/api/users/:id/posts/:post", vec!["user_post"])?;
    builder.get("/static/*filepath", vec!["serve_file"])?;
    let router = Arc::new(builder.build());

    let threads = 8;
    let iterations = 200_000;
    let start = Instant::now();

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let router = Arc::clone(&router);
            thread::spawn(move || {
                let mut matched = 0usize;
                for i in 0..iterations {
                    let path = format!("/api/users/{t}/posts/{i}");
                    if router.lookup(Method::GET, &path).is_matched() {
                        matched += 1;
                    }
                    if router
                        .lookup(Method::GET, "/static/js/app.js")
                        .is_matched()
                    {
                        matched += 1;
                    }
                }
                matched
            })
        })
        .collect();

    let mut total = 0usize;
    for handle in handles {
        total += handle.join().expect("worker thread panicked");
    }

    let elapsed = start.elapsed();
    let lookups = threads * iterations * 2;
    println!(
        "{total}/{lookups} lookups matched across {threads} threads in {:.2?} ({:.0} lookups/sec)",
        elapsed,
        lookups as f64 / elapsed.as_secs_f64(),
    );

    Ok(())
}
