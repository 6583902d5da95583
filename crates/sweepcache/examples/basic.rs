use std::time::Duration;

use sweepcache::{Cache, Config};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let mut cache = Cache::new(Config {
        shards_count: 64,
        entry_lifetime: Duration::from_secs(5),
        cleanup_interval: Duration::from_secs(1),
        ..Config::default()
    });

    cache.put("user:42", b"alice").unwrap();
    cache.put("user:7", b"bob").unwrap();

    match cache.get(&"user:42") {
        Ok(value) => println!("user:42 -> {}", String::from_utf8_lossy(&value)),
        Err(e) => println!("user:42 -> error: {e}"),
    }

    println!("entries: {}", cache.entries_count());

    println!("sleeping past the configured lifetime so the sweeper can evict everything...");
    tokio::time::sleep(Duration::from_secs(7)).await;

    println!("entries after sweep: {}", cache.entries_count());

    cache.close();
}
