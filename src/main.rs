//! Pokedex - An interactive prompt for exploring the PokeAPI
//!
//! Upstream responses are memoized in a TTL cache shared by every command.

use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pokecache::repl::{self, Session};
use pokecache::config::DEFAULT_LOG_FILTER;
use pokecache::{Config, HttpFetcher, ResponseCache};

/// Main entry point for the Pokedex.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging (stderr)
/// 2. Load configuration from environment variables
/// 3. Create the response cache, which starts its sweep task
/// 4. Run the prompt on stdin/stdout until exit, end of input or Ctrl+C
/// 5. Close the cache
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level for the library and this binary, can be
    // overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: cache_interval={}s, base_url={}, fetch_timeout={}s",
        config.cache_interval, config.base_url, config.fetch_timeout
    );

    let cache = Arc::new(
        ResponseCache::new(config.cache_interval()).context("could not create response cache")?,
    );
    let fetcher = HttpFetcher::new(config.fetch_timeout()).context("could not create HTTP client")?;

    let mut session = Session::new(Arc::clone(&cache), Arc::new(fetcher), config.base_url.clone());
    // Stdin is read on its own thread so Ctrl+C never waits on a pending read
    let input = repl::spawn_line_reader(std::io::BufReader::new(std::io::stdin()))
        .context("could not start stdin reader")?;
    let mut stdout = std::io::stdout();

    tokio::select! {
        result = repl::run(&mut session, input, &mut stdout) => result?,
        _ = signal::ctrl_c() => info!("Received Ctrl+C, shutting down"),
    }

    cache.close().await;
    let stats = cache.stats().await;
    info!(
        "Session ended: hits={}, misses={}, hit_rate={:.2}, swept={}",
        stats.hits,
        stats.misses,
        stats.hit_rate(),
        stats.swept
    );

    Ok(())
}
