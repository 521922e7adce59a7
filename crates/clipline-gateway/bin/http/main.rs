mod cli;

use crate::cli::{CacheBackendArg, CLI};
use clap::Parser;
use clipline_cache::{InMemoryArchiveCache, RedisArchiveCache};
use clipline_core::ArchiveCache;
use clipline_coordinator::{
    ArchiveCoordinator, BroadcastHub, DiscussionSynchronizer, SessionRegistry,
};
use clipline_gateway::{App, AppState};
use clipline_upstream::{HttpCrawler, HttpDiscussionSource, HttpMailingList};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = CLI::try_parse()?;

    info!(
        listen_addr = %config.listen_addr,
        cache_backend = %config.cache,
        crawl_timeout_secs = config.crawl_timeout_secs,
        "starting clipline gateway"
    );

    match config.cache {
        CacheBackendArg::InMemory => {
            run_server(config, InMemoryArchiveCache::new()).await?;
        }
        CacheBackendArg::Redis => {
            let redis_url = config
                .redis_url
                .clone()
                .ok_or("redis url is required when cache backend is redis")?;
            let client = redis::Client::open(redis_url)?;
            let conn = client.get_multiplexed_async_connection().await?;
            run_server(config, RedisArchiveCache::new(conn)).await?;
        }
    }

    Ok(())
}

async fn run_server<C: ArchiveCache>(
    config: CLI,
    cache: C,
) -> Result<(), Box<dyn std::error::Error>> {
    let cache = Arc::new(cache);
    let hub = Arc::new(BroadcastHub::new());
    let crawler = Arc::new(HttpCrawler::new(&config.crawler_url));
    let discussions = Arc::new(HttpDiscussionSource::new(&config.discussions_url));
    let mail = Arc::new(HttpMailingList::new(&config.mail_url));

    let coordinator = Arc::new(ArchiveCoordinator::with_crawl_timeout(
        Arc::clone(&cache),
        crawler,
        Arc::clone(&hub),
        Duration::from_secs(config.crawl_timeout_secs),
    ));
    let synchronizer = Arc::new(DiscussionSynchronizer::new(
        Arc::clone(&cache),
        discussions,
        Arc::clone(&hub),
    ));
    let sessions = Arc::new(SessionRegistry::new(Arc::clone(&cache)));

    spawn_purge_on_signal(Arc::clone(&sessions));

    let state = AppState {
        coordinator,
        synchronizer,
        sessions,
        mail,
        hub,
    };

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "gateway listening");
    axum::serve(listener, App::router(state)).await?;

    Ok(())
}

/// SIGUSR2 triggers the process-wide session cleanup.
#[cfg(unix)]
fn spawn_purge_on_signal<C: ArchiveCache>(sessions: Arc<SessionRegistry<C>>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut stream = match signal(SignalKind::user_defined2()) {
            Ok(stream) => stream,
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGUSR2 handler");
                return;
            }
        };
        while stream.recv().await.is_some() {
            info!("received SIGUSR2, purging session keys");
            sessions.purge_all().await;
        }
    });
}

#[cfg(not(unix))]
fn spawn_purge_on_signal<C: ArchiveCache>(_sessions: Arc<SessionRegistry<C>>) {}
