use crate::error::{ArchiveError, Result};
use crate::inflight::{InFlightTable, Registration};
use clipline_core::{
    ArchiveCache, ArchiveRecord, ClientId, ConnectionHandle, CrawlContext, CrawlTicket, Crawler,
    Fanout, ListingId, Pid, ServerEvent,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// Default bound on how long a delegated crawl may stay in flight.
pub const DEFAULT_CRAWL_TIMEOUT: Duration = Duration::from_secs(120);

/// Owns the archive-request lifecycle.
///
/// Per request: validate the listing URL, check the two-tier cache,
/// deduplicate against crawls already in flight, delegate to the crawler
/// backend, and fan the result out to every subscriber. The invariant is
/// at most one delegated crawl per pid at any instant, no matter how many
/// connections ask for it concurrently.
pub struct ArchiveCoordinator<C, W, F> {
    cache: Arc<C>,
    crawler: Arc<W>,
    fanout: Arc<F>,
    inflight: Arc<InFlightTable>,
    crawl_timeout: Duration,
}

impl<C, W, F> ArchiveCoordinator<C, W, F>
where
    C: ArchiveCache,
    W: Crawler,
    F: Fanout,
{
    pub fn new(cache: Arc<C>, crawler: Arc<W>, fanout: Arc<F>) -> Self {
        Self::with_crawl_timeout(cache, crawler, fanout, DEFAULT_CRAWL_TIMEOUT)
    }

    pub fn with_crawl_timeout(
        cache: Arc<C>,
        crawler: Arc<W>,
        fanout: Arc<F>,
        crawl_timeout: Duration,
    ) -> Self {
        Self {
            cache,
            crawler,
            fanout,
            inflight: Arc::new(InFlightTable::new()),
            crawl_timeout,
        }
    }

    /// Handles an inbound `archive` request.
    ///
    /// Fast path: a record in either tier is emitted to the requester only
    /// and nothing else happens — no delegation, no broadcast. Otherwise
    /// the requester is registered against the pid's in-flight entry and a
    /// crawl is delegated iff no entry existed yet.
    pub async fn archive(&self, url: &str, requester: &ConnectionHandle) -> Result<()> {
        let listing = ListingId::parse(url)?;
        let pid = listing.pid().clone();
        trace!(pid = %pid, client_id = %requester.client_id(), "archive requested");

        if let Some(record) = self.cache.lookup(&pid).await? {
            debug!(pid = %pid, "already archived, emitting cached record");
            self.fanout
                .emit(requester, ServerEvent::Update { archived: record });
            return Ok(());
        }

        // Check-and-register goes through a single map entry with no
        // suspension point, so concurrent requests for one pid collapse
        // onto a single delegation.
        match self.inflight.register(pid.clone(), requester.clone()) {
            Registration::Joined => {
                debug!(pid = %pid, client_id = %requester.client_id(), "joined in-flight crawl");
                return Ok(());
            }
            Registration::Leader => {}
        }

        // Once the requester is registered, failures are reported through
        // the fanout like the resolve and timeout paths; returning Err
        // here as well would notify the requester twice.
        let ctx = CrawlContext::for_listing(&listing, requester.client_id().clone());
        let ticket = match self.crawler.archive(ctx).await {
            Ok(ticket) => ticket,
            Err(e) => {
                self.abandon(&pid, &ArchiveError::CrawlFailed(e.to_string()));
                return Ok(());
            }
        };

        info!(pid = %pid, "delegated crawl");
        self.spawn_resolve(pid, ticket);
        Ok(())
    }

    /// Archive-status lookup. Validates the pid format, consults hot then
    /// cold, and returns the record or an explicit not-found. Never
    /// triggers delegation.
    pub async fn get_archive(&self, pid_text: &str) -> Result<Option<ArchiveRecord>> {
        let pid = Pid::new(pid_text)?;
        Ok(self.cache.lookup(&pid).await?)
    }

    /// Read-through for the shared recent-activity index.
    pub async fn recent_listings(&self) -> Result<Vec<String>> {
        Ok(self.cache.recent_listings().await?)
    }

    /// Drops a disconnected client from every in-flight subscriber set.
    /// Crawls keep running for the remaining subscribers and future cache
    /// reads.
    pub fn forget_subscriber(&self, client_id: &ClientId) {
        self.inflight.forget(client_id);
    }

    /// Waits on the crawl ticket (bounded by the crawl timeout) and
    /// resolves or abandons the in-flight entry.
    fn spawn_resolve(&self, pid: Pid, ticket: CrawlTicket) {
        let cache = Arc::clone(&self.cache);
        let fanout = Arc::clone(&self.fanout);
        let inflight = Arc::clone(&self.inflight);
        let crawl_timeout = self.crawl_timeout;

        tokio::spawn(async move {
            let outcome = match tokio::time::timeout(crawl_timeout, ticket).await {
                Err(_) => Err(ArchiveError::CrawlTimeout),
                Ok(Err(_)) => Err(ArchiveError::CrawlFailed(
                    "crawler dropped the completion channel".to_string(),
                )),
                Ok(Ok(Err(e))) => Err(ArchiveError::CrawlFailed(e.to_string())),
                Ok(Ok(Ok(record))) => Ok(record),
            };

            let record = match outcome {
                Ok(record) => record,
                Err(err) => {
                    warn!(pid = %pid, error = %err, "crawl did not complete");
                    let subscribers = inflight.remove(&pid);
                    for subscriber in &subscribers {
                        fanout.emit(subscriber, err.to_event());
                    }
                    return;
                }
            };

            if let Err(e) = cache.store(&pid, &record).await {
                // Subscribers still get the result; only durability and
                // the recent-activity broadcast are lost.
                warn!(pid = %pid, error = %e, "failed to store archived record");
            }

            let subscribers = inflight.remove(&pid);
            info!(pid = %pid, subscribers = subscribers.len(), "crawl completed");
            for subscriber in &subscribers {
                fanout.emit(
                    subscriber,
                    ServerEvent::Update {
                        archived: record.clone(),
                    },
                );
            }

            if let Err(e) = cache.add_recent_listing(&pid).await {
                warn!(pid = %pid, error = %e, "failed to append recent listing");
                return;
            }
            match cache.recent_listings().await {
                Ok(listings) => fanout.emit_all(ServerEvent::MostRecentListings { listings }),
                Err(e) => warn!(error = %e, "failed to read recent listings for broadcast"),
            }
        });
    }

    fn abandon(&self, pid: &Pid, err: &ArchiveError) {
        warn!(pid = %pid, error = %err, "abandoning crawl delegation");
        let subscribers = self.inflight.remove(pid);
        for subscriber in &subscribers {
            self.fanout.emit(subscriber, err.to_event());
        }
    }

    #[cfg(test)]
    pub(crate) fn inflight(&self) -> &InFlightTable {
        &self.inflight
    }
}
