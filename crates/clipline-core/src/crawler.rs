use crate::error::CrawlError;
use crate::listing::{ListingId, Pid};
use crate::record::ArchiveRecord;
use crate::session::ClientId;
use async_trait::async_trait;
use tokio::sync::oneshot;
use typed_builder::TypedBuilder;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, CrawlError>;

/// Session context handed to the crawler backend with a delegation.
#[derive(Debug, Clone, TypedBuilder)]
pub struct CrawlContext {
    pub pid: Pid,
    pub url: String,
    pub uuid: Uuid,
    pub client_id: ClientId,
}

impl CrawlContext {
    /// Builds a context from a parsed listing and the requesting client.
    pub fn for_listing(listing: &ListingId, client_id: ClientId) -> Self {
        Self::builder()
            .pid(listing.pid().clone())
            .url(listing.url().to_string())
            .uuid(listing.uuid())
            .client_id(client_id)
            .build()
    }
}

/// One-shot completion notifier for a delegated crawl.
///
/// Fires exactly once per delegation, success or failure. If the sender is
/// dropped without firing, the coordinator treats the crawl as failed.
pub type CrawlTicket = oneshot::Receiver<Result<ArchiveRecord>>;

/// The external crawling backend.
///
/// `archive` returns quickly with a completion ticket; the fetch/archive
/// work itself runs asynchronously and may take arbitrarily long.
#[async_trait]
pub trait Crawler: Send + Sync + 'static {
    async fn archive(&self, ctx: CrawlContext) -> Result<CrawlTicket>;
}
