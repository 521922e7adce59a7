use crate::error::UpstreamError;
use crate::record::DiscussionRecord;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, UpstreamError>;

/// The external discussion platform.
#[async_trait]
pub trait DiscussionSource: Send + Sync + 'static {
    /// Fetches up to `last` recent discussion records.
    async fn recent(&self, last: usize) -> Result<Vec<DiscussionRecord>>;

    /// Fetches a single discussion by id. `Ok(None)` if it does not exist.
    async fn by_id(&self, id: &str) -> Result<Option<DiscussionRecord>>;
}
