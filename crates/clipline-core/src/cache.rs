use crate::error::CacheError;
use crate::listing::Pid;
use crate::record::ArchiveRecord;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, CacheError>;

/// Gateway to the two-tier archive cache and its side indexes.
///
/// Every operation is a single round trip to the backing store; no
/// transaction spans multiple keys. Cross-key sequences (hot then cold)
/// may observe a record moving between the tiers, which is acceptable.
#[async_trait]
pub trait ArchiveCache: Send + Sync + 'static {
    /// Reads the hot (recently archived) tier.
    async fn get_hot(&self, pid: &Pid) -> Result<Option<ArchiveRecord>>;

    /// Reads the cold (demoted/historical) tier.
    async fn get_cold(&self, pid: &Pid) -> Result<Option<ArchiveRecord>>;

    /// Writes to the hot tier only. Demotion policy is external.
    async fn store(&self, pid: &Pid, record: &ArchiveRecord) -> Result<()>;

    /// Positional multi-get against the hot tier.
    ///
    /// An entry that is missing or fails to parse yields `None` at its
    /// position; callers joining against this are best-effort by design.
    async fn get_hot_many(&self, pids: &[String]) -> Result<Vec<Option<ArchiveRecord>>>;

    /// Returns the shared recent-activity index.
    async fn recent_listings(&self) -> Result<Vec<String>>;

    /// Appends a pid to the recent-activity index.
    async fn add_recent_listing(&self, pid: &Pid) -> Result<()>;

    /// Reads the comment count stored for a discussion title.
    async fn comment_count(&self, pid: &str) -> Result<Option<i64>>;

    /// Persists a comment count keyed by discussion title (== pid text).
    async fn set_comment_count(&self, pid: &str, count: i64) -> Result<()>;

    /// Deletes all session-scoped keys. Returns how many were removed.
    /// Individual deletion failures are logged by implementations, not
    /// propagated.
    async fn purge_session_keys(&self) -> Result<usize>;

    /// Looks a pid up in the hot tier, then the cold tier.
    ///
    /// A cold hit is NOT promoted back to the hot tier. Whether cold is
    /// permanently archival or should feed back into hot is an open
    /// product question; until it is answered this reads both tiers and
    /// leaves them untouched.
    async fn lookup(&self, pid: &Pid) -> Result<Option<ArchiveRecord>> {
        if let Some(record) = self.get_hot(pid).await? {
            return Ok(Some(record));
        }
        self.get_cold(pid).await
    }
}
