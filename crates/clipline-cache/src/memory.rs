use async_trait::async_trait;
use clipline_core::cache::Result;
use clipline_core::{ArchiveCache, ArchiveRecord, CacheError, Pid};
use dashmap::{DashMap, DashSet};
use tracing::warn;

/// In-memory implementation of [`ArchiveCache`] using DashMap.
///
/// Mirrors the Redis layout: records are kept as JSON strings per tier so
/// the (de)serialization path matches production, including the handling
/// of malformed cached entries. Used by tests and the in-memory backend.
#[derive(Debug, Default)]
pub struct InMemoryArchiveCache {
    hot: DashMap<String, String>,
    cold: DashMap<String, String>,
    recent: DashSet<String>,
    comment_counts: DashMap<String, i64>,
    sessions: DashMap<String, String>,
}

impl InMemoryArchiveCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the cold tier directly; test/demotion helper.
    pub fn seed_cold(&self, pid: &Pid, record: &ArchiveRecord) {
        if let Ok(json) = serde_json::to_string(record) {
            self.cold.insert(pid.as_str().to_string(), json);
        }
    }

    /// Inserts a raw (possibly malformed) hot-tier entry; test helper.
    pub fn seed_hot_raw(&self, pid: impl Into<String>, raw: impl Into<String>) {
        self.hot.insert(pid.into(), raw.into());
    }

    /// Inserts a session-scoped key, as the transport layer would.
    pub fn put_session_key(&self, key: impl Into<String>, value: impl Into<String>) {
        self.sessions.insert(key.into(), value.into());
    }

    pub fn session_key_count(&self) -> usize {
        self.sessions.len()
    }

    fn get_tier(tier: &DashMap<String, String>, pid: &Pid) -> Result<Option<ArchiveRecord>> {
        let Some(raw) = tier.get(pid.as_str()) else {
            return Ok(None);
        };
        serde_json::from_str::<ArchiveRecord>(&raw)
            .map(Some)
            .map_err(|e| {
                CacheError::InvalidData(format!("invalid cached record for pid '{pid}': {e}"))
            })
    }
}

#[async_trait]
impl ArchiveCache for InMemoryArchiveCache {
    async fn get_hot(&self, pid: &Pid) -> Result<Option<ArchiveRecord>> {
        Self::get_tier(&self.hot, pid)
    }

    async fn get_cold(&self, pid: &Pid) -> Result<Option<ArchiveRecord>> {
        Self::get_tier(&self.cold, pid)
    }

    async fn store(&self, pid: &Pid, record: &ArchiveRecord) -> Result<()> {
        let json = serde_json::to_string(record).map_err(|e| {
            CacheError::Serialization(format!("failed to serialize record for pid '{pid}': {e}"))
        })?;
        self.hot.insert(pid.as_str().to_string(), json);
        Ok(())
    }

    async fn get_hot_many(&self, pids: &[String]) -> Result<Vec<Option<ArchiveRecord>>> {
        let records = pids
            .iter()
            .map(|pid| {
                self.hot.get(pid).and_then(|raw| {
                    match serde_json::from_str::<ArchiveRecord>(&raw) {
                        Ok(record) => Some(record),
                        Err(e) => {
                            warn!(pid = %pid, error = %e, "Skipping malformed cached record");
                            None
                        }
                    }
                })
            })
            .collect();
        Ok(records)
    }

    async fn recent_listings(&self) -> Result<Vec<String>> {
        Ok(self.recent.iter().map(|pid| pid.clone()).collect())
    }

    async fn add_recent_listing(&self, pid: &Pid) -> Result<()> {
        self.recent.insert(pid.as_str().to_string());
        Ok(())
    }

    async fn comment_count(&self, pid: &str) -> Result<Option<i64>> {
        Ok(self.comment_counts.get(pid).map(|count| *count))
    }

    async fn set_comment_count(&self, pid: &str, count: i64) -> Result<()> {
        self.comment_counts.insert(pid.to_string(), count);
        Ok(())
    }

    async fn purge_session_keys(&self) -> Result<usize> {
        let purged = self.sessions.len();
        self.sessions.clear();
        Ok(purged)
    }
}
