use async_trait::async_trait;
use clipline_core::cache::Result;
use clipline_core::{ArchiveCache, ArchiveRecord, CacheError, Pid};
use redis::AsyncCommands;
use tracing::{debug, trace, warn};

/// Hash holding recently archived records, keyed by pid.
const HOT_TIER_KEY: &str = "archives";
/// Hash holding demoted/historical records, keyed by pid.
const COLD_TIER_KEY: &str = "archives-older";
/// Set of recently archived pids, shared across all sessions.
const RECENT_LISTINGS_KEY: &str = "recent_listings";
/// Hash of comment counts keyed by discussion title (== pid text).
const COMMENT_COUNT_KEY: &str = "commented";
/// Pattern matching session-scoped keys removed on process cleanup.
const SESSION_KEY_PATTERN: &str = "clients-*";

fn map_redis_error(operation: &str, err: redis::RedisError) -> CacheError {
    let message = format!("{operation}: {err}");
    if message.to_ascii_lowercase().contains("timed out") {
        CacheError::Timeout(message)
    } else {
        CacheError::Operation(message)
    }
}

fn decode_record(pid: &str, raw: &str) -> Result<ArchiveRecord> {
    serde_json::from_str::<ArchiveRecord>(raw).map_err(|e| {
        warn!(pid = %pid, error = %e, "Failed to deserialize cached archive record");
        CacheError::InvalidData(format!("invalid cached record for pid '{pid}': {e}"))
    })
}

/// Redis-backed implementation of [`ArchiveCache`].
///
/// Records are stored as JSON strings in one hash per tier; the recent
/// listings index is a set and comment counts are a separate hash. All
/// atomicity comes from Redis's native single-key operations.
#[derive(Debug, Clone)]
pub struct RedisArchiveCache {
    conn: redis::aio::MultiplexedConnection,
}

impl RedisArchiveCache {
    /// Creates a new Redis archive cache over a multiplexed connection.
    pub fn new(conn: redis::aio::MultiplexedConnection) -> Self {
        Self { conn }
    }

    async fn get_tier(&self, tier: &str, pid: &Pid) -> Result<Option<ArchiveRecord>> {
        trace!(pid = %pid, tier = tier, "Fetching archive record from Redis");

        let mut conn = self.conn.clone();
        match conn.hget::<_, _, Option<String>>(tier, pid.as_str()).await {
            Ok(Some(raw)) => {
                debug!(pid = %pid, tier = tier, "Cache hit in Redis");
                decode_record(pid.as_str(), &raw).map(Some)
            }
            Ok(None) => {
                trace!(pid = %pid, tier = tier, "Cache miss in Redis");
                Ok(None)
            }
            Err(e) => {
                warn!(pid = %pid, tier = tier, error = %e, "Redis error on HGET");
                Err(map_redis_error("failed to fetch record from Redis", e))
            }
        }
    }
}

#[async_trait]
impl ArchiveCache for RedisArchiveCache {
    async fn get_hot(&self, pid: &Pid) -> Result<Option<ArchiveRecord>> {
        self.get_tier(HOT_TIER_KEY, pid).await
    }

    async fn get_cold(&self, pid: &Pid) -> Result<Option<ArchiveRecord>> {
        self.get_tier(COLD_TIER_KEY, pid).await
    }

    async fn store(&self, pid: &Pid, record: &ArchiveRecord) -> Result<()> {
        trace!(pid = %pid, "Storing archive record in Redis hot tier");

        let json = serde_json::to_string(record).map_err(|e| {
            CacheError::Serialization(format!("failed to serialize record for pid '{pid}': {e}"))
        })?;

        let mut conn = self.conn.clone();
        conn.hset::<_, _, _, ()>(HOT_TIER_KEY, pid.as_str(), json)
            .await
            .map_err(|e| {
                warn!(pid = %pid, error = %e, "Failed to store record in Redis");
                map_redis_error("failed to write record to Redis", e)
            })?;

        debug!(pid = %pid, "Stored record in hot tier");
        Ok(())
    }

    async fn get_hot_many(&self, pids: &[String]) -> Result<Vec<Option<ArchiveRecord>>> {
        if pids.is_empty() {
            return Ok(Vec::new());
        }
        trace!(count = pids.len(), "Multi-fetching archive records from Redis");

        let mut conn = self.conn.clone();
        let raw: Vec<Option<String>> = redis::cmd("HMGET")
            .arg(HOT_TIER_KEY)
            .arg(pids)
            .query_async(&mut conn)
            .await
            .map_err(|e| map_redis_error("failed to multi-fetch records from Redis", e))?;

        // Positional best-effort decode: a malformed entry is a miss for
        // the join, not an error for the whole batch.
        let records = raw
            .into_iter()
            .zip(pids)
            .map(|(value, pid)| {
                value.and_then(|raw| match decode_record(pid, &raw) {
                    Ok(record) => Some(record),
                    Err(_) => None,
                })
            })
            .collect();
        Ok(records)
    }

    async fn recent_listings(&self) -> Result<Vec<String>> {
        let mut conn = self.conn.clone();
        conn.smembers::<_, Vec<String>>(RECENT_LISTINGS_KEY)
            .await
            .map_err(|e| map_redis_error("failed to fetch recent listings from Redis", e))
    }

    async fn add_recent_listing(&self, pid: &Pid) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.sadd::<_, _, ()>(RECENT_LISTINGS_KEY, pid.as_str())
            .await
            .map_err(|e| map_redis_error("failed to append recent listing to Redis", e))
    }

    async fn comment_count(&self, pid: &str) -> Result<Option<i64>> {
        let mut conn = self.conn.clone();
        conn.hget::<_, _, Option<i64>>(COMMENT_COUNT_KEY, pid)
            .await
            .map_err(|e| map_redis_error("failed to fetch comment count from Redis", e))
    }

    async fn set_comment_count(&self, pid: &str, count: i64) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.hset::<_, _, _, ()>(COMMENT_COUNT_KEY, pid, count)
            .await
            .map_err(|e| map_redis_error("failed to write comment count to Redis", e))
    }

    async fn purge_session_keys(&self) -> Result<usize> {
        let mut conn = self.conn.clone();
        let keys: Vec<String> = conn
            .keys(SESSION_KEY_PATTERN)
            .await
            .map_err(|e| map_redis_error("failed to enumerate session keys in Redis", e))?;

        let mut purged = 0;
        for key in keys {
            match conn.del::<_, ()>(&key).await {
                Ok(()) => purged += 1,
                Err(e) => {
                    // Fire-and-forget cleanup: log and keep going.
                    warn!(key = %key, error = %e, "Failed to delete session key");
                }
            }
        }

        debug!(purged = purged, "Purged session keys");
        Ok(purged)
    }
}
