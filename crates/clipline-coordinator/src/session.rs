use clipline_core::{ArchiveCache, ClientId};
use std::sync::Arc;
use tracing::{info, warn};

const UNKNOWN_ADDR: &str = "unknown";

/// Derives per-connection client identities and owns the process-wide
/// session cleanup.
pub struct SessionRegistry<C> {
    cache: Arc<C>,
}

impl<C: ArchiveCache> SessionRegistry<C> {
    pub fn new(cache: Arc<C>) -> Self {
        Self { cache }
    }

    /// Builds the correlation key for a connection from its forwarded
    /// address and assigned session token. Never used for authorization.
    pub fn identify(&self, forwarded_addr: Option<&str>, session_token: &str) -> ClientId {
        let addr = forwarded_addr.unwrap_or(UNKNOWN_ADDR);
        ClientId::new(format!("{addr}_{session_token}"))
    }

    /// Deletes every session-scoped cache key. Fire-and-forget: failures
    /// are logged, never propagated.
    pub async fn purge_all(&self) {
        match self.cache.purge_session_keys().await {
            Ok(purged) => info!(purged = purged, "purged session keys"),
            Err(e) => warn!(error = %e, "session key purge failed"),
        }
    }
}
