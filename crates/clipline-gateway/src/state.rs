use std::sync::Arc;

use clipline_core::ArchiveCache;
use clipline_coordinator::{
    ArchiveCoordinator, BroadcastHub, DiscussionSynchronizer, SessionRegistry,
};
use clipline_upstream::{HttpCrawler, HttpDiscussionSource, HttpMailingList};

/// Shared gateway state, generic over the cache backend the binary was
/// started with.
pub struct AppState<C> {
    pub coordinator: Arc<ArchiveCoordinator<C, HttpCrawler, BroadcastHub>>,
    pub synchronizer: Arc<DiscussionSynchronizer<C, HttpDiscussionSource, BroadcastHub>>,
    pub sessions: Arc<SessionRegistry<C>>,
    pub mail: Arc<HttpMailingList>,
    pub hub: Arc<BroadcastHub>,
}

impl<C: ArchiveCache> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            coordinator: Arc::clone(&self.coordinator),
            synchronizer: Arc::clone(&self.synchronizer),
            sessions: Arc::clone(&self.sessions),
            mail: Arc::clone(&self.mail),
            hub: Arc::clone(&self.hub),
        }
    }
}
