//! End-to-end coverage of the archive fanout protocol over the in-memory
//! cache, a scripted crawler, and the broadcast hub.

use async_trait::async_trait;
use clipline_cache::InMemoryArchiveCache;
use clipline_coordinator::{ArchiveCoordinator, BroadcastHub, DiscussionSynchronizer};
use clipline_core::error::{CrawlError, UpstreamError};
use clipline_core::{
    ArchiveCache, ArchiveRecord, ClientId, ConnectionHandle, CrawlContext, CrawlTicket, Crawler,
    DiscussionRecord, DiscussionSource, Pid, ServerEvent,
};
use jiff::Timestamp;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

type CrawlOutcome = Result<ArchiveRecord, CrawlError>;

#[derive(Default)]
struct ScriptedCrawler {
    delegations: AtomicUsize,
    pending: Mutex<Vec<(Pid, oneshot::Sender<CrawlOutcome>)>>,
}

impl ScriptedCrawler {
    fn delegations(&self) -> usize {
        self.delegations.load(Ordering::SeqCst)
    }

    fn complete(&self, pid: &Pid) {
        let mut pending = self.pending.lock().unwrap();
        let index = pending
            .iter()
            .position(|(p, _)| p == pid)
            .expect("no pending crawl for pid");
        let (_, tx) = pending.swap_remove(index);
        let _ = tx.send(Ok(record(pid.as_str())));
    }
}

#[async_trait]
impl Crawler for ScriptedCrawler {
    async fn archive(&self, ctx: CrawlContext) -> Result<CrawlTicket, CrawlError> {
        self.delegations.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = oneshot::channel();
        self.pending.lock().unwrap().push((ctx.pid, tx));
        Ok(rx)
    }
}

struct ScriptedDiscussions {
    records: Vec<DiscussionRecord>,
}

#[async_trait]
impl DiscussionSource for ScriptedDiscussions {
    async fn recent(&self, last: usize) -> Result<Vec<DiscussionRecord>, UpstreamError> {
        Ok(self.records.iter().take(last).cloned().collect())
    }

    async fn by_id(&self, id: &str) -> Result<Option<DiscussionRecord>, UpstreamError> {
        Ok(self.records.iter().find(|d| d.id == id).cloned())
    }
}

fn record(p: &str) -> ArchiveRecord {
    ArchiveRecord {
        pid: Pid::new(p).unwrap(),
        url: format!("https://host.example/vgm/d/some-title/{p}.htm"),
        archived_at: Timestamp::UNIX_EPOCH,
        payload: serde_json::json!({"title": "road bike"}),
    }
}

fn listing_url(p: &str) -> String {
    format!("https://host.example/vgm/d/some-title/{p}.htm")
}

struct World {
    cache: Arc<InMemoryArchiveCache>,
    crawler: Arc<ScriptedCrawler>,
    hub: Arc<BroadcastHub>,
    coordinator: ArchiveCoordinator<InMemoryArchiveCache, ScriptedCrawler, BroadcastHub>,
    synchronizer: DiscussionSynchronizer<InMemoryArchiveCache, ScriptedDiscussions, BroadcastHub>,
}

impl World {
    fn new(discussions: Vec<DiscussionRecord>) -> Self {
        let cache = Arc::new(InMemoryArchiveCache::new());
        let crawler = Arc::new(ScriptedCrawler::default());
        let hub = Arc::new(BroadcastHub::new());
        let coordinator = ArchiveCoordinator::new(
            Arc::clone(&cache),
            Arc::clone(&crawler),
            Arc::clone(&hub),
        );
        let synchronizer = DiscussionSynchronizer::new(
            Arc::clone(&cache),
            Arc::new(ScriptedDiscussions {
                records: discussions,
            }),
            Arc::clone(&hub),
        );
        Self {
            cache,
            crawler,
            hub,
            coordinator,
            synchronizer,
        }
    }

    fn connect(&self, id: &str) -> (ConnectionHandle, mpsc::UnboundedReceiver<ServerEvent>) {
        self.hub.register(ClientId::new(id))
    }
}

#[tokio::test]
async fn shared_recent_view_stays_consistent_across_sessions() {
    let world = World::new(vec![]);
    let (requester, mut rx) = world.connect("c1");
    let (_watcher, mut watcher_rx) = world.connect("c2");

    world
        .coordinator
        .archive(&listing_url("7512345678"), &requester)
        .await
        .unwrap();
    world.crawler.complete(&Pid::new("7512345678").unwrap());

    // The requester gets its result first, then the shared broadcast.
    assert!(matches!(rx.recv().await, Some(ServerEvent::Update { .. })));
    let ServerEvent::MostRecentListings { listings } = rx.recv().await.unwrap() else {
        panic!("expected mostRecentListings");
    };
    assert_eq!(listings, vec!["7512345678".to_string()]);

    // A session that never asked for anything sees the same view.
    let ServerEvent::MostRecentListings { listings } = watcher_rx.recv().await.unwrap() else {
        panic!("expected mostRecentListings");
    };
    assert_eq!(listings, vec!["7512345678".to_string()]);

    let recent = world.coordinator.recent_listings().await.unwrap();
    assert_eq!(recent, vec!["7512345678".to_string()]);
}

#[tokio::test]
async fn many_sessions_one_crawl() {
    let world = World::new(vec![]);
    let url = listing_url("7512345678");

    let mut receivers = Vec::new();
    let mut handles = Vec::new();
    for i in 0..8 {
        let (conn, rx) = world.connect(&format!("c{i}"));
        handles.push(conn);
        receivers.push(rx);
    }

    // All requests land before the crawl completes; only the first one
    // may delegate.
    for conn in &handles {
        world.coordinator.archive(&url, conn).await.unwrap();
    }

    assert_eq!(world.crawler.delegations(), 1);
    world.crawler.complete(&Pid::new("7512345678").unwrap());

    for rx in &mut receivers {
        let ServerEvent::Update { archived } = rx.recv().await.unwrap() else {
            panic!("expected update");
        };
        assert_eq!(archived.pid.as_str(), "7512345678");
    }
}

#[tokio::test]
async fn archive_then_discussion_join_links_the_url() {
    let world = World::new(vec![
        DiscussionRecord {
            id: "d1".to_string(),
            title: "7512345678".to_string(),
            total_comment_count: 2,
            url: None,
        },
        DiscussionRecord {
            id: "d2".to_string(),
            title: "7599999999".to_string(),
            total_comment_count: 0,
            url: None,
        },
    ]);
    let (requester, mut rx) = world.connect("c1");

    world
        .coordinator
        .archive(&listing_url("7512345678"), &requester)
        .await
        .unwrap();
    world.crawler.complete(&Pid::new("7512345678").unwrap());
    let _ = rx.recv().await; // update
    let _ = rx.recv().await; // mostRecentListings

    let joined = world.synchronizer.list_recent(5).await.unwrap();
    assert_eq!(joined[0].url.as_deref(), Some(listing_url("7512345678").as_str()));
    assert!(joined[1].url.is_none());

    let ServerEvent::MostRecentDiscussions { discussions } = rx.recv().await.unwrap() else {
        panic!("expected mostRecentDiscussions");
    };
    assert_eq!(discussions, joined);
}

#[tokio::test]
async fn comment_update_follows_an_archive() {
    let world = World::new(vec![DiscussionRecord {
        id: "d1".to_string(),
        title: "7512345678".to_string(),
        total_comment_count: 2,
        url: None,
    }]);
    let (_conn, mut rx) = world.connect("c1");

    let applied = world.synchronizer.apply_update("d1", 9).await.unwrap();
    assert!(applied);

    let ServerEvent::UpdatedDiscussion { discussion } = rx.recv().await.unwrap() else {
        panic!("expected updatedDiscussion");
    };
    assert_eq!(discussion.total_comment_count, 9);
    assert_eq!(
        world.cache.comment_count("7512345678").await.unwrap(),
        Some(9)
    );
}
