use crate::error::{ArchiveError, Result};
use clipline_core::{ArchiveCache, DiscussionRecord, DiscussionSource, Fanout, ServerEvent};
use std::sync::Arc;
use tracing::{debug, trace};

/// Merges the community discussion feed with known archive URLs and
/// republishes comment-count updates to every connection.
pub struct DiscussionSynchronizer<C, S, F> {
    cache: Arc<C>,
    source: Arc<S>,
    fanout: Arc<F>,
}

impl<C, S, F> DiscussionSynchronizer<C, S, F>
where
    C: ArchiveCache,
    S: DiscussionSource,
    F: Fanout,
{
    pub fn new(cache: Arc<C>, source: Arc<S>, fanout: Arc<F>) -> Self {
        Self {
            cache,
            source,
            fanout,
        }
    }

    /// Fetches up to `last` discussions, joins each by title against the
    /// hot cache tier, and broadcasts the joined list.
    ///
    /// The join is best-effort: a missing or malformed cached entry just
    /// leaves `url` unset, it never fails the batch.
    pub async fn list_recent(&self, last: usize) -> Result<Vec<DiscussionRecord>> {
        trace!(last = last, "fetching recent discussions");
        let discussions = self
            .source
            .recent(last)
            .await
            .map_err(|e| ArchiveError::Upstream(e.to_string()))?;

        let titles: Vec<String> = discussions.iter().map(|d| d.title.clone()).collect();
        let archives = self.cache.get_hot_many(&titles).await?;

        let joined: Vec<DiscussionRecord> = discussions
            .into_iter()
            .zip(archives)
            .map(|(mut discussion, archive)| {
                if let Some(record) = archive {
                    if !record.url.is_empty() {
                        discussion.url = Some(record.url);
                    }
                }
                discussion
            })
            .collect();

        self.fanout.emit_all(ServerEvent::MostRecentDiscussions {
            discussions: joined.clone(),
        });
        Ok(joined)
    }

    /// Applies a comment-count update: resolves the discussion by id,
    /// broadcasts the updated record, and persists the count keyed by the
    /// discussion's title. Returns `false` (a no-op) if the discussion
    /// cannot be resolved.
    pub async fn apply_update(&self, id: &str, total_comment_count: i64) -> Result<bool> {
        let discussion = self
            .source
            .by_id(id)
            .await
            .map_err(|e| ArchiveError::Upstream(e.to_string()))?;

        let Some(mut discussion) = discussion else {
            debug!(id = id, "discussion not resolvable, skipping update");
            return Ok(false);
        };

        discussion.total_comment_count = total_comment_count;
        self.fanout.emit_all(ServerEvent::UpdatedDiscussion {
            discussion: discussion.clone(),
        });
        // The discussion title is the pid text.
        self.cache
            .set_comment_count(&discussion.title, total_comment_count)
            .await?;
        Ok(true)
    }
}
