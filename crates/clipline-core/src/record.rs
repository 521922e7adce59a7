use crate::listing::Pid;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// An archived listing as produced by the crawler backend.
///
/// The payload is opaque to the coordinator; it is stored serialized and
/// handed back to clients untouched. A record lives in exactly one cache
/// tier at a time under correct operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveRecord {
    pub pid: Pid,
    pub url: String,
    pub archived_at: Timestamp,
    pub payload: serde_json::Value,
}

/// A community discussion tied to a listing by title (the title is the pid
/// text). The `url` field is populated transiently by joining against the
/// hot cache tier and is never persisted back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionRecord {
    pub id: String,
    pub title: String,
    pub total_comment_count: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}
