use crate::record::{ArchiveRecord, DiscussionRecord};
use serde::{Deserialize, Serialize};

/// Inbound events, one per wire event name.
///
/// Malformed payloads fail deserialization here and never reach the
/// business logic.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    #[serde(rename = "archive")]
    Archive { url: String },
    #[serde(rename = "getArchive")]
    GetArchive { pid: String },
    #[serde(rename = "getMostRecentListings")]
    GetMostRecentListings,
    #[serde(rename = "getMostRecentDiscussions")]
    GetMostRecentDiscussions { last: usize },
    #[serde(rename = "updateDiscussion", rename_all = "camelCase")]
    UpdateDiscussion { id: String, total_comment_count: i64 },
    #[serde(rename = "subscribe-daily")]
    SubscribeDaily { email: String },
    /// Present on the wire with no defined behavior; handled as a no-op.
    #[serde(rename = "clearEmergencyAlert")]
    ClearEmergencyAlert { id: String },
}

/// Outbound events, emitted either to the requesting connection or to the
/// whole namespace. Ordering is only guaranteed per connection, in send
/// order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    #[serde(rename = "update")]
    Update { archived: ArchiveRecord },
    #[serde(rename = "archive")]
    Archive {
        pid: String,
        record: Option<ArchiveRecord>,
    },
    #[serde(rename = "mostRecentListings")]
    MostRecentListings { listings: Vec<String> },
    #[serde(rename = "mostRecentDiscussions")]
    MostRecentDiscussions { discussions: Vec<DiscussionRecord> },
    #[serde(rename = "updatedDiscussion")]
    UpdatedDiscussion { discussion: DiscussionRecord },
    #[serde(rename = "subscribeDaily")]
    SubscribeDaily {
        accepted: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    #[serde(rename = "error")]
    Error { kind: String, message: String },
}

impl ServerEvent {
    pub fn error(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_event_parses() {
        let event: ClientEvent = serde_json::from_str(
            r#"{"event": "archive", "data": {"url": "https://host.example/a/7512345678.htm"}}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            ClientEvent::Archive {
                url: "https://host.example/a/7512345678.htm".to_string()
            }
        );
    }

    #[test]
    fn unit_event_parses_without_data() {
        let event: ClientEvent =
            serde_json::from_str(r#"{"event": "getMostRecentListings"}"#).unwrap();
        assert_eq!(event, ClientEvent::GetMostRecentListings);
    }

    #[test]
    fn update_discussion_uses_camel_case() {
        let event: ClientEvent = serde_json::from_str(
            r#"{"event": "updateDiscussion", "data": {"id": "d1", "totalCommentCount": 7}}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            ClientEvent::UpdateDiscussion {
                id: "d1".to_string(),
                total_comment_count: 7
            }
        );
    }

    #[test]
    fn subscribe_daily_keeps_hyphenated_name() {
        let event: ClientEvent = serde_json::from_str(
            r#"{"event": "subscribe-daily", "data": {"email": "a@b.example"}}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            ClientEvent::SubscribeDaily {
                email: "a@b.example".to_string()
            }
        );
    }

    #[test]
    fn unknown_event_is_rejected() {
        let result: Result<ClientEvent, _> =
            serde_json::from_str(r#"{"event": "dropTables", "data": {}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn server_event_is_tagged() {
        let json =
            serde_json::to_value(ServerEvent::MostRecentListings { listings: vec![] }).unwrap();
        assert_eq!(json["event"], "mostRecentListings");
        assert!(json["data"]["listings"].is_array());
    }

    #[test]
    fn error_event_serializes_kind() {
        let json = serde_json::to_value(ServerEvent::error("invalidListing", "bad pid")).unwrap();
        assert_eq!(json["event"], "error");
        assert_eq!(json["data"]["kind"], "invalidListing");
    }
}
