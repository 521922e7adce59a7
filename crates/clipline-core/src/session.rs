use crate::events::ServerEvent;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tokio::sync::mpsc;

/// Correlation key for a connected client.
///
/// Built from the forwarded address and the assigned session token. Used
/// only to correlate events and in-flight subscriptions, never for
/// authorization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A handle to one connected session's outbox.
///
/// Cloneable; the coordinator keeps clones in in-flight subscriber sets.
/// Events sent through the handle are delivered to that connection in send
/// order. Sending to a closed outbox is not an error.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    client_id: ClientId,
    outbox: mpsc::UnboundedSender<ServerEvent>,
}

impl ConnectionHandle {
    pub fn new(client_id: ClientId, outbox: mpsc::UnboundedSender<ServerEvent>) -> Self {
        Self { client_id, outbox }
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    /// Queues an event for this connection. Returns `false` if the
    /// connection has already gone away.
    pub fn send(&self, event: ServerEvent) -> bool {
        self.outbox.send(event).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_delivers_in_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = ConnectionHandle::new(ClientId::new("10.0.0.1_abc"), tx);

        assert!(handle.send(ServerEvent::MostRecentListings { listings: vec![] }));
        assert!(handle.send(ServerEvent::MostRecentDiscussions {
            discussions: vec![]
        }));

        assert!(matches!(
            rx.recv().await,
            Some(ServerEvent::MostRecentListings { .. })
        ));
        assert!(matches!(
            rx.recv().await,
            Some(ServerEvent::MostRecentDiscussions { .. })
        ));
    }

    #[tokio::test]
    async fn send_to_closed_outbox_is_not_an_error() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let handle = ConnectionHandle::new(ClientId::new("10.0.0.1_abc"), tx);

        assert!(!handle.send(ServerEvent::MostRecentListings { listings: vec![] }));
    }
}
