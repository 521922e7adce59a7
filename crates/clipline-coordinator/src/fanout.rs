use clipline_core::{ClientId, ConnectionHandle, Fanout, ServerEvent};
use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::trace;

/// Registry of connected sessions' outboxes, implementing [`Fanout`].
///
/// Each connection registers an unbounded mpsc outbox on connect and is
/// removed on disconnect. Broadcasts walk the registry and clone the event
/// per connection; sends to outboxes whose reader is gone are dropped
/// silently, matching the no-acknowledgment contract.
#[derive(Debug, Default)]
pub struct BroadcastHub {
    connections: DashMap<ClientId, mpsc::UnboundedSender<ServerEvent>>,
}

impl BroadcastHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a connection, returning its handle and the receiving end
    /// of its outbox. The caller drains the receiver into the transport.
    pub fn register(
        &self,
        client_id: ClientId,
    ) -> (ConnectionHandle, mpsc::UnboundedReceiver<ServerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        self.connections.insert(client_id.clone(), tx.clone());
        (ConnectionHandle::new(client_id, tx), rx)
    }

    /// Removes a connection from the namespace.
    pub fn unregister(&self, client_id: &ClientId) {
        self.connections.remove(client_id);
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

impl Fanout for BroadcastHub {
    fn emit(&self, conn: &ConnectionHandle, event: ServerEvent) {
        trace!(client_id = %conn.client_id(), "emitting event to requester");
        conn.send(event);
    }

    fn emit_all(&self, event: ServerEvent) {
        trace!(connections = self.connections.len(), "broadcasting event");
        for entry in self.connections.iter() {
            let _ = entry.value().send(event.clone());
        }
    }
}
