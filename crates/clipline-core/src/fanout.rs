use crate::events::ServerEvent;
use crate::session::ConnectionHandle;

/// Publishes events to one connection or to every connection.
///
/// Two primitives only: no partial-group broadcast, no delivery
/// acknowledgment. Ordering is guaranteed per connection in send order;
/// nothing is guaranteed across distinct connections or event types.
pub trait Fanout: Send + Sync + 'static {
    /// Emits an event to the requesting connection only.
    fn emit(&self, conn: &ConnectionHandle, event: ServerEvent);

    /// Emits an event to every connection in the namespace.
    fn emit_all(&self, event: ServerEvent);
}
