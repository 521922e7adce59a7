//! WebSocket gateway for the Clipline archive coordination service.
//!
//! Hosts the persistent, bidirectional client sessions: each connection
//! gets an outbox registered with the broadcast hub, inbound events are
//! dispatched to the coordinator and synchronizer, and outbound events
//! are drained back over the socket.

pub mod app;
pub mod state;
pub mod ws;

pub use app::App;
pub use state::AppState;
