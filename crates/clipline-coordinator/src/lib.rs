//! Archive coordination for Clipline.
//!
//! This crate owns the request lifecycle for "archive this listing":
//! cache lookup, in-flight deduplication, delegation to the crawler
//! backend, and result fanout to every subscribed connection. It also
//! hosts the discussion synchronizer, the session registry, and the
//! broadcast hub the gateway publishes through.

pub mod coordinator;
pub mod discussion;
pub mod error;
pub mod fanout;
pub mod inflight;
pub mod session;

pub use coordinator::ArchiveCoordinator;
pub use discussion::DiscussionSynchronizer;
pub use error::{ArchiveError, Result};
pub use fanout::BroadcastHub;
pub use inflight::{InFlightTable, Registration};
pub use session::SessionRegistry;
