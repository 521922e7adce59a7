//! Core types and traits for the Clipline archive coordination service.
//!
//! This crate provides the shared domain model (listing identity, archive
//! and discussion records, session events) and the collaborator contracts
//! consumed by the coordinator: the cache gateway, the crawler backend,
//! the discussion source, and the mailing-list service.

pub mod cache;
pub mod crawler;
pub mod discussion;
pub mod error;
pub mod events;
pub mod fanout;
pub mod listing;
pub mod mail;
pub mod record;
pub mod session;

pub use cache::ArchiveCache;
pub use crawler::{CrawlContext, CrawlTicket, Crawler};
pub use discussion::DiscussionSource;
pub use error::{CacheError, CoreError, CrawlError, UpstreamError};
pub use events::{ClientEvent, ServerEvent};
pub use fanout::Fanout;
pub use listing::{ListingId, Pid};
pub use mail::{MailingList, SubscribeOutcome};
pub use record::{ArchiveRecord, DiscussionRecord};
pub use session::{ClientId, ConnectionHandle};
