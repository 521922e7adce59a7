//! HTTP clients for Clipline's external collaborators.
//!
//! Each client implements one of the narrow contracts from
//! `clipline-core`: the crawler backend, the discussion source, and the
//! mailing-list service. All of them are plain reqwest clients; retry
//! policy, if any, belongs to the collaborators themselves.

pub mod crawler;
pub mod discussions;
pub mod mail;

pub use crawler::HttpCrawler;
pub use discussions::HttpDiscussionSource;
pub use mail::HttpMailingList;
