//! Archive cache gateway implementations shared across Clipline services.
//!
//! The [`ArchiveCache`] contract lives in `clipline-core`; this crate
//! provides the Redis-backed gateway used in production and a DashMap
//! in-memory gateway used by tests and the in-memory backend.

pub mod memory;
pub mod redis;

pub use clipline_core::cache::{ArchiveCache, Result};
pub use clipline_core::CacheError;
pub use memory::InMemoryArchiveCache;
pub use redis::RedisArchiveCache;
