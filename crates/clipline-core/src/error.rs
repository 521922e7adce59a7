use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Clone, Error)]
pub enum CoreError {
    #[error("invalid listing: {0}")]
    InvalidListing(String),
}

#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
    #[error("cache operation timed out: {0}")]
    Timeout(String),
    #[error("cache serialization failed: {0}")]
    Serialization(String),
    #[error("cache value is invalid: {0}")]
    InvalidData(String),
    #[error("cache operation failed: {0}")]
    Operation(String),
}

#[derive(Debug, Clone, Error)]
pub enum CrawlError {
    #[error("crawler backend unavailable: {0}")]
    Unavailable(String),
    #[error("crawl failed: {0}")]
    Failed(String),
}

#[derive(Debug, Clone, Error)]
pub enum UpstreamError {
    #[error("upstream unavailable: {0}")]
    Unavailable(String),
    #[error("upstream returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("upstream response is invalid: {0}")]
    InvalidData(String),
}
