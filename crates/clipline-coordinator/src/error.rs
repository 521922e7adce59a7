use clipline_core::{CacheError, CoreError, ServerEvent};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ArchiveError>;

#[derive(Debug, Clone, Error)]
pub enum ArchiveError {
    #[error("invalid listing: {0}")]
    InvalidListing(String),
    #[error("crawl failed: {0}")]
    CrawlFailed(String),
    #[error("crawl timed out")]
    CrawlTimeout,
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error("upstream unavailable: {0}")]
    Upstream(String),
}

impl From<CoreError> for ArchiveError {
    fn from(value: CoreError) -> Self {
        match value {
            CoreError::InvalidListing(message) => Self::InvalidListing(message),
        }
    }
}

impl ArchiveError {
    /// Wire identifier for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidListing(_) => "invalidListing",
            Self::CrawlFailed(_) => "crawlFailure",
            Self::CrawlTimeout => "crawlTimeout",
            Self::Cache(_) | Self::Upstream(_) => "upstreamUnavailable",
        }
    }

    /// Renders the error as an outbound event for the affected connection.
    pub fn to_event(&self) -> ServerEvent {
        ServerEvent::error(self.kind(), self.to_string())
    }
}
