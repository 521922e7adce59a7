use crate::error::UpstreamError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, UpstreamError>;

/// Outcome of a mailing-list subscription attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscribeOutcome {
    pub accepted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// The external mailing-list subscription service.
#[async_trait]
pub trait MailingList: Send + Sync + 'static {
    async fn subscribe(&self, email: &str) -> Result<SubscribeOutcome>;
}
