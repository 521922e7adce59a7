use async_trait::async_trait;
use clipline_core::error::UpstreamError;
use clipline_core::{DiscussionRecord, DiscussionSource};
use reqwest::StatusCode;
use tracing::trace;

/// HTTP client for the discussion platform.
#[derive(Debug, Clone)]
pub struct HttpDiscussionSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDiscussionSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, UpstreamError> {
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(UpstreamError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(resp)
    }
}

/// The `last` parameter is forwarded upstream, but the bound must hold
/// even when the upstream ignores it.
fn clamp_to_requested(mut discussions: Vec<DiscussionRecord>, last: usize) -> Vec<DiscussionRecord> {
    discussions.truncate(last);
    discussions
}

#[async_trait]
impl DiscussionSource for HttpDiscussionSource {
    async fn recent(&self, last: usize) -> Result<Vec<DiscussionRecord>, UpstreamError> {
        let endpoint = format!("{}/discussions", self.base_url.trim_end_matches('/'));
        trace!(last = last, "fetching recent discussions");

        let resp = self
            .client
            .get(&endpoint)
            .query(&[("last", last)])
            .send()
            .await
            .map_err(|e| UpstreamError::Unavailable(e.to_string()))?;

        Self::check(resp)
            .await?
            .json::<Vec<DiscussionRecord>>()
            .await
            .map(|discussions| clamp_to_requested(discussions, last))
            .map_err(|e| UpstreamError::InvalidData(e.to_string()))
    }

    async fn by_id(&self, id: &str) -> Result<Option<DiscussionRecord>, UpstreamError> {
        let endpoint = format!("{}/discussions/{}", self.base_url.trim_end_matches('/'), id);

        let resp = self
            .client
            .get(&endpoint)
            .send()
            .await
            .map_err(|e| UpstreamError::Unavailable(e.to_string()))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        Self::check(resp)
            .await?
            .json::<DiscussionRecord>()
            .await
            .map(Some)
            .map_err(|e| UpstreamError::InvalidData(e.to_string()))
    }
}
