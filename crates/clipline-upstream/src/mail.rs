use async_trait::async_trait;
use clipline_core::error::UpstreamError;
use clipline_core::{MailingList, SubscribeOutcome};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Serialize)]
struct SubscribeBody<'a> {
    email: &'a str,
}

/// HTTP client for the mailing-list subscription service.
#[derive(Debug, Clone)]
pub struct HttpMailingList {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMailingList {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl MailingList for HttpMailingList {
    async fn subscribe(&self, email: &str) -> Result<SubscribeOutcome, UpstreamError> {
        let endpoint = format!("{}/subscribe", self.base_url.trim_end_matches('/'));
        debug!("subscribing contact to daily list");

        let resp = self
            .client
            .post(&endpoint)
            .json(&SubscribeBody { email })
            .send()
            .await
            .map_err(|e| UpstreamError::Unavailable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(UpstreamError::Api {
                status: status.as_u16(),
                message,
            });
        }

        resp.json::<SubscribeOutcome>()
            .await
            .map_err(|e| UpstreamError::InvalidData(e.to_string()))
    }
}
