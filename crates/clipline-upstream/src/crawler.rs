use async_trait::async_trait;
use clipline_core::error::CrawlError;
use clipline_core::{ArchiveRecord, CrawlContext, CrawlTicket, Crawler};
use serde::Serialize;
use tokio::sync::oneshot;
use tracing::{debug, warn};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CrawlRequestBody {
    pid: String,
    url: String,
    uuid: String,
    client_id: String,
}

impl From<&CrawlContext> for CrawlRequestBody {
    fn from(ctx: &CrawlContext) -> Self {
        Self {
            pid: ctx.pid.as_str().to_string(),
            url: ctx.url.clone(),
            uuid: ctx.uuid.to_string(),
            client_id: ctx.client_id.as_str().to_string(),
        }
    }
}

/// HTTP client for the crawler backend.
///
/// The delegation call returns immediately with a one-shot ticket; a
/// spawned task performs the long-poll request and forwards exactly one
/// outcome over the ticket. The crawler applies no timeout of its own;
/// the coordinator bounds the wait.
#[derive(Debug, Clone)]
pub struct HttpCrawler {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCrawler {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn run(
        client: reqwest::Client,
        endpoint: String,
        body: CrawlRequestBody,
    ) -> Result<ArchiveRecord, CrawlError> {
        let resp = client
            .post(&endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| CrawlError::Unavailable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(CrawlError::Failed(format!(
                "crawler returned {status}: {message}"
            )));
        }

        resp.json::<ArchiveRecord>()
            .await
            .map_err(|e| CrawlError::Failed(format!("invalid crawler response: {e}")))
    }
}

#[async_trait]
impl Crawler for HttpCrawler {
    async fn archive(&self, ctx: CrawlContext) -> Result<CrawlTicket, CrawlError> {
        let endpoint = format!("{}/v1/archive", self.base_url.trim_end_matches('/'));
        let body = CrawlRequestBody::from(&ctx);
        debug!(pid = %ctx.pid, "delegating crawl to backend");

        let (tx, rx) = oneshot::channel();
        let client = self.client.clone();
        let pid = ctx.pid.clone();
        tokio::spawn(async move {
            let outcome = Self::run(client, endpoint, body).await;
            if let Err(ref e) = outcome {
                warn!(pid = %pid, error = %e, "crawl delegation failed");
            }
            // The coordinator may have timed out and dropped the receiver.
            let _ = tx.send(outcome);
        });

        Ok(rx)
    }
}
