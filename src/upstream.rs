use reqwest::{Client, Response, header};
use tracing::debug;

use crate::{config::AppConfig, error::RelayError, summarize::SummarizeRequest};

pub const ACCEPT_TEXT: &str = "text/plain; charset=utf-8";

/// Owns the pooled HTTP client used to reach the summarization service.
pub struct UpstreamClient {
    http: Client,
    endpoint: String,
}

impl UpstreamClient {
    pub fn new(config: &AppConfig) -> Result<Self, RelayError> {
        // No overall or read timeout: summaries stream for as long as they take.
        let http = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()?;
        let endpoint = format!("{}/summarize", config.api_url.trim_end_matches('/'));

        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends the request and returns as soon as the response head arrives.
    /// The body is left unread for the caller to stream.
    pub async fn summarize(&self, request: &SummarizeRequest) -> Result<Response, RelayError> {
        debug!(endpoint = %self.endpoint, "posting to upstream");
        let response = self
            .http
            .post(&self.endpoint)
            .header(header::ACCEPT, ACCEPT_TEXT)
            .json(request)
            .send()
            .await?;
        Ok(response)
    }
}
