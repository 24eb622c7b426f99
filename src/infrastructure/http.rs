use crate::domain::ports::Transport;
use crate::error::{NotifyError, RelayError, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// `Transport` backed by a shared `reqwest::Client`.
///
/// Every request is bounded by the client timeout; connect, DNS and timeout
/// failures all surface as `RelayError::TransportError`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(NotifyError::from)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post_json(&self, url: &str, body: String) -> std::result::Result<u16, RelayError> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                let kind = if e.is_timeout() {
                    "timeout"
                } else if e.is_connect() {
                    "connect"
                } else {
                    "request"
                };
                RelayError::TransportError(format!("{} failure: {}", kind, e))
            })?;

        Ok(response.status().as_u16())
    }
}
