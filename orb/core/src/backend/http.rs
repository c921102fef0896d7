//! HTTP Kernel Backend
//!
//! Talks to the kernel bridge over plain JSON-over-HTTP:
//! - `POST /chat` - one conversational turn
//! - `POST /thoughts` - store a thought
//! - `GET /` - reachability check

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::traits::{ChatReply, ChatRequest, KernelBackend, ThoughtAck, ThoughtRequest};
use crate::config::OrbConfig;
use crate::error::KernelError;

/// Kernel bridge client
#[derive(Clone)]
pub struct HttpKernelBackend {
    /// Base URL without trailing slash
    base_url: String,
    /// HTTP client
    http_client: reqwest::Client,
    /// Whole-request limit for the health check (the connect timeout)
    health_timeout: Duration,
}

impl HttpKernelBackend {
    /// Create a new backend
    ///
    /// # Errors
    ///
    /// Returns `NetworkFailure` if the HTTP client cannot be built (TLS
    /// backend initialization).
    pub fn new(
        base_url: impl Into<String>,
        request_timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, KernelError> {
        let http_client = reqwest::Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
            health_timeout: connect_timeout,
        })
    }

    /// Create from loaded configuration
    ///
    /// # Errors
    ///
    /// See [`HttpKernelBackend::new`].
    pub fn from_config(config: &OrbConfig) -> Result<Self, KernelError> {
        Self::new(
            config.kernel_url.clone(),
            config.request_timeout,
            config.connect_timeout,
        )
    }

    /// Get the base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn chat_url(&self) -> String {
        format!("{}/chat", self.base_url)
    }

    fn thoughts_url(&self) -> String {
        format!("{}/thoughts", self.base_url)
    }

    /// POST a JSON body and decode a JSON response
    ///
    /// Non-2xx statuses are errors regardless of body.
    async fn post_json<Req, Resp>(&self, url: &str, body: &Req) -> Result<Resp, KernelError>
    where
        Req: Serialize + Sync + ?Sized,
        Resp: DeserializeOwned,
    {
        let response = self.http_client.post(url).json(body).send().await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "Kernel returned error status");
            return Err(KernelError::from_status(status.as_u16(), &bytes));
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl KernelBackend for HttpKernelBackend {
    fn name(&self) -> &'static str {
        "HTTP bridge"
    }

    async fn health_check(&self) -> bool {
        self.http_client
            .get(format!("{}/", self.base_url))
            .timeout(self.health_timeout)
            .send()
            .await
            .is_ok()
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, KernelError> {
        self.post_json(&self.chat_url(), request).await
    }

    async fn post_thought(&self, request: &ThoughtRequest) -> Result<ThoughtAck, KernelError> {
        self.post_json(&self.thoughts_url(), request).await
    }
}
