//! # HTTP Transport
//!
//! The orchestrator only ever issues `POST path [json]` and looks at the status
//! code and body text of the reply. That boundary is the [`Transport`] trait,
//! so tests can script replies and count calls.
//!
//! [`HttpTransport`] is the real implementation on top of `reqwest`. On native
//! targets it keeps a cookie store so a session cookie set by finish-login is
//! sent on later requests. In the browser, `fetch` does that on its own.

use crate::config::ClientConfig;
use crate::error::{CeremonyError, CeremonyResult};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;

/// Status and body of a relying-party reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        HttpResponse {
            status,
            body: body.into(),
        }
    }

    /// Any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait Transport {
    /// POST to `path`. With a body, it is sent as `application/json`.
    ///
    /// Only a failure to get any reply is an `Err`. Non-2xx replies are
    /// returned as `Ok` for the caller to interpret.
    async fn post(&self, path: &str, body: Option<&Value>) -> CeremonyResult<HttpResponse>;
}

/// `reqwest`-backed transport rooted at a base URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: Url) -> CeremonyResult<Self> {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.cookie_store(true);
        let client = builder.build()?;

        Ok(HttpTransport { client, base_url })
    }

    pub fn from_config(config: &ClientConfig) -> CeremonyResult<Self> {
        Self::new(config.base_url.clone())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> CeremonyResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| CeremonyError::Transport(format!("bad request path '{}': {}", path, e)))
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl Transport for HttpTransport {
    async fn post(&self, path: &str, body: Option<&Value>) -> CeremonyResult<HttpResponse> {
        let url = self.url_for(path)?;
        tracing::debug!("POST {}", url);

        let mut request = self.client.post(url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        tracing::debug!(status, "relying party replied");
        Ok(HttpResponse { status, body })
    }
}
