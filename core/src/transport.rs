//! Executes `HttpRequest` values against the network.
//!
//! # Design
//! `Transport` is the only seam that performs I/O. It reports any HTTP
//! status as data and fails only when no response was obtained, leaving
//! status interpretation to `BookshopClient::parse_body`. No timeout or
//! retry is layered on top of the underlying agent.

use async_trait::async_trait;

use crate::error::{RequestError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs a single HTTP round-trip.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// `Transport` backed by a blocking ureq agent, run on tokio's blocking pool.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl UreqTransport {
    /// Disables ureq's status-code-as-error behavior so 4xx/5xx responses
    /// come back as data.
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

#[async_trait]
impl Transport for UreqTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || execute_blocking(&agent, request))
            .await
            .map_err(|e| RequestError::Transport(e.to_string()))?
    }
}

fn execute_blocking(agent: &ureq::Agent, request: HttpRequest) -> Result<HttpResponse> {
    let HttpRequest {
        method,
        url,
        headers,
        body,
    } = request;

    let result = match (method, body) {
        (HttpMethod::Get, _) => with_headers(agent.get(&url), &headers).call(),
        (HttpMethod::Delete, _) => with_headers(agent.delete(&url), &headers).call(),
        (HttpMethod::Post, Some(body)) => {
            with_headers(agent.post(&url), &headers).send(body.as_bytes())
        }
        (HttpMethod::Post, None) => with_headers(agent.post(&url), &headers).send_empty(),
    };
    let mut response = result.map_err(|e| RequestError::Transport(e.to_string()))?;

    let status = response.status().as_u16();
    // ureq caps bodies at 10 MiB by default; a 2xx body is returned whole.
    let body = response
        .body_mut()
        .with_config()
        .limit(u64::MAX)
        .read_to_string()
        .map_err(|e| RequestError::Transport(e.to_string()))?;

    Ok(HttpResponse { status, body })
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}
