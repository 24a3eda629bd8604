//! Seams to the outside world: executing requests and finding the token.
//!
//! # Design
//! The synchronizer only needs `perform_get` and `auth_token`. Hosts plug in
//! their own HTTP stack by implementing `Transport`; `UreqTransport` is the
//! stock one. Non-2xx statuses must come back as `HttpResponse` data so the
//! client can keep the server's error body; `TransportError` is reserved for
//! "no response at all".

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};

#[async_trait]
pub trait Transport: Send + Sync {
    async fn perform_get(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Source of the bearer token attached to every request.
pub trait TokenSource: Send + Sync {
    fn auth_token(&self) -> Option<String>;
}

impl<F> TokenSource for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn auth_token(&self) -> Option<String> {
        self()
    }
}

/// Token slot updated on login/logout and read on every fetch.
#[derive(Debug, Default)]
pub struct SharedToken {
    token: RwLock<Option<String>>,
}

impl SharedToken {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: RwLock::new(token),
        }
    }

    pub fn set(&self, token: impl Into<String>) {
        *self.token.write() = Some(token.into());
    }

    pub fn clear(&self) {
        *self.token.write() = None;
    }
}

impl TokenSource for SharedToken {
    fn auth_token(&self) -> Option<String> {
        self.token.read().clone()
    }
}

/// Blocking `ureq` agent driven from tokio's blocking pool.
#[cfg(feature = "ureq-transport")]
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

#[cfg(feature = "ureq-transport")]
impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "ureq-transport")]
impl UreqTransport {
    pub fn new() -> Self {
        // 4xx/5xx are data, not errors: the server's body is the error value.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    fn execute(agent: &ureq::Agent, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = agent.get(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let mut response = builder
            .call()
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_string())))
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(feature = "ureq-transport")]
#[async_trait]
impl Transport for UreqTransport {
    async fn perform_get(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let agent = self.agent.clone();
        let request = request.clone();
        tokio::task::spawn_blocking(move || Self::execute(&agent, &request))
            .await
            .map_err(|e| TransportError::Task(e.to_string()))?
    }
}
