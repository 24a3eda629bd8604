//! Error types for the admin API client and synchronizer.
//!
//! # Design
//! `ApiError` and `TransportError` are the typed failures seen while a fetch
//! is in flight. They never reach the UI directly: the synchronizer folds
//! them into an `ErrorValue`, which is what a slot stores. An `ErrorValue` is
//! either the server's error body verbatim or the fixed fallback message of
//! the endpoint that failed.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Failure of the underlying HTTP round-trip: no response was received.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The connection could not be made or broke mid-request.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The blocking worker executing the request died.
    #[error("transport task failed: {0}")]
    Task(String),
}

/// Errors returned by `AdminClient::parse`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// A 2xx body could not be decoded into the expected shape.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// Query parameters could not be encoded.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ApiError {
    /// Fold this error into the value a slot stores.
    ///
    /// A non-empty error body is kept verbatim (as JSON when it parses,
    /// otherwise as the raw text). Everything else becomes `fallback`.
    pub fn into_error_value(self, fallback: &str) -> ErrorValue {
        match self {
            ApiError::HttpError { body, .. } if !body.trim().is_empty() => {
                match serde_json::from_str::<Value>(&body) {
                    Ok(Value::Null) => ErrorValue::message(fallback),
                    Ok(Value::String(s)) if s.is_empty() => ErrorValue::message(fallback),
                    Ok(value) => ErrorValue::Remote(value),
                    Err(_) => ErrorValue::Remote(Value::String(body)),
                }
            }
            _ => ErrorValue::message(fallback),
        }
    }
}

/// The error held by a slot after a failed fetch.
///
/// Serializes untagged, so a UI sees either the server's body or a plain
/// string, exactly as the dashboard expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[serde(untagged)]
pub enum ErrorValue {
    /// Fixed per-endpoint fallback text.
    #[error("{0}")]
    Message(String),

    /// Error body sent by the remote API.
    #[error("{}", remote_message(.0))]
    Remote(Value),
}

impl ErrorValue {
    pub fn message(text: impl Into<String>) -> Self {
        ErrorValue::Message(text.into())
    }
}

/// Prefer the conventional `message`/`title` field of a structured body.
fn remote_message(body: &Value) -> String {
    match body {
        Value::String(s) => s.clone(),
        Value::Object(map) => ["message", "title", "error"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| body.to_string()),
        other => other.to_string(),
    }
}

/// Invalid client configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid base url {0:?}: must start with http:// or https://")]
    InvalidBaseUrl(String),

    #[error("unknown settle policy {0:?}: expected latest-issued or last-settled")]
    InvalidSettlePolicy(String),
}
