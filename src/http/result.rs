//! Terminal request results
//!
//! A completed attempt sequence ends in exactly one [`RequestResult`] variant.
//! The closed union lets the retry loop and the batch orchestrator match
//! exhaustively instead of inspecting status codes ad hoc.

use bytes::Bytes;
use serde::Deserialize;
use serde_json::Value;

/// Terminal outcome of one request's attempt sequence
#[derive(Debug, Clone)]
pub enum RequestResult {
    /// 2xx response
    Success {
        /// HTTP status code
        status: u16,
        /// Raw body bytes
        body: Bytes,
        /// Body decoded as UTF-8 (lossy)
        text: String,
    },
    /// Non-retryable status, or retryable status with retries exhausted
    FailedResponse {
        /// HTTP status code
        status: u16,
        /// Parsed or degraded error details
        details: ErrorDetails,
    },
    /// No HTTP response was obtained at all
    FailedRequest {
        /// Human-readable failure description
        message: String,
    },
}

impl RequestResult {
    /// Whether this is the success variant
    pub fn is_success(&self) -> bool {
        matches!(self, RequestResult::Success { .. })
    }

    /// Parse the success body as JSON, if this is a success
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Option<T> {
        match self {
            RequestResult::Success { body, .. } => serde_json::from_slice(body).ok(),
            _ => None,
        }
    }
}

/// Structured error details from a failed response
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetails {
    /// Numeric error code reported by the backend
    pub code: i64,
    /// Error message
    pub message: String,
    /// Referenced values the backend could not find
    #[serde(default)]
    pub missing: Option<Vec<Value>>,
    /// Values rejected as duplicates
    #[serde(default)]
    pub duplicated: Option<Vec<Value>>,
    /// Backend hint that the request is safe to retry automatically
    #[serde(default)]
    pub is_auto_retryable: Option<bool>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetails,
}

impl ErrorDetails {
    /// Parse the backend's `{"error": {...}}` envelope, degrading to the raw
    /// status code and body text when the shape is unrecognized.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        match serde_json::from_slice::<ErrorEnvelope>(body) {
            Ok(envelope) => envelope.error,
            Err(_) => Self {
                code: i64::from(status),
                message: String::from_utf8_lossy(body).into_owned(),
                missing: None,
                duplicated: None,
                is_auto_retryable: None,
            },
        }
    }
}
