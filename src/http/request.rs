//! Request descriptor
//!
//! A [`RequestDescriptor`] records one HTTP request plus its per-failure-kind
//! attempt counters. It is a value type: every retry consumes the descriptor
//! and yields the next one with a single counter bumped, so no descriptor is
//! ever shared between workers or reused after a terminal result.

use crate::types::Method;
use bytes::Bytes;
use serde_json::Value;

use super::result::RequestResult;

/// Request body payload; the two forms are mutually exclusive by construction
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// Pre-encoded bytes sent as-is
    Raw(Bytes),
    /// Structured body serialized to JSON at send time
    Json(Value),
}

/// Descriptor for one HTTP request and its retry history
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    /// Target URL
    pub url: String,
    /// HTTP method
    pub method: Method,
    /// Optional body payload
    pub body: Option<RequestBody>,
    /// Per-request API subversion override
    pub api_subversion: Option<String>,
    /// Content type of the serialized body
    pub content_type: String,
    /// Accepted response content type
    pub accept: String,
    /// Skip gzip compression for this request
    pub disable_gzip: bool,
    connect_attempt: u32,
    read_attempt: u32,
    status_attempt: u32,
}

impl RequestDescriptor {
    /// Create a descriptor with no body
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            body: None,
            api_subversion: None,
            content_type: "application/json".to_string(),
            accept: "application/json".to_string(),
            disable_gzip: false,
            connect_attempt: 0,
            read_attempt: 0,
            status_attempt: 0,
        }
    }

    /// Create a GET descriptor
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    /// Create a POST descriptor
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    /// Set a structured JSON body
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    /// Set a raw byte body
    #[must_use]
    pub fn raw(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(RequestBody::Raw(body.into()));
        self
    }

    /// Override the API subversion for this request
    #[must_use]
    pub fn api_subversion(mut self, version: impl Into<String>) -> Self {
        self.api_subversion = Some(version.into());
        self
    }

    /// Skip gzip compression for this request
    #[must_use]
    pub fn no_gzip(mut self) -> Self {
        self.disable_gzip = true;
        self
    }

    /// Attempts consumed by connection-establishment failures
    pub fn connect_attempt(&self) -> u32 {
        self.connect_attempt
    }

    /// Attempts consumed by read timeouts
    pub fn read_attempt(&self) -> u32 {
        self.read_attempt
    }

    /// Attempts consumed by retryable status codes
    pub fn status_attempt(&self) -> u32 {
        self.status_attempt
    }

    /// Total attempts across all failure kinds; 0 for a fresh descriptor
    pub fn total_attempts(&self) -> u32 {
        self.connect_attempt + self.read_attempt + self.status_attempt
    }

    /// Next descriptor after a connection failure
    #[must_use]
    pub(crate) fn bump_connect(mut self) -> Self {
        self.connect_attempt += 1;
        self
    }

    /// Next descriptor after a read timeout
    #[must_use]
    pub(crate) fn bump_read(mut self) -> Self {
        self.read_attempt += 1;
        self
    }

    /// Next descriptor after a retryable status
    #[must_use]
    pub(crate) fn bump_status(mut self) -> Self {
        self.status_attempt += 1;
        self
    }
}

/// Outcome of a single transport attempt
#[derive(Debug)]
pub enum AttemptOutcome {
    /// Attempt failed transiently; submit the updated descriptor again
    Retry(RequestDescriptor),
    /// Attempt sequence is terminal; no further retries for this descriptor
    Done(RequestResult),
}
