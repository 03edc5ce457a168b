//! HTTP transport
//!
//! Executes single request attempts against a shared pooled connection client
//! and classifies each outcome as retry-or-terminal. The retry loop in
//! [`HttpTransport::request_with_retries`] drives attempts until a terminal
//! [`RequestResult`] is produced.

use crate::auth::CredentialsProvider;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use reqwest::{redirect, Client};
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, warn};

use super::backoff::{backoff_with_jitter, retry_after};
use super::request::{AttemptOutcome, RequestBody, RequestDescriptor};
use super::result::{ErrorDetails, RequestResult};

/// SDK identification header sent with every request
const SDK_HEADER: &str = "x-client-sdk";
/// Application name header sent with every request
const APP_HEADER: &str = "x-client-app";
/// API subversion header, per-request override or client-wide default
const API_SUBVERSION_HEADER: &str = "x-api-subversion";

/// Transport over a pooled connection client
///
/// The inner `reqwest::Client` is the only resource shared across concurrent
/// workers; it is internally thread-safe and lives as long as the owning
/// facade.
pub struct HttpTransport {
    client: Client,
    config: Arc<ClientConfig>,
    credentials: Arc<dyn CredentialsProvider>,
}

impl HttpTransport {
    /// Build the transport and its connection pool
    pub fn new(
        config: Arc<ClientConfig>,
        credentials: Arc<dyn CredentialsProvider>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .pool_max_idle_per_host(config.max_idle_connections)
            // Redirects are surfaced to the caller as terminal 3xx results
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            config,
            credentials,
        })
    }

    /// Run one request to a terminal result, retrying transient failures.
    ///
    /// The descriptor must be fresh: re-submitting an already-attempted
    /// descriptor is a caller bug and fails before any network call.
    pub async fn request_with_retries(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<RequestResult> {
        if descriptor.total_attempts() > 0 {
            return Err(Error::AlreadyAttempted {
                attempts: descriptor.total_attempts(),
            });
        }

        let mut descriptor = descriptor;
        loop {
            match self.attempt(descriptor).await? {
                AttemptOutcome::Retry(next) => descriptor = next,
                AttemptOutcome::Done(result) => return Ok(result),
            }
        }
    }

    /// Issue exactly one network attempt and classify the outcome
    pub async fn attempt(&self, descriptor: RequestDescriptor) -> Result<AttemptOutcome> {
        let payload = self.encode_body(&descriptor)?;
        let request = self.build_request(&descriptor, payload);

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return Ok(self.classify_send_error(descriptor, &e).await),
        };

        let status = response.status().as_u16();
        let headers = response.headers().clone();

        if response.status().is_success() {
            let body = match response.bytes().await {
                Ok(body) => body,
                Err(e) => return Ok(self.classify_send_error(descriptor, &e).await),
            };
            debug!(status, url = %descriptor.url, "request succeeded");
            let text = String::from_utf8_lossy(&body).into_owned();
            return Ok(AttemptOutcome::Done(RequestResult::Success {
                status,
                body,
                text,
            }));
        }

        // Retryable status with attempts remaining: wait, bump, go again
        if self.config.is_retryable_status(status)
            && descriptor.status_attempt() < self.config.max_status_retries
        {
            let wait = retry_after(status, &headers).unwrap_or_else(|| {
                backoff_with_jitter(descriptor.status_attempt(), self.config.max_backoff)
            });
            warn!(
                status,
                attempt = descriptor.status_attempt() + 1,
                wait_ms = wait.as_millis() as u64,
                url = %descriptor.url,
                "retryable status, backing off"
            );
            tokio::time::sleep(wait).await;
            return Ok(AttemptOutcome::Retry(descriptor.bump_status()));
        }

        let body = response.bytes().await.unwrap_or_default();
        Ok(AttemptOutcome::Done(RequestResult::FailedResponse {
            status,
            details: ErrorDetails::from_response(status, &body),
        }))
    }

    /// Classify a network-level error into retry-or-terminal.
    ///
    /// Connection failures and read timeouts are retried up to their own
    /// ceilings; anything unclassified fails the request immediately.
    async fn classify_send_error(
        &self,
        descriptor: RequestDescriptor,
        error: &reqwest::Error,
    ) -> AttemptOutcome {
        if error.is_connect() {
            if descriptor.connect_attempt() < self.config.max_connect_retries {
                let wait =
                    backoff_with_jitter(descriptor.connect_attempt(), self.config.max_backoff);
                warn!(
                    attempt = descriptor.connect_attempt() + 1,
                    wait_ms = wait.as_millis() as u64,
                    url = %descriptor.url,
                    "connection failed, backing off"
                );
                tokio::time::sleep(wait).await;
                return AttemptOutcome::Retry(descriptor.bump_connect());
            }
            return AttemptOutcome::Done(RequestResult::FailedRequest {
                message: format!("connection failed after retries: {error}"),
            });
        }

        if error.is_timeout() {
            if descriptor.read_attempt() < self.config.max_read_retries {
                let wait = backoff_with_jitter(descriptor.read_attempt(), self.config.max_backoff);
                warn!(
                    attempt = descriptor.read_attempt() + 1,
                    wait_ms = wait.as_millis() as u64,
                    url = %descriptor.url,
                    "read timed out, backing off"
                );
                tokio::time::sleep(wait).await;
                return AttemptOutcome::Retry(descriptor.bump_read());
            }
            return AttemptOutcome::Done(RequestResult::FailedRequest {
                message: format!("read timed out after retries: {error}"),
            });
        }

        // Unclassified transport errors fail fast, no retry
        AttemptOutcome::Done(RequestResult::FailedRequest {
            message: error.to_string(),
        })
    }

    /// Serialize and optionally gzip the body payload
    fn encode_body(&self, descriptor: &RequestDescriptor) -> Result<Option<EncodedBody>> {
        let raw = match &descriptor.body {
            None => return Ok(None),
            Some(RequestBody::Raw(bytes)) => bytes.to_vec(),
            Some(RequestBody::Json(value)) => serde_json::to_vec(value)?,
        };

        if descriptor.disable_gzip || self.config.disable_gzip {
            return Ok(Some(EncodedBody {
                bytes: raw,
                gzipped: false,
            }));
        }

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&raw)?;
        Ok(Some(EncodedBody {
            bytes: encoder.finish()?,
            gzipped: true,
        }))
    }

    /// Assemble the request builder with standard headers and body
    fn build_request(
        &self,
        descriptor: &RequestDescriptor,
        payload: Option<EncodedBody>,
    ) -> reqwest::RequestBuilder {
        let mut req = self
            .client
            .request(descriptor.method.into(), &descriptor.url)
            .header("Accept", descriptor.accept.as_str())
            .header(SDK_HEADER, self.config.user_agent.as_str())
            .header(APP_HEADER, self.config.app_name.as_str());

        let (auth_name, auth_value) = self.credentials.authorization_header();
        req = req.header(auth_name.as_str(), auth_value.as_str());

        let subversion = descriptor
            .api_subversion
            .as_deref()
            .or(self.config.api_subversion.as_deref());
        if let Some(version) = subversion {
            req = req.header(API_SUBVERSION_HEADER, version);
        }

        if let Some(payload) = payload {
            req = req.header("Content-Type", descriptor.content_type.as_str());
            if payload.gzipped {
                req = req.header("Content-Encoding", "gzip");
            }
            req = req.body(payload.bytes);
        }

        req
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

struct EncodedBody {
    bytes: Vec<u8>,
    gzipped: bool,
}
