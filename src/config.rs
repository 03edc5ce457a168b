//! Client configuration
//!
//! Configuration for the transport, retry policy, and batch worker pools.

use std::time::Duration;

/// Default retryable status codes: request timeout, rate limiting, and the
/// gateway-level 5xx family the backend documents as transient.
pub const DEFAULT_RETRY_STATUSES: [u16; 5] = [408, 429, 502, 503, 504];

/// Configuration for the data-modeling client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL for all requests
    pub base_url: String,
    /// Application name sent with every request
    pub app_name: String,
    /// Per-attempt request timeout
    pub timeout: Duration,
    /// Default API subversion header value, overridable per request
    pub api_subversion: Option<String>,
    /// Maximum backoff between retries
    pub max_backoff: Duration,
    /// Retry ceiling for retryable status codes
    pub max_status_retries: u32,
    /// Retry ceiling for connection-establishment failures
    pub max_connect_retries: u32,
    /// Retry ceiling for read timeouts
    pub max_read_retries: u32,
    /// Status codes that trigger a retry
    pub retry_statuses: Vec<u16>,
    /// Maximum idle pooled connections per host
    pub max_idle_connections: usize,
    /// Worker count for upsert chunk dispatch
    pub write_workers: usize,
    /// Worker count for delete chunk dispatch
    pub delete_workers: usize,
    /// Worker count for read-side and custom requests
    pub retrieve_workers: usize,
    /// Maximum items per write request
    pub upsert_chunk_size: usize,
    /// Maximum items per delete request
    pub delete_chunk_size: usize,
    /// Disable gzip compression of request bodies
    pub disable_gzip: bool,
    /// User agent string
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            app_name: "unknown".to_string(),
            timeout: Duration::from_secs(30),
            api_subversion: None,
            max_backoff: Duration::from_secs(60),
            max_status_retries: 10,
            max_connect_retries: 10,
            max_read_retries: 10,
            retry_statuses: DEFAULT_RETRY_STATUSES.to_vec(),
            max_idle_connections: 8,
            write_workers: 5,
            delete_workers: 3,
            retrieve_workers: 10,
            upsert_chunk_size: 1000,
            delete_chunk_size: 1000,
            disable_gzip: false,
            user_agent: format!("datamodel-sdk/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Whether a status code is in the retryable set
    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.retry_statuses.contains(&status)
    }

    /// Build a full URL from an API path
    pub fn api_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

/// Builder for client config
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the application name
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.config.app_name = name.into();
        self
    }

    /// Set the per-attempt request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the default API subversion
    pub fn api_subversion(mut self, version: impl Into<String>) -> Self {
        self.config.api_subversion = Some(version.into());
        self
    }

    /// Set the maximum backoff between retries
    pub fn max_backoff(mut self, max: Duration) -> Self {
        self.config.max_backoff = max;
        self
    }

    /// Set all three per-kind retry ceilings at once
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_status_retries = retries;
        self.config.max_connect_retries = retries;
        self.config.max_read_retries = retries;
        self
    }

    /// Set the retry ceiling for retryable status codes
    pub fn max_status_retries(mut self, retries: u32) -> Self {
        self.config.max_status_retries = retries;
        self
    }

    /// Set the retry ceiling for connection failures
    pub fn max_connect_retries(mut self, retries: u32) -> Self {
        self.config.max_connect_retries = retries;
        self
    }

    /// Set the retry ceiling for read timeouts
    pub fn max_read_retries(mut self, retries: u32) -> Self {
        self.config.max_read_retries = retries;
        self
    }

    /// Set the retryable status codes
    pub fn retry_statuses(mut self, statuses: impl Into<Vec<u16>>) -> Self {
        self.config.retry_statuses = statuses.into();
        self
    }

    /// Set worker counts for the write, delete, and retrieve pools
    pub fn workers(mut self, write: usize, delete: usize, retrieve: usize) -> Self {
        self.config.write_workers = write;
        self.config.delete_workers = delete;
        self.config.retrieve_workers = retrieve;
        self
    }

    /// Set the maximum items per write request
    pub fn upsert_chunk_size(mut self, size: usize) -> Self {
        self.config.upsert_chunk_size = size;
        self
    }

    /// Set the maximum items per delete request
    pub fn delete_chunk_size(mut self, size: usize) -> Self {
        self.config.delete_chunk_size = size;
        self
    }

    /// Disable gzip compression of request bodies
    pub fn disable_gzip(mut self) -> Self {
        self.config.disable_gzip = true;
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> ClientConfig {
        self.config
    }
}
