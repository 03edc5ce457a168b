//! Error types for the SDK
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for the SDK
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Usage Errors
    // ============================================================================
    #[error("Request descriptor was already attempted ({attempts} attempts); build a fresh descriptor per submission")]
    AlreadyAttempted { attempts: u32 },

    #[error("Cannot delete by external id '{external_id}' without a space")]
    MissingSpace { external_id: String },

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to serialize request body: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("Failed to compress request body: {0}")]
    Compression(#[from] std::io::Error),

    #[error("Worker pool is closed")]
    PoolClosed,

    // ============================================================================
    // Batch Errors
    // ============================================================================
    #[error(transparent)]
    MultiRequest(#[from] crate::instances::MultiRequestError),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create a missing-space usage error
    pub fn missing_space(external_id: impl Into<String>) -> Self {
        Self::MissingSpace {
            external_id: external_id.into(),
        }
    }

    /// Check if this error is a caller mistake rather than a runtime condition
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Error::AlreadyAttempted { .. } | Error::MissingSpace { .. }
        )
    }
}

/// Result type alias for the SDK
pub type Result<T> = std::result::Result<T, Error>;
