// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # datamodel-sdk
//!
//! Resilient request-dispatch core for data-modeling service clients.
//! Generated API wrappers sit on top of this crate; everything here is the
//! part that has to be engineered rather than generated.
//!
//! ## Features
//!
//! - **Pooled transport**: one shared connection pool per client, gzip
//!   request bodies, injected credentials
//! - **Retry with backoff**: capped exponential backoff with full jitter,
//!   independent ceilings for status/connect/read failures, `Retry-After`
//!   honored for rate limiting
//! - **Batched writes**: arbitrary-sized upsert/delete collections chunked
//!   and fanned out over bounded per-operation worker pools
//! - **Partial-failure aggregation**: one structured error carrying every
//!   chunk failure plus whatever succeeded
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use datamodel_sdk::{
//!     BearerCredentials, ClientConfig, DataModelClient, InstanceWrite, Result, UpsertMode,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ClientConfig::builder()
//!         .base_url("https://api.example.com")
//!         .app_name("asset-sync")
//!         .build();
//!     let client = DataModelClient::new(config, BearerCredentials::new("token"))?;
//!
//!     let pump = InstanceWrite::node("plant", "pump-42")
//!         .property("plant", "Pump/1", "name", "P-42");
//!     let result = client.upsert(vec![pump], UpsertMode::Patch, false).await?;
//!     println!("created: {}", result.created.len());
//!
//!     client.delete(vec!["pump-42"], Some("plant")).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      DataModelClient                        │
//! │   upsert() · delete() · request_with_retries()              │
//! └─────────────────────────────────────────────────────────────┘
//!                │ chunk + dispatch over worker pools
//! ┌──────────────┴──────────────────────────────────────────────┐
//! │  Batch orchestrator: chunked fan-out, completion-order      │
//! │  merge, MultiRequestError aggregation                       │
//! └──────────────┬──────────────────────────────────────────────┘
//!                │ one retry loop per chunk
//! ┌──────────────┴──────────────────────────────────────────────┐
//! │  HttpTransport: pooled client, gzip, header assembly,       │
//! │  attempt classification, backoff with jitter                │
//! └─────────────────────────────────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the SDK
pub mod error;

/// Common types and type aliases
pub mod types;

/// Credentials collaborator
pub mod auth;

/// Client configuration
pub mod config;

/// HTTP transport with retry and backoff
pub mod http;

/// Instance writes, deletes, and batch orchestration
pub mod instances;

/// Client facade
pub mod client;

// ============================================================================
// Re-exports
// ============================================================================

pub use auth::{ApiKeyCredentials, BearerCredentials, CredentialsProvider};
pub use client::{DataModelClient, UpsertInput};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use http::{AttemptOutcome, ErrorDetails, RequestDescriptor, RequestResult};
pub use instances::{
    ApplyRecord, ApplyResult, DeleteItem, InstanceId, InstanceWrite, MultiRequestError,
};
pub use types::{InstanceType, Method, UpsertMode};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
