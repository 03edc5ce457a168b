//! HTTP transport module
//!
//! Request descriptors, terminal results, backoff policy, and the pooled
//! transport with its retry loop.
//!
//! # Features
//!
//! - **Attempt classification**: each network attempt ends as retry-or-terminal
//! - **Backoff**: capped exponential with full jitter, `Retry-After` for 429
//! - **Per-kind retry ceilings**: status, connect, and read failures counted
//!   independently
//! - **Gzip bodies**: request payloads compressed unless disabled

pub mod backoff;

mod request;
mod result;
mod transport;

pub use request::{AttemptOutcome, RequestBody, RequestDescriptor};
pub use result::{ErrorDetails, RequestResult};
pub use transport::HttpTransport;

#[cfg(test)]
mod tests;
