//! Batch orchestration
//!
//! Splits large write and delete collections into backend-sized chunks, fans
//! each chunk's retry loop out over a bounded worker pool, merges partial
//! results in completion order, and aggregates cross-chunk failures into one
//! [`MultiRequestError`]. Submitted chunks always run to completion; a failing
//! chunk never cancels its siblings.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::{HttpTransport, RequestDescriptor, RequestResult};
use crate::types::UpsertMode;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use thiserror::Error as ThisError;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use super::models::{
    ApplyResponse, ApplyResult, DeleteRequest, DeleteResponse, InstanceId, InstanceWrite,
    UpsertRequest,
};

/// Aggregated failure of a batch call
///
/// Carries every chunk-level failure plus the partial aggregate from the
/// chunks that did succeed, so callers can accept partial completion.
#[derive(Debug, Clone, ThisError)]
#[error(
    "batch request failed: {} failed response(s), {} failed request(s), {} item(s) applied",
    .failed_responses.len(),
    .failed_requests.len(),
    .partial.written() + .partial.deleted.len()
)]
pub struct MultiRequestError {
    /// Chunks rejected by the backend (`RequestResult::FailedResponse`)
    pub failed_responses: Vec<RequestResult>,
    /// Chunks that never got a response (`RequestResult::FailedRequest`)
    pub failed_requests: Vec<RequestResult>,
    /// Aggregate from the chunks that succeeded
    pub partial: ApplyResult,
}

/// Deterministic partition: order preserved, all chunks of `size` items except
/// a possibly-shorter last one.
pub(crate) fn chunked<T>(items: Vec<T>, size: usize) -> Vec<Vec<T>> {
    let size = size.max(1);
    let mut chunks = Vec::with_capacity(items.len().div_ceil(size));
    let mut current = Vec::with_capacity(size.min(items.len()));
    for item in items {
        current.push(item);
        if current.len() == size {
            chunks.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Dispatch one descriptor per chunk over the worker pool and collect terminal
/// results in completion order.
async fn dispatch_chunks(
    transport: &Arc<HttpTransport>,
    pool: &Arc<Semaphore>,
    workers: usize,
    descriptors: Vec<RequestDescriptor>,
) -> Vec<Result<RequestResult>> {
    let tasks = descriptors.into_iter().map(|descriptor| {
        let transport = Arc::clone(transport);
        let pool = Arc::clone(pool);
        async move {
            let _permit = pool
                .acquire_owned()
                .await
                .map_err(|_| Error::PoolClosed)?;
            transport.request_with_retries(descriptor).await
        }
    });

    stream::iter(tasks)
        .buffer_unordered(workers.max(1))
        .collect()
        .await
}

/// Upsert all items, chunked, failing with [`MultiRequestError`] if any chunk
/// terminated in failure.
pub(crate) async fn upsert_all(
    transport: &Arc<HttpTransport>,
    config: &Arc<ClientConfig>,
    pool: &Arc<Semaphore>,
    items: Vec<InstanceWrite>,
    mode: UpsertMode,
    skip_on_version_conflict: bool,
) -> Result<ApplyResult> {
    let url = config.api_url("/models/instances");
    let chunks = chunked(items, config.upsert_chunk_size);
    debug!(chunks = chunks.len(), "dispatching upsert batch");

    let mut descriptors = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        let body = serde_json::to_value(UpsertRequest {
            items: chunk,
            replace: mode.replace_flag(),
            skip_on_version_conflict,
        })?;
        descriptors.push(RequestDescriptor::post(url.clone()).json(body));
    }

    let results = dispatch_chunks(transport, pool, config.write_workers, descriptors).await;

    let mut aggregate = ApplyResult::new();
    let mut failed_responses = Vec::new();
    let mut failed_requests = Vec::new();

    for result in results {
        match result? {
            RequestResult::Success { body, .. } => {
                let response: ApplyResponse = serde_json::from_slice(&body)?;
                aggregate.absorb(response.items);
            }
            failure @ RequestResult::FailedResponse { .. } => failed_responses.push(failure),
            failure @ RequestResult::FailedRequest { .. } => failed_requests.push(failure),
        }
    }

    if failed_responses.is_empty() && failed_requests.is_empty() {
        Ok(aggregate)
    } else {
        warn!(
            failed_responses = failed_responses.len(),
            failed_requests = failed_requests.len(),
            applied = aggregate.written(),
            "upsert batch partially failed"
        );
        Err(MultiRequestError {
            failed_responses,
            failed_requests,
            partial: aggregate,
        }
        .into())
    }
}

/// Delete all identifiers, chunked, failing with [`MultiRequestError`] if any
/// chunk terminated in failure.
pub(crate) async fn delete_all(
    transport: &Arc<HttpTransport>,
    config: &Arc<ClientConfig>,
    pool: &Arc<Semaphore>,
    ids: Vec<InstanceId>,
) -> Result<Vec<InstanceId>> {
    let url = config.api_url("/models/instances/delete");
    let chunks = chunked(ids, config.delete_chunk_size);
    debug!(chunks = chunks.len(), "dispatching delete batch");

    let mut descriptors = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        let body = serde_json::to_value(DeleteRequest { items: chunk })?;
        descriptors.push(RequestDescriptor::post(url.clone()).json(body));
    }

    let results = dispatch_chunks(transport, pool, config.delete_workers, descriptors).await;

    let mut deleted = Vec::new();
    let mut failed_responses = Vec::new();
    let mut failed_requests = Vec::new();

    for result in results {
        match result? {
            RequestResult::Success { body, .. } => {
                let response: DeleteResponse = serde_json::from_slice(&body)?;
                deleted.extend(response.items);
            }
            failure @ RequestResult::FailedResponse { .. } => failed_responses.push(failure),
            failure @ RequestResult::FailedRequest { .. } => failed_requests.push(failure),
        }
    }

    if failed_responses.is_empty() && failed_requests.is_empty() {
        Ok(deleted)
    } else {
        warn!(
            failed_responses = failed_responses.len(),
            failed_requests = failed_requests.len(),
            deleted = deleted.len(),
            "delete batch partially failed"
        );
        Err(MultiRequestError {
            failed_responses,
            failed_requests,
            partial: ApplyResult {
                deleted,
                ..ApplyResult::new()
            },
        }
        .into())
    }
}
