//! Client facade
//!
//! [`DataModelClient`] owns the pooled transport and the per-operation worker
//! pools for its whole lifetime. Every public call awaits all of its chunks
//! before returning, so dropping the client tears down the pools and then the
//! underlying connection pool with no work left in flight.

use crate::auth::CredentialsProvider;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::{HttpTransport, RequestDescriptor, RequestResult};
use crate::instances::{
    delete_all, upsert_all, ApplyResult, DeleteItem, InstanceId, InstanceWrite,
};
use crate::types::UpsertMode;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// A single write or a collection, normalized to a uniform list
#[derive(Debug, Clone)]
pub enum UpsertInput {
    /// One instance
    One(InstanceWrite),
    /// A collection of instances
    Many(Vec<InstanceWrite>),
}

impl UpsertInput {
    fn into_vec(self) -> Vec<InstanceWrite> {
        match self {
            UpsertInput::One(item) => vec![item],
            UpsertInput::Many(items) => items,
        }
    }
}

impl From<InstanceWrite> for UpsertInput {
    fn from(item: InstanceWrite) -> Self {
        UpsertInput::One(item)
    }
}

impl From<Vec<InstanceWrite>> for UpsertInput {
    fn from(items: Vec<InstanceWrite>) -> Self {
        UpsertInput::Many(items)
    }
}

/// Client for the data-modeling service
pub struct DataModelClient {
    transport: Arc<HttpTransport>,
    config: Arc<ClientConfig>,
    write_pool: Arc<Semaphore>,
    delete_pool: Arc<Semaphore>,
    retrieve_pool: Arc<Semaphore>,
}

impl DataModelClient {
    /// Create a client with the given config and credentials
    pub fn new(
        config: ClientConfig,
        credentials: impl CredentialsProvider + 'static,
    ) -> Result<Self> {
        Self::with_shared_credentials(config, Arc::new(credentials))
    }

    /// Create a client sharing an existing credentials provider
    pub fn with_shared_credentials(
        config: ClientConfig,
        credentials: Arc<dyn CredentialsProvider>,
    ) -> Result<Self> {
        let config = Arc::new(config);
        let transport = Arc::new(HttpTransport::new(Arc::clone(&config), credentials)?);

        Ok(Self {
            write_pool: Arc::new(Semaphore::new(config.write_workers.max(1))),
            delete_pool: Arc::new(Semaphore::new(config.delete_workers.max(1))),
            retrieve_pool: Arc::new(Semaphore::new(config.retrieve_workers.max(1))),
            transport,
            config,
        })
    }

    /// The client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Create or update instances.
    ///
    /// Accepts one write or a collection of any size; input is chunked and
    /// dispatched over the write pool. Empty input returns an empty aggregate
    /// without touching the network. Fails with [`Error::MultiRequest`] when
    /// any chunk terminates in failure, carrying the partial aggregate.
    pub async fn upsert(
        &self,
        items: impl Into<UpsertInput>,
        mode: UpsertMode,
        skip_on_version_conflict: bool,
    ) -> Result<ApplyResult> {
        let items = items.into().into_vec();
        if items.is_empty() {
            return Ok(ApplyResult::new());
        }
        upsert_all(
            &self.transport,
            &self.config,
            &self.write_pool,
            items,
            mode,
            skip_on_version_conflict,
        )
        .await
    }

    /// Delete instances by heterogeneous identifiers.
    ///
    /// Bare external-id strings need `space`; passing one without it is a
    /// usage error raised before any network call. Returns the deleted
    /// identifiers echoed by the backend.
    pub async fn delete(
        &self,
        items: impl IntoIterator<Item = impl Into<DeleteItem>>,
        space: Option<&str>,
    ) -> Result<Vec<InstanceId>> {
        let mut ids = Vec::new();
        for item in items {
            ids.push(item.into().into_id(space)?);
        }
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        delete_all(&self.transport, &self.config, &self.delete_pool, ids).await
    }

    /// Run a custom request to a terminal result over the retrieve pool.
    ///
    /// Escape hatch for generated API wrappers (list/search/aggregate) built
    /// on the same transport.
    pub async fn request_with_retries(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<RequestResult> {
        let _permit = Arc::clone(&self.retrieve_pool)
            .acquire_owned()
            .await
            .map_err(|_| Error::PoolClosed)?;
        self.transport.request_with_retries(descriptor).await
    }
}

impl std::fmt::Debug for DataModelClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataModelClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
