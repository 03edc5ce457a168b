//! Instance write and delete orchestration
//!
//! The wire model for the instance endpoints and the batch orchestrator that
//! chunks, dispatches, and merges large write/delete collections.

mod batch;
mod models;

pub use batch::MultiRequestError;
pub use models::{
    float_value, timestamp_value, ApplyRecord, ApplyResponse, ApplyResult, DeleteItem,
    DeleteRequest, DeleteResponse, InstanceId, InstanceWrite, PropertySources, UpsertRequest,
};

pub(crate) use batch::{chunked, delete_all, upsert_all};
