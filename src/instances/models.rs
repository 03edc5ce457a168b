//! Instance wire model
//!
//! Request and response shapes for the write and delete endpoints, plus the
//! aggregated result merged across chunks.

use crate::error::{Error, Result};
use crate::types::InstanceType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Properties keyed by space, then by `"<viewExternalId>/<version>"`, then by
/// property name
pub type PropertySources = HashMap<String, HashMap<String, HashMap<String, Value>>>;

// ============================================================================
// Identifiers
// ============================================================================

/// Fully-qualified instance identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceId {
    /// Containing space
    pub space: String,
    /// Identifier unique within the space
    pub external_id: String,
    /// Node or edge
    #[serde(default)]
    pub instance_type: InstanceType,
}

impl InstanceId {
    /// Identifier for a node instance
    pub fn node(space: impl Into<String>, external_id: impl Into<String>) -> Self {
        Self {
            space: space.into(),
            external_id: external_id.into(),
            instance_type: InstanceType::Node,
        }
    }

    /// Identifier for an edge instance
    pub fn edge(space: impl Into<String>, external_id: impl Into<String>) -> Self {
        Self {
            space: space.into(),
            external_id: external_id.into(),
            instance_type: InstanceType::Edge,
        }
    }
}

// ============================================================================
// Writes
// ============================================================================

/// One instance to create or update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceWrite {
    /// Node or edge
    pub instance_type: InstanceType,
    /// Containing space
    pub space: String,
    /// Identifier unique within the space
    pub external_id: String,
    /// Expected stored version; a mismatch is a version conflict
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_version: Option<i64>,
    /// Property values keyed by space and versioned view
    #[serde(default, skip_serializing_if = "PropertySources::is_empty")]
    pub properties: PropertySources,
}

impl InstanceWrite {
    /// Start a node write
    pub fn node(space: impl Into<String>, external_id: impl Into<String>) -> Self {
        Self {
            instance_type: InstanceType::Node,
            space: space.into(),
            external_id: external_id.into(),
            existing_version: None,
            properties: PropertySources::new(),
        }
    }

    /// Start an edge write
    pub fn edge(space: impl Into<String>, external_id: impl Into<String>) -> Self {
        Self {
            instance_type: InstanceType::Edge,
            space: space.into(),
            external_id: external_id.into(),
            existing_version: None,
            properties: PropertySources::new(),
        }
    }

    /// Expect this stored version when applying the write
    #[must_use]
    pub fn existing_version(mut self, version: i64) -> Self {
        self.existing_version = Some(version);
        self
    }

    /// Set one property under `space` and `"<viewExternalId>/<version>"`
    #[must_use]
    pub fn property(
        mut self,
        space: impl Into<String>,
        view: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.properties
            .entry(space.into())
            .or_default()
            .entry(view.into())
            .or_default()
            .insert(name.into(), value.into());
        self
    }

    /// The identifier this write addresses
    pub fn id(&self) -> InstanceId {
        InstanceId {
            space: self.space.clone(),
            external_id: self.external_id.clone(),
            instance_type: self.instance_type,
        }
    }
}

/// Property value from a float, mapping non-finite values to their string
/// forms so any caller-built number survives JSON serialization.
pub fn float_value(f: f64) -> Value {
    if f.is_finite() {
        serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number)
    } else if f.is_nan() {
        Value::String("NaN".to_string())
    } else if f > 0.0 {
        Value::String("Infinity".to_string())
    } else {
        Value::String("-Infinity".to_string())
    }
}

/// Property value from a timestamp, encoded as epoch milliseconds
pub fn timestamp_value(ts: DateTime<Utc>) -> Value {
    Value::from(ts.timestamp_millis())
}

// ============================================================================
// Delete input normalization
// ============================================================================

/// Heterogeneous delete input
#[derive(Debug, Clone)]
pub enum DeleteItem {
    /// Bare external id; requires a `space` argument at the call site
    ExternalId(String),
    /// Fully-qualified identifier
    Id(InstanceId),
    /// A write model; its identifier is deleted
    Instance(InstanceWrite),
}

impl DeleteItem {
    /// Normalize to a fully-qualified identifier.
    ///
    /// Bare external ids become node identifiers in `default_space`; without a
    /// space that is a usage error, raised before any network call.
    pub fn into_id(self, default_space: Option<&str>) -> Result<InstanceId> {
        match self {
            DeleteItem::ExternalId(external_id) => match default_space {
                Some(space) => Ok(InstanceId::node(space, external_id)),
                None => Err(Error::missing_space(external_id)),
            },
            DeleteItem::Id(id) => Ok(id),
            DeleteItem::Instance(instance) => Ok(instance.id()),
        }
    }
}

impl From<&str> for DeleteItem {
    fn from(external_id: &str) -> Self {
        DeleteItem::ExternalId(external_id.to_string())
    }
}

impl From<String> for DeleteItem {
    fn from(external_id: String) -> Self {
        DeleteItem::ExternalId(external_id)
    }
}

impl From<InstanceId> for DeleteItem {
    fn from(id: InstanceId) -> Self {
        DeleteItem::Id(id)
    }
}

impl From<InstanceWrite> for DeleteItem {
    fn from(instance: InstanceWrite) -> Self {
        DeleteItem::Instance(instance)
    }
}

// ============================================================================
// Wire envelopes
// ============================================================================

/// Body of `POST /models/instances`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertRequest {
    pub items: Vec<InstanceWrite>,
    pub replace: bool,
    pub skip_on_version_conflict: bool,
}

/// Body of `POST /models/instances/delete`
#[derive(Debug, Clone, Serialize)]
pub struct DeleteRequest {
    pub items: Vec<InstanceId>,
}

/// Response envelope of the write endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ApplyResponse {
    pub items: Vec<ApplyRecord>,
}

/// Response envelope of the delete endpoint, echoing deleted identifiers
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteResponse {
    pub items: Vec<InstanceId>,
}

/// Per-item outcome of a write
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRecord {
    /// Node or edge
    pub instance_type: InstanceType,
    /// Containing space
    pub space: String,
    /// Identifier unique within the space
    pub external_id: String,
    /// Stored version after the write
    pub version: i64,
    /// Whether the write changed stored state
    pub was_modified: bool,
    /// Creation time, epoch milliseconds
    pub created_time: i64,
    /// Last update time, epoch milliseconds
    pub last_updated_time: i64,
}

impl ApplyRecord {
    /// Creation time as a UTC datetime
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.created_time)
    }

    /// Last update time as a UTC datetime
    pub fn last_updated_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.last_updated_time)
    }
}

// ============================================================================
// Aggregated result
// ============================================================================

/// Merged created/updated/unchanged/deleted outcome across all chunks of one
/// batch call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplyResult {
    /// Instances created by this batch
    pub created: Vec<ApplyRecord>,
    /// Instances whose stored state was updated
    pub updated: Vec<ApplyRecord>,
    /// Instances left untouched by the write
    pub unchanged: Vec<ApplyRecord>,
    /// Identifiers deleted by this batch
    pub deleted: Vec<InstanceId>,
}

impl ApplyResult {
    /// Empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Total records across the three write lists
    pub fn written(&self) -> usize {
        self.created.len() + self.updated.len() + self.unchanged.len()
    }

    /// Merge another result into this one; plain concatenation per list, so
    /// the operation is associative and commutative up to ordering.
    pub fn merge(mut self, other: ApplyResult) -> Self {
        self.created.extend(other.created);
        self.updated.extend(other.updated);
        self.unchanged.extend(other.unchanged);
        self.deleted.extend(other.deleted);
        self
    }

    /// Partition one chunk's response records into the three write lists.
    ///
    /// Unmodified records are unchanged; modified records whose creation and
    /// last-update stamps coincide were created, the rest updated.
    pub fn absorb(&mut self, records: Vec<ApplyRecord>) {
        for record in records {
            if !record.was_modified {
                self.unchanged.push(record);
            } else if record.created_time == record.last_updated_time {
                self.created.push(record);
            } else {
                self.updated.push(record);
            }
        }
    }
}
