//! Common types used throughout the SDK
//!
//! Shared type definitions used across the transport and instance modules.

use serde::{Deserialize, Serialize};

// ============================================================================
// HTTP Types
// ============================================================================

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    GET,
    POST,
    PUT,
    DELETE,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => reqwest::Method::GET,
            Method::POST => reqwest::Method::POST,
            Method::PUT => reqwest::Method::PUT,
            Method::DELETE => reqwest::Method::DELETE,
        }
    }
}

// ============================================================================
// Instance Type
// ============================================================================

/// Kind of a data-modeling instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceType {
    /// A node in the data model graph
    #[default]
    Node,
    /// A directed edge between two nodes
    Edge,
}

// ============================================================================
// Upsert Mode
// ============================================================================

/// How existing instances are combined with incoming writes
///
/// Read-merge-write semantics are deliberately not expressible here; the
/// backend only supports patching or replacing stored properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertMode {
    /// Merge incoming properties into the stored instance
    #[default]
    Patch,
    /// Replace all stored properties with the incoming ones
    Replace,
}

impl UpsertMode {
    /// Wire value for the `replace` flag of the write endpoint
    pub fn replace_flag(self) -> bool {
        matches!(self, UpsertMode::Replace)
    }
}
