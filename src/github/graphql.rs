//! GraphQL envelope types.
//!
//! A GraphQL response can carry both `data` and `errors`. Neither field is
//! turned into a Rust error here; callers inspect them.

use serde::{Deserialize, Serialize};

/// Request body posted to the GraphQL endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphQlRequest<V> {
    /// GraphQL document.
    pub query: &'static str,
    /// Variables bound by the document.
    pub variables: V,
}

/// Parsed GraphQL response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GraphQlResponse<T> {
    /// Result data, absent when the operation failed entirely.
    pub data: Option<T>,
    /// Errors reported by the server.
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

impl<T> GraphQlResponse<T> {
    /// Returns true when the server reported at least one error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// One entry of a GraphQL `errors` array.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GraphQlError {
    /// Human-readable error message.
    pub message: String,
    /// GitHub error classification such as `NOT_FOUND`.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Path of the failing field.
    #[serde(default)]
    pub path: Vec<serde_json::Value>,
}
