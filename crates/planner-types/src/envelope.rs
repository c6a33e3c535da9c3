//! Wire shapes of backend responses.
//!
//! The canonical envelope is `{success, data, message, error}`; older
//! endpoints answer with a FastAPI-style `{detail}` instead.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope {
    pub success: bool,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<EnvelopeError>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeError {
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub correlation_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<Value>,
}

/// One entry of a 422 `detail` array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    #[serde(default)]
    pub loc: Vec<Value>,
    pub msg: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl ValidationIssue {
    /// Name of the offending field: the last string segment of `loc`.
    pub fn field(&self) -> Option<&str> {
        self.loc.iter().rev().find_map(|v| v.as_str())
            .filter(|s| *s != "body" && *s != "query")
    }
}
