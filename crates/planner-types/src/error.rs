use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum PlannerError {
    #[error("{0}")]
    Api(ApiError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Cancelled")]
    Cancelled,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JS interop error: {0}")]
    JsInterop(String),

    #[error("{0}")]
    Other(String),
}

impl PlannerError {
    /// HTTP status of a failed API call, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            PlannerError::Api(api) => api.status,
            _ => None,
        }
    }

    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            PlannerError::Api(api) => Some(api),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, PlannerError::Cancelled)
    }
}

impl From<ApiError> for PlannerError {
    fn from(e: ApiError) -> Self {
        PlannerError::Api(e)
    }
}

impl From<serde_json::Error> for PlannerError {
    fn from(e: serde_json::Error) -> Self {
        PlannerError::Serialization(e.to_string())
    }
}

impl From<url::ParseError> for PlannerError {
    fn from(e: url::ParseError) -> Self {
        PlannerError::Config(format!("invalid URL: {}", e))
    }
}

/// A failed request, normalized from whatever error shape the backend sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    /// Parsed response payload, kept for callers that need structured detail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            error_type: None,
            correlation_id: None,
            body: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn is_conflict(&self) -> bool {
        self.status == Some(409)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
