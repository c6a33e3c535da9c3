//! Port traits: the hexagonal architecture boundary.
//!
//! These traits are defined here in `planner-core` (pure Rust).
//! Implementations live in `planner-platform` (browser adapters).
//! The core never imports platform code; it only depends on these traits.

use async_trait::async_trait;
use futures::stream::LocalBoxStream;
use planner_types::Result;

use crate::cancel::CancelToken;

// ─── HTTP Port ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

/// A fully-resolved request, ready for the transport
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A buffered response. The body is always text; JSON decoding happens in core.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Raw body chunks of a streamed response
pub type ByteStream = LocalBoxStream<'static, Result<Vec<u8>>>;

pub struct StreamingResponse {
    pub status: u16,
    pub body: ByteStream,
}

#[async_trait(?Send)]
pub trait HttpPort {
    /// Issue a request and buffer the whole body.
    /// Transport failures are `PlannerError::Network`; any HTTP status is `Ok`.
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse>;

    /// Issue a request and hand back the body as it arrives.
    /// Cancelling `cancel` aborts the request; the body stream then ends
    /// with `PlannerError::Cancelled` or simply stops.
    async fn open_stream(&self, req: HttpRequest, cancel: CancelToken) -> Result<StreamingResponse>;
}

// ─── Storage Port ────────────────────────────────────────────

/// String key/value persistence (browser localStorage or memory).
#[async_trait(?Send)]
pub trait StoragePort {
    /// Get a value by key
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Set a value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value
    async fn delete(&self, key: &str) -> Result<()>;

    /// Check if a key exists
    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// Name of this backend (for logging/debug)
    fn backend_name(&self) -> &str;
}
