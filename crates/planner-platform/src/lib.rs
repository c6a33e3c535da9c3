//! Browser adapters for the planner-core ports.

pub mod http;
pub mod origin;
pub mod storage;

pub(crate) mod js;

pub use http::FetchHttp;
