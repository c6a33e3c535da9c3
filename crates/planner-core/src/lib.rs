//! Platform-independent client core: ports, the API client, error
//! normalization and humanization, SSE decoding, session and domain stores.

pub mod api;
pub mod auth_guard;
pub mod cancel;
pub mod client;
pub mod envelope;
pub mod event_bus;
pub mod humanize;
pub mod ports;
pub mod session;
pub mod sse;
pub mod stores;
