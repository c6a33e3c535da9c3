//! Endpoint functions, one module per backend resource.
//!
//! Each function takes the shared [`ApiClient`](crate::client::ApiClient) and
//! returns typed data; errors are already normalized by the client.

pub mod auth;
pub mod chat;
pub mod grocery;
pub mod health;
pub mod meal_plans;
pub mod recipes;
pub mod users;

pub const API_PREFIX: &str = "/api/v1";

pub(crate) fn endpoint(path: &str) -> String {
    format!("{}{}", API_PREFIX, path)
}
