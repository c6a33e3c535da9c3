pub mod auth;
pub mod chat;
pub mod config;
pub mod envelope;
pub mod error;
pub mod event;
pub mod grocery;
pub mod meal_plan;
pub mod recipe;
pub mod session;
pub mod user;

#[cfg(test)]
mod tests;

pub use error::{ApiError, PlannerError};
pub type Result<T> = std::result::Result<T, PlannerError>;
