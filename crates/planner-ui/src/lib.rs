//! egui pages for the meal planner.
//!
//! Panels render from store snapshots plus the form state kept in
//! [`state::UiState`] and report what the user asked for as action enums.
//! They never call the backend themselves.

pub mod panels;
pub mod state;
pub mod theme;

#[cfg(test)]
mod tests;
