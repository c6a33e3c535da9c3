use planner_types::{
    grocery::{GroceryList, GroceryListCreate},
    Result,
};

use super::endpoint;
use crate::client::ApiClient;

/// Build a shopping list from the meals planned in the given date range.
pub async fn generate(client: &ApiClient, request: &GroceryListCreate) -> Result<GroceryList> {
    client.post(&endpoint("/grocery-lists"), request).await
}
