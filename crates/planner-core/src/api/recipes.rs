use planner_types::{
    recipe::{Recipe, RecipeCreate, RecipeSearchParams, RecipeUpdate},
    Result,
};

use super::endpoint;
use crate::client::{ApiClient, RequestOptions};
use crate::ports::Method;

fn recipe_path(id: &str) -> String {
    endpoint(&format!("/recipes/{}", id))
}

pub async fn list(client: &ApiClient, params: &RecipeSearchParams) -> Result<Vec<Recipe>> {
    let opts = params
        .to_query_pairs()
        .into_iter()
        .fold(RequestOptions::new(Method::Get), |opts, (k, v)| opts.query(k, v));
    client.request(&endpoint("/recipes"), opts).await
}

pub async fn get(client: &ApiClient, id: &str) -> Result<Recipe> {
    client.get(&recipe_path(id)).await
}

/// Create a recipe. With `force`, the backend skips duplicate detection.
pub async fn create(client: &ApiClient, recipe: &RecipeCreate, force: bool) -> Result<Recipe> {
    let mut opts = RequestOptions::new(Method::Post).json(serde_json::to_value(recipe)?);
    if force {
        opts = opts.query("force", "true");
    }
    client.request(&endpoint("/recipes"), opts).await
}

pub async fn update(client: &ApiClient, id: &str, changes: &RecipeUpdate) -> Result<Recipe> {
    client.patch(&recipe_path(id), changes).await
}

pub async fn replace(client: &ApiClient, id: &str, recipe: &RecipeCreate) -> Result<Recipe> {
    client.put(&recipe_path(id), recipe).await
}

pub async fn delete(client: &ApiClient, id: &str) -> Result<()> {
    client.delete(&recipe_path(id)).await
}
