use chrono::NaiveDate;
use planner_types::{
    meal_plan::{Meal, MealCreate, MealUpdate, WeeklyMealPlan, WeeklyMealPlanUpdate},
    Result,
};

use super::endpoint;
use crate::client::{ApiClient, RequestOptions};
use crate::ports::Method;

fn meal_path(id: &str) -> String {
    endpoint(&format!("/meals/{}", id))
}

/// The plan for the week starting `week_start`. A week with no plan yet
/// comes back empty rather than as an error.
pub async fn get_weekly(client: &ApiClient, week_start: NaiveDate) -> Result<WeeklyMealPlan> {
    let opts = RequestOptions::new(Method::Get)
        .query("week_start", week_start.format("%Y-%m-%d").to_string());
    let plan: Option<WeeklyMealPlan> = client.request(&endpoint("/mealplans/weekly"), opts).await?;
    Ok(plan.unwrap_or_else(|| WeeklyMealPlan::empty(week_start)))
}

pub async fn update_weekly(client: &ApiClient, plan: &WeeklyMealPlanUpdate) -> Result<WeeklyMealPlan> {
    client.put(&endpoint("/mealplans/weekly"), plan).await
}

pub async fn create_meal(client: &ApiClient, meal: &MealCreate) -> Result<Meal> {
    client.post(&endpoint("/meals"), meal).await
}

pub async fn update_meal(client: &ApiClient, id: &str, changes: &MealUpdate) -> Result<Meal> {
    client.patch(&meal_path(id), changes).await
}

pub async fn delete_meal(client: &ApiClient, id: &str) -> Result<()> {
    client.delete(&meal_path(id)).await
}

pub async fn mark_cooked(client: &ApiClient, id: &str) -> Result<()> {
    let path = endpoint(&format!("/meals/{}/cooked", id));
    client.execute(&path, RequestOptions::new(Method::Post)).await?;
    Ok(())
}
