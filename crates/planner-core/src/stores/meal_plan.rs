//! Weekly meal plan state and week navigation.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{Duration, NaiveDate, Weekday};
use planner_types::{
    grocery::{GroceryList, GroceryListCreate},
    meal_plan::{week_start_for, Meal, MealCreate, MealUpdate, WeeklyMealPlan, WeeklyMealPlanUpdate},
    Result,
};

use crate::api::{grocery as grocery_api, meal_plans as api};
use crate::client::ApiClient;
use crate::humanize::{user_friendly_message, ErrorContext};

#[derive(Debug, Clone)]
pub struct MealPlanState {
    pub week_start: NaiveDate,
    pub first_day: Weekday,
    pub plan: WeeklyMealPlan,
    pub grocery_list: Option<GroceryList>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct MealPlanStore {
    state: Rc<RefCell<MealPlanState>>,
    client: ApiClient,
}

impl MealPlanStore {
    pub fn new(client: ApiClient, today: NaiveDate, first_day: Weekday) -> Self {
        let week_start = week_start_for(today, first_day);
        Self {
            state: Rc::new(RefCell::new(MealPlanState {
                week_start,
                first_day,
                plan: WeeklyMealPlan::empty(week_start),
                grocery_list: None,
                loading: false,
                error: None,
            })),
            client,
        }
    }

    pub fn snapshot(&self) -> MealPlanState {
        self.state.borrow().clone()
    }

    pub fn week_start(&self) -> NaiveDate {
        self.state.borrow().week_start
    }

    pub async fn fetch_week(&self) -> Result<()> {
        let week_start = {
            let mut state = self.state.borrow_mut();
            state.loading = true;
            state.week_start
        };
        let result = api::get_weekly(&self.client, week_start).await;
        let mut state = self.state.borrow_mut();
        state.loading = false;
        // The user may have navigated away while this was in flight
        if state.week_start != week_start {
            return Ok(());
        }
        match result {
            Ok(plan) => {
                state.plan = plan;
                state.error = None;
                Ok(())
            }
            Err(e) => {
                let context = ErrorContext::action("load").with_resource("meal plan");
                state.error = Some(user_friendly_message(&e, Some(&context)));
                Err(e)
            }
        }
    }

    pub async fn next_week(&self) -> Result<()> {
        self.shift_week(7).await
    }

    pub async fn previous_week(&self) -> Result<()> {
        self.shift_week(-7).await
    }

    /// Jump to the week containing `date`.
    pub async fn go_to(&self, date: NaiveDate) -> Result<()> {
        {
            let mut state = self.state.borrow_mut();
            state.week_start = week_start_for(date, state.first_day);
            state.plan = WeeklyMealPlan::empty(state.week_start);
            state.grocery_list = None;
        }
        self.fetch_week().await
    }

    async fn shift_week(&self, days: i64) -> Result<()> {
        let target = self.week_start() + Duration::days(days);
        self.go_to(target).await
    }

    pub async fn add_meal(&self, meal: &MealCreate) -> Result<Meal> {
        let created = api::create_meal(&self.client, meal).await?;
        self.refetch().await;
        Ok(created)
    }

    pub async fn update_meal(&self, id: &str, changes: &MealUpdate) -> Result<Meal> {
        let updated = api::update_meal(&self.client, id, changes).await?;
        self.refetch().await;
        Ok(updated)
    }

    pub async fn delete_meal(&self, id: &str) -> Result<()> {
        api::delete_meal(&self.client, id).await?;
        self.refetch().await;
        Ok(())
    }

    pub async fn mark_cooked(&self, id: &str) -> Result<()> {
        api::mark_cooked(&self.client, id).await?;
        self.refetch().await;
        Ok(())
    }

    /// The write already landed; a failed reload only leaves the week stale.
    async fn refetch(&self) {
        if let Err(e) = self.fetch_week().await {
            log::warn!("Week refetch after write failed: {}", e);
        }
    }

    /// Replace the whole week with the current local plan.
    pub async fn save_week(&self) -> Result<()> {
        let update = WeeklyMealPlanUpdate::from(&self.state.borrow().plan);
        let saved = api::update_weekly(&self.client, &update).await?;
        self.state.borrow_mut().plan = saved;
        Ok(())
    }

    /// Shopping list for every meal in the visible week.
    pub async fn generate_grocery_list(&self) -> Result<GroceryList> {
        let request = {
            let state = self.state.borrow();
            GroceryListCreate {
                start_date: state.plan.week_start,
                end_date: state.plan.week_end(),
                name: Some(format!("Week of {}", state.plan.week_start.format("%b %-d"))),
            }
        };
        let list = grocery_api::generate(&self.client, &request).await?;
        self.state.borrow_mut().grocery_list = Some(list.clone());
        Ok(list)
    }

    /// Local check-off; the list itself is not re-sent.
    pub fn toggle_grocery_item(&self, index: usize) {
        let mut state = self.state.borrow_mut();
        if let Some(item) = state
            .grocery_list
            .as_mut()
            .and_then(|list| list.items.get_mut(index))
        {
            item.checked = !item.checked;
        }
    }
}
