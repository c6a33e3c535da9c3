use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub fn all() -> &'static [MealType] {
        &[MealType::Breakfast, MealType::Lunch, MealType::Dinner, MealType::Snack]
    }

    pub fn label(&self) -> &'static str {
        match self {
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
            MealType::Snack => "Snack",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub id: String,
    pub date: NaiveDate,
    pub meal_type: MealType,
    #[serde(default)]
    pub recipe_id: Option<String>,
    #[serde(default)]
    pub recipe_title: Option<String>,
    #[serde(default)]
    pub servings: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub cooked: bool,
}

impl Meal {
    pub fn title(&self) -> &str {
        self.recipe_title
            .as_deref()
            .or(self.notes.as_deref())
            .unwrap_or("Untitled meal")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyMealPlan {
    #[serde(default)]
    pub id: Option<String>,
    pub week_start: NaiveDate,
    #[serde(default)]
    pub meals: Vec<Meal>,
}

impl WeeklyMealPlan {
    pub fn empty(week_start: NaiveDate) -> Self {
        Self {
            id: None,
            week_start,
            meals: Vec::new(),
        }
    }

    pub fn days(&self) -> Vec<NaiveDate> {
        (0..7).map(|i| self.week_start + Duration::days(i)).collect()
    }

    pub fn week_end(&self) -> NaiveDate {
        self.week_start + Duration::days(6)
    }

    /// Meals on a given day, in breakfast → snack order.
    pub fn meals_on(&self, date: NaiveDate) -> Vec<&Meal> {
        let mut meals: Vec<&Meal> = self.meals.iter().filter(|m| m.date == date).collect();
        meals.sort_by_key(|m| m.meal_type);
        meals
    }
}

/// Start of the week containing `date`.
pub fn week_start_for(date: NaiveDate, first_day: Weekday) -> NaiveDate {
    let offset = (7 + date.weekday().num_days_from_monday() as i64
        - first_day.num_days_from_monday() as i64)
        % 7;
    date - Duration::days(offset)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealCreate {
    pub date: NaiveDate,
    pub meal_type: MealType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<&Meal> for MealCreate {
    fn from(m: &Meal) -> Self {
        Self {
            date: m.date,
            meal_type: m.meal_type,
            recipe_id: m.recipe_id.clone(),
            servings: m.servings,
            notes: m.notes.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MealUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<MealType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servings: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body of `PUT /mealplans/weekly`: replaces every meal of the week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyMealPlanUpdate {
    pub week_start: NaiveDate,
    pub meals: Vec<MealCreate>,
}

impl From<&WeeklyMealPlan> for WeeklyMealPlanUpdate {
    fn from(plan: &WeeklyMealPlan) -> Self {
        Self {
            week_start: plan.week_start,
            meals: plan.meals.iter().map(MealCreate::from).collect(),
        }
    }
}
