//! UI-level state that drives rendering.
//! Holds navigation, form buffers and the notice line. Domain data lives in
//! the stores; this is updated each frame by draining the EventBus.

use chrono::NaiveDate;
use planner_types::{
    auth::{LoginCredentials, RegisterRequest},
    event::AppEvent,
    meal_plan::{MealCreate, MealType},
    recipe::{Difficulty, Ingredient, Recipe, RecipeCreate, RecipeUpdate},
    session::LogoutReason,
    user::{UserPreferences, UserUpdate},
};

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Login,
    Register,
    ForgotPassword,
    ResetPassword,
    VerifyEmail,
    Recipes,
    MealPlan,
    Grocery,
    Chat,
    Profile,
}

impl Page {
    /// Pages shown in the top navigation once signed in
    pub fn main_pages() -> &'static [Page] {
        &[Page::Recipes, Page::MealPlan, Page::Grocery, Page::Chat, Page::Profile]
    }

    pub fn requires_auth(&self) -> bool {
        !matches!(
            self,
            Page::Login
                | Page::Register
                | Page::ForgotPassword
                | Page::ResetPassword
                | Page::VerifyEmail
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            Page::Login => "Log in",
            Page::Register => "Create account",
            Page::ForgotPassword => "Forgot password",
            Page::ResetPassword => "Reset password",
            Page::VerifyEmail => "Verify email",
            Page::Recipes => "Recipes",
            Page::MealPlan => "Meal plan",
            Page::Grocery => "Groceries",
            Page::Chat => "Assistant",
            Page::Profile => "Profile",
        }
    }
}

/// Transient message under the top bar
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub message: String,
    pub is_error: bool,
    /// Bumped per notice so a stale auto-clear timer leaves newer ones alone
    pub serial: u64,
}

/// Shared buffer for every auth form
#[derive(Debug, Clone, Default)]
pub struct AuthForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub full_name: String,
    /// Token from a verification or reset link
    pub token: String,
    /// Inline validation message, shown under the form
    pub error: Option<String>,
}

impl AuthForm {
    pub fn credentials(&self) -> Result<LoginCredentials, String> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err("Please enter your email and password.".to_string());
        }
        Ok(LoginCredentials {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }

    pub fn registration(&self) -> Result<RegisterRequest, String> {
        if !self.email.contains('@') {
            return Err("Please enter a valid email address.".to_string());
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(format!(
                "Password must be at least {} characters.",
                MIN_PASSWORD_LEN
            ));
        }
        let request = RegisterRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            confirm_password: self.confirm_password.clone(),
            full_name: Some(self.full_name.trim().to_string()).filter(|n| !n.is_empty()),
        };
        if !request.passwords_match() {
            return Err("Passwords do not match.".to_string());
        }
        Ok(request)
    }

    /// New password for the reset flow, checked the same way as registration
    pub fn new_password(&self) -> Result<String, String> {
        if self.token.trim().is_empty() {
            return Err("The reset link is missing its token.".to_string());
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(format!(
                "Password must be at least {} characters.",
                MIN_PASSWORD_LEN
            ));
        }
        if self.password != self.confirm_password {
            return Err("Passwords do not match.".to_string());
        }
        Ok(self.password.clone())
    }

    pub fn clear_secrets(&mut self) {
        self.password.clear();
        self.confirm_password.clear();
        self.token.clear();
        self.error = None;
    }
}

/// Text buffers behind the recipe editor window
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeEditor {
    /// `None` while creating a new recipe
    pub editing_id: Option<String>,
    pub title: String,
    pub description: String,
    /// One ingredient per line, e.g. "2 cup flour"
    pub ingredients: String,
    /// One step per line
    pub instructions: String,
    pub prep_time: String,
    pub cook_time: String,
    pub servings: String,
    pub difficulty: Option<Difficulty>,
    pub category: String,
    /// Comma separated
    pub tags: String,
    pub error: Option<String>,
}

impl RecipeEditor {
    pub fn from_recipe(recipe: &Recipe) -> Self {
        Self {
            editing_id: Some(recipe.id.clone()),
            ..Self::from_create(&RecipeCreate::from(recipe))
        }
    }

    /// Prefill a new recipe, e.g. from an assistant draft.
    pub fn from_create(recipe: &RecipeCreate) -> Self {
        Self {
            editing_id: None,
            title: recipe.title.clone(),
            description: recipe.description.clone().unwrap_or_default(),
            ingredients: recipe
                .ingredients
                .iter()
                .map(format_ingredient)
                .collect::<Vec<_>>()
                .join("\n"),
            instructions: recipe.instructions.join("\n"),
            prep_time: number_text(recipe.prep_time_minutes),
            cook_time: number_text(recipe.cook_time_minutes),
            servings: number_text(recipe.servings),
            difficulty: recipe.difficulty,
            category: recipe.category.clone().unwrap_or_default(),
            tags: recipe.tags.join(", "),
            error: None,
        }
    }

    pub fn to_create(&self) -> Result<RecipeCreate, String> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err("Please give the recipe a title.".to_string());
        }
        let mut recipe = RecipeCreate::new(title);
        recipe.description = non_empty(&self.description);
        recipe.ingredients = self
            .ingredients
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(parse_ingredient)
            .collect();
        recipe.instructions = self
            .instructions
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect();
        recipe.prep_time_minutes = parse_minutes("Prep time", &self.prep_time)?;
        recipe.cook_time_minutes = parse_minutes("Cook time", &self.cook_time)?;
        recipe.servings = parse_minutes("Servings", &self.servings)?;
        recipe.difficulty = self.difficulty;
        recipe.category = non_empty(&self.category);
        recipe.tags = self
            .tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect();
        Ok(recipe)
    }

    /// Full replacement of the edited fields as a partial update
    pub fn to_update(&self) -> Result<RecipeUpdate, String> {
        let full = self.to_create()?;
        Ok(RecipeUpdate {
            title: Some(full.title),
            description: full.description,
            ingredients: Some(full.ingredients),
            instructions: Some(full.instructions),
            prep_time_minutes: full.prep_time_minutes,
            cook_time_minutes: full.cook_time_minutes,
            servings: full.servings,
            difficulty: full.difficulty,
            category: full.category,
            tags: Some(full.tags),
        })
    }
}

/// "2 cup flour" → quantity 2, unit cup, name flour. A line without a
/// leading number is taken as a bare name.
pub fn parse_ingredient(line: &str) -> Ingredient {
    let mut parts = line.split_whitespace();
    let first = parts.next().unwrap_or_default();
    let looks_numeric = first
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || c == '½' || c == '¼');
    if !looks_numeric {
        return Ingredient::named(line.trim());
    }
    let rest: Vec<&str> = parts.collect();
    match rest.as_slice() {
        [] => Ingredient::named(first),
        [name] => Ingredient {
            name: name.to_string(),
            quantity: Some(first.to_string()),
            unit: None,
        },
        [unit, name @ ..] => Ingredient {
            name: name.join(" "),
            quantity: Some(first.to_string()),
            unit: Some(unit.to_string()),
        },
    }
}

pub fn format_ingredient(ingredient: &Ingredient) -> String {
    [
        ingredient.quantity.as_deref(),
        ingredient.unit.as_deref(),
        Some(ingredient.name.as_str()),
    ]
    .into_iter()
    .flatten()
    .filter(|s| !s.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
}

fn parse_minutes(label: &str, raw: &str) -> Result<Option<u32>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<u32>()
        .map(Some)
        .map_err(|_| format!("{} must be a whole number.", label))
}

fn number_text(value: Option<u32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn non_empty(raw: &str) -> Option<String> {
    Some(raw.trim().to_string()).filter(|s| !s.is_empty())
}

/// Free-text buffers for the ingredient filters
#[derive(Debug, Clone, Default)]
pub struct FilterForm {
    pub query: String,
    pub include: String,
    pub exclude: String,
    pub min_time: String,
    pub max_time: String,
}

impl FilterForm {
    /// Comma separated list with blanks dropped
    pub fn split_list(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn parse_time(raw: &str) -> Option<u32> {
        raw.trim().parse().ok()
    }
}

/// "Add meal" form on the planner page
#[derive(Debug, Clone)]
pub struct MealForm {
    pub date: Option<NaiveDate>,
    pub meal_type: MealType,
    pub recipe_id: Option<String>,
    pub servings: String,
    pub notes: String,
    pub error: Option<String>,
}

impl Default for MealForm {
    fn default() -> Self {
        Self {
            date: None,
            meal_type: MealType::Dinner,
            recipe_id: None,
            servings: String::new(),
            notes: String::new(),
            error: None,
        }
    }
}

impl MealForm {
    pub fn open_for(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            ..Self::default()
        }
    }

    pub fn to_create(&self) -> Result<MealCreate, String> {
        let date = self.date.ok_or_else(|| "Pick a day first.".to_string())?;
        let meal = MealCreate {
            date,
            meal_type: self.meal_type,
            recipe_id: self.recipe_id.clone(),
            servings: parse_minutes("Servings", &self.servings)?,
            notes: non_empty(&self.notes),
        };
        if meal.recipe_id.is_none() && meal.notes.is_none() {
            return Err("Choose a recipe or write a note.".to_string());
        }
        Ok(meal)
    }
}

/// Profile and preference buffers
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub full_name: String,
    /// Comma separated
    pub dietary_restrictions: String,
    /// Comma separated
    pub disliked_ingredients: String,
    pub household_size: String,
    pub week_start_day: String,
    /// Set once preferences have been loaded into the buffers
    pub loaded: bool,
}

impl ProfileForm {
    pub fn fill(&mut self, full_name: Option<&str>, prefs: &UserPreferences) {
        self.full_name = full_name.unwrap_or_default().to_string();
        self.dietary_restrictions = prefs.dietary_restrictions.join(", ");
        self.disliked_ingredients = prefs.disliked_ingredients.join(", ");
        self.household_size = number_text(prefs.household_size);
        self.week_start_day = prefs.week_start_day.clone().unwrap_or_default();
        self.loaded = true;
    }

    pub fn user_update(&self) -> UserUpdate {
        UserUpdate {
            full_name: non_empty(&self.full_name),
            email: None,
        }
    }

    pub fn preferences(&self) -> Result<UserPreferences, String> {
        Ok(UserPreferences {
            dietary_restrictions: FilterForm::split_list(&self.dietary_restrictions),
            disliked_ingredients: FilterForm::split_list(&self.disliked_ingredients),
            household_size: parse_minutes("Household size", &self.household_size)?,
            default_servings: None,
            week_start_day: non_empty(&self.week_start_day).map(|d| d.to_lowercase()),
        })
    }
}

/// State visible to UI panels
pub struct UiState {
    pub page: Page,
    /// Session restore has finished; until then nothing gated is drawn
    pub session_ready: bool,
    pub signed_in_as: Option<String>,
    pub notice: Option<Notice>,
    /// Requests in flight, for the spinner in the top bar
    pub pending: usize,
    pub auth: AuthForm,
    pub filters: FilterForm,
    pub editor: Option<RecipeEditor>,
    pub selected_recipe: Option<String>,
    pub meal_form: Option<MealForm>,
    pub chat_input: String,
    pub memory_text: String,
    pub show_memory: bool,
    pub profile: ProfileForm,
    notice_serial: u64,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            page: Page::Login,
            session_ready: false,
            signed_in_as: None,
            notice: None,
            pending: 0,
            auth: AuthForm::default(),
            filters: FilterForm::default(),
            editor: None,
            selected_recipe: None,
            meal_form: None,
            chat_input: String::new(),
            memory_text: String::new(),
            show_memory: false,
            profile: ProfileForm::default(),
            notice_serial: 0,
        }
    }

    /// Process events from the EventBus and update UI state
    pub fn process_events(&mut self, events: Vec<AppEvent>) {
        for event in events {
            match event {
                AppEvent::SessionRestored { authenticated } => {
                    self.session_ready = true;
                    if authenticated && !self.page.requires_auth() {
                        self.page = Page::Recipes;
                    }
                }
                AppEvent::LoggedIn { email } => {
                    self.auth.clear_secrets();
                    self.signed_in_as = Some(email.clone());
                    if !self.page.requires_auth() {
                        self.page = Page::Recipes;
                    }
                    self.show_notice(format!("Signed in as {}", email), false);
                }
                AppEvent::LoggedOut { reason } => {
                    self.signed_in_as = None;
                    self.editor = None;
                    self.selected_recipe = None;
                    self.meal_form = None;
                    self.chat_input.clear();
                    self.profile = ProfileForm::default();
                    self.page = Page::Login;
                    if reason == LogoutReason::Expired {
                        self.show_notice("Your session has expired. Please log in again.", true);
                    }
                }
                AppEvent::Notice { message } => {
                    self.show_notice(message, false);
                }
                AppEvent::Error { message } => {
                    self.show_notice(message, true);
                }
            }
        }
    }

    /// Page actually drawn: gated pages fall back to login without a session.
    pub fn effective_page(&self, authenticated: bool) -> Page {
        if self.page.requires_auth() && !authenticated {
            Page::Login
        } else {
            self.page
        }
    }

    pub fn navigate(&mut self, page: Page) {
        if self.page != page {
            log::debug!("Navigating to {:?}", page);
            self.auth.error = None;
            self.page = page;
        }
    }

    /// Returns the serial of the new notice.
    pub fn show_notice(&mut self, message: impl Into<String>, is_error: bool) -> u64 {
        self.notice_serial += 1;
        self.notice = Some(Notice {
            message: message.into(),
            is_error,
            serial: self.notice_serial,
        });
        self.notice_serial
    }

    /// Clears the notice only if it is still the one with `serial`.
    pub fn clear_notice(&mut self, serial: u64) {
        if self.notice.as_ref().is_some_and(|n| n.serial == serial) {
            self.notice = None;
        }
    }

    pub fn is_busy(&self) -> bool {
        self.pending > 0
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}
