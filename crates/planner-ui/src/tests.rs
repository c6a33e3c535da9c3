#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Weekday};
    use planner_core::stores::meal_plan::MealPlanState;
    use planner_types::event::AppEvent;
    use planner_types::meal_plan::{MealType, WeeklyMealPlan};
    use planner_types::recipe::{Difficulty, Ingredient, Recipe};
    use planner_types::session::LogoutReason;
    use planner_types::user::UserPreferences;

    use crate::panels::meal_plan::week_title;
    use crate::panels::recipes::recipe_meta;
    use crate::state::*;

    fn recipe() -> Recipe {
        serde_json::from_value(serde_json::json!({
            "id": "r1",
            "title": "Pancakes",
            "ingredients": [
                { "name": "flour", "quantity": "2", "unit": "cup" },
                { "name": "eggs", "quantity": "3" },
                { "name": "salt" }
            ],
            "instructions": ["Mix", "Fry"],
            "prep_time_minutes": 10,
            "cook_time_minutes": 15,
            "servings": 4,
            "difficulty": "easy",
            "category": "Breakfast",
            "tags": ["sweet", "quick"]
        }))
        .unwrap()
    }

    // ─── UiState Tests ───────────────────────────────────────

    #[test]
    fn test_ui_state_initial() {
        let state = UiState::new();
        assert_eq!(state.page, Page::Login);
        assert!(!state.session_ready);
        assert!(state.signed_in_as.is_none());
        assert!(state.notice.is_none());
        assert!(!state.is_busy());
    }

    #[test]
    fn test_session_restored_authenticated_moves_to_recipes() {
        let mut state = UiState::new();
        state.process_events(vec![AppEvent::SessionRestored { authenticated: true }]);
        assert!(state.session_ready);
        assert_eq!(state.page, Page::Recipes);
    }

    #[test]
    fn test_session_restored_keeps_deep_link() {
        let mut state = UiState::new();
        state.page = Page::ResetPassword;
        state.process_events(vec![AppEvent::SessionRestored { authenticated: false }]);
        assert_eq!(state.page, Page::ResetPassword);
    }

    #[test]
    fn test_logged_in_clears_secrets() {
        let mut state = UiState::new();
        state.auth.email = "a@b.co".to_string();
        state.auth.password = "hunter22".to_string();
        state.process_events(vec![AppEvent::LoggedIn { email: "a@b.co".to_string() }]);
        assert_eq!(state.page, Page::Recipes);
        assert!(state.auth.password.is_empty());
        assert_eq!(state.auth.email, "a@b.co");
        assert_eq!(state.signed_in_as.as_deref(), Some("a@b.co"));
        assert!(!state.notice.as_ref().unwrap().is_error);
    }

    #[test]
    fn test_expired_logout_shows_notice() {
        let mut state = UiState::new();
        state.page = Page::Chat;
        state.chat_input = "draft".to_string();
        state.process_events(vec![AppEvent::LoggedOut { reason: LogoutReason::Expired }]);
        assert_eq!(state.page, Page::Login);
        assert!(state.chat_input.is_empty());
        let notice = state.notice.unwrap();
        assert!(notice.is_error);
        assert!(notice.message.contains("expired"));
    }

    #[test]
    fn test_manual_logout_is_quiet() {
        let mut state = UiState::new();
        state.page = Page::Profile;
        state.process_events(vec![AppEvent::LoggedOut { reason: LogoutReason::Manual }]);
        assert_eq!(state.page, Page::Login);
        assert!(state.notice.is_none());
    }

    #[test]
    fn test_error_event_sets_error_notice() {
        let mut state = UiState::new();
        state.process_events(vec![
            AppEvent::Notice { message: "Saved".to_string() },
            AppEvent::Error { message: "Nope".to_string() },
        ]);
        let notice = state.notice.unwrap();
        assert_eq!(notice.message, "Nope");
        assert!(notice.is_error);
    }

    #[test]
    fn test_clear_notice_ignores_stale_serial() {
        let mut state = UiState::new();
        let first = state.show_notice("one", false);
        let second = state.show_notice("two", false);
        state.clear_notice(first);
        assert_eq!(state.notice.as_ref().unwrap().message, "two");
        state.clear_notice(second);
        assert!(state.notice.is_none());
    }

    #[test]
    fn test_effective_page_gates_on_session() {
        let mut state = UiState::new();
        state.page = Page::MealPlan;
        assert_eq!(state.effective_page(false), Page::Login);
        assert_eq!(state.effective_page(true), Page::MealPlan);
        state.page = Page::VerifyEmail;
        assert_eq!(state.effective_page(false), Page::VerifyEmail);
    }

    #[test]
    fn test_navigate_clears_form_error() {
        let mut state = UiState::new();
        state.auth.error = Some("bad".to_string());
        state.navigate(Page::Register);
        assert_eq!(state.page, Page::Register);
        assert!(state.auth.error.is_none());
    }

    // ─── Auth Form Tests ─────────────────────────────────────

    #[test]
    fn test_credentials_require_both_fields() {
        let mut form = AuthForm::default();
        form.email = "  a@b.co ".to_string();
        assert!(form.credentials().is_err());
        form.password = "pw".to_string();
        let creds = form.credentials().unwrap();
        assert_eq!(creds.email, "a@b.co");
    }

    #[test]
    fn test_registration_checks() {
        let mut form = AuthForm {
            email: "a@b.co".to_string(),
            password: "short".to_string(),
            confirm_password: "short".to_string(),
            ..AuthForm::default()
        };
        assert!(form.registration().unwrap_err().contains("at least"));

        form.password = "longenough".to_string();
        assert_eq!(form.registration().unwrap_err(), "Passwords do not match.");

        form.confirm_password = "longenough".to_string();
        let request = form.registration().unwrap();
        assert!(request.full_name.is_none());

        form.email = "nope".to_string();
        assert!(form.registration().is_err());
    }

    #[test]
    fn test_reset_requires_token() {
        let mut form = AuthForm {
            password: "longenough".to_string(),
            confirm_password: "longenough".to_string(),
            ..AuthForm::default()
        };
        assert!(form.new_password().is_err());
        form.token = "tok".to_string();
        assert_eq!(form.new_password().unwrap(), "longenough");
    }

    // ─── Recipe Editor Tests ─────────────────────────────────

    #[test]
    fn test_parse_ingredient_lines() {
        assert_eq!(
            parse_ingredient("2 cup flour"),
            Ingredient {
                name: "flour".to_string(),
                quantity: Some("2".to_string()),
                unit: Some("cup".to_string()),
            }
        );
        assert_eq!(parse_ingredient("3 eggs").unit, None);
        assert_eq!(parse_ingredient("3 eggs").quantity.as_deref(), Some("3"));
        assert_eq!(parse_ingredient("a pinch of salt"), Ingredient::named("a pinch of salt"));
        assert_eq!(parse_ingredient("1 tbsp olive oil").name, "olive oil");
    }

    #[test]
    fn test_editor_from_recipe_and_back() {
        let editor = RecipeEditor::from_recipe(&recipe());
        assert_eq!(editor.editing_id.as_deref(), Some("r1"));
        assert_eq!(editor.ingredients, "2 cup flour\n3 eggs\nsalt");
        assert_eq!(editor.tags, "sweet, quick");

        let create = editor.to_create().unwrap();
        assert_eq!(create.title, "Pancakes");
        assert_eq!(create.ingredients, recipe().ingredients);
        assert_eq!(create.instructions, vec!["Mix", "Fry"]);
        assert_eq!(create.prep_time_minutes, Some(10));
        assert_eq!(create.difficulty, Some(Difficulty::Easy));
        assert_eq!(create.tags, vec!["sweet", "quick"]);

        let update = editor.to_update().unwrap();
        assert_eq!(update.title.as_deref(), Some("Pancakes"));
        assert_eq!(update.category.as_deref(), Some("Breakfast"));
    }

    #[test]
    fn test_editor_validation() {
        let mut editor = RecipeEditor::default();
        assert!(editor.to_create().is_err());
        editor.title = "Soup".to_string();
        editor.cook_time = "half an hour".to_string();
        assert_eq!(editor.to_create().unwrap_err(), "Cook time must be a whole number.");
        editor.cook_time = " 30 ".to_string();
        let soup = editor.to_create().unwrap();
        assert_eq!(soup.cook_time_minutes, Some(30));
        assert!(soup.description.is_none());
        assert!(soup.ingredients.is_empty());
    }

    #[test]
    fn test_recipe_meta_line() {
        assert_eq!(recipe_meta(&recipe()), "25 min · Easy · Breakfast · serves 4");
    }

    // ─── Filter / Meal / Profile Form Tests ──────────────────

    #[test]
    fn test_filter_form_helpers() {
        assert_eq!(FilterForm::split_list(" eggs, ,milk "), vec!["eggs", "milk"]);
        assert_eq!(FilterForm::parse_time("45"), Some(45));
        assert_eq!(FilterForm::parse_time("soon"), None);
    }

    #[test]
    fn test_meal_form_needs_recipe_or_note() {
        let day = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
        assert!(MealForm::default().to_create().is_err());

        let mut form = MealForm::open_for(day);
        assert!(form.to_create().is_err());
        form.notes = "Leftovers".to_string();
        let meal = form.to_create().unwrap();
        assert_eq!(meal.date, day);
        assert_eq!(meal.meal_type, MealType::Dinner);
        assert_eq!(meal.notes.as_deref(), Some("Leftovers"));
    }

    #[test]
    fn test_profile_form_round_trip() {
        let prefs = UserPreferences {
            dietary_restrictions: vec!["vegetarian".to_string()],
            disliked_ingredients: vec!["olives".to_string(), "anchovies".to_string()],
            household_size: Some(3),
            default_servings: None,
            week_start_day: Some("sunday".to_string()),
        };
        let mut form = ProfileForm::default();
        form.fill(Some("Sam"), &prefs);
        assert!(form.loaded);
        assert_eq!(form.disliked_ingredients, "olives, anchovies");
        assert_eq!(form.preferences().unwrap(), prefs);
        assert_eq!(form.user_update().full_name.as_deref(), Some("Sam"));

        form.household_size = "many".to_string();
        assert!(form.preferences().is_err());
    }

    #[test]
    fn test_week_title() {
        let start = NaiveDate::from_ymd_opt(2026, 10, 12).unwrap();
        let view = MealPlanState {
            week_start: start,
            first_day: Weekday::Mon,
            plan: WeeklyMealPlan::empty(start),
            grocery_list: None,
            loading: false,
            error: None,
        };
        assert_eq!(week_title(&view), "Week of Oct 12 – Oct 18");
    }
}
