#[cfg(test)]
mod tests {
    use crate::auth::*;
    use crate::chat::*;
    use crate::config::*;
    use crate::envelope::*;
    use crate::error::*;
    use crate::grocery::*;
    use crate::meal_plan::*;
    use crate::recipe::*;
    use crate::session::*;
    use crate::user::*;
    use chrono::{NaiveDate, Weekday};
    use serde_json::json;

    fn recipe(title: &str) -> Recipe {
        serde_json::from_value(json!({ "id": "r1", "title": title })).unwrap()
    }

    // ─── Config Tests ────────────────────────────────────────

    #[test]
    fn test_configured_base_url_wins() {
        let config = ClientConfig {
            api_base: Some("https://api.example.com/".to_string()),
            mode: BuildMode::Production,
            ..Default::default()
        };
        assert_eq!(config.resolve_base_url().unwrap(), "https://api.example.com");
    }

    #[test]
    fn test_dev_fallback_in_development_and_test() {
        for mode in [BuildMode::Development, BuildMode::Test] {
            let config = ClientConfig { api_base: None, mode, ..Default::default() };
            assert_eq!(config.resolve_base_url().unwrap(), DEV_API_BASE);
        }
    }

    #[test]
    fn test_missing_base_url_in_production_is_error() {
        let config = ClientConfig {
            api_base: Some("   ".to_string()),
            mode: BuildMode::Production,
            ..Default::default()
        };
        let err = config.resolve_base_url().unwrap_err();
        assert!(matches!(err, PlannerError::Config(_)));
    }

    #[test]
    fn test_storage_backend_default() {
        assert_eq!(StorageConfig::default().backend, StorageBackendType::Auto);
    }

    // ─── Error Tests ─────────────────────────────────────────

    #[test]
    fn test_error_display() {
        let err = PlannerError::Api(ApiError::new("Recipe not found").with_status(404));
        assert_eq!(err.to_string(), "Recipe not found");
        assert_eq!(err.status(), Some(404));

        assert_eq!(PlannerError::Network("offline".into()).to_string(), "Network error: offline");
        assert_eq!(PlannerError::Cancelled.to_string(), "Cancelled");
        assert!(PlannerError::Cancelled.is_cancelled());
    }

    #[test]
    fn test_error_from_serde() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{{invalid}}").unwrap_err();
        let err: PlannerError = serde_err.into();
        assert!(matches!(err, PlannerError::Serialization(_)));
    }

    // ─── Session Tests ───────────────────────────────────────

    #[test]
    fn test_session_default_is_anonymous() {
        let session = Session::default();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_session_roundtrip() {
        let user = UserSummary {
            id: "u1".into(),
            email: "cook@example.com".into(),
            full_name: None,
            is_verified: true,
        };
        let session = Session::new("tok", user);
        let json = serde_json::to_string(&session).unwrap();
        let restored: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, session);
        assert!(restored.is_authenticated());
        assert_eq!(restored.user.unwrap().display_name(), "cook@example.com");
    }

    #[test]
    fn test_logout_reason_serialization() {
        assert_eq!(serde_json::to_string(&LogoutReason::Expired).unwrap(), r#""expired""#);
        assert_eq!(LogoutReason::Manual.as_str(), "manual");
    }

    // ─── Auth Tests ──────────────────────────────────────────

    #[test]
    fn test_register_request_omits_confirm_password() {
        let req = RegisterRequest {
            email: "a@b.com".into(),
            password: "hunter22".into(),
            confirm_password: "hunter22".into(),
            full_name: Some("Ann".into()),
        };
        assert!(req.passwords_match());
        let value = serde_json::to_value(&req).unwrap();
        assert!(value.get("confirm_password").is_none());
        assert!(value.get("confirmPassword").is_none());
        assert_eq!(value["password"], "hunter22");
    }

    #[test]
    fn test_auth_response_without_token() {
        let resp: AuthResponse =
            serde_json::from_value(json!({ "message": "check your inbox" })).unwrap();
        assert!(resp.access_token.is_none());
        assert_eq!(resp.message.as_deref(), Some("check your inbox"));
    }

    // ─── Envelope Tests ──────────────────────────────────────

    #[test]
    fn test_envelope_error_type_rename() {
        let env: ApiEnvelope = serde_json::from_value(json!({
            "success": false,
            "data": null,
            "message": "Token expired",
            "error": { "type": "token_expired", "correlation_id": "abc" }
        }))
        .unwrap();
        assert!(!env.success);
        assert!(env.data.is_none());
        let error = env.error.unwrap();
        assert_eq!(error.error_type.as_deref(), Some("token_expired"));
        assert_eq!(error.correlation_id.as_deref(), Some("abc"));
    }

    #[test]
    fn test_validation_issue_field() {
        let issue: ValidationIssue = serde_json::from_value(json!({
            "loc": ["body", "email"],
            "msg": "value is not a valid email address",
            "type": "value_error.email"
        }))
        .unwrap();
        assert_eq!(issue.field(), Some("email"));

        let issue: ValidationIssue =
            serde_json::from_value(json!({ "loc": ["body"], "msg": "x" })).unwrap();
        assert_eq!(issue.field(), None);
    }

    // ─── Recipe Tests ────────────────────────────────────────

    #[test]
    fn test_total_time() {
        let mut r = recipe("Soup");
        assert_eq!(r.total_time_minutes(), None);
        r.prep_time_minutes = Some(10);
        assert_eq!(r.total_time_minutes(), Some(10));
        r.cook_time_minutes = Some(25);
        assert_eq!(r.total_time_minutes(), Some(35));
    }

    #[test]
    fn test_total_time_saturates() {
        let mut r = recipe("Stock");
        r.prep_time_minutes = Some(u32::MAX);
        r.cook_time_minutes = Some(60);
        assert_eq!(r.total_time_minutes(), Some(u32::MAX));
    }

    #[test]
    fn test_created_timestamp_formats() {
        let mut r = recipe("Soup");
        r.created_at = Some("2026-03-01T12:00:00Z".into());
        let rfc = r.created().unwrap();
        r.created_at = Some("2026-03-01T12:00:00.000123".into());
        let naive = r.created().unwrap();
        assert!(naive > rfc);
        r.created_at = Some("yesterday".into());
        assert!(r.created().is_none());
    }

    #[test]
    fn test_recipe_create_skips_empty_fields() {
        let value = serde_json::to_value(RecipeCreate::new("Pancakes")).unwrap();
        assert_eq!(value["title"], "Pancakes");
        assert!(value.get("difficulty").is_none());
        assert!(value.get("tags").is_none());
    }

    #[test]
    fn test_difficulty_serialization() {
        assert_eq!(serde_json::to_string(&Difficulty::Medium).unwrap(), r#""medium""#);
        let d: Difficulty = serde_json::from_str(r#""hard""#).unwrap();
        assert_eq!(d, Difficulty::Hard);
    }

    #[test]
    fn test_search_params_query_pairs() {
        let params = RecipeSearchParams {
            query: Some("  curry ".into()),
            difficulty: Some(Difficulty::Easy),
            max_total_time: Some(30),
            limit: Some(20),
            ..Default::default()
        };
        assert_eq!(
            params.to_query_pairs(),
            vec![
                ("query", "curry".to_string()),
                ("difficulty", "easy".to_string()),
                ("max_total_time", "30".to_string()),
                ("limit", "20".to_string()),
            ]
        );
        assert!(RecipeSearchParams::default().to_query_pairs().is_empty());
    }

    #[test]
    fn test_duplicate_info_wrapped_in_detail() {
        let body = json!({
            "detail": {
                "message": "Similar recipe exists",
                "existing_recipe_id": "r9",
                "similar_recipes": [
                    { "id": "r2", "title": "Soup", "similarity": 0.71 },
                    { "id": "r9", "title": "Soup!", "similarity": 0.98 }
                ]
            }
        });
        let info = DuplicateInfo::from_body(&body).unwrap();
        assert_eq!(info.existing_recipe_id.as_deref(), Some("r9"));
        assert_eq!(info.similar_recipes[0].id, "r9");
        assert_eq!(info.best_match_id(), Some("r9"));
    }

    #[test]
    fn test_duplicate_info_bare_object() {
        let body = json!({ "similar_recipes": [{ "id": "r3", "title": "Stew", "similarity": 0.8 }] });
        let info = DuplicateInfo::from_body(&body).unwrap();
        assert!(info.existing_recipe_id.is_none());
        assert_eq!(info.best_match_id(), Some("r3"));
    }

    #[test]
    fn test_duplicate_info_rejects_other_shapes() {
        assert!(DuplicateInfo::from_body(&json!({ "detail": "Conflict" })).is_none());
        assert!(DuplicateInfo::from_body(&json!({ "similar_recipes": [] })).is_none());
        assert!(DuplicateInfo::from_body(&json!("text")).is_none());
    }

    // ─── Meal Plan Tests ─────────────────────────────────────

    #[test]
    fn test_week_start_for() {
        let wed = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
        assert_eq!(week_start_for(wed, Weekday::Mon), NaiveDate::from_ymd_opt(2026, 10, 12).unwrap());
        assert_eq!(week_start_for(wed, Weekday::Sun), NaiveDate::from_ymd_opt(2026, 10, 11).unwrap());
        let mon = NaiveDate::from_ymd_opt(2026, 10, 12).unwrap();
        assert_eq!(week_start_for(mon, Weekday::Mon), mon);
    }

    #[test]
    fn test_meals_on_orders_by_meal_type() {
        let plan: WeeklyMealPlan = serde_json::from_value(json!({
            "week_start": "2026-10-12",
            "meals": [
                { "id": "m1", "date": "2026-10-13", "meal_type": "dinner", "recipe_title": "Tacos" },
                { "id": "m2", "date": "2026-10-13", "meal_type": "breakfast", "notes": "Oats" },
                { "id": "m3", "date": "2026-10-14", "meal_type": "lunch" }
            ]
        }))
        .unwrap();
        let day = NaiveDate::from_ymd_opt(2026, 10, 13).unwrap();
        let meals = plan.meals_on(day);
        assert_eq!(meals.len(), 2);
        assert_eq!(meals[0].title(), "Oats");
        assert_eq!(meals[1].title(), "Tacos");
        assert_eq!(plan.days().len(), 7);
        assert_eq!(plan.week_end(), NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
    }

    // ─── Grocery Tests ───────────────────────────────────────

    #[test]
    fn test_grocery_grouping_and_display() {
        let list: GroceryList = serde_json::from_value(json!({
            "id": "g1",
            "items": [
                { "name": "flour", "quantity": 2.0, "unit": "cups", "category": "Baking" },
                { "name": "eggs", "quantity": 3, "checked": true, "category": "Dairy" },
                { "name": "salt" },
                { "name": "milk", "quantity": 1.5, "unit": "l", "category": "Dairy" }
            ]
        }))
        .unwrap();
        let groups = list.by_category();
        assert_eq!(groups.keys().cloned().collect::<Vec<_>>(), vec!["Baking", "Dairy", "Other"]);
        assert_eq!(groups["Dairy"].len(), 2);
        assert_eq!(groups["Dairy"][1].0, 3);
        assert_eq!(list.remaining(), 3);
        assert_eq!(list.items[0].display(), "2 cups flour");
        assert_eq!(list.items[1].display(), "3 eggs");
        assert_eq!(list.items[2].display(), "salt");
        assert_eq!(list.items[3].display(), "1.5 l milk");
    }

    // ─── Chat Event Tests ────────────────────────────────────

    #[test]
    fn test_stream_event_delta() {
        let ev = ChatStreamEvent::from_json(
            r#"{"event":"message.delta","data":{"delta":"Hel"},"message_id":"m1"}"#,
        )
        .unwrap()
        .unwrap();
        assert_eq!(ev.message_id.as_deref(), Some("m1"));
        assert_eq!(ev.event, ChatEvent::MessageDelta(DeltaData { delta: "Hel".into() }));
        assert!(!ev.is_terminal());
    }

    #[test]
    fn test_stream_event_done_without_data() {
        let ev = ChatStreamEvent::from_json(r#"{"event":"done"}"#).unwrap().unwrap();
        assert!(ev.is_terminal());
        assert_eq!(ev.event.tag(), "done");
    }

    #[test]
    fn test_stream_event_error_is_terminal() {
        let ev = ChatStreamEvent::from_json(
            r#"{"event":"error","data":{"message":"boom","type":"internal_error"}}"#,
        )
        .unwrap()
        .unwrap();
        assert!(ev.is_terminal());
        match ev.event {
            ChatEvent::Error(data) => assert_eq!(data.error_type.as_deref(), Some("internal_error")),
            other => panic!("Wrong variant: {:?}", other),
        }
    }

    #[test]
    fn test_stream_event_blocks_keep_fields() {
        let ev = ChatStreamEvent::from_json(
            r#"{"event":"blocks.append","data":{"blocks":[{"type":"recipe_card","title":"Chili","recipe_id":"r1"}]}}"#,
        )
        .unwrap()
        .unwrap();
        let ChatEvent::BlocksAppend(data) = ev.event else { panic!("Wrong variant") };
        assert_eq!(data.blocks[0].kind, "recipe_card");
        assert_eq!(data.blocks[0].title(), Some("Chili"));
        assert_eq!(data.blocks[0].fields["recipe_id"], "r1");
    }

    #[test]
    fn test_stream_event_tool_aliases() {
        let ev = ChatStreamEvent::from_json(
            r#"{"event":"tool.proposed","data":{"id":"a1","name":"add_recipe","arguments":{"title":"Chili"}}}"#,
        )
        .unwrap()
        .unwrap();
        let ChatEvent::ToolProposed(data) = ev.event else { panic!("Wrong variant") };
        assert_eq!(data.action_id.as_deref(), Some("a1"));
        assert_eq!(data.tool.as_deref(), Some("add_recipe"));
    }

    #[test]
    fn test_stream_event_unknown_tag() {
        assert!(ChatStreamEvent::from_json(r#"{"event":"ping","data":{}}"#).unwrap().is_none());
    }

    #[test]
    fn test_stream_event_payload_of_wrong_shape_is_skipped() {
        let ev = ChatStreamEvent::from_json(r#"{"event":"message.delta","data":{"delta":42}}"#).unwrap();
        assert!(ev.is_none());
        let ev = ChatEvent::from_parts("memory.updated", json!({ "content": "No nuts" })).unwrap();
        assert_eq!(
            ev,
            Some(ChatEvent::MemoryUpdated(MemoryUpdatedData { content: "No nuts".into() }))
        );
    }

    #[test]
    fn test_stream_event_invalid_json() {
        assert!(ChatStreamEvent::from_json("{not json").is_err());
        assert!(ChatStreamEvent::from_json(r#"{"data":{}}"#).is_err());
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&ChatRole::Assistant).unwrap(), r#""assistant""#);
        let msg = ChatMessage::assistant("m1", "hi");
        assert_eq!(msg.role, ChatRole::Assistant);
    }
}
