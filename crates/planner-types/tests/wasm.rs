//! WASM-target tests for planner-types.
//!
//! Mirrors the native unit tests but runs under wasm32-unknown-unknown
//! via `wasm-pack test --node`.

use wasm_bindgen_test::*;

use chrono::{NaiveDate, Weekday};
use serde_json::json;

use planner_types::auth::*;
use planner_types::chat::*;
use planner_types::config::*;
use planner_types::error::*;
use planner_types::meal_plan::*;
use planner_types::recipe::*;
use planner_types::session::*;

// ─── Config Tests ────────────────────────────────────────

#[wasm_bindgen_test]
fn production_requires_base_url() {
    let config = ClientConfig {
        api_base: None,
        mode: BuildMode::Production,
        ..Default::default()
    };
    assert!(matches!(config.resolve_base_url(), Err(PlannerError::Config(_))));
}

#[wasm_bindgen_test]
fn test_mode_falls_back_to_dev_base() {
    let config = ClientConfig {
        mode: BuildMode::Test,
        ..Default::default()
    };
    assert_eq!(config.resolve_base_url().unwrap(), DEV_API_BASE);
}

// ─── Error Tests ─────────────────────────────────────────

#[wasm_bindgen_test]
fn api_error_status_and_cancel() {
    let err = PlannerError::Api(ApiError::new("Not found").with_status(404));
    assert_eq!(err.status(), Some(404));
    assert!(!err.is_cancelled());
    assert!(PlannerError::Cancelled.is_cancelled());
    assert_eq!(PlannerError::Cancelled.status(), None);
}

// ─── Session / Auth Tests ────────────────────────────────

#[wasm_bindgen_test]
fn session_json_roundtrip() {
    let json = r#"{"token":"t1","user":{"id":"u1","email":"a@b.co"}}"#;
    let session: Session = serde_json::from_str(json).unwrap();
    assert!(session.is_authenticated());
    assert_eq!(session.user.unwrap().display_name(), "a@b.co");
}

#[wasm_bindgen_test]
fn register_body_has_no_confirm_password() {
    let req = RegisterRequest {
        email: "a@b.co".to_string(),
        password: "pw123456".to_string(),
        confirm_password: "pw123456".to_string(),
        full_name: None,
    };
    let value = serde_json::to_value(&req).unwrap();
    assert!(value.get("confirm_password").is_none());
    assert!(req.passwords_match());
}

// ─── Recipe Tests ────────────────────────────────────────

#[wasm_bindgen_test]
fn duplicate_info_picks_best_match() {
    let body = json!({
        "detail": {
            "similar_recipes": [
                { "id": "r2", "title": "Soup", "similarity": 0.5 },
                { "id": "r3", "title": "Soup 2", "similarity": 0.9 }
            ]
        }
    });
    let info = DuplicateInfo::from_body(&body).unwrap();
    assert_eq!(info.best_match_id(), Some("r3"));
}

#[wasm_bindgen_test]
fn search_params_skip_blank_query() {
    let params = RecipeSearchParams {
        query: Some("   ".to_string()),
        limit: Some(20),
        ..Default::default()
    };
    assert_eq!(params.to_query_pairs(), vec![("limit", "20".to_string())]);
}

// ─── Meal Plan Tests ─────────────────────────────────────

#[wasm_bindgen_test]
fn week_start_for_sunday_weeks() {
    let sat = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
    assert_eq!(
        week_start_for(sat, Weekday::Sun),
        NaiveDate::from_ymd_opt(2026, 10, 11).unwrap()
    );
}

// ─── Chat Event Tests ────────────────────────────────────

#[wasm_bindgen_test]
fn stream_event_delta_and_done() {
    let delta = ChatStreamEvent::from_json(r#"{"event":"message.delta","data":{"delta":"Hi"}}"#)
        .unwrap()
        .unwrap();
    assert!(!delta.is_terminal());
    assert_eq!(delta.event.tag(), "message.delta");

    let done = ChatStreamEvent::from_json(r#"{"event":"done","data":null}"#)
        .unwrap()
        .unwrap();
    assert!(done.is_terminal());
}

#[wasm_bindgen_test]
fn stream_event_unknown_tag_is_skipped() {
    assert!(ChatStreamEvent::from_json(r#"{"event":"heartbeat"}"#).unwrap().is_none());
}
