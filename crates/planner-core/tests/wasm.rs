//! WASM-target tests for planner-core.
//!
//! Runs the pure pieces (envelope decoding, auth guard, humanization, SSE
//! decoding, recipe filtering) under wasm32-unknown-unknown via
//! `wasm-pack test --node`.

use wasm_bindgen_test::*;

use planner_core::auth_guard::{is_draft_token_path, should_force_logout, AuthCheck};
use planner_core::cancel::CancelToken;
use planner_core::envelope::{is_success, normalize_error, ResponseBody};
use planner_core::event_bus::EventBus;
use planner_core::humanize::{retry_policy, sanitize_message, user_friendly_message};
use planner_core::sse::{frame_payload, SseDecoder};
use planner_core::stores::recipes::{filter_recipes, RecipeFilters};
use planner_types::event::AppEvent;
use planner_types::recipe::Recipe;

// ─── EventBus Tests ──────────────────────────────────────

#[wasm_bindgen_test]
fn event_bus_emit_and_drain() {
    let bus = EventBus::new();
    bus.emit(AppEvent::Notice { message: "saved".into() });
    assert!(bus.has_pending());
    assert_eq!(bus.drain().len(), 1);
    assert!(!bus.has_pending());
}

// ─── Envelope Tests ──────────────────────────────────────

#[wasm_bindgen_test]
fn envelope_success_false_is_failure() {
    let body = ResponseBody::parse(r#"{"success":false,"message":"Nope"}"#);
    assert!(!is_success(200, &body));
    assert_eq!(normalize_error(200, &body).message, "Nope");
}

#[wasm_bindgen_test]
fn envelope_empty_body_fallback_message() {
    assert_eq!(normalize_error(500, &ResponseBody::parse("")).message, "Request failed (500)");
}

// ─── Auth Guard Tests ────────────────────────────────────

#[wasm_bindgen_test]
fn auth_guard_token_vs_refresh_token() {
    let body = ResponseBody::Empty;
    let draft = AuthCheck { status: 401, body: &body, was_ever_authenticated: true, path: "/api/v1/ai/drafts/1?token=a" };
    let refresh = AuthCheck { path: "/api/v1/ai/drafts/1?refresh_token=a", ..draft };
    assert!(!should_force_logout(&draft));
    assert!(should_force_logout(&refresh));
    assert!(!is_draft_token_path("/api/v1/recipes"));
}

// ─── Humanize Tests ──────────────────────────────────────

#[wasm_bindgen_test]
fn humanize_strips_uuid() {
    assert_eq!(
        sanitize_message("Recipe 3fa85f64-5717-4562-b3fc-2c963f66afa6 is locked"),
        "Recipe is locked"
    );
    assert!(!user_friendly_message("", None).is_empty());
}

#[wasm_bindgen_test]
fn retry_policy_table() {
    assert_eq!(retry_policy(429).suggested_delay_ms, Some(5000));
    assert!(!retry_policy(400).can_retry);
}

// ─── SSE Tests ───────────────────────────────────────────

#[wasm_bindgen_test]
fn sse_decoder_frames() {
    let mut decoder = SseDecoder::new();
    let frames = decoder.push(b"data: 1\n\ndata: 2\n");
    assert_eq!(frames, vec!["data: 1"]);
    assert_eq!(frame_payload(&frames[0]), Some("1"));
    assert_eq!(decoder.pending(), "data: 2\n");
}

#[wasm_bindgen_test]
fn cancel_token_is_shared() {
    let token = CancelToken::new();
    token.clone().cancel();
    assert!(token.is_cancelled());
}

// ─── Recipe Filter Tests ─────────────────────────────────

#[wasm_bindgen_test]
fn recipe_filter_idempotent() {
    let recipes: Vec<Recipe> = serde_json::from_str(
        r#"[{"id":"1","title":"Soup"},{"id":"2","title":"Salad"}]"#,
    )
    .unwrap();
    let filters = RecipeFilters { query: "so".into(), ..Default::default() };
    let once = filter_recipes(&recipes, &filters);
    assert_eq!(once, filter_recipes(&once, &filters));
    assert_eq!(once.len(), 1);
}
