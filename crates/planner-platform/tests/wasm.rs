//! WASM-target tests for planner-platform (Node.js runtime).
//!
//! Covers MemoryStorage and origin resolution under wasm32-unknown-unknown
//! via `wasm-pack test --node`. localStorage and fetch need a browser.

use wasm_bindgen_test::*;

use planner_core::ports::StoragePort;
use planner_platform::origin::resolve_base;
use planner_platform::storage::{open_storage, MemoryStorage};
use planner_types::config::{StorageBackendType, StorageConfig};

// ─── MemoryStorage Tests ─────────────────────────────────

#[wasm_bindgen_test]
fn memory_storage_backend_name() {
    let storage = MemoryStorage::new();
    assert_eq!(storage.backend_name(), "memory");
}

#[wasm_bindgen_test]
async fn memory_storage_get_missing() {
    let storage = MemoryStorage::new();
    assert!(storage.get("nonexistent").await.unwrap().is_none());
}

#[wasm_bindgen_test]
async fn memory_storage_set_get_overwrite() {
    let storage = MemoryStorage::new();
    storage.set("planner:session", "v1").await.unwrap();
    storage.set("planner:session", "v2").await.unwrap();
    assert_eq!(storage.get("planner:session").await.unwrap().as_deref(), Some("v2"));
}

#[wasm_bindgen_test]
async fn memory_storage_delete() {
    let storage = MemoryStorage::new();
    storage.set("key", "val").await.unwrap();
    storage.delete("key").await.unwrap();
    assert!(!storage.exists("key").await.unwrap());
}

#[wasm_bindgen_test]
fn open_storage_memory_backend() {
    let config = StorageConfig {
        backend: StorageBackendType::Memory,
    };
    let storage = open_storage(&config).unwrap();
    assert_eq!(storage.backend_name(), "memory");
}

#[wasm_bindgen_test]
fn auto_storage_falls_back_without_window() {
    // Node has no window, so Auto ends up in memory
    let storage = open_storage(&StorageConfig::default()).unwrap();
    assert_eq!(storage.backend_name(), "memory");
}

// ─── Origin Tests ────────────────────────────────────────

#[wasm_bindgen_test]
fn relative_base_resolves_against_origin() {
    assert_eq!(
        resolve_base("/api", "https://plan.example.com/"),
        "https://plan.example.com/api"
    );
    assert_eq!(
        resolve_base("https://api.example.com", "https://plan.example.com"),
        "https://api.example.com"
    );
}
