//! `window.localStorage` backend. Persistent across reloads.

use async_trait::async_trait;
use wasm_bindgen::JsValue;
use web_sys::Storage;

use planner_core::ports::StoragePort;
use planner_types::{PlannerError, Result};

pub struct LocalStorage {
    storage: Storage,
}

fn storage_error(e: JsValue) -> PlannerError {
    let (_, message) = crate::js::describe(e);
    PlannerError::Storage(message)
}

impl LocalStorage {
    /// Fails when there is no window or storage is disabled.
    pub fn open() -> Result<Self> {
        let window = web_sys::window()
            .ok_or_else(|| PlannerError::Storage("No window object".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(storage_error)?
            .ok_or_else(|| PlannerError::Storage("localStorage not available".to_string()))?;
        Ok(Self { storage })
    }
}

#[async_trait(?Send)]
impl StoragePort for LocalStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage.get_item(key).map_err(storage_error)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        // Throws QuotaExceededError when full
        self.storage.set_item(key, value).map_err(storage_error)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.storage.remove_item(key).map_err(storage_error)
    }

    fn backend_name(&self) -> &str {
        "localStorage"
    }
}
