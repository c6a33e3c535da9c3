//! In-memory storage backend.
//! Used when localStorage is unavailable (private mode, tests); the session
//! then lasts only until reload.

use std::cell::RefCell;
use std::collections::HashMap;
use async_trait::async_trait;
use planner_core::ports::StoragePort;
use planner_types::Result;

#[derive(Default)]
pub struct MemoryStorage {
    data: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait(?Send)]
impl StoragePort for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.borrow().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.data
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.data.borrow_mut().remove(key);
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}
