//! Pick the storage backend from config.
//!
//! `Auto` tries localStorage and falls back to memory.

use std::rc::Rc;
use planner_core::ports::StoragePort;
use planner_types::config::{StorageBackendType, StorageConfig};
use planner_types::Result;
use super::{LocalStorage, MemoryStorage};

pub fn open_storage(config: &StorageConfig) -> Result<Rc<dyn StoragePort>> {
    match config.backend {
        StorageBackendType::Memory => Ok(Rc::new(MemoryStorage::new())),
        StorageBackendType::LocalStorage => Ok(Rc::new(LocalStorage::open()?)),
        StorageBackendType::Auto => match LocalStorage::open() {
            Ok(local) => {
                log::info!("Storage backend: localStorage");
                Ok(Rc::new(local))
            }
            Err(e) => {
                log::warn!("localStorage unavailable ({}), falling back to memory", e);
                Ok(Rc::new(MemoryStorage::new()))
            }
        },
    }
}
