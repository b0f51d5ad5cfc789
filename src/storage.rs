/// Key-value persistence backends for the tab store
use crate::error::BackendError;
use async_trait::async_trait;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// Host persistence: whole values read and written by key.
///
/// Futures are not `Send`; browser backends hold `JsValue`s and run on the
/// page's event loop.
#[async_trait(?Send)]
pub trait StorageBackend {
    /// Read the value under `key`, `None` if it was never written
    async fn get(&self, key: &str) -> Result<Option<Value>, BackendError>;

    /// Replace the value under `key`
    async fn set(&self, key: &str, value: Value) -> Result<(), BackendError>;
}

/// In-memory backend for native hosts and tests
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, Value>>,
    fail_next_get: Cell<bool>,
    fail_next_set: Cell<bool>,
    writes: Cell<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        MemoryStorage::default()
    }

    /// Seed `key` with a raw value
    pub fn with_entry(key: &str, value: Value) -> Self {
        let storage = MemoryStorage::new();
        storage.entries.borrow_mut().insert(key.to_string(), value);
        storage
    }

    pub fn raw(&self, key: &str) -> Option<Value> {
        self.entries.borrow().get(key).cloned()
    }

    /// Number of successful `set` calls so far
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    pub fn fail_next_get(&self) {
        self.fail_next_get.set(true);
    }

    pub fn fail_next_set(&self) {
        self.fail_next_set.set(true);
    }
}

#[async_trait(?Send)]
impl StorageBackend for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, BackendError> {
        if self.fail_next_get.replace(false) {
            return Err(BackendError::new(format!("read of '{}' failed", key)));
        }
        Ok(self.entries.borrow().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), BackendError> {
        if self.fail_next_set.replace(false) {
            return Err(BackendError::new(format!("write of '{}' failed", key)));
        }
        self.entries.borrow_mut().insert(key.to_string(), value);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use chrome::ChromeStorage;

/// `chrome.storage.local` through the JS bridge
#[cfg(target_arch = "wasm32")]
mod chrome {
    use super::StorageBackend;
    use crate::error::BackendError;
    use async_trait::async_trait;
    use serde::Serialize;
    use serde_json::Value;
    use wasm_bindgen::prelude::*;

    #[wasm_bindgen(module = "/storage_bridge.js")]
    extern "C" {
        #[wasm_bindgen(catch)]
        async fn getStorage(key: &str) -> Result<JsValue, JsValue>;

        #[wasm_bindgen(catch)]
        async fn setStorage(key: &str, value: JsValue) -> Result<(), JsValue>;
    }

    #[derive(Debug, Clone, Copy, Default)]
    pub struct ChromeStorage;

    #[async_trait(?Send)]
    impl StorageBackend for ChromeStorage {
        async fn get(&self, key: &str) -> Result<Option<Value>, BackendError> {
            let value_js = getStorage(key)
                .await
                .map_err(|e| BackendError::new(format!("Failed to get storage: {:?}", e)))?;

            if value_js.is_null() || value_js.is_undefined() {
                return Ok(None);
            }

            serde_wasm_bindgen::from_value(value_js)
                .map(Some)
                .map_err(|e| BackendError::new(format!("Failed to parse storage: {:?}", e)))
        }

        async fn set(&self, key: &str, value: Value) -> Result<(), BackendError> {
            // Plain objects rather than ES Maps, so chrome.storage can clone them
            let serializer = serde_wasm_bindgen::Serializer::json_compatible();
            let value_js = value
                .serialize(&serializer)
                .map_err(|e| BackendError::new(format!("Failed to serialize storage: {:?}", e)))?;

            setStorage(key, value_js)
                .await
                .map_err(|e| BackendError::new(format!("Failed to save storage: {:?}", e)))
        }
    }
}
