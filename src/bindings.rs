/// JavaScript surface for the extension popup
use crate::clock::SystemClock;
use crate::error::StoreError;
use crate::storage::ChromeStorage;
use crate::store::{StoreConfig, TabStore};
use crate::tab_data::{NewTab, TabPatch};
use js_sys::Promise;
use serde::Serialize;
use std::collections::HashSet;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

/// Handle to the saved-tab store, created once per popup and kept for its lifetime.
///
/// Method names follow the extension's JS API. Every method returns a Promise
/// that rejects with the error message on storage failure.
#[wasm_bindgen]
pub struct TabSaver {
    store: Rc<TabStore<ChromeStorage, SystemClock>>,
}

#[wasm_bindgen]
impl TabSaver {
    #[wasm_bindgen(constructor)]
    pub fn new(storage_key: Option<String>) -> TabSaver {
        let config = match storage_key {
            Some(storage_key) => StoreConfig { storage_key },
            None => StoreConfig::default(),
        };
        log::debug!("Opening tab store under '{}'", config.storage_key);

        TabSaver {
            store: Rc::new(TabStore::with_config(ChromeStorage, SystemClock, config)),
        }
    }

    #[wasm_bindgen(js_name = getAllTabs)]
    pub fn get_all_tabs(&self) -> Promise {
        let store = self.store.clone();
        future_to_promise(async move {
            let tabs = store.list_all().await.map_err(to_js_error)?;
            to_js(&tabs)
        })
    }

    #[wasm_bindgen(js_name = getTab)]
    pub fn get_tab(&self, id: f64) -> Promise {
        let store = self.store.clone();
        future_to_promise(async move {
            let tab = store.find(id as i64).await.map_err(to_js_error)?;
            to_js(&tab)
        })
    }

    /// Resolves to the saved tab. Expects `{title, url, tags}`.
    #[wasm_bindgen(js_name = saveTab)]
    pub fn save_tab(&self, tab: JsValue) -> Promise {
        let store = self.store.clone();
        future_to_promise(async move {
            let input: NewTab = from_js(tab)?;
            let saved = store.create(input).await.map_err(to_js_error)?;
            to_js(&saved)
        })
    }

    /// Resolves to the updated tab, or `null` when no tab has `id`
    #[wasm_bindgen(js_name = updateTab)]
    pub fn update_tab(&self, id: f64, patch: JsValue) -> Promise {
        let store = self.store.clone();
        future_to_promise(async move {
            let patch: TabPatch = from_js(patch)?;
            let updated = store.update(id as i64, patch).await.map_err(to_js_error)?;
            to_js(&updated)
        })
    }

    /// Resolves to whether a tab was removed
    #[wasm_bindgen(js_name = deleteTab)]
    pub fn delete_tab(&self, id: f64) -> Promise {
        let store = self.store.clone();
        future_to_promise(async move {
            let removed = store.delete(id as i64).await.map_err(to_js_error)?;
            Ok(JsValue::from_bool(removed))
        })
    }

    /// A missing query or tag list matches everything
    #[wasm_bindgen(js_name = searchTabs)]
    pub fn search_tabs(&self, query: Option<String>, tags: JsValue) -> Promise {
        let store = self.store.clone();
        future_to_promise(async move {
            let query = query.unwrap_or_default();
            let tags: HashSet<String> = if tags.is_null() || tags.is_undefined() {
                HashSet::new()
            } else {
                from_js(tags)?
            };
            let found = store.search(&query, &tags).await.map_err(to_js_error)?;
            to_js(&found)
        })
    }

    #[wasm_bindgen(js_name = getAllTags)]
    pub fn get_all_tags(&self) -> Promise {
        let store = self.store.clone();
        future_to_promise(async move {
            let tags = store.list_tags().await.map_err(to_js_error)?;
            to_js(&tags)
        })
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value
        .serialize(&serializer)
        .map_err(|e| JsValue::from_str(&format!("Failed to serialize: {:?}", e)))
}

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse: {:?}", e)))
}

fn to_js_error(e: StoreError) -> JsValue {
    JsValue::from_str(&e.to_string())
}
