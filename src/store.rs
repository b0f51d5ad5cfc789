//! Persistent store of saved tabs
//!
//! All tabs live as one JSON array under a single storage key. Every mutation
//! reads the whole array, changes it in memory and writes the whole array back.
//! There is no locking: two writers racing on the same backend (two popups,
//! or two unawaited calls) can lose one another's update.

use crate::clock::{Clock, SystemClock};
use crate::error::{StoreError, StoreResult};
use crate::search::{TabFilter, collect_tags};
use crate::storage::StorageBackend;
use crate::tab_data::{NewTab, TabPatch, TabRecord};
use log::{debug, warn};
use serde_json::Value;
use std::collections::HashSet;

pub const DEFAULT_STORAGE_KEY: &str = "savedTabs";

#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Key the tab array is stored under
    pub storage_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

pub struct TabStore<B, C = SystemClock> {
    backend: B,
    clock: C,
    config: StoreConfig,
}

impl<B: StorageBackend> TabStore<B> {
    pub fn new(backend: B) -> Self {
        TabStore::with_config(backend, SystemClock, StoreConfig::default())
    }
}

impl<B: StorageBackend, C: Clock> TabStore<B, C> {
    pub fn with_config(backend: B, clock: C, config: StoreConfig) -> Self {
        TabStore {
            backend,
            clock,
            config,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn storage_key(&self) -> &str {
        &self.config.storage_key
    }

    /// Every saved tab in insertion order; empty if nothing was ever saved
    pub async fn list_all(&self) -> StoreResult<Vec<TabRecord>> {
        let key = self.storage_key();
        let stored = self
            .backend
            .get(key)
            .await
            .inspect_err(|e| warn!("Failed to read '{}': {}", key, e))?;

        let tabs: Vec<TabRecord> = match stored {
            None | Some(Value::Null) => Vec::new(),
            Some(value) => serde_json::from_value(value)
                .inspect_err(|e| warn!("Corrupt tab data under '{}': {}", key, e))?,
        };
        Ok(tabs)
    }

    pub async fn find(&self, id: i64) -> StoreResult<Option<TabRecord>> {
        let tabs = self.list_all().await?;
        Ok(tabs.into_iter().find(|tab| tab.id == id))
    }

    /// Save a new tab, stamping its id and creation time
    pub async fn create(&self, input: NewTab) -> StoreResult<TabRecord> {
        let mut tabs = self.list_all().await?;

        let now = self.clock.now();
        let id = next_id(&tabs, now.timestamp_millis()).ok_or(StoreError::IdsExhausted)?;
        let tab = TabRecord {
            id,
            title: input.title,
            url: input.url,
            tags: input.tags,
            created_at: now,
        };

        tabs.push(tab.clone());
        self.persist(&tabs).await?;

        debug!("Saved tab {} ({} total)", tab.id, tabs.len());
        Ok(tab)
    }

    /// Apply `patch` to the tab with `id`. `None` when no such tab exists.
    pub async fn update(&self, id: i64, patch: TabPatch) -> StoreResult<Option<TabRecord>> {
        let mut tabs = self.list_all().await?;

        let Some(tab) = tabs.iter_mut().find(|tab| tab.id == id) else {
            debug!("Update skipped, tab {} not found", id);
            return Ok(None);
        };
        if patch.is_empty() {
            return Ok(Some(tab.clone()));
        }
        tab.apply(patch);
        let updated = tab.clone();

        self.persist(&tabs).await?;

        debug!("Updated tab {}", id);
        Ok(Some(updated))
    }

    /// Remove the tab with `id`. Returns whether anything was removed.
    pub async fn delete(&self, id: i64) -> StoreResult<bool> {
        let mut tabs = self.list_all().await?;

        let original_len = tabs.len();
        tabs.retain(|tab| tab.id != id);
        if tabs.len() == original_len {
            debug!("Delete skipped, tab {} not found", id);
            return Ok(false);
        }

        self.persist(&tabs).await?;

        debug!("Deleted tab {} ({} left)", id, tabs.len());
        Ok(true)
    }

    /// Tabs whose title or URL contains `query` (ignoring case) and that carry
    /// every tag in `tags`
    pub async fn search(&self, query: &str, tags: &HashSet<String>) -> StoreResult<Vec<TabRecord>> {
        let filter = TabFilter::new(query, tags);
        let tabs = self.list_all().await?;
        Ok(filter.apply(tabs))
    }

    /// Distinct tags across all tabs, in first-seen order
    pub async fn list_tags(&self) -> StoreResult<Vec<String>> {
        let tabs = self.list_all().await?;
        Ok(collect_tags(&tabs))
    }

    async fn persist(&self, tabs: &[TabRecord]) -> StoreResult<()> {
        let key = self.storage_key();
        let value = serde_json::to_value(tabs)?;
        self.backend
            .set(key, value)
            .await
            .inspect_err(|e| warn!("Failed to write '{}': {}", key, e))?;
        Ok(())
    }
}

/// Creation time in ms, bumped past the largest existing id when the clock
/// has not moved on (same millisecond, or stepped backwards). `None` once the
/// largest id is `i64::MAX`.
fn next_id(tabs: &[TabRecord], now_millis: i64) -> Option<i64> {
    match tabs.iter().map(|tab| tab.id).max() {
        Some(max_id) if max_id >= now_millis => max_id.checked_add(1),
        _ => Some(now_millis),
    }
}
