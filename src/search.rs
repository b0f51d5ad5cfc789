/// Text and tag filtering for saved tabs

use crate::tab_data::TabRecord;
use std::collections::HashSet;

/// Search criteria applied to each saved tab.
///
/// A tab matches when the query is empty or appears (case-insensitively) in its
/// title or URL, and when it carries every required tag. Tags compare exactly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabFilter {
    query: String,
    tags: HashSet<String>,
}

impl TabFilter {
    pub fn new(query: &str, tags: &HashSet<String>) -> TabFilter {
        TabFilter {
            query: query.to_lowercase(),
            tags: tags.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_empty() && self.tags.is_empty()
    }

    pub fn matches(&self, tab: &TabRecord) -> bool {
        self.matches_query(tab) && self.matches_tags(tab)
    }

    fn matches_query(&self, tab: &TabRecord) -> bool {
        self.query.is_empty()
            || tab.title.to_lowercase().contains(&self.query)
            || tab.url.to_lowercase().contains(&self.query)
    }

    fn matches_tags(&self, tab: &TabRecord) -> bool {
        self.tags.iter().all(|tag| tab.has_tag(tag))
    }

    /// Keep matching tabs, preserving their order
    pub fn apply(&self, tabs: Vec<TabRecord>) -> Vec<TabRecord> {
        if self.is_empty() {
            return tabs;
        }
        tabs.into_iter().filter(|tab| self.matches(tab)).collect()
    }
}

/// Distinct tags across all tabs, in first-seen order
pub fn collect_tags(tabs: &[TabRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tags = Vec::new();
    for tag in tabs.iter().flat_map(|tab| &tab.tags) {
        if seen.insert(tag.as_str()) {
            tags.push(tag.clone());
        }
    }
    tags
}
