/// Data structures for saved tabs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A saved browser tab
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabRecord {
    pub id: i64,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl TabRecord {
    /// Overwrite every field the patch carries, keeping the rest.
    pub fn apply(&mut self, patch: TabPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(url) = patch.url {
            self.url = url;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Input for saving a new tab
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewTab {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NewTab {
    pub fn new(title: impl Into<String>, url: impl Into<String>, tags: Vec<String>) -> NewTab {
        NewTab {
            title: title.into(),
            url: url.into(),
            tags,
        }
    }
}

/// Partial update for an existing tab; `None` fields are left alone
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TabPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl TabPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.url.is_none() && self.tags.is_none()
    }
}

/// Split a comma-separated tag field into tags.
///
/// Entries are trimmed and blanks dropped. Order and duplicates are kept.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn create_test_record() -> TabRecord {
        TabRecord {
            id: 1698508200000,
            title: "GitHub".to_string(),
            url: "https://github.com".to_string(),
            tags: vec!["dev".to_string(), "code".to_string()],
            created_at: Utc.timestamp_millis_opt(1698508200000).unwrap(),
        }
    }

    #[test]
    fn test_apply_patch_overwrites_only_present_fields() {
        let mut record = create_test_record();
        record.apply(TabPatch {
            title: Some("GitHub Home".to_string()),
            ..TabPatch::default()
        });

        assert_eq!(record.title, "GitHub Home");
        assert_eq!(record.url, "https://github.com");
        assert_eq!(record.tags, vec!["dev", "code"]);
        assert_eq!(record.id, 1698508200000);
    }

    #[test]
    fn test_apply_patch_can_clear_tags() {
        let mut record = create_test_record();
        record.apply(TabPatch {
            tags: Some(vec![]),
            ..TabPatch::default()
        });

        assert!(record.tags.is_empty());
    }

    #[test]
    fn test_has_tag_is_case_sensitive() {
        let record = create_test_record();
        assert!(record.has_tag("dev"));
        assert!(!record.has_tag("Dev"));
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(parse_tags(" a, ,b ,, c "), vec!["a", "b", "c"]);
        assert_eq!(parse_tags("rust, rust"), vec!["rust", "rust"]);
        assert!(parse_tags("").is_empty());
        assert!(parse_tags(" , ,").is_empty());
    }

    #[test]
    fn test_deserialize_extension_format() {
        let json = r#"{
            "id": 1698508200000,
            "title": "Reddit",
            "url": "https://reddit.com",
            "tags": ["fun"],
            "createdAt": "2023-10-28T15:50:00.000Z"
        }"#;

        let record: TabRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.id, 1698508200000);
        assert_eq!(record.tags, vec!["fun"]);
        assert_eq!(record.created_at, Utc.timestamp_millis_opt(1698508200000).unwrap());
    }

    #[test]
    fn test_serialization_uses_camel_case() {
        let json = serde_json::to_value(create_test_record()).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn test_empty_patch() {
        assert!(TabPatch::default().is_empty());
        let patch: TabPatch = serde_json::from_str(r#"{"url": "https://example.com"}"#).unwrap();
        assert!(!patch.is_empty());
        assert_eq!(patch.title, None);
    }
}
