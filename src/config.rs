//! HistoryConfig - tunables for the local history cache.

use serde::{Deserialize, Serialize};

/// Default number of snapshots kept for a guest user.
pub const DEFAULT_CAPACITY: usize = 5;

/// Default storage key holding the whole history list.
pub const DEFAULT_STORAGE_KEY: &str = "textflow_histories";

/// Default number of code points taken from the content for a derived title.
pub const DEFAULT_TITLE_CHARS: usize = 30;

/// Configuration for [`LocalHistoryStore`](crate::history::LocalHistoryStore).
///
/// Missing fields fall back to their defaults when deserialized, so a host can
/// ship a partial JSON document:
///
/// ```
/// use textflow::HistoryConfig;
///
/// let config = HistoryConfig::from_json(r#"{ "capacity": 10 }"#).unwrap();
/// assert_eq!(config.capacity, 10);
/// assert_eq!(config.storage_key, "textflow_histories");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HistoryConfig {
    pub capacity: usize,
    pub storage_key: String,
    pub title_chars: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            title_chars: DEFAULT_TITLE_CHARS,
        }
    }
}

impl HistoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON config document. A capacity of zero is raised to one.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: HistoryConfig = serde_json::from_str(json)?;
        let capacity = config.capacity;
        Ok(config.with_capacity(capacity))
    }

    /// Set the maximum number of snapshots kept (at least one).
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Set the storage key the history list is persisted under.
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Set how many code points of content a derived title keeps.
    pub fn with_title_chars(mut self, chars: usize) -> Self {
        self.title_chars = chars;
        self
    }
}
