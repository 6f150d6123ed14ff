use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::remote::ImportItem;

/// Content type recorded when the caller does not name one.
pub const DEFAULT_CONTENT_TYPE: &str = "plain";

/// One saved text body plus its metadata. Never mutated once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSnapshot {
    pub id: String,
    pub title: String,
    pub content: String,
    pub content_type: String,
    /// Code points in `content`, fixed at creation.
    pub char_count: usize,
    pub created_at: DateTime<Utc>,
}

impl TextSnapshot {
    pub(crate) fn new(
        id: String,
        content: &str,
        title: Option<&str>,
        content_type: &str,
        title_chars: usize,
        created_at: DateTime<Utc>,
    ) -> Self {
        let title = match title {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => derive_title(content, title_chars),
        };
        TextSnapshot {
            id,
            title,
            content: content.to_string(),
            content_type: content_type.to_string(),
            char_count: content.chars().count(),
            created_at,
        }
    }

    pub fn line_count(&self) -> usize {
        crate::metrics::line_count(&self.content)
    }

    /// The fields the remote store imports; `id` and `charCount` stay local.
    pub fn to_import_item(&self) -> ImportItem {
        ImportItem {
            title: self.title.clone(),
            content: self.content.clone(),
            content_type: self.content_type.clone(),
            created_at: self.created_at,
        }
    }
}

/// First `max_chars` code points of `content`, with `"..."` appended when
/// anything was cut.
pub fn derive_title(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}

/// Hands out time-derived ids that strictly increase, even when two
/// snapshots are created within the same millisecond.
///
/// Stored ids above [`MAX_SEED_ID`] (the last millisecond of year 9999) are
/// not taken as a starting point.
#[derive(Debug, Default, Clone)]
pub(crate) struct SnapshotIds {
    last: u64,
}

pub(crate) const MAX_SEED_ID: u64 = 253_402_300_799_999;

impl SnapshotIds {
    /// Start above every id in `existing` that parses as a number no larger
    /// than [`MAX_SEED_ID`].
    pub(crate) fn seeded<'a>(existing: impl IntoIterator<Item = &'a str>) -> Self {
        let last = existing
            .into_iter()
            .filter_map(|id| id.parse::<u64>().ok())
            .filter(|id| *id <= MAX_SEED_ID)
            .max()
            .unwrap_or(0);
        SnapshotIds { last }
    }

    pub(crate) fn next(&mut self, now: DateTime<Utc>) -> String {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        self.last = millis.max(self.last.saturating_add(1));
        self.last.to_string()
    }
}
