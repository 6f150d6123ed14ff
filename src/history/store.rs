use chrono::Utc;
use tracing::{debug, warn};

use crate::config::HistoryConfig;
use crate::error::HistoryError;
use crate::remote::ImportItem;

use super::recent::RecentList;
use super::snapshot::{SnapshotIds, TextSnapshot, DEFAULT_CONTENT_TYPE};
use super::storage::KeyValueStorage;

/// The most recent snapshots of a guest user, persisted to `S` after every
/// mutation.
///
/// Every mutation builds the next list, writes it, and only then replaces
/// the in-memory list. A failed write returns the error and leaves the store
/// exactly as it was, so memory and storage always agree.
pub struct LocalHistoryStore<S> {
    storage: S,
    config: HistoryConfig,
    entries: RecentList<TextSnapshot>,
    ids: SnapshotIds,
}

impl<S: KeyValueStorage> LocalHistoryStore<S> {
    /// Open with the default configuration (5 entries).
    pub fn open(storage: S) -> Self {
        Self::open_with(storage, HistoryConfig::default())
    }

    /// Open and hydrate from `storage`. An absent, unreadable or malformed
    /// record starts an empty history; it never fails the caller.
    ///
    /// A record holding duplicate ids or more entries than `config.capacity`
    /// is written back in its normalised form. If that write fails the
    /// record catches up on the next mutation.
    pub fn open_with(storage: S, config: HistoryConfig) -> Self {
        let loaded = hydrate(&storage, &config.storage_key);
        let loaded_len = loaded.len();
        let ids = SnapshotIds::seeded(loaded.iter().map(|snap| snap.id.as_str()));
        let entries = RecentList::from_newest_first(dedup_ids(loaded), config.capacity);

        let mut store = LocalHistoryStore {
            storage,
            config,
            entries,
            ids,
        };
        if store.entries.len() != loaded_len {
            let normalised = store.entries.clone();
            if let Err(err) = store.commit(normalised) {
                warn!(error = %err, "failed to write back normalised history");
            } else {
                debug!(
                    dropped = loaded_len - store.entries.len(),
                    "normalised stored history"
                );
            }
        }
        store
    }

    /// Save `content` as the newest snapshot with content type `"plain"`.
    pub fn save(&mut self, content: &str, title: Option<&str>) -> Result<TextSnapshot, HistoryError> {
        self.save_typed(content, title, DEFAULT_CONTENT_TYPE)
    }

    /// Save `content` as the newest snapshot. Entries beyond capacity are
    /// dropped from the back without notice.
    pub fn save_typed(
        &mut self,
        content: &str,
        title: Option<&str>,
        content_type: &str,
    ) -> Result<TextSnapshot, HistoryError> {
        let now = Utc::now();
        let mut ids = self.ids.clone();
        let snapshot = TextSnapshot::new(
            ids.next(now),
            content,
            title,
            content_type,
            self.config.title_chars,
            now,
        );

        let mut next = self.entries.clone();
        let evicted = next.push_front(snapshot.clone());
        self.commit(next)?;
        self.ids = ids;

        for old in &evicted {
            debug!(id = %old.id, "evicted history entry beyond capacity");
        }
        debug!(id = %snapshot.id, chars = snapshot.char_count, "saved history entry");
        Ok(snapshot)
    }

    /// Delete the entry with `id`. Returns whether one was removed; a
    /// missing id is not an error.
    pub fn delete(&mut self, id: &str) -> Result<bool, HistoryError> {
        let mut next = self.entries.clone();
        let removed = next.remove_first(|snap| snap.id == id).is_some();
        self.commit(next)?;
        Ok(removed)
    }

    /// Drop every entry and remove the persisted record itself.
    pub fn clear(&mut self) -> Result<(), HistoryError> {
        self.storage.remove(&self.config.storage_key)?;
        self.entries.clear();
        Ok(())
    }

    /// Current entries, newest first.
    pub fn list(&self) -> &[TextSnapshot] {
        self.entries.as_slice()
    }

    pub fn get(&self, id: &str) -> Option<&TextSnapshot> {
        self.entries.iter().find(|snap| snap.id == id)
    }

    /// Entries projected to what the remote import accepts, newest first.
    pub fn exportable(&self) -> Vec<ImportItem> {
        self.entries.iter().map(TextSnapshot::to_import_item).collect()
    }

    pub fn has_capacity(&self) -> bool {
        !self.entries.is_full()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn commit(&mut self, next: RecentList<TextSnapshot>) -> Result<(), HistoryError> {
        let json = serde_json::to_string(next.as_slice())?;
        self.storage.set(&self.config.storage_key, &json)?;
        self.entries = next;
        Ok(())
    }
}

fn hydrate<S: KeyValueStorage>(storage: &S, key: &str) -> Vec<TextSnapshot> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(err) => {
            warn!(key, error = %err, "failed to read history, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<TextSnapshot>>(&raw) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(key, error = %err, "failed to parse history, starting empty");
            Vec::new()
        }
    }
}

fn dedup_ids(entries: Vec<TextSnapshot>) -> Vec<TextSnapshot> {
    let mut seen = std::collections::HashSet::new();
    entries
        .into_iter()
        .filter(|snap| seen.insert(snap.id.clone()))
        .collect()
}
