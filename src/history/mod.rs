//! LocalHistoryStore - bounded cache of recent text snapshots.
//!
//! The store keeps the newest snapshots of a not-yet-authenticated user and
//! persists the whole list as one JSON array under a single storage key.
//!
//! ## Example
//!
//! ```
//! use textflow::history::{InMemoryStorage, LocalHistoryStore};
//!
//! let storage = InMemoryStorage::new();
//! let mut store = LocalHistoryStore::open(storage.clone());
//! store.save("draft one", None).unwrap();
//! store.save("draft two", Some("Second draft")).unwrap();
//!
//! // a fresh store over the same storage sees the same history
//! let reopened = LocalHistoryStore::open(storage);
//! assert_eq!(reopened.list()[0].title, "Second draft");
//! ```

mod recent;
mod snapshot;
mod storage;
mod store;

pub use recent::RecentList;
pub use snapshot::{derive_title, TextSnapshot, DEFAULT_CONTENT_TYPE};
pub use storage::{FileStorage, InMemoryStorage, KeyValueStorage};
pub use store::LocalHistoryStore;
