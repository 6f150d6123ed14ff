//! Text analysis and local history engine.
//!
//! - [`metrics`]: character, word, line and paragraph counts.
//! - [`diff`]: line-oriented diff with change statistics.
//! - [`history`]: bounded, persisted cache of recent text snapshots.
//! - [`migration`]: one-shot transfer of that cache to a [`remote`] store
//!   after sign-in, driven through a [`session`].
//! - [`analysis`]: debounced recomputation while the user types.

pub mod analysis;
pub mod config;
pub mod diff;
mod error;
pub mod history;
pub mod metrics;
pub mod migration;
pub mod remote;
pub mod session;

pub use analysis::{AnalysisSession, Recompute};
pub use config::HistoryConfig;
pub use diff::{diff, ChangeKind, ChangeRecord, DiffResult, DiffStats};
pub use error::{HistoryError, StorageError};
pub use history::{
    FileStorage, InMemoryStorage, KeyValueStorage, LocalHistoryStore, RecentList, TextSnapshot,
};
pub use metrics::{compute as compute_metrics, TextMetricsResult};
pub use migration::{HistoryMigrationService, MigrationError, MigrationOutcome};
pub use remote::{
    CreateRequest, ImportItem, ImportReceipt, ImportRequest, InMemoryRemoteStore, RemoteError,
    RemoteHistory, RemoteHistoryStore,
};
pub use session::{AuthState, HistorySession, SaveError, Saved};
