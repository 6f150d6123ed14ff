//! HistoryMigrationService - one-shot transfer of the local history into the
//! remote store after sign-in.
//!
//! Local entries are only cleared once the remote confirmed the batch, so a
//! crash or failure in between leads to a re-submission on the next sign-in
//! (at-least-once delivery), never to lost entries.

use std::fmt;

use tracing::{info, warn};

use crate::error::HistoryError;
use crate::history::{KeyValueStorage, LocalHistoryStore};
use crate::remote::{ImportRequest, RemoteHistoryStore};

/// Why a migration did not complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationError {
    /// The remote store failed or refused the batch; local history is intact.
    Remote(String),
    /// The remote accepted the batch but the local history could not be
    /// cleared; it will be submitted again next time.
    ClearLocal(HistoryError),
}

impl fmt::Display for MigrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationError::Remote(msg) => write!(f, "history migration failed: {}", msg),
            MigrationError::ClearLocal(err) => {
                write!(f, "history migrated but local copy not cleared: {}", err)
            }
        }
    }
}

impl std::error::Error for MigrationError {}

/// Result of a [`HistoryMigrationService::migrate`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// Nothing to migrate.
    Skipped,
    Migrated { submitted: usize, imported: usize },
    Failed(MigrationError),
}

impl MigrationOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, MigrationOutcome::Failed(_))
    }

    pub fn error(&self) -> Option<&MigrationError> {
        match self {
            MigrationOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }
}

pub struct HistoryMigrationService<R> {
    remote: R,
}

impl<R> HistoryMigrationService<R> {
    pub fn new(remote: R) -> Self {
        HistoryMigrationService { remote }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn remote_mut(&mut self) -> &mut R {
        &mut self.remote
    }

    pub fn into_remote(self) -> R {
        self.remote
    }
}

impl<R: RemoteHistoryStore> HistoryMigrationService<R> {
    /// Push every local entry to the remote in a single request and clear
    /// the local history once the remote confirmed it.
    ///
    /// The store stays exclusively borrowed for the whole call, so no save or
    /// delete can slip in between the submission and the clear.
    pub fn migrate<S: KeyValueStorage>(&mut self, store: &mut LocalHistoryStore<S>) -> MigrationOutcome {
        let histories = store.exportable();
        if histories.is_empty() {
            return MigrationOutcome::Skipped;
        }

        let submitted = histories.len();
        let receipt = match self.remote.import(&ImportRequest { histories }) {
            Ok(receipt) => receipt,
            Err(err) => {
                warn!(submitted, error = %err, "failed to migrate history");
                return MigrationOutcome::Failed(MigrationError::Remote(err.to_string()));
            }
        };

        if let Err(err) = store.clear() {
            warn!(submitted, error = %err, "history migrated but local copy not cleared");
            return MigrationOutcome::Failed(MigrationError::ClearLocal(err));
        }

        info!(submitted, imported = receipt.imported, "history migrated to remote store");
        MigrationOutcome::Migrated {
            submitted,
            imported: receipt.imported,
        }
    }
}
