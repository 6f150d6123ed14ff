//! HistorySession - the single entry point for saving text, guest or signed in.
//!
//! Saves and the post-sign-in migration both go through `&mut HistorySession`,
//! so a save can never run while a migration is between submitting the batch
//! and clearing the local history.

use std::fmt;

use tracing::{debug, warn};

use crate::error::HistoryError;
use crate::history::{KeyValueStorage, LocalHistoryStore, TextSnapshot, DEFAULT_CONTENT_TYPE};
use crate::migration::{HistoryMigrationService, MigrationOutcome};
use crate::remote::{CreateRequest, RemoteHistory, RemoteHistoryStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Guest,
    Authenticated,
}

/// Where a save ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Saved {
    Local(TextSnapshot),
    Remote(RemoteHistory),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveError {
    Local(HistoryError),
    Remote(String),
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::Local(err) => write!(f, "local save failed: {}", err),
            SaveError::Remote(msg) => write!(f, "remote save failed: {}", msg),
        }
    }
}

impl std::error::Error for SaveError {}

impl From<HistoryError> for SaveError {
    fn from(err: HistoryError) -> Self {
        SaveError::Local(err)
    }
}

pub struct HistorySession<S, R> {
    store: LocalHistoryStore<S>,
    migration: HistoryMigrationService<R>,
    auth: AuthState,
}

impl<S: KeyValueStorage, R: RemoteHistoryStore> HistorySession<S, R> {
    /// Start a guest session.
    pub fn new(store: LocalHistoryStore<S>, remote: R) -> Self {
        HistorySession {
            store,
            migration: HistoryMigrationService::new(remote),
            auth: AuthState::Guest,
        }
    }

    pub fn auth_state(&self) -> AuthState {
        self.auth
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth == AuthState::Authenticated
    }

    /// Handle a successful sign-in or registration.
    ///
    /// The local history is migrated before the session switches to the
    /// signed-in identity; the outcome is returned for the caller to log or
    /// ignore. Sign-in proceeds either way.
    pub fn on_authenticated(&mut self) -> MigrationOutcome {
        let outcome = self.migration.migrate(&mut self.store);
        self.auth = AuthState::Authenticated;
        outcome
    }

    pub fn on_signed_out(&mut self) {
        self.auth = AuthState::Guest;
    }

    /// Save with content type `"plain"`.
    pub fn save(&mut self, content: &str, title: Option<&str>) -> Result<Saved, SaveError> {
        self.save_typed(content, title, DEFAULT_CONTENT_TYPE)
    }

    /// Guests save into the local history; signed-in users create a remote
    /// entry and nothing is stored locally.
    pub fn save_typed(
        &mut self,
        content: &str,
        title: Option<&str>,
        content_type: &str,
    ) -> Result<Saved, SaveError> {
        match self.auth {
            AuthState::Guest => {
                let snapshot = self.store.save_typed(content, title, content_type)?;
                Ok(Saved::Local(snapshot))
            }
            AuthState::Authenticated => {
                let request = CreateRequest {
                    title: title.filter(|t| !t.is_empty()).map(str::to_string),
                    content: content.to_string(),
                    content_type: content_type.to_string(),
                };
                match self.migration.remote_mut().create(&request) {
                    Ok(history) => {
                        debug!(id = history.id, "saved history remotely");
                        Ok(Saved::Remote(history))
                    }
                    Err(err) => {
                        warn!(error = %err, "failed to save history remotely");
                        Err(SaveError::Remote(err.to_string()))
                    }
                }
            }
        }
    }

    pub fn delete_local(&mut self, id: &str) -> Result<bool, HistoryError> {
        self.store.delete(id)
    }

    pub fn clear_local(&mut self) -> Result<(), HistoryError> {
        self.store.clear()
    }

    /// Whether a guest can save without evicting an older entry.
    pub fn can_save_more(&self) -> bool {
        self.is_authenticated() || self.store.has_capacity()
    }

    pub fn local_history(&self) -> &[TextSnapshot] {
        self.store.list()
    }

    pub fn store(&self) -> &LocalHistoryStore<S> {
        &self.store
    }

    pub fn remote(&self) -> &R {
        self.migration.remote()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::InMemoryStorage;
    use crate::remote::{InMemoryRemoteStore, RemoteError};

    fn session() -> (
        HistorySession<InMemoryStorage, InMemoryRemoteStore>,
        InMemoryRemoteStore,
    ) {
        let remote = InMemoryRemoteStore::new();
        let store = LocalHistoryStore::open(InMemoryStorage::new());
        (HistorySession::new(store, remote.clone()), remote)
    }

    #[test]
    fn guest_saves_locally() {
        let (mut session, remote) = session();
        let saved = session.save("draft", None).unwrap();
        assert!(matches!(saved, Saved::Local(ref s) if s.content == "draft"));
        assert_eq!(session.local_history().len(), 1);
        assert!(remote.list().unwrap().is_empty());
    }

    #[test]
    fn sign_in_migrates_then_saves_remotely() {
        let (mut session, remote) = session();
        session.save("guest 1", None).unwrap();
        session.save("guest 2", None).unwrap();

        let outcome = session.on_authenticated();
        assert_eq!(
            outcome,
            MigrationOutcome::Migrated {
                submitted: 2,
                imported: 2
            }
        );
        assert!(session.is_authenticated());
        assert!(session.local_history().is_empty());

        let saved = session.save_typed("signed in", Some(""), "counter").unwrap();
        match saved {
            Saved::Remote(history) => {
                assert_eq!(history.title, "signed in");
                assert_eq!(history.content_type, "counter");
            }
            other => panic!("expected remote save, got {:?}", other),
        }
        assert!(session.local_history().is_empty());
        assert_eq!(remote.list().unwrap().len(), 3);
    }

    #[test]
    fn failed_migration_still_signs_in() {
        let (mut session, remote) = session();
        session.save("keep me", None).unwrap();
        remote
            .fail_next(RemoteError::Unavailable("offline".into()))
            .unwrap();

        assert!(session.on_authenticated().is_failure());
        assert!(session.is_authenticated());
        assert_eq!(session.local_history().len(), 1);

        // the next sign-in retries the leftover entries
        session.on_signed_out();
        assert_eq!(session.auth_state(), AuthState::Guest);
        assert!(!session.on_authenticated().is_failure());
        assert!(session.local_history().is_empty());
    }

    #[test]
    fn remote_save_failure_is_reported() {
        let (mut session, remote) = session();
        session.on_authenticated();
        remote
            .fail_next(RemoteError::Rejected("quota".into()))
            .unwrap();

        let err = session.save("x", None).unwrap_err();
        assert_eq!(
            err,
            SaveError::Remote("remote store rejected request: quota".into())
        );
        assert!(session.local_history().is_empty());
    }

    #[test]
    fn can_save_more_tracks_capacity_for_guests() {
        let (mut session, _remote) = session();
        for n in 0..5 {
            assert!(session.can_save_more());
            session.save(&n.to_string(), None).unwrap();
        }
        assert!(!session.can_save_more());
        session.on_authenticated();
        assert!(session.can_save_more());
    }
}
