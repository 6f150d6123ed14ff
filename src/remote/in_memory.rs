use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use crate::history::{derive_title, DEFAULT_CONTENT_TYPE};
use crate::metrics::line_count;

use super::{CreateRequest, ImportReceipt, ImportRequest, RemoteHistory, RemoteHistoryStore};

const TITLE_CHARS: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The request never reached the store (network down, timeout).
    Unavailable(String),
    /// The store refused the request.
    Rejected(String),
    LockPoisoned(&'static str),
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteError::Unavailable(msg) => write!(f, "remote store unavailable: {}", msg),
            RemoteError::Rejected(msg) => write!(f, "remote store rejected request: {}", msg),
            RemoteError::LockPoisoned(operation) => {
                write!(f, "remote store lock poisoned during {}", operation)
            }
        }
    }
}

impl std::error::Error for RemoteError {}

#[derive(Default)]
struct State {
    histories: Vec<RemoteHistory>,
    next_id: u64,
    failures: VecDeque<RemoteError>,
    requests: usize,
}

/// In-memory remote history store for testing and development.
///
/// Clone-friendly (cloning shares the same underlying storage), so a test can
/// hand one clone to the code under test and inspect the other.
#[derive(Clone, Default)]
pub struct InMemoryRemoteStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next request fail with `error` instead of being applied.
    pub fn fail_next(&self, error: RemoteError) -> Result<(), RemoteError> {
        let mut state = self
            .state
            .write()
            .map_err(|_| RemoteError::LockPoisoned("write"))?;
        state.failures.push_back(error);
        Ok(())
    }

    /// All stored histories, newest first.
    pub fn list(&self) -> Result<Vec<RemoteHistory>, RemoteError> {
        let state = self
            .state
            .read()
            .map_err(|_| RemoteError::LockPoisoned("read"))?;
        Ok(newest_first(state.histories.iter()))
    }

    /// Histories whose title contains `query`, ignoring case, newest first.
    pub fn search(&self, query: &str) -> Result<Vec<RemoteHistory>, RemoteError> {
        let query = query.to_lowercase();
        let state = self
            .state
            .read()
            .map_err(|_| RemoteError::LockPoisoned("read"))?;
        Ok(newest_first(
            state
                .histories
                .iter()
                .filter(|h| h.title.to_lowercase().contains(&query)),
        ))
    }

    pub fn get(&self, id: u64) -> Result<Option<RemoteHistory>, RemoteError> {
        let state = self
            .state
            .read()
            .map_err(|_| RemoteError::LockPoisoned("read"))?;
        Ok(state.histories.iter().find(|h| h.id == id).cloned())
    }

    /// Delete by id. Returns true if it existed.
    pub fn delete(&self, id: u64) -> Result<bool, RemoteError> {
        let mut state = self
            .state
            .write()
            .map_err(|_| RemoteError::LockPoisoned("write"))?;
        let before = state.histories.len();
        state.histories.retain(|h| h.id != id);
        Ok(state.histories.len() != before)
    }

    /// Number of import/create requests received, failed ones included.
    pub fn request_count(&self) -> Result<usize, RemoteError> {
        let state = self
            .state
            .read()
            .map_err(|_| RemoteError::LockPoisoned("read"))?;
        Ok(state.requests)
    }
}

impl State {
    fn begin_request(&mut self) -> Result<(), RemoteError> {
        self.requests += 1;
        match self.failures.pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn insert(
        &mut self,
        title: Option<&str>,
        content: &str,
        content_type: &str,
        created_at: DateTime<Utc>,
    ) -> RemoteHistory {
        self.next_id += 1;
        let title = match title {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => derive_title(content, TITLE_CHARS),
        };
        let content_type = if content_type.is_empty() {
            DEFAULT_CONTENT_TYPE
        } else {
            content_type
        };
        let history = RemoteHistory {
            id: self.next_id,
            title,
            content: content.to_string(),
            content_type: content_type.to_string(),
            char_count: content.chars().count(),
            line_count: line_count(content),
            created_at,
        };
        self.histories.push(history.clone());
        history
    }
}

fn newest_first<'a>(histories: impl Iterator<Item = &'a RemoteHistory>) -> Vec<RemoteHistory> {
    let mut out: Vec<RemoteHistory> = histories.cloned().collect();
    out.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    out
}

impl RemoteHistoryStore for InMemoryRemoteStore {
    type Error = RemoteError;

    /// Items with empty content are skipped; the rest keep their original
    /// `createdAt`.
    fn import(&mut self, request: &ImportRequest) -> Result<ImportReceipt, Self::Error> {
        let mut state = self
            .state
            .write()
            .map_err(|_| RemoteError::LockPoisoned("write"))?;
        state.begin_request()?;

        let mut imported = 0;
        for item in &request.histories {
            if item.content.is_empty() {
                continue;
            }
            state.insert(
                Some(&item.title),
                &item.content,
                &item.content_type,
                item.created_at,
            );
            imported += 1;
        }

        Ok(ImportReceipt {
            imported,
            message: format!("imported {} histories", imported),
        })
    }

    fn create(&mut self, request: &CreateRequest) -> Result<RemoteHistory, Self::Error> {
        let mut state = self
            .state
            .write()
            .map_err(|_| RemoteError::LockPoisoned("write"))?;
        state.begin_request()?;

        if request.content.trim().is_empty() {
            return Err(RemoteError::Rejected("content is required".into()));
        }
        Ok(state.insert(
            request.title.as_deref(),
            &request.content,
            &request.content_type,
            Utc::now(),
        ))
    }
}
