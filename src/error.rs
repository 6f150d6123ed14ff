use std::fmt;

/// Error raised by a [`KeyValueStorage`](crate::history::KeyValueStorage) backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The storage lock was poisoned during the named operation.
    LockPoisoned(&'static str),
    /// The backend failed to read or write the record.
    Io(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::LockPoisoned(operation) => {
                write!(f, "storage lock poisoned during {}", operation)
            }
            StorageError::Io(msg) => write!(f, "storage io error: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}

/// Error returned by a [`LocalHistoryStore`](crate::history::LocalHistoryStore) mutation.
///
/// When one of these is returned the in-memory history is exactly what it was
/// before the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    Storage(StorageError),
    Serialize(String),
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryError::Storage(err) => write!(f, "history not persisted: {}", err),
            HistoryError::Serialize(msg) => write!(f, "history serialization error: {}", msg),
        }
    }
}

impl std::error::Error for HistoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HistoryError::Storage(err) => Some(err),
            HistoryError::Serialize(_) => None,
        }
    }
}

impl From<StorageError> for HistoryError {
    fn from(err: StorageError) -> Self {
        HistoryError::Storage(err)
    }
}

impl From<serde_json::Error> for HistoryError {
    fn from(err: serde_json::Error) -> Self {
        HistoryError::Serialize(err.to_string())
    }
}
