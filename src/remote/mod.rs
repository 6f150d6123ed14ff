//! RemoteHistoryStore - the authoritative history store of a signed-in user.
//!
//! The crate only needs "submit, get success or failure"; the transport
//! (HTTP client, auth headers, retries, timeouts) belongs to the implementor.

mod in_memory;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use in_memory::{InMemoryRemoteStore, RemoteError};

/// One history entry in a batch import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportItem {
    pub title: String,
    pub content: String,
    pub content_type: String,
    pub created_at: DateTime<Utc>,
}

/// Batch import request carrying every locally cached entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRequest {
    pub histories: Vec<ImportItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReceipt {
    /// Entries the remote actually stored.
    pub imported: usize,
    pub message: String,
}

/// Single-item create request sent by a save while signed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
    #[serde(rename = "type")]
    pub content_type: String,
}

/// A history entry as stored remotely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteHistory {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub content_type: String,
    pub char_count: usize,
    pub line_count: usize,
    pub created_at: DateTime<Utc>,
}

/// Trait for the remote history store collaborator.
pub trait RemoteHistoryStore {
    type Error: fmt::Display;

    /// Store a whole batch in one request. Success means the remote has
    /// durably received every item it chose to keep.
    fn import(&mut self, request: &ImportRequest) -> Result<ImportReceipt, Self::Error>;

    /// Store a single entry.
    fn create(&mut self, request: &CreateRequest) -> Result<RemoteHistory, Self::Error>;
}

impl<R: RemoteHistoryStore + ?Sized> RemoteHistoryStore for &mut R {
    type Error = R::Error;

    fn import(&mut self, request: &ImportRequest) -> Result<ImportReceipt, Self::Error> {
        (**self).import(request)
    }

    fn create(&mut self, request: &CreateRequest) -> Result<RemoteHistory, Self::Error> {
        (**self).create(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_uses_type_field() {
        let request = CreateRequest {
            title: None,
            content: "body".into(),
            content_type: "plain".into(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({ "content": "body", "type": "plain" }));
    }

    #[test]
    fn import_request_shape() {
        let created_at = DateTime::<Utc>::from_timestamp_millis(1_700_000_000_000).unwrap();
        let request = ImportRequest {
            histories: vec![ImportItem {
                title: "t".into(),
                content: "c".into(),
                content_type: "plain".into(),
                created_at,
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["histories"][0]["contentType"], "plain");
        assert_eq!(json["histories"][0]["createdAt"], "2023-11-14T22:13:20Z");
    }
}
