use std::fmt;

use textflow::{
    CreateRequest, ImportReceipt, ImportRequest, RemoteHistory, RemoteHistoryStore,
};

#[derive(Debug)]
pub struct Offline;

impl fmt::Display for Offline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "network unreachable")
    }
}

/// Remote that records every batch and fails while `online` is false.
#[derive(Default)]
pub struct FlakyRemote {
    pub online: bool,
    pub batches: Vec<ImportRequest>,
}

impl FlakyRemote {
    pub fn offline() -> Self {
        FlakyRemote {
            online: false,
            batches: Vec::new(),
        }
    }
}

impl RemoteHistoryStore for FlakyRemote {
    type Error = Offline;

    fn import(&mut self, request: &ImportRequest) -> Result<ImportReceipt, Self::Error> {
        if !self.online {
            return Err(Offline);
        }
        self.batches.push(request.clone());
        Ok(ImportReceipt {
            imported: request.histories.len(),
            message: "ok".into(),
        })
    }

    fn create(&mut self, _request: &CreateRequest) -> Result<RemoteHistory, Self::Error> {
        Err(Offline)
    }
}
