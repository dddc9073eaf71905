// Client module - access to the remote reporting service

pub mod jsonl;
pub mod memory;

pub use jsonl::{JsonLinesClient, Record};
pub use memory::{Call, MemoryClient};

use crate::model::{LogLevel, RemoteId, ReportStatus, TestItem};
use crate::time::Timestamp;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to write report record: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode report record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("service rejected {operation}: {reason}")]
    Rejected {
        operation: &'static str,
        reason: String,
    },

    #[error("item has no remote id: {name}")]
    UnknownItem { name: String },
}

/// Operations the reporting service offers to a formatter.
///
/// Every call blocks until the service answered; failures are returned to
/// the caller and never retried here.
pub trait ReportClient {
    /// Wall-clock time used when an event carries none
    fn now(&self) -> Timestamp;

    fn start_launch(
        &mut self,
        name: &str,
        description: Option<&str>,
        time: Timestamp,
    ) -> Result<RemoteId, ClientError>;

    fn finish_launch(&mut self, time: Timestamp) -> Result<(), ClientError>;

    /// Identity of an item named `name` under `parent` (`None` for the launch
    /// root), if any process already created it
    fn lookup_item_id(
        &mut self,
        name: &str,
        parent: Option<&RemoteId>,
    ) -> Result<Option<RemoteId>, ClientError>;

    fn start_item(
        &mut self,
        item: &TestItem,
        parent: Option<&RemoteId>,
    ) -> Result<RemoteId, ClientError>;

    fn finish_item(
        &mut self,
        item: &TestItem,
        status: Option<ReportStatus>,
        time: Timestamp,
    ) -> Result<(), ClientError>;

    fn send_log(
        &mut self,
        item: Option<&RemoteId>,
        level: LogLevel,
        message: &str,
        time: Timestamp,
    ) -> Result<(), ClientError>;
}

impl<C: ReportClient + ?Sized> ReportClient for &mut C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }

    fn start_launch(
        &mut self,
        name: &str,
        description: Option<&str>,
        time: Timestamp,
    ) -> Result<RemoteId, ClientError> {
        (**self).start_launch(name, description, time)
    }

    fn finish_launch(&mut self, time: Timestamp) -> Result<(), ClientError> {
        (**self).finish_launch(time)
    }

    fn lookup_item_id(
        &mut self,
        name: &str,
        parent: Option<&RemoteId>,
    ) -> Result<Option<RemoteId>, ClientError> {
        (**self).lookup_item_id(name, parent)
    }

    fn start_item(
        &mut self,
        item: &TestItem,
        parent: Option<&RemoteId>,
    ) -> Result<RemoteId, ClientError> {
        (**self).start_item(item, parent)
    }

    fn finish_item(
        &mut self,
        item: &TestItem,
        status: Option<ReportStatus>,
        time: Timestamp,
    ) -> Result<(), ClientError> {
        (**self).finish_item(item, status, time)
    }

    fn send_log(
        &mut self,
        item: Option<&RemoteId>,
        level: LogLevel,
        message: &str,
        time: Timestamp,
    ) -> Result<(), ClientError> {
        (**self).send_log(item, level, message, time)
    }
}
