// In-memory client - records every call, used for dry runs

use super::{ClientError, ReportClient};
use crate::model::{ItemKind, LogLevel, RemoteId, ReportStatus, TestItem};
use crate::time::Timestamp;
use std::collections::HashMap;

/// One call received by [`MemoryClient`]
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    StartLaunch {
        name: String,
        description: Option<String>,
        time: Timestamp,
    },
    FinishLaunch {
        time: Timestamp,
    },
    Lookup {
        name: String,
        parent: Option<RemoteId>,
        found: Option<RemoteId>,
    },
    StartItem {
        id: RemoteId,
        name: String,
        kind: ItemKind,
        parent: Option<RemoteId>,
        time: Timestamp,
    },
    FinishItem {
        id: RemoteId,
        status: Option<ReportStatus>,
        time: Timestamp,
    },
    Log {
        item: Option<RemoteId>,
        level: LogLevel,
        message: String,
        time: Timestamp,
    },
}

/// Stand-in for the reporting service that keeps everything in memory.
///
/// Items it creates are visible to later lookups, so one instance can play
/// the shared service for several formatters run one after another.
#[derive(Debug, Default)]
pub struct MemoryClient {
    calls: Vec<Call>,
    items: HashMap<(Option<RemoteId>, String), RemoteId>,
    next_id: u64,
    clock: Option<Timestamp>,
    rejected: Option<&'static str>,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin `now()` to a fixed time
    pub fn with_clock(mut self, time: Timestamp) -> Self {
        self.clock = Some(time);
        self
    }

    /// Make every call of `operation` fail
    pub fn rejecting(mut self, operation: &'static str) -> Self {
        self.rejected = Some(operation);
        self
    }

    /// Register an item as if another process had created it
    pub fn seed_item(
        &mut self,
        name: impl Into<String>,
        parent: Option<RemoteId>,
        id: RemoteId,
    ) -> &mut Self {
        self.items.insert((parent, name.into()), id);
        self
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn started_items(&self) -> Vec<&Call> {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::StartItem { .. }))
            .collect()
    }

    pub fn logs(&self) -> Vec<(LogLevel, &str)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Log { level, message, .. } => Some((*level, message.as_str())),
                _ => None,
            })
            .collect()
    }

    fn check(&self, operation: &'static str) -> Result<(), ClientError> {
        match self.rejected {
            Some(rejected) if rejected == operation => Err(ClientError::Rejected {
                operation,
                reason: "rejected by in-memory service".to_string(),
            }),
            _ => Ok(()),
        }
    }
}

impl ReportClient for MemoryClient {
    fn now(&self) -> Timestamp {
        self.clock.unwrap_or_else(Timestamp::now)
    }

    fn start_launch(
        &mut self,
        name: &str,
        description: Option<&str>,
        time: Timestamp,
    ) -> Result<RemoteId, ClientError> {
        self.check("start_launch")?;
        self.calls.push(Call::StartLaunch {
            name: name.to_string(),
            description: description.map(str::to_string),
            time,
        });
        Ok(RemoteId::new("launch"))
    }

    fn finish_launch(&mut self, time: Timestamp) -> Result<(), ClientError> {
        self.check("finish_launch")?;
        self.calls.push(Call::FinishLaunch { time });
        Ok(())
    }

    fn lookup_item_id(
        &mut self,
        name: &str,
        parent: Option<&RemoteId>,
    ) -> Result<Option<RemoteId>, ClientError> {
        self.check("lookup_item_id")?;
        let found = self
            .items
            .get(&(parent.cloned(), name.to_string()))
            .cloned();
        self.calls.push(Call::Lookup {
            name: name.to_string(),
            parent: parent.cloned(),
            found: found.clone(),
        });
        Ok(found)
    }

    fn start_item(
        &mut self,
        item: &TestItem,
        parent: Option<&RemoteId>,
    ) -> Result<RemoteId, ClientError> {
        self.check("start_item")?;
        self.next_id += 1;
        let id = RemoteId::new(format!("item-{}", self.next_id));
        self.items
            .insert((parent.cloned(), item.name.clone()), id.clone());
        self.calls.push(Call::StartItem {
            id: id.clone(),
            name: item.name.clone(),
            kind: item.kind,
            parent: parent.cloned(),
            time: item.start_time,
        });
        Ok(id)
    }

    fn finish_item(
        &mut self,
        item: &TestItem,
        status: Option<ReportStatus>,
        time: Timestamp,
    ) -> Result<(), ClientError> {
        self.check("finish_item")?;
        let id = item.remote_id().cloned().ok_or_else(|| ClientError::UnknownItem {
            name: item.name.clone(),
        })?;
        self.calls.push(Call::FinishItem { id, status, time });
        Ok(())
    }

    fn send_log(
        &mut self,
        item: Option<&RemoteId>,
        level: LogLevel,
        message: &str,
        time: Timestamp,
    ) -> Result<(), ClientError> {
        self.check("send_log")?;
        self.calls.push(Call::Log {
            item: item.cloned(),
            level,
            message: message.to_string(),
            time,
        });
        Ok(())
    }
}
