// JSON-lines client - writes one record per remote call

use super::{ClientError, ReportClient};
use crate::model::{ItemKind, LogLevel, RemoteId, ReportStatus, TestItem};
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use tracing::debug;
use uuid::Uuid;

/// One line of a launch file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Record {
    StartLaunch {
        id: RemoteId,
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        time: Timestamp,
    },
    FinishLaunch {
        time: Timestamp,
    },
    StartItem {
        id: RemoteId,
        #[serde(skip_serializing_if = "Option::is_none")]
        parent: Option<RemoteId>,
        name: String,
        #[serde(rename = "type")]
        kind: ItemKind,
        time: Timestamp,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tags: Vec<String>,
    },
    FinishItem {
        id: RemoteId,
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<ReportStatus>,
        time: Timestamp,
    },
    Log {
        #[serde(skip_serializing_if = "Option::is_none")]
        item: Option<RemoteId>,
        level: LogLevel,
        message: String,
        time: Timestamp,
    },
}

/// Client that appends the launch to a JSON-lines stream.
///
/// Lookups are answered from the items this client wrote plus any loaded
/// from an earlier launch file, which lets a second process attach to it.
pub struct JsonLinesClient<W: Write> {
    writer: W,
    items: HashMap<(Option<RemoteId>, String), RemoteId>,
}

impl JsonLinesClient<File> {
    /// Append to `path`, indexing the items it already holds
    pub fn open(path: &Path) -> Result<Self, ClientError> {
        let mut items = HashMap::new();
        if path.exists() {
            items = index_records(BufReader::new(File::open(path)?))?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut client = Self::new(file);
        client.items = items;
        Ok(client)
    }
}

impl<W: Write> JsonLinesClient<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            items: HashMap::new(),
        }
    }

    /// Make items of a previously written launch visible to lookups
    pub fn load_index<R: BufRead>(&mut self, reader: R) -> Result<usize, ClientError> {
        let items = index_records(reader)?;
        let count = items.len();
        self.items.extend(items);
        debug!("Indexed {} items from existing launch", count);
        Ok(count)
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write(&mut self, record: &Record) -> Result<(), ClientError> {
        serde_json::to_writer(&mut self.writer, record)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

fn index_records<R: BufRead>(
    reader: R,
) -> Result<HashMap<(Option<RemoteId>, String), RemoteId>, ClientError> {
    let mut items = HashMap::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: Record = serde_json::from_str(&line)?;
        if let Record::StartItem {
            id, parent, name, ..
        } = record
        {
            items.entry((parent, name)).or_insert(id);
        }
    }
    Ok(items)
}

fn new_id() -> RemoteId {
    RemoteId::new(Uuid::new_v4().to_string())
}

impl<W: Write> ReportClient for JsonLinesClient<W> {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }

    fn start_launch(
        &mut self,
        name: &str,
        description: Option<&str>,
        time: Timestamp,
    ) -> Result<RemoteId, ClientError> {
        let id = new_id();
        self.write(&Record::StartLaunch {
            id: id.clone(),
            name: name.to_string(),
            description: description.map(str::to_string),
            time,
        })?;
        Ok(id)
    }

    fn finish_launch(&mut self, time: Timestamp) -> Result<(), ClientError> {
        self.write(&Record::FinishLaunch { time })
    }

    fn lookup_item_id(
        &mut self,
        name: &str,
        parent: Option<&RemoteId>,
    ) -> Result<Option<RemoteId>, ClientError> {
        Ok(self
            .items
            .get(&(parent.cloned(), name.to_string()))
            .cloned())
    }

    fn start_item(
        &mut self,
        item: &TestItem,
        parent: Option<&RemoteId>,
    ) -> Result<RemoteId, ClientError> {
        let id = new_id();
        self.write(&Record::StartItem {
            id: id.clone(),
            parent: parent.cloned(),
            name: item.name.clone(),
            kind: item.kind,
            time: item.start_time,
            description: item.description.clone(),
            tags: item.tags.clone(),
        })?;
        self.items
            .entry((parent.cloned(), item.name.clone()))
            .or_insert_with(|| id.clone());
        Ok(id)
    }

    fn finish_item(
        &mut self,
        item: &TestItem,
        status: Option<ReportStatus>,
        time: Timestamp,
    ) -> Result<(), ClientError> {
        let id = item.remote_id().cloned().ok_or_else(|| ClientError::UnknownItem {
            name: item.name.clone(),
        })?;
        self.write(&Record::FinishItem { id, status, time })
    }

    fn send_log(
        &mut self,
        item: Option<&RemoteId>,
        level: LogLevel,
        message: &str,
        time: Timestamp,
    ) -> Result<(), ClientError> {
        self.write(&Record::Log {
            item: item.cloned(),
            level,
            message: message.to_string(),
            time,
        })
    }
}
