// Remote-reportable items

use crate::error::ReportError;
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity assigned to an item by the reporting service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteId(pub String);

impl RemoteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Item type as understood by the reporting service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ItemKind {
    /// Folder on the way to a feature
    Suite,
    /// Feature file
    Test,
    /// Scenario inside a feature
    Step,
}

/// A node of the remote report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestItem {
    pub name: String,
    pub kind: ItemKind,
    remote_id: Option<RemoteId>,
    pub start_time: Timestamp,
    pub closed: bool,
    pub description: Option<String>,
    pub tags: Vec<String>,
    /// False when the identity was borrowed from another process
    pub owned: bool,
}

impl TestItem {
    pub fn new(name: impl Into<String>, kind: ItemKind, start_time: Timestamp) -> Self {
        Self {
            name: name.into(),
            kind,
            remote_id: None,
            start_time,
            closed: false,
            description: None,
            tags: Vec::new(),
            owned: true,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for tag in tags {
            let tag = tag.into();
            if !self.tags.contains(&tag) {
                self.tags.push(tag);
            }
        }
        self
    }

    /// Item whose identity was created by another process
    pub fn borrowed(mut self, remote_id: RemoteId) -> Self {
        self.remote_id = Some(remote_id);
        self.owned = false;
        self
    }

    pub fn remote_id(&self) -> Option<&RemoteId> {
        self.remote_id.as_ref()
    }

    pub fn has_remote_id(&self) -> bool {
        self.remote_id.is_some()
    }

    /// Attach the identity returned by the service. An identity is final.
    pub fn assign_remote_id(&mut self, remote_id: RemoteId) -> Result<(), ReportError> {
        if let Some(existing) = &self.remote_id {
            return Err(ReportError::IdentityReassigned {
                name: self.name.clone(),
                existing: existing.clone(),
            });
        }
        self.remote_id = Some(remote_id);
        Ok(())
    }
}
