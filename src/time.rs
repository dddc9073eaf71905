// Timestamps sent to the reporting service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Milliseconds since the Unix epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Current wall-clock time
    pub fn now() -> Self {
        Self(Utc::now().timestamp_millis())
    }

    pub fn to_rfc3339(self) -> String {
        DateTime::<Utc>::from_timestamp_millis(self.0)
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_else(|| self.0.to_string())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_rfc3339())
    }
}

/// Keeps the timestamps of one process strictly increasing.
///
/// The service orders items and logs by time only, so two calls made within
/// the same millisecond would otherwise be shown in arbitrary order.
#[derive(Debug, Default, Clone)]
pub struct TimeKeeper {
    last_used: Option<Timestamp>,
}

impl TimeKeeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `desired`, or one millisecond past the last returned value
    /// when `desired` would not move time forward.
    pub fn adjust(&mut self, desired: Timestamp) -> Timestamp {
        let sent = match self.last_used {
            Some(last) if desired <= last => Timestamp(last.0 + 1),
            _ => desired,
        };
        self.last_used = Some(sent);
        sent
    }

    pub fn last_used(&self) -> Option<Timestamp> {
        self.last_used
    }
}
