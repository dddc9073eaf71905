// Step and item statuses

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result category of a step or test case as reported by the engine.
///
/// Labels the engine sends that are not known here are kept verbatim in
/// `Other` and handled as a generic non-passing outcome.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    Passed,
    Failed,
    Pending,
    Undefined,
    Skipped,
    Ambiguous,
    Flaky,
    Other(String),
}

impl Status {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Pending => "pending",
            Self::Undefined => "undefined",
            Self::Skipped => "skipped",
            Self::Ambiguous => "ambiguous",
            Self::Flaky => "flaky",
            Self::Other(label) => label,
        }
    }

    /// Terminal color alias used to tint the step transcript
    pub fn color(&self) -> Option<&'static str> {
        match self {
            Self::Passed => Some("green"),
            Self::Failed | Self::Ambiguous => Some("red"),
            Self::Pending | Self::Undefined | Self::Flaky => Some("yellow"),
            Self::Skipped => Some("cyan"),
            Self::Other(_) => None,
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Whether an error entry with the failure detail accompanies the step
    pub fn has_failure_detail(&self) -> bool {
        matches!(self, Self::Failed | Self::Pending | Self::Undefined)
    }

    /// Severity of the "<step> <status>" notice for non-passing steps
    pub fn notice_level(&self) -> LogLevel {
        match self {
            Self::Skipped => LogLevel::Warn,
            _ => LogLevel::Error,
        }
    }

    /// Status the reporting service records for a finished test case
    pub fn report_status(&self) -> ReportStatus {
        match self {
            Self::Passed => ReportStatus::Passed,
            Self::Skipped => ReportStatus::Skipped,
            _ => ReportStatus::Failed,
        }
    }
}

impl From<&str> for Status {
    fn from(label: &str) -> Self {
        match label {
            "passed" => Self::Passed,
            "failed" => Self::Failed,
            "pending" => Self::Pending,
            "undefined" => Self::Undefined,
            "skipped" => Self::Skipped,
            "ambiguous" => Self::Ambiguous,
            "flaky" => Self::Flaky,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for Status {
    fn from(label: String) -> Self {
        Self::from(label.as_str())
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log severity accepted by the reporting service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}

/// Final status of a remote item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Passed,
    Failed,
    Skipped,
}
