// Model module - items and statuses shared by the reporters

pub mod item;
pub mod status;

pub use item::{ItemKind, RemoteId, TestItem};
pub use status::{LogLevel, ReportStatus, Status};
