// Report module - mirrors a Cucumber run into the remote report

pub mod formatter;
pub mod translator;
pub mod tree;

pub use formatter::{Formatter, LaunchOptions};
pub use translator::{LogEntry, translate};
pub use tree::{ItemTree, NodeId, ReportMode, TreeNode};
