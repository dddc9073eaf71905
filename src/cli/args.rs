// CLI argument definitions using Clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Mirror Cucumber run events into a hierarchical remote report
#[derive(Parser, Debug)]
#[command(name = "cukeportal")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Mirror Cucumber run events into a hierarchical remote report", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose debug output
    #[arg(short = 'v', long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Show current configuration and exit
    #[arg(long, default_value_t = false)]
    pub config: bool,

    /// Create default configuration file
    #[arg(long, value_name = "CONFIG_FILE")]
    pub init_config: Option<PathBuf>,

    /// Install shell completion (bash, zsh, fish, powershell)
    #[arg(long, value_name = "SHELL_TYPE", value_parser = ["bash", "zsh", "fish", "powershell"])]
    pub completion: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a JSON-lines event stream into a launch
    Replay(ReplayArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    /// Event stream, one JSON event per line ("-" reads stdin)
    pub events: PathBuf,

    /// JSON-lines launch file to append to (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Launch file whose items are reused when attaching
    #[arg(long)]
    pub index: Option<PathBuf>,

    /// Several worker processes report into the launch
    #[arg(long, default_value_t = false)]
    pub parallel: bool,

    /// Report into a launch started by another process
    #[arg(long, default_value_t = false)]
    pub attach: bool,

    /// Launch name
    #[arg(long)]
    pub launch_name: Option<String>,

    /// Keep the launch in memory and only print a summary
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}
