// Main entry point for cukeportal

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use cukeportal::cli::{Cli, Commands};
use cukeportal::commands;
use cukeportal::config;
use cukeportal::logging;

fn main() -> Result<()> {
    // Load configuration from file (if exists)
    let config = config::Config::load();

    let cli = Cli::parse();
    logging::init(cli.verbose);

    if cli.verbose {
        info!("Starting cukeportal v{}", env!("CARGO_PKG_VERSION"));
    }

    if cli.config {
        commands::handle_show_config(config.as_ref());
        return Ok(());
    }

    if let Some(config_file) = cli.init_config {
        return commands::handle_init_config(&config_file);
    }

    if let Some(shell_type) = cli.completion {
        return commands::handle_completion(&shell_type);
    }

    match &cli.command {
        Some(Commands::Replay(args)) => {
            let summary = commands::handle_replay(args, config)?;
            if !summary.all_passed() {
                std::process::exit(1);
            }
            Ok(())
        }
        None => {
            warn!("No command given. Use 'cukeportal --help' for usage.");
            Ok(())
        }
    }
}
