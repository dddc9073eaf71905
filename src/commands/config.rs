// Config command - show and create configuration files

use anyhow::Result;
use std::path::Path;

use crate::config::{self, Config};

pub fn handle_show_config(loaded: Option<&Config>) {
    println!("Current configuration:");

    match loaded {
        Some(cfg) => {
            println!("\n  Configuration file loaded:");
            println!("    Launch name: {}", cfg.launch.name);
            println!("    Attach to launch: {}", cfg.launch.attach_to_launch);
            println!("    Parallel: {}", cfg.launch.parallel);
            if let Some(ref description) = cfg.launch.description {
                println!("    Description: {}", description);
            }
            if let Some(ref path) = cfg.output.path {
                println!("    Output: {}", path);
            }
            if let Some(ref index) = cfg.output.index {
                println!("    Index: {}", index);
            }
        }
        None => {
            println!("\n  No configuration file loaded");
            println!("  Create one with: cukeportal --init-config .cukeportalrc.toml");
        }
    }

    println!("\n  Environment variables:");
    for name in [config::ENV_CUKEPORTAL_PARALLEL, config::ENV_CUKEPORTAL_ATTACH] {
        match std::env::var(name) {
            Ok(value) => println!("    {}: {}", name, value),
            Err(_) => println!("    {}: not set", name),
        }
    }

    print_precedence();
}

pub fn handle_init_config(path: &Path) -> Result<()> {
    let toml_content = Config::default().to_toml();
    std::fs::write(path, toml_content)?;
    println!("Configuration file created: {}", path.display());
    print_precedence();
    Ok(())
}

fn print_precedence() {
    println!("\nConfiguration precedence:");
    println!("  1. Command-line arguments (highest)");
    println!("  2. Environment variables");
    println!("  3. Configuration file");
    println!("  4. Built-in defaults (lowest)");
}
