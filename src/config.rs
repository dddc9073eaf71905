// Configuration file handling

use crate::report::{LaunchOptions, ReportMode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub launch: LaunchConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchConfig {
    /// Name of the launch created on the reporting service
    #[serde(default = "default_launch_name")]
    pub name: String,

    /// Report into a launch started by another process
    #[serde(default)]
    pub attach_to_launch: bool,

    /// Several worker processes share the launch
    #[serde(default)]
    pub parallel: bool,

    #[serde(default)]
    pub description: Option<String>,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            name: default_launch_name(),
            attach_to_launch: false,
            parallel: false,
            description: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    /// JSON-lines file the launch is appended to
    #[serde(default)]
    pub path: Option<String>,

    /// Launch file whose items are reused when attaching
    #[serde(default)]
    pub index: Option<String>,
}

// Default values
pub const ENV_CUKEPORTAL_PARALLEL: &str = "CUKEPORTAL_PARALLEL";
pub const ENV_CUKEPORTAL_ATTACH: &str = "CUKEPORTAL_ATTACH";

pub fn default_launch_name() -> String {
    String::from("Cucumber launch")
}

/// Interpret a boolean environment flag ("1", "true", "yes")
pub fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|value| parse_flag(&value))
        .unwrap_or(false)
}

/// First existing config file, checked in order:
/// 1. .cukeportalrc (current directory)
/// 2. ~/.cukeportalrc (home directory)
/// 3. .cukeportalrc.toml (current directory)
/// 4. ~/.cukeportalrc.toml (home directory)
///
/// A missing base directory only skips its own candidates.
pub fn find_config(cwd: Option<&Path>, home: Option<&Path>) -> Option<PathBuf> {
    [".cukeportalrc", ".cukeportalrc.toml"]
        .iter()
        .flat_map(|name| [cwd, home].into_iter().flatten().map(move |dir| dir.join(name)))
        .find(|path| path.exists())
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

impl Config {
    /// Load configuration from default locations
    pub fn load() -> Option<Self> {
        let cwd = std::env::current_dir().ok();
        let home = dirs::home_dir();
        let path = find_config(cwd.as_deref(), home.as_deref())?;
        Self::load_from_file(&path)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Option<Self> {
        toml::from_str(content).ok()
    }

    /// Generate default configuration as TOML
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_else(|_| String::new())
    }

    /// Apply environment flags on top of the file values
    pub fn with_env(mut self) -> Self {
        if env_flag(ENV_CUKEPORTAL_PARALLEL) {
            self.launch.parallel = true;
        }
        if env_flag(ENV_CUKEPORTAL_ATTACH) {
            self.launch.attach_to_launch = true;
        }
        self
    }

    pub fn launch_options(&self) -> LaunchOptions {
        LaunchOptions {
            name: self.launch.name.clone(),
            description: self.launch.description.clone(),
            mode: ReportMode {
                parallel: self.launch.parallel,
                attach_to_launch: self.launch.attach_to_launch,
            },
        }
    }

    pub fn output_path(&self) -> Option<PathBuf> {
        self.output.path.as_ref().map(PathBuf::from)
    }

    pub fn index_path(&self) -> Option<PathBuf> {
        self.output.index.as_ref().map(PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
[launch]
name = "nightly"
attach_to_launch = true
parallel = true
description = "nightly regression"

[output]
path = "launch.jsonl"
index = "previous.jsonl"
"#;

        let config = Config::parse(toml).expect("Failed to parse config");
        assert_eq!(config.launch.name, "nightly");
        assert!(config.launch.attach_to_launch);
        assert!(config.launch.parallel);
        assert_eq!(
            config.launch.description,
            Some("nightly regression".to_string())
        );
        assert_eq!(config.output_path(), Some(PathBuf::from("launch.jsonl")));
        assert_eq!(config.index_path(), Some(PathBuf::from("previous.jsonl")));

        let options = config.launch_options();
        assert!(options.mode.is_shared());
        assert_eq!(options.name, "nightly");
        assert_eq!(options.description.as_deref(), Some("nightly regression"));
    }

    #[test]
    fn test_find_config_without_home_checks_current_dir() {
        // Arrange
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join(".cukeportalrc.toml");
        std::fs::write(&path, "[launch]\nparallel = true\n").unwrap();

        // Act
        let found = find_config(Some(temp_dir.path()), None);

        // Assert
        assert_eq!(found, Some(path));
    }

    #[test]
    fn test_find_config_prefers_current_dir_over_home() {
        // Arrange
        let cwd = tempfile::TempDir::new().expect("Failed to create temp dir");
        let home = tempfile::TempDir::new().expect("Failed to create temp dir");
        std::fs::write(home.path().join(".cukeportalrc"), "").unwrap();
        std::fs::write(cwd.path().join(".cukeportalrc"), "").unwrap();

        // Act
        let found = find_config(Some(cwd.path()), Some(home.path()));

        // Assert
        assert_eq!(found, Some(cwd.path().join(".cukeportalrc")));
    }

    #[test]
    fn test_find_config_falls_back_to_home() {
        let home = tempfile::TempDir::new().expect("Failed to create temp dir");
        std::fs::write(home.path().join(".cukeportalrc.toml"), "").unwrap();

        assert_eq!(
            find_config(None, Some(home.path())),
            Some(home.path().join(".cukeportalrc.toml"))
        );
    }

    #[test]
    fn test_parse_flag_values() {
        assert!(parse_flag("1"));
        assert!(parse_flag("TRUE"));
        assert!(parse_flag(" yes "));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn test_to_toml_round_trips_defaults() {
        let content = Config::default().to_toml();
        let parsed = Config::parse(&content).expect("default config parses");
        assert_eq!(parsed.launch.name, default_launch_name());
        assert!(!parsed.launch.parallel);
    }
}
