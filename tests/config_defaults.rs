use cukeportal::config::Config;

#[test]
fn test_default_config_values() {
    let config = Config::default();

    assert_eq!(config.launch.name, "Cucumber launch");
    assert!(!config.launch.attach_to_launch);
    assert!(!config.launch.parallel);
    assert!(config.output.path.is_none());
    assert!(config.output.index.is_none());
    assert!(!config.launch_options().mode.is_shared());
}

#[test]
fn test_partial_config_keeps_defaults() {
    let config = Config::parse("[launch]\nparallel = true\n").expect("valid config");

    assert_eq!(config.launch.name, "Cucumber launch");
    assert!(config.launch.parallel);
    assert!(config.launch_options().mode.is_shared());
}

#[test]
fn test_load_from_file() {
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join(".cukeportalrc.toml");
    std::fs::write(&path, "[output]\npath = \"out.jsonl\"\n").unwrap();

    let config = Config::load_from_file(&path).expect("config loaded");

    assert_eq!(config.output.path.as_deref(), Some("out.jsonl"));
}
