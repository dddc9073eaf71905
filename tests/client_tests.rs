// Tests for the JSON-lines client and the replay command

use cukeportal::client::{JsonLinesClient, MemoryClient, Record, ReportClient};
use cukeportal::commands::replay_events;
use cukeportal::model::{ItemKind, LogLevel, TestItem};
use cukeportal::report::{LaunchOptions, ReportMode};
use cukeportal::time::Timestamp;
use std::io::{BufRead, BufReader, Cursor};

const EVENTS: &str = r#"
{"event":"test_case_started","time":100,"feature":{"uri":"features/cart/checkout.feature","name":"Checkout"},"scenario":{"name":"Pay","line":4}}
{"event":"test_step_started","time":101,"step":{"type":"step","keyword":"Given ","text":"a cart"}}
{"event":"test_step_finished","time":102,"step":{"type":"step","keyword":"Given ","text":"a cart"},"result":{"status":"passed"}}
{"event":"test_step_finished","time":103,"step":{"type":"hook","label":"After","location":"hooks.rb:2"},"result":{"status":"failed","exception":{"type":"IOError","message":"closed"}}}
{"event":"test_case_finished","time":104,"status":"failed"}
{"event":"test_run_finished","time":110}
"#;

fn read_records(path: &std::path::Path) -> Vec<Record> {
    let file = std::fs::File::open(path).expect("launch file");
    BufReader::new(file)
        .lines()
        .map(|line| serde_json::from_str(&line.unwrap()).expect("record"))
        .collect()
}

#[test]
fn test_replay_writes_launch_file() {
    // Arrange
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("launch.jsonl");
    let client = JsonLinesClient::open(&path).expect("open launch file");

    // Act
    let (summary, _) = replay_events(client, LaunchOptions::default(), Cursor::new(EVENTS))
        .expect("replay");

    // Assert
    assert_eq!(summary.total(), 1);
    assert_eq!(summary.failed(), 1);
    assert_eq!(summary.log_entries(), 3);

    let records = read_records(&path);
    assert!(matches!(records.first(), Some(Record::StartLaunch { .. })));
    assert!(matches!(records.last(), Some(Record::FinishLaunch { .. })));

    let kinds: Vec<ItemKind> = records
        .iter()
        .filter_map(|record| match record {
            Record::StartItem { kind, .. } => Some(*kind),
            _ => None,
        })
        .collect();
    assert_eq!(
        kinds,
        vec![ItemKind::Suite, ItemKind::Suite, ItemKind::Test, ItemKind::Step]
    );

    let logs: Vec<(LogLevel, &str)> = records
        .iter()
        .filter_map(|record| match record {
            Record::Log { level, message, .. } => Some((*level, message.as_str())),
            _ => None,
        })
        .collect();
    assert_eq!(logs[0].0, LogLevel::Info);
    assert_eq!(logs[1], (LogLevel::Error, "IOError: closed\n  "));
    assert_eq!(logs[2], (LogLevel::Error, "After at `hooks.rb:2` failed"));
}

#[test]
fn test_attach_reuses_folders_from_existing_launch() {
    // Arrange
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("launch.jsonl");
    let first = JsonLinesClient::open(&path).expect("open launch file");
    replay_events(first, LaunchOptions::default(), Cursor::new(EVENTS)).expect("first replay");
    let before = read_records(&path).len();

    let second_events = EVENTS.replace("checkout.feature", "refund.feature");
    let options = LaunchOptions {
        name: "Cucumber launch".to_string(),
        description: None,
        mode: ReportMode {
            parallel: true,
            attach_to_launch: true,
        },
    };

    // Act
    let second = JsonLinesClient::open(&path).expect("reopen launch file");
    replay_events(second, options, Cursor::new(second_events)).expect("second replay");

    // Assert
    let records = read_records(&path);
    let added: Vec<&str> = records[before..]
        .iter()
        .filter_map(|record| match record {
            Record::StartItem { name, .. } => Some(name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(added, vec!["Feature: Checkout", "Scenario: Pay"]);
    assert!(!records[before..]
        .iter()
        .any(|record| matches!(record, Record::StartLaunch { .. } | Record::FinishLaunch { .. })));
}

#[test]
fn test_launch_description_is_written() {
    // Arrange
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("launch.jsonl");
    let client = JsonLinesClient::open(&path).expect("open launch file");
    let options = LaunchOptions {
        name: "nightly".to_string(),
        description: Some("nightly regression".to_string()),
        mode: ReportMode::default(),
    };

    // Act
    replay_events(client, options, Cursor::new(EVENTS)).expect("replay");

    // Assert
    let records = read_records(&path);
    match records.first() {
        Some(Record::StartLaunch {
            name, description, ..
        }) => {
            assert_eq!(name, "nightly");
            assert_eq!(description.as_deref(), Some("nightly regression"));
        }
        other => panic!("unexpected first record {:?}", other),
    }
}

#[test]
fn test_load_index_counts_items() {
    // Arrange
    let mut writer = JsonLinesClient::new(Vec::new());
    let folder = TestItem::new("Folder: a", ItemKind::Suite, Timestamp(1));
    let folder_id = writer.start_item(&folder, None).unwrap();
    let feature = TestItem::new("Feature: x", ItemKind::Test, Timestamp(2));
    writer.start_item(&feature, Some(&folder_id)).unwrap();
    writer
        .send_log(None, LogLevel::Info, "ignored", Timestamp(3))
        .unwrap();
    let content = writer.into_inner();

    // Act
    let mut reader = JsonLinesClient::new(Vec::new());
    let count = reader.load_index(Cursor::new(content)).unwrap();

    // Assert
    assert_eq!(count, 2);
    assert_eq!(
        reader.lookup_item_id("Folder: a", None).unwrap(),
        Some(folder_id.clone())
    );
    assert!(reader.lookup_item_id("Feature: x", Some(&folder_id)).unwrap().is_some());
}

#[test]
fn test_replay_rejects_invalid_event() {
    let events = "{\"event\":\"test_case_started\"}\n";

    let result = replay_events(MemoryClient::new(), LaunchOptions::default(), Cursor::new(events));

    let err = result.err().expect("invalid event must fail");
    assert!(err.to_string().contains("line 1"));
}

#[test]
fn test_replay_closes_unfinished_stream() {
    let events = EVENTS
        .lines()
        .filter(|line| !line.contains("test_run_finished"))
        .collect::<Vec<_>>()
        .join("\n");

    let (_, client) = replay_events(
        MemoryClient::new().with_clock(Timestamp(500)),
        LaunchOptions::default(),
        Cursor::new(events),
    )
    .expect("replay");

    assert!(matches!(
        client.calls().last(),
        Some(cukeportal::client::Call::FinishLaunch { .. })
    ));
}
