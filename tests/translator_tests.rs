// Tests for the step outcome translator - public API only

use cukeportal::events::{Exception, StepArgument, StepResult, TestStep};
use cukeportal::model::{LogLevel, Status};
use cukeportal::report::translate;

fn failure() -> Exception {
    Exception {
        type_name: "RSpec::Expectations::ExpectationNotMetError".to_string(),
        message: "expected 200, got 500".to_string(),
        backtrace: vec![
            "features/step_definitions/api_steps.rb:14".to_string(),
            "features/api.feature:9".to_string(),
        ],
    }
}

fn levels(status: Status) -> Vec<LogLevel> {
    let step = TestStep::step("When ", "I call the API");
    let result = StepResult::new(status).with_exception(failure());
    translate(&step, &result).iter().map(|e| e.level).collect()
}

#[test]
fn test_passed_step_yields_single_info_entry() {
    // Arrange
    let step = TestStep::step("Given ", "a user");
    let result = StepResult::new(Status::Passed);

    // Act
    let entries = translate(&step, &result);

    // Assert
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].level, LogLevel::Info);
    assert_eq!(
        entries[0].message,
        "<span style=\"color:green\">Given a user</span>"
    );
}

#[test]
fn test_failed_step_yields_transcript_detail_and_notice() {
    // Arrange
    let step = TestStep::step("When ", "I call the API");
    let result = StepResult::new(Status::Failed).with_exception(failure());

    // Act
    let entries = translate(&step, &result);

    // Assert
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].level, LogLevel::Info);
    assert!(entries[0].message.contains("color:red"));
    assert_eq!(entries[1].level, LogLevel::Error);
    assert_eq!(
        entries[1].message,
        "RSpec::Expectations::ExpectationNotMetError: expected 200, got 500\n  \
         features/step_definitions/api_steps.rb:14\n  features/api.feature:9"
    );
    assert_eq!(entries[2].level, LogLevel::Error);
    assert_eq!(entries[2].message, "Step failed");
}

#[test]
fn test_skipped_step_yields_info_and_warning() {
    assert_eq!(levels(Status::Skipped), vec![LogLevel::Info, LogLevel::Warn]);

    let step = TestStep::step("Then ", "nothing happens");
    let entries = translate(&step, &StepResult::new(Status::Skipped));
    assert_eq!(entries[1].message, "Step skipped");
    assert!(entries[0].message.contains("color:cyan"));
}

#[test]
fn test_pending_step_reports_exception() {
    // Arrange
    let step = TestStep::step("Then ", "it is pending");
    let result = StepResult::new(Status::Pending).with_exception(Exception {
        type_name: "Cucumber::Pending".to_string(),
        message: "TODO".to_string(),
        backtrace: vec!["steps.rb:3".to_string()],
    });

    // Act
    let entries = translate(&step, &result);

    // Assert
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[1].message, "Cucumber::Pending: TODO\n  steps.rb:3");
    assert_eq!(entries[2].message, "Step pending");
}

#[test]
fn test_undefined_step_reports_location() {
    // Arrange
    let step = TestStep::step("Given ", "an unknown step").with_location("features/a.feature:4");
    let result = StepResult::new(Status::Undefined);

    // Act
    let entries = translate(&step, &result);

    // Assert
    assert_eq!(entries.len(), 3);
    assert_eq!(
        entries[1].message,
        "Undefined step: an unknown step:\nfeatures/a.feature:4"
    );
    assert_eq!(entries[2].message, "Step undefined");
    assert!(entries[0].message.contains("color:yellow"));
}

#[test]
fn test_failed_hook_uses_hook_label() {
    // Arrange
    let hook = TestStep::hook("After", "features/support/hooks.rb:7");
    let result = StepResult::new(Status::Failed).with_exception(failure());

    // Act
    let entries = translate(&hook, &result);

    // Assert
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].level, LogLevel::Error);
    assert_eq!(
        entries[1].message,
        "After at `features/support/hooks.rb:7` failed"
    );
}

#[test]
fn test_passed_hook_yields_nothing() {
    let hook = TestStep::hook("Before", "env.rb:1");
    assert!(translate(&hook, &StepResult::new(Status::Passed)).is_empty());
}

#[test]
fn test_unknown_status_falls_back_to_notice() {
    // Arrange
    let step = TestStep::step("Given ", "something odd");
    let result = StepResult::new(Status::from("exploded"));

    // Act
    let entries = translate(&step, &result);

    // Assert
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].message, "Given something odd");
    assert_eq!(entries[1].level, LogLevel::Error);
    assert_eq!(entries[1].message, "Step exploded");
}

#[test]
fn test_data_table_rendering() {
    // Arrange
    let step = TestStep::step("Given ", "the values").with_argument(StepArgument::DataTable(vec![
        vec!["x".to_string(), "y".to_string()],
        vec!["1".to_string(), "2".to_string()],
    ]));

    // Act
    let entries = translate(&step, &StepResult::new(Status::Passed));

    // Assert
    assert_eq!(
        entries[0].message,
        "<span style=\"color:green\">Given the values\n| x | y |\n| 1 | 2 |\n</span>"
    );
}

#[test]
fn test_doc_string_rendering() {
    let step = TestStep::step("Given ", "the body")
        .with_argument(StepArgument::DocString("{\"id\": 1}".to_string()));

    let entries = translate(&step, &StepResult::new(Status::Passed));

    assert_eq!(
        entries[0].message,
        "<span style=\"color:green\">Given the body\n\"\"\"\n{\"id\": 1}\n\"\"\"</span>"
    );
}
