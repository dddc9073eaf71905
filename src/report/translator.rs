// Step outcome translator - turns a finished step into log entries

use crate::events::{StepArgument, StepResult, TestStep};
use crate::model::{LogLevel, Status};

/// Log line to send against the running scenario
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Log entries for a finished step, in the order they must be sent.
///
/// A genuine step always yields its colored transcript first. Failed,
/// pending and undefined steps add the failure detail, and every
/// non-passing step or hook ends with a `<label> <status>` notice.
pub fn translate(step: &TestStep, result: &StepResult) -> Vec<LogEntry> {
    let mut entries = Vec::with_capacity(3);

    if let TestStep::Step {
        keyword,
        text,
        argument,
        ..
    } = step
    {
        let message = render_step(keyword, text, argument.as_ref());
        entries.push(LogEntry::new(
            LogLevel::Info,
            color_message(&message, result.status.color()),
        ));
    }

    if let Some(detail) = failure_detail(step, result) {
        entries.push(LogEntry::new(LogLevel::Error, detail));
    }

    if !result.status.is_passed() {
        entries.push(LogEntry::new(
            result.status.notice_level(),
            format!("{} {}", step_type_label(step), result.status),
        ));
    }

    entries
}

/// Keyword and text followed by the multi-line argument, if any
pub fn render_step(keyword: &str, text: &str, argument: Option<&StepArgument>) -> String {
    let mut message = format!("{}{}", keyword, text);
    if let Some(argument) = argument {
        message.push_str(&render_argument(argument));
    }
    message
}

pub fn render_argument(argument: &StepArgument) -> String {
    match argument {
        StepArgument::DocString(content) => format!("\n\"\"\"\n{}\n\"\"\"", content),
        StepArgument::DataTable(rows) => rows.iter().fold(String::from("\n"), |mut acc, row| {
            acc.push_str(&format!("| {} |\n", row.join(" | ")));
            acc
        }),
    }
}

/// Wrap `message` in a colored span; uncolored statuses are sent as is
pub fn color_message(message: &str, color: Option<&str>) -> String {
    match color {
        Some(color) => format!("<span style=\"color:{}\">{}</span>", color, message),
        None => message.to_string(),
    }
}

fn failure_detail(step: &TestStep, result: &StepResult) -> Option<String> {
    if !result.status.has_failure_detail() {
        return None;
    }
    match &result.status {
        Status::Undefined => Some(format!(
            "Undefined step: {}:\n{}",
            step.text(),
            step.location()
        )),
        _ => Some(match &result.exception {
            Some(ex) => format!(
                "{}: {}\n  {}",
                ex.type_name,
                ex.message,
                ex.backtrace.join("\n  ")
            ),
            None => format!("{}: <no exception details>", result.status),
        }),
    }
}

fn step_type_label(step: &TestStep) -> String {
    match step {
        TestStep::Step { .. } => String::from("Step"),
        TestStep::Hook { label, location } => format!("{} at `{}`", label, location),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_doc_string() {
        let argument = StepArgument::DocString("line one\nline two".to_string());
        assert_eq!(
            render_argument(&argument),
            "\n\"\"\"\nline one\nline two\n\"\"\""
        );
    }

    #[test]
    fn test_render_step_without_argument() {
        assert_eq!(render_step("Given ", "a user", None), "Given a user");
    }

    #[test]
    fn test_color_message_without_color() {
        assert_eq!(color_message("text", None), "text");
        assert_eq!(
            color_message("text", Some("red")),
            "<span style=\"color:red\">text</span>"
        );
    }

    #[test]
    fn test_hook_label_includes_location() {
        let hook = TestStep::hook("Before", "features/support/env.rb:12");
        assert_eq!(
            step_type_label(&hook),
            "Before at `features/support/env.rb:12`"
        );
    }
}
