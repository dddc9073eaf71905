// Events emitted by the test engine while a suite runs
// One JSON object per line when replayed from a file

use crate::model::Status;
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};

/// Engine event, tagged by the `event` field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    TestCaseStarted {
        feature: Feature,
        scenario: Scenario,
        #[serde(default)]
        time: Option<Timestamp>,
    },

    TestStepStarted {
        step: TestStep,
        #[serde(default)]
        time: Option<Timestamp>,
    },

    TestStepFinished {
        step: TestStep,
        result: StepResult,
        #[serde(default)]
        time: Option<Timestamp>,
    },

    TestCaseFinished {
        status: Status,
        #[serde(default)]
        time: Option<Timestamp>,
    },

    TestRunFinished {
        #[serde(default)]
        time: Option<Timestamp>,
    },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Self::TestCaseStarted { .. } => "test_case_started",
            Self::TestStepStarted { .. } => "test_step_started",
            Self::TestStepFinished { .. } => "test_step_finished",
            Self::TestCaseFinished { .. } => "test_case_finished",
            Self::TestRunFinished { .. } => "test_run_finished",
        }
    }

    pub fn time(&self) -> Option<Timestamp> {
        match self {
            Self::TestCaseStarted { time, .. }
            | Self::TestStepStarted { time, .. }
            | Self::TestStepFinished { time, .. }
            | Self::TestCaseFinished { time, .. }
            | Self::TestRunFinished { time } => *time,
        }
    }
}

/// Feature file the running scenario belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    /// Location relative to the project, e.g. `features/auth/login.feature`
    pub uri: String,
    #[serde(default = "default_feature_keyword")]
    pub keyword: String,
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_feature_keyword() -> String {
    String::from("Feature")
}

impl Feature {
    /// Path segments of the uri; the last one names the feature file
    pub fn path(&self) -> Vec<String> {
        self.uri
            .split(['/', '\\'])
            .filter(|segment| !segment.is_empty() && *segment != ".")
            .map(str::to_string)
            .collect()
    }

    /// Leaf container placed under the folders of `path()`
    pub fn container(&self) -> LeafContainer {
        LeafContainer {
            path: self.path(),
            title: format!("{}: {}", self.keyword, self.name),
            description: Some(self.uri.clone()),
            tags: self.tags.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default = "default_scenario_keyword")]
    pub keyword: String,
    pub name: String,
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_scenario_keyword() -> String {
    String::from("Scenario")
}

/// Path-qualified container whose ancestors are synthesized folders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafContainer {
    pub path: Vec<String>,
    pub title: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
}

impl LeafContainer {
    pub fn new<I, S>(path: I, title: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into_iter().map(Into::into).collect(),
            title: title.into(),
            description: None,
            tags: Vec::new(),
        }
    }
}

/// Either a declared Gherkin step or a hook the engine ran around it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TestStep {
    Step {
        keyword: String,
        text: String,
        /// Where the matching step definition lives
        #[serde(default)]
        location: String,
        #[serde(default)]
        argument: Option<StepArgument>,
    },
    Hook {
        label: String,
        #[serde(default)]
        location: String,
    },
}

impl TestStep {
    pub fn step(keyword: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Step {
            keyword: keyword.into(),
            text: text.into(),
            location: String::new(),
            argument: None,
        }
    }

    pub fn hook(label: impl Into<String>, location: impl Into<String>) -> Self {
        Self::Hook {
            label: label.into(),
            location: location.into(),
        }
    }

    pub fn with_location(mut self, new_location: impl Into<String>) -> Self {
        match &mut self {
            Self::Step { location, .. } | Self::Hook { location, .. } => {
                *location = new_location.into()
            }
        }
        self
    }

    pub fn with_argument(mut self, new_argument: StepArgument) -> Self {
        if let Self::Step { argument, .. } = &mut self {
            *argument = Some(new_argument);
        }
        self
    }

    pub fn is_step(&self) -> bool {
        matches!(self, Self::Step { .. })
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Step { text, .. } => text,
            Self::Hook { label, .. } => label,
        }
    }

    pub fn location(&self) -> &str {
        match self {
            Self::Step { location, .. } | Self::Hook { location, .. } => location,
        }
    }
}

/// Multi-line payload attached to a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum StepArgument {
    DocString(String),
    DataTable(Vec<Vec<String>>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    pub status: Status,
    #[serde(default)]
    pub exception: Option<Exception>,
}

impl StepResult {
    pub fn new(status: Status) -> Self {
        Self {
            status,
            exception: None,
        }
    }

    pub fn with_exception(mut self, exception: Exception) -> Self {
        self.exception = Some(exception);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exception {
    #[serde(rename = "type")]
    pub type_name: String,
    pub message: String,
    #[serde(default)]
    pub backtrace: Vec<String>,
}
