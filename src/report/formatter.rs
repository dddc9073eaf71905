// Formatter - per-process reporting context driven by engine events

use super::translator::translate;
use super::tree::{ItemTree, NodeId, ReportMode};
use crate::client::ReportClient;
use crate::error::ReportError;
use crate::events::{Event, Feature, Scenario, StepResult, TestStep};
use crate::model::{ItemKind, ReportStatus, Status, TestItem};
use crate::state::RunSummary;
use crate::time::{TimeKeeper, Timestamp};
use tracing::{debug, info};

/// Launch settings threaded in from configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    pub name: String,
    pub description: Option<String>,
    pub mode: ReportMode,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            name: crate::config::default_launch_name(),
            description: None,
            mode: ReportMode::default(),
        }
    }
}

/// Open feature file and the tree node standing for it
#[derive(Debug, Clone)]
struct OpenFeature {
    uri: String,
    node: NodeId,
}

/// Mirrors the events of one process into the remote launch.
///
/// Holds everything a run needs between callbacks: the item tree, the
/// feature and scenario currently open, and the time keeper that orders
/// every call sent through the client.
pub struct Formatter<C: ReportClient> {
    client: C,
    tree: ItemTree,
    clock: TimeKeeper,
    options: LaunchOptions,
    feature: Option<OpenFeature>,
    scenario: Option<NodeId>,
    summary: RunSummary,
    finished: bool,
}

impl<C: ReportClient> Formatter<C> {
    /// Create the formatter, starting the launch unless attaching to one
    pub fn start(mut client: C, options: LaunchOptions) -> Result<Self, ReportError> {
        let mut clock = TimeKeeper::new();
        if !options.mode.attach_to_launch {
            let time = clock.adjust(client.now());
            let launch =
                client.start_launch(&options.name, options.description.as_deref(), time)?;
            info!("Started launch '{}' ({})", options.name, launch);
        } else {
            info!("Attaching to launch '{}'", options.name);
        }

        Ok(Self {
            client,
            tree: ItemTree::new(),
            clock,
            options,
            feature: None,
            scenario: None,
            summary: RunSummary::new(),
            finished: false,
        })
    }

    /// Route one engine event; events without a time use the client clock
    pub fn handle(&mut self, event: &Event) -> Result<(), ReportError> {
        let time = event.time().unwrap_or_else(|| self.client.now());
        match event {
            Event::TestCaseStarted {
                feature, scenario, ..
            } => self.on_test_case_started(feature, scenario, time),
            Event::TestStepStarted { step, .. } => self.on_test_step_started(step, time),
            Event::TestStepFinished { step, result, .. } => {
                self.on_test_step_finished(step, result, time)
            }
            Event::TestCaseFinished { status, .. } => self.on_test_case_finished(status, time),
            Event::TestRunFinished { .. } => self.on_test_run_finished(time),
        }
    }

    pub fn on_test_case_started(
        &mut self,
        feature: &Feature,
        scenario: &Scenario,
        time: Timestamp,
    ) -> Result<(), ReportError> {
        let same_feature = self
            .feature
            .as_ref()
            .is_some_and(|open| open.uri == feature.uri);
        if !same_feature {
            if let Some(previous) = self.feature.take() {
                self.finish_node(previous.node, None, time)?;
            }
            let node = self.tree.sync_path(
                &feature.container(),
                time,
                self.options.mode,
                &mut self.client,
                &mut self.clock,
            )?;
            self.summary.record_feature();
            debug!("Feature {} is ready", feature.uri);
            self.feature = Some(OpenFeature {
                uri: feature.uri.clone(),
                node,
            });
        }

        let parent = self.active_parent().unwrap_or_else(|| self.tree.root());
        let item = TestItem::new(
            format!("{}: {}", scenario.keyword, scenario.name),
            ItemKind::Step,
            self.clock.adjust(time),
        )
        .with_description(Some(format!("{}:{}", feature.uri, scenario.line)))
        .with_tags(scenario.tags.iter().cloned());

        let segment = format!("{}:{}", scenario.line, scenario.name);
        let node = self
            .tree
            .start_child(parent, &segment, item, &mut self.client)?;
        self.scenario = Some(node);
        Ok(())
    }

    /// The transcript of a step is sent once it finished
    pub fn on_test_step_started(
        &mut self,
        _step: &TestStep,
        _time: Timestamp,
    ) -> Result<(), ReportError> {
        Ok(())
    }

    pub fn on_test_step_finished(
        &mut self,
        step: &TestStep,
        result: &StepResult,
        time: Timestamp,
    ) -> Result<(), ReportError> {
        let target = self
            .scenario
            .and_then(|node| self.tree.remote_id(node))
            .cloned();
        let entries = translate(step, result);
        for entry in &entries {
            let sent = self.clock.adjust(time);
            self.client
                .send_log(target.as_ref(), entry.level, &entry.message, sent)?;
        }
        self.summary.record_logs(entries.len());
        Ok(())
    }

    pub fn on_test_case_finished(
        &mut self,
        status: &Status,
        time: Timestamp,
    ) -> Result<(), ReportError> {
        let node = self.scenario.take().ok_or(ReportError::NoActiveScenario {
            event: "test_case_finished",
        })?;
        self.finish_node(node, Some(status.report_status()), time)?;
        self.summary.record(status);
        Ok(())
    }

    /// Close what this process opened and, unless attached, the launch.
    ///
    /// An attached process leaves its folders open since other processes
    /// may still add to them; the launch owner closes them before the launch.
    pub fn on_test_run_finished(&mut self, time: Timestamp) -> Result<(), ReportError> {
        if self.finished {
            return Ok(());
        }
        if let Some(node) = self.scenario.take() {
            self.finish_node(node, Some(ReportStatus::Failed), time)?;
        }
        if let Some(open) = self.feature.take() {
            self.finish_node(open.node, None, time)?;
        }

        for node in self.tree.post_order(self.tree.root()) {
            let is_folder = self
                .tree
                .item(node)
                .is_some_and(|item| item.kind == ItemKind::Suite);
            if is_folder && self.options.mode.attach_to_launch {
                continue;
            }
            self.finish_node(node, None, time)?;
        }

        if !self.options.mode.attach_to_launch {
            let sent = self.clock.adjust(time);
            self.client.finish_launch(sent)?;
            info!(
                "Finished launch '{}': {} scenarios, {} failed",
                self.options.name,
                self.summary.total(),
                self.summary.failed()
            );
        }
        self.finished = true;
        Ok(())
    }

    /// Finish an open item this process created; others are left alone
    fn finish_node(
        &mut self,
        node: NodeId,
        status: Option<ReportStatus>,
        time: Timestamp,
    ) -> Result<(), ReportError> {
        let should_finish = self
            .tree
            .item(node)
            .is_some_and(|item| item.owned && !item.closed);
        if !should_finish {
            return Ok(());
        }

        let sent = self.clock.adjust(time);
        if let Some(item) = self.tree.item(node) {
            self.client.finish_item(item, status, sent)?;
        }
        if let Some(item) = self.tree.item_mut(node) {
            item.closed = true;
        }
        Ok(())
    }

    /// Leaf container new scenarios are attached to
    pub fn active_parent(&self) -> Option<NodeId> {
        self.feature.as_ref().map(|open| open.node)
    }

    pub fn active_scenario(&self) -> Option<NodeId> {
        self.scenario
    }

    pub fn tree(&self) -> &ItemTree {
        &self.tree
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn into_client(self) -> C {
        self.client
    }
}
