// Replay command - drive the formatter from a recorded event stream

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::{info, warn};

use crate::cli::args::ReplayArgs;
use crate::client::{JsonLinesClient, MemoryClient, ReportClient};
use crate::config::Config;
use crate::events::Event;
use crate::report::{Formatter, LaunchOptions};
use crate::state::RunSummary;

/// Feed every event of `reader` to a formatter built on `client`.
///
/// A stream that stops without `test_run_finished` is closed as if the
/// event had arrived at the client's current time.
pub fn replay_events<C, R>(client: C, options: LaunchOptions, reader: R) -> Result<(RunSummary, C)>
where
    C: ReportClient,
    R: BufRead,
{
    let mut formatter = Formatter::start(client, options).context("Failed to start launch")?;

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("Failed to read event line {}", line_no))?;
        if line.trim().is_empty() {
            continue;
        }
        let event: Event = serde_json::from_str(&line)
            .with_context(|| format!("Invalid event on line {}", line_no))?;
        formatter
            .handle(&event)
            .with_context(|| format!("Failed to report {} (line {})", event.name(), line_no))?;
    }

    if !formatter.is_finished() {
        warn!("Event stream ended without test_run_finished, closing the run");
        let now = formatter.client().now();
        formatter.on_test_run_finished(now)?;
    }

    let summary = formatter.summary().clone();
    Ok((summary, formatter.into_client()))
}

fn open_events(path: &Path) -> Result<Box<dyn BufRead>> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = File::open(path)
        .with_context(|| format!("Failed to open event stream {}", path.display()))?;
    Ok(Box::new(BufReader::new(file)))
}

fn launch_options(args: &ReplayArgs, config: &Config) -> LaunchOptions {
    let mut options = config.launch_options();
    if let Some(name) = &args.launch_name {
        options.name = name.clone();
    }
    options.mode.parallel |= args.parallel;
    options.mode.attach_to_launch |= args.attach;
    options
}

pub fn handle_replay(args: &ReplayArgs, config: Option<Config>) -> Result<RunSummary> {
    let config = config.unwrap_or_default().with_env();
    let options = launch_options(args, &config);
    let reader = open_events(&args.events)?;

    let summary = if args.dry_run {
        let (summary, client) = replay_events(MemoryClient::new(), options, reader)?;
        println!(
            "Dry run: {} items started, {} remote calls",
            client.started_items().len(),
            client.calls().len()
        );
        summary
    } else {
        let index = args.index.clone().or_else(|| config.index_path());
        match args.output.clone().or_else(|| config.output_path()) {
            Some(path) => {
                let mut client = JsonLinesClient::open(&path)
                    .with_context(|| format!("Failed to open launch file {}", path.display()))?;
                load_index(&mut client, index.as_deref())?;
                info!("Writing launch to {}", path.display());
                replay_events(client, options, reader)?.0
            }
            None => {
                let mut client = JsonLinesClient::new(io::stdout());
                load_index(&mut client, index.as_deref())?;
                replay_events(client, options, reader)?.0
            }
        }
    };

    eprintln!(
        "{} scenarios ({} passed, {} failed, {} skipped) in {} features",
        summary.total(),
        summary.passed(),
        summary.failed(),
        summary.skipped(),
        summary.features()
    );
    Ok(summary)
}

fn load_index<W: io::Write>(client: &mut JsonLinesClient<W>, index: Option<&Path>) -> Result<()> {
    if let Some(path) = index {
        let file = File::open(path)
            .with_context(|| format!("Failed to open launch index {}", path.display()))?;
        client.load_index(BufReader::new(file))?;
    }
    Ok(())
}
