use chrono::Local;
use tracing::{Event, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Single-line stderr format: `LEVEL [HH:MM:SS.mmm] pid=<pid>: message`.
///
/// The pid tells apart the workers that report into one launch.
pub struct ProcessFormatter {
    pid: u32,
}

impl Default for ProcessFormatter {
    fn default() -> Self {
        Self {
            pid: std::process::id(),
        }
    }
}

impl<S, N> FormatEvent<S, N> for ProcessFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let level = match *event.metadata().level() {
            tracing::Level::TRACE => "TRACE",
            tracing::Level::DEBUG => "DEBUG",
            tracing::Level::INFO => "INFO ",
            tracing::Level::WARN => "WARN ",
            tracing::Level::ERROR => "ERROR",
        };
        let timestamp = Local::now().format("%H:%M:%S%.3f");

        write!(writer, "{} [{}] pid={}: ", level, timestamp, self.pid)?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Install the stderr subscriber; `RUST_LOG` wins over `verbose`
pub fn init(verbose: bool) {
    let filter = if verbose {
        "cukeportal=debug,warn"
    } else {
        "cukeportal=warn,error"
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .event_format(ProcessFormatter::default())
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();
}
