//! Tracing subscriber setup: console formatter, file layer, and initialisation.
use std::fs;
use std::io::Write as _;
use std::sync::Mutex;

use tracing::Level;
use tracing::span::{Attributes, Id};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

use super::utils::{HEADER_TIME, LINE_TIME, log_file_path, strip_ansi, utc_now};

/// Tracing target for stage headers.
pub(super) const STAGE_TARGET: &str = "icon::stage";
/// Tracing target for dry-run actions.
pub(super) const DRY_RUN_TARGET: &str = "icon::dry_run";
/// Name of the span wrapping one profile's run.
pub(super) const PROFILE_SPAN: &str = "profile";

/// Captures the value of one named field.
struct FieldText {
    field: &'static str,
    value: Option<String>,
}

impl FieldText {
    const fn new(field: &'static str) -> Self {
        Self { field, value: None }
    }
}

impl tracing::field::Visit for FieldText {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == self.field {
            self.value = Some(format!("{value:?}"));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == self.field {
            self.value = Some(value.to_string());
        }
    }
}

fn message(event: &tracing::Event<'_>) -> String {
    let mut text = FieldText::new("message");
    event.record(&mut text);
    text.value.unwrap_or_default()
}

/// Profile name attached to a [`PROFILE_SPAN`] span.
struct ProfileTag(String);

/// Name of the innermost profile span enclosing `event`, if any.
fn enclosing_profile<S>(event: &tracing::Event<'_>, ctx: &Context<'_, S>) -> Option<String>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    ctx.event_scope(event)?
        .find_map(|span| span.extensions().get::<ProfileTag>().map(|t| t.0.clone()))
}

/// One log-file line, without the trailing newline.
fn file_line(time: &str, level: Level, target: &str, profile: Option<&str>, msg: &str) -> String {
    let tag = match (level, target) {
        (Level::INFO, STAGE_TARGET) => "==> ",
        (Level::INFO, DRY_RUN_TARGET) => "[dry run] ",
        (Level::ERROR, _) => "[error] ",
        (Level::WARN, _) => "[warn] ",
        (Level::DEBUG | Level::TRACE, _) => "[debug] ",
        _ => "",
    };
    let scope = profile.map_or_else(String::new, |p| format!("{p}: "));
    format!("[{time}] {tag}{scope}{msg}")
}

/// One console line, without the trailing newline.
fn console_line(level: Level, target: &str, msg: &str) -> String {
    match (level, target) {
        (Level::ERROR, _) => format!("\x1b[31merror:\x1b[0m {msg}"),
        (Level::WARN, _) => format!("\x1b[33mwarning:\x1b[0m {msg}"),
        (Level::INFO, STAGE_TARGET) => format!("\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m"),
        (Level::INFO, DRY_RUN_TARGET) => format!("  \x1b[33m[DRY RUN]\x1b[0m {msg}"),
        (Level::INFO, _) => format!("  {msg}"),
        _ => format!("  \x1b[2m{msg}\x1b[0m"),
    }
}

/// A [`tracing_subscriber::Layer`] that appends every event to the run's log
/// file, timestamped, tagged with the enclosing profile, ANSI codes stripped.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Truncate the log file for `command`, write a run header, and return a
    /// layer appending to it.
    ///
    /// Returns `None` if the cache directory or the file cannot be opened.
    pub(super) fn new(command: &str) -> Option<Self> {
        let path = log_file_path(command)?;
        let header = format!(
            "# icon {} {command} started {} UTC\n",
            crate::VERSION,
            utc_now(HEADER_TIME),
        );
        fs::write(&path, header).ok()?;
        let file = fs::OpenOptions::new().append(true).open(&path).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S> tracing_subscriber::Layer<S> for FileLayer
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        if attrs.metadata().name() != PROFILE_SPAN {
            return;
        }
        let mut name = FieldText::new("name");
        attrs.record(&mut name);
        if let (Some(span), Some(value)) = (ctx.span(id), name.value) {
            span.extensions_mut().insert(ProfileTag(value));
        }
    }

    fn on_event(&self, event: &tracing::Event<'_>, ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let profile = enclosing_profile(event, &ctx);
        let line = file_line(
            &utc_now(LINE_TIME),
            *metadata.level(),
            metadata.target(),
            profile.as_deref(),
            &strip_ansi(&message(event)),
        );

        if let Ok(mut f) = self.file.lock() {
            writeln!(f, "{line}").ok();
        }
    }
}

/// A [`tracing_subscriber::fmt::FormatEvent`] that emits the converter's
/// console style.
struct ConsoleFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormatter
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        writeln!(
            writer,
            "{}",
            console_line(*metadata.level(), metadata.target(), &message(event))
        )
    }
}

/// Initialise the global [`tracing`] subscriber.
///
/// Warnings and errors go to stderr, everything else to stdout; `debug`
/// reaches the console only when `verbose`.  The file layer always records
/// `debug` and above in `$XDG_CACHE_HOME/icon-converter/<command>.log`.
/// Must be called once at program startup, before any logging.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let make_writer = std::io::stderr
        .with_max_level(Level::WARN)
        .and(std::io::stdout.with_min_level(Level::INFO));

    let console_layer = fmt::layer()
        .event_format(ConsoleFormatter)
        .with_writer(make_writer)
        .with_filter(console_level);

    let file_layer = FileLayer::new(command).map(|l| l.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}
