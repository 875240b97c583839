use chrono::Local;
use nu_ansi_term::{Color, Style};
use std::fmt;
use tracing::{Event, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields},
    prelude::*,
    registry::LookupSpan,
    Layer,
};

/// Target used for user-facing script results; always shown on the console.
pub const RESULT_TARGET: &str = "script_result";

pub fn setup_logger() -> Option<WorkerGuard> {
    std::fs::create_dir_all("logs").ok();

    let file_appender = tracing_appender::rolling::hourly("logs", "app");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // File layer: INFO for our crates, WARN for dependencies
    let file_filter = tracing_subscriber::filter::Targets::new()
        .with_target(RESULT_TARGET, tracing::Level::INFO)
        .with_target("core_logic", tracing::Level::INFO)
        .with_target("gym_token", tracing::Level::INFO)
        .with_default(tracing::Level::WARN);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .event_format(LineFormatter::File)
        .with_filter(file_filter);

    // Console layer: results plus warnings; script reports go through stdout directly
    let console_filter = tracing_subscriber::filter::Targets::new()
        .with_target(RESULT_TARGET, tracing::Level::INFO)
        .with_default(tracing::Level::WARN);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .event_format(LineFormatter::Terminal)
        .with_filter(console_filter);

    // A second install (tests, repeated bootstrap) is a no-op
    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .ok()?;

    Some(guard)
}

// --- Formatters ---

fn message_of(event: &Event<'_>) -> String {
    struct MessageVisitor(String);

    impl tracing::field::Visit for MessageVisitor {
        fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
            if field.name() == "message" {
                self.0 = format!("{:?}", value);
            }
        }
        fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
            if field.name() == "message" {
                self.0 = value.to_string();
            }
        }
    }

    let mut visitor = MessageVisitor(String::new());
    event.record(&mut visitor);
    visitor.0
}

/// Highlights SUCCESS/FAILED markers and warnings for the console.
fn highlight(msg: String, level: &tracing::Level) -> String {
    let green = Style::new().fg(Color::LightGreen).bold();
    let red = Style::new().fg(Color::LightRed).bold();
    if msg.contains("SUCCESS") {
        msg.replace("SUCCESS", &green.paint("SUCCESS").to_string())
    } else if msg.contains("FAILED") {
        msg.replace("FAILED", &red.paint("FAILED").to_string())
    } else if *level == tracing::Level::WARN {
        Color::Yellow.paint(msg).to_string()
    } else {
        msg
    }
}

/// Plain coloured lines on the console, `timestamp [LEVEL] target:` prefixed lines in files.
pub enum LineFormatter {
    Terminal,
    File,
}

impl<S, N> FormatEvent<S, N> for LineFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        let msg = message_of(event);
        match self {
            LineFormatter::Terminal => writeln!(writer, "{}", highlight(msg, meta.level())),
            LineFormatter::File => writeln!(
                writer,
                "{} [{}] {}: {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                meta.level(),
                meta.target(),
                msg
            ),
        }
    }
}
