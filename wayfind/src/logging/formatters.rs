//! Custom formatters for the logging system.

use std::fmt;
use time::OffsetDateTime;
use time::macros::format_description;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, format};
use tracing_subscriber::registry::LookupSpan;

/// Single-line formatter for development: local time, level, target,
/// span names, then the event fields.
#[derive(Debug, Clone, Copy)]
pub struct DevelopmentFormatter {
    ansi: bool,
}

impl DevelopmentFormatter {
    pub fn new(ansi: bool) -> Self {
        Self { ansi }
    }

    fn level_label(&self, level: tracing::Level) -> &'static str {
        match (self.ansi, level) {
            (true, tracing::Level::TRACE) => "\x1b[36mTRACE\x1b[0m",
            (true, tracing::Level::DEBUG) => "\x1b[34mDEBUG\x1b[0m",
            (true, tracing::Level::INFO) => "\x1b[32mINFO \x1b[0m",
            (true, tracing::Level::WARN) => "\x1b[33mWARN \x1b[0m",
            (true, tracing::Level::ERROR) => "\x1b[31mERROR\x1b[0m",
            (false, tracing::Level::TRACE) => "TRACE",
            (false, tracing::Level::DEBUG) => "DEBUG",
            (false, tracing::Level::INFO) => "INFO ",
            (false, tracing::Level::WARN) => "WARN ",
            (false, tracing::Level::ERROR) => "ERROR",
        }
    }
}

impl Default for DevelopmentFormatter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl<S, N> FormatEvent<S, N> for DevelopmentFormatter
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> fmt::Result {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        let time = now
            .format(format_description!(
                "[hour]:[minute]:[second].[subsecond digits:3]"
            ))
            .unwrap_or_default();

        let metadata = event.metadata();
        write!(
            writer,
            "{} {} [{}] ",
            time,
            self.level_label(*metadata.level()),
            metadata.target()
        )?;

        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                write!(writer, "{}: ", span.name())?;
            }
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}
