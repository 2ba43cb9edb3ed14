// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! # Line formatters
//!
//! Every handler owns one [`LineFormatter`] that renders a [`LogRecord`] into a single
//! line (no trailing newline). There are two base variants, and one wrapper:
//!
//! | Formatter            | Output                                          | Used for     |
//! |----------------------|-------------------------------------------------|--------------|
//! | [`ColoredFormatter`] | `<color>[<name> <LEVL>]<reset> <message>`       | console      |
//! | [`PlainFormatter`]   | `[<name> <LEVL>] <message>`                     | files        |
//! | [`WorkerTagged`]     | wraps either, message becomes `<tag> <message>` | both, opt-in |
//!
//! `<LEVL>` is [`LogLevel::code`], ie the level name truncated to 4 chars. No timestamp
//! is rendered.
//!
//! Use [`create_formatter`] to get one of the base variants. The handlers created by
//! [`crate::enable_console_output`] and [`crate::enable_file_output`] are wrapped in
//! [`WorkerTagged`], so a line logged from the main process looks like this:
//!
//! ```text
//! [kiele.io.reader INFO] (Main)  opened 3 files
//! ```
//!
//! And the same line logged from a worker named `w1`:
//!
//! ```text
//! [kiele.io.reader INFO] (w1)  opened 3 files
//! ```

use std::{fmt::{self, Debug},
          sync::Arc};

use custom_formatter_constants::{CRITICAL_FG_COLOR, DEBUG_FG_COLOR, ERROR_FG_COLOR,
                                 INFO_FG_COLOR, WARNING_FG_COLOR};

use crate::{BasicColor, LogLevel, LogRecord, SgrCode};

/// Renders a record into one line. Implementations must be stateless, since a single
/// instance is shared by reference between any number of handlers.
pub trait LineFormatter: Debug + Send + Sync {
    /// # Errors
    ///
    /// Only if the underlying [`fmt::Write`] fails.
    fn format(&self, record: &LogRecord<'_>, f: &mut dyn fmt::Write) -> fmt::Result;

    fn format_to_string(&self, record: &LogRecord<'_>) -> String {
        let mut acc = String::new();
        // Writing into a String can't fail.
        let _ = self.format(record, &mut acc);
        acc
    }
}

// Colors: <https://en.wikipedia.org/wiki/ANSI_escape_code>
#[rustfmt::skip]
pub mod custom_formatter_constants {
    use super::BasicColor;

    pub const DEBUG_FG_COLOR: BasicColor =    BasicColor::Purple;
    pub const INFO_FG_COLOR: BasicColor =     BasicColor::Cyan;
    pub const WARNING_FG_COLOR: BasicColor =  BasicColor::Yellow;
    pub const ERROR_FG_COLOR: BasicColor =    BasicColor::LightRed;
    pub const CRITICAL_FG_COLOR: BasicColor = BasicColor::Red;
}

/// Foreground color of the header for each level. [`LogLevel::Trace`] is not colored.
#[must_use]
pub fn level_color(level: LogLevel) -> Option<BasicColor> {
    match level {
        LogLevel::Trace => None,
        LogLevel::Debug => Some(DEBUG_FG_COLOR),
        LogLevel::Info => Some(INFO_FG_COLOR),
        LogLevel::Warning => Some(WARNING_FG_COLOR),
        LogLevel::Error => Some(ERROR_FG_COLOR),
        LogLevel::Critical => Some(CRITICAL_FG_COLOR),
    }
}

fn header(record: &LogRecord<'_>) -> String {
    format!("[{} {}]", record.logger_name, record.level.code())
}

/// Console formatter. The bracketed header is colored by level, the message is not.
#[derive(Debug, Default, Clone, Copy)]
pub struct ColoredFormatter;

impl LineFormatter for ColoredFormatter {
    fn format(&self, record: &LogRecord<'_>, f: &mut dyn fmt::Write) -> fmt::Result {
        let header = header(record);
        match level_color(record.level) {
            Some(color) => write!(
                f,
                "{fg}{header}{reset} {message}",
                fg = SgrCode::Foreground(color),
                reset = SgrCode::Reset,
                message = record.message
            ),
            None => write!(f, "{header} {}", record.message),
        }
    }
}

/// File formatter. Same layout as [`ColoredFormatter`], without any escape codes.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainFormatter;

impl LineFormatter for PlainFormatter {
    fn format(&self, record: &LogRecord<'_>, f: &mut dyn fmt::Write) -> fmt::Result {
        write!(f, "{} {}", header(record), record.message)
    }
}

/// Prepends [`crate::WorkerContext::tag`] and a space to the message before handing the
/// record to the inner formatter. Only handlers built with this wrapper show the worker.
#[derive(Debug, Default, Clone)]
pub struct WorkerTagged<F> {
    inner: F,
}

impl<F: LineFormatter> WorkerTagged<F> {
    pub fn new(inner: F) -> Self { Self { inner } }

    pub fn inner(&self) -> &F { &self.inner }
}

impl<F: LineFormatter> LineFormatter for WorkerTagged<F> {
    fn format(&self, record: &LogRecord<'_>, f: &mut dyn fmt::Write) -> fmt::Result {
        let tagged =
            record.with_message(format!("{} {}", record.worker.tag(), record.message));
        self.inner.format(&tagged, f)
    }
}

/// Lets an already shared formatter be wrapped, eg: `WorkerTagged::new(create_formatter(..))`.
impl LineFormatter for Arc<dyn LineFormatter> {
    fn format(&self, record: &LogRecord<'_>, f: &mut dyn fmt::Write) -> fmt::Result {
        (**self).format(record, f)
    }
}

/// Returns the colored or the plain formatter.
#[must_use]
pub fn create_formatter(colored: bool) -> Arc<dyn LineFormatter> {
    if colored {
        Arc::new(ColoredFormatter)
    } else {
        Arc::new(PlainFormatter)
    }
}

/// Same as [`create_formatter`], wrapped in [`WorkerTagged`]. This is what the output
/// control functions attach.
#[must_use]
pub fn create_worker_tagged_formatter(colored: bool) -> Arc<dyn LineFormatter> {
    if colored {
        Arc::new(WorkerTagged::new(ColoredFormatter))
    } else {
        Arc::new(WorkerTagged::new(PlainFormatter))
    }
}

#[cfg(test)]
mod tests_line_formatter {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::WorkerContext;

    fn strip(it: &str) -> String {
        String::from_utf8(strip_ansi_escapes::strip(it.as_bytes())).unwrap()
    }

    #[test]
    fn test_plain_layout() {
        let main = WorkerContext::Main;
        let record = LogRecord::new("kiele.io", LogLevel::Warning, "disk full", &main);
        let it = create_formatter(false).format_to_string(&record);
        assert_eq!(it, "[kiele.io WARN] disk full");
    }

    #[test]
    fn test_colored_wraps_only_the_header() {
        let main = WorkerContext::Main;
        let record = LogRecord::new("kiele", LogLevel::Info, "hello", &main);
        let it = create_formatter(true).format_to_string(&record);

        assert_eq!(it, "\x1b[36m[kiele INFO]\x1b[0m hello");
        assert_eq!(strip(&it), "[kiele INFO] hello");
    }

    #[test]
    fn test_colored_trace_has_no_escape_codes() {
        let main = WorkerContext::Main;
        let record = LogRecord::new("kiele", LogLevel::Trace, "x", &main);
        let it = ColoredFormatter.format_to_string(&record);
        assert_eq!(it, "[kiele TRAC] x");
    }

    #[test]
    fn test_each_level_gets_a_distinct_color() {
        let colors = [
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warning,
            LogLevel::Error,
            LogLevel::Critical,
        ]
        .map(|level| level_color(level).unwrap());
        for (i, lhs) in colors.iter().enumerate() {
            for rhs in &colors[i + 1..] {
                assert_ne!(lhs, rhs);
            }
        }
    }

    #[test]
    fn test_worker_tag_main_and_named() {
        let main = WorkerContext::Main;
        let w1 = WorkerContext::named("w1");
        let formatter = create_worker_tagged_formatter(false);

        let it = formatter.format_to_string(&LogRecord::new(
            "kiele",
            LogLevel::Info,
            "hello",
            &main,
        ));
        assert_eq!(it, "[kiele INFO] (Main)  hello");

        let it = formatter.format_to_string(&LogRecord::new(
            "kiele",
            LogLevel::Info,
            "hello",
            &w1,
        ));
        assert_eq!(it, "[kiele INFO] (w1)  hello");
    }

    #[test]
    fn test_worker_tag_colored() {
        let w1 = WorkerContext::Indexed(2);
        let formatter = WorkerTagged::new(create_formatter(true));
        let it = formatter.format_to_string(&LogRecord::new(
            "kiele.a",
            LogLevel::Error,
            "boom",
            &w1,
        ));
        assert_eq!(strip(&it), "[kiele.a ERRO] (Sub2)  boom");
    }
}
