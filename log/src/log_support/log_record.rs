// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::borrow::Cow;

use crate::{LogLevel, WorkerContext};

/// One emitted log line before formatting. Handlers receive it by reference, and
/// formatters that need to rewrite the message (like [`crate::WorkerTagged`]) make a
/// copy with [`LogRecord::with_message`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord<'a> {
    /// Dotted name of the logger the record was logged on, not the logger whose handler
    /// is formatting it.
    pub logger_name: &'a str,
    pub level: LogLevel,
    pub message: Cow<'a, str>,
    pub worker: &'a WorkerContext,
}

impl<'a> LogRecord<'a> {
    pub fn new(
        logger_name: &'a str,
        level: LogLevel,
        message: impl Into<Cow<'a, str>>,
        worker: &'a WorkerContext,
    ) -> Self {
        Self {
            logger_name,
            level,
            message: message.into(),
            worker,
        }
    }

    #[must_use]
    pub fn with_message(&self, message: String) -> LogRecord<'a> {
        LogRecord {
            logger_name: self.logger_name,
            level: self.level,
            message: Cow::Owned(message),
            worker: self.worker,
        }
    }
}
