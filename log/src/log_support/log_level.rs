// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt::{self, Display, Formatter},
          str::FromStr};

use crate::LogConfigError;

/// Severity of a record, and the threshold of a [`crate::Logger`].
///
/// Ordering follows severity: `Trace < Debug < Info < Warning < Error < Critical`. A
/// logger emits a record when `record.level >= logger.effective_level()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// Level used when neither a logger nor any of its ancestors has a level set.
    pub const FALLBACK: LogLevel = LogLevel::Warning;

    /// Full upper case name, eg: `WARNING`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        }
    }

    /// The name truncated to at most 4 chars. This is what goes in the line header.
    #[must_use]
    pub fn code(self) -> &'static str {
        let name = self.name();
        &name[..name.len().min(4)]
    }

    const fn to_u8(self) -> u8 {
        match self {
            LogLevel::Trace => 1,
            LogLevel::Debug => 2,
            LogLevel::Info => 3,
            LogLevel::Warning => 4,
            LogLevel::Error => 5,
            LogLevel::Critical => 6,
        }
    }

    const fn from_u8(value: u8) -> Option<LogLevel> {
        match value {
            1 => Some(LogLevel::Trace),
            2 => Some(LogLevel::Debug),
            3 => Some(LogLevel::Info),
            4 => Some(LogLevel::Warning),
            5 => Some(LogLevel::Error),
            6 => Some(LogLevel::Critical),
            _ => None,
        }
    }
}

/// Encode an optional level into a `u8` so it can live in an atomic. `0` is "not set".
pub(crate) mod level_slot {
    use super::LogLevel;

    pub const NOT_SET: u8 = 0;

    pub fn encode(level: Option<LogLevel>) -> u8 { level.map_or(NOT_SET, LogLevel::to_u8) }

    pub fn decode(value: u8) -> Option<LogLevel> { LogLevel::from_u8(value) }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl FromStr for LogLevel {
    type Err = LogConfigError;

    /// Case insensitive. Accepts the full names plus the common short forms `warn` and
    /// `err`.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warning" | "warn" => Ok(LogLevel::Warning),
            "error" | "err" => Ok(LogLevel::Error),
            "critical" | "crit" => Ok(LogLevel::Critical),
            _ => Err(LogConfigError::UnknownLevel {
                input: input.to_string(),
            }),
        }
    }
}

/// `tracing` has no critical level, so nothing maps onto [`LogLevel::Critical`].
impl From<tracing::Level> for LogLevel {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => LogLevel::Trace,
            tracing::Level::DEBUG => LogLevel::Debug,
            tracing::Level::INFO => LogLevel::Info,
            tracing::Level::WARN => LogLevel::Warning,
            _ => LogLevel::Error,
        }
    }
}

impl From<LogLevel> for tracing_core::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing_core::LevelFilter::TRACE,
            LogLevel::Debug => tracing_core::LevelFilter::DEBUG,
            LogLevel::Info => tracing_core::LevelFilter::INFO,
            LogLevel::Warning => tracing_core::LevelFilter::WARN,
            LogLevel::Error | LogLevel::Critical => tracing_core::LevelFilter::ERROR,
        }
    }
}
