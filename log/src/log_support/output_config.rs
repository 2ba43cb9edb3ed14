// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{ops::Add,
          path::{Path, PathBuf}};

use crate::{ColorChoice, DisplayPreference, LogConfigResult, LogLevel, Logger};

/// Describes the output of one [`Logger`]: where lines go, at which level, and whether
/// the console is colored. Apply it with [`OutputConfig::apply_to`].
///
/// Fields:
/// - `level`: [`LogLevel`] set on the logger. `None` means [`LogLevel::default`].
/// - `writer_config`: [`WriterConfig`] to choose where to write the lines.
/// - `color_choice`: [`ColorChoice`] for the console handler, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputConfig {
    pub level: Option<LogLevel>,
    pub writer_config: WriterConfig,
    pub color_choice: Option<ColorChoice>,
}

/// - `DisplayPreference`: [`DisplayPreference`] is where the console handler writes.
/// - `PathBuf`: the file that the file handler appends to.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum WriterConfig {
    #[default]
    None,
    Display(DisplayPreference /* Stdout, Stderr, SharedBuffer(SharedBuffer) */),
    File(PathBuf /* log file path */),
    DisplayAndFile(DisplayPreference, PathBuf /* log file path */),
}

impl OutputConfig {
    #[must_use]
    pub fn get_level(&self) -> LogLevel { self.level.unwrap_or_default() }

    #[must_use]
    pub fn get_display_preference(&self) -> Option<&DisplayPreference> {
        match &self.writer_config {
            WriterConfig::Display(it) | WriterConfig::DisplayAndFile(it, _) => Some(it),
            WriterConfig::None | WriterConfig::File(_) => None,
        }
    }

    #[must_use]
    pub fn get_file_path(&self) -> Option<&Path> {
        match &self.writer_config {
            WriterConfig::File(it) | WriterConfig::DisplayAndFile(_, it) => Some(it),
            WriterConfig::None | WriterConfig::Display(_) => None,
        }
    }

    /// Attach the handlers described by this config to `logger`, and set its level.
    /// Handlers that are already attached are kept, see [`crate::output_control`].
    ///
    /// Returns the name of the file handler, if this config has a file.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LogConfigError::FileOpen`] if the file can't be opened. The
    /// console handler may already be attached at that point.
    pub fn apply_to(&self, logger: &Logger) -> LogConfigResult<Option<String>> {
        let level = self.get_level();
        if let Some(display_preference) = self.get_display_preference() {
            logger.enable_console_output_with(
                display_preference.clone(),
                self.color_choice.unwrap_or_default(),
                level,
            );
        }
        let file_handler_name = match self.get_file_path() {
            Some(path) => Some(logger.enable_file_output(Some(path), level)?),
            None => None,
        };
        if matches!(self.writer_config, WriterConfig::None) {
            logger.set_level(level);
        }
        Ok(file_handler_name)
    }
}

/// Instead of lots of arguments, [`OutputConfig`] can be built from anything that
/// converts into it, and the pieces composed with `+`. Here are some examples:
///
/// ```
/// use kiele_log::{ColorChoice, DisplayPreference, LogLevel, OutputConfig, WriterConfig};
///
/// let config_1: OutputConfig = LogLevel::Debug.into();
/// let config_2: OutputConfig = DisplayPreference::Stderr.into();
/// let config_3: OutputConfig = WriterConfig::File("kiele.log".into()).into();
/// let config_4: OutputConfig = ColorChoice::Never.into();
///
/// let config_compose = config_1 + config_2 + config_3 + config_4;
/// assert_eq!(config_compose.get_level(), LogLevel::Debug);
/// assert!(config_compose.get_file_path().is_some());
/// ```
pub mod output_config_options {
    use super::*;

    impl From<LogLevel> for OutputConfig {
        fn from(level: LogLevel) -> Self {
            Self {
                level: Some(level),
                ..Default::default()
            }
        }
    }

    impl From<tracing::Level> for OutputConfig {
        fn from(level: tracing::Level) -> Self { LogLevel::from(level).into() }
    }

    impl From<DisplayPreference> for OutputConfig {
        fn from(preferred_display: DisplayPreference) -> Self {
            WriterConfig::Display(preferred_display).into()
        }
    }

    impl From<WriterConfig> for OutputConfig {
        fn from(writer_config: WriterConfig) -> Self {
            Self {
                writer_config,
                ..Default::default()
            }
        }
    }

    impl From<ColorChoice> for OutputConfig {
        fn from(color_choice: ColorChoice) -> Self {
            Self {
                color_choice: Some(color_choice),
                ..Default::default()
            }
        }
    }

    /// Merge two [`OutputConfig`] instances together. Each field of `rhs` that is set
    /// clobbers the one in `self`.
    impl Add<OutputConfig> for OutputConfig {
        type Output = Self;

        fn add(self, rhs: Self) -> Self::Output {
            Self {
                level: rhs.level.or(self.level),
                writer_config: self.writer_config + rhs.writer_config,
                color_choice: rhs.color_choice.or(self.color_choice),
            }
        }
    }

    /// Merge two [`WriterConfig`] instances together. The `rhs` will clobber the `self`
    /// if it has a "some" value. That is, the value in `rhs` has higher specificity.
    ///
    /// Here are some examples:
    /// - `{a: "foo"} + {a: "bar"} = {a: "bar"}`.
    /// - `{a: None } + {a: "bar"} = {a: "bar"}`.
    /// - `{a: "foo"} + {a: None } = {a: "foo"}`.
    impl Add<WriterConfig> for WriterConfig {
        type Output = Self;

        fn add(self, rhs: WriterConfig) -> Self::Output {
            use WriterConfig::{Display, DisplayAndFile, File, None};

            match (self, rhs) {
                // No collision merge.
                (None, wc_rhs) => wc_rhs,
                (wc_lhs, None) => wc_lhs,
                (Display(dp_lhs), File(f_rhs)) => DisplayAndFile(dp_lhs, f_rhs),
                (File(f_lhs), Display(dp_rhs)) => DisplayAndFile(dp_rhs, f_lhs),

                // Collision (rhs has higher specificity).
                (Display(_), Display(dp_rhs)) => Display(dp_rhs),
                (File(_), File(f_rhs)) => File(f_rhs),
                (Display(_) | File(_) | DisplayAndFile(..), DisplayAndFile(dp_rhs, f_rhs)) => {
                    DisplayAndFile(dp_rhs, f_rhs)
                }
                (DisplayAndFile(_, f_lhs), Display(dp_rhs)) => DisplayAndFile(dp_rhs, f_lhs),
                (DisplayAndFile(dp_lhs, _), File(f_rhs)) => DisplayAndFile(dp_lhs, f_rhs),
            }
        }
    }
}
