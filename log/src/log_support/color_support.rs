// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{env, io};

use crossterm::tty::IsTty;

use crate::DisplayPreference;

/// Whether a console handler colors its output.
///
/// [`crate::Logger::enable_console_output`] always colors, and doesn't look at the
/// environment at all. Use [`ColorChoice::Auto`] with
/// [`crate::Logger::enable_console_output_with`] to honor `NO_COLOR` and `TERM=dumb`, and
/// to skip colors when the output isn't a terminal.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ColorChoice {
    #[default]
    Always,
    Never,
    Auto,
}

impl ColorChoice {
    /// Resolve the choice for a handler writing to `display_preference`.
    ///
    /// [`DisplayPreference::SharedBuffer`] is never a terminal, so [`ColorChoice::Auto`]
    /// resolves to no color for it.
    #[must_use]
    pub fn is_colored(self, display_preference: &DisplayPreference) -> bool {
        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                !(env_no_color() || env_term_is_dumb()) && is_a_tty(display_preference)
            }
        }
    }
}

fn is_a_tty(display_preference: &DisplayPreference) -> bool {
    match display_preference {
        DisplayPreference::Stdout => io::stdout().is_tty(),
        DisplayPreference::Stderr => io::stderr().is_tty(),
        DisplayPreference::SharedBuffer(_) => false,
    }
}

/// <https://no-color.org/>: any non empty value disables color.
fn env_no_color() -> bool { env::var_os("NO_COLOR").is_some_and(|it| !it.is_empty()) }

fn env_term_is_dumb() -> bool { env::var("TERM").is_ok_and(|it| it == "dumb") }
