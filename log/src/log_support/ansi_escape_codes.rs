// Copyright (c) 2023-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! More info:
//! - <https://doc.rust-lang.org/reference/tokens.html#ascii-escapes>
//! - <https://notes.burke.libbey.me/ansi-escape-codes/>

use std::fmt::{Display, Formatter, Result};

pub const CSI: &str = "\x1b[";
pub const SGR: &str = "m";

/// The subset of the 16 basic terminal colors that log headers use.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BasicColor {
    Red,
    Yellow,
    Purple,
    Cyan,
    LightRed,
}

impl BasicColor {
    /// SGR parameter for this color as a foreground.
    #[must_use]
    pub const fn fg_code(self) -> u8 {
        match self {
            BasicColor::Red => 31,
            BasicColor::Yellow => 33,
            BasicColor::Purple => 35,
            BasicColor::Cyan => 36,
            BasicColor::LightRed => 91,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SgrCode {
    Reset,
    Foreground(BasicColor),
}

impl Display for SgrCode {
    /// SGR: set graphics mode command.
    /// More info:
    /// - <https://en.wikipedia.org/wiki/ANSI_escape_code>
    #[rustfmt::skip]
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match *self {
            SgrCode::Reset             => write!(f, "{CSI}0{SGR}"),
            SgrCode::Foreground(color) => write!(f, "{CSI}{}{SGR}", color.fg_code()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn reset() {
        assert_eq!(SgrCode::Reset.to_string(), "\x1b[0m");
    }

    #[test]
    fn fg_purple() {
        assert_eq!(SgrCode::Foreground(BasicColor::Purple).to_string(), "\x1b[35m");
    }

    #[test]
    fn fg_light_red() {
        assert_eq!(SgrCode::Foreground(BasicColor::LightRed).to_string(), "\x1b[91m");
    }
}
