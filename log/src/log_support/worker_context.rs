// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::fmt::{self, Display, Formatter};

/// Identity of whoever emitted a record: the main process, or a worker in a task pool.
///
/// There is no ambient lookup of "which worker am I". The context is bound explicitly,
/// either with [`crate::Logger::for_worker`], per call with [`crate::Logger::log_as`],
/// or with a `worker = "..."` field on a `tracing` event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum WorkerContext {
    #[default]
    Main,
    /// Worker with a human readable name, eg: a local pool worker.
    Named(String),
    /// Worker that only has a numeric index.
    Indexed(u64),
}

impl WorkerContext {
    pub fn named(name: impl Into<String>) -> Self { WorkerContext::Named(name.into()) }

    #[must_use]
    pub fn is_main(&self) -> bool { matches!(self, WorkerContext::Main) }

    /// The prefix that [`crate::WorkerTagged`] puts in front of the message, trailing
    /// space included.
    #[must_use]
    pub fn tag(&self) -> String { format!("{self} ") }
}

impl Display for WorkerContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            WorkerContext::Main => f.write_str("(Main)"),
            WorkerContext::Named(name) => write!(f, "({name})"),
            WorkerContext::Indexed(index) => write!(f, "(Sub{index})"),
        }
    }
}

impl From<&str> for WorkerContext {
    fn from(name: &str) -> Self { WorkerContext::named(name) }
}

impl From<String> for WorkerContext {
    fn from(name: String) -> Self { WorkerContext::Named(name) }
}

impl From<u64> for WorkerContext {
    fn from(index: u64) -> Self { WorkerContext::Indexed(index) }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_tags() {
        assert_eq!(WorkerContext::Main.tag(), "(Main) ");
        assert_eq!(WorkerContext::named("w1").tag(), "(w1) ");
        assert_eq!(WorkerContext::from(3_u64).tag(), "(Sub3) ");
    }

    #[test]
    fn test_default_is_main() {
        assert!(WorkerContext::default().is_main());
        assert!(!WorkerContext::from("w1").is_main());
    }
}
