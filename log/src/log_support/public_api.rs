// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Free functions that operate on the [`global_registry`]. They are the same as the
//! methods of [`LoggerRegistry`] with the same name, and exist so that an app that is
//! happy with a single logger hierarchy doesn't need to pass a registry around.
//!
//! ```no_run
//! use kiele_log::{LogLevel, enable_file_output, get_module_logger, get_root_logger};
//!
//! let root = get_root_logger();
//! root.info("console output is on");
//!
//! let logger = get_module_logger(concat!(env!("CARGO_MANIFEST_DIR"), "/src/lib.rs"))
//!     .unwrap();
//! let name = enable_file_output(Some(&logger), None, LogLevel::Debug).unwrap();
//! logger.debug(format!("also written by {name}"));
//! ```

use std::{path::Path, sync::Arc};

use crate::{LogConfigResult, LogLevel, Logger, global_registry};

/// The library root logger of the global registry, see
/// [`LoggerRegistry::get_root_logger`](crate::LoggerRegistry::get_root_logger).
#[must_use]
pub fn get_root_logger() -> Arc<Logger> { global_registry().get_root_logger() }

/// # Errors
///
/// Returns [`crate::LogConfigError::PathResolution`] if the path isn't under the library
/// root of the global registry.
pub fn get_module_logger(module_path: impl AsRef<Path>) -> LogConfigResult<Arc<Logger>> {
    global_registry().get_module_logger(module_path)
}

#[must_use]
pub fn get_logger(name: &str) -> Arc<Logger> { global_registry().get_logger(name) }

pub fn enable_console_output(logger: Option<&Arc<Logger>>, level: LogLevel) {
    global_registry().enable_console_output(logger, level);
}

pub fn disable_console_output(logger: Option<&Arc<Logger>>) -> bool {
    global_registry().disable_console_output(logger)
}

/// # Errors
///
/// Returns [`crate::LogConfigError::FileOpen`] if the file can't be opened.
pub fn enable_file_output(
    logger: Option<&Arc<Logger>>,
    filepath: Option<&Path>,
    level: LogLevel,
) -> LogConfigResult<String> {
    global_registry().enable_file_output(logger, filepath, level)
}

pub fn disable_file_output(logger: Option<&Arc<Logger>>, filepath: Option<&Path>) -> usize {
    global_registry().disable_file_output(logger, filepath)
}

pub fn disable_all_output(logger: Option<&Arc<Logger>>) {
    global_registry().disable_all_output(logger);
}

/// The logger of the calling module in the global registry, named after
/// `module_path!()`.
///
/// ```
/// let logger = kiele_log::module_logger!();
/// assert_eq!(logger.name(), "kiele");
/// ```
#[macro_export]
macro_rules! module_logger {
    () => {
        $crate::global_registry().get_logger_for_module_path(module_path!())
    };
}


/// Runs the `kiele_log_demo` binary, since `stdout` and `stderr` can't be captured from
/// inside the test process.
#[cfg(test)]
mod test_kiele_log_demo_stdio {
    use assert_cmd::Command;

    fn run(args: &[&str]) -> (String, String) {
        let output = Command::cargo_bin("kiele_log_demo")
            .unwrap()
            .args(args)
            .ok()
            .unwrap();
        let plain = |bytes: &[u8]| {
            String::from_utf8_lossy(&strip_ansi_escapes::strip(bytes)).into_owned()
        };
        (plain(&output.stdout), plain(&output.stderr))
    }

    #[test]
    fn stdout() {
        let dir = tempfile::tempdir().unwrap();
        let log_file = dir.path().join("test-module-log.log");
        let (stdout, stderr) = run(&["stdout", log_file.to_str().unwrap()]);

        for it in [
            "[kiele INFO] (Main)  This is root logger's info.",
            "[kiele.bin.kiele_log_demo INFO] (Main)  This is module logger's info.",
            "[kiele.bin.kiele_log_demo DEBU] (Main)  debugging...",
            "[kiele.bin.kiele_log_demo INFO] (Main)  debug is finished.",
            "[kiele ERRO] (Main)  This is root logger's error.",
        ] {
            assert!(stdout.contains(it), "missing {it:?} in {stdout:?}");
        }
        assert!(stderr.is_empty());

        // Only the debug line was logged while the file was attached.
        assert_eq!(
            std::fs::read_to_string(&log_file).unwrap(),
            "[kiele.bin.kiele_log_demo DEBU] (Main)  debugging...\n"
        );
    }

    #[test]
    fn stderr() {
        let dir = tempfile::tempdir().unwrap();
        let log_file = dir.path().join("stderr.log");
        let (stdout, stderr) = run(&["stderr", log_file.to_str().unwrap()]);
        assert!(stdout.is_empty());
        assert!(stderr.contains("[kiele INFO] (Main)  This is root logger's info."));
    }

    #[test]
    fn worker() {
        let (stdout, _) = run(&["worker"]);
        for index in 1..=3 {
            let it = format!("[kiele.bin.kiele_log_demo INFO] (w{index})  working...");
            assert!(stdout.contains(&it), "missing {it:?} in {stdout:?}");
        }
    }

    #[test]
    fn tracing() {
        let (stdout, _) = run(&["tracing"]);
        assert!(stdout.contains("[kiele.tracing INFO] (Main)  from the tracing macros"));
        assert!(stdout.contains("[kiele.tracing WARN] (w1)  from a worker"));
    }

    #[test]
    fn silent() {
        let dir = tempfile::tempdir().unwrap();
        let log_file = dir.path().join("silent.log");
        let (stdout, stderr) = run(&["silent", log_file.to_str().unwrap()]);
        assert!(stdout.is_empty());
        assert!(stderr.is_empty());
    }
}
