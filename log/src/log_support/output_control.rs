// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! # Output control
//!
//! Attach and detach the standard handlers of a [`Logger`]. A logger holds at most one
//! handler per name (see [`crate::handler_names`]), and every check-then-attach runs
//! under the logger's handler lock. So all of these are idempotent, and safe to call
//! from many threads at once.
//!
//! | Operation                        | Handler                      | Formatter            |
//! |----------------------------------|------------------------------|----------------------|
//! | [`Logger::enable_console_output`] | `stdout-handler`            | colored, worker tag  |
//! | [`Logger::enable_file_output`]    | `filehandler-<basename>`    | plain, worker tag    |
//! | [`Logger::disable_all_output`]    | `null-handler` (only)       | none                 |
//!
//! The same operations exist on [`LoggerRegistry`], taking an `Option<&Arc<Logger>>`,
//! where `None` is the library root logger. And as free functions on the global
//! registry, in [`crate::public_api`].

use std::{path::{Path, PathBuf},
          sync::Arc};

use crate::{ColorChoice, DisplayPreference, Handler, LogConfigResult, LogLevel, Logger,
            LoggerRegistry, create_worker_tagged_formatter, file_handler_name,
            flush_handlers, handler_names::STDOUT_HANDLER_NAME};

/// File name used by [`Logger::enable_file_output`] when no path is given:
/// `<YYYYMMDD-HHMMSS>_<logger-name>.log`, local time, in the current directory.
#[must_use]
pub fn default_log_file_name(logger_name: &str) -> String {
    format!(
        "{}_{logger_name}.log",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    )
}

impl Logger {
    /// Colored console output to `stdout`. The level is set even if the handler was
    /// already attached.
    pub fn enable_console_output(&self, level: LogLevel) {
        self.enable_console_output_with(DisplayPreference::Stdout, ColorChoice::Always, level);
    }

    /// Same as [`Logger::enable_console_output`], with a choice of display and color. If
    /// a console handler is already attached, it's kept as is, only the level changes.
    pub fn enable_console_output_with(
        &self,
        display_preference: DisplayPreference,
        color_choice: ColorChoice,
        level: LogLevel,
    ) {
        let colored = color_choice.is_colored(&display_preference);
        let attached = self.add_handler(Handler::console(
            display_preference,
            create_worker_tagged_formatter(colored),
        ));
        self.set_level(level);
        tracing::debug!(logger = self.name(), attached, %level, "console output enabled");
    }

    /// Detach the console handler. Returns whether there was one.
    pub fn disable_console_output(&self) -> bool {
        self.remove_handler(STDOUT_HANDLER_NAME) > 0
    }

    /// Append plain lines to `filepath`, or to [`default_log_file_name`] if `None`. The
    /// level is set even if a handler for a file with this basename was already
    /// attached.
    ///
    /// Returns the name of the handler, ie `filehandler-<basename>`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LogConfigError::FileOpen`] if the file can't be opened. The
    /// logger is left as it was.
    pub fn enable_file_output(
        &self,
        filepath: Option<&Path>,
        level: LogLevel,
    ) -> LogConfigResult<String> {
        let filepath = match filepath {
            Some(it) => it.to_path_buf(),
            None => PathBuf::from(default_log_file_name(self.name())),
        };
        let handler_name = file_handler_name(&filepath);

        let attached = self.add_handler_with(&handler_name, || {
            Handler::file(&filepath, create_worker_tagged_formatter(false))
        })?;
        self.set_level(level);

        tracing::debug!(
            logger = self.name(),
            handler = %handler_name,
            attached,
            %level,
            "file output enabled"
        );
        Ok(handler_name)
    }

    /// With a path, detach the file handler for its basename. Without, detach every
    /// file handler. Other handlers stay. Returns how many were detached.
    pub fn disable_file_output(&self, filepath: Option<&Path>) -> usize {
        match filepath {
            Some(filepath) => self.remove_handler(&file_handler_name(filepath)),
            None => self.remove_handlers_where(Handler::is_file_handler),
        }
    }

    /// Detach every handler, and attach a discarding one in their place. Records
    /// logged on this logger, or propagated to it, are then dropped silently instead of
    /// going to the last resort output.
    pub fn disable_all_output(&self) {
        let old = self.replace_handlers(Handler::discard());
        let flush_failed = flush_handlers(&old);
        tracing::debug!(
            logger = self.name(),
            detached = old.len(),
            flush_failed,
            "all output disabled"
        );
    }
}

/// Operations on an optional logger, where `None` is the library root logger. Using
/// `None` triggers the first time setup of [`LoggerRegistry::get_root_logger`].
impl LoggerRegistry {
    pub fn enable_console_output(&self, logger: Option<&Arc<Logger>>, level: LogLevel) {
        self.logger_or_root(logger).enable_console_output(level);
    }

    pub fn enable_console_output_with(
        &self,
        logger: Option<&Arc<Logger>>,
        display_preference: DisplayPreference,
        color_choice: ColorChoice,
        level: LogLevel,
    ) {
        self.logger_or_root(logger)
            .enable_console_output_with(display_preference, color_choice, level);
    }

    pub fn disable_console_output(&self, logger: Option<&Arc<Logger>>) -> bool {
        self.logger_or_root(logger).disable_console_output()
    }

    /// # Errors
    ///
    /// See [`Logger::enable_file_output`].
    pub fn enable_file_output(
        &self,
        logger: Option<&Arc<Logger>>,
        filepath: Option<&Path>,
        level: LogLevel,
    ) -> LogConfigResult<String> {
        self.logger_or_root(logger).enable_file_output(filepath, level)
    }

    pub fn disable_file_output(
        &self,
        logger: Option<&Arc<Logger>>,
        filepath: Option<&Path>,
    ) -> usize {
        self.logger_or_root(logger).disable_file_output(filepath)
    }

    pub fn disable_all_output(&self, logger: Option<&Arc<Logger>>) {
        self.logger_or_root(logger).disable_all_output();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serial_test::serial;

    use super::*;
    use crate::{LibraryRoot, SharedBuffer, WorkerContext,
                handler_names::{FILE_HANDLER_PREFIX, NULL_HANDLER_NAME}};

    struct Fixture {
        registry: LoggerRegistry,
        last_resort: SharedBuffer,
        console: SharedBuffer,
    }

    /// Registry whose root logger prints to an in memory console.
    fn setup() -> Fixture {
        let last_resort = SharedBuffer::new();
        let console = SharedBuffer::new();
        let registry = LoggerRegistry::with_last_resort(
            LibraryRoot::new("kiele", "/opt/src/kiele"),
            Some(DisplayPreference::SharedBuffer(last_resort.clone())),
        );
        registry.enable_console_output_with(
            Some(&registry.get_logger("")),
            DisplayPreference::SharedBuffer(console.clone()),
            ColorChoice::Never,
            LogLevel::Info,
        );
        Fixture {
            registry,
            last_resort,
            console,
        }
    }

    fn file_handler_count(logger: &Logger) -> usize {
        logger
            .handler_names()
            .iter()
            .filter(|it| it.contains(FILE_HANDLER_PREFIX))
            .count()
    }

    #[test]
    fn test_module_logger_propagates_to_root_console() {
        let fixture = setup();
        let logger = fixture
            .registry
            .get_module_logger("/opt/src/kiele/io/reader.rs")
            .unwrap();

        logger.debug("below root level");
        logger.info("hello");
        logger.for_worker("w1").warning("careful");

        assert_eq!(
            fixture.console.lines(),
            vec![
                "[kiele.io.reader INFO] (Main)  hello",
                "[kiele.io.reader WARN] (w1)  careful",
            ]
        );
        assert!(fixture.last_resort.lines().is_empty());
    }

    #[test]
    fn test_enable_console_output_is_idempotent() {
        let fixture = setup();
        let root = fixture.registry.get_logger("kiele");
        for _ in 0..5 {
            fixture.registry.enable_console_output(Some(&root), LogLevel::Debug);
        }
        assert_eq!(root.handler_names(), vec![STDOUT_HANDLER_NAME]);
        assert_eq!(root.level(), Some(LogLevel::Debug));
    }

    #[test]
    fn test_enable_console_output_concurrently() {
        let fixture = setup();
        let logger = fixture.registry.get_logger("kiele.busy");
        let threads: Vec<_> = (0..16)
            .map(|_| {
                let logger = Arc::clone(&logger);
                std::thread::spawn(move || logger.enable_console_output(LogLevel::Info))
            })
            .collect();
        for thread in threads {
            thread.join().unwrap();
        }
        assert_eq!(logger.handler_names(), vec![STDOUT_HANDLER_NAME]);
    }

    #[test]
    fn test_disable_console_output() {
        let fixture = setup();
        let root = fixture.registry.get_logger("kiele");
        assert!(fixture.registry.disable_console_output(Some(&root)));
        assert!(!fixture.registry.disable_console_output(Some(&root)));
        assert!(root.handler_names().is_empty());
    }

    #[test]
    fn test_none_means_the_root_logger() {
        let registry = LoggerRegistry::new(LibraryRoot::new("kiele", "/opt/src/kiele"));
        registry.disable_console_output(None);
        let root = registry.get_logger("kiele");
        assert!(root.handler_names().is_empty());

        registry.disable_all_output(None);
        assert_eq!(root.handler_names(), vec![NULL_HANDLER_NAME]);
    }

    #[test]
    fn test_file_outputs_coexist_and_are_removed_by_basename() {
        let fixture = setup();
        let dir = tempfile::tempdir().unwrap();
        let a_log = dir.path().join("a.log");
        let b_log = dir.path().join("b.log");
        let root = fixture.registry.get_logger("kiele");

        let a_name = root.enable_file_output(Some(&a_log), LogLevel::Info).unwrap();
        let b_name = root.enable_file_output(Some(&b_log), LogLevel::Info).unwrap();
        assert_eq!(a_name, "filehandler-a.log");
        assert_eq!(b_name, "filehandler-b.log");
        assert_eq!(file_handler_count(&root), 2);

        assert_eq!(root.disable_file_output(Some(&a_log)), 1);
        assert_eq!(
            root.handler_names(),
            vec![STDOUT_HANDLER_NAME, "filehandler-b.log"]
        );
    }

    #[test]
    fn test_enable_file_output_dedups_by_basename() {
        let fixture = setup();
        let dir = tempfile::tempdir().unwrap();
        let root = fixture.registry.get_logger("kiele");

        let first = root
            .enable_file_output(Some(&dir.path().join("a.log")), LogLevel::Info)
            .unwrap();
        let second = root
            .enable_file_output(Some(&dir.path().join("nested/a.log")), LogLevel::Debug)
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(file_handler_count(&root), 1);
        assert_eq!(root.level(), Some(LogLevel::Debug));
    }

    #[test]
    fn test_disable_file_output_without_path_keeps_console() {
        let fixture = setup();
        let dir = tempfile::tempdir().unwrap();
        let root = fixture.registry.get_logger("kiele");
        root.enable_file_output(Some(&dir.path().join("a.log")), LogLevel::Info)
            .unwrap();
        root.enable_file_output(Some(&dir.path().join("b.log")), LogLevel::Info)
            .unwrap();

        assert_eq!(root.disable_file_output(None), 2);
        assert_eq!(root.handler_names(), vec![STDOUT_HANDLER_NAME]);
    }

    #[test]
    fn test_enable_file_output_failure_leaves_logger_untouched() {
        let fixture = setup();
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let logger = fixture.registry.get_logger("kiele.x");

        let result = logger.enable_file_output(Some(&blocker.join("a.log")), LogLevel::Debug);
        assert!(matches!(result, Err(crate::LogConfigError::FileOpen { .. })));
        assert!(logger.handler_names().is_empty());
        assert_eq!(logger.level(), None);
    }

    #[test]
    fn test_file_round_trip_is_plain_and_worker_tagged() {
        let fixture = setup();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("round_trip.log");
        let logger = fixture.registry.get_logger("kiele.study");

        logger.enable_file_output(Some(&path), LogLevel::Debug).unwrap();
        logger.debug("hello");
        logger.log_as(&WorkerContext::named("w1"), LogLevel::Error, "hello");
        logger.log_as(&WorkerContext::Indexed(3), LogLevel::Info, "naïve ünïcode");
        logger.flush();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "[kiele.study DEBU] (Main)  hello\n\
             [kiele.study ERRO] (w1)  hello\n\
             [kiele.study INFO] (Sub3)  naïve ünïcode\n"
        );
    }

    #[test]
    fn test_disable_all_output_is_silent() {
        let fixture = setup();
        let root = fixture.registry.get_logger("kiele");
        let child = fixture.registry.get_logger("kiele.child");

        fixture.registry.disable_all_output(Some(&root));
        assert_eq!(root.handler_names(), vec![NULL_HANDLER_NAME]);

        root.critical("nobody hears this");
        child.error("nor this");
        assert!(fixture.console.lines().is_empty());
        assert!(fixture.last_resort.lines().is_empty());
    }

    #[test]
    fn test_no_handlers_uses_last_resort() {
        let fixture = setup();
        let root = fixture.registry.get_logger("kiele");
        root.disable_console_output();

        root.info("dropped, below the last resort level");
        root.error("shown");
        assert_eq!(fixture.last_resort.lines(), vec!["[kiele ERRO] shown"]);
    }

    #[test]
    fn test_disable_all_output_flushes_detached_file_handlers() {
        let fixture = setup();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flushed.log");
        let logger = fixture.registry.get_logger("kiele.x");

        logger.enable_file_output(Some(&path), LogLevel::Info).unwrap();
        logger.info("before");
        logger.disable_all_output();

        assert_eq!(logger.handler_names(), vec![NULL_HANDLER_NAME]);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "[kiele.x INFO] (Main)  before\n"
        );
    }

    /// Changes the current directory, so it is serial with the other tests that depend on
    /// it.
    #[serial]
    #[test]
    fn test_enable_file_output_without_path_uses_default_name() {
        let fixture = setup();
        let dir = tempfile::tempdir().unwrap();
        let cwd = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir.path()).unwrap();

        let logger = fixture.registry.get_logger("kiele.study");
        let result = logger.enable_file_output(None, LogLevel::Info);
        logger.info("to the default file");
        logger.flush();
        let files: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|it| it.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        std::env::set_current_dir(cwd).unwrap();

        let handler_name = result.unwrap();
        let basename = handler_name.strip_prefix(FILE_HANDLER_PREFIX).unwrap();
        let (stamp, rest) = basename.split_once('_').unwrap();
        assert_eq!(rest, "kiele.study.log");
        assert_eq!(stamp.len(), "YYYYMMDD-HHMMSS".len());
        assert_eq!(stamp.as_bytes()[8], b'-');
        assert_eq!(stamp.chars().filter(char::is_ascii_digit).count(), 14);

        assert_eq!(files, vec![basename.to_string()]);
        assert_eq!(
            std::fs::read_to_string(dir.path().join(basename)).unwrap(),
            "[kiele.study INFO] (Main)  to the default file\n"
        );
        assert_eq!(logger.disable_file_output(None), 1);
    }

    #[test]
    fn test_default_log_file_name() {
        let it = default_log_file_name("kiele.study");
        assert!(it.ends_with("_kiele.study.log"));
        let (stamp, _) = it.split_once('_').unwrap();
        assert_eq!(stamp.len(), "YYYYMMDD-HHMMSS".len());
        assert_eq!(stamp.as_bytes()[8], b'-');
        assert!(stamp.chars().filter(char::is_ascii_digit).count() == 14);
    }
}
