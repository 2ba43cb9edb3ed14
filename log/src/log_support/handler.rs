// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt::{self, Debug},
          io::{self, Write},
          path::{Path, PathBuf},
          sync::{Arc, Mutex, PoisonError}};

use const_format::formatcp;
use tracing_appender::rolling::RollingFileAppender;

use crate::{LineFormatter, LogConfigResult, LogRecord, SharedBuffer,
            rolling_file_appender_impl};

/// Handler name constants. A logger holds at most one handler per name.
pub mod handler_names {
    use super::formatcp;

    pub const STDOUT_HANDLER_NAME: &str = "stdout-handler";
    pub const FILE_HANDLER_MARKER: &str = "filehandler";
    pub const FILE_HANDLER_PREFIX: &str = formatcp!("{FILE_HANDLER_MARKER}-");
    pub const NULL_HANDLER_NAME: &str = "null-handler";
}

use handler_names::FILE_HANDLER_PREFIX;

/// Name of the file handler that writes to `path`: `filehandler-<basename>`.
#[must_use]
pub fn file_handler_name(path: &Path) -> String {
    let basename = path
        .file_name()
        .map(|it| it.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{FILE_HANDLER_PREFIX}{basename}")
}

/// Where a console handler writes.
#[derive(Clone)]
pub enum DisplayPreference {
    Stdout,
    Stderr,
    SharedBuffer(SharedBuffer),
}

impl Debug for DisplayPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayPreference::Stdout => write!(f, "Stdout"),
            DisplayPreference::Stderr => write!(f, "Stderr"),
            DisplayPreference::SharedBuffer(_) => write!(f, "SharedBuffer"),
        }
    }
}

/// Two preferences are equal if they write to the same place.
impl PartialEq for DisplayPreference {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (DisplayPreference::Stdout, DisplayPreference::Stdout)
            | (DisplayPreference::Stderr, DisplayPreference::Stderr) => true,
            (DisplayPreference::SharedBuffer(lhs), DisplayPreference::SharedBuffer(rhs)) => {
                Arc::ptr_eq(&lhs.buffer, &rhs.buffer)
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerKind {
    Console,
    File(PathBuf),
    /// Swallows every record. See [`crate::disable_all_output`].
    Discard,
    Custom,
}

/// The destination of a handler.
pub enum HandlerSink {
    Display(DisplayPreference),
    File(Mutex<RollingFileAppender>),
    Discard,
    Writer(Mutex<Box<dyn Write + Send>>),
}

impl Debug for HandlerSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerSink::Display(display_pref) => write!(f, "Display({display_pref:?})"),
            HandlerSink::File(_) => write!(f, "File"),
            HandlerSink::Discard => write!(f, "Discard"),
            HandlerSink::Writer(_) => write!(f, "Writer"),
        }
    }
}

impl HandlerSink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        match self {
            HandlerSink::Display(DisplayPreference::Stdout) => {
                let mut stdout_lock = io::stdout().lock();
                writeln!(stdout_lock, "{line}")?;
                stdout_lock.flush()
            }
            HandlerSink::Display(DisplayPreference::Stderr) => {
                let mut stderr_lock = io::stderr().lock();
                writeln!(stderr_lock, "{line}")
            }
            HandlerSink::Display(DisplayPreference::SharedBuffer(shared_buffer)) => {
                shared_buffer.write_line(line);
                Ok(())
            }
            HandlerSink::File(appender) => {
                let mut appender = appender.lock().unwrap_or_else(PoisonError::into_inner);
                writeln!(appender, "{line}")
            }
            HandlerSink::Discard => Ok(()),
            HandlerSink::Writer(writer) => {
                let mut writer = writer.lock().unwrap_or_else(PoisonError::into_inner);
                writeln!(writer, "{line}")?;
                writer.flush()
            }
        }
    }

    fn flush(&self) -> io::Result<()> {
        match self {
            HandlerSink::Display(DisplayPreference::Stdout) => io::stdout().flush(),
            HandlerSink::Display(DisplayPreference::Stderr) => io::stderr().flush(),
            HandlerSink::Display(DisplayPreference::SharedBuffer(_))
            | HandlerSink::Discard => Ok(()),
            HandlerSink::File(appender) => appender
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .flush(),
            HandlerSink::Writer(writer) => writer
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .flush(),
        }
    }
}

/// A named output attached to a [`crate::Logger`]. Handlers are shared as
/// `Arc<Handler>` so that emitting a record doesn't hold the logger's handler list lock
/// while writing.
#[derive(Debug)]
pub struct Handler {
    name: String,
    kind: HandlerKind,
    formatter: Arc<dyn LineFormatter>,
    sink: HandlerSink,
}

impl Handler {
    pub fn new(
        name: impl Into<String>,
        kind: HandlerKind,
        formatter: Arc<dyn LineFormatter>,
        sink: HandlerSink,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            formatter,
            sink,
        }
    }

    /// Console handler named [`handler_names::STDOUT_HANDLER_NAME`], regardless of the
    /// display it writes to.
    pub fn console(
        display_preference: DisplayPreference,
        formatter: Arc<dyn LineFormatter>,
    ) -> Self {
        Self::new(
            handler_names::STDOUT_HANDLER_NAME,
            HandlerKind::Console,
            formatter,
            HandlerSink::Display(display_preference),
        )
    }

    /// File handler named with [`file_handler_name`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::LogConfigError::FileOpen`] if the file can't be opened for
    /// appending.
    pub fn file(path: &Path, formatter: Arc<dyn LineFormatter>) -> LogConfigResult<Self> {
        let appender = rolling_file_appender_impl::try_create(path)?;
        Ok(Self::new(
            file_handler_name(path),
            HandlerKind::File(path.to_path_buf()),
            formatter,
            HandlerSink::File(Mutex::new(appender)),
        ))
    }

    #[must_use]
    pub fn discard() -> Self {
        Self::new(
            handler_names::NULL_HANDLER_NAME,
            HandlerKind::Discard,
            crate::create_formatter(false),
            HandlerSink::Discard,
        )
    }

    /// Handler that writes to any [`Write`] implementation.
    pub fn writer(
        name: impl Into<String>,
        writer: impl Write + Send + 'static,
        formatter: Arc<dyn LineFormatter>,
    ) -> Self {
        Self::new(
            name,
            HandlerKind::Custom,
            formatter,
            HandlerSink::Writer(Mutex::new(Box::new(writer))),
        )
    }

    #[must_use]
    pub fn name(&self) -> &str { &self.name }

    #[must_use]
    pub fn kind(&self) -> &HandlerKind { &self.kind }

    #[must_use]
    pub fn formatter(&self) -> &Arc<dyn LineFormatter> { &self.formatter }

    #[must_use]
    pub fn is_file_handler(&self) -> bool { self.name.contains(FILE_HANDLER_PREFIX) }

    /// Format the record and write it as one line.
    ///
    /// # Errors
    ///
    /// Returns the sink's I/O error. The caller decides how to report it.
    pub fn handle(&self, record: &LogRecord<'_>) -> io::Result<()> {
        if matches!(self.sink, HandlerSink::Discard) {
            return Ok(());
        }
        let line = self.formatter.format_to_string(record);
        self.sink.write_line(&line)
    }

    /// # Errors
    ///
    /// Returns the sink's I/O error.
    pub fn flush(&self) -> io::Result<()> { self.sink.flush() }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{LogLevel, WorkerContext, create_formatter};

    #[test]
    fn test_file_handler_name_uses_basename() {
        assert_eq!(
            file_handler_name(Path::new("/tmp/some/dir/a.log")),
            "filehandler-a.log"
        );
        assert_eq!(file_handler_name(Path::new("b.log")), "filehandler-b.log");
    }

    #[test]
    fn test_console_handler_writes_one_line_per_record() {
        let shared_buffer = SharedBuffer::new();
        let handler = Handler::console(
            DisplayPreference::SharedBuffer(shared_buffer.clone()),
            create_formatter(false),
        );
        assert_eq!(handler.name(), handler_names::STDOUT_HANDLER_NAME);
        assert_eq!(handler.kind(), &HandlerKind::Console);

        let main = WorkerContext::Main;
        handler
            .handle(&LogRecord::new("kiele", LogLevel::Info, "one", &main))
            .unwrap();
        handler
            .handle(&LogRecord::new("kiele", LogLevel::Error, "two", &main))
            .unwrap();

        assert_eq!(
            shared_buffer.lines(),
            vec!["[kiele INFO] one", "[kiele ERRO] two"]
        );
    }

    #[test]
    fn test_console_handler_lines_stay_whole_across_threads() {
        let shared_buffer = SharedBuffer::new();
        let handler = Arc::new(Handler::console(
            DisplayPreference::SharedBuffer(shared_buffer.clone()),
            crate::create_worker_tagged_formatter(false),
        ));

        let threads: Vec<_> = (0..8_u64)
            .map(|index| {
                let handler = Arc::clone(&handler);
                std::thread::spawn(move || {
                    let worker = WorkerContext::Indexed(index);
                    for count in 0..2_000 {
                        let message = format!("m{count}");
                        handler
                            .handle(&LogRecord::new(
                                "kiele.pool",
                                LogLevel::Info,
                                message.as_str(),
                                &worker,
                            ))
                            .unwrap();
                    }
                })
            })
            .collect();
        for thread in threads {
            thread.join().unwrap();
        }

        let lines = shared_buffer.lines();
        assert_eq!(lines.len(), 8 * 2_000);
        let broken: Vec<_> = lines
            .iter()
            .filter(|it| it.matches("[kiele.pool INFO]").count() != 1)
            .collect();
        assert!(broken.is_empty(), "broken lines: {broken:?}");
    }

    #[test]
    fn test_file_handler_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.log");
        let handler = Handler::file(&path, create_formatter(false)).unwrap();
        assert!(handler.is_file_handler());
        assert_eq!(handler.kind(), &HandlerKind::File(path.clone()));

        let main = WorkerContext::Main;
        handler
            .handle(&LogRecord::new("kiele.a", LogLevel::Debug, "written", &main))
            .unwrap();
        handler.flush().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "[kiele.a DEBU] written\n");
    }

    #[test]
    fn test_discard_handler_swallows() {
        let handler = Handler::discard();
        let main = WorkerContext::Main;
        assert!(
            handler
                .handle(&LogRecord::new("kiele", LogLevel::Critical, "gone", &main))
                .is_ok()
        );
        assert!(!handler.is_file_handler());
    }

    #[test]
    fn test_display_preference_eq() {
        let shared_buffer = SharedBuffer::new();
        let lhs = DisplayPreference::SharedBuffer(shared_buffer.clone());
        let rhs = DisplayPreference::SharedBuffer(shared_buffer);
        assert_eq!(lhs, rhs);
        assert_ne!(lhs, DisplayPreference::SharedBuffer(SharedBuffer::new()));
        assert_ne!(DisplayPreference::Stdout, DisplayPreference::Stderr);
    }
}
