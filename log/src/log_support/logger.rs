// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt::Display,
          io::{self, Write},
          sync::{Arc, Mutex, MutexGuard, PoisonError, Weak,
                 atomic::{AtomicBool, AtomicU8, Ordering}}};

use smallvec::SmallVec;

use crate::{Handler, LogConfigResult, LogLevel, LogRecord, WorkerContext,
            log_level::level_slot, logger_registry::RegistryInner};

pub type HandlerList = SmallVec<[Arc<Handler>; 4]>;

/// A named node in the logger hierarchy of a [`crate::LoggerRegistry`].
///
/// - The name is dotted, eg: `kiele.io.reader`. The parent is the closest existing
///   logger whose name is a dotted prefix, eg: `kiele.io`, or else `kiele`.
/// - The level is optional. When unset, the level of the closest ancestor that has one
///   applies, and [`LogLevel::FALLBACK`] if none do.
/// - A record that passes the level check is handed to this logger's handlers, and then
///   to the handlers of every ancestor, until a logger with `propagate == false` is
///   reached. Ancestor levels are not checked again.
///
/// Loggers are only created by the registry, and are shared as `Arc<Logger>`.
#[derive(Debug)]
pub struct Logger {
    name: String,
    level: AtomicU8,
    propagate: AtomicBool,
    handlers: Mutex<HandlerList>,
    registry: Weak<RegistryInner>,
}

/// Generates the per level convenience methods. `$emit` is the method that takes a
/// [`LogLevel`] and a message.
macro_rules! impl_level_methods {
    ($emit:ident) => {
        pub fn trace(&self, message: impl Display) { self.$emit(LogLevel::Trace, message) }

        pub fn debug(&self, message: impl Display) { self.$emit(LogLevel::Debug, message) }

        pub fn info(&self, message: impl Display) { self.$emit(LogLevel::Info, message) }

        pub fn warning(&self, message: impl Display) {
            self.$emit(LogLevel::Warning, message)
        }

        pub fn error(&self, message: impl Display) { self.$emit(LogLevel::Error, message) }

        pub fn critical(&self, message: impl Display) {
            self.$emit(LogLevel::Critical, message)
        }
    };
}

impl Logger {
    pub(crate) fn new(name: impl Into<String>, registry: Weak<RegistryInner>) -> Self {
        Self {
            name: name.into(),
            level: AtomicU8::new(level_slot::NOT_SET),
            propagate: AtomicBool::new(true),
            handlers: Mutex::new(SmallVec::new()),
            registry,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str { &self.name }

    /// The level set on this logger itself, if any.
    #[must_use]
    pub fn level(&self) -> Option<LogLevel> {
        level_slot::decode(self.level.load(Ordering::Acquire))
    }

    pub fn set_level(&self, level: LogLevel) {
        self.level
            .store(level_slot::encode(Some(level)), Ordering::Release);
    }

    /// Go back to inheriting the level from the ancestors.
    pub fn clear_level(&self) {
        self.level.store(level_slot::NOT_SET, Ordering::Release);
    }

    #[must_use]
    pub fn effective_level(&self) -> LogLevel {
        if let Some(level) = self.level() {
            return level;
        }
        let mut current = self.parent();
        while let Some(logger) = current {
            if let Some(level) = logger.level() {
                return level;
            }
            current = logger.parent();
        }
        LogLevel::FALLBACK
    }

    #[must_use]
    pub fn is_enabled_for(&self, level: LogLevel) -> bool { level >= self.effective_level() }

    #[must_use]
    pub fn propagate(&self) -> bool { self.propagate.load(Ordering::Acquire) }

    pub fn set_propagate(&self, propagate: bool) {
        self.propagate.store(propagate, Ordering::Release);
    }

    /// The closest existing ancestor, if the registry is still alive.
    #[must_use]
    pub fn parent(&self) -> Option<Arc<Logger>> {
        self.registry
            .upgrade()
            .and_then(|registry| registry.find_parent(&self.name))
    }

    fn lock_handlers(&self) -> MutexGuard<'_, HandlerList> {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the attached handlers, in attach order.
    #[must_use]
    pub fn handlers(&self) -> HandlerList { self.lock_handlers().clone() }

    #[must_use]
    pub fn handler_names(&self) -> Vec<String> {
        self.lock_handlers()
            .iter()
            .map(|handler| handler.name().to_string())
            .collect()
    }

    #[must_use]
    pub fn has_handler(&self, name: &str) -> bool {
        self.lock_handlers()
            .iter()
            .any(|handler| handler.name() == name)
    }

    /// Attach `handler` unless one with the same name is already attached. Returns
    /// whether it was attached.
    pub fn add_handler(&self, handler: Handler) -> bool {
        let mut handlers = self.lock_handlers();
        if handlers.iter().any(|it| it.name() == handler.name()) {
            return false;
        }
        handlers.push(Arc::new(handler));
        true
    }

    /// Same as [`Logger::add_handler`], except that the handler is only created if the
    /// name is free. The check and the attach happen under one lock, so two threads
    /// racing on the same name end up with one handler.
    ///
    /// # Errors
    ///
    /// Whatever `create_handler` returns. Nothing is attached in that case.
    pub fn add_handler_with(
        &self,
        name: &str,
        create_handler: impl FnOnce() -> LogConfigResult<Handler>,
    ) -> LogConfigResult<bool> {
        let mut handlers = self.lock_handlers();
        if handlers.iter().any(|it| it.name() == name) {
            return Ok(false);
        }
        handlers.push(Arc::new(create_handler()?));
        Ok(true)
    }

    /// Detach every handler named `name`. Returns how many were detached.
    pub fn remove_handler(&self, name: &str) -> usize {
        self.remove_handlers_where(|handler| handler.name() == name)
    }

    /// Detach every handler matching `predicate`. Returns how many were detached.
    pub fn remove_handlers_where(&self, predicate: impl Fn(&Handler) -> bool) -> usize {
        let mut handlers = self.lock_handlers();
        let before = handlers.len();
        handlers.retain(|handler| !predicate(handler));
        before - handlers.len()
    }

    /// Detach all handlers, and return them.
    pub fn clear_handlers(&self) -> HandlerList { std::mem::take(&mut *self.lock_handlers()) }

    /// Replace all handlers with `handler`, under one lock.
    pub fn replace_handlers(&self, handler: Handler) -> HandlerList {
        let mut handlers = self.lock_handlers();
        let old = std::mem::take(&mut *handlers);
        handlers.push(Arc::new(handler));
        old
    }

    /// Log `message` from the main process.
    pub fn log(&self, level: LogLevel, message: impl Display) {
        self.log_as(&WorkerContext::Main, level, message);
    }

    /// Log `message` on behalf of `worker`.
    pub fn log_as(&self, worker: &WorkerContext, level: LogLevel, message: impl Display) {
        if !self.is_enabled_for(level) {
            return;
        }
        let message = message.to_string();
        let record = LogRecord::new(&self.name, level, message, worker);
        self.call_handlers(&record);
    }

    impl_level_methods!(log);

    /// A view of this logger that logs everything on behalf of `worker`.
    #[must_use]
    pub fn for_worker(self: &Arc<Self>, worker: impl Into<WorkerContext>) -> WorkerLogger {
        WorkerLogger {
            logger: Arc::clone(self),
            worker: worker.into(),
        }
    }

    /// Hand a record, that already passed the level check, to this logger's handlers
    /// and those of its ancestors. Falls back to the registry's last resort handler when
    /// no handler was found on the way.
    pub fn call_handlers(&self, record: &LogRecord<'_>) {
        let mut handler_count = emit_to(&self.handlers(), record);

        if self.propagate() {
            let mut current = self.parent();
            while let Some(logger) = current {
                handler_count += emit_to(&logger.handlers(), record);
                if !logger.propagate() {
                    break;
                }
                current = logger.parent();
            }
        }

        if handler_count == 0 {
            if let Some(registry) = self.registry.upgrade() {
                registry.emit_last_resort(record);
            }
        }
    }

    /// Flush every attached handler. Errors are reported on stderr.
    pub fn flush(&self) { flush_handlers(&self.handlers()); }
}

/// Flush `handlers`, eg: the ones just detached from a logger. Errors are reported on
/// stderr. Returns how many failed.
pub fn flush_handlers(handlers: &HandlerList) -> usize {
    let mut failed = 0;
    for handler in handlers {
        if let Err(error) = handler.flush() {
            report_handler_error(handler, &error);
            failed += 1;
        }
    }
    failed
}

fn emit_to(handlers: &HandlerList, record: &LogRecord<'_>) -> usize {
    for handler in handlers {
        if let Err(error) = handler.handle(record) {
            report_handler_error(handler, &error);
        }
    }
    handlers.len()
}

/// Logging must not fail the caller, so a broken handler is only reported. This writes
/// straight to stderr, since going through a logger could fail the same way again.
fn report_handler_error(handler: &Handler, error: &io::Error) {
    let _ = writeln!(
        io::stderr(),
        "--- Logging error --- handler {} failed: {error}",
        handler.name()
    );
}

/// A [`Logger`] bound to a [`WorkerContext`]. Cheap to clone; hand one to each task
/// of a worker pool.
#[derive(Debug, Clone)]
pub struct WorkerLogger {
    logger: Arc<Logger>,
    worker: WorkerContext,
}

impl WorkerLogger {
    #[must_use]
    pub fn logger(&self) -> &Arc<Logger> { &self.logger }

    #[must_use]
    pub fn worker(&self) -> &WorkerContext { &self.worker }

    pub fn log(&self, level: LogLevel, message: impl Display) {
        self.logger.log_as(&self.worker, level, message);
    }

    impl_level_methods!(log);
}
