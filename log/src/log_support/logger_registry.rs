// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! # Logger registry
//!
//! A [`LoggerRegistry`] owns the hierarchy of named [`Logger`]s for one library. It is an
//! explicit object: create one with [`LoggerRegistry::new`] and pass it (it's a cheap
//! `Arc` clone) to whoever needs loggers. That is what tests do, so each test gets its own
//! isolated hierarchy.
//!
//! For apps that want a single process wide hierarchy there is also a global registry:
//!
//! - **Init**: [`init_global_registry`] sets the [`LibraryRoot`] of the global registry.
//!   It can only be called once, and must be called before the first use of
//!   [`global_registry`], which otherwise initializes it with [`LibraryRoot::default`].
//! - **Teardown**: [`LoggerRegistry::shutdown`] flushes and detaches every handler (which
//!   closes log files). The loggers themselves stay, and can be reconfigured.
//!
//! The free functions in [`crate::public_api`] all operate on [`global_registry`].

use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use ordermap::OrderMap;

use crate::{DisplayPreference, Handler, LibraryRoot, LogConfigError, LogConfigResult,
            LogLevel, LogRecord, Logger, create_formatter};

/// Name of the handler used when a record reaches no handler at all.
pub const LAST_RESORT_HANDLER_NAME: &str = "last-resort-handler";

/// Cheap to clone, all clones share the same loggers.
#[derive(Debug, Clone)]
pub struct LoggerRegistry {
    inner: Arc<RegistryInner>,
}

#[derive(Debug)]
pub(crate) struct RegistryInner {
    library_root: LibraryRoot,
    loggers: Mutex<OrderMap<String, Arc<Logger>>>,
    /// Guards the first time setup of the root logger. `true` once it's done.
    root_init_lock: Mutex<bool>,
    /// Handles records with level [`LogLevel::FALLBACK`] or above that found no handler.
    last_resort: Option<Handler>,
}

impl RegistryInner {
    fn lock_loggers(&self) -> MutexGuard<'_, OrderMap<String, Arc<Logger>>> {
        self.loggers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Closest existing logger whose name is a dotted prefix of `name`.
    pub(crate) fn find_parent(&self, name: &str) -> Option<Arc<Logger>> {
        let loggers = self.lock_loggers();
        let mut prefix = name;
        while let Some((head, _)) = prefix.rsplit_once('.') {
            if let Some(logger) = loggers.get(head) {
                return Some(Arc::clone(logger));
            }
            prefix = head;
        }
        None
    }

    pub(crate) fn emit_last_resort(&self, record: &LogRecord<'_>) {
        if record.level < LogLevel::FALLBACK {
            return;
        }
        if let Some(handler) = &self.last_resort {
            let _ = handler.handle(record);
        }
    }
}

impl LoggerRegistry {
    /// Registry whose last resort output is `stderr`.
    #[must_use]
    pub fn new(library_root: LibraryRoot) -> Self {
        Self::with_last_resort(library_root, Some(DisplayPreference::Stderr))
    }

    /// Registry whose last resort output goes to `last_resort`. With `None`, records that
    /// reach no handler are dropped silently.
    #[must_use]
    pub fn with_last_resort(
        library_root: LibraryRoot,
        last_resort: Option<DisplayPreference>,
    ) -> Self {
        let last_resort = last_resort.map(|display_preference| {
            Handler::new(
                LAST_RESORT_HANDLER_NAME,
                crate::HandlerKind::Console,
                create_formatter(false),
                crate::HandlerSink::Display(display_preference),
            )
        });
        Self {
            inner: Arc::new(RegistryInner {
                library_root,
                loggers: Mutex::new(OrderMap::new()),
                root_init_lock: Mutex::new(false),
                last_resort,
            }),
        }
    }

    #[must_use]
    pub fn library_root(&self) -> &LibraryRoot { &self.inner.library_root }

    #[must_use]
    pub fn root_name(&self) -> &str { self.inner.library_root.name() }

    /// Return the logger called `name`, creating it if needed. An empty name is the root
    /// logger. Any name works, including ones outside the library, eg: `distributed`.
    ///
    /// Unlike [`LoggerRegistry::get_root_logger`], this never attaches handlers.
    #[must_use]
    pub fn get_logger(&self, name: &str) -> Arc<Logger> {
        let name = if name.is_empty() { self.root_name() } else { name };
        let mut loggers = self.inner.lock_loggers();
        if let Some(logger) = loggers.get(name) {
            return Arc::clone(logger);
        }
        let logger = Arc::new(Logger::new(name, Arc::downgrade(&self.inner)));
        loggers.insert(name.to_string(), Arc::clone(&logger));
        drop(loggers);
        tracing::trace!(logger = name, "created logger");
        logger
    }

    /// The library root logger. The first call enables console output on it, at
    /// [`LogLevel::Info`]. Concurrent first calls are serialized, so the console handler
    /// is attached once.
    #[must_use]
    pub fn get_root_logger(&self) -> Arc<Logger> {
        let logger = self.get_logger(self.root_name());
        let mut initialized = self
            .inner
            .root_init_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !*initialized {
            logger.enable_console_output(LogLevel::Info);
            *initialized = true;
        }
        logger
    }

    /// Logger for the module at `module_path` (a file under the library root). It has no
    /// level and no handlers of its own, so it uses the root logger's through
    /// propagation.
    ///
    /// # Errors
    ///
    /// Returns [`LogConfigError::PathResolution`] if the path is not under the library
    /// root.
    pub fn get_module_logger(
        &self,
        module_path: impl AsRef<std::path::Path>,
    ) -> LogConfigResult<Arc<Logger>> {
        let name = self.inner.library_root.resolve_module_name(module_path)?;
        Ok(self.get_logger(&name))
    }

    /// Logger for a Rust module path, eg: `module_path!()`.
    #[must_use]
    pub fn get_logger_for_module_path(&self, module_path: &str) -> Arc<Logger> {
        let name = self
            .inner
            .library_root
            .module_path_to_logger_name(module_path);
        self.get_logger(&name)
    }

    /// Names of all loggers created so far, in creation order.
    #[must_use]
    pub fn logger_names(&self) -> Vec<String> {
        self.inner.lock_loggers().keys().cloned().collect()
    }

    /// `Some(logger)` if it was passed, else the root logger. This is how every output
    /// control function treats its optional logger argument.
    #[must_use]
    pub fn logger_or_root(&self, logger: Option<&Arc<Logger>>) -> Arc<Logger> {
        logger.map_or_else(|| self.get_root_logger(), Arc::clone)
    }

    /// Flush and detach every handler of every logger. Loggers keep their level. The
    /// next [`LoggerRegistry::get_root_logger`] sets up console output again.
    pub fn shutdown(&self) {
        let loggers: Vec<Arc<Logger>> = self.inner.lock_loggers().values().cloned().collect();
        for logger in loggers {
            logger.flush();
            drop(logger.clear_handlers());
        }
        *self
            .inner
            .root_init_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = false;
        tracing::debug!(registry = self.root_name(), "logger registry shut down");
    }
}

static GLOBAL_REGISTRY: OnceLock<LoggerRegistry> = OnceLock::new();

/// Set up the global registry for the library described by `library_root`.
///
/// # Errors
///
/// Returns [`LogConfigError::GlobalRegistryAlreadyInitialized`] if it was already set up,
/// either by an earlier call, or implicitly by [`global_registry`].
pub fn init_global_registry(library_root: LibraryRoot) -> LogConfigResult<&'static LoggerRegistry> {
    let mut fresh = false;
    let registry = GLOBAL_REGISTRY.get_or_init(|| {
        fresh = true;
        LoggerRegistry::new(library_root)
    });
    if fresh {
        Ok(registry)
    } else {
        Err(LogConfigError::GlobalRegistryAlreadyInitialized)
    }
}

/// The process wide registry. Initialized with [`LibraryRoot::default`] unless
/// [`init_global_registry`] ran first.
pub fn global_registry() -> &'static LoggerRegistry {
    GLOBAL_REGISTRY.get_or_init(|| LoggerRegistry::new(LibraryRoot::default()))
}
