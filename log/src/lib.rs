// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! # kiele_log
//!
//! Hierarchical named loggers for the `kiele` library, with colorized console output,
//! plain file output, and a tag naming the worker that logged each line.
//!
//! - Loggers live in a [`LoggerRegistry`] and are named with dots, eg:
//!   `kiele.io.reader`. A logger inherits its level from its closest ancestor that has
//!   one, and hands every record to its ancestors' handlers too. So a module logger
//!   prints wherever the library root logger prints.
//! - [`LoggerRegistry::get_module_logger`] names a logger after a source file path under
//!   the library's [`LibraryRoot`].
//! - Handlers are attached and detached by name with the operations in
//!   [`mod@output_control`]. Each operation is idempotent.
//! - Lines look like this. On the console the bracketed header is colored by level:
//!
//! ```text
//! [kiele.io.reader INFO] (Main)  opened 3 files
//! [kiele.io.reader WARN] (w1)  file 2 is empty
//! ```
//!
//! # Example
//!
//! ```
//! use kiele_log::{ColorChoice, DisplayPreference, LibraryRoot, LogLevel, LoggerRegistry,
//!                 SharedBuffer};
//!
//! let registry = LoggerRegistry::new(LibraryRoot::new("kiele", "/opt/src/kiele"));
//! let console = SharedBuffer::new();
//! registry.enable_console_output_with(
//!     Some(&registry.get_logger("kiele")),
//!     DisplayPreference::SharedBuffer(console.clone()),
//!     ColorChoice::Never,
//!     LogLevel::Info,
//! );
//!
//! let logger = registry.get_module_logger("/opt/src/kiele/io/reader.rs").unwrap();
//! logger.info("opened 3 files");
//! logger.for_worker("w1").warning("file 2 is empty");
//!
//! assert_eq!(console.lines(), vec![
//!     "[kiele.io.reader INFO] (Main)  opened 3 files",
//!     "[kiele.io.reader WARN] (w1)  file 2 is empty",
//! ]);
//! ```
//!
//! # Global registry
//!
//! Apps that want one hierarchy for the whole process can use [`global_registry`] and
//! the free functions in [`mod@public_api`] instead. Code that logs with the [`tracing`]
//! macros can be routed into a registry with [`try_initialize_logging_global`].

// https://github.com/rust-lang/rust-clippy
// https://rust-lang.github.io/rust-clippy/master/index.html
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach sources.
pub mod log_support;

// Re-export.
pub use log_support::*;
