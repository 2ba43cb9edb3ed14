// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod ansi_escape_codes;
pub mod color_support;
pub mod handler;
pub mod line_formatter;
pub mod log_config_error;
pub mod log_level;
pub mod log_record;
pub mod logger;
pub mod logger_registry;
pub mod name_resolver;
pub mod output_config;
pub mod output_control;
pub mod public_api;
pub mod rolling_file_appender_impl;
pub mod shared_buffer;
pub mod tracing_bridge;
pub mod worker_context;

// Re-export.
pub use ansi_escape_codes::*;
pub use color_support::*;
pub use handler::*;
pub use line_formatter::*;
pub use log_config_error::*;
pub use log_level::*;
pub use log_record::*;
pub use logger::*;
pub use logger_registry::*;
pub use name_resolver::*;
pub use output_config::*;
pub use output_control::*;
pub use public_api::*;
pub use rolling_file_appender_impl::*;
pub use shared_buffer::*;
pub use tracing_bridge::*;
pub use worker_context::*;
