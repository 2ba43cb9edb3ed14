// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! # Tracing bridge
//!
//! Routes [`tracing`] events into a [`LoggerRegistry`], so that code using
//! [`tracing::info!`] and friends ends up in the same handlers as code using [`Logger`]
//! directly.
//!
//! - The event target names the logger. `::` becomes `.`, so the default target of an
//!   event in module `kiele::io` is the logger `kiele.io`. Use `target: "kiele.io"` to
//!   name the logger explicitly.
//! - The `message` field is the message. A `worker` field sets the
//!   [`WorkerContext`]: a string names the worker, a non-negative number indexes it.
//!   Any other field is appended to the message as `key=value`.
//! - Events from this crate itself are skipped, since they are emitted while a registry
//!   or logger lock might be held.
//!
//! The level check of the logger applies, just like for [`Logger::log`].

use std::{fmt::{self, Write as _},
          sync::Arc};

use tracing::{Event, Subscriber,
              dispatcher::DefaultGuard,
              field::{Field, Visit}};
use tracing_core::LevelFilter;
use tracing_subscriber::{Layer, layer::{Context, SubscriberExt}};

use crate::{LogConfigError, LogLevel, Logger, LoggerRegistry, WorkerContext};

const OWN_CRATE_TARGET: &str = env!("CARGO_CRATE_NAME");

/// A [`Layer`] that hands every event to the matching [`Logger`] of a registry.
#[derive(Debug, Clone)]
pub struct RegistryLayer {
    registry: LoggerRegistry,
}

impl RegistryLayer {
    #[must_use]
    pub fn new(registry: LoggerRegistry) -> Self { Self { registry } }

    #[must_use]
    pub fn logger_for_target(&self, target: &str) -> Arc<Logger> {
        self.registry.get_logger(&target.replace("::", "."))
    }
}

fn is_own_target(target: &str) -> bool {
    target
        .strip_prefix(OWN_CRATE_TARGET)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

impl<S: Subscriber> Layer<S> for RegistryLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if is_own_target(metadata.target()) {
            return;
        }

        let logger = self.logger_for_target(metadata.target());
        let level = LogLevel::from(*metadata.level());
        if !logger.is_enabled_for(level) {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);
        let worker = visitor.worker.take().unwrap_or_default();
        logger.log_as(&worker, level, visitor.into_message());
    }
}

#[derive(Debug, Default)]
struct EventVisitor {
    message: String,
    fields: String,
    worker: Option<WorkerContext>,
}

impl EventVisitor {
    /// The message followed by the other fields.
    fn into_message(self) -> String {
        let Self {
            mut message,
            fields,
            ..
        } = self;
        message.push_str(&fields);
        message
    }
}

const MESSAGE_FIELD: &str = "message";
const WORKER_FIELD: &str = "worker";

impl Visit for EventVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            MESSAGE_FIELD => self.message.push_str(value),
            WORKER_FIELD => self.worker = Some(WorkerContext::named(value)),
            name => {
                let _ = write!(self.fields, " {name}={value}");
            }
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        if field.name() == WORKER_FIELD {
            self.worker = Some(WorkerContext::Indexed(value));
        } else {
            self.record_debug(field, &value);
        }
    }

    /// Integer literals are `i64`, so `worker = 4` lands here. A negative index isn't a
    /// worker, it stays a plain field.
    fn record_i64(&mut self, field: &Field, value: i64) {
        match u64::try_from(value) {
            Ok(index) if field.name() == WORKER_FIELD => {
                self.worker = Some(WorkerContext::Indexed(index));
            }
            _ => self.record_debug(field, &value),
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == MESSAGE_FIELD {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={value:?}", field.name());
        }
    }
}

/// Install a [`RegistryLayer`] for `registry` as the global default subscriber. Once
/// set, it can't be unset or changed.
/// - This is great for apps.
/// - Docs for [Global default tracing
///   subscriber](https://docs.rs/tracing/latest/tracing/subscriber/fn.set_global_default.html)
///
/// Events above `level_filter` are dropped before they reach any logger. With
/// [`LevelFilter::OFF`] nothing is installed.
///
/// # Errors
///
/// Returns [`LogConfigError::SubscriberInstall`] if a global default subscriber is
/// already set.
pub fn try_initialize_logging_global(
    registry: &LoggerRegistry,
    level_filter: impl Into<LevelFilter>,
) -> miette::Result<()> {
    let level_filter = level_filter.into();

    // Early return if the level filter is off.
    if matches!(level_filter, LevelFilter::OFF) {
        return Ok(());
    }

    let subscriber = tracing_subscriber::registry()
        .with(level_filter)
        .with(RegistryLayer::new(registry.clone()));
    tracing::subscriber::set_global_default(subscriber)
        .map_err(LogConfigError::SubscriberInstall)?;
    Ok(())
}

/// Same as [`try_initialize_logging_global`], but only for the current thread, until
/// the returned guard is dropped.
/// - This is great for tests.
/// - Docs for [Thread local tracing
///   subscriber](https://docs.rs/tracing/latest/tracing/subscriber/fn.set_default.html)
///
/// Returns `None` if `level_filter` is [`LevelFilter::OFF`].
///
/// # Errors
///
/// None today. The [`miette::Result`] keeps the signature in line with
/// [`try_initialize_logging_global`].
pub fn try_initialize_logging_thread_local(
    registry: &LoggerRegistry,
    level_filter: impl Into<LevelFilter>,
) -> miette::Result<Option<DefaultGuard>> {
    let level_filter = level_filter.into();

    // Early return if the level filter is off.
    if matches!(level_filter, LevelFilter::OFF) {
        return Ok(None);
    }

    let subscriber = tracing_subscriber::registry()
        .with(level_filter)
        .with(RegistryLayer::new(registry.clone()));
    Ok(Some(tracing::subscriber::set_default(subscriber)))
}
