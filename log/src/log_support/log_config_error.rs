// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::path::PathBuf;

use miette::Diagnostic;

/// Everything that can go wrong while configuring loggers. Emitting a record never
/// returns an error: write failures in a handler are reported on stderr instead.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum LogConfigError {
    #[error("Module path {} is not under the library root {}", path.display(), root.display())]
    #[diagnostic(
        code(kiele_log::path_resolution),
        help("Pass a path inside the library source tree, eg: `file!()` of a module")
    )]
    PathResolution { path: PathBuf, root: PathBuf },

    #[error("Can't open log file {}", path.display())]
    #[diagnostic(
        code(kiele_log::file_open),
        help("The folder might not exist, or you don't have the required permissions")
    )]
    FileOpen {
        path: PathBuf,
        #[source]
        source: tracing_appender::rolling::InitError,
    },

    #[error("Unknown log level: {input}")]
    #[diagnostic(
        code(kiele_log::unknown_level),
        help("Use one of trace, debug, info, warning, error, critical")
    )]
    UnknownLevel { input: String },

    #[error("The global logger registry has already been initialized")]
    #[diagnostic(code(kiele_log::global_registry_initialized))]
    GlobalRegistryAlreadyInitialized,

    #[error("Can't install the tracing bridge as the global default subscriber")]
    #[diagnostic(code(kiele_log::subscriber_install))]
    SubscriberInstall(#[source] tracing::subscriber::SetGlobalDefaultError),
}

pub type LogConfigResult<T> = Result<T, LogConfigError>;
