// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::path::{Path, PathBuf};

use tracing_appender::rolling::{RollingFileAppender, Rotation};

use crate::{LogConfigError, LogConfigResult};

/// Open (or create) `path` for appending. The file never rotates, so every line logged
/// through the returned writer ends up in exactly `path`. Missing parent folders are
/// created.
///
/// Note that if you wrap this up in a non blocking writer, lines are no longer on disk
/// when the log call returns. Here's an example of this:
/// `tracing_appender::non_blocking(try_create("foo.log")?)`
///
/// # Errors
///
/// Returns [`LogConfigError::FileOpen`] if:
/// - The path has no file name
/// - Insufficient permissions to access the file or directory
pub fn try_create(path: &Path) -> LogConfigResult<RollingFileAppender> {
    let parent = path.parent().unwrap_or_else(|| Path::new(""));
    let file_name = path
        .file_name()
        .map(|it| it.to_string_lossy().into_owned())
        .unwrap_or_default();

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(parent)
        .map_err(|source| LogConfigError::FileOpen {
            path: PathBuf::from(path),
            source,
        })
}
