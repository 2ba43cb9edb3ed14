// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::path::{Component, Path, PathBuf};

use crate::{LogConfigError, LogConfigResult};

/// Name of the library whose loggers live in a registry, plus the folder holding its
/// sources. The name is the root of the dotted logger hierarchy; the folder is what
/// module file paths are resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryRoot {
    name: String,
    dir: PathBuf,
}

pub mod library_root_defaults {
    pub const DEFAULT_LIBRARY_NAME: &str = "kiele";
    pub const DEFAULT_LIBRARY_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/src");
}

/// Build a [`LibraryRoot`] whose folder is the `src` folder of the crate that invokes
/// the macro.
///
/// ```
/// let root = kiele_log::library_root!("my_lib");
/// assert_eq!(root.name(), "my_lib");
/// ```
#[macro_export]
macro_rules! library_root {
    ($name:expr) => {
        $crate::LibraryRoot::new($name, concat!(env!("CARGO_MANIFEST_DIR"), "/src"))
    };
}

impl Default for LibraryRoot {
    fn default() -> Self {
        Self::new(
            library_root_defaults::DEFAULT_LIBRARY_NAME,
            library_root_defaults::DEFAULT_LIBRARY_DIR,
        )
    }
}

impl LibraryRoot {
    pub fn new(name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            dir: dir.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str { &self.name }

    #[must_use]
    pub fn dir(&self) -> &Path { &self.dir }

    /// Turn the file path of a module into its dotted logger name.
    ///
    /// `<dir>/io/reader.rs` becomes `<name>.io.reader`. The extension of the last
    /// segment is dropped. Relative paths are resolved against the current directory.
    ///
    /// # Errors
    ///
    /// Returns [`LogConfigError::PathResolution`] if the path is not under
    /// [`LibraryRoot::dir`].
    pub fn resolve_module_name(&self, module_path: impl AsRef<Path>) -> LogConfigResult<String> {
        let module_path = absolute(module_path.as_ref());
        let library_dir = absolute(&self.dir);

        let relative = module_path.strip_prefix(&library_dir).map_err(|_| {
            LogConfigError::PathResolution {
                path: module_path.clone(),
                root: library_dir.clone(),
            }
        })?;

        let mut segments: Vec<String> = relative
            .components()
            .filter_map(|component| match component {
                Component::Normal(it) => Some(it.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();

        if let Some(last) = segments.last_mut() {
            let stem = Path::new(last.as_str())
                .file_stem()
                .map(|it| it.to_string_lossy().into_owned());
            if let Some(stem) = stem {
                *last = stem;
            }
        }

        Ok(std::iter::once(self.name.clone())
            .chain(segments)
            .collect::<Vec<_>>()
            .join("."))
    }

    /// Turn a Rust module path (as returned by `module_path!()`) into a dotted logger
    /// name. The crate segment is replaced by [`LibraryRoot::name`], eg:
    /// `my_crate::io::reader` becomes `<name>.io.reader`.
    #[must_use]
    pub fn module_path_to_logger_name(&self, module_path: &str) -> String {
        std::iter::once(self.name.as_str())
            .chain(module_path.split("::").skip(1).filter(|it| !it.is_empty()))
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Lexical absolute path: joined onto the current dir if relative, `.` and `..`
/// folded. Symlinks are not resolved, so the file doesn't have to exist.
fn absolute(path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    let mut acc = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                acc.pop();
            }
            other => acc.push(other.as_os_str()),
        }
    }
    acc
}
