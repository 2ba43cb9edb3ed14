// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{io::{Result, Write},
          sync::{Arc, Mutex, PoisonError}};

/// In memory console. Console handlers can write here instead of `stdout`, which is
/// how the output of a logger is captured in tests or shown inside another UI.
///
/// You can safely clone this struct, since it only contains an `Arc<Mutex<Vec<u8>>>`.
/// The inner `buffer` will not be cloned, just the [Arc] will be cloned.
#[derive(Clone, Debug, Default)]
pub struct SharedBuffer {
    pub buffer: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn get_copy_of_buffer_as_string(&self) -> String {
        let buffer_data = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buffer_data).into_owned()
    }

    /// Lines written so far, without the trailing newline.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.get_copy_of_buffer_as_string()
            .lines()
            .map(ToString::to_string)
            .collect()
    }

    /// Append `line` and a newline while holding the lock once, so that lines written
    /// from different threads never interleave.
    pub fn write_line(&self, line: &str) {
        let mut buffer_data = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        buffer_data.reserve(line.len() + 1);
        buffer_data.extend_from_slice(line.as_bytes());
        buffer_data.push(b'\n');
    }

    pub fn clear(&self) {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<()> { Ok(()) }
}
