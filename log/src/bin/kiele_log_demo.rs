// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::path::PathBuf;

use kiele_log::{ColorChoice, DisplayPreference, LogLevel, disable_all_output,
                disable_console_output, disable_file_output, enable_file_output,
                get_module_logger, get_root_logger, global_registry,
                try_initialize_logging_global};

/// Walks through the logger API on the global registry, and prints to `stdout` and
/// `stderr`. There is no easy way to test those without spawning a new process, so the
/// `assert_cmd` tests in `public_api.rs` run this binary.
///
/// It takes 1 argument, the mode:
/// - `stdout` (default): root and module logger on the console, plus a temporary debug
///   log file that is removed again.
/// - `stderr`: same console lines, on `stderr`.
/// - `worker`: lines logged from worker threads, each with its own tag.
/// - `tracing`: lines logged with the [`tracing`] macros.
/// - `silent`: all output disabled, nothing is printed.
///
/// The optional 2nd argument is the path of the temporary log file.
///
/// See:
/// 1. Test module: `test_kiele_log_demo_stdio` in `public_api.rs`
/// 2. Binary under test: `kiele_log_demo.rs` <- you are here
/// 3. `assert_cmd` : <https://docs.rs/assert_cmd/latest/assert_cmd/index.html>
fn main() -> miette::Result<()> {
    let mode = std::env::args().nth(1).unwrap_or_default();
    let log_file_path = std::env::args()
        .nth(2)
        .map_or_else(|| std::env::temp_dir().join("test-module-log.log"), PathBuf::from);

    let root_logger = get_root_logger();
    let module_logger = get_module_logger(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/src/bin/kiele_log_demo.rs"
    ))?;

    match mode.as_str() {
        "stderr" => {
            disable_console_output(None);
            global_registry().enable_console_output_with(
                None,
                DisplayPreference::Stderr,
                ColorChoice::Auto,
                LogLevel::Info,
            );
        }
        "silent" => disable_all_output(None),
        _ => {}
    }

    root_logger.info("This is root logger's info.");
    module_logger.info("This is module logger's info.");

    match mode.as_str() {
        "worker" => {
            let threads: Vec<_> = (1..=3)
                .map(|index| {
                    let worker_logger = module_logger.for_worker(format!("w{index}"));
                    std::thread::spawn(move || worker_logger.info("working..."))
                })
                .collect();
            for thread in threads {
                let _ = thread.join();
            }
        }
        "tracing" => {
            try_initialize_logging_global(global_registry(), LogLevel::Debug)?;
            tracing::info!(target: "kiele.tracing", "from the tracing macros");
            tracing::warn!(target: "kiele.tracing", worker = "w1", "from a worker");
        }
        _ => {
            enable_file_output(Some(&module_logger), Some(&log_file_path), LogLevel::Debug)?;
            module_logger.debug("debugging...");
            disable_file_output(Some(&module_logger), Some(&log_file_path));
        }
    }

    module_logger.info("debug is finished.");
    root_logger.error("This is root logger's error.");

    global_registry().shutdown();
    Ok(())
}
