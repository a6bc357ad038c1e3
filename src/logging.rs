//! File logging bootstrap.
//!
//! The terminal belongs to the UI, so log records go to a rotating file under
//! `<data_dir>/logs`. Initialisation happens once per process; later calls
//! are no-ops.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;
use std::path::Path;
use std::sync::OnceLock;

const LOG_FILE_BASENAME: &str = "syltrack";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 2 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

static LOGGER: OnceLock<LoggerHandle> = OnceLock::new();

/// Starts file logging at `level` (`error`..`trace`) in `data_dir/logs`.
pub fn init_logging(level: &str, data_dir: &Path) -> anyhow::Result<()> {
    if LOGGER.get().is_some() {
        return Ok(());
    }

    let log_dir = data_dir.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let handle = Logger::try_with_str(level)?
        .log_to_file(
            FileSpec::default()
                .directory(&log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()?;

    if LOGGER.set(handle).is_ok() {
        info!(
            "syltrack {} starting, level={} log_dir={}",
            env!("CARGO_PKG_VERSION"),
            level,
            log_dir.display()
        );
    }
    Ok(())
}
