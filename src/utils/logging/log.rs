//! Standardized log lines for source loading
//!
//! Every loader reports through these so the startup log reads the same for
//! all three sources.

use std::fmt::Display;
use std::path::Path;
use std::time::Duration;

/// Log the start of a source load
///
/// # Arguments
/// * `source_name` - Logical source name (records, causes, geo)
/// * `path` - Path being read
pub fn log_source_start(source_name: &str, path: &Path) {
    log::info!("Loading {source_name} source from {}", path.display());
}

/// Log a completed source load
///
/// # Arguments
/// * `source_name` - Logical source name
/// * `path` - Path that was read
/// * `entries` - Rows or keys retained
/// * `elapsed` - Time spent reading
pub fn log_source_complete(source_name: &str, path: &Path, entries: usize, elapsed: Duration) {
    log::info!(
        "Loaded {entries} {source_name} entries from {} in {elapsed:?}",
        path.display()
    );
}

/// Log a data-quality summary at warn level
pub fn log_data_quality(source_name: &str, summary: &impl Display, path: Option<&Path>) {
    match path {
        Some(path) => log::warn!("Data quality of {source_name} ({}): {summary}", path.display()),
        None => log::warn!("Data quality of {source_name}: {summary}"),
    }
}

/// Log a warning, optionally tied to a path
pub fn log_warning(message: &str, path: Option<&Path>) {
    if let Some(path) = path {
        log::warn!("{}: {}", message, path.display());
    } else {
        log::warn!("{message}");
    }
}
