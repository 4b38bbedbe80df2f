//! Logging utilities for output and progress tracking
//!
//! This module provides standardized log lines for source loading and a
//! progress spinner for the record pass.

pub mod log;
pub mod progress;

// Re-export commonly used functions for convenience
pub use self::log::{log_data_quality, log_source_complete, log_source_start, log_warning};
pub use self::progress::RowProgress;
