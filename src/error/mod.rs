//! Error handling for mortality data loading and aggregation.
//!
//! Only fatal conditions are represented here. Per-row data defects never
//! surface as errors; they are counted in [`crate::loader::LoadStats`].

pub mod util;

use std::io;
use std::path::PathBuf;

/// Specialized error type for loading and aggregating mortality data
#[derive(Debug, thiserror::Error)]
pub enum MortalityError {
    /// A source file is missing or cannot be opened
    #[error("{source_name} source unavailable at {}: {source}", .path.display())]
    SourceUnavailable {
        /// Logical name of the source (records, causes, geo)
        source_name: String,
        /// Path that was attempted
        path: PathBuf,
        /// Underlying I/O failure
        source: io::Error,
    },

    /// A required column is absent from a source header
    #[error("Schema error in {source_name} source: missing required column '{column}'")]
    Schema {
        /// Logical name of the source
        source_name: String,
        /// Configured name of the missing column
        column: String,
    },

    /// A reference table contains the same key twice
    #[error("Duplicate key '{key}' in {source_name} reference")]
    DuplicateKey {
        /// Logical name of the reference source
        source_name: String,
        /// The colliding key, as normalized for the join
        key: String,
    },

    /// The delimited reader failed before any row could be read
    #[error("CSV error in {source_name} source: {source}")]
    Csv {
        /// Logical name of the source
        source_name: String,
        /// Underlying reader failure
        source: csv::Error,
    },

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),
}

impl MortalityError {
    /// Create a schema error for a missing column
    pub fn schema(source_name: impl Into<String>, column: impl Into<String>) -> Self {
        Self::Schema {
            source_name: source_name.into(),
            column: column.into(),
        }
    }

    /// Create a duplicate key error
    pub fn duplicate_key(source_name: impl Into<String>, key: impl Into<String>) -> Self {
        Self::DuplicateKey {
            source_name: source_name.into(),
            key: key.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether this error comes from opening or reading a source
    #[must_use]
    pub fn is_source_error(&self) -> bool {
        matches!(
            self,
            Self::SourceUnavailable { .. } | Self::Schema { .. } | Self::Csv { .. }
        )
    }
}

/// Result type for mortality operations
pub type Result<T> = std::result::Result<T, MortalityError>;
