//! Utility functions for error handling
//!
//! This module turns I/O failures on source files into [`MortalityError`]
//! values that name the offending source.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{MortalityError, Result};

/// Safely open a source file with rich error information
///
/// # Arguments
/// * `path` - The path to the file to open
/// * `source_name` - Logical name of the source (for error context)
///
/// # Returns
/// * `Result<fs::File>` - The opened file or a `SourceUnavailable` error
pub fn safe_open_file(path: &Path, source_name: &str) -> Result<fs::File> {
    let unavailable = |source: io::Error| MortalityError::SourceUnavailable {
        source_name: source_name.to_string(),
        path: path.to_path_buf(),
        source,
    };

    if !path.exists() {
        return Err(unavailable(io::Error::new(
            io::ErrorKind::NotFound,
            "file not found",
        )));
    }

    if !path.is_file() {
        return Err(unavailable(io::Error::new(
            io::ErrorKind::InvalidInput,
            "path is not a file",
        )));
    }

    match fs::File::open(path) {
        Ok(file) => Ok(file),
        Err(e) => {
            if e.kind() == io::ErrorKind::PermissionDenied {
                log::error!(
                    "Permission denied opening {source_name} source {}",
                    path.display()
                );
            }
            Err(unavailable(e))
        }
    }
}

/// Wrap a reader construction failure with the source name
pub fn csv_error(source_name: &str, source: csv::Error) -> MortalityError {
    MortalityError::Csv {
        source_name: source_name.to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_source_unavailable() {
        let err = safe_open_file(Path::new("/definitely/not/here.csv"), "records").unwrap_err();
        match err {
            MortalityError::SourceUnavailable {
                source_name, path, ..
            } => {
                assert_eq!(source_name, "records");
                assert_eq!(path, Path::new("/definitely/not/here.csv"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn directory_is_not_a_source() {
        let dir = std::env::temp_dir();
        let err = safe_open_file(&dir, "geo").unwrap_err();
        assert!(err.is_source_error());
        assert!(err.to_string().contains("geo source unavailable"));
    }
}
