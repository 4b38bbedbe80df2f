//! Progress reporting for the record pass
//!
//! Uses the indicatif crate. A disabled spinner is hidden, so the loader can
//! tick it unconditionally.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Template for the row spinner
pub const ROW_SPINNER_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] {pos} rows ({per_sec}) {msg}";

/// Spinner counting rows read from a source
#[derive(Debug)]
pub struct RowProgress {
    bar: ProgressBar,
}

impl RowProgress {
    /// Create the spinner. `enabled == false` yields a hidden one.
    #[must_use]
    pub fn new(enabled: bool, source_name: &str) -> Self {
        if !enabled {
            return Self {
                bar: ProgressBar::hidden(),
            };
        }
        let bar = ProgressBar::new_spinner().with_style(
            ProgressStyle::default_spinner()
                .template(ROW_SPINNER_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(format!("reading {source_name}"));
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar }
    }

    /// Count one row
    pub fn row(&self) {
        self.bar.inc(1);
    }

    /// Rows counted so far
    #[must_use]
    pub fn rows(&self) -> u64 {
        self.bar.position()
    }

    /// Stop the spinner, leaving a summary line
    pub fn finish(self, kept: usize) {
        let read = self.rows();
        self.bar
            .finish_with_message(format!("{kept} of {read} rows kept"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_spinner_still_counts() {
        let progress = RowProgress::new(false, "records");
        progress.row();
        progress.row();
        assert_eq!(progress.rows(), 2);
        progress.finish(1);
    }
}
