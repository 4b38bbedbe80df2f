//! Data-quality accounting for the record loader

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Why a row was dropped from the record set
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    /// The row could not be read as a delimited record
    MalformedRow,
    /// Month missing or outside 1..=12
    InvalidMonth,
    /// Manner of death blank
    MissingMannerOfDeath,
}

/// Kind of a sampled row defect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Row dropped
    Excluded(ExclusionReason),
    /// Department/municipality codes did not resolve
    UnresolvedGeo,
    /// Cause code did not resolve
    UnresolvedCause,
    /// Age placed in the invalid bucket
    InvalidAge,
}

/// A sampled row defect, for diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowIssue {
    /// Line number in the source
    pub line: u64,
    /// What was wrong
    pub kind: IssueKind,
    /// The offending raw value
    pub value: String,
}

/// Counters collected while loading records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    /// Data rows read from the source
    pub total_rows: usize,
    /// Rows dropped from the record set
    pub excluded_rows: usize,
    /// Kept rows whose geographic codes did not resolve
    pub unresolved_geo_rows: usize,
    /// Kept rows whose cause code did not resolve
    pub unresolved_cause_rows: usize,
    /// Kept rows whose age fell into the invalid bucket
    pub invalid_age_rows: usize,
    /// Kept rows with an unrecognized sex value
    pub unknown_sex_rows: usize,
    /// Kept rows with an unrecognized manner of death
    pub other_manner_rows: usize,
    /// Dropped rows per reason
    pub exclusions: BTreeMap<ExclusionReason, usize>,
    /// First defects encountered, capped by configuration
    pub issues: Vec<RowIssue>,
}

impl LoadStats {
    /// Rows present in the record set
    #[must_use]
    pub const fn loaded_rows(&self) -> usize {
        self.total_rows.saturating_sub(self.excluded_rows)
    }

    /// Whether any defect was seen
    #[must_use]
    pub fn has_defects(&self) -> bool {
        self.excluded_rows > 0
            || self.unresolved_geo_rows > 0
            || self.unresolved_cause_rows > 0
            || self.invalid_age_rows > 0
    }

    /// Count an excluded row
    pub(crate) fn exclude(&mut self, reason: ExclusionReason, line: u64, value: &str, cap: usize) {
        self.excluded_rows += 1;
        *self.exclusions.entry(reason).or_insert(0) += 1;
        self.sample(IssueKind::Excluded(reason), line, value, cap);
    }

    /// Keep a defect sample unless the cap is reached
    pub(crate) fn sample(&mut self, kind: IssueKind, line: u64, value: &str, cap: usize) {
        if self.issues.len() < cap {
            self.issues.push(RowIssue {
                line,
                kind,
                value: value.to_string(),
            });
        }
    }
}

impl fmt::Display for LoadStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} rows loaded",
            self.loaded_rows(),
            self.total_rows
        )?;
        if self.excluded_rows > 0 {
            let reasons = self
                .exclusions
                .iter()
                .map(|(reason, count)| format!("{reason:?}: {count}"))
                .collect::<Vec<_>>()
                .join(", ");
            write!(f, "; {} excluded ({reasons})", self.excluded_rows)?;
        }
        if self.unresolved_geo_rows > 0 {
            write!(
                f,
                "; {} without a known municipality (left out of maps and city rankings)",
                self.unresolved_geo_rows
            )?;
        }
        if self.unresolved_cause_rows > 0 {
            write!(
                f,
                "; {} with an unknown cause code",
                self.unresolved_cause_rows
            )?;
        }
        if self.invalid_age_rows > 0 {
            write!(f, "; {} with an invalid age", self.invalid_age_rows)?;
        }
        Ok(())
    }
}
