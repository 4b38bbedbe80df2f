//! Core filtering functionality for normalized records
//!
//! Filtering selects references into the loaded record set; records are never
//! copied. [`RecordFilter`] is the seam for alternative selection strategies
//! (an indexed filter, for example) that keep the same contract: input
//! records in, an order-preserving subset out.

use std::collections::BTreeSet;
use std::fmt::Debug;

use crate::models::MortalityRecord;

/// Dimensions a filter can constrain
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    /// Department
    Department,
    /// Sex
    Sex,
    /// Month of death
    Month,
    /// Manner of death
    MannerOfDeath,
}

/// Trait for objects that select records
pub trait RecordFilter: Debug {
    /// Whether a single record passes the filter
    fn matches(&self, record: &MortalityRecord) -> bool;

    /// Returns the set of dimensions constrained by this filter
    fn active_dimensions(&self) -> BTreeSet<Dimension>;

    /// Whether the filter constrains nothing
    fn is_noop(&self) -> bool {
        self.active_dimensions().is_empty()
    }
}

/// A filter that always includes all records
#[derive(Debug, Clone, Copy, Default)]
pub struct IncludeAllFilter;

impl RecordFilter for IncludeAllFilter {
    fn matches(&self, _record: &MortalityRecord) -> bool {
        true
    }

    fn active_dimensions(&self) -> BTreeSet<Dimension> {
        BTreeSet::new()
    }
}

/// An ordered selection of borrowed records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordView<'a> {
    records: Vec<&'a MortalityRecord>,
}

impl<'a> RecordView<'a> {
    /// A view over every record, in source order
    #[must_use]
    pub fn all(records: &'a [MortalityRecord]) -> Self {
        Self {
            records: records.iter().collect(),
        }
    }

    /// Number of selected records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing was selected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over the selected records
    pub fn iter(&self) -> impl Iterator<Item = &'a MortalityRecord> + '_ {
        self.records.iter().copied()
    }

    /// The selected records as a slice of references
    #[must_use]
    pub fn as_slice(&self) -> &[&'a MortalityRecord] {
        &self.records
    }

    /// Narrow this view with another filter
    #[must_use]
    pub fn refine<F: RecordFilter + ?Sized>(&self, filter: &F) -> Self {
        apply_filter(self, filter)
    }
}

impl<'a> FromIterator<&'a MortalityRecord> for RecordView<'a> {
    fn from_iter<I: IntoIterator<Item = &'a MortalityRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'v, 'a> IntoIterator for &'v RecordView<'a> {
    type Item = &'a MortalityRecord;
    type IntoIter = std::iter::Copied<std::slice::Iter<'v, &'a MortalityRecord>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter().copied()
    }
}

/// Select the records passing a filter, in input order.
///
/// A filter with no active dimension returns every input record unchanged.
/// Runs as a single linear pass.
pub fn apply_filter<'a, I, F>(records: I, filter: &F) -> RecordView<'a>
where
    I: IntoIterator<Item = &'a MortalityRecord>,
    F: RecordFilter + ?Sized,
{
    if filter.is_noop() {
        return records.into_iter().collect();
    }
    records
        .into_iter()
        .filter(|record| filter.matches(record))
        .collect()
}
