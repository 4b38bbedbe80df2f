//! Leading causes of death

use std::sync::Arc;

use itertools::Itertools;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::models::MortalityRecord;

/// Deaths attributed to one cause description
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CauseCount {
    /// Resolved cause description
    pub description: String,
    /// Number of records
    pub deaths: usize,
}

/// Count records per resolved cause description.
///
/// Records whose cause code did not resolve are left out. Sorted by count
/// descending, then description ascending; `limit` truncates when given.
pub fn top_causes<'a, I>(records: I, limit: Option<usize>) -> Vec<CauseCount>
where
    I: IntoIterator<Item = &'a MortalityRecord>,
{
    let mut counts: FxHashMap<Arc<str>, usize> = FxHashMap::default();
    for cause in records.into_iter().filter_map(|r| r.cause.as_ref()) {
        *counts.entry(Arc::clone(&cause.description)).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .sorted_by(|(a_desc, a_count), (b_desc, b_count)| {
            b_count.cmp(a_count).then_with(|| a_desc.cmp(b_desc))
        })
        .take(limit.unwrap_or(usize::MAX))
        .map(|(description, deaths)| CauseCount {
            description: description.to_string(),
            deaths,
        })
        .collect()
}
