//! Deaths by sex per department

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::models::{MortalityRecord, Sex};

/// Paired sex counts of one department
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentSexCounts {
    /// DIVIPOLA department code
    pub department_code: u32,
    /// Department name
    pub department: String,
    /// Male decedents
    pub male: usize,
    /// Female decedents
    pub female: usize,
    /// Decedents of unknown sex
    pub unknown: usize,
}

impl DepartmentSexCounts {
    /// Count for one sex
    #[must_use]
    pub const fn count(&self, sex: Sex) -> usize {
        match sex {
            Sex::Male => self.male,
            Sex::Female => self.female,
            Sex::Unknown => self.unknown,
        }
    }

    /// All records of the department
    #[must_use]
    pub const fn total(&self) -> usize {
        self.male + self.female + self.unknown
    }
}

/// Count records per department and sex, ordered by department name.
///
/// Every sex appears for every listed department, with 0 where absent.
pub fn sex_counts_by_department<'a, I>(records: I) -> Vec<DepartmentSexCounts>
where
    I: IntoIterator<Item = &'a MortalityRecord>,
{
    let mut groups: BTreeMap<u32, (Arc<str>, [usize; 3])> = BTreeMap::new();
    for record in records {
        let Some(geo) = record.geo.as_ref() else {
            continue;
        };
        let slot = match record.sex {
            Sex::Male => 0,
            Sex::Female => 1,
            Sex::Unknown => 2,
        };
        groups
            .entry(geo.department_code)
            .or_insert_with(|| (Arc::clone(&geo.department), [0; 3]))
            .1[slot] += 1;
    }

    let mut rows: Vec<DepartmentSexCounts> = groups
        .into_iter()
        .map(|(department_code, (name, [male, female, unknown]))| DepartmentSexCounts {
            department_code,
            department: name.to_string(),
            male,
            female,
            unknown,
        })
        .collect();
    rows.sort_by(|a, b| {
        a.department
            .cmp(&b.department)
            .then(a.department_code.cmp(&b.department_code))
    });
    rows
}
