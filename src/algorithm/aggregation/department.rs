//! Death counts per department

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::config::DepartmentOrder;
use crate::models::MortalityRecord;

/// Deaths recorded in one department
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentCount {
    /// DIVIPOLA department code
    pub department_code: u32,
    /// Department name
    pub department: String,
    /// Number of records
    pub deaths: usize,
}

/// Count records per department.
///
/// Records without a resolved municipality are left out. Only departments
/// with at least one record appear.
pub fn department_counts<'a, I>(records: I, order: DepartmentOrder) -> Vec<DepartmentCount>
where
    I: IntoIterator<Item = &'a MortalityRecord>,
{
    let mut groups: BTreeMap<u32, (Arc<str>, usize)> = BTreeMap::new();
    for geo in records.into_iter().filter_map(|r| r.geo.as_ref()) {
        groups
            .entry(geo.department_code)
            .or_insert_with(|| (Arc::clone(&geo.department), 0))
            .1 += 1;
    }

    let mut counts: Vec<DepartmentCount> = groups
        .into_iter()
        .map(|(department_code, (name, deaths))| DepartmentCount {
            department_code,
            department: name.to_string(),
            deaths,
        })
        .collect();

    match order {
        DepartmentOrder::Name => counts.sort_by(|a, b| {
            a.department
                .cmp(&b.department)
                .then(a.department_code.cmp(&b.department_code))
        }),
        DepartmentOrder::CountDescending => counts.sort_by(|a, b| {
            b.deaths
                .cmp(&a.deaths)
                .then_with(|| a.department.cmp(&b.department))
                .then(a.department_code.cmp(&b.department_code))
        }),
    }
    counts
}
