//! Monthly death trend

use serde::Serialize;

use crate::models::{MortalityRecord, all_months, month_label};

/// Deaths in one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyCount {
    /// Month number, 1..=12
    pub month: u32,
    /// Month name
    pub name: &'static str,
    /// Number of records
    pub deaths: usize,
}

/// Count records per month. Always twelve entries in calendar order.
pub fn monthly_trend<'a, I>(records: I) -> Vec<MonthlyCount>
where
    I: IntoIterator<Item = &'a MortalityRecord>,
{
    let mut counts = [0usize; 12];
    for record in records {
        counts[record.month.number_from_month() as usize - 1] += 1;
    }

    all_months()
        .map(|month| MonthlyCount {
            month: month.number_from_month(),
            name: month_label(month),
            deaths: counts[month.number_from_month() as usize - 1],
        })
        .collect()
}
