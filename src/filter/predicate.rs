//! The dashboard filter predicate

use std::collections::BTreeSet;

use chrono::Month;

use crate::filter::core::{Dimension, RecordFilter};
use crate::models::{MannerOfDeath, MortalityRecord, Sex};
use crate::utils::{matches_normalized, normalize_text, parse_code};

/// Department constraint: a name or a numeric DIVIPOLA code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentQuery {
    raw: String,
    normalized: String,
    code: Option<u32>,
}

impl DepartmentQuery {
    /// Parse a department name or code
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self {
            raw: raw.trim().to_string(),
            normalized: normalize_text(raw),
            code: parse_code(raw),
        }
    }

    /// The query as entered
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The numeric code, when the query is one
    #[must_use]
    pub const fn code(&self) -> Option<u32> {
        self.code
    }

    /// Only records with a resolved department can match
    #[must_use]
    pub fn matches(&self, record: &MortalityRecord) -> bool {
        let Some(geo) = record.geo.as_ref() else {
            return false;
        };
        match self.code {
            Some(code) => geo.department_code == code,
            None => matches_normalized(&geo.department, &self.normalized),
        }
    }
}

/// Conjunction of optional constraints. An absent field does not constrain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPredicate {
    /// Department name or numeric code
    pub department: Option<DepartmentQuery>,
    /// Sex
    pub sex: Option<Sex>,
    /// Month of death
    pub month: Option<Month>,
    /// Manner of death
    pub manner: Option<MannerOfDeath>,
}

impl FilterPredicate {
    /// The predicate that constrains nothing
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Constrain the department by name or code
    #[must_use]
    pub fn with_department(mut self, department: &str) -> Self {
        self.department = Some(DepartmentQuery::new(department));
        self
    }

    /// Constrain the sex
    #[must_use]
    pub fn with_sex(mut self, sex: Sex) -> Self {
        self.sex = Some(sex);
        self
    }

    /// Constrain the month
    #[must_use]
    pub fn with_month(mut self, month: Month) -> Self {
        self.month = Some(month);
        self
    }

    /// Constrain the manner of death
    #[must_use]
    pub fn with_manner(mut self, manner: MannerOfDeath) -> Self {
        self.manner = Some(manner);
        self
    }
}

impl RecordFilter for FilterPredicate {
    fn matches(&self, record: &MortalityRecord) -> bool {
        self.sex.is_none_or(|sex| record.sex == sex)
            && self.month.is_none_or(|month| record.month == month)
            && self.manner.is_none_or(|manner| record.manner == manner)
            && self
                .department
                .as_ref()
                .is_none_or(|query| query.matches(record))
    }

    fn active_dimensions(&self) -> BTreeSet<Dimension> {
        let mut dimensions = BTreeSet::new();
        if self.department.is_some() {
            dimensions.insert(Dimension::Department);
        }
        if self.sex.is_some() {
            dimensions.insert(Dimension::Sex);
        }
        if self.month.is_some() {
            dimensions.insert(Dimension::Month);
        }
        if self.manner.is_some() {
            dimensions.insert(Dimension::MannerOfDeath);
        }
        dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Age, ResolvedGeo};
    use std::sync::Arc;

    fn record_in(department: &str) -> MortalityRecord {
        let mut record = MortalityRecord::new(
            11,
            1,
            Sex::Female,
            Age::Years(40.0),
            Month::March,
            MannerOfDeath::Natural,
            "I219",
        );
        record.geo = Some(ResolvedGeo {
            department_code: 11,
            department: Arc::from(department),
            municipality_code: 11001,
            municipality: Arc::from("Bogotá, D.C."),
        });
        record
    }

    #[test]
    fn test_department_query() {
        let record = record_in("Bogotá,  D.C.");
        assert!(DepartmentQuery::new(" bogotá, d.c. ").matches(&record));
        assert!(DepartmentQuery::new("11").matches(&record));
        assert!(!DepartmentQuery::new("Antioquia").matches(&record));

        let mut unresolved = record.clone();
        unresolved.geo = None;
        assert!(!DepartmentQuery::new("11").matches(&unresolved));
    }

    #[test]
    fn test_conjunction() {
        let record = record_in("Bogotá, D.C.");
        let predicate = FilterPredicate::empty()
            .with_sex(Sex::Female)
            .with_month(Month::March);
        assert!(predicate.matches(&record));
        assert!(!predicate.clone().with_manner(MannerOfDeath::Homicide).matches(&record));
        assert_eq!(predicate.active_dimensions().len(), 2);
        assert!(FilterPredicate::empty().is_noop());
    }
}
