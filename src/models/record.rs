//! The normalized mortality record

use chrono::Month;
use std::sync::Arc;

use crate::models::reference::{CauseReference, GeoReference, ResolvedGeo};
use crate::models::types::{Age, MannerOfDeath, Sex};

/// Cause labels attached to a record after a successful join
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCause {
    /// Human readable description
    pub description: Arc<str>,
    /// Optional grouping category
    pub category: Option<Arc<str>>,
}

/// One decedent, with typed fields and optional join results
#[derive(Debug, Clone, PartialEq)]
pub struct MortalityRecord {
    /// Department code as found in the source, if numeric
    pub department_code: Option<u32>,
    /// Full DIVIPOLA municipality code, if numeric
    pub municipality_code: Option<u32>,
    /// Sex
    pub sex: Sex,
    /// Age normalized to years
    pub age: Age,
    /// Month of death
    pub month: Month,
    /// Manner of death
    pub manner: MannerOfDeath,
    /// Normalized underlying-cause code
    pub cause_code: String,
    /// Geographic join result; `None` when the codes did not resolve
    pub geo: Option<ResolvedGeo>,
    /// Cause join result; `None` when the code did not resolve
    pub cause: Option<ResolvedCause>,
}

impl MortalityRecord {
    /// Create an unresolved record. A code that cannot be composed is left unset.
    #[must_use]
    pub fn new(
        department_code: u32,
        municipality_code: u32,
        sex: Sex,
        age: Age,
        month: Month,
        manner: MannerOfDeath,
        cause_code: &str,
    ) -> Self {
        Self {
            department_code: Some(department_code),
            municipality_code: crate::utils::divipola_code(department_code, municipality_code),
            sex,
            age,
            month,
            manner,
            cause_code: crate::utils::normalize_cause_code(cause_code),
            geo: None,
            cause: None,
        }
    }

    /// Join the record against both references
    #[must_use]
    pub fn resolve(mut self, geo: &GeoReference, causes: &CauseReference) -> Self {
        self.geo = match (self.department_code, self.municipality_code) {
            (Some(department), Some(municipality)) => geo.resolve(department, municipality),
            _ => None,
        };
        self.cause = causes.get(&self.cause_code).map(|entry| ResolvedCause {
            description: Arc::clone(&entry.description),
            category: entry.category.clone(),
        });
        self
    }

    /// Department name, if the geographic join succeeded
    #[must_use]
    pub fn department_name(&self) -> Option<&str> {
        self.geo.as_ref().map(|g| &*g.department)
    }

    /// Cause description, if the cause join succeeded
    #[must_use]
    pub fn cause_description(&self) -> Option<&str> {
        self.cause.as_ref().map(|c| &*c.description)
    }
}
