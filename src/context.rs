//! The loaded, read-only state consulted by every recomputation
//!
//! A [`MortalityContext`] is built once at startup and then only read.
//! Each filter change runs `predicate -> filter -> aggregate` against it.

use std::collections::BTreeSet;
use std::time::Instant;

use chrono::Month;
use serde::Serialize;

use crate::algorithm::aggregation::{AggregateSet, CityScope};
use crate::config::{AggregateOptions, DataSources, LoaderConfig};
use crate::error::Result;
use crate::filter::{FilterPredicate, RecordView, apply_filter};
use crate::loader::{
    LoadStats, ReferenceWarning, load_cause_reference, load_geo_reference, load_records,
};
use crate::models::{CauseReference, GeoReference, MannerOfDeath, MortalityRecord, Sex};

/// References, normalized records and their load diagnostics
#[derive(Debug, Clone)]
pub struct MortalityContext {
    causes: CauseReference,
    geo: GeoReference,
    records: Vec<MortalityRecord>,
    stats: LoadStats,
    warnings: Vec<ReferenceWarning>,
}

/// Values selectable in each filter dimension
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    /// Department names present in the records, sorted
    pub departments: Vec<String>,
    /// Sexes present in the records
    pub sexes: Vec<Sex>,
    /// Months present in the records, in calendar order
    pub months: Vec<u32>,
    /// Manners of death present in the records
    pub manners: Vec<MannerOfDeath>,
}

impl MortalityContext {
    /// Load both references and the records. Fails on any fatal source error.
    pub fn load(sources: &DataSources, config: &LoaderConfig) -> Result<Self> {
        config.validate()?;
        let start = Instant::now();

        let (causes, mut warnings) = load_cause_reference(&sources.causes, config)?;
        let (geo, geo_warnings) = load_geo_reference(&sources.geo, config)?;
        warnings.extend(geo_warnings);
        let (records, stats) = load_records(&sources.records, &causes, &geo, config)?;

        log::info!(
            "Mortality context ready in {:?}: {} records, {} causes, {} municipalities",
            start.elapsed(),
            records.len(),
            causes.len(),
            geo.len()
        );
        Ok(Self {
            causes,
            geo,
            records,
            stats,
            warnings,
        })
    }

    /// Assemble a context from already built parts
    #[must_use]
    pub fn from_parts(
        causes: CauseReference,
        geo: GeoReference,
        records: Vec<MortalityRecord>,
        stats: LoadStats,
    ) -> Self {
        Self {
            causes,
            geo,
            records,
            stats,
            warnings: Vec::new(),
        }
    }

    /// Cause-of-death reference
    #[must_use]
    pub const fn causes(&self) -> &CauseReference {
        &self.causes
    }

    /// Geographic reference
    #[must_use]
    pub const fn geo(&self) -> &GeoReference {
        &self.geo
    }

    /// Every normalized record, in source order
    #[must_use]
    pub fn records(&self) -> &[MortalityRecord] {
        &self.records
    }

    /// Record load statistics
    #[must_use]
    pub const fn stats(&self) -> &LoadStats {
        &self.stats
    }

    /// Reference rows skipped or partially read
    #[must_use]
    pub fn warnings(&self) -> &[ReferenceWarning] {
        &self.warnings
    }

    /// Records matching a predicate
    #[must_use]
    pub fn filter(&self, predicate: &FilterPredicate) -> RecordView<'_> {
        apply_filter(&self.records, predicate)
    }

    /// Ranking scope implied by the predicate's department
    #[must_use]
    pub fn city_scope(&self, predicate: &FilterPredicate) -> CityScope {
        match predicate.department.as_ref() {
            None => CityScope::All,
            Some(query) => self
                .geo
                .find_department(query.as_str())
                .map_or(CityScope::Unmatched, |d| CityScope::Department(d.code)),
        }
    }

    /// Filter, then compute every aggregate of the result
    pub fn aggregate(
        &self,
        predicate: &FilterPredicate,
        options: &AggregateOptions,
    ) -> Result<AggregateSet> {
        let view = self.filter(predicate);
        AggregateSet::compute(&view, &self.geo, self.city_scope(predicate), options)
    }

    /// Values present in the records for each filter dimension
    #[must_use]
    pub fn filter_options(&self) -> FilterOptions {
        let mut departments = BTreeSet::new();
        let mut sexes = BTreeSet::new();
        let mut months = BTreeSet::new();
        let mut manners = BTreeSet::new();
        for record in &self.records {
            if let Some(name) = record.department_name() {
                departments.insert(name);
            }
            sexes.insert(record.sex);
            months.insert(record.month.number_from_month());
            manners.insert(record.manner);
        }
        FilterOptions {
            departments: departments.into_iter().map(str::to_string).collect(),
            sexes: sexes.into_iter().collect(),
            months: months.into_iter().collect(),
            manners: manners.into_iter().collect(),
        }
    }
}

/// Month of a 1-based number, for callers holding raw filter input
#[must_use]
pub fn month_from_number(number: u32) -> Option<Month> {
    u8::try_from(number).ok().and_then(|n| Month::try_from(n).ok())
}
