//! Aggregation engine
//!
//! Every aggregate is a pure function of a record sequence and tolerates an
//! empty input. [`AggregateSet`] computes all seven for one filtered view,
//! sequentially or on the rayon pool, with identical results.

pub mod age;
pub mod causes;
pub mod cities;
pub mod department;
pub mod gender;
pub mod monthly;

use serde::Serialize;

use crate::config::AggregateOptions;
use crate::error::Result;
use crate::filter::RecordView;
use crate::models::GeoReference;

pub use age::{AgeBins, AgeBucket, AgeHistogram, age_histogram};
pub use causes::{CauseCount, top_causes};
pub use cities::{
    CityRate, CityScope, RATE_SCALE, lowest_mortality_rate_cities, rate_per_100k,
    top_homicide_rate_cities,
};
pub use department::{DepartmentCount, department_counts};
pub use gender::{DepartmentSexCounts, sex_counts_by_department};
pub use monthly::{MonthlyCount, monthly_trend};

/// The seven dashboard aggregates of one filtered view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateSet {
    /// Records in the view
    pub record_count: usize,
    /// Records in the view left out of geographic aggregates
    pub unresolved_geo: usize,
    /// Records in the view left out of the cause table
    pub unresolved_cause: usize,
    /// Deaths per department
    pub department_counts: Vec<DepartmentCount>,
    /// Deaths per month
    pub monthly_trend: Vec<MonthlyCount>,
    /// Age distribution
    pub age_histogram: AgeHistogram,
    /// Highest homicide rates
    pub top_homicide_rate_cities: Vec<CityRate>,
    /// Lowest overall mortality rates
    pub lowest_mortality_rate_cities: Vec<CityRate>,
    /// Deaths by sex per department
    pub sex_by_department: Vec<DepartmentSexCounts>,
    /// Leading causes of death
    pub top_causes: Vec<CauseCount>,
}

impl AggregateSet {
    /// Compute every aggregate of a view
    pub fn compute(
        view: &RecordView<'_>,
        geo: &GeoReference,
        scope: CityScope,
        options: &AggregateOptions,
    ) -> Result<Self> {
        let bins = AgeBins::from_options(options)?;
        let set = if options.parallel {
            Self::parallel(view, geo, scope, options, &bins)
        } else {
            Self::sequential(view, geo, scope, options, &bins)
        };

        log::debug!(
            "Computed aggregates over {} records ({} without geography)",
            set.record_count,
            set.unresolved_geo
        );
        Ok(set)
    }

    fn sequential(
        view: &RecordView<'_>,
        geo: &GeoReference,
        scope: CityScope,
        options: &AggregateOptions,
        bins: &AgeBins,
    ) -> Self {
        let (unresolved_geo, unresolved_cause) = unresolved_counts(view);
        Self {
            record_count: view.len(),
            unresolved_geo,
            unresolved_cause,
            department_counts: department_counts(view, options.department_order),
            monthly_trend: monthly_trend(view),
            age_histogram: age_histogram(view, bins),
            top_homicide_rate_cities: top_homicide_rate_cities(view, geo, scope, options.top_cities),
            lowest_mortality_rate_cities: lowest_mortality_rate_cities(
                view,
                geo,
                scope,
                options.top_cities,
            ),
            sex_by_department: sex_counts_by_department(view),
            top_causes: top_causes(view, Some(options.top_causes)),
        }
    }

    fn parallel(
        view: &RecordView<'_>,
        geo: &GeoReference,
        scope: CityScope,
        options: &AggregateOptions,
        bins: &AgeBins,
    ) -> Self {
        let (counts, (distributions, rankings)) = rayon::join(
            || {
                rayon::join(
                    || unresolved_counts(view),
                    || {
                        rayon::join(
                            || department_counts(view, options.department_order),
                            || monthly_trend(view),
                        )
                    },
                )
            },
            || {
                rayon::join(
                    || rayon::join(|| age_histogram(view, bins), || sex_counts_by_department(view)),
                    || {
                        rayon::join(
                            || {
                                rayon::join(
                                    || top_homicide_rate_cities(view, geo, scope, options.top_cities),
                                    || lowest_mortality_rate_cities(view, geo, scope, options.top_cities),
                                )
                            },
                            || top_causes(view, Some(options.top_causes)),
                        )
                    },
                )
            },
        );
        let ((unresolved_geo, unresolved_cause), (department_counts, monthly_trend)) = counts;
        let (age_histogram, sex_by_department) = distributions;
        let ((top_homicide_rate_cities, lowest_mortality_rate_cities), top_causes) = rankings;

        Self {
            record_count: view.len(),
            unresolved_geo,
            unresolved_cause,
            department_counts,
            monthly_trend,
            age_histogram,
            top_homicide_rate_cities,
            lowest_mortality_rate_cities,
            sex_by_department,
            top_causes,
        }
    }
}

/// Records lacking the geographic join and the cause join, respectively
fn unresolved_counts(view: &RecordView<'_>) -> (usize, usize) {
    view.iter().fold((0, 0), |(geo, cause), record| {
        (
            geo + usize::from(record.geo.is_none()),
            cause + usize::from(record.cause.is_none()),
        )
    })
}
