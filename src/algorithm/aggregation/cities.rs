//! Per-capita city rankings
//!
//! Rates are deaths per 100,000 inhabitants. A municipality without a
//! positive population has no rate and never appears in a ranking; that
//! only affects its own eligibility.

use std::cmp::Ordering;

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::models::{GeoReference, MannerOfDeath, MortalityRecord, Municipality};

/// Population multiplier of the rates
pub const RATE_SCALE: f64 = 100_000.0;

/// Which municipalities compete in a ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CityScope {
    /// Every municipality of the reference
    #[default]
    All,
    /// Municipalities of one department
    Department(u32),
    /// No municipality (the department filter matched nothing)
    Unmatched,
}

impl CityScope {
    fn contains(self, municipality: &Municipality) -> bool {
        match self {
            Self::All => true,
            Self::Department(code) => municipality.department_code == code,
            Self::Unmatched => false,
        }
    }
}

/// One ranked municipality
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityRate {
    /// Full DIVIPOLA code
    pub municipality_code: u32,
    /// Municipality name
    pub municipality: String,
    /// Department name
    pub department: String,
    /// Qualifying deaths
    pub deaths: usize,
    /// Reference population
    pub population: u64,
    /// Deaths per 100,000 inhabitants
    pub rate_per_100k: f64,
}

/// Deaths per 100,000 inhabitants
#[must_use]
pub fn rate_per_100k(deaths: usize, population: u64) -> f64 {
    deaths as f64 / population as f64 * RATE_SCALE
}

fn count_by_municipality<'a, I>(
    records: I,
    qualifies: impl Fn(&MortalityRecord) -> bool,
) -> FxHashMap<u32, usize>
where
    I: IntoIterator<Item = &'a MortalityRecord>,
{
    let mut counts = FxHashMap::default();
    for record in records {
        if let Some(geo) = record.geo.as_ref()
            && qualifies(record)
        {
            *counts.entry(geo.municipality_code).or_insert(0) += 1;
        }
    }
    counts
}

fn city_rate(geo: &GeoReference, municipality: &Municipality, deaths: usize) -> Option<CityRate> {
    let population = municipality.rate_population()?;
    let department = geo
        .department(municipality.department_code)
        .map(|d| d.name.to_string())
        .unwrap_or_default();
    Some(CityRate {
        municipality_code: municipality.code,
        municipality: municipality.name.to_string(),
        department,
        deaths,
        population,
        rate_per_100k: rate_per_100k(deaths, population),
    })
}

fn by_name(a: &CityRate, b: &CityRate) -> Ordering {
    a.municipality
        .cmp(&b.municipality)
        .then(a.municipality_code.cmp(&b.municipality_code))
}

/// Municipalities with the highest homicide rate.
///
/// Only municipalities with at least one homicide compete. Ties go to the
/// higher homicide count, then to the municipality name.
pub fn top_homicide_rate_cities<'a, I>(
    records: I,
    geo: &GeoReference,
    scope: CityScope,
    limit: usize,
) -> Vec<CityRate>
where
    I: IntoIterator<Item = &'a MortalityRecord>,
{
    let counts = count_by_municipality(records, |r| r.manner == MannerOfDeath::Homicide);

    let mut ranking: Vec<CityRate> = counts
        .into_iter()
        .filter_map(|(code, deaths)| {
            let municipality = geo.municipality(code)?;
            if !scope.contains(municipality) {
                return None;
            }
            city_rate(geo, municipality, deaths)
        })
        .collect();

    ranking.sort_by(|a, b| {
        b.rate_per_100k
            .total_cmp(&a.rate_per_100k)
            .then(b.deaths.cmp(&a.deaths))
            .then_with(|| by_name(a, b))
    });
    ranking.truncate(limit);
    ranking
}

/// Municipalities with the lowest overall mortality rate.
///
/// Every municipality in scope with a known population competes, including
/// those without a single record (rate 0). Ties go to the lower death count,
/// then to the municipality name.
pub fn lowest_mortality_rate_cities<'a, I>(
    records: I,
    geo: &GeoReference,
    scope: CityScope,
    limit: usize,
) -> Vec<CityRate>
where
    I: IntoIterator<Item = &'a MortalityRecord>,
{
    let counts = count_by_municipality(records, |_| true);

    let mut ranking: Vec<CityRate> = geo
        .municipalities()
        .filter(|m| scope.contains(m))
        .filter_map(|m| city_rate(geo, m, counts.get(&m.code).copied().unwrap_or(0)))
        .collect();

    ranking.sort_by(|a, b| {
        a.rate_per_100k
            .total_cmp(&b.rate_per_100k)
            .then(a.deaths.cmp(&b.deaths))
            .then_with(|| by_name(a, b))
    });
    ranking.truncate(limit);
    ranking
}
