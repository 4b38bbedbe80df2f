//! Age distribution histogram
//!
//! Fixed-width bins cover `[0, domain_max)`, followed by one open-ended bin
//! for `domain_max` and above. Invalid ages are counted separately and never
//! land in a bin.

use serde::Serialize;

use crate::config::AggregateOptions;
use crate::error::Result;
use crate::models::MortalityRecord;

/// Layout of the age bins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeBins {
    width: u32,
    domain_max: u32,
}

impl AgeBins {
    /// Bins as configured, validated
    pub fn from_options(options: &AggregateOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            width: options.age_bin_width,
            domain_max: options.age_domain_max,
        })
    }

    /// Number of bins, including the open-ended one
    #[must_use]
    pub const fn len(&self) -> usize {
        (self.domain_max / self.width) as usize + 1
    }

    /// Always false; there is at least the open-ended bin
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Bin index of a valid age
    #[must_use]
    pub fn index_of(&self, years: f64) -> usize {
        let idx = (years / f64::from(self.width)).floor() as usize;
        idx.min(self.len() - 1)
    }

    fn bucket(&self, idx: usize, deaths: usize) -> AgeBucket {
        let lower = idx as u32 * self.width;
        if lower >= self.domain_max {
            AgeBucket {
                label: format!("{lower}+"),
                lower,
                upper: None,
                deaths,
            }
        } else {
            let upper = lower + self.width;
            AgeBucket {
                label: format!("{lower}-{}", upper - 1),
                lower,
                upper: Some(upper),
                deaths,
            }
        }
    }
}

impl Default for AgeBins {
    fn default() -> Self {
        Self {
            width: 10,
            domain_max: 120,
        }
    }
}

/// One histogram bin
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgeBucket {
    /// Display label, e.g. `30-39` or `120+`
    pub label: String,
    /// Inclusive lower bound in years
    pub lower: u32,
    /// Exclusive upper bound in years; `None` for the open-ended bin
    pub upper: Option<u32>,
    /// Number of records
    pub deaths: usize,
}

/// Age histogram with its separate invalid bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgeHistogram {
    /// Bins in ascending age order
    pub buckets: Vec<AgeBucket>,
    /// Records whose age was invalid
    pub invalid: usize,
}

impl AgeHistogram {
    /// Records placed in a valid bin
    #[must_use]
    pub fn valid_total(&self) -> usize {
        self.buckets.iter().map(|b| b.deaths).sum()
    }
}

/// Bucket records by normalized age
pub fn age_histogram<'a, I>(records: I, bins: &AgeBins) -> AgeHistogram
where
    I: IntoIterator<Item = &'a MortalityRecord>,
{
    let mut counts = vec![0usize; bins.len()];
    let mut invalid = 0;
    for record in records {
        match record.age.years() {
            Some(years) => counts[bins.index_of(years)] += 1,
            None => invalid += 1,
        }
    }

    AgeHistogram {
        buckets: counts
            .into_iter()
            .enumerate()
            .map(|(idx, deaths)| bins.bucket(idx, deaths))
            .collect(),
        invalid,
    }
}
