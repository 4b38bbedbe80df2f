//! Common domain type definitions
//!
//! This module contains the categorical enums shared by the record loader,
//! the filter engine and the aggregates, together with their parsing rules
//! for the DANE source conventions.

use std::fmt;
use std::str::FromStr;

use chrono::Month;
use serde::Serialize;

use crate::utils::normalize_text;

/// Sex of the decedent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    /// Male
    Male,
    /// Female
    Female,
    /// Unknown, undetermined or not recorded
    Unknown,
}

impl Sex {
    /// All categories in reporting order
    pub const ALL: [Self; 3] = [Self::Male, Self::Female, Self::Unknown];

    /// Display label used by the dashboard
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Male => "Masculino",
            Self::Female => "Femenino",
            Self::Unknown => "Indeterminado",
        }
    }

    /// Parse a raw source value. Unrecognized values map to `Unknown`.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Self {
        match normalize_text(raw).as_str() {
            "1" | "m" | "male" | "masculino" | "hombre" => Self::Male,
            "2" | "f" | "female" | "femenino" | "mujer" => Self::Female,
            _ => Self::Unknown,
        }
    }
}

impl From<&str> for Sex {
    fn from(s: &str) -> Self {
        Self::parse_lenient(s)
    }
}

impl From<i32> for Sex {
    fn from(value: i32) -> Self {
        match value {
            1 => Self::Male,
            2 => Self::Female,
            _ => Self::Unknown,
        }
    }
}

impl FromStr for Sex {
    type Err = String;

    /// Strict parsing for user input: the label or code must be recognized.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_text(s).as_str() {
            "3" | "u" | "unknown" | "indeterminado" => Ok(Self::Unknown),
            other => match Self::parse_lenient(other) {
                Self::Unknown => Err(format!("unrecognized sex '{s}'")),
                sex => Ok(sex),
            },
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Manner of death classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MannerOfDeath {
    /// Homicide
    Homicide,
    /// Accident, including traffic accidents
    Accident,
    /// Natural causes
    Natural,
    /// Suicide
    Suicide,
    /// Under investigation or not determined
    Undetermined,
    /// Any other non-empty code
    Other,
}

impl MannerOfDeath {
    /// All categories in reporting order
    pub const ALL: [Self; 6] = [
        Self::Homicide,
        Self::Accident,
        Self::Natural,
        Self::Suicide,
        Self::Undetermined,
        Self::Other,
    ];

    /// Display label used by the dashboard
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Homicide => "Homicidio",
            Self::Accident => "Accidente",
            Self::Natural => "Natural",
            Self::Suicide => "Suicidio",
            Self::Undetermined => "En estudio",
            Self::Other => "Otra",
        }
    }

    /// Parse a raw source value.
    ///
    /// Returns `None` for a blank value. Any non-blank value that is not a
    /// recognized manner becomes [`MannerOfDeath::Other`].
    #[must_use]
    pub fn parse_code(raw: &str) -> Option<Self> {
        let normalized = normalize_text(raw);
        if normalized.is_empty() {
            return None;
        }
        Some(Self::recognize(&normalized).unwrap_or(Self::Other))
    }

    fn recognize(normalized: &str) -> Option<Self> {
        let manner = match normalized {
            "homicidio" | "homicide" => Self::Homicide,
            "accidente" | "accidente de tránsito" | "accidente de transito" | "accident"
            | "traffic accident" => Self::Accident,
            "natural" => Self::Natural,
            "suicidio" | "suicide" => Self::Suicide,
            "en estudio" | "sin información" | "sin informacion" | "indeterminada"
            | "indeterminado" | "undetermined" => Self::Undetermined,
            "otra" | "other" => Self::Other,
            _ => return None,
        };
        Some(manner)
    }
}

impl FromStr for MannerOfDeath {
    type Err = String;

    /// Strict parsing for user input: the label must be recognized.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::recognize(&normalize_text(s)).ok_or_else(|| format!("unrecognized manner of death '{s}'"))
    }
}

impl fmt::Display for MannerOfDeath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unit in which a source age value is expressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeUnit {
    /// Years
    Years,
    /// Months
    Months,
    /// Days
    Days,
    /// Hours
    Hours,
    /// Minutes
    Minutes,
}

impl AgeUnit {
    /// Parse the DANE unit code (`1`..`5`) or a unit word
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let unit = match normalize_text(raw).as_str() {
            "1" | "años" | "anos" | "year" | "years" => Self::Years,
            "2" | "meses" | "month" | "months" => Self::Months,
            "3" | "días" | "dias" | "day" | "days" => Self::Days,
            "4" | "horas" | "hour" | "hours" => Self::Hours,
            "5" | "minutos" | "minute" | "minutes" => Self::Minutes,
            _ => return None,
        };
        Some(unit)
    }

    /// Number of units in one year
    #[must_use]
    pub const fn per_year(self) -> f64 {
        match self {
            Self::Years => 1.0,
            Self::Months => 12.0,
            Self::Days => 365.25,
            Self::Hours => 365.25 * 24.0,
            Self::Minutes => 365.25 * 24.0 * 60.0,
        }
    }
}

/// Age of the decedent normalized to years
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Age {
    /// A plausible age in (possibly fractional) years
    Years(f64),
    /// Unparseable, negative, unknown unit, or above the plausible maximum
    Invalid,
}

impl Age {
    /// Normalize a raw value and unit into years.
    ///
    /// `max_valid_age` is the inclusive upper bound in years.
    #[must_use]
    pub fn normalize(raw_value: &str, raw_unit: &str, max_valid_age: f64) -> Self {
        let Some(unit) = AgeUnit::parse(raw_unit) else {
            return Self::Invalid;
        };
        let Ok(value) = raw_value.trim().parse::<f64>() else {
            return Self::Invalid;
        };
        if !value.is_finite() || value < 0.0 {
            return Self::Invalid;
        }
        let years = value / unit.per_year();
        if years > max_valid_age {
            Self::Invalid
        } else {
            Self::Years(years)
        }
    }

    /// The age in years, if valid
    #[must_use]
    pub const fn years(self) -> Option<f64> {
        match self {
            Self::Years(years) => Some(years),
            Self::Invalid => None,
        }
    }

    /// Whether the age fell into the invalid bucket
    #[must_use]
    pub const fn is_invalid(self) -> bool {
        matches!(self, Self::Invalid)
    }
}

const MONTH_LABELS: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

/// Spanish display label for a month
#[must_use]
pub fn month_label(month: Month) -> &'static str {
    MONTH_LABELS[month.number_from_month() as usize - 1]
}

/// Parse a month number in `1..=12`.
///
/// Accepts integral decimal renderings such as `"5.0"` produced by
/// spreadsheet exports.
#[must_use]
pub fn parse_month(raw: &str) -> Option<Month> {
    let trimmed = raw.trim();
    let number = match trimmed.parse::<u8>() {
        Ok(n) => n,
        Err(_) => {
            let value = trimmed.parse::<f64>().ok()?;
            if value.fract() != 0.0 || !(1.0..=12.0).contains(&value) {
                return None;
            }
            value as u8
        }
    };
    Month::try_from(number).ok()
}

/// All twelve months in calendar order
pub fn all_months() -> impl Iterator<Item = Month> {
    (1..=12u8).filter_map(|n| Month::try_from(n).ok())
}
