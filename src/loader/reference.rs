//! Loaders for the cause-of-death and geographic reference tables
//!
//! Rows with gaps are skipped and reported as warnings. A repeated key is
//! fatal for the whole reference.

use std::fmt;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use csv::ByteRecord;
use serde::Serialize;

use crate::config::LoaderConfig;
use crate::error::Result;
use crate::error::util::csv_error;
use crate::geo::boundary_key_from_name;
use crate::models::{
    CauseEntry, CauseReference, CauseReferenceBuilder, GeoReference, GeoReferenceBuilder, GeoRow,
};
use crate::reader::{ColumnIndex, delimited_reader, field, line_of, open_delimited};
use crate::utils::logging::{log_source_complete, log_source_start, log_warning};
use crate::utils::parse_code;

/// Logical name of the cause reference source
pub const CAUSE_SOURCE: &str = "causes";
/// Logical name of the geographic reference source
pub const GEO_SOURCE: &str = "geo";

/// A skipped or partially read reference row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceWarning {
    /// Logical source name
    pub source_name: String,
    /// Line number in the source
    pub line: u64,
    /// What was wrong with the row
    pub message: String,
}

impl fmt::Display for ReferenceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} line {}: {}", self.source_name, self.line, self.message)
    }
}

struct Warnings {
    source_name: &'static str,
    items: Vec<ReferenceWarning>,
}

impl Warnings {
    const fn new(source_name: &'static str) -> Self {
        Self {
            source_name,
            items: Vec::new(),
        }
    }

    fn push(&mut self, line: u64, message: impl Into<String>) {
        self.items.push(ReferenceWarning {
            source_name: self.source_name.to_string(),
            line,
            message: message.into(),
        });
    }

    fn finish(self, path: Option<&Path>) -> Vec<ReferenceWarning> {
        if !self.items.is_empty() {
            log_warning(
                &format!(
                    "{} rows of the {} reference were skipped or incomplete",
                    self.items.len(),
                    self.source_name
                ),
                path,
            );
            for warning in &self.items {
                log::debug!("{warning}");
            }
        }
        self.items
    }
}

/// Load the cause-of-death reference from a file
pub fn load_cause_reference(
    path: &Path,
    config: &LoaderConfig,
) -> Result<(CauseReference, Vec<ReferenceWarning>)> {
    log_source_start(CAUSE_SOURCE, path);
    let start = Instant::now();

    let reader = open_delimited(path, CAUSE_SOURCE, config.reference_delimiter)?;
    let (reference, warnings) = read_causes(reader, config, Some(path))?;

    log_source_complete(CAUSE_SOURCE, path, reference.len(), start.elapsed());
    Ok((reference, warnings))
}

/// Read the cause-of-death reference from any byte source
pub fn read_cause_reference<R: Read>(
    source: R,
    config: &LoaderConfig,
) -> Result<(CauseReference, Vec<ReferenceWarning>)> {
    read_causes(
        delimited_reader(source, config.reference_delimiter),
        config,
        None,
    )
}

fn read_causes<R: Read>(
    mut reader: csv::Reader<R>,
    config: &LoaderConfig,
    path: Option<&Path>,
) -> Result<(CauseReference, Vec<ReferenceWarning>)> {
    let columns = &config.cause_columns;
    let index = ColumnIndex::from_reader(&mut reader, CAUSE_SOURCE)?;
    let code_idx = index.require(&columns.code)?;
    let description_idx = index.require(&columns.description)?;

    let mut warnings = Warnings::new(CAUSE_SOURCE);
    let category_idx = columns.category.as_deref().and_then(|name| {
        let idx = index.optional(name);
        if idx.is_none() {
            warnings.push(1, format!("category column '{name}' not found; categories left empty"));
        }
        idx
    });

    let mut builder = CauseReferenceBuilder::new(CAUSE_SOURCE);
    let mut record = ByteRecord::new();
    loop {
        match reader.read_byte_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) if e.is_io_error() => return Err(csv_error(CAUSE_SOURCE, e)),
            Err(e) => {
                let line = e.position().map_or(0, csv::Position::line);
                warnings.push(line, format!("unreadable row: {e}"));
                continue;
            }
        }
        let line = line_of(&record);

        let code = field(&record, code_idx);
        if code.trim().is_empty() {
            warnings.push(line, "missing cause code");
            continue;
        }
        let description = field(&record, description_idx);
        if description.trim().is_empty() {
            warnings.push(line, format!("missing description for cause code '{code}'"));
            continue;
        }
        let category = category_idx
            .map(|idx| field(&record, idx))
            .filter(|c| !c.trim().is_empty())
            .map(|c| Arc::<str>::from(c.trim()));

        builder.insert(CauseEntry {
            code: code.into_owned(),
            description: Arc::from(description.trim()),
            category,
        })?;
    }

    Ok((builder.build(), warnings.finish(path)))
}

/// Load the geographic reference from a file
pub fn load_geo_reference(
    path: &Path,
    config: &LoaderConfig,
) -> Result<(GeoReference, Vec<ReferenceWarning>)> {
    log_source_start(GEO_SOURCE, path);
    let start = Instant::now();

    let reader = open_delimited(path, GEO_SOURCE, config.reference_delimiter)?;
    let (reference, warnings) = read_geo(reader, config, Some(path))?;

    log_source_complete(GEO_SOURCE, path, reference.len(), start.elapsed());
    Ok((reference, warnings))
}

/// Read the geographic reference from any byte source
pub fn read_geo_reference<R: Read>(
    source: R,
    config: &LoaderConfig,
) -> Result<(GeoReference, Vec<ReferenceWarning>)> {
    read_geo(
        delimited_reader(source, config.reference_delimiter),
        config,
        None,
    )
}

fn read_geo<R: Read>(
    mut reader: csv::Reader<R>,
    config: &LoaderConfig,
    path: Option<&Path>,
) -> Result<(GeoReference, Vec<ReferenceWarning>)> {
    let columns = &config.geo_columns;
    let index = ColumnIndex::from_reader(&mut reader, GEO_SOURCE)?;
    let municipality_code_idx = index.require(&columns.municipality_code)?;
    let department_code_idx = index.require(&columns.department_code)?;
    let department_name_idx = index.require(&columns.department_name)?;
    let municipality_name_idx = index.require(&columns.municipality_name)?;

    let mut warnings = Warnings::new(GEO_SOURCE);
    let population_idx = columns.population.as_deref().and_then(|name| {
        let idx = index.optional(name);
        if idx.is_none() {
            warnings.push(1, format!("population column '{name}' not found; rates unavailable"));
        }
        idx
    });
    // Without a boundary-key column the key is derived from the department name
    let boundary_idx = columns
        .boundary_key
        .as_deref()
        .and_then(|name| index.optional(name));

    let mut builder = GeoReferenceBuilder::new(GEO_SOURCE);
    let mut record = ByteRecord::new();
    loop {
        match reader.read_byte_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) if e.is_io_error() => return Err(csv_error(GEO_SOURCE, e)),
            Err(e) => {
                let line = e.position().map_or(0, csv::Position::line);
                warnings.push(line, format!("unreadable row: {e}"));
                continue;
            }
        }
        let line = line_of(&record);

        let raw_municipality = field(&record, municipality_code_idx);
        let Some(municipality_code) = parse_code(&raw_municipality) else {
            warnings.push(line, format!("invalid municipality code '{raw_municipality}'"));
            continue;
        };
        let raw_department = field(&record, department_code_idx);
        let Some(department_code) = parse_code(&raw_department) else {
            warnings.push(line, format!("invalid department code '{raw_department}'"));
            continue;
        };
        let department_name = field(&record, department_name_idx);
        let municipality_name = field(&record, municipality_name_idx);
        if department_name.trim().is_empty() || municipality_name.trim().is_empty() {
            warnings.push(line, format!("missing name for municipality {municipality_code}"));
            continue;
        }

        let population = population_idx.and_then(|idx| {
            let raw = field(&record, idx);
            if raw.trim().is_empty() {
                return None;
            }
            let parsed = parse_population(&raw);
            if parsed.is_none() {
                warnings.push(line, format!("invalid population '{raw}'"));
            }
            parsed
        });

        let boundary_key = match boundary_idx {
            Some(idx) => Some(field(&record, idx).into_owned()),
            None => Some(boundary_key_from_name(&department_name)),
        };

        let row = GeoRow {
            municipality_code,
            municipality_name: municipality_name.into_owned(),
            department_code,
            department_name: department_name.into_owned(),
            population,
            boundary_key,
        };
        if let Some(message) = builder.insert(row)? {
            warnings.push(line, message);
        }
    }

    Ok((builder.build(), warnings.finish(path)))
}

/// Parse a population count.
///
/// Accepts plain integers, integral decimals such as `1500.0`, and digits in
/// thousands groups split by one separator (`2.533.424`, `1,500`). A
/// fractional or negative value is rejected.
fn parse_population(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    if let Ok(count) = trimmed.parse::<u64>() {
        return Some(count);
    }
    if let Some(count) = parse_thousands_groups(trimmed) {
        return Some(count);
    }
    let value = trimmed.parse::<f64>().ok()?;
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value < u64::MAX as f64 {
        Some(value as u64)
    } else {
        None
    }
}

fn parse_thousands_groups(raw: &str) -> Option<u64> {
    let separator = raw.chars().find(|c| matches!(c, '.' | ',' | ' ' | '_'))?;
    let all_digits = |group: &str| group.bytes().all(|b| b.is_ascii_digit());

    let mut groups = raw.split(separator);
    let head = groups.next()?;
    if head.is_empty() || head.len() > 3 || !all_digits(head) {
        return None;
    }
    let mut digits = head.to_string();
    for group in groups {
        if group.len() != 3 || !all_digits(group) {
            return None;
        }
        digits.push_str(group);
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_population() {
        assert_eq!(parse_population("2.533.424"), Some(2_533_424));
        assert_eq!(parse_population("1500"), Some(1500));
        assert_eq!(parse_population("n/a"), None);
        assert_eq!(parse_population("-5"), None);
    }

    #[test]
    fn test_parse_population_decimals() {
        assert_eq!(parse_population("1500.0"), Some(1500));
        assert_eq!(parse_population("12.0"), Some(12));
        assert_eq!(parse_population("1,500"), Some(1500));
        assert_eq!(parse_population("1500.5"), None);
        assert_eq!(parse_population("1.5"), None);
        assert_eq!(parse_population("2.53.424"), None);
        assert_eq!(parse_population("1,500.0"), None);
    }
}
