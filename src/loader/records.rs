//! Record loader and normalizer
//!
//! Reads the raw mortality table, coerces every field into its typed form,
//! joins against both references and counts every defect in [`LoadStats`].
//! Per-row problems never produce an error.

use std::io::Read;
use std::path::Path;
use std::time::Instant;

use csv::ByteRecord;

use crate::config::{LoaderConfig, RecordColumns};
use crate::error::Result;
use crate::error::util::csv_error;
use crate::loader::stats::{ExclusionReason, IssueKind, LoadStats};
use crate::models::{
    Age, CauseReference, GeoReference, MannerOfDeath, MortalityRecord, Sex, parse_month,
};
use crate::reader::{ColumnIndex, delimited_reader, field, line_of, open_delimited};
use crate::utils::logging::{RowProgress, log_data_quality, log_source_complete, log_source_start};
use crate::utils::{divipola_code, normalize_cause_code, parse_code};

/// Logical name of the record source
pub const RECORD_SOURCE: &str = "records";

/// Load and normalize the mortality records from a file
pub fn load_records(
    path: &Path,
    causes: &CauseReference,
    geo: &GeoReference,
    config: &LoaderConfig,
) -> Result<(Vec<MortalityRecord>, LoadStats)> {
    log_source_start(RECORD_SOURCE, path);
    let start = Instant::now();

    let reader = open_delimited(path, RECORD_SOURCE, config.record_delimiter)?;
    let (records, stats) = normalize(reader, causes, geo, config)?;

    log_source_complete(RECORD_SOURCE, path, records.len(), start.elapsed());
    if stats.has_defects() {
        log_data_quality(RECORD_SOURCE, &stats, Some(path));
    }
    Ok((records, stats))
}

/// Load and normalize mortality records from any byte source
pub fn read_records<R: Read>(
    source: R,
    causes: &CauseReference,
    geo: &GeoReference,
    config: &LoaderConfig,
) -> Result<(Vec<MortalityRecord>, LoadStats)> {
    normalize(
        delimited_reader(source, config.record_delimiter),
        causes,
        geo,
        config,
    )
}

/// Header positions of every required record column
struct RecordLayout {
    department: usize,
    municipality: usize,
    sex: usize,
    age: usize,
    age_unit: usize,
    month: usize,
    manner: usize,
    cause: usize,
}

impl RecordLayout {
    fn resolve(index: &ColumnIndex, columns: &RecordColumns) -> Result<Self> {
        Ok(Self {
            department: index.require(&columns.department)?,
            municipality: index.require(&columns.municipality)?,
            sex: index.require(&columns.sex)?,
            age: index.require(&columns.age)?,
            age_unit: index.require(&columns.age_unit)?,
            month: index.require(&columns.month)?,
            manner: index.require(&columns.manner)?,
            cause: index.require(&columns.cause)?,
        })
    }
}

fn normalize<R: Read>(
    mut reader: csv::Reader<R>,
    causes: &CauseReference,
    geo: &GeoReference,
    config: &LoaderConfig,
) -> Result<(Vec<MortalityRecord>, LoadStats)> {
    let index = ColumnIndex::from_reader(&mut reader, RECORD_SOURCE)?;
    let layout = RecordLayout::resolve(&index, &config.record_columns)?;
    let cap = config.max_reported_issues;

    let progress = RowProgress::new(config.show_progress, RECORD_SOURCE);
    let mut stats = LoadStats::default();
    let mut records = Vec::new();
    let mut raw = ByteRecord::new();

    loop {
        match reader.read_byte_record(&mut raw) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) if e.is_io_error() => return Err(csv_error(RECORD_SOURCE, e)),
            Err(e) => {
                stats.total_rows += 1;
                let line = e.position().map_or(0, csv::Position::line);
                stats.exclude(ExclusionReason::MalformedRow, line, &e.to_string(), cap);
                continue;
            }
        }
        stats.total_rows += 1;
        progress.row();

        if let Some(record) = normalize_row(&raw, &layout, causes, geo, config, &mut stats) {
            records.push(record);
        }
    }

    progress.finish(records.len());
    Ok((records, stats))
}

fn normalize_row(
    raw: &ByteRecord,
    layout: &RecordLayout,
    causes: &CauseReference,
    geo: &GeoReference,
    config: &LoaderConfig,
    stats: &mut LoadStats,
) -> Option<MortalityRecord> {
    let line = line_of(raw);
    let cap = config.max_reported_issues;

    let raw_month = field(raw, layout.month);
    let Some(month) = parse_month(&raw_month) else {
        stats.exclude(ExclusionReason::InvalidMonth, line, &raw_month, cap);
        return None;
    };

    let raw_manner = field(raw, layout.manner);
    let Some(manner) = MannerOfDeath::parse_code(&raw_manner) else {
        stats.exclude(ExclusionReason::MissingMannerOfDeath, line, &raw_manner, cap);
        return None;
    };
    if manner == MannerOfDeath::Other {
        stats.other_manner_rows += 1;
    }

    let sex = Sex::parse_lenient(&field(raw, layout.sex));
    if sex == Sex::Unknown {
        stats.unknown_sex_rows += 1;
    }

    let raw_age = field(raw, layout.age);
    let raw_unit = field(raw, layout.age_unit);
    let age = Age::normalize(&raw_age, &raw_unit, config.max_valid_age);
    if age.is_invalid() {
        stats.invalid_age_rows += 1;
        stats.sample(IssueKind::InvalidAge, line, &format!("{raw_age} ({raw_unit})"), cap);
    }

    let raw_department = field(raw, layout.department);
    let raw_municipality = field(raw, layout.municipality);
    let department_code = parse_code(&raw_department);
    let municipality_code = match (department_code, parse_code(&raw_municipality)) {
        (Some(department), Some(municipality)) => divipola_code(department, municipality),
        _ => None,
    };

    let record = MortalityRecord {
        department_code,
        municipality_code,
        sex,
        age,
        month,
        manner,
        cause_code: normalize_cause_code(&field(raw, layout.cause)),
        geo: None,
        cause: None,
    }
    .resolve(geo, causes);

    if record.geo.is_none() {
        stats.unresolved_geo_rows += 1;
        stats.sample(
            IssueKind::UnresolvedGeo,
            line,
            &format!("{raw_department}/{raw_municipality}"),
            cap,
        );
    }
    if record.cause.is_none() {
        stats.unresolved_cause_rows += 1;
        stats.sample(IssueKind::UnresolvedCause, line, &record.cause_code, cap);
    }

    Some(record)
}
