//! Module for reading delimited tabular sources with header validation.

use std::borrow::Cow;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder, Trim};
use rustc_hash::FxHashMap;

use crate::error::util::{csv_error, safe_open_file};
use crate::error::{MortalityError, Result};
use crate::utils::normalize_header;

/// Build a delimited reader over any byte source.
///
/// Rows may have a varying number of fields; short rows are reported by the
/// callers as malformed instead of failing the whole read.
pub fn delimited_reader<R: Read>(source: R, delimiter: char) -> csv::Reader<R> {
    ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(source)
}

/// Open a delimited file, mapping open failures to `SourceUnavailable`
pub fn open_delimited(
    path: &Path,
    source_name: &str,
    delimiter: char,
) -> Result<csv::Reader<BufReader<std::fs::File>>> {
    let file = safe_open_file(path, source_name)?;
    Ok(delimited_reader(BufReader::new(file), delimiter))
}

/// Header positions of a source, looked up by normalized column name
#[derive(Debug, Clone)]
pub struct ColumnIndex {
    source_name: String,
    positions: FxHashMap<String, usize>,
}

impl ColumnIndex {
    /// Read and index the header row of a reader
    pub fn from_reader<R: Read>(reader: &mut csv::Reader<R>, source_name: &str) -> Result<Self> {
        let headers = reader
            .byte_headers()
            .map_err(|e| csv_error(source_name, e))?;

        let mut positions = FxHashMap::default();
        for (idx, raw) in headers.iter().enumerate() {
            let name = normalize_header(&String::from_utf8_lossy(raw));
            // First occurrence wins for repeated header names
            positions.entry(name).or_insert(idx);
        }

        Ok(Self {
            source_name: source_name.to_string(),
            positions,
        })
    }

    /// Position of a required column
    pub fn require(&self, column: &str) -> Result<usize> {
        self.optional(column)
            .ok_or_else(|| MortalityError::schema(&self.source_name, column))
    }

    /// Position of a column that may be absent
    #[must_use]
    pub fn optional(&self, column: &str) -> Option<usize> {
        self.positions.get(&normalize_header(column)).copied()
    }

    /// Number of distinct header names
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the header row was empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Text of one field, lossily decoded. Missing fields read as empty.
#[must_use]
pub fn field(record: &ByteRecord, idx: usize) -> Cow<'_, str> {
    record
        .get(idx)
        .map_or(Cow::Borrowed(""), String::from_utf8_lossy)
}

/// Line number of a record in its source, for diagnostics
#[must_use]
pub fn line_of(record: &ByteRecord) -> u64 {
    record.position().map_or(0, csv::Position::line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_index_matching() {
        let data = "\u{feff}COD_DANE; Municipio ;Descripcion  de códigos\n5001;Medellín;x\n";
        let mut reader = delimited_reader(data.as_bytes(), ';');
        let columns = ColumnIndex::from_reader(&mut reader, "geo").unwrap();

        assert_eq!(columns.require("cod_dane").unwrap(), 0);
        assert_eq!(columns.optional("MUNICIPIO"), Some(1));
        assert_eq!(columns.optional("Descripcion de códigos"), Some(2));
        assert!(columns.optional("POBLACION").is_none());

        let err = columns.require("POBLACION").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Schema error in geo source: missing required column 'POBLACION'"
        );
    }

    #[test]
    fn test_missing_field_reads_empty() {
        let data = "a,b,c\n1,2\n";
        let mut reader = delimited_reader(data.as_bytes(), ',');
        let mut record = ByteRecord::new();
        assert!(reader.read_byte_record(&mut record).unwrap());
        assert_eq!(field(&record, 1), "2");
        assert_eq!(field(&record, 2), "");
        assert_eq!(line_of(&record), 2);
    }
}
