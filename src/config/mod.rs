//! Configuration for loading and aggregating mortality data.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{MortalityError, Result};

/// File name of the mortality record source inside a data directory
pub const RECORDS_FILE: &str = "NoFetal2019.csv";
/// File name of the cause-of-death reference inside a data directory
pub const CAUSES_FILE: &str = "CodigosDeMuerte.csv";
/// File name of the DIVIPOLA geographic reference inside a data directory
pub const GEO_FILE: &str = "Divipola.csv";

/// Locations of the three tabular sources
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSources {
    /// Mortality record table
    pub records: PathBuf,
    /// Cause-of-death reference table
    pub causes: PathBuf,
    /// Geographic reference table
    pub geo: PathBuf,
}

impl DataSources {
    /// Sources laid out with their canonical file names in one directory
    #[must_use]
    pub fn from_dir(dir: &Path) -> Self {
        Self {
            records: dir.join(RECORDS_FILE),
            causes: dir.join(CAUSES_FILE),
            geo: dir.join(GEO_FILE),
        }
    }
}

/// Column names of the mortality record source
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RecordColumns {
    /// Department code
    pub department: String,
    /// Municipality code, local or full DIVIPOLA
    pub municipality: String,
    /// Sex code
    pub sex: String,
    /// Age value
    pub age: String,
    /// Unit of the age value
    pub age_unit: String,
    /// Month of death
    pub month: String,
    /// Manner of death
    pub manner: String,
    /// Underlying cause code
    pub cause: String,
}

impl Default for RecordColumns {
    fn default() -> Self {
        Self {
            department: "COD_DEPARTAMENTO".to_string(),
            municipality: "COD_MUNICIPIO".to_string(),
            sex: "SEXO".to_string(),
            age: "EDAD".to_string(),
            age_unit: "UNIDAD_EDAD".to_string(),
            month: "MES".to_string(),
            manner: "MANERA_MUERTE".to_string(),
            cause: "COD_MUERTE".to_string(),
        }
    }
}

/// Column names of the cause-of-death reference
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CauseColumns {
    /// Four character ICD-10 code
    pub code: String,
    /// Human readable description
    pub description: String,
    /// Optional category column
    pub category: Option<String>,
}

impl Default for CauseColumns {
    fn default() -> Self {
        Self {
            code: "Código de la CIE-10 cuatro caracteres".to_string(),
            description: "Descripcion de códigos mortalidad a cuatro caracteres".to_string(),
            category: Some("Descripción de códigos mortalidad a tres caracteres".to_string()),
        }
    }
}

/// Column names of the geographic reference
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeoColumns {
    /// Full DIVIPOLA municipality code (the key)
    pub municipality_code: String,
    /// Department code
    pub department_code: String,
    /// Department name
    pub department_name: String,
    /// Municipality name
    pub municipality_name: String,
    /// Optional population column
    pub population: Option<String>,
    /// Optional boundary-geometry key column
    pub boundary_key: Option<String>,
}

impl Default for GeoColumns {
    fn default() -> Self {
        Self {
            municipality_code: "COD_DANE".to_string(),
            department_code: "COD_DEPARTAMENTO".to_string(),
            department_name: "DEPARTAMENTO".to_string(),
            municipality_name: "MUNICIPIO".to_string(),
            population: Some("POBLACION".to_string()),
            boundary_key: Some("CLAVE_MAPA".to_string()),
        }
    }
}

/// Configuration for the reference and record loaders
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Delimiter of the record source
    pub record_delimiter: char,
    /// Delimiter of both reference sources
    pub reference_delimiter: char,
    /// Record source columns
    pub record_columns: RecordColumns,
    /// Cause reference columns
    pub cause_columns: CauseColumns,
    /// Geo reference columns
    pub geo_columns: GeoColumns,
    /// Inclusive upper bound on a plausible age, in years
    pub max_valid_age: f64,
    /// Maximum number of row issues kept as samples in the load statistics
    pub max_reported_issues: usize,
    /// Draw a progress spinner while loading records
    pub show_progress: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            record_delimiter: ',',
            reference_delimiter: ';',
            record_columns: RecordColumns::default(),
            cause_columns: CauseColumns::default(),
            geo_columns: GeoColumns::default(),
            max_valid_age: 130.0,
            max_reported_issues: 100,
            show_progress: false,
        }
    }
}

impl LoaderConfig {
    /// Validate delimiter and age settings
    pub fn validate(&self) -> Result<()> {
        for (name, delimiter) in [
            ("record_delimiter", self.record_delimiter),
            ("reference_delimiter", self.reference_delimiter),
        ] {
            if !delimiter.is_ascii() {
                return Err(MortalityError::config(format!(
                    "{name} must be a single ASCII character, got '{delimiter}'"
                )));
            }
        }
        if !self.max_valid_age.is_finite() || self.max_valid_age <= 0.0 {
            return Err(MortalityError::config(format!(
                "max_valid_age must be positive, got {}",
                self.max_valid_age
            )));
        }
        Ok(())
    }
}

/// Ordering of the department death counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepartmentOrder {
    /// Department name ascending
    #[default]
    Name,
    /// Death count descending, then name ascending
    CountDescending,
}

/// Options for the aggregation engine
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AggregateOptions {
    /// Width of the age histogram bins, in years
    pub age_bin_width: u32,
    /// Lower bound of the open-ended last age bin
    pub age_domain_max: u32,
    /// Length of both city rate rankings
    pub top_cities: usize,
    /// Length of the top causes table
    pub top_causes: usize,
    /// Ordering of the department counts
    pub department_order: DepartmentOrder,
    /// Compute the aggregates on the rayon pool
    pub parallel: bool,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            age_bin_width: 10,
            age_domain_max: 120,
            top_cities: 10,
            top_causes: 10,
            department_order: DepartmentOrder::Name,
            parallel: false,
        }
    }
}

impl AggregateOptions {
    /// Validate the histogram domain
    pub fn validate(&self) -> Result<()> {
        if self.age_bin_width == 0 {
            return Err(MortalityError::config("age_bin_width must be positive"));
        }
        if self.age_domain_max == 0 || self.age_domain_max % self.age_bin_width != 0 {
            return Err(MortalityError::config(format!(
                "age_domain_max ({}) must be a positive multiple of age_bin_width ({})",
                self.age_domain_max, self.age_bin_width
            )));
        }
        Ok(())
    }
}

/// Complete configuration, as read from a JSON file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Loader settings
    pub loader: LoaderConfig,
    /// Aggregation settings
    pub aggregate: AggregateOptions,
}

impl DashboardConfig {
    /// Read a configuration file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = crate::error::util::safe_open_file(path, "config")?;
        let config: Self = serde_json::from_reader(std::io::BufReader::new(file))
            .map_err(|e| MortalityError::config(format!("{}: {e}", path.display())))?;
        config.loader.validate()?;
        config.aggregate.validate()?;
        Ok(config)
    }
}

impl fmt::Display for DashboardConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dashboard Configuration:")?;
        writeln!(f, "  Record Delimiter: {:?}", self.loader.record_delimiter)?;
        writeln!(f, "  Reference Delimiter: {:?}", self.loader.reference_delimiter)?;
        writeln!(f, "  Max Valid Age: {}", self.loader.max_valid_age)?;
        writeln!(f, "  Age Bin Width: {}", self.aggregate.age_bin_width)?;
        writeln!(f, "  Age Domain Max: {}", self.aggregate.age_domain_max)?;
        writeln!(f, "  Top Cities: {}", self.aggregate.top_cities)?;
        writeln!(f, "  Top Causes: {}", self.aggregate.top_causes)?;
        writeln!(f, "  Department Order: {:?}", self.aggregate.department_order)?;
        writeln!(f, "  Parallel: {}", self.aggregate.parallel)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = DashboardConfig::default();
        assert!(config.loader.validate().is_ok());
        assert!(config.aggregate.validate().is_ok());
    }

    #[test]
    fn test_invalid_bins() {
        let options = AggregateOptions {
            age_bin_width: 0,
            ..Default::default()
        };
        assert!(matches!(options.validate(), Err(MortalityError::Config(_))));

        let options = AggregateOptions {
            age_bin_width: 7,
            ..Default::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_partial_json() {
        let config: DashboardConfig =
            serde_json::from_str(r#"{"aggregate": {"top_causes": 5, "department_order": "count_descending"}}"#)
                .unwrap();
        assert_eq!(config.aggregate.top_causes, 5);
        assert_eq!(config.aggregate.top_cities, 10);
        assert_eq!(config.aggregate.department_order, DepartmentOrder::CountDescending);
        assert_eq!(config.loader.record_columns.month, "MES");
    }

    #[test]
    fn test_sources_from_dir() {
        let sources = DataSources::from_dir(Path::new("/data"));
        assert_eq!(sources.geo, Path::new("/data/Divipola.csv"));
    }
}
