//! Reference tables: cause-of-death codes and DIVIPOLA geography.
//!
//! Both tables are immutable once built. Construction goes through a
//! builder that rejects duplicate keys instead of overwriting them.

use std::collections::BTreeMap;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::error::{MortalityError, Result};
use crate::utils::{normalize_cause_code, normalize_text, parse_code};

/// One cause-of-death code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CauseEntry {
    /// Normalized ICD-10 code
    pub code: String,
    /// Human readable description
    pub description: Arc<str>,
    /// Optional grouping category
    pub category: Option<Arc<str>>,
}

/// Mapping from cause code to description and category
#[derive(Debug, Clone, Default)]
pub struct CauseReference {
    entries: FxHashMap<String, CauseEntry>,
}

impl CauseReference {
    /// Build a reference from entries, failing on the first duplicate code
    pub fn from_entries<I>(source_name: &str, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = CauseEntry>,
    {
        let mut builder = CauseReferenceBuilder::new(source_name);
        for entry in entries {
            builder.insert(entry)?;
        }
        Ok(builder.build())
    }

    /// Look up a raw cause code
    #[must_use]
    pub fn get(&self, raw_code: &str) -> Option<&CauseEntry> {
        self.entries.get(&normalize_cause_code(raw_code))
    }

    /// Number of codes
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the reference has no codes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries in unspecified order
    pub fn entries(&self) -> impl Iterator<Item = &CauseEntry> {
        self.entries.values()
    }
}

/// Incremental construction of a [`CauseReference`]
#[derive(Debug)]
pub struct CauseReferenceBuilder {
    source_name: String,
    entries: FxHashMap<String, CauseEntry>,
}

impl CauseReferenceBuilder {
    /// Start an empty reference
    #[must_use]
    pub fn new(source_name: &str) -> Self {
        Self {
            source_name: source_name.to_string(),
            entries: FxHashMap::default(),
        }
    }

    /// Insert an entry. The code is normalized before the duplicate check.
    pub fn insert(&mut self, mut entry: CauseEntry) -> Result<()> {
        entry.code = normalize_cause_code(&entry.code);
        if self.entries.contains_key(&entry.code) {
            return Err(MortalityError::duplicate_key(&self.source_name, entry.code));
        }
        self.entries.insert(entry.code.clone(), entry);
        Ok(())
    }

    /// Freeze the reference
    #[must_use]
    pub fn build(self) -> CauseReference {
        CauseReference {
            entries: self.entries,
        }
    }
}

/// A municipality of the geographic reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Municipality {
    /// Full DIVIPOLA code
    pub code: u32,
    /// Municipality name
    pub name: Arc<str>,
    /// Code of the containing department
    pub department_code: u32,
    /// Population used for per-capita rates, if known
    pub population: Option<u64>,
}

impl Municipality {
    /// Population usable as a rate denominator
    #[must_use]
    pub fn rate_population(&self) -> Option<u64> {
        self.population.filter(|p| *p > 0)
    }
}

/// A department of the geographic reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Department {
    /// DIVIPOLA department code
    pub code: u32,
    /// Department name
    pub name: Arc<str>,
    /// Key of the department polygon in the boundary document
    pub boundary_key: Option<Arc<str>>,
}

/// Geographic labels attached to a record after a successful join
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedGeo {
    /// Department code
    pub department_code: u32,
    /// Department name
    pub department: Arc<str>,
    /// Full municipality code
    pub municipality_code: u32,
    /// Municipality name
    pub municipality: Arc<str>,
}

/// Mapping from DIVIPOLA codes to names, populations and boundary keys
#[derive(Debug, Clone, Default)]
pub struct GeoReference {
    municipalities: FxHashMap<u32, Municipality>,
    departments: BTreeMap<u32, Department>,
}

impl GeoReference {
    /// Look up a municipality by full code
    #[must_use]
    pub fn municipality(&self, code: u32) -> Option<&Municipality> {
        self.municipalities.get(&code)
    }

    /// Look up a department by code
    #[must_use]
    pub fn department(&self, code: u32) -> Option<&Department> {
        self.departments.get(&code)
    }

    /// Find a department by name (case and whitespace insensitive) or by code
    #[must_use]
    pub fn find_department(&self, query: &str) -> Option<&Department> {
        if let Some(code) = parse_code(query) {
            return self.department(code);
        }
        let wanted = normalize_text(query);
        self.departments
            .values()
            .find(|d| normalize_text(&d.name) == wanted)
    }

    /// Departments ordered by code
    pub fn departments(&self) -> impl Iterator<Item = &Department> {
        self.departments.values()
    }

    /// Municipalities in unspecified order
    pub fn municipalities(&self) -> impl Iterator<Item = &Municipality> {
        self.municipalities.values()
    }

    /// Number of municipalities
    #[must_use]
    pub fn len(&self) -> usize {
        self.municipalities.len()
    }

    /// Whether the reference has no municipalities
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.municipalities.is_empty()
    }

    /// Join a record's department and municipality codes.
    ///
    /// Fails when the municipality is unknown or belongs to another department.
    #[must_use]
    pub fn resolve(&self, department_code: u32, municipality_code: u32) -> Option<ResolvedGeo> {
        let municipality = self.municipality(municipality_code)?;
        if municipality.department_code != department_code {
            return None;
        }
        let department = self.department(department_code)?;
        Some(ResolvedGeo {
            department_code,
            department: Arc::clone(&department.name),
            municipality_code,
            municipality: Arc::clone(&municipality.name),
        })
    }

    /// Boundary-geometry key of a department, if the department is known
    /// and has one.
    #[must_use]
    pub fn resolve_boundary_key(&self, department_code: u32) -> Option<&str> {
        self.department(department_code)?.boundary_key.as_deref()
    }
}

/// One municipality row of the geographic source
#[derive(Debug, Clone)]
pub struct GeoRow {
    /// Full or local municipality code
    pub municipality_code: u32,
    /// Municipality name
    pub municipality_name: String,
    /// Department code
    pub department_code: u32,
    /// Department name
    pub department_name: String,
    /// Population, if known
    pub population: Option<u64>,
    /// Department boundary key, if known
    pub boundary_key: Option<String>,
}

/// Incremental construction of a [`GeoReference`]
#[derive(Debug)]
pub struct GeoReferenceBuilder {
    source_name: String,
    reference: GeoReference,
}

impl GeoReferenceBuilder {
    /// Start an empty reference
    #[must_use]
    pub fn new(source_name: &str) -> Self {
        Self {
            source_name: source_name.to_string(),
            reference: GeoReference::default(),
        }
    }

    /// Insert a municipality row.
    ///
    /// Fails on a repeated municipality code. Returns a warning when the row
    /// disagrees with an earlier row about its department's name or boundary
    /// key; the earlier values are kept. A row whose code cannot be composed
    /// is skipped with a warning.
    pub fn insert(&mut self, row: GeoRow) -> Result<Option<String>> {
        let Some(code) = crate::utils::divipola_code(row.department_code, row.municipality_code)
        else {
            return Ok(Some(format!(
                "municipality {} of department {} has no valid DIVIPOLA code; row skipped",
                row.municipality_code, row.department_code
            )));
        };
        if self.reference.municipalities.contains_key(&code) {
            return Err(MortalityError::duplicate_key(
                &self.source_name,
                code.to_string(),
            ));
        }

        let boundary_key = row
            .boundary_key
            .filter(|k| !k.trim().is_empty())
            .map(|k| Arc::<str>::from(k.trim()));

        let mut warning = None;
        let department = self
            .reference
            .departments
            .entry(row.department_code)
            .or_insert_with(|| Department {
                code: row.department_code,
                name: Arc::from(row.department_name.trim()),
                boundary_key: boundary_key.clone(),
            });

        if normalize_text(&department.name) != normalize_text(&row.department_name) {
            warning = Some(format!(
                "department {} named both '{}' and '{}'",
                row.department_code, department.name, row.department_name
            ));
        } else if department.boundary_key.is_none() {
            department.boundary_key = boundary_key;
        } else if boundary_key.is_some() && department.boundary_key != boundary_key {
            warning = Some(format!(
                "department {} has conflicting boundary keys",
                row.department_code
            ));
        }

        self.reference.municipalities.insert(
            code,
            Municipality {
                code,
                name: Arc::from(row.municipality_name.trim()),
                department_code: row.department_code,
                population: row.population,
            },
        );

        Ok(warning)
    }

    /// Freeze the reference
    #[must_use]
    pub fn build(self) -> GeoReference {
        self.reference
    }
}
