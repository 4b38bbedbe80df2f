//! Geo key resolver
//!
//! Maps department codes to the keys of the boundary document consumed by
//! the map renderer. A missing key is a normal outcome: the renderer leaves
//! that region unshaded.

use itertools::Itertools;
use serde::Serialize;

use crate::algorithm::aggregation::DepartmentCount;
use crate::models::GeoReference;

/// Department names whose boundary polygon is filed under another name
const DISTRICT_ALIASES: [(&str, &str); 6] = [
    (
        "ARCHIPIELAGO DE SAN ANDRES, PROVIDENCIA Y SANTA CATALINA",
        "SAN ANDRES",
    ),
    ("BARRANQUILLA D.E.", "ATLANTICO"),
    ("BOGOTA, D.C.", "BOGOTA D.C."),
    ("CARTAGENA D.T. Y C.", "BOLIVAR"),
    ("SANTA MARTA D.T. Y C.", "MAGDALENA"),
    ("BUENAVENTURA D.E.", "VALLE DEL CAUCA"),
];

/// Boundary key derived from a DIVIPOLA department name.
///
/// Keys are uppercase without acute accents (`Ñ` is kept), with whitespace
/// collapsed. Special districts map to the department containing them.
#[must_use]
pub fn boundary_key_from_name(department_name: &str) -> String {
    let folded: String = department_name
        .split_whitespace()
        .join(" ")
        .chars()
        .flat_map(char::to_uppercase)
        .map(strip_acute)
        .collect();
    DISTRICT_ALIASES
        .iter()
        .find(|(name, _)| *name == folded)
        .map_or(folded, |(_, key)| (*key).to_string())
}

const fn strip_acute(c: char) -> char {
    match c {
        'Á' => 'A',
        'É' => 'E',
        'Í' => 'I',
        'Ó' => 'O',
        'Ú' | 'Ü' => 'U',
        other => other,
    }
}

/// Boundary-geometry key of a department
#[must_use]
pub fn resolve_boundary_key(geo: &GeoReference, department_code: u32) -> Option<&str> {
    geo.resolve_boundary_key(department_code)
}

/// A department count paired with its boundary key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapRegion {
    /// DIVIPOLA department code
    pub department_code: u32,
    /// Department name
    pub department: String,
    /// Key of the polygon to shade, if the department has one
    pub boundary_key: Option<String>,
    /// Number of records
    pub deaths: usize,
}

/// Attach boundary keys to department counts, keeping their order
#[must_use]
pub fn map_regions(geo: &GeoReference, counts: &[DepartmentCount]) -> Vec<MapRegion> {
    counts
        .iter()
        .map(|count| MapRegion {
            department_code: count.department_code,
            department: count.department.clone(),
            boundary_key: resolve_boundary_key(geo, count.department_code).map(str::to_string),
            deaths: count.deaths,
        })
        .collect()
}

/// Departments among the counts that have no boundary key
#[must_use]
pub fn unmapped_departments<'a>(
    geo: &GeoReference,
    counts: &'a [DepartmentCount],
) -> Vec<&'a str> {
    counts
        .iter()
        .filter(|count| resolve_boundary_key(geo, count.department_code).is_none())
        .map(|count| count.department.as_str())
        .collect()
}
