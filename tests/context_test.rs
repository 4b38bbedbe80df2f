mod common;

use std::fs;

use common::{fixture_context, write_sources};
use mortality_core::config::{AggregateOptions, DashboardConfig, DataSources, LoaderConfig};
use mortality_core::geo::{map_regions, unmapped_departments};
use mortality_core::models::{MannerOfDeath, Sex};
use mortality_core::{CityScope, FilterPredicate, MortalityContext, MortalityError};
use tempfile::tempdir;

type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Test loading the three sources from disk
#[test]
fn test_load_from_directory() -> TestResult {
    let dir = tempdir()?;
    let sources = write_sources(dir.path())?;
    let context = MortalityContext::load(&sources, &LoaderConfig::default())?;

    assert_eq!(context.records().len(), 9);
    assert_eq!(context.stats().total_rows, 12);
    assert_eq!(context.causes().len(), 3);
    assert_eq!(context.geo().len(), 6);
    assert!(context.warnings().is_empty());
    Ok(())
}

/// Test that a missing source is fatal and names the source
#[test]
fn test_missing_source() -> TestResult {
    let dir = tempdir()?;
    let sources = write_sources(dir.path())?;
    fs::remove_file(&sources.geo)?;

    let err = MortalityContext::load(&sources, &LoaderConfig::default()).unwrap_err();
    assert!(err.is_source_error());
    assert!(matches!(err, MortalityError::SourceUnavailable { ref source_name, .. } if source_name == "geo"));
    Ok(())
}

/// Test that a source missing a required column is fatal
#[test]
fn test_schema_error() -> TestResult {
    let dir = tempdir()?;
    let sources = write_sources(dir.path())?;
    fs::write(&sources.causes, "codigo;descripcion\nX954;Agresión\n")?;

    let err = MortalityContext::load(&sources, &LoaderConfig::default()).unwrap_err();
    assert!(matches!(err, MortalityError::Schema { ref source_name, .. } if source_name == "causes"));
    Ok(())
}

/// Test that two loads of the same sources give byte-identical output
#[test]
fn test_deterministic_output() -> TestResult {
    let dir = tempdir()?;
    let sources = write_sources(dir.path())?;
    let predicate = FilterPredicate::empty().with_department("Antioquia");
    let options = AggregateOptions::default();

    let render = |sources: &DataSources| -> TestResult<String> {
        let context = MortalityContext::load(sources, &LoaderConfig::default())?;
        let aggregates = context.aggregate(&predicate, &options)?;
        Ok(serde_json::to_string(&aggregates)?)
    };
    assert_eq!(render(&sources)?, render(&sources)?);
    Ok(())
}

/// Test that the department filter scopes the city rankings
#[test]
fn test_city_scope_follows_department() -> TestResult {
    let context = fixture_context()?;

    assert_eq!(context.city_scope(&FilterPredicate::empty()), CityScope::All);
    let valle = FilterPredicate::empty().with_department("valle del cauca");
    assert_eq!(context.city_scope(&valle), CityScope::Department(76));
    let nowhere = FilterPredicate::empty().with_department("Atlantis");
    assert_eq!(context.city_scope(&nowhere), CityScope::Unmatched);

    let aggregates = context.aggregate(&valle, &AggregateOptions::default())?;
    assert_eq!(aggregates.record_count, 2);
    // Buenaventura has no population, so only Cali ranks
    assert_eq!(aggregates.lowest_mortality_rate_cities.len(), 1);
    assert_eq!(aggregates.lowest_mortality_rate_cities[0].municipality, "Cali");

    let empty = context.aggregate(&nowhere, &AggregateOptions::default())?;
    assert_eq!(empty.record_count, 0);
    assert!(empty.lowest_mortality_rate_cities.is_empty());
    Ok(())
}

/// Test the values offered for each filter dimension
#[test]
fn test_filter_options() -> TestResult {
    let context = fixture_context()?;
    let options = context.filter_options();

    assert_eq!(
        options.departments,
        vec!["Antioquia", "Bogotá, D.C.", "Valle del Cauca"]
    );
    assert_eq!(options.sexes, vec![Sex::Male, Sex::Female, Sex::Unknown]);
    assert_eq!(options.months, vec![1, 2, 3, 4, 5, 6, 8]);
    assert_eq!(
        options.manners,
        vec![
            MannerOfDeath::Homicide,
            MannerOfDeath::Natural,
            MannerOfDeath::Suicide
        ]
    );
    Ok(())
}

/// Test that map regions carry boundary keys in count order
#[test]
fn test_map_regions() -> TestResult {
    let context = fixture_context()?;
    let aggregates = context.aggregate(&FilterPredicate::empty(), &AggregateOptions::default())?;
    let regions = map_regions(context.geo(), &aggregates.department_counts);

    assert_eq!(regions.len(), 3);
    assert_eq!(regions[0].boundary_key.as_deref(), Some("ANTIOQUIA"));
    assert_eq!(regions[0].deaths, 5);
    assert!(unmapped_departments(context.geo(), &aggregates.department_counts).is_empty());
    Ok(())
}

/// Test reading a partial configuration file
#[test]
fn test_config_file() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("dashboard.json");
    fs::write(
        &path,
        r#"{"aggregate": {"top_cities": 5, "department_order": "count_descending"}, "loader": {"max_valid_age": 120.0}}"#,
    )?;

    let config = DashboardConfig::from_json_file(&path)?;
    assert_eq!(config.aggregate.top_cities, 5);
    assert_eq!(config.aggregate.age_bin_width, 10);
    assert!((config.loader.max_valid_age - 120.0).abs() < f64::EPSILON);
    assert_eq!(config.loader.reference_delimiter, ';');

    fs::write(&path, r#"{"aggregate": {"age_bin_width": 0}}"#)?;
    assert!(matches!(
        DashboardConfig::from_json_file(&path),
        Err(MortalityError::Config(_))
    ));
    Ok(())
}
