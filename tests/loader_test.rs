mod common;

use common::{CAUSES_CSV, GEO_CSV, RECORDS_CSV, fixture_references};
use mortality_core::config::LoaderConfig;
use mortality_core::loader::{
    ExclusionReason, IssueKind, read_cause_reference, read_geo_reference, read_records,
};
use mortality_core::models::{Age, MannerOfDeath, Sex};
use mortality_core::{MortalityError, Result};

/// Test the reference tables of the fixture
#[test]
fn test_reference_loading() -> Result<()> {
    let config = LoaderConfig::default();
    let (causes, cause_warnings) = read_cause_reference(CAUSES_CSV.as_bytes(), &config)?;
    let (geo, geo_warnings) = read_geo_reference(GEO_CSV.as_bytes(), &config)?;

    assert_eq!(causes.len(), 3);
    assert!(cause_warnings.is_empty());
    let entry = causes.get("i21.9").expect("normalized lookup");
    assert_eq!(
        &*entry.description,
        "Infarto agudo del miocardio, sin otra especificación"
    );
    assert_eq!(
        entry.category.as_deref(),
        Some("Infarto agudo del miocardio")
    );

    assert_eq!(geo.len(), 6);
    assert!(geo_warnings.is_empty());
    assert_eq!(geo.departments().count(), 3);
    assert_eq!(geo.municipality(76109).and_then(|m| m.rate_population()), None);
    assert_eq!(geo.resolve_boundary_key(11), Some("SANTAFE DE BOGOTA D.C"));
    Ok(())
}

/// Test that a repeated cause code fails the whole reference
#[test]
fn test_duplicate_cause_code() {
    let source = format!("{CAUSES_CSV}X95.4;Otra descripción;Otra\n");
    let err = read_cause_reference(source.as_bytes(), &LoaderConfig::default()).unwrap_err();
    assert!(matches!(err, MortalityError::DuplicateKey { ref key, .. } if key == "X954"));
}

/// Test that a repeated municipality fails the whole reference
#[test]
fn test_duplicate_municipality() {
    let source = format!("{GEO_CSV}5001;5;Antioquia;Medellín bis;10;ANTIOQUIA\n");
    let err = read_geo_reference(source.as_bytes(), &LoaderConfig::default()).unwrap_err();
    assert!(matches!(err, MortalityError::DuplicateKey { ref key, .. } if key == "5001"));
}

/// Test that incomplete reference rows are skipped with a warning
#[test]
fn test_reference_warnings() -> Result<()> {
    let config = LoaderConfig::default();
    let causes = format!("{CAUSES_CSV};Sin código;\nA001;;\n");
    let (reference, warnings) = read_cause_reference(causes.as_bytes(), &config)?;
    assert_eq!(reference.len(), 3);
    assert_eq!(warnings.len(), 2);
    assert!(warnings.iter().all(|w| w.source_name == "causes"));

    let geo = format!("{GEO_CSV}abc;5;Antioquia;Nada;1;ANTIOQUIA\n5021;5;Antioquia;Alejandría;n/a;ANTIOQUIA\n");
    let (reference, warnings) = read_geo_reference(geo.as_bytes(), &config)?;
    assert_eq!(reference.len(), 7);
    assert_eq!(warnings.len(), 2);
    assert_eq!(reference.municipality(5021).and_then(|m| m.population), None);
    Ok(())
}

/// Test that boundary keys are derived from department names without a key column
#[test]
fn test_boundary_key_fallback() -> Result<()> {
    let source = "\
COD_DANE;COD_DEPARTAMENTO;DEPARTAMENTO;MUNICIPIO;POBLACION
5001;5;Antioquia;Medellín;2500000
8001;8;ATLÁNTICO;Barranquilla;1200000
11001;11;BOGOTÁ, D.C.;BOGOTÁ, D.C.;7900000
13001;13;CARTAGENA D.T. Y C.;Cartagena;1000000
52001;52;NARIÑO;Pasto;390000
";
    let (geo, warnings) = read_geo_reference(source.as_bytes(), &LoaderConfig::default())?;
    assert!(warnings.is_empty());
    assert_eq!(geo.resolve_boundary_key(5), Some("ANTIOQUIA"));
    assert_eq!(geo.resolve_boundary_key(8), Some("ATLANTICO"));
    assert_eq!(geo.resolve_boundary_key(11), Some("BOGOTA D.C."));
    assert_eq!(geo.resolve_boundary_key(13), Some("BOLIVAR"));
    assert_eq!(geo.resolve_boundary_key(52), Some("NARIÑO"));
    assert_eq!(geo.resolve_boundary_key(99), None);
    Ok(())
}

/// Test that integral decimal populations are read as counts
#[test]
fn test_decimal_population() -> Result<()> {
    let source = format!(
        "{GEO_CSV}5021;5;Antioquia;Alejandría;1500.0;ANTIOQUIA\n5030;5;Antioquia;Amagá;2.533.424;ANTIOQUIA\n5031;5;Antioquia;Amalfi;1500.5;ANTIOQUIA\n"
    );
    let (geo, warnings) = read_geo_reference(source.as_bytes(), &LoaderConfig::default())?;
    assert_eq!(geo.municipality(5021).and_then(|m| m.population), Some(1500));
    assert_eq!(geo.municipality(5030).and_then(|m| m.population), Some(2_533_424));
    assert_eq!(geo.municipality(5031).and_then(|m| m.population), None);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.contains("1500.5"));
    Ok(())
}

/// Test that an oversized department code degrades instead of failing the load
#[test]
fn test_oversized_department_code() -> Result<()> {
    let config = LoaderConfig::default();
    let (causes, geo) = fixture_references()?;
    let source = "COD_DEPARTAMENTO,COD_MUNICIPIO,SEXO,EDAD,UNIDAD_EDAD,MES,MANERA_MUERTE,COD_MUERTE\n9999999,1,1,34,1,1,Homicidio,X954\n5,1,1,34,1,1,Homicidio,X954\n";
    let (records, stats) = read_records(source.as_bytes(), &causes, &geo, &config)?;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].municipality_code, None);
    assert!(records[0].geo.is_none());
    assert_eq!(stats.unresolved_geo_rows, 1);
    assert!(records[1].geo.is_some());

    let geo_source = format!("{GEO_CSV}1;9999999;Ninguno;Fuera de rango;10;NINGUNO\n");
    let (geo, warnings) = read_geo_reference(geo_source.as_bytes(), &config)?;
    assert_eq!(geo.len(), 6);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.contains("row skipped"));
    Ok(())
}

/// Test the record normalization of the fixture
#[test]
fn test_record_normalization() -> Result<()> {
    let (causes, geo) = fixture_references()?;
    let (records, stats) =
        read_records(RECORDS_CSV.as_bytes(), &causes, &geo, &LoaderConfig::default())?;

    assert_eq!(stats.total_rows, 12);
    assert_eq!(stats.excluded_rows, 3);
    assert_eq!(records.len(), 9);
    assert_eq!(stats.loaded_rows(), records.len());
    assert_eq!(stats.exclusions[&ExclusionReason::InvalidMonth], 2);
    assert_eq!(stats.exclusions[&ExclusionReason::MissingMannerOfDeath], 1);
    assert_eq!(stats.unresolved_geo_rows, 1);
    assert_eq!(stats.unresolved_cause_rows, 1);
    assert_eq!(stats.invalid_age_rows, 1);
    assert_eq!(stats.unknown_sex_rows, 1);
    assert!(
        stats
            .issues
            .iter()
            .any(|issue| issue.kind == IssueKind::UnresolvedGeo && issue.value == "99/1")
    );

    let first = &records[0];
    assert_eq!(first.municipality_code, Some(5001));
    assert_eq!(first.manner, MannerOfDeath::Homicide);
    assert_eq!(first.department_name(), Some("Antioquia"));

    // 15 days
    let infant = &records[2];
    let years = infant.age.years().expect("valid age");
    assert!(years > 0.0 && years < 0.1);

    // Dotted cause codes join like undotted ones
    assert_eq!(
        records[3].cause_description(),
        Some("Infarto agudo del miocardio, sin otra especificación")
    );
    assert_eq!(records[4].cause_code, "X954");

    let unresolved = &records[6];
    assert!(unresolved.geo.is_none());
    assert!(unresolved.cause.is_some());

    let defective = &records[7];
    assert_eq!(defective.sex, Sex::Unknown);
    assert_eq!(defective.age, Age::Invalid);
    assert!(defective.cause.is_none());
    assert!(defective.geo.is_some());
    Ok(())
}

/// Test that a missing required column is a schema error
#[test]
fn test_missing_record_column() -> Result<()> {
    let (causes, geo) = fixture_references()?;
    let source = "COD_DEPARTAMENTO,COD_MUNICIPIO,SEXO,EDAD,UNIDAD_EDAD,MANERA_MUERTE,COD_MUERTE\n";
    let err = read_records(source.as_bytes(), &causes, &geo, &LoaderConfig::default()).unwrap_err();
    assert!(matches!(err, MortalityError::Schema { ref column, .. } if column == "MES"));
    Ok(())
}

/// Test that an unrecognized manner is kept as Other
#[test]
fn test_unrecognized_manner_is_kept() -> Result<()> {
    let (causes, geo) = fixture_references()?;
    let source = "COD_DEPARTAMENTO,COD_MUNICIPIO,SEXO,EDAD,UNIDAD_EDAD,MES,MANERA_MUERTE,COD_MUERTE\n5,1,1,40,1,2,Desconocida,I219\n";
    let (records, stats) =
        read_records(source.as_bytes(), &causes, &geo, &LoaderConfig::default())?;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].manner, MannerOfDeath::Other);
    assert_eq!(stats.other_manner_rows, 1);
    Ok(())
}
