//! Shared fixtures for the integration tests
#![allow(dead_code)]

use std::fs;
use std::path::Path;

use chrono::Month;
use mortality_core::config::{DataSources, LoaderConfig};
use mortality_core::loader::{read_cause_reference, read_geo_reference, read_records};
use mortality_core::models::{Age, MannerOfDeath, MortalityRecord, Sex};
use mortality_core::{CauseReference, GeoReference, MortalityContext, Result};
use rand::Rng;
use rand::seq::IndexedRandom;

/// Geographic reference: Buenaventura has no usable population, Abriaquí has
/// no deaths at all.
pub const GEO_CSV: &str = "\
COD_DANE;COD_DEPARTAMENTO;DEPARTAMENTO;MUNICIPIO;POBLACION;CLAVE_MAPA
5001;5;Antioquia;Medellín;2500000;ANTIOQUIA
5002;5;Antioquia;Abejorral;20000;ANTIOQUIA
5004;5;Antioquia;Abriaquí;2000;ANTIOQUIA
11001;11;Bogotá, D.C.;Bogotá, D.C.;7900000;SANTAFE DE BOGOTA D.C
76001;76;Valle del Cauca;Cali;2200000;VALLE DEL CAUCA
76109;76;Valle del Cauca;Buenaventura;0;VALLE DEL CAUCA
";

pub const CAUSES_CSV: &str = "\
Código de la CIE-10 cuatro caracteres;Descripcion de códigos mortalidad a cuatro caracteres;Descripción de códigos mortalidad a tres caracteres
X954;Agresión con disparo de otras armas de fuego, en calle y carretera;Agresión con disparo de otras armas de fuego
I219;Infarto agudo del miocardio, sin otra especificación;Infarto agudo del miocardio
J189;Neumonía, no especificada;Neumonía, organismo no especificado
";

/// Twelve rows: nine kept (one unresolved municipality, one unknown cause
/// with an invalid age and unknown sex) and three excluded.
pub const RECORDS_CSV: &str = "\
COD_DEPARTAMENTO,COD_MUNICIPIO,SEXO,EDAD,UNIDAD_EDAD,MES,MANERA_MUERTE,COD_MUERTE
5,1,1,34,1,1,Homicidio,X954
5,1,2,80,1,1,Natural,I219
5,2,1,15,3,2,Natural,J189
11,1,2,45,1,3,Natural,I21.9
76,1,1,25,1,3,Homicidio,X95.4
76,109,1,30,1,4,Homicidio,X954
99,1,1,50,1,5,Natural,I219
5,1,9,200,1,6,Natural,Z999
5,1,1,40,1,13,Natural,I219
5,1,1,40,1,,Natural,I219
5,1,1,40,1,7,,I219
5,1,2,70,1,8,Suicidio,I219
";

pub fn fixture_references() -> Result<(CauseReference, GeoReference)> {
    let config = LoaderConfig::default();
    let (causes, _) = read_cause_reference(CAUSES_CSV.as_bytes(), &config)?;
    let (geo, _) = read_geo_reference(GEO_CSV.as_bytes(), &config)?;
    Ok((causes, geo))
}

/// The fixture loaded from memory
pub fn fixture_context() -> Result<MortalityContext> {
    let config = LoaderConfig::default();
    let (causes, geo) = fixture_references()?;
    let (records, stats) = read_records(RECORDS_CSV.as_bytes(), &causes, &geo, &config)?;
    Ok(MortalityContext::from_parts(causes, geo, records, stats))
}

/// Write the fixture under its canonical file names
pub fn write_sources(dir: &Path) -> std::io::Result<DataSources> {
    let sources = DataSources::from_dir(dir);
    fs::write(&sources.records, RECORDS_CSV)?;
    fs::write(&sources.causes, CAUSES_CSV)?;
    fs::write(&sources.geo, GEO_CSV)?;
    Ok(sources)
}

/// Random records over the fixture geography, including unresolvable codes
pub fn random_records<R: Rng>(
    rng: &mut R,
    count: usize,
    causes: &CauseReference,
    geo: &GeoReference,
) -> Vec<MortalityRecord> {
    const PLACES: [(u32, u32); 7] = [
        (5, 1),
        (5, 2),
        (5, 4),
        (11, 1),
        (76, 1),
        (76, 109),
        (99, 1),
    ];
    const CODES: [&str; 4] = ["X954", "I219", "J189", "Z999"];

    (0..count)
        .map(|_| {
            let (department, municipality) = *PLACES.choose(rng).unwrap_or(&PLACES[0]);
            let sex = *Sex::ALL.choose(rng).unwrap_or(&Sex::Unknown);
            let manner = *MannerOfDeath::ALL.choose(rng).unwrap_or(&MannerOfDeath::Natural);
            let month = Month::try_from(rng.random_range(1..=12u8)).unwrap_or(Month::January);
            let age = if rng.random_bool(0.05) {
                Age::Invalid
            } else {
                Age::Years(rng.random_range(0.0..125.0))
            };
            let code = *CODES.choose(rng).unwrap_or(&CODES[0]);
            MortalityRecord::new(department, municipality, sex, age, month, manner, code)
                .resolve(geo, causes)
        })
        .collect()
}
