//! Domain models for mortality records and their reference tables

pub mod record;
pub mod reference;
pub mod types;

pub use record::{MortalityRecord, ResolvedCause};
pub use reference::{
    CauseEntry, CauseReference, CauseReferenceBuilder, Department, GeoReference,
    GeoReferenceBuilder, GeoRow, Municipality, ResolvedGeo,
};
pub use types::{Age, AgeUnit, MannerOfDeath, Sex, all_months, month_label, parse_month};
