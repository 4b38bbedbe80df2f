//! Source loaders
//!
//! The reference loaders and the record loader run once at startup. Fatal
//! conditions (unopenable source, missing column, duplicate reference key)
//! are errors; everything else degrades into warnings and [`LoadStats`].

pub mod records;
pub mod reference;
pub mod stats;

pub use records::{RECORD_SOURCE, load_records, read_records};
pub use reference::{
    CAUSE_SOURCE, GEO_SOURCE, ReferenceWarning, load_cause_reference, load_geo_reference,
    read_cause_reference, read_geo_reference,
};
pub use stats::{ExclusionReason, IssueKind, LoadStats, RowIssue};
