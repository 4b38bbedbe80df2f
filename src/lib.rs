//! A Rust library for joining Colombian non-fetal mortality records with their
//! cause-of-death and DIVIPOLA geographic references, filtering them and
//! computing the dashboard aggregates.

pub mod algorithm;
pub mod config;
pub mod context;
pub mod error;
pub mod filter;
pub mod geo;
pub mod loader;
pub mod models;
pub mod reader;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::{AggregateOptions, DashboardConfig, DataSources, LoaderConfig};
pub use context::{FilterOptions, MortalityContext};
pub use error::{MortalityError, Result};

// Domain models
pub use models::{
    Age, CauseReference, GeoReference, MannerOfDeath, MortalityRecord, Sex, month_label,
};

// Filtering and aggregation
pub use algorithm::aggregation::{AggregateSet, CityScope};
pub use filter::{FilterPredicate, RecordFilter, RecordView, apply_filter};
pub use geo::{MapRegion, map_regions, resolve_boundary_key};

// Loading
pub use loader::{
    LoadStats, ReferenceWarning, load_cause_reference, load_geo_reference, load_records,
};
