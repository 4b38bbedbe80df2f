//! Filter engine
//!
//! [`apply_filter`] selects the records matching a [`FilterPredicate`] (or any
//! other [`RecordFilter`]) from the loaded record set. Every active field of
//! the predicate must match; textual fields compare case and whitespace
//! insensitively.

pub mod core;
pub mod predicate;

pub use self::core::{Dimension, IncludeAllFilter, RecordFilter, RecordView, apply_filter};
pub use self::predicate::{DepartmentQuery, FilterPredicate};
