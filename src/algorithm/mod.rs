//! Algorithms over the normalized record set

pub mod aggregation;
