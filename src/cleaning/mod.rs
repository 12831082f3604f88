//! Cleaners for the two raw input tables.
//!
//! Both cleaners are written as a chain of [`crate::processing`] steps over the raw
//! [`crate::types::DataSet`], then validated into typed rows at the end.

pub mod lunch;
pub mod school;

pub use lunch::{clean_lunch_table, EXCLUDED_LUNCH_NAMES};
pub use school::clean_school_table;

/// Character stripped from percentage columns.
pub const PERCENT_SIGN: char = '%';
