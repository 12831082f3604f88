//! In-memory data transformations on [`crate::types::DataSet`].
//!
//! These are the generic building blocks the cleaning stages are written in:
//!
//! - [`filter_str`]: keep rows whose string cell matches a predicate
//! - [`map_str`]: rewrite the string cells of one column
//! - [`reduce()`]: min/max of a numeric column
//! - [`drop_columns`] / [`strip_char_in_columns`]: column-level cleanup
//!
//! ## Example: filter → strip → reduce
//!
//! ```rust
//! use school_dashboard::processing::{filter_str, reduce, strip_char_in_columns, ReduceOp};
//! use school_dashboard::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let schema = Schema::new(vec![
//!     Field::new("school_name", DataType::Utf8),
//!     Field::new("tot", DataType::Int64),
//!     Field::new("na_pct", DataType::Utf8),
//! ]);
//! let ds = DataSet::new(
//!     schema,
//!     vec![
//!         vec![Value::Utf8("Adams Total".into()), Value::Int64(300), Value::Utf8("10%".into())],
//!         vec![Value::Utf8("Adams".into()), Value::Int64(40), Value::Utf8("2%".into())],
//!         vec![Value::Null, Value::Null, Value::Null],
//!     ],
//! );
//!
//! let totals = filter_str(&ds, 0, |name| name.contains("Total"));
//! let clean = strip_char_in_columns(&totals, &["na_pct"], '%').unwrap();
//! assert_eq!(clean.rows[0][2], Value::Utf8("10".into()));
//!
//! assert_eq!(reduce(&ds, "tot", ReduceOp::Max), Some(Value::Int64(300)));
//! ```

pub mod columns;
pub mod filter;
pub mod map;
pub mod reduce;

pub use columns::{drop_columns, strip_char_in_columns};
pub use filter::filter_str;
pub use map::map_str;
pub use reduce::{reduce, ReduceOp};
