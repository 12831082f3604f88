//! Row mapping for [`crate::types::DataSet`].

use crate::types::{DataSet, Value};

/// Rewrite the string cells of a single column, leaving every other cell untouched.
///
/// Null and non-string cells are passed through unchanged.
pub fn map_str<F>(dataset: &DataSet, column: usize, mut rewrite: F) -> DataSet
where
    F: FnMut(&str) -> String,
{
    dataset.map_rows(|row| {
        let mut out = row.to_vec();
        if let Some(Value::Utf8(s)) = row.get(column) {
            out[column] = Value::Utf8(rewrite(s));
        }
        out
    })
}
