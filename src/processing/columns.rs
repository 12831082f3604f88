//! Column-level operations for [`crate::types::DataSet`].

use crate::error::PipelineResult;
use crate::types::{DataSet, Schema, Value};

/// Returns a new [`DataSet`] without the listed columns.
///
/// Every listed column must exist; the first absent one is reported as a schema error and nothing
/// is dropped.
pub fn drop_columns(dataset: &DataSet, columns: &[&str]) -> PipelineResult<DataSet> {
    let mut dropped = Vec::with_capacity(columns.len());
    for name in columns {
        dropped.push(dataset.schema.require(name)?);
    }

    let keep: Vec<usize> = (0..dataset.schema.fields.len())
        .filter(|i| !dropped.contains(i))
        .collect();

    let schema = Schema::new(keep.iter().map(|&i| dataset.schema.fields[i].clone()).collect());
    let rows = dataset
        .rows
        .iter()
        .map(|row| keep.iter().map(|&i| row[i].clone()).collect())
        .collect();

    Ok(DataSet::new(schema, rows))
}

/// Remove every occurrence of `ch` from the string cells of each listed column.
///
/// Values stay strings; null cells stay null. Every listed column must exist.
pub fn strip_char_in_columns(
    dataset: &DataSet,
    columns: &[&str],
    ch: char,
) -> PipelineResult<DataSet> {
    let idxs = columns
        .iter()
        .map(|name| dataset.schema.require(name))
        .collect::<PipelineResult<Vec<_>>>()?;

    Ok(dataset.map_rows(|row| {
        let mut out = row.to_vec();
        for &i in &idxs {
            if let Value::Utf8(s) = &row[i] {
                if s.contains(ch) {
                    out[i] = Value::Utf8(s.replace(ch, ""));
                }
            }
        }
        out
    }))
}
