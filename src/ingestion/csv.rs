//! Delimited-file ingestion implementation.

use std::io::Read;
use std::path::Path;

use crate::error::{PipelineError, PipelineResult};
use crate::types::{parse_count, DataSet, DataType, Field, Schema, Value};

/// Ingest a delimited file into an in-memory [`DataSet`].
///
/// Rules:
///
/// - The file must have a header row; the schema is taken from it, in header order.
/// - A header that appears in `hints` gets the hinted type; every other column is `Utf8`.
/// - Every record must have as many fields as the header.
/// - Cells are trimmed; empty cells become [`Value::Null`].
pub fn ingest_delimited_from_path(
    path: impl AsRef<Path>,
    delimiter: u8,
    hints: &Schema,
) -> PipelineResult<DataSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .from_path(path)?;
    ingest_csv_from_reader(&mut rdr, hints)
}

/// Ingest a comma-separated file. Shorthand for [`ingest_delimited_from_path`] with `b','`.
pub fn ingest_csv_from_path(path: impl AsRef<Path>, hints: &Schema) -> PipelineResult<DataSet> {
    ingest_delimited_from_path(path, b',', hints)
}

/// Ingest delimited data from an existing CSV reader.
pub fn ingest_csv_from_reader<R: Read>(
    rdr: &mut csv::Reader<R>,
    hints: &Schema,
) -> PipelineResult<DataSet> {
    let headers = rdr.headers()?.clone();
    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(PipelineError::Malformed {
            message: "input has no header row".to_string(),
        });
    }

    let schema = infer_schema(&headers, hints);

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        // Report 1-based row number for users; +1 again because header is row 1.
        let user_row = row_idx0 + 2;
        let record = result?;

        let mut row: Vec<Value> = Vec::with_capacity(schema.fields.len());
        for (field, raw) in schema.fields.iter().zip(record.iter()) {
            row.push(parse_typed_value(user_row, &field.name, &field.data_type, raw)?);
        }
        rows.push(row);
    }

    Ok(DataSet::new(schema, rows))
}

fn infer_schema(headers: &csv::StringRecord, hints: &Schema) -> Schema {
    Schema::new(
        headers
            .iter()
            .map(|h| {
                let name = h.trim();
                let data_type = hints.data_type_of(name).cloned().unwrap_or(DataType::Utf8);
                Field::new(name, data_type)
            })
            .collect(),
    )
}

fn parse_typed_value(
    row: usize,
    column: &str,
    data_type: &DataType,
    raw: &str,
) -> PipelineResult<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Value::Null);
    }

    let conversion = |message: String| PipelineError::Conversion {
        row,
        column: column.to_owned(),
        raw: raw.to_owned(),
        message,
    };

    match data_type {
        DataType::Utf8 => Ok(Value::Utf8(trimmed.to_owned())),
        DataType::Int64 => parse_count(trimmed).map(Value::Int64).map_err(conversion),
        DataType::Float64 => trimmed
            .parse::<f64>()
            .map(Value::Float64)
            .map_err(|e| conversion(e.to_string())),
        DataType::Bool => parse_bool(trimmed).map(Value::Bool).map_err(conversion),
    }
}

fn parse_bool(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" => Ok(true),
        "false" | "f" | "0" | "no" | "n" => Ok(false),
        _ => Err("expected bool (true/false/1/0/yes/no)".to_string()),
    }
}
