//! Generic table types.
//!
//! Input files are ingested into an in-memory [`DataSet`] whose [`Schema`] is inferred from the
//! file header. Cleaning stages operate on `DataSet`s until they validate the result into typed
//! rows (see [`crate::model`]); typed tables convert back into a `DataSet` for export and
//! reductions.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::{PipelineError, PipelineResult};

/// Logical data type for a schema field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    Utf8,
}

/// A single named, typed field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field/column name.
    pub name: String,
    /// Field data type.
    pub data_type: DataType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// An ordered list of fields describing the shape of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Returns the index of a field by name, or a schema error naming the missing column.
    pub fn require(&self, name: &str) -> PipelineResult<usize> {
        self.index_of(name).ok_or_else(|| {
            let available: Vec<&str> = self.field_names().collect();
            PipelineError::missing_column(name, &available)
        })
    }

    /// Returns the declared type of `name`, if the field exists.
    pub fn data_type_of(&self, name: &str) -> Option<&DataType> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| &f.data_type)
    }
}

/// A single typed value in a [`DataSet`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// Borrow the string payload of a [`Value::Utf8`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Utf8(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

/// Counts are exported by spreadsheets as either `120` or `120.0`; both are accepted, a
/// fractional part is not.
pub(crate) fn parse_count(s: &str) -> Result<i64, String> {
    if let Ok(v) = s.parse::<i64>() {
        return Ok(v);
    }
    match s.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && f.is_finite() && f.abs() < i64::MAX as f64 => Ok(f as i64),
        Ok(_) => Err("expected a whole number".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

impl fmt::Display for Value {
    /// Renders the value the way it would appear in a delimited file; `Null` renders as "".
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Utf8(s) => f.write_str(s),
        }
    }
}

impl From<Option<i64>> for Value {
    fn from(v: Option<i64>) -> Self {
        v.map(Value::Int64).unwrap_or(Value::Null)
    }
}

impl From<Option<f64>> for Value {
    fn from(v: Option<f64>) -> Self {
        v.map(Value::Float64).unwrap_or(Value::Null)
    }
}

impl From<Option<&str>> for Value {
    fn from(v: Option<&str>) -> Self {
        v.map(|s| Value::Utf8(s.to_owned())).unwrap_or(Value::Null)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Int64(v) => serializer.serialize_i64(*v),
            Value::Float64(v) => serializer.serialize_f64(*v),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Utf8(s) => serializer.serialize_str(s),
        }
    }
}

/// In-memory tabular dataset.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl DataSet {
    /// Create a dataset from schema and rows.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        Self { schema, rows }
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Create a new dataset containing only rows that match `predicate`.
    ///
    /// The returned dataset preserves the original schema.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&[Value]) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|row| predicate(row.as_slice()))
            .cloned()
            .collect();
        Self {
            schema: self.schema.clone(),
            rows,
        }
    }

    /// Create a new dataset by applying `mapper` to every row.
    ///
    /// The returned dataset preserves the original schema.
    ///
    /// # Panics
    ///
    /// Panics if `mapper` returns a row with a different length than the schema field count.
    pub fn map_rows<F>(&self, mut mapper: F) -> Self
    where
        F: FnMut(&[Value]) -> Vec<Value>,
    {
        let expected_len = self.schema.fields.len();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let out = mapper(row.as_slice());
                assert!(
                    out.len() == expected_len,
                    "mapped row length {} does not match schema length {}",
                    out.len(),
                    expected_len
                );
                out
            })
            .collect();

        Self {
            schema: self.schema.clone(),
            rows,
        }
    }

    /// Reduce (fold) all rows into an accumulator value.
    pub fn reduce_rows<A, F>(&self, init: A, mut reducer: F) -> A
    where
        F: FnMut(A, &[Value]) -> A,
    {
        self.rows
            .iter()
            .fold(init, |acc, row| reducer(acc, row.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_count, DataSet, DataType, Field, Schema, Value};
    use crate::error::ErrorKind;

    fn lunch_dataset() -> DataSet {
        let schema = Schema::new(vec![
            Field::new("school_name", DataType::Utf8),
            Field::new("frpl_pct", DataType::Utf8),
        ]);
        DataSet::new(
            schema,
            vec![
                vec![Value::Utf8("Adams".to_string()), Value::Utf8("81%".to_string())],
                vec![Value::Null, Value::Utf8("40%".to_string())],
            ],
        )
    }

    #[test]
    fn require_reports_missing_column_as_schema_error() {
        let ds = lunch_dataset();
        assert_eq!(ds.schema.require("frpl_pct").unwrap(), 1);
        let err = ds.schema.require("tot").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert!(err.to_string().contains("'tot'"));
    }

    #[test]
    fn display_renders_null_as_empty() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Int64(12).to_string(), "12");
        assert_eq!(Value::Float64(12.5).to_string(), "12.5");
        assert_eq!(Value::Utf8("x".to_string()).to_string(), "x");
    }

    #[test]
    fn value_serializes_as_plain_json() {
        let row = vec![Value::Null, Value::Int64(3), Value::Bool(true), Value::Utf8("a".into())];
        assert_eq!(serde_json::to_string(&row).unwrap(), r#"[null,3,true,"a"]"#);
    }

    #[test]
    fn counts_accept_whole_floats_only() {
        assert_eq!(parse_count("120"), Ok(120));
        assert_eq!(parse_count("120.0"), Ok(120));
        assert!(parse_count("120.5").is_err());
        assert!(parse_count("<10").is_err());
    }

    #[test]
    fn reduce_rows_counts_null_names() {
        let ds = lunch_dataset();
        let nulls = ds.reduce_rows(0usize, |acc, row| acc + usize::from(row[0] == Value::Null));
        assert_eq!(nulls, 1);
    }
}
