//! Reduction operations for [`crate::types::DataSet`].

use crate::types::{DataSet, DataType, Value};

/// Built-in reduction operations over a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOp {
    /// Minimum numeric value, ignoring nulls.
    Min,
    /// Maximum numeric value, ignoring nulls.
    Max,
}

impl ReduceOp {
    fn combine<T: PartialOrd>(self, acc: Option<T>, v: T) -> T {
        match acc {
            None => v,
            Some(a) => match self {
                ReduceOp::Min => {
                    if v < a {
                        v
                    } else {
                        a
                    }
                }
                ReduceOp::Max => {
                    if v > a {
                        v
                    } else {
                        a
                    }
                }
            },
        }
    }
}

/// Reduce a column using a built-in [`ReduceOp`].
///
/// - Returns `None` if `column` does not exist in the schema.
/// - Returns `Some(Value::Null)` if there are no non-null values, or if the column is not numeric.
pub fn reduce(dataset: &DataSet, column: &str, op: ReduceOp) -> Option<Value> {
    let idx = dataset.schema.index_of(column)?;

    let out: Value = match dataset.schema.fields[idx].data_type {
        DataType::Int64 => dataset
            .reduce_rows(None, |acc, row| match row.get(idx) {
                Some(Value::Int64(v)) => Some(op.combine(acc, *v)),
                _ => acc,
            })
            .into(),
        DataType::Float64 => dataset
            .reduce_rows(None, |acc, row| match row.get(idx) {
                Some(Value::Float64(v)) => Some(op.combine(acc, *v)),
                _ => acc,
            })
            .into(),
        DataType::Bool | DataType::Utf8 => Value::Null,
    };
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::{reduce, ReduceOp};
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    fn enrollment_with_nulls() -> DataSet {
        let schema = Schema::new(vec![
            Field::new("tot", DataType::Int64),
            Field::new("frpl_pct", DataType::Float64),
        ]);

        let rows = vec![
            vec![Value::Int64(420), Value::Float64(81.0)],
            vec![Value::Null, Value::Null],
            vec![Value::Int64(95), Value::Float64(12.5)],
        ];

        DataSet::new(schema, rows)
    }

    #[test]
    fn reduce_min_max_give_size_bounds() {
        let ds = enrollment_with_nulls();
        assert_eq!(reduce(&ds, "tot", ReduceOp::Min), Some(Value::Int64(95)));
        assert_eq!(reduce(&ds, "tot", ReduceOp::Max), Some(Value::Int64(420)));
        assert_eq!(reduce(&ds, "frpl_pct", ReduceOp::Min), Some(Value::Float64(12.5)));
    }

    #[test]
    fn reduce_non_numeric_column_is_null() {
        let schema = Schema::new(vec![Field::new("school_name", DataType::Utf8)]);
        let ds = DataSet::new(schema, vec![vec![Value::Utf8("Adams".to_string())]]);
        assert_eq!(reduce(&ds, "school_name", ReduceOp::Max), Some(Value::Null));
    }

    #[test]
    fn reduce_returns_none_for_missing_column() {
        let ds = enrollment_with_nulls();
        assert_eq!(reduce(&ds, "missing", ReduceOp::Max), None);
    }

    #[test]
    fn reduce_numeric_returns_null_if_all_values_null() {
        let schema = Schema::new(vec![Field::new("tot", DataType::Int64)]);
        let ds = DataSet::new(schema, vec![vec![Value::Null], vec![Value::Null]]);
        assert_eq!(reduce(&ds, "tot", ReduceOp::Min), Some(Value::Null));
        assert_eq!(reduce(&ds, "tot", ReduceOp::Max), Some(Value::Null));
    }
}
