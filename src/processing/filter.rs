//! Row filtering for [`crate::types::DataSet`].

use crate::types::{DataSet, Value};

/// Keep rows whose `column` holds a string for which `predicate` returns `true`.
///
/// Rows where the column is null (or not a string) are dropped. The returned dataset keeps the
/// input schema.
pub fn filter_str<F>(dataset: &DataSet, column: usize, mut predicate: F) -> DataSet
where
    F: FnMut(&str) -> bool,
{
    dataset.filter_rows(|row| row.get(column).and_then(Value::as_str).is_some_and(&mut predicate))
}

#[cfg(test)]
mod tests {
    use super::filter_str;
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    fn enrollment_sample() -> DataSet {
        let schema = Schema::new(vec![
            Field::new("school_name", DataType::Utf8),
            Field::new("tot", DataType::Int64),
        ]);

        let rows = vec![
            vec![Value::Utf8("Adams Total".to_string()), Value::Int64(420)],
            vec![Value::Utf8("Adams".to_string()), Value::Int64(60)],
            vec![Value::Null, Value::Int64(7)],
        ];

        DataSet::new(schema, rows)
    }

    #[test]
    fn filter_str_keeps_schema_and_input() {
        let ds = enrollment_sample();
        let out = filter_str(&ds, 0, |name| name.starts_with("Adams"));

        assert_eq!(out.schema, ds.schema);
        assert_eq!(out.row_count(), 2);
        // Original unchanged
        assert_eq!(ds.row_count(), 3);
    }

    #[test]
    fn filter_str_drops_null_cells() {
        let ds = enrollment_sample();
        let out = filter_str(&ds, 0, |name| !name.is_empty());
        assert_eq!(out.row_count(), 2);

        let totals = filter_str(&ds, 0, |name| name.contains("Total"));
        assert_eq!(
            totals.rows,
            vec![vec![Value::Utf8("Adams Total".to_string()), Value::Int64(420)]]
        );
    }

    #[test]
    fn filter_can_return_empty_dataset() {
        let ds = enrollment_sample();
        let out = filter_str(&ds, 0, |_| false);
        assert_eq!(out.schema, ds.schema);
        assert!(out.rows.is_empty());
    }
}
