//! Poverty (free/reduced-price lunch) table cleaning.

use crate::error::PipelineResult;
use crate::model::{columns, CleanLunchRow};
use crate::processing::{filter_str, strip_char_in_columns};
use crate::types::DataSet;

use super::PERCENT_SIGN;

/// Category and aggregate rows of the poverty source that are not real schools.
pub const EXCLUDED_LUNCH_NAMES: [&str; 8] = [
    "ELM K_08",
    "Mid Schl",
    "High Schl",
    "Alt HS",
    "Spec Ed Total",
    "Cont Alt Total",
    "Hospital Sites Total",
    "Dist Total",
];

/// Reduce the raw poverty table to real schools.
///
/// Rows without a `school_name` and rows named in [`EXCLUDED_LUNCH_NAMES`] are dropped, then `%`
/// is removed from `frpl_pct`. Columns other than `school_name` and `frpl_pct` are ignored.
pub fn clean_lunch_table(raw: &DataSet) -> PipelineResult<Vec<CleanLunchRow>> {
    let name = raw.schema.require(columns::SCHOOL_NAME)?;
    raw.schema.require(columns::FRPL_PCT)?;

    let schools = filter_str(raw, name, |s| !EXCLUDED_LUNCH_NAMES.contains(&s));
    let stripped = strip_char_in_columns(&schools, &[columns::FRPL_PCT], PERCENT_SIGN)?;

    log::debug!(
        "lunch cleaner kept {} of {} poverty rows",
        stripped.row_count(),
        raw.row_count()
    );
    CleanLunchRow::from_dataset(&stripped)
}

#[cfg(test)]
mod tests {
    use super::{clean_lunch_table, EXCLUDED_LUNCH_NAMES};
    use crate::error::ErrorKind;
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    fn raw(names: &[Option<&str>]) -> DataSet {
        let schema = Schema::new(vec![
            Field::new("district", DataType::Utf8),
            Field::new("school_name", DataType::Utf8),
            Field::new("frpl_pct", DataType::Utf8),
        ]);
        let rows = names
            .iter()
            .map(|n| {
                vec![
                    Value::Utf8("D1".to_string()),
                    (*n).into(),
                    Value::Utf8("80%".to_string()),
                ]
            })
            .collect();
        DataSet::new(schema, rows)
    }

    #[test]
    fn drops_null_and_excluded_names() {
        let mut names: Vec<Option<&str>> = EXCLUDED_LUNCH_NAMES.iter().map(|n| Some(*n)).collect();
        names.push(None);
        names.push(Some("Adams"));
        names.push(Some("Hospital Site Total"));

        let out = clean_lunch_table(&raw(&names)).unwrap();
        let kept: Vec<&str> = out.iter().map(|r| r.school_name.as_str()).collect();
        // exclusion is exact match only
        assert_eq!(kept, vec!["Adams", "Hospital Site Total"]);
    }

    #[test]
    fn strips_percent_from_frpl() {
        let out = clean_lunch_table(&raw(&[Some("Adams")])).unwrap();
        assert_eq!(out[0].frpl_pct.as_deref(), Some("80"));
    }

    #[test]
    fn requires_frpl_column() {
        let schema = Schema::new(vec![Field::new("school_name", DataType::Utf8)]);
        let ds = DataSet::new(schema, vec![vec![Value::Utf8("Adams".to_string())]]);
        let err = clean_lunch_table(&ds).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
    }
}
