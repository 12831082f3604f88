//! Enrollment table cleaning.

use crate::error::PipelineResult;
use crate::model::{columns, CleanSchoolRow};
use crate::processing::{drop_columns, filter_str, map_str, strip_char_in_columns};
use crate::types::DataSet;

use super::PERCENT_SIGN;

/// Marker carried by per-school aggregate rows.
const TOTAL_MARKER: &str = "Total";
/// Suffix removed from aggregate row names.
const TOTAL_SUFFIX: &str = " Total";
/// What remains of the district-wide "Grand Total" row after the suffix is removed.
const GRAND_RESIDUAL: &str = "Grand";

/// Columns discarded by the cleaner.
pub const DROPPED_COLUMNS: [&str; 4] = [
    columns::SCHOOL_GROUP,
    columns::GRADE,
    columns::PI_PCT,
    columns::BLANK_COL,
];

/// Reduce the raw enrollment table to one row per school.
///
/// 1. keep rows whose `school_name` contains `"Total"` (null names are dropped)
/// 2. remove the first `" Total"` from `school_name`
/// 3. drop `school_group`, `grade`, `pi_pct`, `blank_col` (all must exist)
/// 4. remove the `"Grand"` row
/// 5. strip `%` from the race percentage columns
pub fn clean_school_table(raw: &DataSet) -> PipelineResult<Vec<CleanSchoolRow>> {
    let name = raw.schema.require(columns::SCHOOL_NAME)?;

    let totals = filter_str(raw, name, |s| s.contains(TOTAL_MARKER));
    let renamed = map_str(&totals, name, |s| s.replacen(TOTAL_SUFFIX, "", 1));
    let trimmed = drop_columns(&renamed, &DROPPED_COLUMNS)?;

    let name = trimmed.schema.require(columns::SCHOOL_NAME)?;
    let schools = filter_str(&trimmed, name, |s| s != GRAND_RESIDUAL);
    let stripped = strip_char_in_columns(&schools, &columns::RACE_PCT_COLUMNS, PERCENT_SIGN)?;

    log::debug!(
        "school cleaner kept {} of {} enrollment rows",
        stripped.row_count(),
        raw.row_count()
    );
    CleanSchoolRow::from_dataset(&stripped)
}

#[cfg(test)]
mod tests {
    use super::clean_school_table;
    use crate::error::ErrorKind;
    use crate::model::enrollment_hints;
    use crate::types::{DataSet, Schema, Value};

    fn schema() -> Schema {
        enrollment_hints()
    }

    fn raw_row(name: Option<&str>, grade: &str, tot: &str) -> Vec<Value> {
        let s = |v: &str| Value::Utf8(v.to_string());
        vec![
            name.into(),
            s("E"),
            s(grade),
            s(tot),
            s("1"),
            s("1%"),
            s("2"),
            s("2%"),
            s("3"),
            s("3%"),
            s("4"),
            s("12.5%"),
            s("5"),
            s("5%"),
            s("80%"),
            Value::Null,
        ]
    }

    fn raw() -> DataSet {
        DataSet::new(
            schema(),
            vec![
                raw_row(Some("Lincoln Elementary"), "K", "40"),
                raw_row(Some("Lincoln Elementary"), "1", "60"),
                raw_row(Some("Lincoln Elementary Total"), "ALL", "100"),
                raw_row(Some("Roosevelt High Total"), "ALL", "900"),
                raw_row(None, "ALL", "3"),
                raw_row(Some("Grand Total"), "ALL", "1000"),
            ],
        )
    }

    #[test]
    fn keeps_one_row_per_school_total() {
        let out = clean_school_table(&raw()).unwrap();
        let names: Vec<&str> = out.iter().map(|r| r.school_name.as_str()).collect();
        assert_eq!(names, vec!["Lincoln Elementary", "Roosevelt High"]);
        assert_eq!(out[0].tot, Some(100));
        assert!(out.iter().all(|r| !r.school_name.contains("Total") && r.school_name != "Grand"));
    }

    #[test]
    fn strips_percent_signs_but_keeps_strings() {
        let out = clean_school_table(&raw()).unwrap();
        assert_eq!(out[0].hi_pct.as_deref(), Some("12.5"));
        assert_eq!(out[0].as_pct.as_deref(), Some("3"));
        assert_eq!(out[0].na_pct.as_deref(), Some("1"));
    }

    #[test]
    fn only_the_first_total_suffix_is_removed() {
        let ds = DataSet::new(schema(), vec![raw_row(Some("Total Care Total"), "ALL", "10")]);
        let out = clean_school_table(&ds).unwrap();
        assert_eq!(out[0].school_name, "Total Care");

        let ds = DataSet::new(schema(), vec![raw_row(Some("A Total Total"), "ALL", "10")]);
        let out = clean_school_table(&ds).unwrap();
        assert_eq!(out[0].school_name, "A Total");
    }

    #[test]
    fn missing_drop_column_is_a_schema_error() {
        let mut ds = raw();
        let idx = ds.schema.index_of("pi_pct").unwrap();
        ds.schema.fields[idx].name = "perf_pct".to_string();

        let err = clean_school_table(&ds).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert!(err.to_string().contains("'pi_pct'"));
    }

    #[test]
    fn suppressed_counts_in_grade_rows_are_discarded_before_parsing() {
        let ds = DataSet::new(
            schema(),
            vec![
                raw_row(Some("Lincoln Elementary"), "K", "<10"),
                raw_row(Some("Lincoln Elementary"), "1", "*"),
                raw_row(Some("Lincoln Elementary Total"), "ALL", "100"),
            ],
        );
        let out = clean_school_table(&ds).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].tot, Some(100));
    }

    #[test]
    fn suppressed_count_on_a_total_row_is_a_conversion_error() {
        let ds = DataSet::new(
            schema(),
            vec![raw_row(Some("Lincoln Elementary Total"), "ALL", "<10")],
        );
        let err = clean_school_table(&ds).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conversion);
        assert!(err.to_string().contains("raw='<10'"));
    }

    #[test]
    fn no_total_rows_gives_empty_output() {
        let ds = DataSet::new(schema(), vec![raw_row(Some("Lincoln Elementary"), "K", "40")]);
        assert!(clean_school_table(&ds).unwrap().is_empty());
    }
}
