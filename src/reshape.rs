//! Wide-to-long reshape of the race/ethnicity counts.

use crate::model::{FilteredRow, LongRow, RaceEthnicity};

/// Unpivot `na_num`, `aa_num`, `hi_num`, `wh_num` into one [`LongRow`] each.
///
/// `school_name` and `high_poverty` are carried through unchanged. Rows come out grouped by
/// category in [`RaceEthnicity::ALL`] order, each group in input order, so the output has
/// exactly four times as many rows as the input.
pub fn melt(rows: &[FilteredRow]) -> Vec<LongRow> {
    RaceEthnicity::ALL
        .into_iter()
        .flat_map(|race| {
            rows.iter().map(move |row| LongRow {
                school_name: row.school.school_name.clone(),
                high_poverty: row.high_poverty,
                race_ethnicity: race,
                population: row.school.count(race),
            })
        })
        .collect()
}
