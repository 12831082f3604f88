//! Filter stage: size range and school inclusion, plus the poverty flag.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};
use crate::model::{columns, FilteredRow, JoinedRow};

/// Share of FRPL-eligible students above which a school counts as high poverty.
pub const DEFAULT_HIGH_POVERTY_THRESHOLD: f64 = 75.0;

/// Inclusive enrollment range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeRange {
    pub min: i64,
    pub max: i64,
}

impl SizeRange {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// `true` iff `tot` is present and within `[min, max]`.
    pub fn contains(&self, tot: Option<i64>) -> bool {
        tot.is_some_and(|t| self.min <= t && t <= self.max)
    }
}

/// Externally supplied filter parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterParams {
    pub size: SizeRange,
    pub schools: BTreeSet<String>,
}

/// Apply the size and school filters, then convert `frpl_pct` and derive `high_poverty`.
///
/// `frpl_pct` is only converted for rows that survive both filters; a non-numeric value there is
/// a conversion error. A null `frpl_pct` is never high poverty.
pub fn apply_filters(
    joined: &[JoinedRow],
    params: &FilterParams,
    high_poverty_threshold: f64,
) -> PipelineResult<Vec<FilteredRow>> {
    joined
        .iter()
        .enumerate()
        .filter(|(_, row)| params.size.contains(row.school.tot))
        .filter(|(_, row)| params.schools.contains(&row.school.school_name))
        .map(|(i, row)| -> PipelineResult<FilteredRow> {
            let frpl_pct = parse_frpl(i + 1, row.frpl_pct.as_deref())?;
            Ok(FilteredRow {
                school: row.school.clone(),
                frpl_pct,
                high_poverty: frpl_pct.is_some_and(|p| p > high_poverty_threshold),
            })
        })
        .collect()
}

fn parse_frpl(row: usize, raw: Option<&str>) -> PipelineResult<Option<f64>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    raw.trim()
        .parse::<f64>()
        .map(Some)
        .map_err(|e| PipelineError::Conversion {
            row,
            column: columns::FRPL_PCT.to_string(),
            raw: raw.to_string(),
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::{apply_filters, FilterParams, SizeRange, DEFAULT_HIGH_POVERTY_THRESHOLD};
    use crate::error::ErrorKind;
    use crate::model::{CleanSchoolRow, JoinedRow};

    fn joined(name: &str, tot: Option<i64>, frpl: Option<&str>) -> JoinedRow {
        JoinedRow {
            school: CleanSchoolRow {
                school_name: name.to_string(),
                tot,
                na_num: Some(1),
                na_pct: None,
                aa_num: Some(1),
                aa_pct: None,
                as_num: Some(1),
                as_pct: None,
                hi_num: Some(1),
                hi_pct: None,
                wh_num: Some(1),
                wh_pct: None,
            },
            frpl_pct: frpl.map(str::to_string),
        }
    }

    fn params(min: i64, max: i64, names: &[&str]) -> FilterParams {
        FilterParams {
            size: SizeRange::new(min, max),
            schools: names.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn size_range_is_inclusive() {
        let rows = vec![
            joined("A", Some(100), None),
            joined("B", Some(200), None),
            joined("C", Some(201), None),
            joined("D", None, None),
        ];
        let out = apply_filters(&rows, &params(100, 200, &["A", "B", "C", "D"]), 75.0).unwrap();
        let names: Vec<&str> = out.iter().map(|r| r.school.school_name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn inclusion_set_limits_schools() {
        let rows = vec![joined("A", Some(10), None), joined("B", Some(10), None)];
        let out = apply_filters(&rows, &params(0, 100, &["B"]), 75.0).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].school.school_name, "B");

        let none = apply_filters(&rows, &params(0, 100, &[]), 75.0).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn high_poverty_is_strictly_above_threshold() {
        let rows = vec![
            joined("A", Some(10), Some("75")),
            joined("B", Some(10), Some("75.1")),
            joined("C", Some(10), None),
            joined("D", Some(10), Some("12.5")),
        ];
        let out = apply_filters(
            &rows,
            &params(0, 100, &["A", "B", "C", "D"]),
            DEFAULT_HIGH_POVERTY_THRESHOLD,
        )
        .unwrap();
        let flags: Vec<bool> = out.iter().map(|r| r.high_poverty).collect();
        assert_eq!(flags, vec![false, true, false, false]);
        assert_eq!(out[3].frpl_pct, Some(12.5));
        assert_eq!(out[2].frpl_pct, None);
    }

    #[test]
    fn non_numeric_frpl_fails_only_when_retained() {
        let rows = vec![joined("A", Some(10), Some("n/a")), joined("B", Some(10), Some("40"))];

        let ok = apply_filters(&rows, &params(0, 100, &["B"]), 75.0).unwrap();
        assert_eq!(ok.len(), 1);

        let err = apply_filters(&rows, &params(0, 100, &["A", "B"]), 75.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conversion);
        assert!(err.to_string().contains("column 'frpl_pct'"));
        assert!(err.to_string().contains("raw='n/a'"));
    }
}
