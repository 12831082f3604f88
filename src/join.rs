//! Left join of cleaned enrollment rows with cleaned poverty rows.

use std::collections::HashMap;

use crate::model::{CleanLunchRow, CleanSchoolRow, JoinedRow};

/// Left-join `schools` with `lunch` on exact `school_name` equality.
///
/// Output follows `schools` order. A school with no poverty match appears once with a null
/// `frpl_pct`; a school with several matches appears once per match (in `lunch` order). Callers
/// that need one row per school must supply unique lunch names; duplicates are logged.
pub fn left_join(schools: &[CleanSchoolRow], lunch: &[CleanLunchRow]) -> Vec<JoinedRow> {
    let mut index: HashMap<&str, Vec<&CleanLunchRow>> = HashMap::with_capacity(lunch.len());
    for row in lunch {
        index.entry(row.school_name.as_str()).or_default().push(row);
    }

    for (name, matches) in &index {
        if matches.len() > 1 {
            log::warn!(
                "poverty table has {} rows for school '{name}'; join will repeat it",
                matches.len()
            );
        }
    }

    let mut out = Vec::with_capacity(schools.len());
    for school in schools {
        match index.get(school.school_name.as_str()) {
            Some(matches) => out.extend(matches.iter().map(|m| JoinedRow {
                school: school.clone(),
                frpl_pct: m.frpl_pct.clone(),
            })),
            None => out.push(JoinedRow {
                school: school.clone(),
                frpl_pct: None,
            }),
        }
    }
    out
}
