//! Typed rows for each pipeline stage.
//!
//! Raw input rows live in a [`DataSet`] (see [`enrollment_hints`] / [`lunch_hints`] for the types
//! applied at load time). Every later stage works on one of the row structs below; each
//! implements [`TableRow`] so a typed table can be rendered back into a `DataSet`.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{PipelineError, PipelineResult};
use crate::types::{parse_count, DataSet, DataType, Field, Schema, Value};

/// Column names used by the input files.
pub mod columns {
    pub const SCHOOL_NAME: &str = "school_name";
    pub const SCHOOL_GROUP: &str = "school_group";
    pub const GRADE: &str = "grade";
    pub const TOT: &str = "tot";
    pub const NA_NUM: &str = "na_num";
    pub const NA_PCT: &str = "na_pct";
    pub const AA_NUM: &str = "aa_num";
    pub const AA_PCT: &str = "aa_pct";
    pub const AS_NUM: &str = "as_num";
    pub const AS_PCT: &str = "as_pct";
    pub const HI_NUM: &str = "hi_num";
    pub const HI_PCT: &str = "hi_pct";
    pub const WH_NUM: &str = "wh_num";
    pub const WH_PCT: &str = "wh_pct";
    pub const PI_PCT: &str = "pi_pct";
    pub const BLANK_COL: &str = "blank_col";
    pub const FRPL_PCT: &str = "frpl_pct";
    pub const HIGH_POVERTY: &str = "high_poverty";
    pub const RACE_ETHNICITY: &str = "race_ethnicity";
    pub const POPULATION: &str = "population";

    /// Race/ethnicity percentage columns of the enrollment table.
    pub const RACE_PCT_COLUMNS: [&str; 5] = [NA_PCT, AA_PCT, AS_PCT, HI_PCT, WH_PCT];
}

/// Columns of the enrollment file, in file order.
pub const ENROLLMENT_COLUMNS: [&str; 16] = [
    columns::SCHOOL_NAME,
    columns::SCHOOL_GROUP,
    columns::GRADE,
    columns::TOT,
    columns::NA_NUM,
    columns::NA_PCT,
    columns::AA_NUM,
    columns::AA_PCT,
    columns::AS_NUM,
    columns::AS_PCT,
    columns::HI_NUM,
    columns::HI_PCT,
    columns::WH_NUM,
    columns::WH_PCT,
    columns::PI_PCT,
    columns::BLANK_COL,
];

/// Type hints for the enrollment file: every column is loaded as a string.
///
/// Per-grade detail rows may carry suppressed counts (`<10`, `*`); they are discarded by the
/// cleaner, so counts are only parsed on the rows that survive it (see
/// [`CleanSchoolRow::from_dataset`]).
pub fn enrollment_hints() -> Schema {
    Schema::new(
        ENROLLMENT_COLUMNS
            .iter()
            .map(|c| Field::new(*c, DataType::Utf8))
            .collect(),
    )
}

/// Type hints for the poverty file. `frpl_pct` carries a percent sign, so it stays a string.
pub fn lunch_hints() -> Schema {
    Schema::new(vec![
        Field::new(columns::SCHOOL_NAME, DataType::Utf8),
        Field::new(columns::FRPL_PCT, DataType::Utf8),
    ])
}

/// A typed row that can be rendered into a generic [`DataSet`] row.
pub trait TableRow {
    /// Column layout of [`TableRow::to_values`].
    fn schema() -> Schema;
    /// Cell values in schema order.
    fn to_values(&self) -> Vec<Value>;
}

/// Render a typed table as a [`DataSet`].
pub fn to_dataset<R: TableRow>(rows: &[R]) -> DataSet {
    DataSet::new(R::schema(), rows.iter().map(TableRow::to_values).collect())
}

/// Race/ethnicity categories carried into the long-format table.
///
/// Asian counts (`as_num`) are kept on [`CleanSchoolRow`] but are not part of this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum RaceEthnicity {
    #[serde(rename = "Native American")]
    NativeAmerican,
    #[serde(rename = "African American")]
    AfricanAmerican,
    #[serde(rename = "Hispanic")]
    Hispanic,
    #[serde(rename = "White")]
    White,
}

impl RaceEthnicity {
    /// All categories, in unpivot order.
    pub const ALL: [RaceEthnicity; 4] = [
        RaceEthnicity::NativeAmerican,
        RaceEthnicity::AfricanAmerican,
        RaceEthnicity::Hispanic,
        RaceEthnicity::White,
    ];

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            RaceEthnicity::NativeAmerican => "Native American",
            RaceEthnicity::AfricanAmerican => "African American",
            RaceEthnicity::Hispanic => "Hispanic",
            RaceEthnicity::White => "White",
        }
    }

    /// Enrollment count column this category is read from.
    pub fn source_column(self) -> &'static str {
        match self {
            RaceEthnicity::NativeAmerican => columns::NA_NUM,
            RaceEthnicity::AfricanAmerican => columns::AA_NUM,
            RaceEthnicity::Hispanic => columns::HI_NUM,
            RaceEthnicity::White => columns::WH_NUM,
        }
    }
}

impl fmt::Display for RaceEthnicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RaceEthnicity {
    type Err = String;

    /// Accepts either the label or the source column name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RaceEthnicity::ALL
            .into_iter()
            .find(|r| r.label() == s || r.source_column() == s)
            .ok_or_else(|| format!("unknown race/ethnicity '{s}'"))
    }
}

/// An enrollment row for one school after cleaning.
///
/// Percentage fields are percent-sign-free strings; they are never converted to numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanSchoolRow {
    pub school_name: String,
    pub tot: Option<i64>,
    pub na_num: Option<i64>,
    pub na_pct: Option<String>,
    pub aa_num: Option<i64>,
    pub aa_pct: Option<String>,
    pub as_num: Option<i64>,
    pub as_pct: Option<String>,
    pub hi_num: Option<i64>,
    pub hi_pct: Option<String>,
    pub wh_num: Option<i64>,
    pub wh_pct: Option<String>,
}

impl CleanSchoolRow {
    /// Count for a race category.
    pub fn count(&self, race: RaceEthnicity) -> Option<i64> {
        match race {
            RaceEthnicity::NativeAmerican => self.na_num,
            RaceEthnicity::AfricanAmerican => self.aa_num,
            RaceEthnicity::Hispanic => self.hi_num,
            RaceEthnicity::White => self.wh_num,
        }
    }

    /// Validate a cleaned enrollment [`DataSet`] into typed rows.
    ///
    /// Extra columns are ignored; missing columns are a schema error. Count cells may be integers
    /// or strings holding a whole number (`120`, `120.0`); anything else is a conversion error
    /// reporting the row's 1-based position in `ds`.
    pub fn from_dataset(ds: &DataSet) -> PipelineResult<Vec<Self>> {
        use columns::*;

        let col = |name: &'static str| ds.schema.require(name).map(|idx| (name, idx));
        let name = ds.schema.require(SCHOOL_NAME)?;
        let tot = col(TOT)?;
        let na_num = col(NA_NUM)?;
        let aa_num = col(AA_NUM)?;
        let as_num = col(AS_NUM)?;
        let hi_num = col(HI_NUM)?;
        let wh_num = col(WH_NUM)?;
        let na_pct = ds.schema.require(NA_PCT)?;
        let aa_pct = ds.schema.require(AA_PCT)?;
        let as_pct = ds.schema.require(AS_PCT)?;
        let hi_pct = ds.schema.require(HI_PCT)?;
        let wh_pct = ds.schema.require(WH_PCT)?;

        ds.rows
            .iter()
            .enumerate()
            .map(|(i, row)| -> PipelineResult<Self> {
                let count = |(column, idx): (&str, usize)| cell_count(row, i + 1, column, idx);
                Ok(CleanSchoolRow {
                    school_name: cell_string(row, name).unwrap_or_default(),
                    tot: count(tot)?,
                    na_num: count(na_num)?,
                    na_pct: cell_string(row, na_pct),
                    aa_num: count(aa_num)?,
                    aa_pct: cell_string(row, aa_pct),
                    as_num: count(as_num)?,
                    as_pct: cell_string(row, as_pct),
                    hi_num: count(hi_num)?,
                    hi_pct: cell_string(row, hi_pct),
                    wh_num: count(wh_num)?,
                    wh_pct: cell_string(row, wh_pct),
                })
            })
            .collect()
    }
}

fn school_fields() -> Vec<Field> {
    use columns::*;
    vec![
        Field::new(SCHOOL_NAME, DataType::Utf8),
        Field::new(TOT, DataType::Int64),
        Field::new(NA_NUM, DataType::Int64),
        Field::new(NA_PCT, DataType::Utf8),
        Field::new(AA_NUM, DataType::Int64),
        Field::new(AA_PCT, DataType::Utf8),
        Field::new(AS_NUM, DataType::Int64),
        Field::new(AS_PCT, DataType::Utf8),
        Field::new(HI_NUM, DataType::Int64),
        Field::new(HI_PCT, DataType::Utf8),
        Field::new(WH_NUM, DataType::Int64),
        Field::new(WH_PCT, DataType::Utf8),
    ]
}

impl TableRow for CleanSchoolRow {
    fn schema() -> Schema {
        Schema::new(school_fields())
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Utf8(self.school_name.clone()),
            self.tot.into(),
            self.na_num.into(),
            self.na_pct.as_deref().into(),
            self.aa_num.into(),
            self.aa_pct.as_deref().into(),
            self.as_num.into(),
            self.as_pct.as_deref().into(),
            self.hi_num.into(),
            self.hi_pct.as_deref().into(),
            self.wh_num.into(),
            self.wh_pct.as_deref().into(),
        ]
    }
}

/// A poverty row for one school after cleaning. `frpl_pct` is a percent-sign-free string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanLunchRow {
    pub school_name: String,
    pub frpl_pct: Option<String>,
}

impl CleanLunchRow {
    /// Validate a cleaned poverty [`DataSet`] into typed rows. Null names are a schema error.
    pub fn from_dataset(ds: &DataSet) -> PipelineResult<Vec<Self>> {
        let name = ds.schema.require(columns::SCHOOL_NAME)?;
        let frpl = ds.schema.require(columns::FRPL_PCT)?;

        ds.rows
            .iter()
            .enumerate()
            .map(|(i, row)| -> PipelineResult<Self> {
                let school_name = cell_string(row, name).ok_or_else(|| {
                    PipelineError::schema(format!("row {} has no school_name", i + 1))
                })?;
                Ok(CleanLunchRow {
                    school_name,
                    frpl_pct: cell_string(row, frpl),
                })
            })
            .collect()
    }
}

impl TableRow for CleanLunchRow {
    fn schema() -> Schema {
        Schema::new(vec![
            Field::new(columns::SCHOOL_NAME, DataType::Utf8),
            Field::new(columns::FRPL_PCT, DataType::Utf8),
        ])
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Utf8(self.school_name.clone()),
            self.frpl_pct.as_deref().into(),
        ]
    }
}

/// A cleaned school row with the (still textual) poverty percentage of its lunch match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinedRow {
    #[serde(flatten)]
    pub school: CleanSchoolRow,
    pub frpl_pct: Option<String>,
}

impl TableRow for JoinedRow {
    fn schema() -> Schema {
        let mut fields = school_fields();
        fields.push(Field::new(columns::FRPL_PCT, DataType::Utf8));
        Schema::new(fields)
    }

    fn to_values(&self) -> Vec<Value> {
        let mut out = self.school.to_values();
        out.push(self.frpl_pct.as_deref().into());
        out
    }
}

/// A joined row that passed the size and school filters, with numeric poverty data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredRow {
    #[serde(flatten)]
    pub school: CleanSchoolRow,
    pub frpl_pct: Option<f64>,
    pub high_poverty: bool,
}

impl TableRow for FilteredRow {
    fn schema() -> Schema {
        let mut fields = school_fields();
        fields.push(Field::new(columns::FRPL_PCT, DataType::Float64));
        fields.push(Field::new(columns::HIGH_POVERTY, DataType::Bool));
        Schema::new(fields)
    }

    fn to_values(&self) -> Vec<Value> {
        let mut out = self.school.to_values();
        out.push(self.frpl_pct.into());
        out.push(Value::Bool(self.high_poverty));
        out
    }
}

/// One (school, poverty flag, race/ethnicity) population entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LongRow {
    pub school_name: String,
    pub high_poverty: bool,
    pub race_ethnicity: RaceEthnicity,
    pub population: Option<i64>,
}

impl TableRow for LongRow {
    fn schema() -> Schema {
        Schema::new(vec![
            Field::new(columns::SCHOOL_NAME, DataType::Utf8),
            Field::new(columns::HIGH_POVERTY, DataType::Bool),
            Field::new(columns::RACE_ETHNICITY, DataType::Utf8),
            Field::new(columns::POPULATION, DataType::Int64),
        ])
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Utf8(self.school_name.clone()),
            Value::Bool(self.high_poverty),
            Value::Utf8(self.race_ethnicity.label().to_string()),
            self.population.into(),
        ]
    }
}

fn cell_string(row: &[Value], idx: usize) -> Option<String> {
    match &row[idx] {
        Value::Null => None,
        Value::Utf8(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn cell_count(
    row: &[Value],
    row_num: usize,
    column: &str,
    idx: usize,
) -> PipelineResult<Option<i64>> {
    let conversion = |raw: String, message: String| PipelineError::Conversion {
        row: row_num,
        column: column.to_string(),
        raw,
        message,
    };
    match &row[idx] {
        Value::Null => Ok(None),
        Value::Int64(v) => Ok(Some(*v)),
        Value::Utf8(s) => parse_count(s.trim())
            .map(Some)
            .map_err(|message| conversion(s.clone(), message)),
        other => Err(conversion(
            other.to_string(),
            "expected a whole number".to_string(),
        )),
    }
}
