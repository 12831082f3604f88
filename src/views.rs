//! Chart aggregations for the three dashboard views.
//!
//! Rendering is left to the presentation layer; this module computes the numbers each chart
//! shows from the long-format table.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::model::{LongRow, RaceEthnicity, TableRow};
use crate::types::{DataType, Field, Schema, Value};

/// Dashboard view selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartView {
    /// Population share and totals per race/ethnicity.
    RaceCharts,
    /// Population share and totals in high vs. not-high poverty schools.
    PovertyCharts,
    /// Race/ethnicity shares, faceted by poverty flag.
    RaceByPovertyCharts,
}

impl ChartView {
    pub const ALL: [ChartView; 3] = [
        ChartView::RaceCharts,
        ChartView::PovertyCharts,
        ChartView::RaceByPovertyCharts,
    ];

    /// Identifier used by the presentation layer.
    pub fn id(self) -> &'static str {
        match self {
            ChartView::RaceCharts => "race charts",
            ChartView::PovertyCharts => "poverty charts",
            ChartView::RaceByPovertyCharts => "race-by-poverty charts",
        }
    }

    /// Titles of the charts shown for this view.
    pub fn chart_titles(self) -> &'static [&'static str] {
        match self {
            ChartView::RaceCharts => &[
                "Percentage of Races in the School District",
                "Total Number of students per race",
            ],
            ChartView::PovertyCharts => &[
                "Percentage of Students in High Poverty Schools",
                "Total Number of Students in High Poverty Schools",
            ],
            ChartView::RaceByPovertyCharts => {
                &["Percentage of race in Schools According to Poverty"]
            }
        }
    }
}

impl fmt::Display for ChartView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ChartView {
    type Err = String;

    /// Accepts the view id, or its first word(s) without " charts" (`race`, `poverty`,
    /// `race-by-poverty`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ChartView::ALL
            .into_iter()
            .find(|v| {
                let id = v.id();
                wanted == id || Some(wanted.as_str()) == id.strip_suffix(" charts")
            })
            .ok_or_else(|| {
                format!(
                    "unknown view '{s}' (expected one of: {})",
                    ChartView::ALL.map(ChartView::id).join(", ")
                )
            })
    }
}

/// One slice/bar of a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSlice {
    /// Poverty facet for faceted charts; `None` when the chart is not faceted.
    pub facet: Option<bool>,
    pub label: String,
    pub population: i64,
    /// Fraction of the facet (or overall) total, in `[0, 1]`.
    pub share: f64,
}

impl TableRow for ChartSlice {
    fn schema() -> Schema {
        Schema::new(vec![
            Field::new("high_poverty", DataType::Bool),
            Field::new("label", DataType::Utf8),
            Field::new("population", DataType::Int64),
            Field::new("share", DataType::Float64),
        ])
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            self.facet.map(Value::Bool).unwrap_or(Value::Null),
            Value::Utf8(self.label.clone()),
            Value::Int64(self.population),
            Value::Float64(self.share),
        ]
    }
}

/// Everything needed to draw one view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewData {
    pub view: ChartView,
    pub titles: Vec<&'static str>,
    pub slices: Vec<ChartSlice>,
}

/// Label used for a poverty bucket.
pub fn poverty_label(high_poverty: bool) -> &'static str {
    if high_poverty {
        "high poverty"
    } else {
        "not high poverty"
    }
}

/// Aggregate `long` for `view`. Null populations are skipped; empty buckets are omitted.
pub fn aggregate(view: ChartView, long: &[LongRow]) -> ViewData {
    let slices = match view {
        ChartView::RaceCharts => {
            let totals = sum_by(long, |r| r.race_ethnicity);
            with_shares(None, race_order(&totals))
        }
        ChartView::PovertyCharts => {
            let totals = sum_by(long, |r| r.high_poverty);
            with_shares(
                None,
                totals
                    .into_iter()
                    .map(|(hp, pop)| (poverty_label(hp).to_string(), pop))
                    .collect(),
            )
        }
        ChartView::RaceByPovertyCharts => [false, true]
            .into_iter()
            .flat_map(|hp| {
                let facet: Vec<LongRow> =
                    long.iter().filter(|r| r.high_poverty == hp).cloned().collect();
                let totals = sum_by(&facet, |r| r.race_ethnicity);
                with_shares(Some(hp), race_order(&totals))
            })
            .collect(),
    };

    ViewData {
        view,
        titles: view.chart_titles().to_vec(),
        slices,
    }
}

fn sum_by<K: Ord, F: Fn(&LongRow) -> K>(long: &[LongRow], key: F) -> BTreeMap<K, i64> {
    let mut totals = BTreeMap::new();
    for row in long {
        if let Some(pop) = row.population {
            *totals.entry(key(row)).or_insert(0) += pop;
        }
    }
    totals
}

fn race_order(totals: &BTreeMap<RaceEthnicity, i64>) -> Vec<(String, i64)> {
    RaceEthnicity::ALL
        .into_iter()
        .filter_map(|race| totals.get(&race).map(|pop| (race.label().to_string(), *pop)))
        .collect()
}

fn with_shares(facet: Option<bool>, totals: Vec<(String, i64)>) -> Vec<ChartSlice> {
    let grand: i64 = totals.iter().map(|(_, pop)| pop).sum();
    totals
        .into_iter()
        .map(|(label, population)| ChartSlice {
            facet,
            label,
            population,
            share: if grand == 0 {
                0.0
            } else {
                population as f64 / grand as f64
            },
        })
        .collect()
}
