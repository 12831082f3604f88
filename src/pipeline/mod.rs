//! Orchestration of the cleaning, join, filter, and reshape stages.
//!
//! [`PreparedData`] holds the part of the pipeline that depends only on the two input tables
//! (cleaned enrollment, cleaned poverty, and their join). It is built once; [`PreparedData::run`]
//! then applies filter parameters and reshapes, and can be called repeatedly as the parameters
//! change.
//!
//! ```no_run
//! use school_dashboard::pipeline::{PipelineOptions, PreparedData};
//! use school_dashboard::views::{aggregate, ChartView};
//!
//! # fn main() -> Result<(), school_dashboard::PipelineError> {
//! let prepared = PreparedData::load(
//!     "data/schoolData.csv",
//!     "data/frpl.csv",
//!     &Default::default(),
//!     PipelineOptions::default(),
//! )?;
//! let params = prepared.default_filter();
//! let dashboard = prepared.run(&params)?;
//! let chart = aggregate(ChartView::RaceCharts, &dashboard.long);
//! println!("{} slices", chart.slices.len());
//! # Ok(())
//! # }
//! ```

mod observer;

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::cleaning::{clean_lunch_table, clean_school_table};
use crate::error::PipelineResult;
use crate::ingestion::{ingest_from_path, IngestionOptions};
use crate::join::left_join;
use crate::model::{
    columns, enrollment_hints, lunch_hints, to_dataset, CleanLunchRow, CleanSchoolRow,
    FilteredRow, JoinedRow, LongRow,
};
use crate::processing::{reduce, ReduceOp};
use crate::reshape::melt;
use crate::select::{apply_filters, FilterParams, SizeRange, DEFAULT_HIGH_POVERTY_THRESHOLD};
use crate::types::{DataSet, Value};

pub use observer::{LogPipelineObserver, PipelineEvent, PipelineObserver, Stage};

/// Knobs for the pipeline stages.
#[derive(Clone)]
pub struct PipelineOptions {
    /// `frpl_pct` strictly above this value marks a school as high poverty.
    pub high_poverty_threshold: f64,
    /// Optional observer for stage events.
    pub observer: Option<Arc<dyn PipelineObserver>>,
}

impl fmt::Debug for PipelineOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineOptions")
            .field("high_poverty_threshold", &self.high_poverty_threshold)
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            high_poverty_threshold: DEFAULT_HIGH_POVERTY_THRESHOLD,
            observer: None,
        }
    }
}

impl PipelineOptions {
    /// Attach an observer.
    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    fn emit(&self, event: PipelineEvent) {
        if let Some(obs) = &self.observer {
            obs.on_event(&event);
        }
    }

    /// Run one stage, reporting start/finish/failure to the observer.
    fn stage<T>(
        &self,
        stage: Stage,
        input_rows: usize,
        f: impl FnOnce() -> PipelineResult<Vec<T>>,
    ) -> PipelineResult<Vec<T>> {
        let start = Instant::now();
        self.emit(PipelineEvent::StageStarted { stage, input_rows });
        match f() {
            Ok(out) => {
                self.emit(PipelineEvent::StageFinished {
                    stage,
                    input_rows,
                    output_rows: out.len(),
                    elapsed: start.elapsed(),
                });
                Ok(out)
            }
            Err(e) => {
                self.emit(PipelineEvent::StageFailed {
                    stage,
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }
}

/// Cleaned and joined tables; a pure function of the two raw inputs.
#[derive(Debug, Clone)]
pub struct PreparedData {
    pub schools: Vec<CleanSchoolRow>,
    pub lunch: Vec<CleanLunchRow>,
    pub joined: Vec<JoinedRow>,
    options: PipelineOptions,
}

/// Output of one filtered run.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardData {
    pub filtered: Vec<FilteredRow>,
    pub long: Vec<LongRow>,
}

impl PreparedData {
    /// Load both input files and prepare them.
    pub fn load(
        enrollment_path: impl AsRef<Path>,
        lunch_path: impl AsRef<Path>,
        ingestion: &IngestionOptions,
        options: PipelineOptions,
    ) -> PipelineResult<Self> {
        let enrollment = ingest_from_path(enrollment_path, &enrollment_hints(), ingestion)?;
        let lunch = ingest_from_path(lunch_path, &lunch_hints(), ingestion)?;
        Self::from_datasets(&enrollment, &lunch, options)
    }

    /// Clean both raw tables and join them.
    pub fn from_datasets(
        enrollment: &DataSet,
        poverty: &DataSet,
        options: PipelineOptions,
    ) -> PipelineResult<Self> {
        let schools = options.stage(Stage::CleanSchools, enrollment.row_count(), || {
            clean_school_table(enrollment)
        })?;
        let lunch = options.stage(Stage::CleanLunch, poverty.row_count(), || {
            clean_lunch_table(poverty)
        })?;
        let joined = options.stage(Stage::Join, schools.len(), || Ok(left_join(&schools, &lunch)))?;

        Ok(Self {
            schools,
            lunch,
            joined,
            options,
        })
    }

    /// Smallest and largest `tot` among joined rows, or `None` if no row has one.
    pub fn size_bounds(&self) -> Option<SizeRange> {
        let ds = to_dataset(&self.joined);
        match (
            reduce(&ds, columns::TOT, ReduceOp::Min)?,
            reduce(&ds, columns::TOT, ReduceOp::Max)?,
        ) {
            (Value::Int64(min), Value::Int64(max)) => Some(SizeRange::new(min, max)),
            _ => None,
        }
    }

    /// Distinct school names, in first-seen order.
    pub fn school_names(&self) -> Vec<String> {
        distinct_names(self.joined.iter())
    }

    /// Distinct school names of schools whose size falls in `range`, in first-seen order.
    pub fn school_names_within(&self, range: SizeRange) -> Vec<String> {
        distinct_names(self.joined.iter().filter(|r| range.contains(r.school.tot)))
    }

    /// Full size range and every school: the state a dashboard starts in.
    pub fn default_filter(&self) -> FilterParams {
        FilterParams {
            size: self.size_bounds().unwrap_or(SizeRange::new(0, 0)),
            schools: self.school_names().into_iter().collect::<BTreeSet<_>>(),
        }
    }

    /// Filter and reshape with the given parameters.
    pub fn run(&self, params: &FilterParams) -> PipelineResult<DashboardData> {
        let opts = &self.options;
        let filtered = opts.stage(Stage::Filter, self.joined.len(), || {
            apply_filters(&self.joined, params, opts.high_poverty_threshold)
        })?;
        let long = opts.stage(Stage::Reshape, filtered.len(), || Ok(melt(&filtered)))?;
        Ok(DashboardData { filtered, long })
    }
}

fn distinct_names<'a>(rows: impl Iterator<Item = &'a JoinedRow>) -> Vec<String> {
    let mut seen = HashSet::new();
    rows.filter(|r| seen.insert(r.school.school_name.as_str()))
        .map(|r| r.school.school_name.clone())
        .collect()
}
