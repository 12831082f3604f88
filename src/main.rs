//! `school-dashboard` CLI: prints dashboard chart data and table artifacts as JSON or CSV.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;

use school_dashboard::config::{check_threshold, DashboardConfig};
use school_dashboard::export::{write_csv, write_json};
use school_dashboard::ingestion::{IngestionOptions, IngestionSeverity, LogObserver};
use school_dashboard::model::{to_dataset, TableRow};
use school_dashboard::pipeline::{LogPipelineObserver, PipelineOptions, PreparedData};
use school_dashboard::select::FilterParams;
use school_dashboard::views::{aggregate, ChartView};

/// Race and poverty data for a school district dashboard
#[derive(Parser, Debug)]
#[command(name = "school-dashboard", version, about, long_about = None)]
struct Cli {
    /// Configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enrollment (demographics) file; overrides the config
    #[arg(long)]
    enrollment: Option<PathBuf>,

    /// Free/reduced-price lunch file; overrides the config
    #[arg(long)]
    lunch: Option<PathBuf>,

    /// FRPL percentage above which a school is high poverty; overrides the config
    #[arg(long)]
    high_poverty_threshold: Option<f64>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the size range and the school names available for filtering
    Summary,
    /// Print the chart data for one view
    View {
        /// "race charts", "poverty charts" or "race-by-poverty charts"
        /// (or race/poverty/race-by-poverty)
        view: ChartView,
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Print one of the pipeline tables
    Export {
        #[arg(value_enum)]
        artifact: Artifact,
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
}

#[derive(Args, Debug)]
struct FilterArgs {
    /// Smallest total enrollment to include (default: smallest school)
    #[arg(long)]
    min_size: Option<i64>,
    /// Largest total enrollment to include (default: largest school)
    #[arg(long)]
    max_size: Option<i64>,
    /// School to include; repeat for several (default: all schools)
    #[arg(long = "school")]
    schools: Vec<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Json,
    Csv,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Artifact {
    /// Cleaned enrollment rows
    Schools,
    /// Cleaned poverty rows
    Lunch,
    /// Enrollment left-joined with poverty
    Joined,
    /// Joined rows after filters, with the poverty flag
    Filtered,
    /// Long-format race/ethnicity populations
    Long,
}

#[derive(Serialize)]
struct Summary<'a> {
    size_min: Option<i64>,
    size_max: Option<i64>,
    schools: &'a [String],
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => DashboardConfig::from_path(path)?,
        None => DashboardConfig::default(),
    };

    let enrollment = cli
        .enrollment
        .or(config.enrollment_path)
        .context("no enrollment file: pass --enrollment or set enrollment_path in the config")?;
    let lunch = cli
        .lunch
        .or(config.lunch_path)
        .context("no lunch file: pass --lunch or set lunch_path in the config")?;

    let ingestion = IngestionOptions {
        observer: Some(Arc::new(LogObserver)),
        alert_at_or_above: IngestionSeverity::Critical,
        ..Default::default()
    };
    let threshold =
        check_threshold(cli.high_poverty_threshold.unwrap_or(config.high_poverty_threshold))?;
    let options = PipelineOptions {
        high_poverty_threshold: threshold,
        observer: Some(Arc::new(LogPipelineObserver)),
    };

    let prepared = PreparedData::load(&enrollment, &lunch, &ingestion, options).with_context(|| {
        format!(
            "failed to prepare {} and {}",
            enrollment.display(),
            lunch.display()
        )
    })?;

    match cli.command {
        Commands::Summary => {
            let names = prepared.school_names();
            let bounds = prepared.size_bounds();
            let summary = Summary {
                size_min: bounds.map(|b| b.min),
                size_max: bounds.map(|b| b.max),
                schools: &names,
            };
            write_json(&summary, io::stdout().lock())?;
        }
        Commands::View {
            view,
            filters,
            format,
        } => {
            let params = filter_params(prepared.default_filter(), &filters)?;
            let dashboard = prepared.run(&params)?;
            let data = aggregate(view, &dashboard.long);
            match format {
                Format::Json => write_json(&data, io::stdout().lock())?,
                Format::Csv => write_csv(&to_dataset(&data.slices), io::stdout().lock())?,
            }
        }
        Commands::Export {
            artifact,
            filters,
            format,
        } => match artifact {
            Artifact::Schools => emit(&prepared.schools, format)?,
            Artifact::Lunch => emit(&prepared.lunch, format)?,
            Artifact::Joined => emit(&prepared.joined, format)?,
            Artifact::Filtered | Artifact::Long => {
                let params = filter_params(prepared.default_filter(), &filters)?;
                let dashboard = prepared.run(&params)?;
                if matches!(artifact, Artifact::Filtered) {
                    emit(&dashboard.filtered, format)?;
                } else {
                    emit(&dashboard.long, format)?;
                }
            }
        },
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

/// Start from the dashboard defaults (full range, every school) and apply any flags given.
fn filter_params(defaults: FilterParams, args: &FilterArgs) -> Result<FilterParams> {
    let mut params = defaults;
    if let Some(min) = args.min_size {
        params.size.min = min;
    }
    if let Some(max) = args.max_size {
        params.size.max = max;
    }
    if params.size.min > params.size.max {
        bail!(
            "--min-size {} is greater than --max-size {}",
            params.size.min,
            params.size.max
        );
    }
    if !args.schools.is_empty() {
        params.schools = args.schools.iter().cloned().collect();
    }
    Ok(params)
}

fn emit<R: TableRow + Serialize>(rows: &[R], format: Format) -> Result<()> {
    let out = io::stdout().lock();
    match format {
        Format::Json => write_json(rows, out)?,
        Format::Csv => write_csv(&to_dataset(rows), out)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use clap::Parser;
    use school_dashboard::config::check_threshold;
    use school_dashboard::select::{FilterParams, SizeRange};

    use super::{filter_params, Cli, Commands};

    fn defaults() -> FilterParams {
        FilterParams {
            size: SizeRange::new(100, 900),
            schools: ["Lincoln Elementary", "X"].iter().map(|s| s.to_string()).collect(),
        }
    }

    fn view_filters(args: &[&str]) -> super::FilterArgs {
        let argv = ["school-dashboard", "view", "race"].iter().chain(args).copied();
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::View { filters, .. } => filters,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn no_flags_keeps_defaults() {
        let params = filter_params(defaults(), &view_filters(&[])).unwrap();
        assert_eq!(params, defaults());
    }

    #[test]
    fn flags_override_bounds_and_schools() {
        let args = view_filters(&["--min-size", "200", "--school", "X", "--school", "Y"]);
        let params = filter_params(defaults(), &args).unwrap();
        assert_eq!(params.size, SizeRange::new(200, 900));
        let expected: BTreeSet<String> = ["X", "Y"].iter().map(|s| s.to_string()).collect();
        assert_eq!(params.schools, expected);
    }

    #[test]
    fn min_above_max_is_rejected() {
        let args = view_filters(&["--max-size", "50"]);
        let err = filter_params(defaults(), &args).unwrap_err();
        assert!(err.to_string().contains("--min-size 100 is greater than --max-size 50"));
    }

    #[test]
    fn nan_threshold_flag_fails_validation() {
        let cli = Cli::try_parse_from([
            "school-dashboard",
            "--high-poverty-threshold",
            "NaN",
            "summary",
        ])
        .unwrap();
        let threshold = cli.high_poverty_threshold.unwrap();
        assert!(threshold.is_nan());
        assert!(check_threshold(threshold).is_err());
    }
}
