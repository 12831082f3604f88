//! JSON configuration for the command-line front end.
//!
//! Every field is optional; command-line flags take precedence over file values.
//!
//! ```json
//! {
//!   "enrollment_path": "data/schoolData.csv",
//!   "lunch_path": "data/frpl.csv",
//!   "high_poverty_threshold": 75.0
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{PipelineError, PipelineResult};
use crate::select::DEFAULT_HIGH_POVERTY_THRESHOLD;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Enrollment (demographics) input file.
    pub enrollment_path: Option<PathBuf>,
    /// Poverty (free/reduced-price lunch) input file.
    pub lunch_path: Option<PathBuf>,
    /// `frpl_pct` strictly above this value marks a school as high poverty.
    pub high_poverty_threshold: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            enrollment_path: None,
            lunch_path: None,
            high_poverty_threshold: DEFAULT_HIGH_POVERTY_THRESHOLD,
        }
    }
}

impl DashboardConfig {
    /// Read a config file.
    pub fn from_path(path: impl AsRef<Path>) -> PipelineResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| PipelineError::Config {
            message: format!("cannot read {}: {e}", path.display()),
        })?;
        Self::from_json_str(&text)
    }

    /// Parse config from JSON text.
    pub fn from_json_str(text: &str) -> PipelineResult<Self> {
        let config: Self = serde_json::from_str(text).map_err(|e| PipelineError::Config {
            message: e.to_string(),
        })?;
        check_threshold(config.high_poverty_threshold)?;
        Ok(config)
    }
}

/// Reject a high-poverty threshold that cannot be compared meaningfully (NaN, infinities).
pub fn check_threshold(value: f64) -> PipelineResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PipelineError::Config {
            message: format!("high_poverty_threshold must be a finite number, got {value}"),
        })
    }
}
