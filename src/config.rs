//! Dashboard configuration.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! command-line flags. Only keys present in the file override the defaults.
//!
//! ```toml
//! test_size = 0.3
//! seed = 7
//! variant = "comparison"
//! ```

use crate::error::{BeneishError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Smallest test fraction the dashboard accepts.
pub const MIN_TEST_SIZE: f64 = 0.1;
/// Largest test fraction the dashboard accepts.
pub const MAX_TEST_SIZE: f64 = 0.5;

/// Which of the two dashboard layouts to reproduce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Tuned bench XGBoost, accuracy chart, explanation behind a toggle.
    #[default]
    Baseline,
    /// Library-default bench XGBoost, best-model note, explanation after tuning.
    Comparison,
}

impl Variant {
    /// Lowercase name as used in config files and flags.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Baseline => "baseline",
            Variant::Comparison => "comparison",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = BeneishError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "baseline" => Ok(Variant::Baseline),
            "comparison" => Ok(Variant::Comparison),
            other => Err(BeneishError::InvalidHyperparameter {
                param: "variant".to_string(),
                value: other.to_string(),
                constraint: "baseline or comparison".to_string(),
            }),
        }
    }
}

/// Settings for one dashboard session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Fraction of rows held out for testing
    pub test_size: f64,
    /// Seed for the split and every seeded model
    pub seed: u64,
    /// Cross-validation folds used by the tuner
    pub cv_folds: usize,
    /// Dashboard layout
    pub variant: Variant,
    /// Rows shown by the preview table
    pub preview_rows: usize,
    /// Colour terminal output
    pub color: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            test_size: 0.25,
            seed: 42,
            cv_folds: 3,
            variant: Variant::Baseline,
            preview_rows: 5,
            color: true,
        }
    }
}

/// On-disk shape: every key optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    test_size: Option<f64>,
    seed: Option<u64>,
    cv_folds: Option<usize>,
    variant: Option<Variant>,
    preview_rows: Option<usize>,
    color: Option<bool>,
}

impl DashboardConfig {
    /// Defaults overridden by a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`BeneishError::Load`] if the file cannot be read or parsed,
    /// or a validation error for out-of-range values.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| BeneishError::Load {
            path: path.display().to_string(),
            message: format!("failed reading config file: {e}"),
        })?;
        let mut config = Self::default();
        config.apply_toml(&raw).map_err(|e| match e {
            BeneishError::Other(message) => BeneishError::Load {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })?;
        tracing::debug!(path = %path.display(), "config file applied");
        Ok(config)
    }

    /// Overrides the keys present in a TOML document, then validates.
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not parse, names an unknown key,
    /// or yields out-of-range values.
    pub fn apply_toml(&mut self, raw: &str) -> Result<()> {
        let file: FileConfig = toml::from_str(raw)
            .map_err(|e| BeneishError::Other(format!("failed parsing TOML config: {e}")))?;

        if let Some(v) = file.test_size {
            self.test_size = v;
        }
        if let Some(v) = file.seed {
            self.seed = v;
        }
        if let Some(v) = file.cv_folds {
            self.cv_folds = v;
        }
        if let Some(v) = file.variant {
            self.variant = v;
        }
        if let Some(v) = file.preview_rows {
            self.preview_rows = v;
        }
        if let Some(v) = file.color {
            self.color = v;
        }
        self.validate()
    }

    /// Checks every value is within its allowed range.
    ///
    /// # Errors
    ///
    /// Returns [`BeneishError::InvalidHyperparameter`] for the first bad value.
    pub fn validate(&self) -> Result<()> {
        check_test_size(self.test_size)?;
        if self.cv_folds < 2 {
            return Err(BeneishError::InvalidHyperparameter {
                param: "cv_folds".to_string(),
                value: self.cv_folds.to_string(),
                constraint: ">= 2".to_string(),
            });
        }
        if self.preview_rows == 0 {
            return Err(BeneishError::InvalidHyperparameter {
                param: "preview_rows".to_string(),
                value: "0".to_string(),
                constraint: ">= 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Accepts test fractions within the dashboard control range.
///
/// # Errors
///
/// Returns [`BeneishError::InvalidHyperparameter`] outside
/// [`MIN_TEST_SIZE`, `MAX_TEST_SIZE`].
pub fn check_test_size(test_size: f64) -> Result<()> {
    if (MIN_TEST_SIZE..=MAX_TEST_SIZE).contains(&test_size) {
        Ok(())
    } else {
        Err(BeneishError::InvalidHyperparameter {
            param: "test_size".to_string(),
            value: test_size.to_string(),
            constraint: format!("{MIN_TEST_SIZE} <= test_size <= {MAX_TEST_SIZE}"),
        })
    }
}
