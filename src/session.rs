//! Typed session context shared by every dashboard action.
//!
//! Holds at most one dataset and one tuned model. Loading a file or moving
//! the test fraction restarts the workflow from the split, so everything
//! derived from the previous split is dropped.
//!
//! # Example
//!
//! ```
//! use beneish::config::DashboardConfig;
//! use beneish::error::BeneishError;
//! use beneish::session::Session;
//!
//! let session = Session::new(DashboardConfig::default());
//! assert!(!session.has_tuned_model());
//! assert!(matches!(session.explain(), Err(BeneishError::NotReady)));
//! ```

use crate::bench::{run_bench, BenchResults};
use crate::config::{check_test_size, DashboardConfig};
use crate::data::DataFrame;
use crate::error::{BeneishError, Result};
use crate::explain::{explain, Explanation, BEESWARM_BINS};
use crate::preprocessing::PreparedSplit;
use crate::tuning::{tune, ParamGrid, TunedModel, TuningReport};
use crate::validation::{validate, Dataset, FEATURE_COLUMNS};
use std::path::Path;

#[derive(Debug, Clone)]
struct Loaded {
    frame: DataFrame,
    dataset: Dataset,
    split: PreparedSplit,
}

/// State of one interactive session.
#[derive(Debug, Clone)]
pub struct Session {
    config: DashboardConfig,
    loaded: Option<Loaded>,
    bench: Option<BenchResults>,
    tuned: Option<(TunedModel, TuningReport)>,
}

impl Session {
    /// Empty session.
    #[must_use]
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            loaded: None,
            bench: None,
            tuned: None,
        }
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Reads, validates and splits a CSV file or Excel workbook.
    ///
    /// Everything from an earlier upload is discarded first, also on failure.
    ///
    /// # Errors
    ///
    /// Returns [`BeneishError::Load`], [`BeneishError::Schema`] or
    /// [`BeneishError::InvalidLabel`] from the respective stage, or a split error.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.reset();
        let frame = DataFrame::from_path(path)?;
        self.load_frame(frame)
    }

    /// Validates and splits an already parsed table.
    ///
    /// # Errors
    ///
    /// See [`Session::load`].
    pub fn load_frame(&mut self, frame: DataFrame) -> Result<()> {
        self.reset();
        let dataset = validate(&frame)?;
        let split = PreparedSplit::new(&dataset, self.config.test_size, self.config.seed)?;
        let [negatives, positives] = dataset.class_counts();
        tracing::info!(
            source = frame.source(),
            rows = dataset.n_rows(),
            negatives,
            positives,
            "dataset loaded"
        );
        self.loaded = Some(Loaded {
            frame,
            dataset,
            split,
        });
        Ok(())
    }

    fn reset(&mut self) {
        self.loaded = None;
        self.bench = None;
        self.tuned = None;
    }

    /// Changes the test fraction and re-splits the loaded dataset.
    ///
    /// Bench results and the tuned model are discarded.
    ///
    /// # Errors
    ///
    /// Returns an error if the fraction is outside the control range or the
    /// new split cannot be built; the previous state is kept in that case.
    pub fn set_test_size(&mut self, test_size: f64) -> Result<()> {
        check_test_size(test_size)?;
        if let Some(loaded) = &mut self.loaded {
            loaded.split = PreparedSplit::new(&loaded.dataset, test_size, self.config.seed)?;
        }
        self.config.test_size = test_size;
        self.bench = None;
        self.tuned = None;
        Ok(())
    }

    /// Loaded table, as parsed.
    #[must_use]
    pub fn frame(&self) -> Option<&DataFrame> {
        self.loaded.as_ref().map(|l| &l.frame)
    }

    /// Validated features and labels.
    #[must_use]
    pub fn dataset(&self) -> Option<&Dataset> {
        self.loaded.as_ref().map(|l| &l.dataset)
    }

    /// Current train/test partitions.
    #[must_use]
    pub fn split(&self) -> Option<&PreparedSplit> {
        self.loaded.as_ref().map(|l| &l.split)
    }

    fn require_split(&self) -> Result<&PreparedSplit> {
        self.split()
            .ok_or_else(|| "no dataset loaded; load a workbook or CSV file first".into())
    }

    /// Trains and scores the whole roster, replacing earlier bench results.
    ///
    /// # Errors
    ///
    /// Returns an error if no dataset is loaded or a model fails to train.
    pub fn train(&mut self) -> Result<&BenchResults> {
        self.bench = None;
        let results = run_bench(self.require_split()?, self.config.variant)?;
        Ok(self.bench.insert(results))
    }

    /// Last bench results.
    #[must_use]
    pub fn bench(&self) -> Option<&BenchResults> {
        self.bench.as_ref()
    }

    /// Grid-searches the boosted-tree family and retains the refit winner,
    /// replacing any earlier tuned model.
    ///
    /// # Errors
    ///
    /// Returns an error if no dataset is loaded or the search fails; the
    /// previously tuned model is dropped in that case.
    pub fn tune(&mut self) -> Result<&TuningReport> {
        self.tuned = None;
        let grid = ParamGrid::for_variant(self.config.variant);
        let tuned = tune(self.require_split()?, &grid, self.config.cv_folds)?;
        Ok(&self.tuned.insert(tuned).1)
    }

    /// Whether a tuned model is retained.
    #[must_use]
    pub fn has_tuned_model(&self) -> bool {
        self.tuned.is_some()
    }

    /// The retained tuned model.
    #[must_use]
    pub fn tuned_model(&self) -> Option<&TunedModel> {
        self.tuned.as_ref().map(|(model, _)| model)
    }

    /// Report of the last successful tuning run.
    #[must_use]
    pub fn tuning_report(&self) -> Option<&TuningReport> {
        self.tuned.as_ref().map(|(_, report)| report)
    }

    /// Attributions of the tuned model over the training partition.
    ///
    /// # Errors
    ///
    /// Returns [`BeneishError::NotReady`] before a successful tuning run.
    pub fn explain(&self) -> Result<Explanation> {
        let tuned = self.tuned_model().ok_or(BeneishError::NotReady)?;
        let split = self.require_split()?;
        explain(Some(tuned), split.x_train(), &FEATURE_COLUMNS, BEESWARM_BINS)
    }
}
