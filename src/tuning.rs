//! Tuner: cross-validated grid search for the boosted-tree family.
//!
//! Every combination of the grid is scored by mean ROC AUC over stratified
//! folds of the raw training partition. The winner is refit on the whole
//! training partition and scored on the test partition.

use crate::bench::{fit_and_evaluate, MODEL_SEED};
use crate::config::Variant;
use crate::error::{BeneishError, Result};
use crate::metrics::{roc_auc_or_zero, MetricRecord};
use crate::model_selection::{grid_search, StratifiedKFold};
use crate::preprocessing::PreparedSplit;
use crate::tree::GradientBoostingClassifier;
use serde::Serialize;
use std::fmt;

/// Display name of the refit winner.
pub const TUNED_MODEL_NAME: &str = "XGBoost Tuned";

/// One point of the boosted-tree grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct XgbParams {
    /// Number of trees
    pub n_estimators: usize,
    /// Shrinkage per tree
    pub learning_rate: f32,
    /// Maximum tree depth
    pub max_depth: usize,
}

impl XgbParams {
    /// Unfitted model with these parameters and library defaults elsewhere.
    #[must_use]
    pub fn build(&self, seed: u64) -> GradientBoostingClassifier {
        GradientBoostingClassifier::new()
            .with_n_estimators(self.n_estimators)
            .with_learning_rate(self.learning_rate)
            .with_max_depth(self.max_depth)
            .with_seed(seed)
    }
}

impl fmt::Display for XgbParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "learning_rate={}, max_depth={}, n_estimators={}",
            self.learning_rate, self.max_depth, self.n_estimators
        )
    }
}

/// Candidate values per hyperparameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamGrid {
    /// Tree counts
    pub n_estimators: Vec<usize>,
    /// Learning rates
    pub learning_rate: Vec<f32>,
    /// Depths
    pub max_depth: Vec<usize>,
}

impl ParamGrid {
    /// The 2×2×2 grid each dashboard searches.
    #[must_use]
    pub fn for_variant(variant: Variant) -> Self {
        let learning_rate = match variant {
            Variant::Baseline => vec![0.05, 0.1],
            Variant::Comparison => vec![0.01, 0.1],
        };
        Self {
            n_estimators: vec![100, 200],
            learning_rate,
            max_depth: vec![3, 4],
        }
    }

    /// Cartesian product with keys in alphabetical order: `learning_rate`
    /// varies slowest, `n_estimators` fastest.
    #[must_use]
    pub fn combinations(&self) -> Vec<XgbParams> {
        let mut combos = Vec::with_capacity(self.len());
        for &learning_rate in &self.learning_rate {
            for &max_depth in &self.max_depth {
                for &n_estimators in &self.n_estimators {
                    combos.push(XgbParams {
                        n_estimators,
                        learning_rate,
                        max_depth,
                    });
                }
            }
        }
        combos
    }

    /// Number of combinations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.n_estimators.len() * self.learning_rate.len() * self.max_depth.len()
    }

    /// True if any axis has no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Cross-validation summary of one combination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComboScore {
    /// Hyperparameters
    pub params: XgbParams,
    /// Mean fold ROC AUC
    pub mean_score: f32,
    /// Population standard deviation of the fold scores
    pub std_score: f32,
}

/// Everything the dashboard shows after a tuning run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TuningReport {
    /// Every combination, in grid order
    pub combos: Vec<ComboScore>,
    /// Winning combination
    pub best_params: XgbParams,
    /// Winner's mean CV ROC AUC
    pub best_score: f32,
    /// Number of folds used
    pub cv_folds: usize,
    /// Held-out metrics of the refit winner
    pub record: MetricRecord,
}

/// The refit winner retained for explanation.
#[derive(Debug, Clone)]
pub struct TunedModel {
    model: GradientBoostingClassifier,
    params: XgbParams,
}

impl TunedModel {
    /// Fitted boosted-tree model.
    #[must_use]
    pub fn model(&self) -> &GradientBoostingClassifier {
        &self.model
    }

    /// Hyperparameters it was refit with.
    #[must_use]
    pub fn params(&self) -> XgbParams {
        self.params
    }
}

/// Runs the grid search and refits the winner.
///
/// # Errors
///
/// Returns an error if `cv_folds < 2`, a class has fewer rows than folds,
/// or any fit fails.
pub fn tune(
    split: &PreparedSplit,
    grid: &ParamGrid,
    cv_folds: usize,
) -> Result<(TunedModel, TuningReport)> {
    if cv_folds < 2 {
        return Err(BeneishError::InvalidHyperparameter {
            param: "cv_folds".to_string(),
            value: cv_folds.to_string(),
            constraint: ">= 2".to_string(),
        });
    }
    let positives = split.y_train().iter().filter(|&&y| y == 1).count();
    let smallest = positives.min(split.y_train().len() - positives);
    if smallest < cv_folds {
        return Err(BeneishError::InvalidHyperparameter {
            param: "cv_folds".to_string(),
            value: cv_folds.to_string(),
            constraint: format!("<= training rows in the smallest class ({smallest})"),
        });
    }

    let candidates = grid.combinations();
    let search = grid_search(
        split.x_train(),
        split.y_train(),
        &StratifiedKFold::new(cv_folds),
        &candidates,
        |params| params.build(MODEL_SEED),
        roc_auc_or_zero,
    )?;

    let combos: Vec<ComboScore> = search
        .points
        .iter()
        .map(|point| ComboScore {
            params: point.params,
            mean_score: point.cv.mean(),
            std_score: point.cv.std(),
        })
        .collect();
    for combo in &combos {
        tracing::debug!(params = %combo.params, mean = combo.mean_score, "combination scored");
    }

    let best = search.best();
    let best_params = best.params;
    let best_score = best.cv.mean();

    let mut model = best_params.build(MODEL_SEED);
    let record = fit_and_evaluate(
        TUNED_MODEL_NAME,
        &mut model,
        split.x_train(),
        split.y_train(),
        split.x_test(),
        split.y_test(),
    )?;

    tracing::info!(
        combinations = combos.len(),
        best = %best_params,
        best_score,
        "tuning finished"
    );

    Ok((
        TunedModel {
            model,
            params: best_params,
        },
        TuningReport {
            combos,
            best_params,
            best_score,
            cv_folds,
            record,
        },
    ))
}
