//! Explainer Adapter: attributions for the tuned model.

use crate::error::{BeneishError, Result};
use crate::interpret::{BeeswarmRow, ShapValues, TreeExplainer};
use crate::primitives::Matrix;
use crate::tuning::TunedModel;
use serde::Serialize;

/// Bins per beeswarm row.
pub const BEESWARM_BINS: usize = 40;

/// Mean |attribution| of one feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureImportance {
    /// Column name
    pub feature: String,
    /// Mean absolute attribution over the explained rows
    pub mean_abs_shap: f32,
}

/// Data behind the two attribution charts.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Column names, in model input order
    pub feature_names: Vec<String>,
    /// Per-row attributions
    pub shap: ShapValues,
    /// Features by descending mean |attribution|
    pub importance: Vec<FeatureImportance>,
    /// Beeswarm rows, same order as `importance`
    pub beeswarm: Vec<BeeswarmRow>,
}

/// Attributes every row of `x_train` for the tuned model.
///
/// # Errors
///
/// Returns [`BeneishError::NotReady`] when no tuned model is retained, and a
/// dimension error when `feature_names` or `x_train` do not match the model.
pub fn explain(
    tuned: Option<&TunedModel>,
    x_train: &Matrix<f32>,
    feature_names: &[&str],
    n_bins: usize,
) -> Result<Explanation> {
    let tuned = tuned.ok_or(BeneishError::NotReady)?;
    if feature_names.len() != x_train.n_cols() {
        return Err(BeneishError::dimension_mismatch(
            "feature names",
            x_train.n_cols(),
            feature_names.len(),
        ));
    }

    let explainer = TreeExplainer::new(tuned.model())?;
    let shap = explainer.shap_values(x_train)?;
    let mean_abs = shap.mean_abs();
    let importance = shap
        .ranking()
        .into_iter()
        .map(|j| FeatureImportance {
            feature: feature_names[j].to_string(),
            mean_abs_shap: mean_abs[j],
        })
        .collect();
    let beeswarm = shap.beeswarm(x_train, n_bins)?;

    tracing::info!(rows = x_train.n_rows(), "explanation computed");
    Ok(Explanation {
        feature_names: feature_names.iter().map(|s| (*s).to_string()).collect(),
        shap,
        importance,
        beeswarm,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::PreparedSplit;
    use crate::tuning::{tune, ParamGrid};
    use crate::validation::Dataset;

    fn tuned() -> (TunedModel, PreparedSplit) {
        let n = 30;
        let data: Vec<f32> = (0..n)
            .flat_map(|i| {
                let label = i % 3 == 0;
                let signal = if label { 4.0 } else { 0.0 } + (i % 5) as f32 * 0.2;
                [signal, ((i * 7) % 10) as f32]
            })
            .collect();
        let labels = (0..n).map(|i| usize::from(i % 3 == 0)).collect();
        let ds = Dataset::new(Matrix::from_vec(n, 2, data).expect("30x2"), labels)
            .expect("dataset");
        let split = PreparedSplit::new(&ds, 0.2, 42).expect("split");
        let grid = ParamGrid {
            n_estimators: vec![10],
            learning_rate: vec![0.3],
            max_depth: vec![2],
        };
        let (tuned, _) = tune(&split, &grid, 3).expect("tune");
        (tuned, split)
    }

    #[test]
    fn test_not_ready_without_tuned_model() {
        let x = Matrix::from_vec(1, 2, vec![0.0, 0.0]).expect("1x2");
        let err = explain(None, &x, &["a", "b"], 10).expect_err("no model");
        assert!(matches!(err, BeneishError::NotReady));
        assert!(err.is_warning());
    }

    #[test]
    fn test_signal_feature_ranks_first() {
        let (tuned, split) = tuned();
        let explanation =
            explain(Some(&tuned), split.x_train(), &["signal", "noise"], 8).expect("explain");

        assert_eq!(explanation.importance[0].feature, "signal");
        assert!(explanation.importance[0].mean_abs_shap >= explanation.importance[1].mean_abs_shap);
        assert_eq!(explanation.beeswarm.len(), 2);
        assert_eq!(explanation.beeswarm[0].feature, 0);
        assert_eq!(explanation.shap.values().shape(), split.x_train().shape());
        let counted: usize = explanation.beeswarm[0].bins.iter().map(|b| b.count).sum();
        assert_eq!(counted, split.x_train().n_rows());
    }

    #[test]
    fn test_feature_name_count_checked() {
        let (tuned, split) = tuned();
        assert!(explain(Some(&tuned), split.x_train(), &["only"], 8).is_err());
    }
}
