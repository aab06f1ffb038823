//! Exhaustive cross-validated search over a finite list of candidates.

use super::{cross_validate, CrossValidationResult, StratifiedKFold};
use crate::error::{BeneishError, Result};
use crate::primitives::Matrix;
use crate::traits::Classifier;
use rayon::prelude::*;

/// One evaluated candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct GridPoint<P> {
    /// Candidate configuration
    pub params: P,
    /// Per-fold scores
    pub cv: CrossValidationResult,
}

/// Every candidate's scores, in the order the candidates were given.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSearchResult<P> {
    /// Evaluated candidates
    pub points: Vec<GridPoint<P>>,
    /// Index of the winner in `points`
    pub best_index: usize,
}

impl<P> GridSearchResult<P> {
    /// Winning candidate.
    #[must_use]
    pub fn best(&self) -> &GridPoint<P> {
        &self.points[self.best_index]
    }
}

/// Scores every candidate by cross-validation and picks the highest mean.
///
/// Candidates run in parallel; results keep candidate order. On equal means
/// the earliest candidate wins.
///
/// # Errors
///
/// Returns an error if `candidates` is empty or any fold fails to fit.
///
/// # Example
///
/// ```
/// use beneish::prelude::*;
/// use beneish::classification::KNearestNeighbors;
/// use beneish::metrics::roc_auc_or_zero;
/// use beneish::model_selection::{grid_search, StratifiedKFold};
///
/// let x = Matrix::from_vec(9, 1, vec![0.0, 0.1, 0.2, 0.3, 0.4, 5.0, 5.1, 5.2, 5.3]).unwrap();
/// let y = vec![0, 0, 0, 0, 0, 1, 1, 1, 1];
///
/// let result = grid_search(
///     &x,
///     &y,
///     &StratifiedKFold::new(3),
///     &[1_usize, 3],
///     |&k| KNearestNeighbors::new(k),
///     roc_auc_or_zero,
/// )
/// .unwrap();
/// assert_eq!(result.points.len(), 2);
/// ```
pub fn grid_search<P, M, F, S>(
    x: &Matrix<f32>,
    y: &[usize],
    cv: &StratifiedKFold,
    candidates: &[P],
    make_model: F,
    scorer: S,
) -> Result<GridSearchResult<P>>
where
    P: Clone + Sync,
    M: Classifier,
    F: Fn(&P) -> M + Sync,
    S: Fn(&[usize], &[f32]) -> f32 + Sync,
{
    if candidates.is_empty() {
        return Err(BeneishError::empty_input("grid candidates"));
    }

    let results: Vec<CrossValidationResult> = candidates
        .par_iter()
        .map(|params| cross_validate(x, y, cv, || make_model(params), &scorer))
        .collect::<Result<_>>()?;

    let mut best_index = 0;
    for (i, result) in results.iter().enumerate() {
        if result.mean() > results[best_index].mean() {
            best_index = i;
        }
    }

    let points: Vec<GridPoint<P>> = candidates
        .iter()
        .cloned()
        .zip(results)
        .map(|(params, cv)| GridPoint { params, cv })
        .collect();

    tracing::debug!(
        candidates = points.len(),
        best_index,
        best_score = points[best_index].cv.mean(),
        "grid search finished"
    );

    Ok(GridSearchResult { points, best_index })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::KNearestNeighbors;
    use crate::metrics::roc_auc_or_zero;

    fn data() -> (Matrix<f32>, Vec<usize>) {
        let x = Matrix::from_vec(
            12,
            1,
            vec![0.0, 0.3, 0.6, 0.9, 1.2, 1.5, 4.0, 4.3, 4.6, 4.9, 5.2, 5.5],
        )
        .expect("12x1");
        (x, vec![0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1])
    }

    #[test]
    fn test_results_keep_candidate_order() {
        let (x, y) = data();
        let ks = [1_usize, 2, 3, 4];
        let result = grid_search(
            &x,
            &y,
            &StratifiedKFold::new(3),
            &ks,
            |&k| KNearestNeighbors::new(k),
            roc_auc_or_zero,
        )
        .expect("search");
        let order: Vec<usize> = result.points.iter().map(|p| p.params).collect();
        assert_eq!(order, ks);
        assert!(result.points.iter().all(|p| p.cv.scores.len() == 3));
    }

    #[test]
    fn test_ties_go_to_first_candidate() {
        let (x, y) = data();
        // Perfectly separable: every k scores AUC 1.
        let result = grid_search(
            &x,
            &y,
            &StratifiedKFold::new(3),
            &[3_usize, 1, 2],
            |&k| KNearestNeighbors::new(k),
            roc_auc_or_zero,
        )
        .expect("search");
        assert_eq!(result.best_index, 0);
        assert_eq!(result.best().params, 3);
    }

    #[test]
    fn test_best_is_highest_mean() {
        let (x, y) = data();
        let result = grid_search(
            &x,
            &y,
            &StratifiedKFold::new(3),
            &[0.0_f32, 1.0],
            // k = 8 votes over a whole training fold and scores 0.5.
            |&flag| KNearestNeighbors::new(if flag > 0.5 { 1 } else { 8 }),
            |y_true: &[usize], proba: &[f32]| {
                y_true
                    .iter()
                    .zip(proba)
                    .filter(|(t, p)| (**p > 0.5) == (**t == 1))
                    .count() as f32
                    / y_true.len() as f32
            },
        )
        .expect("search");
        assert_eq!(result.best_index, 1);
        assert!(result.points[1].cv.mean() > result.points[0].cv.mean());
    }

    #[test]
    fn test_empty_candidates_rejected() {
        let (x, y) = data();
        let none: [usize; 0] = [];
        assert!(grid_search(
            &x,
            &y,
            &StratifiedKFold::new(3),
            &none,
            |&k| KNearestNeighbors::new(k),
            roc_auc_or_zero,
        )
        .is_err());
    }

    #[test]
    fn test_fold_failure_propagates() {
        let (x, y) = data();
        // k larger than a training fold cannot fit.
        assert!(grid_search(
            &x,
            &y,
            &StratifiedKFold::new(3),
            &[100_usize],
            |&k| KNearestNeighbors::new(k),
            roc_auc_or_zero,
        )
        .is_err());
    }
}
