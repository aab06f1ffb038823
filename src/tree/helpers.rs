//! Split search shared by the classification and boosted regression trees.

use crate::primitives::Matrix;

/// A candidate split: rows with `x[feature] <= threshold` go left for the
/// classification tree, rows with `x[feature] < threshold` for the boosted
/// regression tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SplitCandidate {
    pub feature_idx: usize,
    pub threshold: f32,
    /// Impurity decrease (classification) or loss reduction (boosting).
    pub score: f64,
}

/// Gini impurity of a two-class node from its weighted positive share.
///
/// Gini = 1 - p₀² - p₁²
pub(crate) fn weighted_gini(positive_weight: f64, total_weight: f64) -> f64 {
    if total_weight <= 0.0 {
        return 0.0;
    }
    let p1 = positive_weight / total_weight;
    let p0 = 1.0 - p1;
    1.0 - p0 * p0 - p1 * p1
}

/// Row indices sorted by one feature, ascending.
fn sorted_by_feature(x: &Matrix<f32>, rows: &[usize], feature: usize) -> Vec<usize> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|&a, &b| x.get(a, feature).total_cmp(&x.get(b, feature)));
    sorted
}

/// Midpoint between consecutive distinct values, or `None` if they are equal.
fn midpoint(lo: f32, hi: f32) -> Option<f32> {
    if hi - lo <= 1e-7 * lo.abs().max(1.0) {
        return None;
    }
    let mid = lo + (hi - lo) / 2.0;
    // Guard against the midpoint rounding onto the upper value.
    Some(if mid >= hi { lo } else { mid })
}

/// Best weighted-Gini split over every feature.
///
/// Returns `None` when no split reduces impurity (pure node or constant
/// features). Ties keep the first feature and lowest threshold.
pub(crate) fn best_gini_split(
    x: &Matrix<f32>,
    y: &[usize],
    weights: &[f64],
    rows: &[usize],
) -> Option<SplitCandidate> {
    let total: f64 = rows.iter().map(|&r| weights[r]).sum();
    let total_pos: f64 = rows.iter().filter(|&&r| y[r] == 1).map(|&r| weights[r]).sum();
    let parent = weighted_gini(total_pos, total);
    if parent <= 0.0 || total <= 0.0 {
        return None;
    }

    let mut best: Option<SplitCandidate> = None;

    for feature in 0..x.n_cols() {
        let sorted = sorted_by_feature(x, rows, feature);
        let mut left_w = 0.0;
        let mut left_pos = 0.0;

        for k in 0..sorted.len() - 1 {
            let r = sorted[k];
            left_w += weights[r];
            if y[r] == 1 {
                left_pos += weights[r];
            }

            let Some(threshold) = midpoint(x.get(r, feature), x.get(sorted[k + 1], feature)) else {
                continue;
            };

            let right_w = total - left_w;
            let right_pos = total_pos - left_pos;
            let child = (left_w * weighted_gini(left_pos, left_w)
                + right_w * weighted_gini(right_pos, right_w))
                / total;
            let decrease = parent - child;

            if decrease > 1e-12 && best.map_or(true, |b| decrease > b.score + 1e-12) {
                best = Some(SplitCandidate {
                    feature_idx: feature,
                    threshold,
                    score: decrease,
                });
            }
        }
    }

    best
}

/// Second-order regularized objective for a set of gradient statistics:
/// `G² / (H + λ)`.
pub(crate) fn structure_score(grad: f64, hess: f64, lambda: f64) -> f64 {
    grad * grad / (hess + lambda)
}

/// Best loss-reducing split for a boosted regression tree.
///
/// Gain = ½ [G_L²/(H_L+λ) + G_R²/(H_R+λ) − G²/(H+λ)] − γ. A side must
/// carry at least `min_child_weight` hessian. Only `features` are scanned.
#[allow(clippy::too_many_arguments)]
pub(crate) fn best_gain_split(
    x: &Matrix<f32>,
    grad: &[f64],
    hess: &[f64],
    rows: &[usize],
    features: &[usize],
    lambda: f64,
    gamma: f64,
    min_child_weight: f64,
) -> Option<SplitCandidate> {
    let g_total: f64 = rows.iter().map(|&r| grad[r]).sum();
    let h_total: f64 = rows.iter().map(|&r| hess[r]).sum();
    let parent = structure_score(g_total, h_total, lambda);

    let mut best: Option<SplitCandidate> = None;

    for &feature in features {
        let sorted = sorted_by_feature(x, rows, feature);
        let mut g_left = 0.0;
        let mut h_left = 0.0;

        for k in 0..sorted.len().saturating_sub(1) {
            let r = sorted[k];
            g_left += grad[r];
            h_left += hess[r];

            let Some(threshold) = midpoint(x.get(r, feature), x.get(sorted[k + 1], feature)) else {
                continue;
            };

            let g_right = g_total - g_left;
            let h_right = h_total - h_left;
            if h_left < min_child_weight || h_right < min_child_weight {
                continue;
            }

            let gain = 0.5
                * (structure_score(g_left, h_left, lambda) + structure_score(g_right, h_right, lambda)
                    - parent)
                - gamma;

            if gain > 1e-6 && best.map_or(true, |b| gain > b.score) {
                best = Some(SplitCandidate {
                    feature_idx: feature,
                    threshold,
                    score: gain,
                });
            }
        }
    }

    best
}

#[cfg(test)]
#[path = "helpers_tests.rs"]
mod tests;
