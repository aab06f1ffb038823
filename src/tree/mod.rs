//! Decision trees and gradient boosting.
//!
//! This module implements:
//! - CART classification trees with weighted Gini impurity (the AdaBoost
//!   weak learner)
//! - Second-order regression trees that carry per-node hessian cover
//! - [`GradientBoostingClassifier`]: logloss boosting over those trees
//!
//! # Example
//!
//! ```
//! use beneish::prelude::*;
//! use beneish::tree::DecisionTreeClassifier;
//!
//! let x = Matrix::from_vec(4, 2, vec![
//!     0.0, 0.0,
//!     0.0, 1.0,
//!     1.0, 0.0,
//!     1.0, 1.0,
//! ]).expect("4x2 matrix");
//! let y = vec![0, 0, 1, 1];
//!
//! let mut tree = DecisionTreeClassifier::new().with_max_depth(1);
//! tree.fit(&x, &y).expect("fit should succeed");
//! assert_eq!(tree.predict(&x).expect("fitted"), vec![0, 0, 1, 1]);
//! ```

mod gradient_boosting;
mod helpers;

pub use gradient_boosting::GradientBoostingClassifier;

use crate::classification::check_training_data;
use crate::error::{BeneishError, Result};
use crate::primitives::Matrix;
use crate::traits::Classifier;
use helpers::{best_gain_split, best_gini_split};

/// Internal node in a classification tree.
///
/// Contains a split condition (feature and threshold) and pointers to
/// left and right subtrees.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Index of the feature to split on
    pub feature_idx: usize,
    /// Threshold value for the split
    pub threshold: f32,
    /// Left subtree (samples where feature <= threshold)
    pub left: Box<TreeNode>,
    /// Right subtree (samples where feature > threshold)
    pub right: Box<TreeNode>,
}

/// Leaf node in a classification tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    /// Class with the larger weight at this leaf (class 0 on ties)
    pub class_label: usize,
    /// Number of training samples that reached this leaf
    pub n_samples: usize,
    /// Weighted share of class 1 among those samples
    pub positive_fraction: f32,
}

/// A node in a classification tree.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeNode {
    /// Internal split node
    Node(Node),
    /// Terminal leaf
    Leaf(Leaf),
}

impl TreeNode {
    /// Depth of the subtree rooted here (a leaf has depth 0).
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf(_) => 0,
            TreeNode::Node(node) => 1 + node.left.depth().max(node.right.depth()),
        }
    }

    /// Leaf reached by one sample.
    #[must_use]
    pub fn leaf_for(&self, sample: &[f32]) -> &Leaf {
        let mut current = self;
        loop {
            match current {
                TreeNode::Leaf(leaf) => return leaf,
                TreeNode::Node(node) => {
                    current = if sample[node.feature_idx] <= node.threshold {
                        &node.left
                    } else {
                        &node.right
                    };
                }
            }
        }
    }
}

/// CART classification tree using weighted Gini impurity.
///
/// `fit` treats every row equally; [`DecisionTreeClassifier::fit_weighted`]
/// takes per-row weights, which is how boosting reweights its stumps.
#[derive(Debug, Clone)]
pub struct DecisionTreeClassifier {
    tree: Option<TreeNode>,
    max_depth: Option<usize>,
    n_features: Option<usize>,
}

impl DecisionTreeClassifier {
    /// Creates an unbounded tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: None,
            max_depth: None,
            n_features: None,
        }
    }

    /// Sets the maximum depth. Depth 1 is a decision stump.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Fitted tree, if any.
    #[must_use]
    pub fn tree(&self) -> Option<&TreeNode> {
        self.tree.as_ref()
    }

    /// Fits the tree with one non-negative weight per row.
    ///
    /// # Errors
    ///
    /// Returns an error on invalid data, a weight count mismatch, or weights
    /// that are negative or sum to zero.
    pub fn fit_weighted(&mut self, x: &Matrix<f32>, y: &[usize], weights: &[f64]) -> Result<()> {
        check_training_data(x, y)?;
        if weights.len() != y.len() {
            return Err(BeneishError::dimension_mismatch(
                "sample weights",
                y.len(),
                weights.len(),
            ));
        }
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) || weights.iter().sum::<f64>() <= 0.0
        {
            return Err("Sample weights must be non-negative with a positive sum".into());
        }

        let rows: Vec<usize> = (0..y.len()).collect();
        self.tree = Some(self.build(x, y, weights, &rows, 0));
        self.n_features = Some(x.n_cols());
        Ok(())
    }

    fn build(
        &self,
        x: &Matrix<f32>,
        y: &[usize],
        weights: &[f64],
        rows: &[usize],
        depth: usize,
    ) -> TreeNode {
        let at_max_depth = self.max_depth.is_some_and(|d| depth >= d);
        let split = if at_max_depth || rows.len() < 2 {
            None
        } else {
            best_gini_split(x, y, weights, rows)
        };

        let Some(split) = split else {
            let total: f64 = rows.iter().map(|&r| weights[r]).sum();
            let positive: f64 = rows.iter().filter(|&&r| y[r] == 1).map(|&r| weights[r]).sum();
            let positive_fraction = if total > 0.0 { positive / total } else { 0.0 };
            return TreeNode::Leaf(Leaf {
                class_label: usize::from(positive > total - positive),
                n_samples: rows.len(),
                positive_fraction: positive_fraction as f32,
            });
        };

        let (left, right): (Vec<usize>, Vec<usize>) = rows
            .iter()
            .partition(|&&r| x.get(r, split.feature_idx) <= split.threshold);

        TreeNode::Node(Node {
            feature_idx: split.feature_idx,
            threshold: split.threshold,
            left: Box::new(self.build(x, y, weights, &left, depth + 1)),
            right: Box::new(self.build(x, y, weights, &right, depth + 1)),
        })
    }

    fn fitted(&self, x: &Matrix<f32>) -> Result<&TreeNode> {
        let tree = self.tree.as_ref().ok_or("Model not fitted")?;
        let expected = self.n_features.unwrap_or(0);
        if x.n_cols() != expected {
            return Err(BeneishError::dimension_mismatch("features", expected, x.n_cols()));
        }
        Ok(tree)
    }
}

impl Default for DecisionTreeClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for DecisionTreeClassifier {
    fn fit(&mut self, x: &Matrix<f32>, y: &[usize]) -> Result<()> {
        let weights = vec![1.0; y.len()];
        self.fit_weighted(x, y, &weights)
    }

    fn predict_proba(&self, x: &Matrix<f32>) -> Result<Vec<f32>> {
        let tree = self.fitted(x)?;
        Ok((0..x.n_rows())
            .map(|i| tree.leaf_for(x.row_slice(i)).positive_fraction)
            .collect())
    }

    /// Majority class of the leaf each row falls into.
    fn predict(&self, x: &Matrix<f32>) -> Result<Vec<usize>> {
        let tree = self.fitted(x)?;
        Ok((0..x.n_rows())
            .map(|i| tree.leaf_for(x.row_slice(i)).class_label)
            .collect())
    }
}

/// A node of a boosted regression tree.
///
/// `cover` is the hessian mass of the training rows that reached the node;
/// children's covers sum to their parent's.
#[derive(Debug, Clone, PartialEq)]
pub enum RegressionNode {
    /// Rows with `x[feature_idx] < threshold` go left.
    Split {
        /// Index of the feature to split on
        feature_idx: usize,
        /// Split value
        threshold: f32,
        /// Hessian cover
        cover: f64,
        /// Rows below the threshold
        left: Box<RegressionNode>,
        /// Rows at or above the threshold
        right: Box<RegressionNode>,
    },
    /// Additive margin contribution, learning rate already applied.
    Leaf {
        /// Leaf weight
        value: f64,
        /// Hessian cover
        cover: f64,
    },
}

impl RegressionNode {
    /// Hessian cover of this node.
    #[must_use]
    pub fn cover(&self) -> f64 {
        match self {
            RegressionNode::Split { cover, .. } | RegressionNode::Leaf { cover, .. } => *cover,
        }
    }

    /// Child a sample descends into, `None` at a leaf.
    #[must_use]
    pub fn route(&self, sample: &[f32]) -> Option<&RegressionNode> {
        match self {
            RegressionNode::Leaf { .. } => None,
            RegressionNode::Split {
                feature_idx,
                threshold,
                left,
                right,
                ..
            } => Some(if sample[*feature_idx] < *threshold {
                left
            } else {
                right
            }),
        }
    }
}

/// Growth parameters for one boosted tree.
#[derive(Debug, Clone, Copy)]
pub(crate) struct GrowParams {
    pub max_depth: usize,
    pub learning_rate: f64,
    pub reg_lambda: f64,
    pub gamma: f64,
    pub min_child_weight: f64,
}

/// One regression tree fitted to logloss gradient statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionTree {
    root: RegressionNode,
}

impl RegressionTree {
    /// Grows a tree depth-first over `rows`, scanning only `features`.
    pub(crate) fn grow(
        x: &Matrix<f32>,
        grad: &[f64],
        hess: &[f64],
        rows: &[usize],
        features: &[usize],
        params: &GrowParams,
    ) -> Self {
        Self {
            root: Self::grow_node(x, grad, hess, rows, features, params, 0),
        }
    }

    fn grow_node(
        x: &Matrix<f32>,
        grad: &[f64],
        hess: &[f64],
        rows: &[usize],
        features: &[usize],
        params: &GrowParams,
        depth: usize,
    ) -> RegressionNode {
        let g: f64 = rows.iter().map(|&r| grad[r]).sum();
        let h: f64 = rows.iter().map(|&r| hess[r]).sum();

        let split = if depth >= params.max_depth {
            None
        } else {
            best_gain_split(
                x,
                grad,
                hess,
                rows,
                features,
                params.reg_lambda,
                params.gamma,
                params.min_child_weight,
            )
        };

        let Some(split) = split else {
            return RegressionNode::Leaf {
                value: -g / (h + params.reg_lambda) * params.learning_rate,
                cover: h,
            };
        };

        let (left, right): (Vec<usize>, Vec<usize>) = rows
            .iter()
            .partition(|&&r| x.get(r, split.feature_idx) < split.threshold);

        RegressionNode::Split {
            feature_idx: split.feature_idx,
            threshold: split.threshold,
            cover: h,
            left: Box::new(Self::grow_node(x, grad, hess, &left, features, params, depth + 1)),
            right: Box::new(Self::grow_node(x, grad, hess, &right, features, params, depth + 1)),
        }
    }

    /// Root node.
    #[must_use]
    pub fn root(&self) -> &RegressionNode {
        &self.root
    }

    /// Margin contribution for one sample.
    #[must_use]
    pub fn predict_row(&self, sample: &[f32]) -> f64 {
        let mut node = &self.root;
        while let Some(next) = node.route(sample) {
            node = next;
        }
        match node {
            RegressionNode::Leaf { value, .. } => *value,
            RegressionNode::Split { .. } => 0.0,
        }
    }

    /// Cover-weighted mean of the leaf values: the tree's expected output
    /// over its training distribution.
    #[must_use]
    pub fn expected_value(&self) -> f64 {
        fn weighted_sum(node: &RegressionNode) -> f64 {
            match node {
                RegressionNode::Leaf { value, cover } => value * cover,
                RegressionNode::Split { left, right, .. } => weighted_sum(left) + weighted_sum(right),
            }
        }
        let cover = self.root.cover();
        if cover > 0.0 {
            weighted_sum(&self.root) / cover
        } else {
            0.0
        }
    }

    /// Depth of the tree (a single leaf has depth 0).
    #[must_use]
    pub fn depth(&self) -> usize {
        fn depth_of(node: &RegressionNode) -> usize {
            match node {
                RegressionNode::Leaf { .. } => 0,
                RegressionNode::Split { left, right, .. } => 1 + depth_of(left).max(depth_of(right)),
            }
        }
        depth_of(&self.root)
    }

    /// Number of leaves.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        fn count(node: &RegressionNode) -> usize {
            match node {
                RegressionNode::Leaf { .. } => 1,
                RegressionNode::Split { left, right, .. } => count(left) + count(right),
            }
        }
        count(&self.root)
    }
}

#[cfg(test)]
mod tests_dt_contract;
#[cfg(test)]
mod tests_gbm_contract;
