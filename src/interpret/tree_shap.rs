//! Exact path-dependent TreeSHAP (Lundberg et al., 2020, Algorithm 2).
//!
//! Walks every root-to-leaf path once, tracking for each feature on the path
//! the fraction of cover that flows through it with the feature "missing"
//! (`zero_fraction`) and whether the sample itself follows it
//! (`one_fraction`). Cost is O(leaves · depth²) per tree.

use crate::tree::RegressionNode;

#[derive(Debug, Clone, Copy, Default)]
struct PathElement {
    feature: Option<usize>,
    zero_fraction: f64,
    one_fraction: f64,
    pweight: f64,
}

fn extend_path(
    path: &mut [PathElement],
    unique_depth: usize,
    zero_fraction: f64,
    one_fraction: f64,
    feature: Option<usize>,
) {
    path[unique_depth] = PathElement {
        feature,
        zero_fraction,
        one_fraction,
        pweight: if unique_depth == 0 { 1.0 } else { 0.0 },
    };
    let d = unique_depth as f64;
    for i in (0..unique_depth).rev() {
        let fi = i as f64;
        path[i + 1].pweight += one_fraction * path[i].pweight * (fi + 1.0) / (d + 1.0);
        path[i].pweight = zero_fraction * path[i].pweight * (d - fi) / (d + 1.0);
    }
}

fn unwind_path(path: &mut [PathElement], unique_depth: usize, path_index: usize) {
    let one = path[path_index].one_fraction;
    let zero = path[path_index].zero_fraction;
    let d = unique_depth as f64;
    let mut next_one_portion = path[unique_depth].pweight;

    for i in (0..unique_depth).rev() {
        let fi = i as f64;
        if one != 0.0 {
            let tmp = path[i].pweight;
            path[i].pweight = next_one_portion * (d + 1.0) / ((fi + 1.0) * one);
            next_one_portion = tmp - path[i].pweight * zero * (d - fi) / (d + 1.0);
        } else {
            path[i].pweight = path[i].pweight * (d + 1.0) / (zero * (d - fi));
        }
    }

    for i in path_index..unique_depth {
        path[i].feature = path[i + 1].feature;
        path[i].zero_fraction = path[i + 1].zero_fraction;
        path[i].one_fraction = path[i + 1].one_fraction;
    }
}

/// Total permutation weight of the path with element `path_index` removed.
fn unwound_path_sum(path: &[PathElement], unique_depth: usize, path_index: usize) -> f64 {
    let one = path[path_index].one_fraction;
    let zero = path[path_index].zero_fraction;
    let d = unique_depth as f64;
    let mut next_one_portion = path[unique_depth].pweight;
    let mut total = 0.0;

    for i in (0..unique_depth).rev() {
        let fi = i as f64;
        if one != 0.0 {
            let tmp = next_one_portion / ((fi + 1.0) * one);
            total += tmp;
            next_one_portion = path[i].pweight - tmp * zero * (d - fi);
        } else {
            total += path[i].pweight / (zero * (d - fi));
        }
    }

    total * (d + 1.0)
}

fn recurse(
    node: &RegressionNode,
    sample: &[f32],
    phi: &mut [f64],
    parent_path: &[PathElement],
    zero_fraction: f64,
    one_fraction: f64,
    feature: Option<usize>,
) {
    let mut unique_depth = parent_path.len();
    let mut path = Vec::with_capacity(unique_depth + 1);
    path.extend_from_slice(parent_path);
    path.push(PathElement::default());
    extend_path(&mut path, unique_depth, zero_fraction, one_fraction, feature);

    match node {
        RegressionNode::Leaf { value, .. } => {
            for i in 1..=unique_depth {
                let weight = unwound_path_sum(&path, unique_depth, i);
                let el = path[i];
                if let Some(f) = el.feature {
                    phi[f] += weight * (el.one_fraction - el.zero_fraction) * value;
                }
            }
        }
        RegressionNode::Split {
            feature_idx,
            threshold,
            cover,
            left,
            right,
        } => {
            let (hot, cold) = if sample[*feature_idx] < *threshold {
                (left.as_ref(), right.as_ref())
            } else {
                (right.as_ref(), left.as_ref())
            };

            let mut incoming_zero = 1.0;
            let mut incoming_one = 1.0;
            if let Some(k) = (1..=unique_depth).find(|&i| path[i].feature == Some(*feature_idx)) {
                incoming_zero = path[k].zero_fraction;
                incoming_one = path[k].one_fraction;
                unwind_path(&mut path, unique_depth, k);
                unique_depth -= 1;
            }

            let parent = &path[..=unique_depth];
            recurse(
                hot,
                sample,
                phi,
                parent,
                hot.cover() / cover * incoming_zero,
                incoming_one,
                Some(*feature_idx),
            );
            recurse(
                cold,
                sample,
                phi,
                parent,
                cold.cover() / cover * incoming_zero,
                0.0,
                Some(*feature_idx),
            );
        }
    }
}

/// Adds one tree's SHAP values for `sample` into `phi`.
pub(crate) fn accumulate(root: &RegressionNode, sample: &[f32], phi: &mut [f64]) {
    recurse(root, sample, phi, &[], 1.0, 1.0, None);
}
