// =========================================================================
// FALSIFY-DT: weighted CART classification tree contract
//
// References:
//   - Breiman et al. (1984) "Classification and Regression Trees"
// =========================================================================

use super::*;

fn line(n: usize) -> Matrix<f32> {
    Matrix::from_vec(n, 1, (0..n).map(|i| i as f32).collect()).expect("valid")
}

/// FALSIFY-DT-001: Predictions are binary labels
#[test]
fn falsify_dt_001_predictions_binary() {
    let x = line(6);
    let y = vec![0_usize, 1, 1, 0, 1, 0];

    let mut dt = DecisionTreeClassifier::new().with_max_depth(2);
    dt.fit(&x, &y).expect("fit succeeds");

    for (i, p) in dt.predict(&x).expect("predict").into_iter().enumerate() {
        assert!(p <= 1, "FALSIFIED DT-001: prediction[{i}] = {p}, not in {{0, 1}}");
    }
}

/// FALSIFY-DT-002: Deterministic: same input produces same tree
#[test]
fn falsify_dt_002_deterministic() {
    let x = line(8);
    let y = vec![0_usize, 1, 0, 0, 1, 1, 0, 1];
    let weights = [0.1, 0.2, 0.05, 0.15, 0.1, 0.2, 0.1, 0.1];

    let mut a = DecisionTreeClassifier::new().with_max_depth(1);
    let mut b = DecisionTreeClassifier::new().with_max_depth(1);
    a.fit_weighted(&x, &y, &weights).expect("fit a");
    b.fit_weighted(&x, &y, &weights).expect("fit b");

    assert_eq!(a.tree(), b.tree(), "FALSIFIED DT-002: identical fits differ");
}

/// FALSIFY-DT-003: Depth never exceeds max_depth
#[test]
fn falsify_dt_003_depth_bounded() {
    let x = line(12);
    let y = vec![0_usize, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1];

    for max_depth in 0..4 {
        let mut dt = DecisionTreeClassifier::new().with_max_depth(max_depth);
        dt.fit(&x, &y).expect("fit");
        let depth = dt.tree().expect("fitted").depth();
        assert!(
            depth <= max_depth,
            "FALSIFIED DT-003: depth {depth} > max_depth {max_depth}"
        );
    }
}

/// FALSIFY-DT-004: Unbounded tree memorizes distinct points
#[test]
fn falsify_dt_004_memorizes_distinct_points() {
    let x = line(6);
    let y = vec![0_usize, 1, 1, 0, 1, 0];

    let mut dt = DecisionTreeClassifier::new();
    dt.fit(&x, &y).expect("fit");

    assert_eq!(
        dt.predict(&x).expect("predict"),
        y,
        "FALSIFIED DT-004: unbounded tree misclassifies training data"
    );
}

/// FALSIFY-DT-005: Leaf probabilities lie in [0, 1]
#[test]
fn falsify_dt_005_probability_range() {
    let x = line(7);
    let y = vec![0_usize, 0, 1, 0, 1, 1, 0];
    let weights = [3.0, 1.0, 0.5, 2.0, 1.0, 0.25, 1.0];

    let mut dt = DecisionTreeClassifier::new().with_max_depth(1);
    dt.fit_weighted(&x, &y, &weights).expect("fit");

    for (i, p) in dt.predict_proba(&x).expect("proba").into_iter().enumerate() {
        assert!(
            (0.0..=1.0).contains(&p),
            "FALSIFIED DT-005: proba[{i}] = {p} outside [0, 1]"
        );
    }
}
