// =========================================================================
// FALSIFY-GBM: second-order gradient boosting contract
//
// References:
//   - Friedman (2001) "Greedy Function Approximation: A Gradient Boosting Machine"
//   - Chen & Guestrin (2016) "XGBoost: A Scalable Tree Boosting System"
// =========================================================================

use super::*;

fn separable() -> (Matrix<f32>, Vec<usize>) {
    let x = Matrix::from_vec(
        8,
        2,
        vec![
            0.0, 0.0, 0.1, 0.1, 0.2, 0.2, 0.3, 0.3, 10.0, 10.0, 10.1, 10.1, 10.2, 10.2, 10.3, 10.3,
        ],
    )
    .expect("valid");
    (x, vec![0_usize, 0, 0, 0, 1, 1, 1, 1])
}

/// FALSIFY-GBM-001: Probabilities lie in [0, 1]
#[test]
fn falsify_gbm_001_probability_range() {
    let (x, y) = separable();
    let mut gbm = GradientBoostingClassifier::new();
    gbm.fit(&x, &y).expect("fit");

    for (i, p) in gbm.predict_proba(&x).expect("proba").into_iter().enumerate() {
        assert!(
            (0.0..=1.0).contains(&p),
            "FALSIFIED GBM-001: proba[{i}] = {p} outside [0, 1]"
        );
    }
}

/// FALSIFY-GBM-002: Probability is the sigmoid of the margin
#[test]
fn falsify_gbm_002_sigmoid_of_margin() {
    let (x, y) = separable();
    let mut gbm = GradientBoostingClassifier::new().with_n_estimators(10);
    gbm.fit(&x, &y).expect("fit");

    let margins = gbm.decision_function(&x).expect("margins");
    let proba = gbm.predict_proba(&x).expect("proba");
    for (m, p) in margins.iter().zip(&proba) {
        let expected = (1.0 / (1.0 + (-m).exp())) as f32;
        assert!(
            (expected - p).abs() < 1e-6,
            "FALSIFIED GBM-002: sigmoid({m}) = {expected}, proba = {p}"
        );
    }
}

/// FALSIFY-GBM-003: Well-separated data classified correctly
#[test]
fn falsify_gbm_003_separable_data() {
    let (x, y) = separable();
    let mut gbm = GradientBoostingClassifier::new();
    gbm.fit(&x, &y).expect("fit");

    assert_eq!(
        gbm.predict(&x).expect("predict"),
        y,
        "FALSIFIED GBM-003: GBM cannot classify well-separated data"
    );
}

/// FALSIFY-GBM-004: Same seed, same model under row and feature sampling
#[test]
fn falsify_gbm_004_seeded_sampling_deterministic() {
    let (x, y) = separable();
    let make = || {
        GradientBoostingClassifier::new()
            .with_n_estimators(15)
            .with_subsample(0.5)
            .with_colsample_bytree(0.5)
            .with_min_child_weight(0.0)
            .with_seed(42)
    };
    let mut a = make();
    let mut b = make();
    a.fit(&x, &y).expect("fit a");
    b.fit(&x, &y).expect("fit b");

    assert_eq!(a.trees(), b.trees(), "FALSIFIED GBM-004: seeded fits differ");
}

/// FALSIFY-GBM-005: Base margin is the training log-odds
#[test]
fn falsify_gbm_005_base_margin_log_odds() {
    let (x, _) = separable();
    let y = vec![0_usize, 0, 0, 0, 0, 0, 1, 1];
    let mut gbm = GradientBoostingClassifier::new().with_n_estimators(1);
    gbm.fit(&x, &y).expect("fit");

    let expected = (2.0_f64 / 6.0).ln();
    assert!(
        (gbm.base_margin() - expected).abs() < 1e-9,
        "FALSIFIED GBM-005: base margin {} != ln(2/6)",
        gbm.base_margin()
    );
}

/// FALSIFY-GBM-006: Out-of-range hyperparameters are rejected
#[test]
fn falsify_gbm_006_invalid_hyperparameters() {
    let (x, y) = separable();
    for mut gbm in [
        GradientBoostingClassifier::new().with_n_estimators(0),
        GradientBoostingClassifier::new().with_learning_rate(0.0),
        GradientBoostingClassifier::new().with_subsample(0.0),
        GradientBoostingClassifier::new().with_colsample_bytree(1.5),
        GradientBoostingClassifier::new().with_max_depth(0),
        GradientBoostingClassifier::new().with_reg_lambda(-1.0),
    ] {
        assert!(
            matches!(
                gbm.fit(&x, &y),
                Err(BeneishError::InvalidHyperparameter { .. })
            ),
            "FALSIFIED GBM-006: {gbm:?} accepted"
        );
    }
}
