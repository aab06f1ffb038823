// =========================================================================
// FALSIFY-AB: AdaBoost (SAMME) contract
//
// References:
//   - Freund & Schapire (1997) "A decision-theoretic generalization of
//     on-line learning"
//   - Zhu et al. (2009) "Multi-class AdaBoost"
// =========================================================================

use super::*;
use crate::primitives::Matrix;
use crate::traits::Classifier;

fn line(n: usize) -> Matrix<f32> {
    Matrix::from_vec(n, 1, (0..n).map(|i| i as f32).collect()).expect("valid")
}

/// FALSIFY-AB-001: A perfect first stump ends boosting
#[test]
fn falsify_ab_001_perfect_stump_stops() {
    let x = line(6);
    let y = vec![0_usize, 0, 0, 1, 1, 1];
    let mut ada = AdaBoostClassifier::new().with_n_estimators(200);
    ada.fit(&x, &y).expect("fit");

    assert_eq!(ada.n_fitted(), 1, "FALSIFIED AB-001: boosting kept going");
    assert_eq!(ada.predict(&x).expect("predict"), y);
}

/// FALSIFY-AB-002: Stump weight is lr · ln((1 - err) / err)
#[test]
fn falsify_ab_002_stump_weight() {
    // Best stump splits at 1.5 and misclassifies row 3 only: err = 0.2.
    let x = line(5);
    let y = vec![0_usize, 0, 1, 0, 1];
    let mut ada = AdaBoostClassifier::new()
        .with_n_estimators(1)
        .with_learning_rate(0.5);
    ada.fit(&x, &y).expect("fit");

    let expected = 0.5 * 4.0_f64.ln();
    let actual = ada.estimator_weights()[0];
    assert!(
        (actual - expected).abs() < 1e-9,
        "FALSIFIED AB-002: weight {actual} != {expected}"
    );
}

/// FALSIFY-AB-003: Decision values lie in [-1, 1], probabilities in
/// [σ(-1), σ(1)]
#[test]
fn falsify_ab_003_bounded_outputs() {
    let x = line(10);
    let y = vec![0_usize, 0, 1, 0, 0, 1, 1, 0, 1, 1];
    let mut ada = AdaBoostClassifier::new()
        .with_n_estimators(30)
        .with_learning_rate(0.05);
    ada.fit(&x, &y).expect("fit");

    let lo = 1.0 / (1.0 + 1.0_f32.exp());
    let hi = 1.0 - lo;
    for d in ada.decision_function(&x).expect("decision") {
        assert!((-1.0 - 1e-9..=1.0 + 1e-9).contains(&d), "FALSIFIED AB-003: decision {d}");
    }
    for p in ada.predict_proba(&x).expect("proba") {
        assert!(p >= lo - 1e-6 && p <= hi + 1e-6, "FALSIFIED AB-003: proba {p}");
    }
}

/// FALSIFY-AB-004: Hard prediction agrees with the sign of the vote
#[test]
fn falsify_ab_004_predict_matches_vote_sign() {
    let x = line(10);
    let y = vec![0_usize, 1, 1, 0, 0, 1, 0, 0, 1, 1];
    let mut ada = AdaBoostClassifier::new().with_n_estimators(25);
    ada.fit(&x, &y).expect("fit");

    let decision = ada.decision_function(&x).expect("decision");
    let preds = ada.predict(&x).expect("predict");
    for (d, p) in decision.iter().zip(&preds) {
        assert_eq!(*p, usize::from(*d > 0.0), "FALSIFIED AB-004: vote {d}, label {p}");
    }
}

/// FALSIFY-AB-005: Unfitted model refuses to predict
#[test]
fn falsify_ab_005_unfitted() {
    let ada = AdaBoostClassifier::new();
    assert!(ada.predict_proba(&line(2)).is_err(), "FALSIFIED AB-005");
}
