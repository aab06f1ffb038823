// =========================================================================
// FALSIFY-NB: Gaussian naive Bayes contract
//
// References:
//   - Murphy (2012) "Machine Learning: A Probabilistic Perspective"
// =========================================================================

use super::*;

fn data() -> (Matrix<f32>, Vec<usize>) {
    let x = Matrix::from_vec(6, 2, vec![
        1.0, 2.0, 1.5, 2.5, 2.0, 3.0,
        5.0, 6.0, 5.5, 6.5, 6.0, 7.0,
    ]).expect("valid");
    (x, vec![0_usize, 0, 0, 1, 1, 1])
}

/// FALSIFY-NB-001: Probabilities lie in [0, 1]
#[test]
fn falsify_nb_001_probability_bounds() {
    let (x, y) = data();
    let mut nb = GaussianNB::new();
    nb.fit(&x, &y).expect("fit");

    for (i, p) in nb.predict_proba(&x).expect("proba").iter().enumerate() {
        assert!(
            (0.0..=1.0).contains(p),
            "FALSIFIED NB-001: proba[{i}] = {p}"
        );
    }
}

/// FALSIFY-NB-002: Deterministic predictions
#[test]
fn falsify_nb_002_deterministic() {
    let (x, y) = data();
    let mut a = GaussianNB::new();
    let mut b = GaussianNB::new();
    a.fit(&x, &y).expect("fit");
    b.fit(&x, &y).expect("fit");
    assert_eq!(
        a.predict_proba(&x).expect("proba"),
        b.predict_proba(&x).expect("proba"),
        "FALSIFIED NB-002: two fits disagree"
    );
}

/// FALSIFY-NB-003: Priors sum to 1
#[test]
fn falsify_nb_003_priors_sum_to_one() {
    let (x, _) = data();
    let mut nb = GaussianNB::new();
    nb.fit(&x, &[0, 0, 0, 0, 1, 1]).expect("fit");
    let priors = nb.class_priors().expect("fitted");
    assert!(
        (priors[0] + priors[1] - 1.0).abs() < 1e-6,
        "FALSIFIED NB-003: priors {priors:?}"
    );
}
