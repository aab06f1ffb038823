//! Tests for classification module.

use super::*;

fn two_blobs() -> (Matrix<f32>, Vec<usize>) {
    let x = Matrix::from_vec(
        8,
        2,
        vec![
            0.0, 0.0, 0.5, 0.2, 0.1, 0.6, 0.4, 0.4, //
            4.0, 4.2, 4.5, 3.9, 3.8, 4.4, 4.2, 4.1,
        ],
    )
    .expect("8x2 matrix");
    (x, vec![0, 0, 0, 0, 1, 1, 1, 1])
}

#[test]
fn test_knn_default_is_five() {
    assert_eq!(KNearestNeighbors::default().k(), 5);
}

#[test]
fn test_knn_probability_is_vote_fraction() {
    let (x, y) = two_blobs();
    let mut knn = KNearestNeighbors::new(5);
    knn.fit(&x, &y).expect("fit");
    let proba = knn.predict_proba(&x).expect("proba");
    // Four same-class rows plus one from the other blob.
    assert!((proba[0] - 0.2).abs() < 1e-6);
    assert!((proba[7] - 0.8).abs() < 1e-6);
    assert_eq!(knn.predict(&x).expect("predict"), y);
}

#[test]
fn test_knn_k_larger_than_training_set() {
    let (x, y) = two_blobs();
    let mut knn = KNearestNeighbors::new(9);
    assert!(knn.fit(&x, &y).is_err());
    assert!(KNearestNeighbors::new(0).fit(&x, &y).is_err());
}

#[test]
fn test_knn_not_fitted_and_dimension_mismatch() {
    let (x, y) = two_blobs();
    let knn = KNearestNeighbors::new(3);
    assert!(knn.predict_proba(&x).is_err());

    let mut knn = KNearestNeighbors::new(3);
    knn.fit(&x, &y).expect("fit");
    let wrong = Matrix::from_vec(1, 3, vec![0.0, 0.0, 0.0]).expect("1x3");
    assert!(matches!(
        knn.predict_proba(&wrong),
        Err(BeneishError::DimensionMismatch { .. })
    ));
}

#[test]
fn test_nb_fit_statistics() {
    let (x, y) = two_blobs();
    let mut nb = GaussianNB::new();
    nb.fit(&x, &y).expect("fit");
    let priors = nb.class_priors().expect("fitted");
    assert!((priors[0] - 0.5).abs() < 1e-6);
    let means = nb.means().expect("fitted");
    assert!((means[0][0] - 0.25).abs() < 1e-6);
    assert!((means[1][0] - 4.125).abs() < 1e-5);
}

#[test]
fn test_nb_probabilities() {
    let (x, y) = two_blobs();
    let mut nb = GaussianNB::new();
    nb.fit(&x, &y).expect("fit");
    let proba = nb.predict_proba(&x).expect("proba");
    assert!(proba[..4].iter().all(|&p| p < 0.5));
    assert!(proba[4..].iter().all(|&p| p > 0.5));
    assert_eq!(nb.predict(&x).expect("predict"), y);
}

#[test]
fn test_nb_requires_both_classes() {
    let (x, _) = two_blobs();
    assert!(GaussianNB::new().fit(&x, &[1; 8]).is_err());
}

#[test]
fn test_nb_constant_feature_stays_finite() {
    let x = Matrix::from_vec(4, 2, vec![1.0, 0.0, 1.0, 0.1, 1.0, 5.0, 1.0, 5.1]).expect("4x2");
    let mut nb = GaussianNB::new();
    nb.fit(&x, &[0, 0, 1, 1]).expect("fit");
    let proba = nb.predict_proba(&x).expect("proba");
    assert!(proba.iter().all(|p| p.is_finite()));
}

#[test]
fn test_nb_var_smoothing_softens_probabilities() {
    let x = Matrix::from_vec(4, 1, vec![0.0, 0.2, 5.0, 5.2]).expect("4x1");
    let y = [0, 0, 1, 1];
    let mut tight = GaussianNB::new();
    tight.fit(&x, &y).expect("fit");
    let mut smooth = GaussianNB::new().with_var_smoothing(0.5);
    smooth.fit(&x, &y).expect("fit");
    // Row 0 sits on the class-0 mean; smoothing makes class 1 less implausible.
    let tight_p = tight.predict_proba(&x).expect("proba")[0];
    let smooth_p = smooth.predict_proba(&x).expect("proba")[0];
    assert!(smooth_p > tight_p);
    assert!(smooth_p < 0.5);
}

#[test]
fn test_labels_outside_binary_rejected() {
    let (x, _) = two_blobs();
    let y = vec![0, 0, 0, 0, 1, 1, 1, 2];
    assert!(matches!(
        GaussianNB::new().fit(&x, &y),
        Err(BeneishError::InvalidLabel { row: 7, .. })
    ));
}

#[test]
fn test_svc_on_blobs() {
    let (x, y) = two_blobs();
    let mut svc = SVC::new().with_seed(42);
    svc.fit(&x, &y).expect("fit");
    assert_eq!(svc.predict(&x).expect("predict"), y);
    assert!(svc.fitted_gamma().expect("fitted") > 0.0);
}
