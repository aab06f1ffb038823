//! RBF-kernel support vector classifier.
//!
//! Dual problem solved by SMO with second-order working-set selection
//! (Fan, Chen & Lin 2005). Probabilities come from a Platt sigmoid fitted to
//! cross-validated decision values (Lin, Lin & Weng 2007).

use super::check_training_data;
use crate::error::{BeneishError, Result};
use crate::model_selection::StratifiedKFold;
use crate::primitives::Matrix;
use crate::traits::Classifier;

/// Lower bound for a non-positive curvature in the SMO update.
const TAU: f64 = 1e-12;

/// Kernel width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gamma {
    /// `1 / (n_features * Var(X))` over all training values, or 1 if the
    /// training data is constant.
    Scale,
    /// Fixed value.
    Value(f64),
}

/// Support vector classifier with an RBF kernel `exp(-gamma * |x - x'|²)`.
///
/// Hard predictions follow the sign of the decision function; probabilities
/// come from the Platt sigmoid and may disagree with them near the boundary.
///
/// # Example
///
/// ```
/// use beneish::classification::SVC;
/// use beneish::prelude::*;
///
/// let x = Matrix::from_vec(8, 1, vec![-2.0, -1.8, -1.6, -1.4, 1.4, 1.6, 1.8, 2.0]).unwrap();
/// let y = vec![0, 0, 0, 0, 1, 1, 1, 1];
///
/// let mut svc = SVC::new();
/// svc.fit(&x, &y).unwrap();
/// assert_eq!(svc.predict(&x).unwrap(), y);
/// ```
#[derive(Debug, Clone)]
pub struct SVC {
    c: f64,
    gamma: Gamma,
    tol: f64,
    max_iter: usize,
    probability_folds: usize,
    seed: u64,
    fitted: Option<FittedSvc>,
}

#[derive(Debug, Clone)]
struct FittedSvc {
    support_vectors: Matrix<f32>,
    /// `alpha_i * y_i` per support vector.
    dual_coef: Vec<f64>,
    rho: f64,
    gamma: f64,
    /// Platt parameters: P(y=1|f) = 1 / (1 + exp(a*f + b)).
    platt_a: f64,
    platt_b: f64,
}

impl Default for SVC {
    fn default() -> Self {
        Self::new()
    }
}

impl SVC {
    /// Creates an SVC with C = 1, gamma = "scale" and tolerance 1e-3.
    #[must_use]
    pub fn new() -> Self {
        Self {
            c: 1.0,
            gamma: Gamma::Scale,
            tol: 1e-3,
            max_iter: 100_000,
            probability_folds: 5,
            seed: 0,
            fitted: None,
        }
    }

    /// Sets the regularization parameter C.
    #[must_use]
    pub fn with_c(mut self, c: f64) -> Self {
        self.c = c;
        self
    }

    /// Sets the kernel width.
    #[must_use]
    pub fn with_gamma(mut self, gamma: Gamma) -> Self {
        self.gamma = gamma;
        self
    }

    /// Seeds the fold assignment used to calibrate probabilities.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Number of support vectors, once fitted.
    #[must_use]
    pub fn n_support(&self) -> Option<usize> {
        self.fitted.as_ref().map(|f| f.dual_coef.len())
    }

    /// Kernel width in use, once fitted.
    #[must_use]
    pub fn fitted_gamma(&self) -> Option<f64> {
        self.fitted.as_ref().map(|f| f.gamma)
    }

    /// Signed distance-like score; positive means class 1.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is not fitted or dimensions mismatch.
    pub fn decision_function(&self, x: &Matrix<f32>) -> Result<Vec<f64>> {
        let model = self.fitted.as_ref().ok_or("Model not fitted")?;
        if x.n_cols() != model.support_vectors.n_cols() {
            return Err(BeneishError::dimension_mismatch(
                "features",
                model.support_vectors.n_cols(),
                x.n_cols(),
            ));
        }

        Ok((0..x.n_rows())
            .map(|i| {
                let row = x.row_slice(i);
                model
                    .dual_coef
                    .iter()
                    .enumerate()
                    .map(|(s, coef)| coef * rbf(row, model.support_vectors.row_slice(s), model.gamma))
                    .sum::<f64>()
                    - model.rho
            })
            .collect())
    }

    fn resolve_gamma(&self, x: &Matrix<f32>) -> Result<f64> {
        match self.gamma {
            Gamma::Value(g) if g > 0.0 => Ok(g),
            Gamma::Value(g) => Err(BeneishError::InvalidHyperparameter {
                param: "gamma".to_string(),
                value: g.to_string(),
                constraint: "> 0".to_string(),
            }),
            Gamma::Scale => {
                let var = f64::from(x.flat_variance());
                if var > 0.0 {
                    Ok(1.0 / (x.n_cols() as f64 * var))
                } else {
                    Ok(1.0)
                }
            }
        }
    }

    /// Out-of-fold decision values for Platt calibration.
    fn cross_validated_decisions(&self, kernel: &KernelMatrix, y: &[usize]) -> Result<Vec<f64>> {
        let n = y.len();
        let folds = StratifiedKFold::new(self.probability_folds.min(n)).with_random_state(self.seed);
        let mut decisions = vec![0.0; n];

        for (train, test) in folds.split(y)? {
            let y_train: Vec<f64> = train.iter().map(|&i| sign(y[i])).collect();
            let has_pos = y_train.iter().any(|&v| v > 0.0);
            let has_neg = y_train.iter().any(|&v| v < 0.0);

            if !(has_pos && has_neg) {
                let constant = if has_pos { 1.0 } else { -1.0 };
                for &t in &test {
                    decisions[t] = constant;
                }
                continue;
            }

            let sub = kernel.subset(&train);
            let (alpha, rho) = solve_smo(&sub, &y_train, self.c, self.tol, self.max_iter);
            for &t in &test {
                let mut f = -rho;
                for (k, &s) in train.iter().enumerate() {
                    if alpha[k] > 0.0 {
                        f += alpha[k] * y_train[k] * kernel.get(t, s);
                    }
                }
                decisions[t] = f;
            }
        }

        Ok(decisions)
    }
}

impl Classifier for SVC {
    fn fit(&mut self, x: &Matrix<f32>, y: &[usize]) -> Result<()> {
        check_training_data(x, y)?;
        if !(y.contains(&0) && y.contains(&1)) {
            return Err("Need at least 2 classes".into());
        }
        if self.c <= 0.0 {
            return Err(BeneishError::InvalidHyperparameter {
                param: "C".to_string(),
                value: self.c.to_string(),
                constraint: "> 0".to_string(),
            });
        }

        let gamma = self.resolve_gamma(x)?;
        let kernel = KernelMatrix::new(x, gamma);

        let decisions = self.cross_validated_decisions(&kernel, y)?;
        let (platt_a, platt_b) = fit_platt(&decisions, y);

        let signs: Vec<f64> = y.iter().map(|&l| sign(l)).collect();
        let (alpha, rho) = solve_smo(&kernel, &signs, self.c, self.tol, self.max_iter);

        let support: Vec<usize> = (0..alpha.len()).filter(|&i| alpha[i] > 0.0).collect();
        let dual_coef = support.iter().map(|&i| alpha[i] * signs[i]).collect();

        tracing::debug!(
            n_support = support.len(),
            gamma,
            rho,
            platt_a,
            platt_b,
            "SVC fitted"
        );

        self.fitted = Some(FittedSvc {
            support_vectors: x.select_rows(&support),
            dual_coef,
            rho,
            gamma,
            platt_a,
            platt_b,
        });
        Ok(())
    }

    fn predict_proba(&self, x: &Matrix<f32>) -> Result<Vec<f32>> {
        let model = self.fitted.as_ref().ok_or("Model not fitted")?;
        Ok(self
            .decision_function(x)?
            .into_iter()
            .map(|f| platt_probability(f, model.platt_a, model.platt_b) as f32)
            .collect())
    }

    fn predict(&self, x: &Matrix<f32>) -> Result<Vec<usize>> {
        Ok(self
            .decision_function(x)?
            .into_iter()
            .map(|f| usize::from(f > 0.0))
            .collect())
    }
}

fn sign(label: usize) -> f64 {
    if label == 1 {
        1.0
    } else {
        -1.0
    }
}

fn rbf(a: &[f32], b: &[f32], gamma: f64) -> f64 {
    let sq: f64 = a
        .iter()
        .zip(b)
        .map(|(&p, &q)| {
            let d = f64::from(p) - f64::from(q);
            d * d
        })
        .sum();
    (-gamma * sq).exp()
}

/// Dense symmetric Gram matrix.
struct KernelMatrix {
    n: usize,
    values: Vec<f64>,
}

impl KernelMatrix {
    fn new(x: &Matrix<f32>, gamma: f64) -> Self {
        let n = x.n_rows();
        let mut values = vec![0.0; n * n];
        for i in 0..n {
            values[i * n + i] = 1.0;
            for j in (i + 1)..n {
                let k = rbf(x.row_slice(i), x.row_slice(j), gamma);
                values[i * n + j] = k;
                values[j * n + i] = k;
            }
        }
        Self { n, values }
    }

    fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.n + j]
    }

    fn subset(&self, idx: &[usize]) -> Self {
        let m = idx.len();
        let mut values = Vec::with_capacity(m * m);
        for &i in idx {
            for &j in idx {
                values.push(self.get(i, j));
            }
        }
        Self { n: m, values }
    }
}

/// Solves `min ½αᵀQα − eᵀα` s.t. `0 ≤ α ≤ C`, `yᵀα = 0` with
/// `Q_ij = y_i y_j K_ij`. Returns `(alpha, rho)`; the decision function is
/// `Σ α_i y_i K(x_i, x) − rho`.
fn solve_smo(kernel: &KernelMatrix, y: &[f64], c: f64, tol: f64, max_iter: usize) -> (Vec<f64>, f64) {
    let n = y.len();
    let q = |i: usize, j: usize| y[i] * y[j] * kernel.get(i, j);

    let mut alpha = vec![0.0; n];
    let mut grad = vec![-1.0; n];

    let is_upper = |a: f64| a >= c;
    let is_lower = |a: f64| a <= 0.0;

    let mut iter = 0;
    loop {
        // Pick i: maximal violating index in I_up.
        let mut g_max = f64::NEG_INFINITY;
        let mut i_sel = None;
        for t in 0..n {
            let in_up = if y[t] > 0.0 { !is_upper(alpha[t]) } else { !is_lower(alpha[t]) };
            if in_up && -y[t] * grad[t] >= g_max {
                g_max = -y[t] * grad[t];
                i_sel = Some(t);
            }
        }

        // Pick j: best second-order gain in I_low.
        let mut g_max2 = f64::NEG_INFINITY;
        let mut j_sel = None;
        let mut obj_diff_min = f64::INFINITY;
        if let Some(i) = i_sel {
            for t in 0..n {
                let in_low = if y[t] > 0.0 { !is_lower(alpha[t]) } else { !is_upper(alpha[t]) };
                if !in_low {
                    continue;
                }
                let yg = y[t] * grad[t];
                g_max2 = g_max2.max(yg);
                let grad_diff = g_max + yg;
                if grad_diff > 0.0 {
                    let quad = kernel.get(i, i) + kernel.get(t, t) - 2.0 * kernel.get(i, t);
                    let quad = if quad > 0.0 { quad } else { TAU };
                    let obj_diff = -(grad_diff * grad_diff) / quad;
                    if obj_diff <= obj_diff_min {
                        obj_diff_min = obj_diff;
                        j_sel = Some(t);
                    }
                }
            }
        }

        let (i, j) = match (i_sel, j_sel) {
            (Some(i), Some(j)) if g_max + g_max2 >= tol => (i, j),
            _ => break,
        };

        iter += 1;
        if iter > max_iter {
            tracing::warn!(max_iter, "SMO stopped before reaching tolerance");
            break;
        }

        let old_ai = alpha[i];
        let old_aj = alpha[j];

        if y[i] != y[j] {
            let quad = kernel.get(i, i) + kernel.get(j, j) + 2.0 * q(i, j);
            let quad = if quad > 0.0 { quad } else { TAU };
            let delta = (-grad[i] - grad[j]) / quad;
            let diff = alpha[i] - alpha[j];
            alpha[i] += delta;
            alpha[j] += delta;
            if diff > 0.0 {
                if alpha[j] < 0.0 {
                    alpha[j] = 0.0;
                    alpha[i] = diff;
                }
            } else if alpha[i] < 0.0 {
                alpha[i] = 0.0;
                alpha[j] = -diff;
            }
            if diff > 0.0 {
                if alpha[i] > c {
                    alpha[i] = c;
                    alpha[j] = c - diff;
                }
            } else if alpha[j] > c {
                alpha[j] = c;
                alpha[i] = c + diff;
            }
        } else {
            let quad = kernel.get(i, i) + kernel.get(j, j) - 2.0 * q(i, j);
            let quad = if quad > 0.0 { quad } else { TAU };
            let delta = (grad[i] - grad[j]) / quad;
            let sum = alpha[i] + alpha[j];
            alpha[i] -= delta;
            alpha[j] += delta;
            if sum > c {
                if alpha[i] > c {
                    alpha[i] = c;
                    alpha[j] = sum - c;
                }
            } else if alpha[j] < 0.0 {
                alpha[j] = 0.0;
                alpha[i] = sum;
            }
            if sum > c {
                if alpha[j] > c {
                    alpha[j] = c;
                    alpha[i] = sum - c;
                }
            } else if alpha[i] < 0.0 {
                alpha[i] = 0.0;
                alpha[j] = sum;
            }
        }

        let d_ai = alpha[i] - old_ai;
        let d_aj = alpha[j] - old_aj;
        for (t, g) in grad.iter_mut().enumerate() {
            *g += q(t, i) * d_ai + q(t, j) * d_aj;
        }
    }

    // rho from free vectors, else the midpoint of the feasible interval.
    let mut ub = f64::INFINITY;
    let mut lb = f64::NEG_INFINITY;
    let mut n_free = 0usize;
    let mut sum_free = 0.0;
    for t in 0..n {
        let yg = y[t] * grad[t];
        if is_upper(alpha[t]) {
            if y[t] < 0.0 {
                ub = ub.min(yg);
            } else {
                lb = lb.max(yg);
            }
        } else if is_lower(alpha[t]) {
            if y[t] > 0.0 {
                ub = ub.min(yg);
            } else {
                lb = lb.max(yg);
            }
        } else {
            n_free += 1;
            sum_free += yg;
        }
    }
    let rho = if n_free > 0 {
        sum_free / n_free as f64
    } else {
        (ub + lb) / 2.0
    };

    (alpha, rho)
}

fn platt_probability(decision: f64, a: f64, b: f64) -> f64 {
    let f_apb = decision * a + b;
    if f_apb >= 0.0 {
        (-f_apb).exp() / (1.0 + (-f_apb).exp())
    } else {
        1.0 / (1.0 + f_apb.exp())
    }
}

/// Newton fit of the Platt sigmoid with backtracking line search.
fn fit_platt(decisions: &[f64], y: &[usize]) -> (f64, f64) {
    const MAX_ITER: usize = 100;
    const MIN_STEP: f64 = 1e-10;
    const SIGMA: f64 = 1e-12;
    const EPS: f64 = 1e-5;

    let prior1 = y.iter().filter(|&&l| l == 1).count() as f64;
    let prior0 = y.len() as f64 - prior1;
    let hi_target = (prior1 + 1.0) / (prior1 + 2.0);
    let lo_target = 1.0 / (prior0 + 2.0);
    let targets: Vec<f64> = y
        .iter()
        .map(|&l| if l == 1 { hi_target } else { lo_target })
        .collect();

    let objective = |a: f64, b: f64| -> f64 {
        decisions
            .iter()
            .zip(&targets)
            .map(|(&d, &t)| {
                let f_apb = d * a + b;
                if f_apb >= 0.0 {
                    t * f_apb + (-f_apb).exp().ln_1p()
                } else {
                    (t - 1.0) * f_apb + f_apb.exp().ln_1p()
                }
            })
            .sum()
    };

    let mut a = 0.0;
    let mut b = ((prior0 + 1.0) / (prior1 + 1.0)).ln();
    let mut fval = objective(a, b);

    for _ in 0..MAX_ITER {
        let (mut h11, mut h22, mut h21, mut g1, mut g2) = (SIGMA, SIGMA, 0.0, 0.0, 0.0);
        for (&d, &t) in decisions.iter().zip(&targets) {
            let p = platt_probability(d, a, b);
            let q = 1.0 - p;
            let d2 = p * q;
            h11 += d * d * d2;
            h22 += d2;
            h21 += d * d2;
            let d1 = t - p;
            g1 += d * d1;
            g2 += d1;
        }

        if g1.abs() < EPS && g2.abs() < EPS {
            break;
        }

        let det = h11 * h22 - h21 * h21;
        let da = -(h22 * g1 - h21 * g2) / det;
        let db = -(-h21 * g1 + h11 * g2) / det;
        let gd = g1 * da + g2 * db;

        let mut step = 1.0;
        while step >= MIN_STEP {
            let new_a = a + step * da;
            let new_b = b + step * db;
            let new_f = objective(new_a, new_b);
            if new_f < fval + 1e-4 * step * gd {
                a = new_a;
                b = new_b;
                fval = new_f;
                break;
            }
            step /= 2.0;
        }

        if step < MIN_STEP {
            break;
        }
    }

    (a, b)
}
