//! Gaussian process surrogate.
//!
//! Each objective gets an independent GP with a **Matérn 5/2 kernel** and
//! ARD lengthscales. The lengthscales depend only on the inputs, so the
//! kernel matrix and its Cholesky factor are shared by all objectives; only
//! the standardized targets and the weight vector `α` differ per objective.
//!
//! # Configuration
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `noise_variance` | 1e-6 | Observation noise added to the kernel diagonal |
//! | `max_train_points` | 100 | Most recent samples used for fitting |

use std::sync::Arc;

use nalgebra::{DMatrix, DVector};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{
    Prediction, Surrogate, SurrogateModel, ard_lengthscales, check_training, column, most_recent,
    standardize,
};
use crate::error::{Error, FitStage, Result};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Configuration of the [`Gp`] surrogate.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GpConfig {
    /// Observation noise variance added to the kernel diagonal.
    pub noise_variance: f64,
    /// Maximum number of (most recent) samples used for fitting.
    pub max_train_points: usize,
}

impl Default for GpConfig {
    fn default() -> Self {
        Self {
            noise_variance: DEFAULT_NOISE_VAR,
            max_train_points: MAX_TRAIN_POINTS,
        }
    }
}

impl GpConfig {
    /// Sets the observation noise variance.
    ///
    /// Larger values make the GP smoother. Default: 1e-6.
    #[must_use]
    pub fn noise_variance(mut self, v: f64) -> Self {
        self.noise_variance = v;
        self
    }

    /// Caps the number of training samples to keep the O(n³) fit bounded.
    ///
    /// Default: 100.
    #[must_use]
    pub fn max_train_points(mut self, n: usize) -> Self {
        self.max_train_points = n;
        self
    }
}

/// Independent Gaussian processes, one per objective.
#[derive(Clone, Debug, Default)]
pub struct Gp {
    config: GpConfig,
}

impl Gp {
    /// Creates a GP surrogate with the given configuration.
    #[must_use]
    pub fn new(config: GpConfig) -> Self {
        Self { config }
    }
}

impl Surrogate for Gp {
    fn name(&self) -> &'static str {
        "gp"
    }

    fn fit(&self, x: &[Vec<f64>], y: &[Vec<f64>]) -> Result<Arc<dyn SurrogateModel>> {
        check_training(x, y)?;
        let (x, y) = most_recent(x, y, self.config.max_train_points);
        let model = fit_gp(x, y, self.config.noise_variance)?;
        Ok(Arc::new(model))
    }
}

// ---------------------------------------------------------------------------
// Internal types
// ---------------------------------------------------------------------------

/// Default observation noise variance.
const DEFAULT_NOISE_VAR: f64 = 1e-6;
/// Default cap on training points.
const MAX_TRAIN_POINTS: usize = 100;
/// Jitter escalation steps tried when the kernel matrix is not positive definite.
const JITTER_STEPS: usize = 6;
/// √5.
const SQRT_5: f64 = 2.236_067_977_499_79;

/// Per-objective part of a fitted GP.
struct ObjectiveFit {
    /// α = (K + σ²I)^{-1} y, with `y` standardized.
    alpha: DVector<f64>,
    y_mean: f64,
    y_std: f64,
}

/// A fitted multi-output GP.
pub(crate) struct GpModel {
    /// Cholesky factor of K + σ²I.
    cholesky: nalgebra::linalg::Cholesky<f64, nalgebra::Dyn>,
    x_train: Vec<Vec<f64>>,
    lengthscales: Vec<f64>,
    signal_var: f64,
    objectives: Vec<ObjectiveFit>,
}

impl SurrogateModel for GpModel {
    fn n_obj(&self) -> usize {
        self.objectives.len()
    }

    fn predict(&self, x: &[Vec<f64>]) -> Prediction {
        let mut mean = Vec::with_capacity(x.len());
        let mut std = Vec::with_capacity(x.len());

        for xi in x {
            let k_star = kernel_vector(xi, &self.x_train, &self.lengthscales, self.signal_var);

            // Variance: k(x*, x*) - k*^T (K + σ²I)^{-1} k*
            let v = self.cholesky.solve(&k_star);
            let sd = (self.signal_var - k_star.dot(&v)).max(0.0).sqrt();

            mean.push(
                self.objectives
                    .iter()
                    .map(|o| k_star.dot(&o.alpha) * o.y_std + o.y_mean)
                    .collect(),
            );
            std.push(self.objectives.iter().map(|o| sd * o.y_std).collect());
        }

        Prediction { mean, std }
    }
}

// ---------------------------------------------------------------------------
// Matérn 5/2 kernel
// ---------------------------------------------------------------------------

/// Matérn 5/2 kernel with ARD lengthscales.
///
/// `k(x1, x2) = σ² (1 + √5 r + 5/3 r²) exp(-√5 r)`
/// where `r = sqrt(Σ ((x1_i - x2_i) / l_i)²)`
fn matern52(x1: &[f64], x2: &[f64], lengthscales: &[f64], signal_var: f64) -> f64 {
    let r_sq: f64 = x1
        .iter()
        .zip(x2)
        .zip(lengthscales)
        .map(|((&a, &b), &l)| ((a - b) / l).powi(2))
        .sum();
    let sqrt5_r = SQRT_5 * r_sq.sqrt();
    signal_var * (1.0 + sqrt5_r + 5.0 / 3.0 * r_sq) * (-sqrt5_r).exp()
}

/// Build the kernel matrix `K + σ²I`.
fn kernel_matrix(
    x: &[Vec<f64>],
    lengthscales: &[f64],
    signal_var: f64,
    noise_var: f64,
) -> DMatrix<f64> {
    let n = x.len();
    DMatrix::from_fn(n, n, |i, j| {
        let k = matern52(&x[i], &x[j], lengthscales, signal_var);
        if i == j { k + noise_var } else { k }
    })
}

/// Compute the kernel vector k(x*, X) for a test point.
fn kernel_vector(
    x_star: &[f64],
    x_train: &[Vec<f64>],
    lengthscales: &[f64],
    signal_var: f64,
) -> DVector<f64> {
    DVector::from_fn(x_train.len(), |i, _| {
        matern52(x_star, &x_train[i], lengthscales, signal_var)
    })
}

// ---------------------------------------------------------------------------
// Fitting
// ---------------------------------------------------------------------------

fn fit_gp(x_train: &[Vec<f64>], y_train: &[Vec<f64>], noise_var: f64) -> Result<GpModel> {
    let n_var = x_train[0].len();
    let n_obj = y_train[0].len();
    let lengthscales = ard_lengthscales(x_train, n_var);
    // Targets are standardized, so the signal variance is 1.
    let signal_var = 1.0;

    let mut jitter = noise_var.max(0.0);
    let mut cholesky = None;
    for _ in 0..JITTER_STEPS {
        let k = kernel_matrix(x_train, &lengthscales, signal_var, jitter);
        if let Some(c) = nalgebra::linalg::Cholesky::new(k) {
            cholesky = Some(c);
            break;
        }
        jitter = (jitter * 10.0).max(1e-8);
    }
    let cholesky = cholesky.ok_or_else(|| {
        Error::fit(
            FitStage::Surrogate,
            "kernel matrix is not positive definite",
        )
    })?;

    let objectives = (0..n_obj)
        .map(|j| {
            let col = column(y_train, j);
            let (y_mean, y_std) = standardize(&col);
            let y_vec = DVector::from_iterator(col.len(), col.iter().map(|&v| (v - y_mean) / y_std));
            ObjectiveFit {
                alpha: cholesky.solve(&y_vec),
                y_mean,
                y_std,
            }
        })
        .collect();

    trace_debug!(n_train = x_train.len(), n_obj, jitter, "gp fitted");

    Ok(GpModel {
        cholesky,
        x_train: x_train.to_vec(),
        lengthscales,
        signal_var,
        objectives,
    })
}
