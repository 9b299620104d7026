//! Thompson sampling surrogate over random Fourier features.
//!
//! The squared-exponential kernel is approximated with `M` random Fourier
//! features `φ(x) = sqrt(2/M) cos(Wx + b)`, turning GP regression into
//! Bayesian linear regression on `φ`. Fitting draws one weight vector per
//! objective from the posterior; the fitted model then predicts that sampled
//! function deterministically, so every solver call within an iteration
//! optimizes the same draw.

use std::sync::Arc;

use nalgebra::{DMatrix, DVector};
use parking_lot::Mutex;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{
    Prediction, Surrogate, SurrogateModel, ard_lengthscales, check_training, column, most_recent,
    standardize,
};
use crate::error::{Error, FitStage, Result};
use crate::rng_util;

/// Configuration of the [`ThompsonSampling`] surrogate.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ThompsonSamplingConfig {
    /// Number of random Fourier features.
    pub n_features: usize,
    /// Observation noise variance.
    pub noise_variance: f64,
    /// Maximum number of (most recent) samples used for fitting.
    pub max_train_points: usize,
}

impl Default for ThompsonSamplingConfig {
    fn default() -> Self {
        Self {
            n_features: 200,
            noise_variance: 1e-4,
            max_train_points: 200,
        }
    }
}

impl ThompsonSamplingConfig {
    /// Sets the number of random Fourier features. Default: 200.
    #[must_use]
    pub fn n_features(mut self, n: usize) -> Self {
        self.n_features = n;
        self
    }

    /// Sets the observation noise variance. Default: 1e-4.
    #[must_use]
    pub fn noise_variance(mut self, v: f64) -> Self {
        self.noise_variance = v;
        self
    }

    /// Caps the number of training samples. Default: 200.
    #[must_use]
    pub fn max_train_points(mut self, n: usize) -> Self {
        self.max_train_points = n;
        self
    }
}

/// Thompson sampling surrogate: each fit draws a fresh posterior sample.
pub struct ThompsonSampling {
    config: ThompsonSamplingConfig,
    rng: Mutex<fastrand::Rng>,
}

impl ThompsonSampling {
    /// Creates the surrogate. With a seed, the sequence of draws is
    /// reproducible.
    #[must_use]
    pub fn new(config: ThompsonSamplingConfig, seed: Option<u64>) -> Self {
        Self {
            config,
            rng: Mutex::new(seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed)),
        }
    }
}

impl Surrogate for ThompsonSampling {
    fn name(&self) -> &'static str {
        "ts"
    }

    #[allow(clippy::cast_precision_loss)]
    fn fit(&self, x: &[Vec<f64>], y: &[Vec<f64>]) -> Result<Arc<dyn SurrogateModel>> {
        let (n_var, n_obj) = check_training(x, y)?;
        let (x, y) = most_recent(x, y, self.config.max_train_points);
        let m = self.config.n_features.max(1);
        let noise = self.config.noise_variance.max(1e-10);
        let lengthscales = ard_lengthscales(x, n_var);

        let mut rng = self.rng.lock();

        // w ~ N(0, 1/l²) per dimension, b ~ U(0, 2π).
        let frequencies: Vec<Vec<f64>> = (0..m)
            .map(|_| {
                lengthscales
                    .iter()
                    .map(|&l| rng_util::standard_normal(&mut rng) / l)
                    .collect()
            })
            .collect();
        let phases: Vec<f64> = (0..m)
            .map(|_| rng_util::f64_range(&mut rng, 0.0, core::f64::consts::TAU))
            .collect();
        let features = FourierFeatures {
            frequencies,
            phases,
            scale: (2.0 / m as f64).sqrt(),
        };

        // Posterior precision A = ΦᵀΦ / σ² + I (unit prior on the weights).
        let phi = DMatrix::from_fn(x.len(), m, |i, k| features.eval(&x[i], k));
        let mut precision = phi.transpose() * &phi / noise;
        for k in 0..m {
            precision[(k, k)] += 1.0;
        }
        let cholesky = nalgebra::linalg::Cholesky::new(precision).ok_or_else(|| {
            Error::fit(
                FitStage::Surrogate,
                "feature posterior is not positive definite",
            )
        })?;
        let l_t = cholesky.l().transpose();

        let mut objectives = Vec::with_capacity(n_obj);
        for j in 0..n_obj {
            let col = column(y, j);
            let (y_mean, y_std) = standardize(&col);
            let y_vec = DVector::from_iterator(col.len(), col.iter().map(|&v| (v - y_mean) / y_std));

            // θ ~ N(A⁻¹Φᵀy/σ², A⁻¹): mean plus L⁻ᵀz.
            let theta_mean = cholesky.solve(&(phi.transpose() * y_vec / noise));
            let z = DVector::from_fn(m, |_, _| rng_util::standard_normal(&mut rng));
            let offset = l_t.solve_upper_triangular(&z).ok_or_else(|| {
                Error::fit(FitStage::Surrogate, "singular feature posterior factor")
            })?;

            objectives.push(SampledObjective {
                theta: theta_mean + offset,
                y_mean,
                y_std,
            });
        }

        trace_debug!(n_train = x.len(), n_features = m, n_obj, "thompson sample drawn");

        Ok(Arc::new(ThompsonModel {
            features,
            cholesky,
            objectives,
        }))
    }
}

struct FourierFeatures {
    frequencies: Vec<Vec<f64>>,
    phases: Vec<f64>,
    scale: f64,
}

impl FourierFeatures {
    fn eval(&self, x: &[f64], k: usize) -> f64 {
        let proj: f64 = self.frequencies[k].iter().zip(x).map(|(w, v)| w * v).sum();
        self.scale * (proj + self.phases[k]).cos()
    }

    fn vector(&self, x: &[f64]) -> DVector<f64> {
        DVector::from_fn(self.phases.len(), |k, _| self.eval(x, k))
    }
}

struct SampledObjective {
    theta: DVector<f64>,
    y_mean: f64,
    y_std: f64,
}

struct ThompsonModel {
    features: FourierFeatures,
    cholesky: nalgebra::linalg::Cholesky<f64, nalgebra::Dyn>,
    objectives: Vec<SampledObjective>,
}

impl SurrogateModel for ThompsonModel {
    fn n_obj(&self) -> usize {
        self.objectives.len()
    }

    fn predict(&self, x: &[Vec<f64>]) -> Prediction {
        let mut mean = Vec::with_capacity(x.len());
        let mut std = Vec::with_capacity(x.len());
        for xi in x {
            let phi = self.features.vector(xi);
            // Predictive std of the weight posterior: sqrt(φᵀA⁻¹φ).
            let sd = phi.dot(&self.cholesky.solve(&phi)).max(0.0).sqrt();
            mean.push(
                self.objectives
                    .iter()
                    .map(|o| phi.dot(&o.theta) * o.y_std + o.y_mean)
                    .collect(),
            );
            std.push(self.objectives.iter().map(|o| sd * o.y_std).collect());
        }
        Prediction { mean, std }
    }
}
