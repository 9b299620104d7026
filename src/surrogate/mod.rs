//! Statistical surrogates of the expensive objectives.
//!
//! A [`Surrogate`] is a fitting procedure. Fitting it on the normalized
//! archive produces an immutable [`SurrogateModel`] shared behind an
//! [`Arc`], so the acquisition scorer and the selection stage can both hold
//! the same fitted model without any shared mutable state.
//!
//! | Kind | Type | Model |
//! |------|------|-------|
//! | `gp` | [`Gp`] | Independent Matérn 5/2 GP per objective |
//! | `ts` | [`ThompsonSampling`] | One random-Fourier-feature posterior draw per objective |

mod gp;
mod thompson;

use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use self::gp::{Gp, GpConfig};
pub use self::thompson::{ThompsonSampling, ThompsonSamplingConfig};
use crate::error::{Error, FitStage, Result};
use crate::registry::SurrogateKind;

/// Posterior predictions for a batch of points.
///
/// `mean[i][j]` and `std[i][j]` refer to point `i`, objective `j`.
#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
    /// Predicted objective values.
    pub mean: Vec<Vec<f64>>,
    /// Predictive standard deviations.
    pub std: Vec<Vec<f64>>,
}

/// A fitted surrogate, ready for predictions.
pub trait SurrogateModel: Send + Sync {
    /// Number of objectives the model predicts.
    fn n_obj(&self) -> usize;

    /// Predict mean and standard deviation at each row of `x`.
    fn predict(&self, x: &[Vec<f64>]) -> Prediction;
}

/// A surrogate fitting procedure.
pub trait Surrogate: Send + Sync {
    /// Short name used in descriptions and logs.
    fn name(&self) -> &'static str;

    /// Fit a model on normalized decision vectors `x` and objectives `y`.
    ///
    /// # Errors
    ///
    /// Returns a surrogate [`Error::Fit`] if the data is unusable or a
    /// numerical decomposition fails.
    fn fit(&self, x: &[Vec<f64>], y: &[Vec<f64>]) -> Result<Arc<dyn SurrogateModel>>;
}

/// Typed configuration of the built-in surrogates.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum SurrogateConfig {
    /// Gaussian process regression.
    Gp(GpConfig),
    /// Thompson sampling over random Fourier features.
    #[cfg_attr(feature = "serde", serde(rename = "ts", alias = "thompson_sampling"))]
    ThompsonSampling(ThompsonSamplingConfig),
}

impl SurrogateConfig {
    /// The registry kind of this configuration.
    #[must_use]
    pub fn kind(&self) -> SurrogateKind {
        match self {
            Self::Gp(_) => SurrogateKind::Gp,
            Self::ThompsonSampling(_) => SurrogateKind::ThompsonSampling,
        }
    }

    /// Instantiate the surrogate. `seed` drives any internal randomness.
    #[must_use]
    pub fn build(&self, seed: Option<u64>) -> Box<dyn Surrogate> {
        match self {
            Self::Gp(config) => Box::new(Gp::new(config.clone())),
            Self::ThompsonSampling(config) => {
                Box::new(ThompsonSampling::new(config.clone(), seed))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Validate training data and return `(n_var, n_obj)`.
fn check_training(x: &[Vec<f64>], y: &[Vec<f64>]) -> Result<(usize, usize)> {
    if x.is_empty() {
        return Err(Error::fit(FitStage::Surrogate, "no training samples"));
    }
    if x.len() != y.len() {
        return Err(Error::fit(
            FitStage::Surrogate,
            format!("{} inputs but {} targets", x.len(), y.len()),
        ));
    }
    let n_var = x[0].len();
    let n_obj = y[0].len();
    if x.iter().any(|r| r.len() != n_var) || y.iter().any(|r| r.len() != n_obj) {
        return Err(Error::fit(FitStage::Surrogate, "ragged training data"));
    }
    if x.iter().chain(y).flatten().any(|v| !v.is_finite()) {
        return Err(Error::fit(
            FitStage::Surrogate,
            "training data contains non-finite values",
        ));
    }
    Ok((n_var, n_obj))
}

/// ARD lengthscales: per-dimension standard deviation of the inputs,
/// clamped from below.
#[allow(clippy::cast_precision_loss)]
fn ard_lengthscales(x: &[Vec<f64>], n_var: usize) -> Vec<f64> {
    let n = x.len() as f64;
    (0..n_var)
        .map(|j| {
            let mean = x.iter().map(|r| r[j]).sum::<f64>() / n;
            let var = x.iter().map(|r| (r[j] - mean).powi(2)).sum::<f64>() / n;
            var.sqrt().max(0.01)
        })
        .collect()
}

/// Mean and standard deviation used to standardize one objective column.
#[allow(clippy::cast_precision_loss)]
fn standardize(column: &[f64]) -> (f64, f64) {
    let n = column.len();
    let mean = column.iter().sum::<f64>() / n as f64;
    let var = if n > 1 {
        column.iter().map(|&v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64
    } else {
        1.0
    };
    (mean, var.sqrt().max(1e-10))
}

/// The `j`-th column of a row-major matrix.
fn column(rows: &[Vec<f64>], j: usize) -> Vec<f64> {
    rows.iter().map(|r| r[j]).collect()
}

/// Keep only the most recent `cap` rows.
fn most_recent<'a>(
    x: &'a [Vec<f64>],
    y: &'a [Vec<f64>],
    cap: usize,
) -> (&'a [Vec<f64>], &'a [Vec<f64>]) {
    let start = x.len().saturating_sub(cap.max(1));
    (&x[start..], &y[start..])
}
