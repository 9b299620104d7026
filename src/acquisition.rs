//! Acquisition functions: scoring candidate points under a fitted surrogate.
//!
//! Fitting an [`Acquisition`] on the normalized archive and a fitted model
//! yields an [`AcquisitionScorer`]. Scores are always **to be minimized**,
//! one column per objective, so the solver treats the scored problem as an
//! ordinary multi-objective minimization.
//!
//! | Kind | Score per objective |
//! |------|---------------------|
//! | `identity` | posterior mean |
//! | `ei` | `-EI(x)` against the best observed value |
//! | `pi` | `-PI(x)` against the best observed value |
//! | `ucb` | `mean - β·std` (lower confidence bound) |

use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, FitStage, Result};
use crate::registry::AcquisitionKind;
use crate::surrogate::SurrogateModel;

/// A fitted acquisition function.
pub trait AcquisitionScorer: Send + Sync {
    /// Score each row of `x`. Lower is better.
    fn evaluate(&self, x: &[Vec<f64>]) -> Vec<Vec<f64>>;
}

/// An acquisition function that can be fitted on data and a surrogate.
pub trait Acquisition: Send + Sync {
    /// Short name used in descriptions and logs.
    fn name(&self) -> &'static str;

    /// Fit on normalized data `(x, y)` with the fitted `model`.
    ///
    /// # Errors
    ///
    /// Returns an acquisition [`Error::Fit`] if the data is empty or does
    /// not match the model.
    fn fit(
        &self,
        x: &[Vec<f64>],
        y: &[Vec<f64>],
        model: Arc<dyn SurrogateModel>,
    ) -> Result<Box<dyn AcquisitionScorer>>;
}

/// The built-in acquisition functions.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum AcquisitionConfig {
    /// The posterior mean itself.
    Identity,
    /// Negated expected improvement.
    Ei,
    /// Negated probability of improvement.
    Pi,
    /// Lower confidence bound `mean - beta * std`.
    Ucb {
        /// Exploration weight on the predictive standard deviation.
        beta: f64,
    },
}

impl AcquisitionConfig {
    /// The registry kind of this configuration.
    #[must_use]
    pub fn kind(&self) -> AcquisitionKind {
        match self {
            Self::Identity => AcquisitionKind::Identity,
            Self::Ei => AcquisitionKind::Ei,
            Self::Pi => AcquisitionKind::Pi,
            Self::Ucb { .. } => AcquisitionKind::Ucb,
        }
    }

    /// Instantiate the acquisition function.
    #[must_use]
    pub fn build(&self) -> Box<dyn Acquisition> {
        Box::new(*self)
    }
}

impl Acquisition for AcquisitionConfig {
    fn name(&self) -> &'static str {
        self.kind().name()
    }

    fn fit(
        &self,
        x: &[Vec<f64>],
        y: &[Vec<f64>],
        model: Arc<dyn SurrogateModel>,
    ) -> Result<Box<dyn AcquisitionScorer>> {
        if x.is_empty() || y.is_empty() {
            return Err(Error::fit(FitStage::Acquisition, "no samples to fit on"));
        }
        if y.iter().any(|r| r.len() != model.n_obj()) {
            return Err(Error::fit(
                FitStage::Acquisition,
                format!("model predicts {} objectives", model.n_obj()),
            ));
        }

        let best: Vec<f64> = (0..model.n_obj())
            .map(|j| y.iter().map(|r| r[j]).fold(f64::INFINITY, f64::min))
            .collect();

        Ok(Box::new(Scorer {
            rule: *self,
            model,
            best,
        }))
    }
}

struct Scorer {
    rule: AcquisitionConfig,
    model: Arc<dyn SurrogateModel>,
    /// Best (lowest) normalized value per objective.
    best: Vec<f64>,
}

impl AcquisitionScorer for Scorer {
    fn evaluate(&self, x: &[Vec<f64>]) -> Vec<Vec<f64>> {
        let pred = self.model.predict(x);
        pred.mean
            .iter()
            .zip(&pred.std)
            .map(|(mean, std)| {
                mean.iter()
                    .zip(std)
                    .zip(&self.best)
                    .map(|((&m, &s), &f_best)| match self.rule {
                        AcquisitionConfig::Identity => m,
                        AcquisitionConfig::Ei => -expected_improvement(m, s, f_best),
                        AcquisitionConfig::Pi => -probability_of_improvement(m, s, f_best),
                        AcquisitionConfig::Ucb { beta } => m - beta * s,
                    })
                    .collect()
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Normal distribution helpers (Abramowitz-Stegun approximation)
// ---------------------------------------------------------------------------

/// Standard normal PDF.
fn norm_pdf(x: f64) -> f64 {
    const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;
    INV_SQRT_2PI * (-0.5 * x * x).exp()
}

/// Standard normal CDF (Abramowitz-Stegun rational approximation).
fn norm_cdf(x: f64) -> f64 {
    if x < -8.0 {
        return 0.0;
    }
    if x > 8.0 {
        return 1.0;
    }

    let abs_x = x.abs();
    let t = 1.0 / (1.0 + 0.231_641_9 * abs_x);
    let poly = t
        * (0.319_381_530
            + t * (-0.356_563_782 + t * (1.781_477_937 + t * (-1.821_255_978 + t * 1.330_274_429))));
    let cdf = 1.0 - norm_pdf(abs_x) * poly;

    if x >= 0.0 { cdf } else { 1.0 - cdf }
}

/// `EI(x) = (f_best - mean) Φ(z) + std φ(z)` where `z = (f_best - mean) / std`.
fn expected_improvement(mean: f64, std: f64, f_best: f64) -> f64 {
    if std < 1e-12 {
        return (f_best - mean).max(0.0);
    }
    let z = (f_best - mean) / std;
    ((f_best - mean) * norm_cdf(z) + std * norm_pdf(z)).max(0.0)
}

/// `PI(x) = Φ((f_best - mean) / std)`.
fn probability_of_improvement(mean: f64, std: f64, f_best: f64) -> f64 {
    if std < 1e-12 {
        return if mean < f_best { 1.0 } else { 0.0 };
    }
    norm_cdf((f_best - mean) / std)
}
