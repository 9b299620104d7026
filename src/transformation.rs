//! Normalization between real-world and model-friendly scales.
//!
//! A [`Transformation`] is a configuration; fitting it on the current
//! archive yields a [`FittedTransform`], an immutable value that maps
//! decision and objective vectors in both directions.
//!
//! | Variant | Decision vectors | Objective vectors |
//! |---------|------------------|-------------------|
//! | [`Standard`](Transformation::Standard) (default) | bounds → `[0, 1]` | zero mean, unit variance per objective |
//! | [`Identity`](Transformation::Identity) | unchanged | unchanged |

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, FitStage, Result};
use crate::types::Bounds;

/// Minimum objective standard deviation before the scale falls back to 1.
const MIN_STD: f64 = 1e-12;

/// How decision and objective values are normalized before modeling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Transformation {
    /// Map decision vectors to the unit box and standardize objectives.
    #[default]
    Standard,
    /// Leave values untouched.
    Identity,
}

impl Transformation {
    /// Short name used in descriptions.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Identity => "identity",
        }
    }

    /// Fit the transformation on the full archive.
    ///
    /// # Errors
    ///
    /// Returns a transformation [`Error::Fit`] if the data is empty, has
    /// rows of the wrong width, or contains non-finite objective values.
    pub fn fit(self, bounds: &Bounds, x: &[Vec<f64>], y: &[Vec<f64>]) -> Result<FittedTransform> {
        if x.is_empty() || y.is_empty() {
            return Err(Error::fit(FitStage::Transformation, "no samples to fit on"));
        }
        if x.iter().any(|xi| xi.len() != bounds.n_var()) {
            return Err(Error::fit(
                FitStage::Transformation,
                "decision vectors do not match the problem bounds",
            ));
        }
        let n_obj = y[0].len();
        if y.iter().any(|yi| yi.len() != n_obj) {
            return Err(Error::fit(
                FitStage::Transformation,
                "objective vectors have inconsistent widths",
            ));
        }
        if y.iter().flatten().any(|v| !v.is_finite()) {
            return Err(Error::fit(
                FitStage::Transformation,
                "objective values must be finite",
            ));
        }

        match self {
            Self::Standard => Ok(standard(bounds, y, n_obj)),
            Self::Identity => Ok(FittedTransform {
                x_offset: vec![0.0; bounds.n_var()],
                x_scale: vec![1.0; bounds.n_var()],
                y_offset: vec![0.0; n_obj],
                y_scale: vec![1.0; n_obj],
                x_bounds: bounds.clone(),
            }),
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn standard(bounds: &Bounds, y: &[Vec<f64>], n_obj: usize) -> FittedTransform {
    let x_offset = bounds.lower().to_vec();
    let x_scale: Vec<f64> = bounds
        .lower()
        .iter()
        .zip(bounds.upper())
        .map(|(&lo, &hi)| if hi > lo { hi - lo } else { 1.0 })
        .collect();

    let n = y.len() as f64;
    let y_offset: Vec<f64> = (0..n_obj)
        .map(|j| y.iter().map(|yi| yi[j]).sum::<f64>() / n)
        .collect();
    let y_scale: Vec<f64> = (0..n_obj)
        .map(|j| {
            let var = y.iter().map(|yi| (yi[j] - y_offset[j]).powi(2)).sum::<f64>() / n;
            let std = var.sqrt();
            if std > MIN_STD { std } else { 1.0 }
        })
        .collect();

    // Degenerate variables (lower == upper) collapse to 0.
    let upper = bounds
        .lower()
        .iter()
        .zip(bounds.upper())
        .map(|(&lo, &hi)| if hi > lo { 1.0 } else { 0.0 })
        .collect();
    let x_bounds = Bounds::new(vec![0.0; bounds.n_var()], upper)
        .unwrap_or_else(|_| Bounds::unit(bounds.n_var()));

    FittedTransform {
        x_offset,
        x_scale,
        y_offset,
        y_scale,
        x_bounds,
    }
}

/// A fitted, immutable normalization.
///
/// `apply_*` maps real values to the normalized scale, `undo_*` maps back.
#[derive(Clone, Debug, PartialEq)]
pub struct FittedTransform {
    x_offset: Vec<f64>,
    x_scale: Vec<f64>,
    y_offset: Vec<f64>,
    y_scale: Vec<f64>,
    x_bounds: Bounds,
}

impl FittedTransform {
    /// Bounds of the decision space in the normalized scale.
    #[must_use]
    pub fn x_bounds(&self) -> &Bounds {
        &self.x_bounds
    }

    /// Normalize decision vectors.
    #[must_use]
    pub fn apply_x(&self, x: &[Vec<f64>]) -> Vec<Vec<f64>> {
        map_rows(x, &self.x_offset, &self.x_scale, |v, o, s| (v - o) / s)
    }

    /// Map normalized decision vectors back to the real scale.
    #[must_use]
    pub fn undo_x(&self, x: &[Vec<f64>]) -> Vec<Vec<f64>> {
        map_rows(x, &self.x_offset, &self.x_scale, |v, o, s| v * s + o)
    }

    /// Normalize objective vectors.
    #[must_use]
    pub fn apply_y(&self, y: &[Vec<f64>]) -> Vec<Vec<f64>> {
        map_rows(y, &self.y_offset, &self.y_scale, |v, o, s| (v - o) / s)
    }

    /// Map normalized objective vectors back to the real scale.
    #[must_use]
    pub fn undo_y(&self, y: &[Vec<f64>]) -> Vec<Vec<f64>> {
        map_rows(y, &self.y_offset, &self.y_scale, |v, o, s| v * s + o)
    }

    /// Normalize a sample set.
    #[must_use]
    pub fn apply(&self, x: &[Vec<f64>], y: &[Vec<f64>]) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
        (self.apply_x(x), self.apply_y(y))
    }

    /// Map a normalized sample set back to the real scale.
    #[must_use]
    pub fn undo(&self, x: &[Vec<f64>], y: &[Vec<f64>]) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
        (self.undo_x(x), self.undo_y(y))
    }
}

fn map_rows(
    rows: &[Vec<f64>],
    offset: &[f64],
    scale: &[f64],
    f: impl Fn(f64, f64, f64) -> f64,
) -> Vec<Vec<f64>> {
    rows.iter()
        .map(|row| {
            row.iter()
                .zip(offset.iter().zip(scale))
                .map(|(&v, (&o, &s))| f(v, o, s))
                .collect()
        })
        .collect()
}
