//! Core types shared across the optimization pipeline.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Box bounds of the decision space.
///
/// Every variable has an inclusive `[lower, upper]` interval with
/// `lower <= upper`. Bounds are validated on construction.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bounds {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl Bounds {
    /// Creates bounds from per-variable lower and upper limits.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if the vectors are empty or differ in
    /// length, and `InvalidBounds` if any `lower > upper` (or is NaN).
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> Result<Self> {
        if lower.is_empty() || lower.len() != upper.len() {
            return Err(Error::DimensionMismatch {
                what: "bounds",
                expected: lower.len().max(1),
                got: upper.len(),
                row: 0,
            });
        }
        for (index, (&low, &high)) in lower.iter().zip(&upper).enumerate() {
            if low.is_nan() || high.is_nan() || low > high {
                return Err(Error::InvalidBounds { index, low, high });
            }
        }
        Ok(Self { lower, upper })
    }

    /// Creates bounds with the same interval for every variable.
    ///
    /// # Errors
    ///
    /// Same as [`Bounds::new`].
    pub fn uniform(n_var: usize, low: f64, high: f64) -> Result<Self> {
        Self::new(vec![low; n_var], vec![high; n_var])
    }

    /// The unit hypercube `[0, 1]^n_var`.
    ///
    /// # Panics
    ///
    /// Panics if `n_var` is zero.
    #[must_use]
    pub fn unit(n_var: usize) -> Self {
        assert!(n_var > 0, "bounds need at least one variable");
        Self {
            lower: vec![0.0; n_var],
            upper: vec![1.0; n_var],
        }
    }

    /// Number of decision variables.
    #[must_use]
    pub fn n_var(&self) -> usize {
        self.lower.len()
    }

    /// Per-variable lower limits.
    #[must_use]
    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    /// Per-variable upper limits.
    #[must_use]
    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// Returns `true` if `x` has the right width and lies inside the box.
    #[must_use]
    pub fn contains(&self, x: &[f64]) -> bool {
        x.len() == self.n_var()
            && x
                .iter()
                .zip(self.lower.iter().zip(&self.upper))
                .all(|(&v, (&lo, &hi))| v >= lo && v <= hi)
    }

    /// Clamp `x` into the box.
    #[must_use]
    pub fn clamp(&self, x: &[f64]) -> Vec<f64> {
        x.iter()
            .zip(self.lower.iter().zip(&self.upper))
            .map(|(&v, (&lo, &hi))| v.clamp(lo, hi))
            .collect()
    }

    /// Check every row of `x` against the box.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` for a row of the wrong width and
    /// `OutOfBounds` for the first value outside its interval.
    pub(crate) fn check_rows(&self, x: &[Vec<f64>]) -> Result<()> {
        for (row, xi) in x.iter().enumerate() {
            if xi.len() != self.n_var() {
                return Err(Error::DimensionMismatch {
                    what: "decision vectors",
                    expected: self.n_var(),
                    got: xi.len(),
                    row,
                });
            }
            for (var, &value) in xi.iter().enumerate() {
                let (low, high) = (self.lower[var], self.upper[var]);
                if !(value >= low && value <= high) {
                    return Err(Error::OutOfBounds {
                        row,
                        var,
                        value,
                        low,
                        high,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Which half of the explore-then-exploit schedule an iteration belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Phase {
    /// Iterations before the boundary use the exploration acquisition.
    Explore,
    /// Iterations from the boundary onward use the exploitation acquisition.
    Exploit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_rejects_inverted_interval() {
        let err = Bounds::new(vec![0.0, 2.0], vec![1.0, 1.0]).unwrap_err();
        assert!(matches!(err, Error::InvalidBounds { index: 1, .. }));
    }

    #[test]
    fn test_bounds_rejects_length_mismatch() {
        assert!(Bounds::new(vec![0.0], vec![1.0, 1.0]).is_err());
        assert!(Bounds::new(vec![], vec![]).is_err());
    }

    #[test]
    fn test_contains_and_clamp() {
        let b = Bounds::uniform(2, -1.0, 1.0).unwrap();
        assert!(b.contains(&[0.0, 1.0]));
        assert!(!b.contains(&[0.0, 1.5]));
        assert!(!b.contains(&[0.0]));
        assert_eq!(b.clamp(&[-3.0, 0.5]), vec![-1.0, 0.5]);
    }

    #[test]
    fn test_check_rows_reports_position() {
        let b = Bounds::unit(2);
        let err = b.check_rows(&[vec![0.5, 0.5], vec![0.5, 1.2]]).unwrap_err();
        assert!(matches!(err, Error::OutOfBounds { row: 1, var: 1, .. }));
    }
}
