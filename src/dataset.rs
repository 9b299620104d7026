//! The append-only archive of evaluated samples.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// All decision vectors evaluated so far and their objective values.
///
/// Rows of `x` and `y` are parallel: `y()[i]` holds the objectives of
/// `x()[i]`. The archive only grows. [`append`](Self::append) validates the
/// whole batch before touching either side, so a failed append leaves the
/// dataset exactly as it was.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawDataset"))]
pub struct Dataset {
    x: Vec<Vec<f64>>,
    y: Vec<Vec<f64>>,
    n_var: usize,
    n_obj: usize,
}

impl Dataset {
    /// Creates a dataset from initial samples.
    ///
    /// # Errors
    ///
    /// Returns `EmptyDataset` if there are no rows, `RowCountMismatch` if
    /// `x` and `y` differ in length, and `DimensionMismatch` if rows have
    /// inconsistent widths.
    pub fn new(x: Vec<Vec<f64>>, y: Vec<Vec<f64>>) -> Result<Self> {
        if x.is_empty() || y.is_empty() {
            return Err(Error::EmptyDataset);
        }
        let n_var = x[0].len();
        let n_obj = y[0].len();
        validate_batch(&x, &y, n_var, n_obj)?;
        Ok(Self { x, y, n_var, n_obj })
    }

    /// Appends a batch of evaluated samples.
    ///
    /// # Errors
    ///
    /// Returns `EmptyDataset` for an empty batch, `RowCountMismatch` or
    /// `DimensionMismatch` if the batch is inconsistent with itself or with
    /// the archive. On error nothing is appended.
    pub fn append(&mut self, x: Vec<Vec<f64>>, y: Vec<Vec<f64>>) -> Result<()> {
        if x.is_empty() && y.is_empty() {
            return Err(Error::EmptyDataset);
        }
        validate_batch(&x, &y, self.n_var, self.n_obj)?;
        self.x.extend(x);
        self.y.extend(y);
        Ok(())
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Always `false`: a dataset holds at least one sample.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Decision vectors, in insertion order.
    #[must_use]
    pub fn x(&self) -> &[Vec<f64>] {
        &self.x
    }

    /// Objective vectors, in insertion order.
    #[must_use]
    pub fn y(&self) -> &[Vec<f64>] {
        &self.y
    }

    /// Number of decision variables per sample.
    #[must_use]
    pub fn n_var(&self) -> usize {
        self.n_var
    }

    /// Number of objectives per sample.
    #[must_use]
    pub fn n_obj(&self) -> usize {
        self.n_obj
    }

    /// Element-wise maximum over all objective vectors.
    #[must_use]
    pub fn max_objectives(&self) -> Vec<f64> {
        let mut max = vec![f64::NEG_INFINITY; self.n_obj];
        for yi in &self.y {
            for (m, &v) in max.iter_mut().zip(yi) {
                *m = m.max(v);
            }
        }
        max
    }
}

/// Unvalidated wire form of a [`Dataset`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawDataset {
    x: Vec<Vec<f64>>,
    y: Vec<Vec<f64>>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawDataset> for Dataset {
    type Error = Error;

    fn try_from(raw: RawDataset) -> Result<Self> {
        Self::new(raw.x, raw.y)
    }
}

fn validate_batch(x: &[Vec<f64>], y: &[Vec<f64>], n_var: usize, n_obj: usize) -> Result<()> {
    if x.len() != y.len() {
        return Err(Error::RowCountMismatch {
            x: x.len(),
            y: y.len(),
        });
    }
    if let Some(row) = x.iter().position(|r| r.len() != n_var) {
        return Err(Error::DimensionMismatch {
            what: "decision vectors",
            expected: n_var,
            got: x[row].len(),
            row,
        });
    }
    if let Some(row) = y.iter().position(|r| r.len() != n_obj) {
        return Err(Error::DimensionMismatch {
            what: "objective vectors",
            expected: n_obj,
            got: y[row].len(),
            row,
        });
    }
    Ok(())
}
