#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Phase;

/// Which acquisition is active at each iteration.
///
/// The first `floor(n_iter * phase1_ratio)` iterations explore with the
/// first acquisition; the rest exploit with the second. The schedule is a
/// pure function of the iteration index and never depends on run state.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PhaseSchedule {
    n_iter: usize,
    phase1_ratio: f64,
}

impl PhaseSchedule {
    /// Creates a schedule over `n_iter` iterations.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPhaseRatio`] if `phase1_ratio` is NaN or
    /// outside `[0, 1]`.
    pub fn new(n_iter: usize, phase1_ratio: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&phase1_ratio) {
            return Err(Error::InvalidPhaseRatio(phase1_ratio));
        }
        Ok(Self {
            n_iter,
            phase1_ratio,
        })
    }

    /// Total number of iterations.
    #[must_use]
    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    /// Fraction of iterations spent exploring.
    #[must_use]
    pub fn phase1_ratio(&self) -> f64 {
        self.phase1_ratio
    }

    /// The first exploit iteration.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn boundary(&self) -> usize {
        ((self.n_iter as f64 * self.phase1_ratio).floor() as usize).min(self.n_iter)
    }

    /// The phase of iteration `i`.
    #[must_use]
    pub fn phase(&self, i: usize) -> Phase {
        if i < self.boundary() {
            Phase::Explore
        } else {
            Phase::Exploit
        }
    }

    /// Number of explore iterations.
    #[must_use]
    pub fn explore_iters(&self) -> usize {
        self.boundary()
    }

    /// Number of exploit iterations.
    #[must_use]
    pub fn exploit_iters(&self) -> usize {
        self.n_iter - self.boundary()
    }
}
