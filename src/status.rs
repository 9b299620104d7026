//! Convergence status derived from the archive.
//!
//! [`Status`] is recomputed from scratch every iteration: it carries no
//! state of its own, so computing it twice on the same [`Dataset`] always
//! gives identical results.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::pareto;

/// Pareto front and quality indicators of a [`Dataset`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Status {
    /// Indices into the dataset of the non-dominated samples, ascending.
    pub pareto_indices: Vec<usize>,
    /// Decision vectors of the non-dominated samples.
    pub pareto_x: Vec<Vec<f64>>,
    /// Objective vectors of the non-dominated samples.
    pub pareto_y: Vec<Vec<f64>>,
    /// Hypervolume of the front with respect to the reference point.
    pub hypervolume: f64,
    /// Inverted generational distance to the true front, or `NaN` if no
    /// true front is known.
    pub igd: f64,
    /// Number of samples the status was computed from.
    pub n_samples: usize,
}

impl Status {
    /// Compute the status of `dataset`.
    ///
    /// `true_front` enables the IGD indicator; without it `igd` is `NaN`.
    #[must_use]
    pub fn compute(dataset: &Dataset, ref_point: &[f64], true_front: Option<&[Vec<f64>]>) -> Self {
        let pareto_indices = pareto::pareto_front_indices(dataset.y());
        let pareto_x: Vec<Vec<f64>> = pareto_indices
            .iter()
            .map(|&i| dataset.x()[i].clone())
            .collect();
        let pareto_y: Vec<Vec<f64>> = pareto_indices
            .iter()
            .map(|&i| dataset.y()[i].clone())
            .collect();

        let hypervolume = pareto::hypervolume(&pareto_y, ref_point);
        let igd = true_front.map_or(f64::NAN, |front| pareto::igd(&pareto_y, front));

        Self {
            pareto_indices,
            pareto_x,
            pareto_y,
            hypervolume,
            igd,
            n_samples: dataset.len(),
        }
    }
}
