//! Initial designs: space-filling samples to seed the archive.
//!
//! | Function | Design | Feature flag |
//! |----------|--------|--------------|
//! | [`random_samples`] | Uniform random | none |
//! | [`latin_hypercube`] | Latin hypercube, one point per stratum per variable | none |
//! | [`sobol_samples`] | Owen-scrambled Sobol sequence | `sobol` |
//!
//! [`evaluate_initial`] evaluates a design on the real problem and returns
//! the `(X, Y)` pair that [`Mobo::solve`](crate::Mobo::solve) expects.

use crate::error::{Error, Result};
use crate::problem::Problem;
use crate::rng_util;
use crate::types::Bounds;

/// `n` points drawn uniformly from `bounds`.
#[must_use]
pub fn random_samples(bounds: &Bounds, n: usize, seed: Option<u64>) -> Vec<Vec<f64>> {
    let mut rng = rng_util::seeded(seed, 0);
    (0..n)
        .map(|_| {
            bounds
                .lower()
                .iter()
                .zip(bounds.upper())
                .map(|(&lo, &hi)| rng_util::f64_range(&mut rng, lo, hi))
                .collect()
        })
        .collect()
}

/// `n` points from a Latin hypercube over `bounds`.
///
/// Each variable's range is cut into `n` equal strata and every stratum
/// holds exactly one point, placed uniformly within it.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn latin_hypercube(bounds: &Bounds, n: usize, seed: Option<u64>) -> Vec<Vec<f64>> {
    let mut rng = rng_util::seeded(seed, 0);
    let mut points = vec![vec![0.0; bounds.n_var()]; n];
    for (var, (&lo, &hi)) in bounds.lower().iter().zip(bounds.upper()).enumerate() {
        let mut strata: Vec<usize> = (0..n).collect();
        rng.shuffle(&mut strata);
        for (point, stratum) in points.iter_mut().zip(strata) {
            let u = (stratum as f64 + rng.f64()) / n as f64;
            point[var] = lo + u * (hi - lo);
        }
    }
    points
}

/// The first `n` points of a scrambled Sobol sequence over `bounds`.
///
/// Supports up to 256 variables.
#[cfg(feature = "sobol")]
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn sobol_samples(bounds: &Bounds, n: usize, seed: u64) -> Vec<Vec<f64>> {
    let seed = seed as u32;
    (0..n)
        .map(|index| {
            bounds
                .lower()
                .iter()
                .zip(bounds.upper())
                .enumerate()
                .map(|(dim, (&lo, &hi))| {
                    let u = f64::from(sobol_burley::sample(index as u32, dim as u32, seed));
                    lo + u * (hi - lo)
                })
                .collect()
        })
        .collect()
}

/// Evaluates an initial design on `problem`.
///
/// Constraint values are dropped; only objectives are returned.
///
/// # Errors
///
/// Propagates evaluation errors, and returns [`Error::Evaluation`] or
/// [`Error::ObjectiveDimensionMismatch`] if the evaluator's output does not
/// match the design's shape.
pub fn evaluate_initial<P: Problem + ?Sized>(
    problem: &P,
    x: Vec<Vec<f64>>,
) -> Result<(Vec<Vec<f64>>, Vec<Vec<f64>>)> {
    let y = problem.evaluate(&x)?.objectives;
    if y.len() != x.len() {
        return Err(Error::Evaluation(format!(
            "evaluator returned {} rows for a design of {}",
            y.len(),
            x.len()
        )));
    }
    if let Some(row) = y.iter().find(|row| row.len() != problem.n_obj()) {
        return Err(Error::ObjectiveDimensionMismatch {
            expected: problem.n_obj(),
            got: row.len(),
        });
    }
    Ok((x, y))
}
