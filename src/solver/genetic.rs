//! Shared genetic operators for the evolutionary solvers.
//!
//! All operators work on plain `f64` decision vectors inside a [`Bounds`]
//! box (the normalized decision space): SBX crossover, polynomial mutation,
//! population seeding, NSGA-II ranking and survival, and Das-Dennis weight
//! generation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::pareto;
use crate::rng_util;
use crate::types::Bounds;

/// Variation operator settings shared by the evolutionary solvers.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Variation {
    /// Probability of applying crossover to a pair of parents.
    pub crossover_prob: f64,
    /// SBX distribution index.
    pub crossover_eta: f64,
    /// Polynomial mutation distribution index.
    pub mutation_eta: f64,
}

impl Default for Variation {
    fn default() -> Self {
        Self {
            crossover_prob: 0.9,
            crossover_eta: 15.0,
            mutation_eta: 20.0,
        }
    }
}

impl Variation {
    /// Sets the crossover probability. Default: 0.9.
    #[must_use]
    pub fn crossover_prob(mut self, prob: f64) -> Self {
        self.crossover_prob = prob;
        self
    }

    /// Sets the SBX distribution index. Default: 15.0.
    #[must_use]
    pub fn crossover_eta(mut self, eta: f64) -> Self {
        self.crossover_eta = eta;
        self
    }

    /// Sets the polynomial mutation distribution index. Default: 20.0.
    #[must_use]
    pub fn mutation_eta(mut self, eta: f64) -> Self {
        self.mutation_eta = eta;
        self
    }

    /// Produce one mutated child from two parents.
    pub(crate) fn offspring(
        &self,
        rng: &mut fastrand::Rng,
        p1: &[f64],
        p2: &[f64],
        bounds: &Bounds,
    ) -> Vec<f64> {
        let (mut child, _) = crossover(rng, p1, p2, bounds, self.crossover_prob, self.crossover_eta);
        mutate(rng, &mut child, bounds, self.mutation_eta);
        child
    }
}

// ---------------------------------------------------------------------------
// Population helpers
// ---------------------------------------------------------------------------

/// A uniformly random point inside `bounds`.
pub(crate) fn random_point(rng: &mut fastrand::Rng, bounds: &Bounds) -> Vec<f64> {
    bounds
        .lower()
        .iter()
        .zip(bounds.upper())
        .map(|(&lo, &hi)| rng_util::f64_range(rng, lo, hi))
        .collect()
}

/// Build a population of `size` points: the `seeds` first (clamped to the
/// bounds), then uniformly random points.
pub(crate) fn initial_population(
    rng: &mut fastrand::Rng,
    bounds: &Bounds,
    seeds: &[Vec<f64>],
    size: usize,
) -> Vec<Vec<f64>> {
    let mut population: Vec<Vec<f64>> = seeds
        .iter()
        .take(size)
        .map(|s| bounds.clamp(s))
        .collect();
    while population.len() < size {
        population.push(random_point(rng, bounds));
    }
    population
}

/// Order the observed samples by non-dominated rank and return up to
/// `limit` of their decision vectors.
pub(crate) fn best_observed(x: &[Vec<f64>], y: &[Vec<f64>], limit: usize) -> Vec<Vec<f64>> {
    pareto::fast_non_dominated_sort(y)
        .into_iter()
        .flatten()
        .take(limit)
        .map(|i| x[i].clone())
        .collect()
}

// ---------------------------------------------------------------------------
// NSGA-II ranking and survival
// ---------------------------------------------------------------------------

/// Non-domination rank and crowding distance of every solution.
pub(crate) fn rank_and_crowding(values: &[Vec<f64>]) -> (Vec<usize>, Vec<f64>) {
    let n = values.len();
    let mut rank = vec![0_usize; n];
    let mut crowding = vec![0.0_f64; n];
    for (front_rank, front) in pareto::fast_non_dominated_sort(values).iter().enumerate() {
        let cd = pareto::crowding_distance_indexed(front, values);
        for (i, &idx) in front.iter().enumerate() {
            rank[idx] = front_rank;
            crowding[idx] = cd[i];
        }
    }
    (rank, crowding)
}

/// NSGA-II environmental selection: fill by whole fronts, truncate the last
/// partially fitting front by descending crowding distance.
pub(crate) fn survival(values: &[Vec<f64>], size: usize) -> Vec<usize> {
    let mut selected: Vec<usize> = Vec::with_capacity(size);
    for front in pareto::fast_non_dominated_sort(values) {
        if selected.len() + front.len() <= size {
            selected.extend_from_slice(&front);
        } else {
            let remaining = size - selected.len();
            let cd = pareto::crowding_distance_indexed(&front, values);
            let mut order: Vec<usize> = (0..front.len()).collect();
            order.sort_by(|&a, &b| cd[b].partial_cmp(&cd[a]).unwrap_or(core::cmp::Ordering::Equal));
            selected.extend(order.into_iter().take(remaining).map(|i| front[i]));
        }
        if selected.len() >= size {
            break;
        }
    }
    selected
}

/// Binary tournament on (rank, crowding distance).
pub(crate) fn tournament_select(rng: &mut fastrand::Rng, ranks: &[usize], crowding: &[f64]) -> usize {
    let n = ranks.len();
    let a = rng.usize(0..n);
    let b = rng.usize(0..n);

    if ranks[a] < ranks[b] {
        a
    } else if ranks[b] < ranks[a] {
        b
    } else if crowding[a] >= crowding[b] {
        a
    } else {
        b
    }
}

// ---------------------------------------------------------------------------
// Genetic operators
// ---------------------------------------------------------------------------

/// SBX crossover over every dimension of two parents.
pub(crate) fn crossover(
    rng: &mut fastrand::Rng,
    parent1: &[f64],
    parent2: &[f64],
    bounds: &Bounds,
    crossover_prob: f64,
    eta: f64,
) -> (Vec<f64>, Vec<f64>) {
    let mut child1 = parent1.to_vec();
    let mut child2 = parent2.to_vec();

    if rng_util::f64_range(rng, 0.0, 1.0) > crossover_prob {
        return (child1, child2);
    }

    for (i, (lo, hi)) in bounds.lower().iter().zip(bounds.upper()).enumerate() {
        if (parent1[i] - parent2[i]).abs() < 1e-14 {
            continue;
        }
        let (c1, c2) = sbx_crossover_f64(rng, parent1[i], parent2[i], *lo, *hi, eta);
        child1[i] = c1;
        child2[i] = c2;
    }

    (child1, child2)
}

/// SBX crossover for a single float dimension.
pub(crate) fn sbx_crossover_f64(
    rng: &mut fastrand::Rng,
    p1: f64,
    p2: f64,
    low: f64,
    high: f64,
    eta: f64,
) -> (f64, f64) {
    let u: f64 = rng_util::f64_range(rng, 0.0, 1.0);

    let beta = if u <= 0.5 {
        (2.0 * u).powf(1.0 / (eta + 1.0))
    } else {
        (1.0 / (2.0 * (1.0 - u))).powf(1.0 / (eta + 1.0))
    };

    let c1 = 0.5 * ((1.0 + beta) * p1 + (1.0 - beta) * p2);
    let c2 = 0.5 * ((1.0 - beta) * p1 + (1.0 + beta) * p2);

    (c1.clamp(low, high), c2.clamp(low, high))
}

/// Polynomial mutation, each dimension with probability `1/n`.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn mutate(rng: &mut fastrand::Rng, individual: &mut [f64], bounds: &Bounds, eta: f64) {
    let n = individual.len();
    if n == 0 {
        return;
    }
    let mutation_prob = 1.0 / n as f64;

    for (i, value) in individual.iter_mut().enumerate() {
        if rng_util::f64_range(rng, 0.0, 1.0) >= mutation_prob {
            continue;
        }
        *value = polynomial_mutation_f64(rng, *value, bounds.lower()[i], bounds.upper()[i], eta);
    }
}

/// Polynomial mutation for a single float value.
pub(crate) fn polynomial_mutation_f64(
    rng: &mut fastrand::Rng,
    x: f64,
    low: f64,
    high: f64,
    eta: f64,
) -> f64 {
    let u: f64 = rng_util::f64_range(rng, 0.0, 1.0);
    let range = high - low;
    if range <= 0.0 {
        return x;
    }

    let delta1 = (x - low) / range;
    let delta2 = (high - x) / range;

    let delta_q = if u < 0.5 {
        let xy = 1.0 - delta1;
        let val = 2.0 * u + (1.0 - 2.0 * u) * xy.powf(eta + 1.0);
        val.powf(1.0 / (eta + 1.0)) - 1.0
    } else {
        let xy = 1.0 - delta2;
        let val = 2.0 * (1.0 - u) + 2.0 * (u - 0.5) * xy.powf(eta + 1.0);
        1.0 - val.powf(1.0 / (eta + 1.0))
    };

    (x + delta_q * range).clamp(low, high)
}

// ---------------------------------------------------------------------------
// Das-Dennis reference point generation
// ---------------------------------------------------------------------------

/// Generate Das-Dennis (simplex-lattice) weight vectors.
///
/// Returns `C(H + M - 1, M - 1)` uniformly spaced points on the
/// `M`-dimensional unit simplex, where `M = n_objectives` and
/// `H = divisions`.
pub(crate) fn das_dennis(n_objectives: usize, divisions: usize) -> Vec<Vec<f64>> {
    if n_objectives == 0 {
        return Vec::new();
    }
    let divisions = divisions.max(1);
    let mut points = Vec::new();
    let mut point = vec![0.0_f64; n_objectives];
    das_dennis_recursive(n_objectives, divisions, 0, divisions, &mut point, &mut points);
    points
}

#[allow(clippy::cast_precision_loss)]
fn das_dennis_recursive(
    n_objectives: usize,
    divisions: usize,
    depth: usize,
    remaining: usize,
    current: &mut Vec<f64>,
    result: &mut Vec<Vec<f64>>,
) {
    if depth == n_objectives - 1 {
        current[depth] = remaining as f64 / divisions as f64;
        result.push(current.clone());
        return;
    }

    for i in 0..=remaining {
        current[depth] = i as f64 / divisions as f64;
        das_dennis_recursive(n_objectives, divisions, depth + 1, remaining - i, current, result);
    }
}

/// Smallest number of divisions whose lattice has at least `target_pop`
/// points.
pub(crate) fn auto_divisions(n_objectives: usize, target_pop: usize) -> usize {
    let m = n_objectives.max(1);
    if m == 1 {
        return 1;
    }
    for h in 1..200 {
        if n_combinations(h + m - 1, m - 1) >= target_pop {
            return h;
        }
    }
    12
}

/// Compute `C(n, k)`.
fn n_combinations(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: usize = 1;
    for i in 0..k {
        result = result.saturating_mul(n - i) / (i + 1);
    }
    result
}

/// Indices of the `t` weight vectors closest to each weight (itself included).
pub(crate) fn neighborhoods(weights: &[Vec<f64>], t: usize) -> Vec<Vec<usize>> {
    weights
        .iter()
        .map(|wi| {
            let mut distances: Vec<(usize, f64)> = weights
                .iter()
                .enumerate()
                .map(|(j, wj)| {
                    let d: f64 = wi.iter().zip(wj).map(|(&a, &b)| (a - b).powi(2)).sum();
                    (j, d)
                })
                .collect();
            distances.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(core::cmp::Ordering::Equal));
            distances.into_iter().take(t.max(1)).map(|(idx, _)| idx).collect()
        })
        .collect()
}

/// Tchebycheff scalarization: `max(w_i * |f_i - z_i|)`.
pub(crate) fn tchebycheff(values: &[f64], weight: &[f64], ideal: &[f64]) -> f64 {
    values
        .iter()
        .zip(weight)
        .zip(ideal)
        .map(|((&v, &w), &z)| w.max(1e-6) * (v - z).abs())
        .fold(f64::NEG_INFINITY, f64::max)
}

/// Per-objective minimum of a set of objective vectors.
pub(crate) fn ideal_point(values: &[Vec<f64>], n_obj: usize) -> Vec<f64> {
    let mut ideal = vec![f64::INFINITY; n_obj];
    for v in values {
        for (z, &x) in ideal.iter_mut().zip(v) {
            if x < *z {
                *z = x;
            }
        }
    }
    ideal
}
