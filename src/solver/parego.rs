//! ParEGO-style scalarized search.
//!
//! Each of `n_weights` random weight vectors turns the acquisition values
//! into a scalar with the augmented Tchebycheff function
//!
//! `max_j w_j (f_j - z_j) + ρ Σ_j w_j (f_j - z_j)`
//!
//! which a small elitist genetic algorithm then minimizes. The best point of
//! every scalarization becomes one candidate, tagged with its weight index.

use parking_lot::Mutex;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::genetic::{self, Variation};
use super::{CandidateSet, Solver};
use crate::error::{Error, Result};
use crate::problem::Problem;
use crate::rng_util;
use crate::surrogate_problem::SurrogateProblem;

/// Configuration of the [`ParEgo`] solver.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParEgoConfig {
    /// Number of random scalarizations, one candidate each.
    pub n_weights: usize,
    /// Population size of each scalar search.
    pub pop_size: usize,
    /// Generations of each scalar search.
    pub n_gen: usize,
    /// Weight of the augmentation term.
    pub rho: f64,
    /// Variation operator settings.
    pub variation: Variation,
}

impl Default for ParEgoConfig {
    fn default() -> Self {
        Self {
            n_weights: 20,
            pop_size: 20,
            n_gen: 20,
            rho: 0.05,
            variation: Variation::default(),
        }
    }
}

impl ParEgoConfig {
    /// Sets the number of scalarizations. Default: 20.
    #[must_use]
    pub fn n_weights(mut self, n: usize) -> Self {
        self.n_weights = n;
        self
    }

    /// Sets the population size of each scalar search. Default: 20.
    #[must_use]
    pub fn pop_size(mut self, n: usize) -> Self {
        self.pop_size = n;
        self
    }

    /// Sets the generations of each scalar search. Default: 20.
    #[must_use]
    pub fn n_gen(mut self, n: usize) -> Self {
        self.n_gen = n;
        self
    }
}

/// Random-weight scalarization solver.
pub struct ParEgo {
    config: ParEgoConfig,
    rng: Mutex<fastrand::Rng>,
}

impl ParEgo {
    /// Creates the solver. With a seed, runs are reproducible.
    #[must_use]
    pub fn new(config: ParEgoConfig, seed: Option<u64>) -> Self {
        Self {
            config,
            rng: Mutex::new(seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed)),
        }
    }
}

impl Solver for ParEgo {
    fn name(&self) -> &'static str {
        "parego"
    }

    fn solve(
        &self,
        problem: &SurrogateProblem,
        x: &[Vec<f64>],
        y: &[Vec<f64>],
    ) -> Result<CandidateSet> {
        if self.config.n_weights == 0 {
            return Err(Error::Solver("parego needs at least one weight vector".into()));
        }
        let mut rng = self.rng.lock();
        let bounds = problem.bounds();
        let n_obj = problem.n_obj();
        let pop_size = self.config.pop_size.max(4);

        // Ideal point from the acquisition values of the observed samples.
        let observed = problem.scores(x);
        let seeds = genetic::best_observed(x, y, pop_size);

        let mut candidates = Vec::with_capacity(self.config.n_weights);
        let mut scores = Vec::with_capacity(self.config.n_weights);
        for _ in 0..self.config.n_weights {
            let weight = random_weight(&mut rng, n_obj);
            let mut population = genetic::initial_population(&mut rng, bounds, &seeds, pop_size);
            let mut values = problem.scores(&population);
            let mut ideal = genetic::ideal_point(&observed, n_obj);
            for (z, v) in ideal.iter_mut().zip(genetic::ideal_point(&values, n_obj)) {
                *z = z.min(v);
            }
            let fitness_of = |v: &[Vec<f64>]| -> Vec<f64> {
                v.iter()
                    .map(|f| augmented_tchebycheff(f, &weight, &ideal, self.config.rho))
                    .collect()
            };
            let mut fitness = fitness_of(&values);

            for _ in 0..self.config.n_gen {
                let offspring: Vec<Vec<f64>> = (0..pop_size)
                    .map(|_| {
                        let a = binary_tournament(&mut rng, &fitness);
                        let b = binary_tournament(&mut rng, &fitness);
                        self.config
                            .variation
                            .offspring(&mut rng, &population[a], &population[b], bounds)
                    })
                    .collect();
                let offspring_values = problem.scores(&offspring);
                fitness.extend(fitness_of(&offspring_values));
                population.extend(offspring);
                values.extend(offspring_values);

                // (μ + λ) truncation.
                let mut order: Vec<usize> = (0..population.len()).collect();
                order.sort_by(|&a, &b| {
                    fitness[a]
                        .partial_cmp(&fitness[b])
                        .unwrap_or(core::cmp::Ordering::Equal)
                });
                order.truncate(pop_size);
                population = order.iter().map(|&i| population[i].clone()).collect();
                values = order.iter().map(|&i| values[i].clone()).collect();
                fitness = order.iter().map(|&i| fitness[i]).collect();
            }

            let best = (0..fitness.len())
                .min_by(|&a, &b| {
                    fitness[a]
                        .partial_cmp(&fitness[b])
                        .unwrap_or(core::cmp::Ordering::Equal)
                })
                .ok_or(Error::Internal("empty scalar population"))?;
            candidates.push(population.swap_remove(best));
            scores.push(values.swap_remove(best));
        }

        trace_debug!(n_candidates = candidates.len(), "parego finished");
        let groups = (0..candidates.len()).collect();
        Ok(CandidateSet::new(candidates, scores).with_groups(groups))
    }
}

/// A weight vector drawn uniformly from the unit simplex.
fn random_weight(rng: &mut fastrand::Rng, n_obj: usize) -> Vec<f64> {
    let raw: Vec<f64> = (0..n_obj)
        .map(|_| -rng_util::f64_range(rng, f64::EPSILON, 1.0).ln())
        .collect();
    let total: f64 = raw.iter().sum();
    raw.into_iter().map(|w| w / total).collect()
}

/// `max_j w_j (f_j - z_j) + ρ Σ_j w_j (f_j - z_j)`.
fn augmented_tchebycheff(values: &[f64], weight: &[f64], ideal: &[f64], rho: f64) -> f64 {
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    for ((&f, &w), &z) in values.iter().zip(weight).zip(ideal) {
        let term = w * (f - z);
        max = max.max(term);
        sum += term;
    }
    max + rho * sum
}

/// Binary tournament on scalar fitness (lower wins).
fn binary_tournament(rng: &mut fastrand::Rng, fitness: &[f64]) -> usize {
    let a = rng.usize(0..fitness.len());
    let b = rng.usize(0..fitness.len());
    if fitness[a] <= fitness[b] { a } else { b }
}
