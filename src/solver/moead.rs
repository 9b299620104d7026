//! MOEA/D over the surrogate problem.
//!
//! The problem is decomposed into scalar subproblems, one per Das-Dennis
//! weight vector, each scalarized with the Tchebycheff approach against the
//! running ideal point. Every generation each subproblem mates two
//! neighbours, and the child replaces any neighbour it improves on. The
//! candidate set tags each solution with its subproblem index.

use parking_lot::Mutex;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::genetic::{self, Variation};
use super::{CandidateSet, Solver};
use crate::error::Result;
use crate::problem::Problem;
use crate::surrogate_problem::SurrogateProblem;

/// Configuration of the [`Moead`] solver.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MoeadConfig {
    /// Target number of subproblems; the actual count is the smallest
    /// Das-Dennis lattice at least this large.
    pub pop_size: usize,
    /// Number of generations.
    pub n_gen: usize,
    /// Number of neighbouring subproblems used for mating and replacement.
    pub neighborhood_size: usize,
    /// Variation operator settings.
    pub variation: Variation,
}

impl Default for MoeadConfig {
    fn default() -> Self {
        Self {
            pop_size: 100,
            n_gen: 10,
            neighborhood_size: 20,
            variation: Variation::default(),
        }
    }
}

impl MoeadConfig {
    /// Sets the target number of subproblems. Default: 100.
    #[must_use]
    pub fn pop_size(mut self, n: usize) -> Self {
        self.pop_size = n;
        self
    }

    /// Sets the number of generations. Default: 10.
    #[must_use]
    pub fn n_gen(mut self, n: usize) -> Self {
        self.n_gen = n;
        self
    }

    /// Sets the neighbourhood size. Default: 20.
    #[must_use]
    pub fn neighborhood_size(mut self, n: usize) -> Self {
        self.neighborhood_size = n;
        self
    }
}

/// MOEA/D solver with Tchebycheff decomposition.
pub struct Moead {
    config: MoeadConfig,
    rng: Mutex<fastrand::Rng>,
}

impl Moead {
    /// Creates the solver. With a seed, runs are reproducible.
    #[must_use]
    pub fn new(config: MoeadConfig, seed: Option<u64>) -> Self {
        Self {
            config,
            rng: Mutex::new(seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed)),
        }
    }
}

impl Solver for Moead {
    fn name(&self) -> &'static str {
        "moead"
    }

    fn solve(
        &self,
        problem: &SurrogateProblem,
        x: &[Vec<f64>],
        y: &[Vec<f64>],
    ) -> Result<CandidateSet> {
        let mut rng = self.rng.lock();
        let bounds = problem.bounds();
        let n_obj = problem.n_obj();

        let weights = genetic::das_dennis(
            n_obj,
            genetic::auto_divisions(n_obj, self.config.pop_size.max(2)),
        );
        let n = weights.len();
        let hoods = genetic::neighborhoods(&weights, self.config.neighborhood_size.min(n));

        let seeds = genetic::best_observed(x, y, n);
        let mut population = genetic::initial_population(&mut rng, bounds, &seeds, n);
        let mut values = problem.scores(&population);
        let mut ideal = genetic::ideal_point(&values, n_obj);

        for _ in 0..self.config.n_gen {
            for (i, hood) in hoods.iter().enumerate() {
                let a = hood[rng.usize(0..hood.len())];
                let b = hood[rng.usize(0..hood.len())];
                let child = self
                    .config
                    .variation
                    .offspring(&mut rng, &population[a], &population[b], bounds);
                let Some(child_values) = problem.scores(core::slice::from_ref(&child)).pop()
                else {
                    continue;
                };

                for (z, &v) in ideal.iter_mut().zip(&child_values) {
                    if v < *z {
                        *z = v;
                    }
                }

                for &j in &hoods[i] {
                    let child_fit = genetic::tchebycheff(&child_values, &weights[j], &ideal);
                    let current_fit = genetic::tchebycheff(&values[j], &weights[j], &ideal);
                    if child_fit <= current_fit {
                        population[j].clone_from(&child);
                        values[j].clone_from(&child_values);
                    }
                }
            }
        }

        trace_debug!(n_subproblems = n, "moead finished");
        Ok(CandidateSet::new(population, values).with_groups((0..n).collect()))
    }
}
