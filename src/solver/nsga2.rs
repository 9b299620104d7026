//! NSGA-II over the surrogate problem.
//!
//! The initial population is seeded with the best observed samples (by
//! non-dominated rank) and topped up with uniform random points. Each
//! generation breeds a full offspring population by binary tournament, SBX
//! crossover and polynomial mutation, then keeps the best `pop_size` of
//! parents plus offspring by front and crowding distance. The whole final
//! population is returned as the candidate set.

use parking_lot::Mutex;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::genetic::{self, Variation};
use super::{CandidateSet, Solver};
use crate::error::Result;
use crate::problem::Problem;
use crate::surrogate_problem::SurrogateProblem;

/// Configuration of the [`Nsga2`] solver.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Nsga2Config {
    /// Population size, minimum 4.
    pub pop_size: usize,
    /// Number of generations.
    pub n_gen: usize,
    /// Variation operator settings.
    pub variation: Variation,
}

impl Default for Nsga2Config {
    fn default() -> Self {
        Self {
            pop_size: 100,
            n_gen: 10,
            variation: Variation::default(),
        }
    }
}

impl Nsga2Config {
    /// Sets the population size. Default: 100.
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

    /// Sets the variation operator settings.
    #[must_use]
    pub fn variation(mut self, variation: Variation) -> Self {
        self.variation = variation;
        self
    }
}

/// NSGA-II solver.
pub struct Nsga2 {
    config: Nsga2Config,
    rng: Mutex<fastrand::Rng>,
}

impl Nsga2 {
    /// Creates the solver. With a seed, runs are reproducible.
    #[must_use]
    pub fn new(config: Nsga2Config, seed: Option<u64>) -> Self {
        Self {
            config,
            rng: Mutex::new(seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed)),
        }
    }
}

impl Solver for Nsga2 {
    fn name(&self) -> &'static str {
        "nsga2"
    }

    fn solve(
        &self,
        problem: &SurrogateProblem,
        x: &[Vec<f64>],
        y: &[Vec<f64>],
    ) -> Result<CandidateSet> {
        let mut rng = self.rng.lock();
        let (population, values) = evolve(&mut rng, problem, x, y, &self.config);
        trace_debug!(n_candidates = population.len(), "nsga2 finished");
        Ok(CandidateSet::new(population, values))
    }
}

/// Run NSGA-II and return the final population with its scores.
pub(super) fn evolve(
    rng: &mut fastrand::Rng,
    problem: &SurrogateProblem,
    x: &[Vec<f64>],
    y: &[Vec<f64>],
    config: &Nsga2Config,
) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
    let bounds = problem.bounds();
    let pop_size = config.pop_size.max(4);

    let seeds = genetic::best_observed(x, y, pop_size);
    let mut population = genetic::initial_population(rng, bounds, &seeds, pop_size);
    let mut values = problem.scores(&population);

    for _ in 0..config.n_gen {
        let (ranks, crowding) = genetic::rank_and_crowding(&values);

        let offspring: Vec<Vec<f64>> = (0..pop_size)
            .map(|_| {
                let a = genetic::tournament_select(rng, &ranks, &crowding);
                let b = genetic::tournament_select(rng, &ranks, &crowding);
                config
                    .variation
                    .offspring(rng, &population[a], &population[b], bounds)
            })
            .collect();
        let offspring_values = problem.scores(&offspring);

        population.extend(offspring);
        values.extend(offspring_values);

        let keep = genetic::survival(&values, pop_size);
        population = keep.iter().map(|&i| population[i].clone()).collect();
        values = keep.iter().map(|&i| values[i].clone()).collect();
    }

    (population, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::tests::{ParabolaScorer, parabola_problem};

    #[test]
    fn test_nsga2_returns_scored_population() {
        let problem = parabola_problem(2);
        let solver = Nsga2::new(Nsga2Config::default().pop_size(20).n_gen(5), Some(1));
        let x = vec![vec![0.5, 0.5]];
        let y = vec![vec![0.25, 0.25]];
        let set = solver.solve(&problem, &x, &y).unwrap();
        assert_eq!(set.len(), 20);
        for (xi, yi) in set.x.iter().zip(&set.y) {
            assert!(problem.bounds().contains(xi));
            assert_eq!(yi, &ParabolaScorer::score(xi));
        }
        assert!(set.groups.is_none());
    }

    #[test]
    fn test_nsga2_converges_toward_front() {
        let problem = parabola_problem(1);
        let solver = Nsga2::new(Nsga2Config::default().pop_size(24).n_gen(30), Some(4));
        let set = solver.solve(&problem, &[vec![0.9]], &[vec![0.81, 0.01]]).unwrap();
        // Every point of the segment [0, 1] is Pareto-optimal for (x², (x-1)²);
        // the population should spread over it.
        let min = set.x.iter().map(|v| v[0]).fold(f64::INFINITY, f64::min);
        let max = set.x.iter().map(|v| v[0]).fold(f64::NEG_INFINITY, f64::max);
        assert!(min < 0.2 && max > 0.8, "spread [{min}, {max}]");
    }
}
