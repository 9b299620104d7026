//! Pareto discovery: an NSGA-II front refined by local exploration.
//!
//! NSGA-II first approximates the front of the surrogate problem. Each
//! front point then seeds a *family*: a handful of Gaussian perturbations
//! around it in the normalized decision space. Parents and perturbations are
//! pooled and only the non-dominated ones survive, each still tagged with
//! the family it came from so the selection stage can spread its batch over
//! distinct regions of the front.

use parking_lot::Mutex;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::nsga2::{self, Nsga2Config};
use super::{CandidateSet, Solver};
use crate::error::Result;
use crate::pareto;
use crate::problem::Problem;
use crate::rng_util;
use crate::surrogate_problem::SurrogateProblem;

/// Configuration of the [`Discovery`] solver.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DiscoveryConfig {
    /// Settings of the initial NSGA-II search.
    pub nsga2: Nsga2Config,
    /// Perturbations generated around each front point.
    pub n_local: usize,
    /// Standard deviation of the perturbations, relative to the bounds.
    pub step: f64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            nsga2: Nsga2Config::default(),
            n_local: 5,
            step: 0.05,
        }
    }
}

impl DiscoveryConfig {
    /// Sets the initial NSGA-II settings.
    #[must_use]
    pub fn nsga2(mut self, config: Nsga2Config) -> Self {
        self.nsga2 = config;
        self
    }

    /// Sets the number of perturbations per front point. Default: 5.
    #[must_use]
    pub fn n_local(mut self, n: usize) -> Self {
        self.n_local = n;
        self
    }

    /// Sets the relative perturbation size. Default: 0.05.
    #[must_use]
    pub fn step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }
}

/// Family-tagged Pareto discovery solver.
pub struct Discovery {
    config: DiscoveryConfig,
    rng: Mutex<fastrand::Rng>,
}

impl Discovery {
    /// Creates the solver. With a seed, runs are reproducible.
    #[must_use]
    pub fn new(config: DiscoveryConfig, seed: Option<u64>) -> Self {
        Self {
            config,
            rng: Mutex::new(seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed)),
        }
    }
}

impl Solver for Discovery {
    fn name(&self) -> &'static str {
        "discovery"
    }

    fn solve(
        &self,
        problem: &SurrogateProblem,
        x: &[Vec<f64>],
        y: &[Vec<f64>],
    ) -> Result<CandidateSet> {
        let mut rng = self.rng.lock();
        let bounds = problem.bounds();
        let (population, values) = nsga2::evolve(&mut rng, problem, x, y, &self.config.nsga2);

        let front = pareto::pareto_front_indices(&values);
        let mut pool_x = Vec::with_capacity(front.len() * (self.config.n_local + 1));
        let mut families = Vec::with_capacity(pool_x.capacity());
        for (family, &i) in front.iter().enumerate() {
            let parent = &population[i];
            pool_x.push(parent.clone());
            families.push(family);
            for _ in 0..self.config.n_local {
                let local: Vec<f64> = parent
                    .iter()
                    .zip(bounds.lower().iter().zip(bounds.upper()))
                    .map(|(&v, (&lo, &hi))| {
                        let sigma = self.config.step * (hi - lo);
                        (v + sigma * rng_util::standard_normal(&mut rng)).clamp(lo, hi)
                    })
                    .collect();
                pool_x.push(local);
                families.push(family);
            }
        }
        let pool_y = problem.scores(&pool_x);

        let keep = pareto::pareto_front_indices(&pool_y);
        let n_families = front.len();
        let x_out = keep.iter().map(|&i| pool_x[i].clone()).collect();
        let y_out = keep.iter().map(|&i| pool_y[i].clone()).collect();
        let groups = keep.iter().map(|&i| families[i]).collect();

        trace_debug!(n_families, n_candidates = keep.len(), "pareto discovery finished");
        Ok(CandidateSet::new(x_out, y_out).with_groups(groups))
    }
}
