//! Multi-objective search over the surrogate problem.
//!
//! A [`Solver`] searches the normalized decision space of a
//! [`SurrogateProblem`] and returns a [`CandidateSet`]: decision vectors,
//! their acquisition values and, for solvers that partition their output,
//! a group label per candidate (subproblem, weight vector or family).
//!
//! | Kind | Type | Output |
//! |------|------|--------|
//! | `nsga2` | [`Nsga2`] | final population |
//! | `moead` | [`Moead`] | one solution per subproblem, grouped by subproblem |
//! | `parego` | [`ParEgo`] | one solution per random weight, grouped by weight |
//! | `discovery` | [`Discovery`] | non-dominated front points and local refinements, grouped by family |

mod discovery;
pub(crate) mod genetic;
mod moead;
mod nsga2;
mod parego;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use self::discovery::{Discovery, DiscoveryConfig};
pub use self::genetic::Variation;
pub use self::moead::{Moead, MoeadConfig};
pub use self::nsga2::{Nsga2, Nsga2Config};
pub use self::parego::{ParEgo, ParEgoConfig};
use crate::error::Result;
use crate::registry::SolverKind;
use crate::surrogate_problem::SurrogateProblem;

/// The solver's output: candidate points in the normalized decision space.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CandidateSet {
    /// Normalized decision vectors.
    pub x: Vec<Vec<f64>>,
    /// Acquisition values of each candidate.
    pub y: Vec<Vec<f64>>,
    /// Optional group label per candidate.
    pub groups: Option<Vec<usize>>,
}

impl CandidateSet {
    /// An ungrouped candidate set.
    #[must_use]
    pub fn new(x: Vec<Vec<f64>>, y: Vec<Vec<f64>>) -> Self {
        Self { x, y, groups: None }
    }

    /// Attach one group label per candidate.
    #[must_use]
    pub fn with_groups(mut self, groups: Vec<usize>) -> Self {
        self.groups = Some(groups);
        self
    }

    /// Number of candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// `true` if the solver found nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Group of candidate `i`; ungrouped candidates form singleton groups.
    #[must_use]
    pub fn group_of(&self, i: usize) -> usize {
        self.groups
            .as_ref()
            .and_then(|g| g.get(i).copied())
            .unwrap_or(i)
    }
}

/// A multi-objective optimizer for the surrogate problem.
pub trait Solver: Send + Sync {
    /// Short name used in descriptions and logs.
    fn name(&self) -> &'static str;

    /// Search `problem`, using the normalized archive `(x, y)` for seeding.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Solver`](crate::Error::Solver) if the search cannot
    /// run with its configuration.
    fn solve(&self, problem: &SurrogateProblem, x: &[Vec<f64>], y: &[Vec<f64>])
    -> Result<CandidateSet>;
}

/// Typed configuration of the built-in solvers.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum SolverConfig {
    /// NSGA-II.
    Nsga2(Nsga2Config),
    /// MOEA/D with Tchebycheff decomposition.
    Moead(MoeadConfig),
    /// Random-weight scalarizations.
    #[cfg_attr(feature = "serde", serde(rename = "parego"))]
    ParEgo(ParEgoConfig),
    /// NSGA-II front with local, family-tagged refinement.
    Discovery(DiscoveryConfig),
}

impl SolverConfig {
    /// The registry kind of this configuration.
    #[must_use]
    pub fn kind(&self) -> SolverKind {
        match self {
            Self::Nsga2(_) => SolverKind::Nsga2,
            Self::Moead(_) => SolverKind::Moead,
            Self::ParEgo(_) => SolverKind::ParEgo,
            Self::Discovery(_) => SolverKind::Discovery,
        }
    }

    /// Instantiate the solver. `seed` drives its random number generator.
    #[must_use]
    pub fn build(&self, seed: Option<u64>) -> Box<dyn Solver> {
        match self {
            Self::Nsga2(c) => Box::new(Nsga2::new(c.clone(), seed)),
            Self::Moead(c) => Box::new(Moead::new(c.clone(), seed)),
            Self::ParEgo(c) => Box::new(ParEgo::new(c.clone(), seed)),
            Self::Discovery(c) => Box::new(Discovery::new(c.clone(), seed)),
        }
    }
}
