#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]
#![deny(clippy::pedantic)]
#![deny(clippy::std_instead_of_core)]

//! Surrogate-assisted multi-objective Bayesian optimization. Fit cheap
//! surrogates of expensive objectives, search them for promising
//! candidates, evaluate a batch on the real problem, repeat. All objectives
//! are minimized.
//!
//! # Getting Started
//!
//! ```
//! use mobo::prelude::*;
//!
//! let problem = Zdt1::new(3);
//! let x = latin_hypercube(problem.bounds(), 8, Some(0));
//! let (x, y) = evaluate_initial(&problem, x).unwrap();
//!
//! let mut mobo = MoboBuilder::new()
//!     .algorithm(Algorithm::Rmobo2)
//!     .n_iter(2)
//!     .batch_size(2)
//!     .seed(0)
//!     .build(problem)
//!     .unwrap();
//!
//! let mut run = mobo.solve(x, y).unwrap();
//! while let Some(batch) = run.step().unwrap() {
//!     println!("iteration {}: hv = {:.4}", batch.iteration, batch.status.hypervolume);
//! }
//! assert_eq!(run.dataset().len(), 12);
//! ```
//!
//! # Pipeline
//!
//! Every iteration runs the same stages, each behind a trait:
//!
//! | Stage | Trait / type | Built-in members |
//! |-------|--------------|------------------|
//! | Normalization | [`Transformation`](transformation::Transformation) | standard, identity |
//! | Surrogate | [`Surrogate`](surrogate::Surrogate) | [`Gp`](surrogate::Gp), [`ThompsonSampling`](surrogate::ThompsonSampling) |
//! | Acquisition | [`Acquisition`](acquisition::Acquisition) | identity, EI, PI, UCB |
//! | Search | [`Solver`](solver::Solver) | [`Nsga2`](solver::Nsga2), [`Moead`](solver::Moead), [`ParEgo`](solver::ParEgo), [`Discovery`](solver::Discovery) |
//! | Batch selection | [`Selection`](selection::Selection) | random, uncertainty, HVI, MOEA/D, DGEMO |
//!
//! The stages are wired together by an [`Algorithm`](registry::Algorithm)
//! preset; see [`registry`] for the table. Any slot can be overridden on the
//! [`MoboBuilder`] with a config or a custom implementation.
//!
//! # Feature Flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `tracing` | Structured log events via [`tracing`](https://docs.rs/tracing), one span per iteration | on |
//! | `serde` | `Serialize`/`Deserialize` on configs, [`Status`], [`Dataset`] and [`Batch`] | off |
//! | `sobol` | [`sobol_samples`](sampling::sobol_samples) initial designs | off |

/// Emit a `tracing::info!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_info {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::debug!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

pub mod acquisition;
mod dataset;
mod error;
mod mobo;
pub mod pareto;
pub mod problem;
pub mod registry;
mod rng_util;
pub mod sampling;
pub mod selection;
pub mod solver;
mod status;
pub mod surrogate;
mod surrogate_problem;
pub mod transformation;
mod types;

pub use dataset::Dataset;
pub use error::{Error, FitStage, Result};
pub use mobo::{Batch, Mobo, MoboBuilder, MoboConfig, PhaseSchedule, Run, RunState};
pub use status::Status;
pub use surrogate_problem::SurrogateProblem;
pub use types::{Bounds, Phase};

/// Convenient wildcard import for the most common types.
///
/// ```
/// use mobo::prelude::*;
/// ```
pub mod prelude {
    pub use crate::acquisition::{Acquisition, AcquisitionConfig, AcquisitionScorer};
    pub use crate::dataset::Dataset;
    pub use crate::error::{Error, FitStage, Result};
    pub use crate::mobo::{Batch, Mobo, MoboBuilder, MoboConfig, PhaseSchedule, Run, RunState};
    pub use crate::problem::{Dtlz2, Evaluation, FnProblem, Problem, Zdt1, Zdt2, Zdt3};
    pub use crate::registry::Algorithm;
    #[cfg(feature = "sobol")]
    pub use crate::sampling::sobol_samples;
    pub use crate::sampling::{evaluate_initial, latin_hypercube, random_samples};
    pub use crate::selection::{Selected, Selection, SelectionConfig, SelectionFit, SelectionInfo};
    pub use crate::solver::{CandidateSet, Solver, SolverConfig};
    pub use crate::status::Status;
    pub use crate::surrogate::{Prediction, Surrogate, SurrogateConfig, SurrogateModel};
    pub use crate::surrogate_problem::SurrogateProblem;
    pub use crate::transformation::{FittedTransform, Transformation};
    pub use crate::types::{Bounds, Phase};
}
