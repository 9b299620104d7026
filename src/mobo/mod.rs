//! The optimization loop.
//!
//! [`MoboBuilder`] assembles an optimizer from a preset and optional
//! component overrides. [`Mobo::solve`] validates the initial data and
//! returns a [`Run`], a lazy sequence that performs one iteration per
//! [`Batch`] it yields.

mod builder;
mod run;
mod schedule;

use core::fmt;
use std::sync::Arc;

pub use self::builder::{MoboBuilder, MoboConfig};
pub use self::run::{Batch, Run, RunState};
pub use self::schedule::PhaseSchedule;
use crate::acquisition::Acquisition;
use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::problem::Problem;
use crate::registry::Algorithm;
use crate::selection::Selection;
use crate::solver::Solver;
use crate::surrogate::Surrogate;
use crate::transformation::Transformation;

/// Number of points sampled from a problem's known front for IGD.
const TRUE_FRONT_POINTS: usize = 500;

/// A surrogate-assisted multi-objective optimizer bound to one problem.
///
/// Build one with [`MoboBuilder`], then call [`solve`](Self::solve) with the
/// initial samples.
pub struct Mobo<P: Problem> {
    problem: P,
    algorithm: Algorithm,
    schedule: PhaseSchedule,
    batch_size: usize,
    ref_point: Option<Vec<f64>>,
    transformation: Transformation,
    surrogate: Box<dyn Surrogate>,
    acquisition: Arc<dyn Acquisition>,
    exploit_acquisition: Arc<dyn Acquisition>,
    solver: Box<dyn Solver>,
    selection: Box<dyn Selection>,
}

impl<P: Problem> Mobo<P> {
    /// The real problem.
    #[must_use]
    pub fn problem(&self) -> &P {
        &self.problem
    }

    /// The preset this optimizer was built from.
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// The explore/exploit schedule.
    #[must_use]
    pub fn schedule(&self) -> PhaseSchedule {
        self.schedule
    }

    /// Points evaluated per iteration.
    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Starts a run from the initial samples.
    ///
    /// All preconditions are checked here, before any iteration runs. The
    /// reference point is fixed now: the configured one, or the
    /// element-wise maximum of `y_init`.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyDataset`] or [`Error::RowCountMismatch`] for empty or
    ///   unequal inputs.
    /// - [`Error::DimensionMismatch`] if a row of `x_init` is not `n_var`
    ///   wide or a row of `y_init` is not `n_obj` wide.
    /// - [`Error::OutOfBounds`] if a decision value lies outside the bounds.
    /// - [`Error::NonFiniteObjective`] if an objective value is NaN or
    ///   infinite.
    pub fn solve(&mut self, x_init: Vec<Vec<f64>>, y_init: Vec<Vec<f64>>) -> Result<Run<'_, P>> {
        self.problem.bounds().check_rows(&x_init)?;
        let n_obj = self.problem.n_obj();
        if let Some((row, yi)) = y_init.iter().enumerate().find(|(_, yi)| yi.len() != n_obj) {
            return Err(Error::DimensionMismatch {
                what: "objective vectors",
                expected: n_obj,
                got: yi.len(),
                row,
            });
        }
        for (row, yi) in y_init.iter().enumerate() {
            if let Some((obj, &value)) = yi.iter().enumerate().find(|(_, v)| !v.is_finite()) {
                return Err(Error::NonFiniteObjective { row, obj, value });
            }
        }
        let dataset = Dataset::new(x_init, y_init)?;

        let ref_point = match &self.ref_point {
            Some(r) => r.clone(),
            None => dataset.max_objectives(),
        };
        let true_front = self.problem.pareto_front(TRUE_FRONT_POINTS);

        trace_info!(
            n_samples = dataset.len(),
            n_iter = self.schedule.n_iter(),
            ref_point = ?ref_point,
            "run started"
        );

        Ok(Run::new(self, dataset, ref_point, true_front))
    }
}

impl<P: Problem> fmt::Display for Mobo<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "========== Framework Description ==========")?;
        writeln!(f, "# algorithm: {}", self.algorithm)?;
        writeln!(f, "# transformation: {}", self.transformation.name())?;
        writeln!(f, "# surrogate: {}", self.surrogate.name())?;
        writeln!(
            f,
            "# acquisition1: {} {} iterations",
            self.acquisition.name(),
            self.schedule.explore_iters()
        )?;
        writeln!(
            f,
            "# acquisition2: {} {} iterations",
            self.exploit_acquisition.name(),
            self.schedule.exploit_iters()
        )?;
        writeln!(f, "# solver: {}", self.solver.name())?;
        writeln!(f, "# selection: {}", self.selection.name())
    }
}

impl<P: Problem> fmt::Debug for Mobo<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mobo")
            .field("algorithm", &self.algorithm)
            .field("schedule", &self.schedule)
            .field("batch_size", &self.batch_size)
            .field("ref_point", &self.ref_point)
            .field("surrogate", &self.surrogate.name())
            .field("acquisition", &self.acquisition.name())
            .field("exploit_acquisition", &self.exploit_acquisition.name())
            .field("solver", &self.solver.name())
            .field("selection", &self.selection.name())
            .finish_non_exhaustive()
    }
}
