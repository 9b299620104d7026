use core::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::Mobo;
use super::schedule::PhaseSchedule;
use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::problem::Problem;
use crate::selection::{Selected, SelectionInfo};
use crate::solver::CandidateSet;
use crate::status::Status;
use crate::surrogate::SurrogateModel;
use crate::surrogate_problem::SurrogateProblem;
use crate::transformation::FittedTransform;
use crate::types::Phase;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// The outcome of one completed iteration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Batch {
    /// Zero-based iteration index.
    pub iteration: usize,
    /// Phase the iteration ran in.
    pub phase: Phase,
    /// Evaluated decision vectors, in real units.
    pub x: Vec<Vec<f64>>,
    /// Their objective values.
    pub y: Vec<Vec<f64>>,
    /// What the selection picked and why.
    pub info: SelectionInfo,
    /// Status after the batch was appended.
    pub status: Status,
}

/// Where a [`Run`] stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RunState {
    /// Ready to start the next iteration.
    Initializing,
    /// About to fit the transformation, surrogate and acquisition.
    Fitting,
    /// About to solve the surrogate problem.
    Searching,
    /// About to select a batch from the candidates.
    Selecting,
    /// About to evaluate the selected batch on the real problem.
    Evaluating,
    /// All iterations are complete.
    Done,
}

/// A single pass over the optimization loop.
///
/// Each call to [`step`](Self::step) (or [`Iterator::next`]) runs one
/// iteration and returns its [`Batch`]. Exactly `n_iter` batches are
/// produced. The run owns the archive; dropping it mid-way keeps only
/// completed iterations in [`dataset`](Self::dataset).
///
/// An error from any stage aborts the current iteration: nothing is
/// appended, the iteration counter stays put and the run returns to
/// [`RunState::Initializing`]. As an [`Iterator`] the run is fused on the
/// first error: it yields that `Err` once and then `None`. Calling `step`
/// directly retries the same iteration instead.
pub struct Run<'a, P: Problem> {
    mobo: &'a mut Mobo<P>,
    dataset: Dataset,
    ref_point: Vec<f64>,
    true_front: Option<Vec<Vec<f64>>>,
    status: Status,
    iteration: usize,
    stage: Stage,
    failed: bool,
}

impl<'a, P: Problem> Run<'a, P> {
    pub(super) fn new(
        mobo: &'a mut Mobo<P>,
        dataset: Dataset,
        ref_point: Vec<f64>,
        true_front: Option<Vec<Vec<f64>>>,
    ) -> Self {
        let status = Status::compute(&dataset, &ref_point, true_front.as_deref());
        Self {
            mobo,
            dataset,
            ref_point,
            true_front,
            status,
            iteration: 0,
            stage: Stage::Initializing,
            failed: false,
        }
    }

    /// The archive of every sample evaluated so far.
    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Consumes the run and returns its archive.
    #[must_use]
    pub fn into_dataset(self) -> Dataset {
        self.dataset
    }

    /// Status of the current archive.
    #[must_use]
    pub fn status(&self) -> &Status {
        &self.status
    }

    /// The hypervolume reference point, fixed for the whole run.
    #[must_use]
    pub fn ref_point(&self) -> &[f64] {
        &self.ref_point
    }

    /// Number of completed iterations.
    #[must_use]
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// The explore/exploit schedule.
    #[must_use]
    pub fn schedule(&self) -> PhaseSchedule {
        self.mobo.schedule
    }

    /// Where the state machine stands.
    #[must_use]
    pub fn state(&self) -> RunState {
        match self.stage {
            Stage::Initializing => RunState::Initializing,
            Stage::Fitting { .. } => RunState::Fitting,
            Stage::Searching { .. } => RunState::Searching,
            Stage::Selecting { .. } => RunState::Selecting,
            Stage::Evaluating { .. } => RunState::Evaluating,
            Stage::Done => RunState::Done,
        }
    }

    /// Runs one full iteration.
    ///
    /// Returns `Ok(None)` once all iterations are done.
    ///
    /// # Errors
    ///
    /// Returns the error of the stage that failed. The run is left ready to
    /// retry the same iteration.
    pub fn step(&mut self) -> Result<Option<Batch>> {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!(
            "iteration",
            i = self.iteration,
            phase = ?self.mobo.schedule.phase(self.iteration)
        )
        .entered();

        loop {
            if let Some(batch) = self.advance()? {
                return Ok(Some(batch));
            }
            if matches!(self.stage, Stage::Done) {
                return Ok(None);
            }
        }
    }

    /// Performs exactly one state transition.
    ///
    /// Returns the batch when the transition completes an iteration.
    ///
    /// # Errors
    ///
    /// Returns the error of the stage that failed. The run goes back to
    /// [`RunState::Initializing`] without advancing the iteration counter.
    pub fn advance(&mut self) -> Result<Option<Batch>> {
        match core::mem::replace(&mut self.stage, Stage::Initializing) {
            Stage::Initializing => {
                self.stage = if self.iteration < self.mobo.schedule.n_iter() {
                    Stage::Fitting {
                        phase: self.mobo.schedule.phase(self.iteration),
                    }
                } else {
                    trace_info!(n_samples = self.dataset.len(), "run finished");
                    Stage::Done
                };
                Ok(None)
            }
            Stage::Fitting { phase } => {
                let fitted = self.fit(phase)?;
                self.stage = Stage::Searching { phase, fitted };
                Ok(None)
            }
            Stage::Searching { phase, fitted } => {
                let candidates = self.mobo.solver.solve(&fitted.problem, &fitted.x, &fitted.y)?;
                trace_debug!(
                    solver = self.mobo.solver.name(),
                    n_candidates = candidates.len(),
                    "surrogate problem solved"
                );
                self.stage = Stage::Selecting {
                    phase,
                    fitted,
                    candidates,
                };
                Ok(None)
            }
            Stage::Selecting {
                phase,
                fitted,
                candidates,
            } => {
                let selection = &self.mobo.selection;
                let fit = selection.fit(&fitted.x, &fitted.y, &self.ref_point);
                let selected = selection.select(
                    &fit,
                    &candidates,
                    fitted.model.as_ref(),
                    &self.status,
                    &fitted.transform,
                )?;
                if selected.x.is_empty() {
                    return Err(Error::EmptyBatch);
                }
                trace_debug!(
                    selection = selection.name(),
                    n_selected = selected.x.len(),
                    "next sample batch selected"
                );
                self.stage = Stage::Evaluating {
                    phase,
                    transform: fitted.transform,
                    selected,
                };
                Ok(None)
            }
            Stage::Evaluating {
                phase,
                transform,
                selected,
            } => {
                let batch = self.evaluate(phase, &transform, selected)?;
                self.iteration += 1;
                Ok(Some(batch))
            }
            Stage::Done => {
                self.stage = Stage::Done;
                Ok(None)
            }
        }
    }

    fn fit(&self, phase: Phase) -> Result<Fitted> {
        let mobo = &*self.mobo;
        let transform = mobo.transformation.fit(
            mobo.problem.bounds(),
            self.dataset.x(),
            self.dataset.y(),
        )?;
        let (x, y) = transform.apply(self.dataset.x(), self.dataset.y());

        let model = mobo.surrogate.fit(&x, &y)?;
        trace_debug!(surrogate = mobo.surrogate.name(), n_train = x.len(), "surrogate model fitted");

        let acquisition = match phase {
            Phase::Explore => &mobo.acquisition,
            Phase::Exploit => &mobo.exploit_acquisition,
        };
        let scorer = acquisition.fit(&x, &y, Arc::clone(&model))?;
        trace_debug!(acquisition = acquisition.name(), "acquisition fitted");

        let problem = SurrogateProblem::new(
            transform.x_bounds().clone(),
            mobo.problem.n_obj(),
            mobo.problem.n_constr(),
            scorer,
        );
        Ok(Fitted {
            transform,
            x,
            y,
            model,
            problem,
        })
    }

    fn evaluate(&mut self, phase: Phase, transform: &FittedTransform, selected: Selected) -> Result<Batch> {
        let problem = &self.mobo.problem;
        let bounds = problem.bounds();
        let x: Vec<Vec<f64>> = transform
            .undo_x(&selected.x)
            .iter()
            .map(|row| bounds.clamp(row))
            .collect();

        // Constraint values are not tracked.
        let y = problem.evaluate(&x)?.objectives;
        if y.len() != x.len() {
            return Err(Error::Evaluation(format!(
                "evaluator returned {} rows for a batch of {}",
                y.len(),
                x.len()
            )));
        }
        let n_obj = problem.n_obj();
        if let Some(row) = y.iter().find(|row| row.len() != n_obj) {
            return Err(Error::ObjectiveDimensionMismatch {
                expected: n_obj,
                got: row.len(),
            });
        }
        if let Some(row) = y.iter().position(|row| row.iter().any(|v| !v.is_finite())) {
            return Err(Error::Evaluation(format!(
                "non-finite objective values {:?} for row {row} of the batch",
                y[row]
            )));
        }

        self.dataset.append(x.clone(), y.clone())?;
        self.status = Status::compute(&self.dataset, &self.ref_point, self.true_front.as_deref());

        trace_info!(
            total_evaluations = self.status.n_samples,
            hypervolume = self.status.hypervolume,
            igd = self.status.igd,
            "new samples evaluated"
        );

        Ok(Batch {
            iteration: self.iteration,
            phase,
            x,
            y,
            info: selected.info,
            status: self.status.clone(),
        })
    }
}

impl<P: Problem> Iterator for Run<'_, P> {
    type Item = Result<Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let item = self.step().transpose();
        self.failed = matches!(item, Some(Err(_)));
        item
    }
}

impl<P: Problem> core::iter::FusedIterator for Run<'_, P> {}

impl<P: Problem> fmt::Debug for Run<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Run")
            .field("iteration", &self.iteration)
            .field("state", &self.state())
            .field("n_samples", &self.dataset.len())
            .field("ref_point", &self.ref_point)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Internal state
// ---------------------------------------------------------------------------

/// Everything fitted at the start of an iteration.
struct Fitted {
    transform: FittedTransform,
    x: Vec<Vec<f64>>,
    y: Vec<Vec<f64>>,
    model: Arc<dyn SurrogateModel>,
    problem: SurrogateProblem,
}

enum Stage {
    Initializing,
    Fitting {
        phase: Phase,
    },
    Searching {
        phase: Phase,
        fitted: Fitted,
    },
    Selecting {
        phase: Phase,
        fitted: Fitted,
        candidates: CandidateSet,
    },
    Evaluating {
        phase: Phase,
        transform: FittedTransform,
        selected: Selected,
    },
    Done,
}
