use core::sync::atomic::{AtomicUsize, Ordering};

use mobo::prelude::*;
use mobo::solver::{Nsga2, Nsga2Config};

use crate::{initial, quick};

/// A solver that never finds anything.
struct Barren;

impl Solver for Barren {
    fn name(&self) -> &'static str {
        "barren"
    }

    fn solve(&self, _problem: &SurrogateProblem, _x: &[Vec<f64>], _y: &[Vec<f64>]) -> Result<CandidateSet> {
        Ok(CandidateSet::default())
    }
}

/// A selection that picks nothing.
struct Picky;

impl Selection for Picky {
    fn name(&self) -> &'static str {
        "picky"
    }

    fn select(
        &self,
        _fit: &SelectionFit,
        _candidates: &CandidateSet,
        _model: &dyn SurrogateModel,
        _status: &Status,
        _transform: &FittedTransform,
    ) -> Result<Selected> {
        Ok(Selected {
            x: Vec::new(),
            info: SelectionInfo::default(),
        })
    }
}

/// Fails the first `failures` calls, then delegates to NSGA-II.
struct Flaky {
    failures: usize,
    calls: AtomicUsize,
    inner: Nsga2,
}

impl Solver for Flaky {
    fn name(&self) -> &'static str {
        "flaky"
    }

    fn solve(&self, problem: &SurrogateProblem, x: &[Vec<f64>], y: &[Vec<f64>]) -> Result<CandidateSet> {
        if self.calls.fetch_add(1, Ordering::SeqCst) < self.failures {
            return Err(Error::Solver("transient".into()));
        }
        self.inner.solve(problem, x, y)
    }
}

#[test]
fn test_empty_candidates_leave_dataset_untouched() {
    let problem = Zdt1::new(3);
    let (x, y) = initial(&problem, 5);
    let mut mobo = quick(Algorithm::UsemoEi, 3, 2)
        .solver_impl(Barren)
        .build(problem)
        .unwrap();
    let mut run = mobo.solve(x, y).unwrap();

    let err = run.step().unwrap_err();
    assert!(matches!(err, Error::EmptyCandidates));
    assert_eq!(run.dataset().len(), 5);
    assert_eq!(run.iteration(), 0);
    assert_eq!(run.state(), RunState::Initializing);
}

#[test]
fn test_every_builtin_selection_fails_on_empty_candidates() {
    for selection in [
        SelectionConfig::Random,
        SelectionConfig::Uncertainty,
        SelectionConfig::Hvi,
        SelectionConfig::Moead,
        SelectionConfig::Dgemo,
    ] {
        let problem = Zdt1::new(3);
        let (x, y) = initial(&problem, 5);
        let mut mobo = quick(Algorithm::UsemoEi, 1, 2)
            .solver_impl(Barren)
            .selection(selection)
            .build(problem)
            .unwrap();
        let mut run = mobo.solve(x, y).unwrap();
        assert!(matches!(run.next(), Some(Err(Error::EmptyCandidates))), "{selection:?}");
        assert_eq!(run.dataset().len(), 5);
    }
}

#[test]
fn test_empty_selection_is_an_error() {
    let problem = Zdt1::new(3);
    let (x, y) = initial(&problem, 5);
    let mut mobo = quick(Algorithm::UsemoEi, 1, 2)
        .selection_impl(Picky)
        .build(problem)
        .unwrap();
    let mut run = mobo.solve(x, y).unwrap();
    assert!(matches!(run.step(), Err(Error::EmptyBatch)));
    assert_eq!(run.dataset().len(), 5);
}

#[test]
fn test_failed_iteration_can_be_retried() {
    let problem = Zdt1::new(3);
    let (x, y) = initial(&problem, 5);
    let flaky = Flaky {
        failures: 1,
        calls: AtomicUsize::new(0),
        inner: Nsga2::new(Nsga2Config::default().pop_size(16).n_gen(3), Some(0)),
    };
    let mut mobo = quick(Algorithm::UsemoEi, 2, 1)
        .solver_impl(flaky)
        .build(problem)
        .unwrap();
    let mut run = mobo.solve(x, y).unwrap();

    assert!(matches!(run.step(), Err(Error::Solver(_))));
    assert_eq!(run.iteration(), 0);
    assert_eq!(run.dataset().len(), 5);

    let batch = run.step().unwrap().unwrap();
    assert_eq!(batch.iteration, 0);
    assert_eq!(run.dataset().len(), 6);
    assert!(run.step().unwrap().is_some());
    assert!(run.step().unwrap().is_none());
}

#[test]
fn test_evaluation_failure_appends_nothing() {
    // Declares two objectives but only ever returns one.
    let problem = FnProblem::new(Bounds::unit(2), 2, |x: &[f64]| vec![x[0]]);
    let x = vec![vec![0.0, 0.0], vec![0.5, 0.5], vec![1.0, 1.0]];
    let y = vec![vec![0.0, 1.0], vec![0.5, 0.5], vec![1.0, 0.0]];
    let mut mobo = quick(Algorithm::UsemoEi, 1, 1).build(problem).unwrap();
    let mut run = mobo.solve(x, y).unwrap();
    assert!(matches!(
        run.step(),
        Err(Error::ObjectiveDimensionMismatch { expected: 2, got: 1 })
    ));
    assert_eq!(run.dataset().len(), 3);
    assert_eq!(run.iteration(), 0);
}

#[test]
fn test_custom_preset_requires_every_component() {
    let err = MoboBuilder::new()
        .algorithm(Algorithm::Custom)
        .surrogate(SurrogateConfig::Gp(Default::default()))
        .acquisition(AcquisitionConfig::Ei)
        .selection(SelectionConfig::Random)
        .build(Zdt1::new(3))
        .unwrap_err();
    assert!(matches!(err, Error::MissingComponent("solver")));
}

#[test]
fn test_iterator_stops_after_first_error() {
    let problem = Zdt1::new(3);
    let (x, y) = initial(&problem, 5);
    let mut mobo = quick(Algorithm::UsemoEi, 1, 2)
        .solver_impl(Barren)
        .build(problem)
        .unwrap();
    let mut run = mobo.solve(x, y).unwrap();
    assert!(matches!(run.next(), Some(Err(Error::EmptyCandidates))));
    assert!(run.next().is_none());
    assert_eq!(run.dataset().len(), 5);
}

#[test]
fn test_iterator_yields_a_single_error() {
    let problem = Zdt1::new(3);
    let (x, y) = initial(&problem, 5);
    let mut mobo = quick(Algorithm::UsemoEi, 1, 2)
        .solver_impl(Barren)
        .build(problem)
        .unwrap();
    let run = mobo.solve(x, y).unwrap();
    assert_eq!(run.take(5).count(), 1);
}

#[test]
fn test_step_still_retries_after_iterator_error() {
    let problem = Zdt1::new(3);
    let (x, y) = initial(&problem, 5);
    let flaky = Flaky {
        failures: 1,
        calls: AtomicUsize::new(0),
        inner: Nsga2::new(Nsga2Config::default().pop_size(16).n_gen(3), Some(0)),
    };
    let mut mobo = quick(Algorithm::UsemoEi, 1, 1)
        .solver_impl(flaky)
        .build(problem)
        .unwrap();
    let mut run = mobo.solve(x, y).unwrap();
    assert!(matches!(run.next(), Some(Err(Error::Solver(_)))));
    assert!(run.next().is_none());
    assert!(run.step().unwrap().is_some());
    assert_eq!(run.dataset().len(), 6);
}

#[test]
fn test_non_finite_evaluation_appends_nothing() {
    let problem = FnProblem::new(Bounds::unit(2), 2, |x: &[f64]| vec![f64::NAN, x[1]]);
    let x = vec![vec![0.0, 0.0], vec![0.5, 0.5], vec![1.0, 1.0]];
    let y = vec![vec![0.0, 1.0], vec![0.5, 0.5], vec![1.0, 0.0]];
    let mut mobo = quick(Algorithm::UsemoEi, 2, 1).build(problem).unwrap();
    let mut run = mobo.solve(x, y).unwrap();

    let err = run.step().unwrap_err();
    assert!(matches!(err, Error::Evaluation(_)));
    assert!(!err.is_configuration());
    assert_eq!(run.dataset().len(), 3);
    assert!(run.dataset().y().iter().flatten().all(|v| v.is_finite()));
    assert_eq!(run.iteration(), 0);

    // The archive is still clean, so the next attempt fails at evaluation
    // again rather than at fitting.
    assert!(matches!(run.step(), Err(Error::Evaluation(_))));
}

#[test]
fn test_non_finite_initial_objectives_are_rejected() {
    let problem = Zdt1::new(3);
    let (x, mut y) = initial(&problem, 5);
    y[2][1] = f64::NAN;
    let mut mobo = quick(Algorithm::UsemoEi, 1, 1).build(problem).unwrap();
    let err = mobo.solve(x, y).unwrap_err();
    assert!(matches!(err, Error::NonFiniteObjective { row: 2, obj: 1, .. }));
    assert!(err.is_configuration());
}
