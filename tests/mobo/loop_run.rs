use mobo::prelude::*;

use crate::{initial, quick};

#[test]
fn test_archive_grows_by_batch_each_iteration() {
    let problem = Zdt1::new(3);
    let (x, y) = initial(&problem, 6);
    let mut mobo = quick(Algorithm::UsemoEi, 3, 2).build(problem).unwrap();
    let mut run = mobo.solve(x, y).unwrap();

    let mut expected = 6;
    while let Some(batch) = run.step().unwrap() {
        expected += batch.x.len();
        assert_eq!(batch.x.len(), 2);
        assert_eq!(batch.x.len(), batch.y.len());
        assert_eq!(run.dataset().len(), expected);
        assert_eq!(batch.status.n_samples, expected);
        assert_eq!(run.iteration(), batch.iteration + 1);
    }
    assert_eq!(run.dataset().len(), 12);
    assert_eq!(run.state(), RunState::Done);
}

#[test]
fn test_iterator_yields_exactly_n_iter_batches() {
    let problem = Zdt2::new(3);
    let (x, y) = initial(&problem, 5);
    let mut mobo = quick(Algorithm::Rmobo1, 4, 1).build(problem).unwrap();
    let batches: Vec<Batch> = mobo
        .solve(x, y)
        .unwrap()
        .collect::<Result<_>>()
        .unwrap();
    assert_eq!(batches.len(), 4);
    let iterations: Vec<usize> = batches.iter().map(|b| b.iteration).collect();
    assert_eq!(iterations, vec![0, 1, 2, 3]);
}

#[test]
fn test_batches_stay_within_bounds() {
    let bounds = Bounds::new(vec![-2.0, 0.0], vec![2.0, 5.0]).unwrap();
    let problem = FnProblem::new(bounds.clone(), 2, |x: &[f64]| {
        vec![x[0].powi(2) + x[1], (x[0] - 1.0).powi(2) + (5.0 - x[1])]
    });
    let (x, y) = initial(&problem, 6);
    let mut mobo = quick(Algorithm::Tsemo, 2, 3).build(problem).unwrap();
    for batch in mobo.solve(x, y).unwrap() {
        let batch = batch.unwrap();
        assert!(batch.x.iter().all(|row| bounds.contains(row)));
    }
}

#[test]
fn test_hypervolume_never_decreases() {
    let problem = Zdt1::new(4);
    let (x, y) = initial(&problem, 8);
    let mut mobo = quick(Algorithm::Rmobo2, 4, 2).build(problem).unwrap();
    let mut run = mobo.solve(x, y).unwrap();
    let mut last = run.status().hypervolume;
    while let Some(batch) = run.step().unwrap() {
        assert!(batch.status.hypervolume >= last - 1e-12);
        last = batch.status.hypervolume;
    }
}

#[test]
fn test_status_is_recomputed_from_whole_archive() {
    let problem = Zdt1::new(3);
    let (x, y) = initial(&problem, 6);
    let mut mobo = quick(Algorithm::UsemoEi, 2, 2).build(problem).unwrap();
    let mut run = mobo.solve(x, y).unwrap();
    while run.step().unwrap().is_some() {}

    let recomputed = Status::compute(run.dataset(), run.ref_point(), None);
    let status = run.status();
    assert_eq!(recomputed.pareto_indices, status.pareto_indices);
    assert_eq!(recomputed.pareto_y, status.pareto_y);
    assert!((recomputed.hypervolume - status.hypervolume).abs() < 1e-12);
    // ZDT1 has a known front, so the run reports a finite IGD.
    assert!(status.igd.is_finite());
}

#[test]
fn test_zero_iterations_yield_nothing() {
    let problem = Zdt1::new(3);
    let (x, y) = initial(&problem, 5);
    let mut mobo = quick(Algorithm::UsemoEi, 0, 2).build(problem).unwrap();
    let mut run = mobo.solve(x.clone(), y.clone()).unwrap();
    assert!(run.step().unwrap().is_none());
    assert!(run.next().is_none());
    assert_eq!(run.state(), RunState::Done);
    let dataset = run.into_dataset();
    assert_eq!(dataset.x(), x.as_slice());
    assert_eq!(dataset.y(), y.as_slice());
}

#[test]
fn test_advance_walks_every_state() {
    let problem = Zdt1::new(3);
    let (x, y) = initial(&problem, 5);
    let mut mobo = quick(Algorithm::UsemoEi, 1, 1).build(problem).unwrap();
    let mut run = mobo.solve(x, y).unwrap();

    let mut seen = vec![run.state()];
    loop {
        let batch = run.advance().unwrap();
        seen.push(run.state());
        if batch.is_some() || run.state() == RunState::Done {
            break;
        }
    }
    assert_eq!(
        seen,
        vec![
            RunState::Initializing,
            RunState::Fitting,
            RunState::Searching,
            RunState::Selecting,
            RunState::Evaluating,
            RunState::Initializing,
        ]
    );
    run.advance().unwrap();
    assert_eq!(run.state(), RunState::Done);
}

#[test]
fn test_same_seed_same_run() {
    let run_once = || {
        let problem = Zdt1::new(3);
        let (x, y) = initial(&problem, 6);
        let mut mobo = quick(Algorithm::UsemoEi, 2, 2).build(problem).unwrap();
        let mut run = mobo.solve(x, y).unwrap();
        while run.step().unwrap().is_some() {}
        run.into_dataset()
    };
    assert_eq!(run_once(), run_once());
}
