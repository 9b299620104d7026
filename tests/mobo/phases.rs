use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use mobo::prelude::*;

use crate::{CountingMean, initial, quick};

#[test]
fn test_phase_boundary_from_ratio() {
    let problem = Zdt1::new(3);
    let (x, y) = initial(&problem, 5);
    let mut mobo = quick(Algorithm::Rmobo2, 3, 1)
        .phase1_ratio(0.34)
        .build(problem)
        .unwrap();
    assert_eq!(mobo.schedule().boundary(), 1);

    let phases: Vec<Phase> = mobo
        .solve(x, y)
        .unwrap()
        .map(|b| b.unwrap().phase)
        .collect();
    assert_eq!(phases, vec![Phase::Explore, Phase::Exploit, Phase::Exploit]);
}

#[test]
fn test_exploit_iterations_fit_the_exploit_acquisition() {
    let explore = Arc::new(AtomicUsize::new(0));
    let exploit = Arc::new(AtomicUsize::new(0));
    let problem = Zdt1::new(3);
    let (x, y) = initial(&problem, 5);
    let mut mobo = quick(Algorithm::Rmobo2, 3, 1)
        .phase1_ratio(0.34)
        .acquisition_impl(CountingMean {
            fits: Arc::clone(&explore),
        })
        .exploit_acquisition_impl(CountingMean {
            fits: Arc::clone(&exploit),
        })
        .build(problem)
        .unwrap();

    let mut run = mobo.solve(x, y).unwrap();
    let first = run.step().unwrap().unwrap();
    assert_eq!(first.phase, Phase::Explore);
    assert_eq!(explore.load(Ordering::SeqCst), 1);
    assert_eq!(exploit.load(Ordering::SeqCst), 0);

    while run.step().unwrap().is_some() {}
    assert_eq!(explore.load(Ordering::SeqCst), 1);
    assert_eq!(exploit.load(Ordering::SeqCst), 2);
}

#[test]
fn test_default_ratio_never_exploits() {
    let problem = Zdt1::new(3);
    let (x, y) = initial(&problem, 5);
    let mut mobo = quick(Algorithm::Rmobo2, 2, 1).build(problem).unwrap();
    assert!((mobo.schedule().phase1_ratio() - 1.0).abs() < f64::EPSILON);
    for batch in mobo.solve(x, y).unwrap() {
        assert_eq!(batch.unwrap().phase, Phase::Explore);
    }
}

#[test]
fn test_run_schedule_matches_optimizer() {
    let problem = Zdt1::new(3);
    let (x, y) = initial(&problem, 5);
    let mut mobo = quick(Algorithm::Rmobo2, 6, 1)
        .phase1_ratio(0.5)
        .build(problem)
        .unwrap();
    let schedule = mobo.schedule();
    let run = mobo.solve(x, y).unwrap();
    assert_eq!(run.schedule(), schedule);
    assert_eq!(schedule.explore_iters(), 3);
    assert_eq!(schedule.exploit_iters(), 3);
}

#[test]
fn test_invalid_ratio_is_rejected_by_builder() {
    for ratio in [-0.01, 1.01, f64::NAN] {
        let err = MoboBuilder::new()
            .phase1_ratio(ratio)
            .build(Zdt1::new(3))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPhaseRatio(_)));
        assert!(err.is_configuration());
    }
}
