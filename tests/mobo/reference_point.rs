use mobo::pareto;
use mobo::prelude::*;

use crate::quick;

fn five_points() -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
    let x = vec![
        vec![0.1, 0.2],
        vec![0.3, 0.9],
        vec![0.5, 0.5],
        vec![0.8, 0.1],
        vec![0.9, 0.7],
    ];
    let y = vec![
        vec![1.0, 4.0],
        vec![2.0, 3.5],
        vec![3.0, 0.8],
        vec![0.5, 5.0],
        vec![2.5, 1.0],
    ];
    (x, y)
}

fn problem() -> FnProblem<impl Fn(&[f64]) -> Vec<f64>> {
    FnProblem::new(Bounds::unit(2), 2, |x: &[f64]| {
        vec![x[0] * 3.0, (1.0 - x[0]) * 5.0 + x[1]]
    })
}

#[test]
fn test_reference_point_is_max_of_initial_objectives() {
    let (x, y) = five_points();
    let mut mobo = quick(Algorithm::UsemoEi, 2, 2).build(problem()).unwrap();
    let mut run = mobo.solve(x, y).unwrap();
    assert_eq!(run.ref_point(), &[3.0, 5.0]);
    while run.step().unwrap().is_some() {
        assert_eq!(run.ref_point(), &[3.0, 5.0]);
    }
}

#[test]
fn test_reference_point_ignores_later_maxima() {
    let (x, y) = five_points();
    // Every evaluation lands above the initial maximum of objective 2.
    let problem = FnProblem::new(Bounds::unit(2), 2, |x: &[f64]| vec![x[0] * 3.0, 10.0 + x[1]]);
    let mut mobo = quick(Algorithm::UsemoEi, 2, 2).build(problem).unwrap();
    let mut run = mobo.solve(x, y).unwrap();
    let hv_before = run.status().hypervolume;

    while run.step().unwrap().is_some() {}

    assert_eq!(run.dataset().len(), 9);
    assert!(run.dataset().y()[5..].iter().all(|yi| yi[1] >= 10.0));
    assert_eq!(run.ref_point(), &[3.0, 5.0]);
    assert!(run.dataset().max_objectives()[1] > run.ref_point()[1]);
    // Points beyond the frozen reference add nothing.
    assert!((run.status().hypervolume - hv_before).abs() < 1e-12);
}

#[test]
fn test_configured_reference_point_is_kept() {
    let (x, y) = five_points();
    let mut mobo = quick(Algorithm::UsemoEi, 1, 2)
        .ref_point(vec![10.0, 10.0])
        .build(problem())
        .unwrap();
    let mut run = mobo.solve(x, y).unwrap();
    assert_eq!(run.ref_point(), &[10.0, 10.0]);
    run.step().unwrap();
    assert_eq!(run.ref_point(), &[10.0, 10.0]);
}

#[test]
fn test_initial_status_uses_frozen_reference_point() {
    let (x, y) = five_points();
    let mut mobo = quick(Algorithm::UsemoEi, 1, 1).build(problem()).unwrap();
    let run = mobo.solve(x, y.clone()).unwrap();
    let expected = pareto::hypervolume(&run.status().pareto_y, &[3.0, 5.0]);
    assert!((run.status().hypervolume - expected).abs() < 1e-12);
    // Every initial point is non-dominated here.
    assert_eq!(run.status().pareto_indices.len(), y.len());
}
