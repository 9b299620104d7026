use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use mobo::prelude::*;

use crate::{CountingMean, initial, quick};

/// Predicts zero everywhere with unit uncertainty.
struct Flat {
    n_obj: usize,
}

impl SurrogateModel for Flat {
    fn n_obj(&self) -> usize {
        self.n_obj
    }

    fn predict(&self, x: &[Vec<f64>]) -> Prediction {
        Prediction {
            mean: vec![vec![0.0; self.n_obj]; x.len()],
            std: vec![vec![1.0; self.n_obj]; x.len()],
        }
    }
}

struct FlatSurrogate;

impl Surrogate for FlatSurrogate {
    fn name(&self) -> &'static str {
        "flat"
    }

    fn fit(&self, _x: &[Vec<f64>], y: &[Vec<f64>]) -> Result<Arc<dyn SurrogateModel>> {
        let n_obj = y.first().map_or(0, Vec::len);
        Ok(Arc::new(Flat { n_obj }))
    }
}

#[test]
fn test_custom_acquisition_serves_both_phases() {
    let fits = Arc::new(AtomicUsize::new(0));
    let problem = Zdt1::new(3);
    let (x, y) = initial(&problem, 5);
    let mut mobo = quick(Algorithm::Rmobo2, 3, 1)
        .phase1_ratio(0.5)
        .acquisition_impl(CountingMean {
            fits: Arc::clone(&fits),
        })
        .build(problem)
        .unwrap();
    assert!(mobo.to_string().contains("# acquisition2: counting-mean"));
    let batches = mobo.solve(x, y).unwrap().collect::<Result<Vec<_>>>().unwrap();
    assert_eq!(batches.len(), 3);
    assert_eq!(fits.load(Ordering::SeqCst), 3);
}

#[test]
fn test_custom_surrogate_drives_the_loop() {
    let problem = Zdt1::new(3);
    let (x, y) = initial(&problem, 5);
    let mut mobo = quick(Algorithm::UsemoEi, 2, 2)
        .surrogate_impl(FlatSurrogate)
        .build(problem)
        .unwrap();
    let mut run = mobo.solve(x, y).unwrap();
    while let Some(batch) = run.step().unwrap() {
        assert_eq!(batch.x.len(), 2);
    }
    assert_eq!(run.dataset().len(), 9);
}

#[test]
fn test_identity_transformation_runs() {
    let problem = Zdt3::new(3);
    let (x, y) = initial(&problem, 6);
    let mut mobo = quick(Algorithm::UsemoEi, 1, 2)
        .transformation(Transformation::Identity)
        .build(problem)
        .unwrap();
    assert!(mobo.to_string().contains("# transformation: identity"));
    let batch = mobo.solve(x, y).unwrap().step().unwrap().unwrap();
    assert_eq!(batch.x.len(), 2);
}

#[test]
fn test_initial_designs_seed_a_run() {
    let problem = Zdt2::new(4);
    let x = random_samples(problem.bounds(), 7, Some(5));
    let (x, y) = evaluate_initial(&problem, x).unwrap();
    let mut mobo = quick(Algorithm::ParEgo, 1, 2).build(problem).unwrap();
    let run = mobo.solve(x, y).unwrap();
    assert_eq!(run.dataset().len(), 7);
    assert_eq!(run.status().n_samples, 7);
}
