#![allow(clippy::cast_precision_loss)]

mod components;
mod failures;
mod loop_run;
mod phases;
mod presets;
mod reference_point;
mod names;
#[cfg(feature = "serde")]
mod serde_config;

use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use mobo::prelude::*;
use mobo::registry::SolverKind;
use mobo::solver::{DiscoveryConfig, MoeadConfig, Nsga2Config, ParEgoConfig};

/// A small, fast solver config of the given kind.
pub(crate) fn fast_solver(kind: SolverKind) -> SolverConfig {
    let nsga2 = Nsga2Config::default().pop_size(16).n_gen(4);
    match kind {
        SolverKind::Nsga2 => SolverConfig::Nsga2(nsga2),
        SolverKind::Moead => SolverConfig::Moead(
            MoeadConfig::default()
                .pop_size(16)
                .n_gen(4)
                .neighborhood_size(4),
        ),
        SolverKind::ParEgo => {
            SolverConfig::ParEgo(ParEgoConfig::default().n_weights(4).pop_size(8).n_gen(4))
        }
        SolverKind::Discovery => {
            SolverConfig::Discovery(DiscoveryConfig::default().nsga2(nsga2).n_local(2))
        }
    }
}

/// A seeded builder with the preset's solver shrunk for test speed.
pub(crate) fn quick(algorithm: Algorithm, n_iter: usize, batch_size: usize) -> MoboBuilder {
    let builder = MoboBuilder::new()
        .algorithm(algorithm)
        .n_iter(n_iter)
        .batch_size(batch_size)
        .seed(7);
    match algorithm.preset() {
        Some(preset) => builder.solver(fast_solver(preset.solver)),
        None => builder,
    }
}

/// A Latin hypercube design of `n` points evaluated on `problem`.
pub(crate) fn initial<P: Problem>(problem: &P, n: usize) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
    let x = latin_hypercube(problem.bounds(), n, Some(1));
    evaluate_initial(problem, x).unwrap()
}

/// Posterior mean acquisition that counts its fits.
pub(crate) struct CountingMean {
    pub(crate) fits: Arc<AtomicUsize>,
}

struct MeanScorer(Arc<dyn SurrogateModel>);

impl AcquisitionScorer for MeanScorer {
    fn evaluate(&self, x: &[Vec<f64>]) -> Vec<Vec<f64>> {
        self.0.predict(x).mean
    }
}

impl Acquisition for CountingMean {
    fn name(&self) -> &'static str {
        "counting-mean"
    }

    fn fit(
        &self,
        _x: &[Vec<f64>],
        _y: &[Vec<f64>],
        model: Arc<dyn SurrogateModel>,
    ) -> Result<Box<dyn AcquisitionScorer>> {
        self.fits.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MeanScorer(model)))
    }
}
