use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::Mobo;
use super::schedule::PhaseSchedule;
use crate::acquisition::{Acquisition, AcquisitionConfig};
use crate::error::{Error, Result};
use crate::problem::Problem;
use crate::registry::{Algorithm, Preset};
use crate::selection::{Selection, SelectionConfig};
use crate::solver::{Solver, SolverConfig};
use crate::surrogate::{Surrogate, SurrogateConfig};
use crate::transformation::Transformation;

/// Plain-data configuration of an optimizer.
///
/// Component fields left as `None` fall back to the preset named by
/// `algorithm`. With the `serde` feature this is the shape an external
/// front end deserializes; missing fields take their defaults.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MoboConfig {
    /// Preset supplying the components not set explicitly.
    pub algorithm: Algorithm,
    /// Number of iterations.
    pub n_iter: usize,
    /// Points evaluated per iteration.
    pub batch_size: usize,
    /// Fraction of iterations using the explore acquisition.
    pub phase1_ratio: f64,
    /// Hypervolume reference point. Derived from the initial data if unset.
    pub ref_point: Option<Vec<f64>>,
    /// Base seed. Each component gets its own offset from it.
    pub seed: Option<u64>,
    /// Normalization applied before fitting.
    pub transformation: Transformation,
    /// Surrogate override.
    pub surrogate: Option<SurrogateConfig>,
    /// Explore acquisition override.
    pub acquisition: Option<AcquisitionConfig>,
    /// Exploit acquisition override.
    pub exploit_acquisition: Option<AcquisitionConfig>,
    /// Solver override.
    pub solver: Option<SolverConfig>,
    /// Selection override.
    pub selection: Option<SelectionConfig>,
}

impl Default for MoboConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            n_iter: 20,
            batch_size: 10,
            phase1_ratio: 1.0,
            ref_point: None,
            seed: None,
            transformation: Transformation::default(),
            surrogate: None,
            acquisition: None,
            exploit_acquisition: None,
            solver: None,
            selection: None,
        }
    }
}

/// Builder for [`Mobo`].
///
/// Components can be given as typed configs or as custom trait objects;
/// a custom object wins over a config for the same slot. Unset slots come
/// from the preset.
///
/// # Examples
///
/// ```
/// use mobo::prelude::*;
///
/// let mobo = MoboBuilder::new()
///     .algorithm(Algorithm::Tsemo)
///     .n_iter(5)
///     .batch_size(2)
///     .seed(42)
///     .build(Zdt1::new(4))
///     .unwrap();
/// assert_eq!(mobo.algorithm(), Algorithm::Tsemo);
/// ```
#[derive(Default)]
pub struct MoboBuilder {
    config: MoboConfig,
    surrogate: Option<Box<dyn Surrogate>>,
    acquisition: Option<Arc<dyn Acquisition>>,
    exploit_acquisition: Option<Arc<dyn Acquisition>>,
    solver: Option<Box<dyn Solver>>,
    selection: Option<Box<dyn Selection>>,
}

impl MoboBuilder {
    /// Creates a builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder from a plain configuration.
    #[must_use]
    pub fn from_config(config: MoboConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// The configuration collected so far.
    #[must_use]
    pub fn config(&self) -> &MoboConfig {
        &self.config
    }

    /// Sets the preset.
    #[must_use]
    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.config.algorithm = algorithm;
        self
    }

    /// Sets the number of iterations.
    #[must_use]
    pub fn n_iter(mut self, n_iter: usize) -> Self {
        self.config.n_iter = n_iter;
        self
    }

    /// Sets the batch size. Must be at least 1.
    #[must_use]
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.config.batch_size = batch_size;
        self
    }

    /// Sets the fraction of iterations using the explore acquisition.
    /// Default: 1.0.
    #[must_use]
    pub fn phase1_ratio(mut self, ratio: f64) -> Self {
        self.config.phase1_ratio = ratio;
        self
    }

    /// Fixes the hypervolume reference point.
    #[must_use]
    pub fn ref_point(mut self, ref_point: Vec<f64>) -> Self {
        self.config.ref_point = Some(ref_point);
        self
    }

    /// Sets the base seed for reproducible runs.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Sets the normalization. Default: [`Transformation::Standard`].
    #[must_use]
    pub fn transformation(mut self, transformation: Transformation) -> Self {
        self.config.transformation = transformation;
        self
    }

    /// Sets the surrogate config.
    #[must_use]
    pub fn surrogate(mut self, config: SurrogateConfig) -> Self {
        self.config.surrogate = Some(config);
        self
    }

    /// Sets the explore acquisition config. Unless set separately, the
    /// exploit acquisition follows it.
    #[must_use]
    pub fn acquisition(mut self, config: AcquisitionConfig) -> Self {
        self.config.acquisition = Some(config);
        self
    }

    /// Sets the exploit acquisition config.
    #[must_use]
    pub fn exploit_acquisition(mut self, config: AcquisitionConfig) -> Self {
        self.config.exploit_acquisition = Some(config);
        self
    }

    /// Sets the solver config.
    #[must_use]
    pub fn solver(mut self, config: SolverConfig) -> Self {
        self.config.solver = Some(config);
        self
    }

    /// Sets the selection config.
    #[must_use]
    pub fn selection(mut self, config: SelectionConfig) -> Self {
        self.config.selection = Some(config);
        self
    }

    /// Uses a custom surrogate.
    #[must_use]
    pub fn surrogate_impl(mut self, surrogate: impl Surrogate + 'static) -> Self {
        self.surrogate = Some(Box::new(surrogate));
        self
    }

    /// Uses a custom explore acquisition.
    #[must_use]
    pub fn acquisition_impl(mut self, acquisition: impl Acquisition + 'static) -> Self {
        self.acquisition = Some(Arc::new(acquisition));
        self
    }

    /// Uses a custom exploit acquisition.
    #[must_use]
    pub fn exploit_acquisition_impl(mut self, acquisition: impl Acquisition + 'static) -> Self {
        self.exploit_acquisition = Some(Arc::new(acquisition));
        self
    }

    /// Uses a custom solver.
    #[must_use]
    pub fn solver_impl(mut self, solver: impl Solver + 'static) -> Self {
        self.solver = Some(Box::new(solver));
        self
    }

    /// Uses a custom selection.
    #[must_use]
    pub fn selection_impl(mut self, selection: impl Selection + 'static) -> Self {
        self.selection = Some(Box::new(selection));
        self
    }

    /// Validates the configuration and builds the optimizer for `problem`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidBatchSize`] for a zero batch size.
    /// - [`Error::InvalidPhaseRatio`] for a ratio outside `[0, 1]`.
    /// - [`Error::InvalidReferencePoint`] if the reference point length is
    ///   not the number of objectives.
    /// - [`Error::MissingComponent`] if the `custom` preset lacks one of
    ///   surrogate, acquisition, solver or selection.
    pub fn build<P: Problem>(self, problem: P) -> Result<Mobo<P>> {
        let Self {
            config,
            surrogate,
            acquisition,
            exploit_acquisition,
            solver,
            selection,
        } = self;

        if config.batch_size == 0 {
            return Err(Error::InvalidBatchSize);
        }
        let schedule = PhaseSchedule::new(config.n_iter, config.phase1_ratio)?;
        if let Some(ref_point) = &config.ref_point
            && ref_point.len() != problem.n_obj()
        {
            return Err(Error::InvalidReferencePoint {
                expected: problem.n_obj(),
                got: ref_point.len(),
            });
        }

        let preset = config.algorithm.preset();
        let seed = |offset: u64| config.seed.map(|s| s.wrapping_add(offset));

        let surrogate = match (surrogate, &config.surrogate) {
            (Some(custom), _) => custom,
            (None, Some(c)) => c.build(seed(1)),
            (None, None) => fallback(preset, "surrogate", |p| p.surrogate.default_config())?
                .build(seed(1)),
        };

        // An explicit explore acquisition carries over to the exploit phase
        // unless the exploit acquisition is also explicit.
        let explicit_explore = acquisition.is_some() || config.acquisition.is_some();
        let acquisition_config = config
            .acquisition
            .or(preset.map(|p| p.acquisition.default_config()));
        let acquisition: Arc<dyn Acquisition> = match (acquisition, acquisition_config) {
            (Some(custom), _) => custom,
            (None, Some(c)) => Arc::from(c.build()),
            (None, None) => return Err(Error::MissingComponent("acquisition")),
        };

        let exploit_acquisition: Arc<dyn Acquisition> =
            match (exploit_acquisition, config.exploit_acquisition) {
                (Some(custom), _) => custom,
                (None, Some(c)) => Arc::from(c.build()),
                (None, None) => match preset {
                    Some(p) if !explicit_explore => {
                        Arc::from(p.exploit_acquisition.default_config().build())
                    }
                    _ => Arc::clone(&acquisition),
                },
            };

        let solver = match (solver, &config.solver) {
            (Some(custom), _) => custom,
            (None, Some(c)) => c.build(seed(2)),
            (None, None) => {
                fallback(preset, "solver", |p| p.solver.default_config())?.build(seed(2))
            }
        };

        let selection = match (selection, config.selection) {
            (Some(custom), _) => custom,
            (None, Some(c)) => c.build(config.batch_size, seed(3)),
            (None, None) => fallback(preset, "selection", |p| p.selection.default_config())?
                .build(config.batch_size, seed(3)),
        };

        trace_info!(
            algorithm = config.algorithm.name(),
            surrogate = surrogate.name(),
            acquisition = acquisition.name(),
            exploit_acquisition = exploit_acquisition.name(),
            solver = solver.name(),
            selection = selection.name(),
            "optimizer built"
        );

        Ok(Mobo {
            problem,
            algorithm: config.algorithm,
            schedule,
            batch_size: config.batch_size,
            ref_point: config.ref_point,
            transformation: config.transformation,
            surrogate,
            acquisition,
            exploit_acquisition,
            solver,
            selection,
        })
    }
}

/// The preset's default for a slot, or `MissingComponent` without a preset.
fn fallback<C>(preset: Option<Preset>, kind: &'static str, f: impl FnOnce(Preset) -> C) -> Result<C> {
    preset.map(f).ok_or(Error::MissingComponent(kind))
}
