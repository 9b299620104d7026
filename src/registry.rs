//! Named algorithm presets and component kinds.
//!
//! Every lookup is a `match` over a closed set. Unknown names fail with
//! [`Error::UnknownAlgorithm`] or [`Error::UnknownComponent`], naming the
//! key that did not resolve.
//!
//! | Preset | Surrogate | Acquisition (explore) | Acquisition (exploit) | Solver | Selection |
//! |--------|-----------|-----------------------|-----------------------|--------|-----------|
//! | `dgemo` | gp | identity | identity | discovery | dgemo |
//! | `tsemo` | ts | identity | identity | nsga2 | hvi |
//! | `usemo-ei` | gp | ei | ei | nsga2 | uncertainty |
//! | `moead-ego` | gp | ei | ei | moead | moead |
//! | `parego` | gp | ei | ei | parego | random |
//! | `rmobo1` | gp | pi | pi | nsga2 | uncertainty |
//! | `rmobo2` | gp | ei | pi | nsga2 | uncertainty |
//! | `custom` | – | – | – | – | – |

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::acquisition::AcquisitionConfig;
use crate::error::{Error, Result};
use crate::selection::SelectionConfig;
use crate::solver::{DiscoveryConfig, MoeadConfig, Nsga2Config, ParEgoConfig, SolverConfig};
use crate::surrogate::{GpConfig, SurrogateConfig, ThompsonSamplingConfig};

// ---------------------------------------------------------------------------
// Algorithm presets
// ---------------------------------------------------------------------------

/// A named algorithm preset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Algorithm {
    /// Diversity-guided efficient multi-objective optimization.
    Dgemo,
    /// Thompson sampling efficient multi-objective optimization.
    Tsemo,
    /// Uncertainty-aware search with expected improvement.
    UsemoEi,
    /// MOEA/D with efficient global optimization.
    MoeadEgo,
    /// Random-weight scalarized EGO.
    #[cfg_attr(feature = "serde", serde(rename = "parego"))]
    ParEgo,
    /// Probability-of-improvement variant of USeMO.
    Rmobo1,
    /// Explore with EI, then exploit with PI.
    #[default]
    Rmobo2,
    /// No defaults: every component must be supplied.
    Custom,
}

/// The component kinds an [`Algorithm`] preset expands to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Preset {
    /// Surrogate model.
    pub surrogate: SurrogateKind,
    /// Acquisition used before the phase boundary.
    pub acquisition: AcquisitionKind,
    /// Acquisition used from the phase boundary on.
    pub exploit_acquisition: AcquisitionKind,
    /// Surrogate-problem solver.
    pub solver: SolverKind,
    /// Batch selection.
    pub selection: SelectionKind,
}

impl Algorithm {
    /// Every preset, in registry order.
    pub const ALL: [Self; 8] = [
        Self::Dgemo,
        Self::Tsemo,
        Self::UsemoEi,
        Self::MoeadEgo,
        Self::ParEgo,
        Self::Rmobo1,
        Self::Rmobo2,
        Self::Custom,
    ];

    /// Look a preset up by name.
    ///
    /// `R1` and `R2` are accepted as aliases of `rmobo1` and `rmobo2`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownAlgorithm`] carrying `name` if it is not a
    /// registered preset.
    pub fn resolve(name: &str) -> Result<Self> {
        match name {
            "dgemo" => Ok(Self::Dgemo),
            "tsemo" => Ok(Self::Tsemo),
            "usemo-ei" => Ok(Self::UsemoEi),
            "moead-ego" => Ok(Self::MoeadEgo),
            "parego" => Ok(Self::ParEgo),
            "rmobo1" | "R1" => Ok(Self::Rmobo1),
            "rmobo2" | "R2" => Ok(Self::Rmobo2),
            "custom" => Ok(Self::Custom),
            _ => Err(Error::UnknownAlgorithm(name.to_string())),
        }
    }

    /// The registry name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Dgemo => "dgemo",
            Self::Tsemo => "tsemo",
            Self::UsemoEi => "usemo-ei",
            Self::MoeadEgo => "moead-ego",
            Self::ParEgo => "parego",
            Self::Rmobo1 => "rmobo1",
            Self::Rmobo2 => "rmobo2",
            Self::Custom => "custom",
        }
    }

    /// The default components, or `None` for [`Algorithm::Custom`].
    #[must_use]
    pub fn preset(self) -> Option<Preset> {
        use AcquisitionKind as A;
        use SelectionKind as Sel;
        use SolverKind as Sol;
        use SurrogateKind as Sur;

        let (surrogate, acquisition, exploit_acquisition, solver, selection) = match self {
            Self::Dgemo => (Sur::Gp, A::Identity, A::Identity, Sol::Discovery, Sel::Dgemo),
            Self::Tsemo => (Sur::ThompsonSampling, A::Identity, A::Identity, Sol::Nsga2, Sel::Hvi),
            Self::UsemoEi => (Sur::Gp, A::Ei, A::Ei, Sol::Nsga2, Sel::Uncertainty),
            Self::MoeadEgo => (Sur::Gp, A::Ei, A::Ei, Sol::Moead, Sel::Moead),
            Self::ParEgo => (Sur::Gp, A::Ei, A::Ei, Sol::ParEgo, Sel::Random),
            Self::Rmobo1 => (Sur::Gp, A::Pi, A::Pi, Sol::Nsga2, Sel::Uncertainty),
            Self::Rmobo2 => (Sur::Gp, A::Ei, A::Pi, Sol::Nsga2, Sel::Uncertainty),
            Self::Custom => return None,
        };
        Some(Preset {
            surrogate,
            acquisition,
            exploit_acquisition,
            solver,
            selection,
        })
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::resolve(s)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Component kinds
// ---------------------------------------------------------------------------

macro_rules! component_kind {
    (
        $(#[$meta:meta])*
        $name:ident, $family:literal {
            $($(#[$vmeta:meta])* $variant:ident => $key:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl $name {
            /// Every kind, in registry order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+];

            /// The registry name.
            #[must_use]
            pub fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $key,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($key => Ok(Self::$variant),)+
                    _ => Err(Error::UnknownComponent {
                        kind: $family,
                        name: s.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

component_kind! {
    /// Built-in surrogate models.
    SurrogateKind, "surrogate" {
        /// Gaussian process.
        Gp => "gp",
        /// Thompson sampling.
        ThompsonSampling => "ts",
    }
}

component_kind! {
    /// Built-in acquisition functions.
    AcquisitionKind, "acquisition" {
        /// Posterior mean.
        Identity => "identity",
        /// Expected improvement.
        Ei => "ei",
        /// Probability of improvement.
        Pi => "pi",
        /// Lower confidence bound.
        Ucb => "ucb",
    }
}

component_kind! {
    /// Built-in surrogate-problem solvers.
    SolverKind, "solver" {
        /// NSGA-II.
        Nsga2 => "nsga2",
        /// MOEA/D.
        Moead => "moead",
        /// ParEGO scalarizations.
        ParEgo => "parego",
        /// Pareto discovery.
        Discovery => "discovery",
    }
}

component_kind! {
    /// Built-in batch selections.
    SelectionKind, "selection" {
        /// Uniform random.
        Random => "random",
        /// Largest predictive uncertainty.
        Uncertainty => "uncertainty",
        /// Greedy hypervolume improvement.
        Hvi => "hvi",
        /// Best per decomposition group.
        Moead => "moead",
        /// Family-diverse hypervolume improvement.
        Dgemo => "dgemo",
    }
}

impl SurrogateKind {
    /// Default configuration of this kind.
    #[must_use]
    pub fn default_config(self) -> SurrogateConfig {
        match self {
            Self::Gp => SurrogateConfig::Gp(GpConfig::default()),
            Self::ThompsonSampling => {
                SurrogateConfig::ThompsonSampling(ThompsonSamplingConfig::default())
            }
        }
    }
}

impl AcquisitionKind {
    /// Default configuration of this kind. UCB uses `beta = 2`.
    #[must_use]
    pub fn default_config(self) -> AcquisitionConfig {
        match self {
            Self::Identity => AcquisitionConfig::Identity,
            Self::Ei => AcquisitionConfig::Ei,
            Self::Pi => AcquisitionConfig::Pi,
            Self::Ucb => AcquisitionConfig::Ucb { beta: 2.0 },
        }
    }
}

impl SolverKind {
    /// Default configuration of this kind.
    #[must_use]
    pub fn default_config(self) -> SolverConfig {
        match self {
            Self::Nsga2 => SolverConfig::Nsga2(Nsga2Config::default()),
            Self::Moead => SolverConfig::Moead(MoeadConfig::default()),
            Self::ParEgo => SolverConfig::ParEgo(ParEgoConfig::default()),
            Self::Discovery => SolverConfig::Discovery(DiscoveryConfig::default()),
        }
    }
}

impl SelectionKind {
    /// Default configuration of this kind.
    #[must_use]
    pub fn default_config(self) -> SelectionConfig {
        match self {
            Self::Random => SelectionConfig::Random,
            Self::Uncertainty => SelectionConfig::Uncertainty,
            Self::Hvi => SelectionConfig::Hvi,
            Self::Moead => SelectionConfig::Moead,
            Self::Dgemo => SelectionConfig::Dgemo,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_every_name() {
        for algo in Algorithm::ALL {
            assert_eq!(Algorithm::resolve(algo.name()).unwrap(), algo);
            assert_eq!(algo.to_string().parse::<Algorithm>().unwrap(), algo);
        }
        assert_eq!(Algorithm::resolve("R2").unwrap(), Algorithm::Rmobo2);
    }

    #[test]
    fn test_unknown_algorithm_names_key() {
        let err = Algorithm::resolve("unknown-xyz").unwrap_err();
        assert!(matches!(&err, Error::UnknownAlgorithm(name) if name == "unknown-xyz"));
        assert!(err.to_string().contains("unknown-xyz"));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_presets() {
        assert!(Algorithm::Custom.preset().is_none());
        let r2 = Algorithm::Rmobo2.preset().unwrap();
        assert_eq!(r2.acquisition, AcquisitionKind::Ei);
        assert_eq!(r2.exploit_acquisition, AcquisitionKind::Pi);
        let tsemo = Algorithm::Tsemo.preset().unwrap();
        assert_eq!(tsemo.surrogate, SurrogateKind::ThompsonSampling);
        assert_eq!(tsemo.selection, SelectionKind::Hvi);
    }

    #[test]
    fn test_component_kinds_parse() {
        for kind in SolverKind::ALL {
            assert_eq!(kind.name().parse::<SolverKind>().unwrap(), *kind);
            assert_eq!(kind.default_config().kind(), *kind);
        }
        for kind in SelectionKind::ALL {
            assert_eq!(kind.default_config().kind(), *kind);
        }
        for kind in AcquisitionKind::ALL {
            assert_eq!(kind.default_config().kind(), *kind);
        }
        for kind in SurrogateKind::ALL {
            assert_eq!(kind.default_config().kind(), *kind);
        }
        let err = "kriging".parse::<SurrogateKind>().unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownComponent {
                kind: "surrogate",
                ..
            }
        ));
    }
}
