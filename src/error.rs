use core::fmt;

/// The pipeline stage whose fit failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FitStage {
    /// Normalization of decision and objective values.
    Transformation,
    /// Surrogate model fitting.
    Surrogate,
    /// Acquisition function fitting.
    Acquisition,
}

impl fmt::Display for FitStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transformation => write!(f, "transformation"),
            Self::Surrogate => write!(f, "surrogate"),
            Self::Acquisition => write!(f, "acquisition"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when an algorithm preset name is not in the registry.
    #[error("unknown algorithm preset: '{0}'")]
    UnknownAlgorithm(String),

    /// Returned when a component name is not in its registry.
    #[error("unknown {kind} component: '{name}'")]
    UnknownComponent {
        /// The component family (surrogate, acquisition, solver, selection).
        kind: &'static str,
        /// The name that failed to resolve.
        name: String,
    },

    /// Returned when the `custom` preset is built without a required component.
    #[error("the custom algorithm requires an explicit {0} component")]
    MissingComponent(&'static str),

    /// Returned when the phase-1 ratio is outside `[0, 1]`.
    #[error("invalid phase1 ratio: {0} must be in [0.0, 1.0]")]
    InvalidPhaseRatio(f64),

    /// Returned when the batch size is zero.
    #[error("invalid batch size: must be at least 1")]
    InvalidBatchSize,

    /// Returned when the lower bound is greater than the upper bound.
    #[error("invalid bounds for variable {index}: low ({low}) must be less than or equal to high ({high})")]
    InvalidBounds {
        /// The variable index.
        index: usize,
        /// The lower bound value.
        low: f64,
        /// The upper bound value.
        high: f64,
    },

    /// Returned when a dataset or batch has no rows.
    #[error("dataset must contain at least one sample")]
    EmptyDataset,

    /// Returned when decision and objective matrices have different row counts.
    #[error("row count mismatch: {x} decision rows but {y} objective rows")]
    RowCountMismatch {
        /// Number of decision vectors.
        x: usize,
        /// Number of objective vectors.
        y: usize,
    },

    /// Returned when a row has the wrong width.
    #[error("dimension mismatch in {what}: expected {expected} columns but row {row} has {got}")]
    DimensionMismatch {
        /// Which matrix was being checked.
        what: &'static str,
        /// The expected row width.
        expected: usize,
        /// The actual row width.
        got: usize,
        /// The offending row.
        row: usize,
    },

    /// Returned when an initial decision vector lies outside the problem bounds.
    #[error("decision value {value} of row {row}, variable {var} lies outside [{low}, {high}]")]
    OutOfBounds {
        /// The offending row.
        row: usize,
        /// The offending variable.
        var: usize,
        /// The value found.
        value: f64,
        /// Lower bound of the variable.
        low: f64,
        /// Upper bound of the variable.
        high: f64,
    },

    /// Returned when an initial objective value is NaN or infinite.
    #[error("objective value {value} of row {row}, objective {obj} is not finite")]
    NonFiniteObjective {
        /// The offending row.
        row: usize,
        /// The offending objective.
        obj: usize,
        /// The value found.
        value: f64,
    },

    /// Returned when an explicit reference point has the wrong length.
    #[error("reference point has {got} entries but the problem has {expected} objectives")]
    InvalidReferencePoint {
        /// Number of objectives.
        expected: usize,
        /// Length of the supplied reference point.
        got: usize,
    },

    /// Returned when a pipeline stage fails to fit.
    #[error("{stage} fit failed: {reason}")]
    Fit {
        /// The stage that failed.
        stage: FitStage,
        /// Why it failed.
        reason: String,
    },

    /// Returned when the solver fails.
    #[error("solver failed: {0}")]
    Solver(String),

    /// Returned when the solver produced no candidates to select from.
    #[error("solver returned an empty candidate set")]
    EmptyCandidates,

    /// Returned when selection produced no points.
    #[error("selection produced an empty batch")]
    EmptyBatch,

    /// Returned when the real problem fails to evaluate a batch.
    #[error("evaluation failed: {0}")]
    Evaluation(String),

    /// Returned when the evaluator returns the wrong number of values.
    #[error("objective dimension mismatch: expected {expected} values, got {got}")]
    ObjectiveDimensionMismatch {
        /// The expected number of objective values.
        expected: usize,
        /// The actual number of objective values returned.
        got: usize,
    },

    /// Returned when an internal invariant is violated.
    #[error("internal error: {0}")]
    Internal(&'static str),
}

impl Error {
    pub(crate) fn fit(stage: FitStage, reason: impl ToString) -> Self {
        Self::Fit {
            stage,
            reason: reason.to_string(),
        }
    }

    /// Returns `true` for errors detected while validating configuration
    /// or initial data, before any iteration ran.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnknownAlgorithm(_)
                | Self::UnknownComponent { .. }
                | Self::MissingComponent(_)
                | Self::InvalidPhaseRatio(_)
                | Self::InvalidBatchSize
                | Self::InvalidBounds { .. }
                | Self::EmptyDataset
                | Self::RowCountMismatch { .. }
                | Self::DimensionMismatch { .. }
                | Self::OutOfBounds { .. }
                | Self::NonFiniteObjective { .. }
                | Self::InvalidReferencePoint { .. }
        )
    }
}

pub type Result<T> = core::result::Result<T, Error>;
