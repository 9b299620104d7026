//! Batch selection: choosing which candidates to evaluate for real.
//!
//! [`Selection::fit`] captures the reference point (in real objective
//! units) in an immutable [`SelectionFit`]; [`Selection::select`] then picks
//! at most `batch_size` rows of the solver's [`CandidateSet`] and reports
//! them as a [`Selected`] batch plus [`SelectionInfo`].
//!
//! | Kind | Type | Rule |
//! |------|------|------|
//! | `random` | [`RandomSelection`] | uniform sample without replacement |
//! | `uncertainty` | [`UncertaintySelection`] | largest total predictive std, non-dominated candidates first |
//! | `hvi` | [`HviSelection`] | greedy hypervolume improvement of predicted means |
//! | `moead` | [`MoeadSelection`] | best hypervolume improvement per group, best groups first |
//! | `dgemo` | [`DgemoSelection`] | greedy hypervolume improvement, one pick per family until families run out |
//!
//! Every selection fails with [`Error::EmptyCandidates`] on an empty
//! candidate set rather than returning an empty batch.

mod hvi;
mod moead;
mod random;
mod uncertainty;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use self::hvi::{DgemoSelection, HviSelection};
pub use self::moead::MoeadSelection;
pub use self::random::RandomSelection;
pub use self::uncertainty::UncertaintySelection;
use crate::error::{Error, Result};
use crate::registry::SelectionKind;
use crate::solver::CandidateSet;
use crate::status::Status;
use crate::surrogate::SurrogateModel;
use crate::transformation::FittedTransform;

/// State captured by [`Selection::fit`] for one iteration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SelectionFit {
    /// Hypervolume reference point, in real objective units.
    pub ref_point: Vec<f64>,
    /// Number of samples in the archive the fit saw.
    pub n_samples: usize,
}

/// Which candidates were picked, and why.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SelectionInfo {
    /// Indices into the candidate set, in pick order.
    pub indices: Vec<usize>,
    /// Score each pick was made on. The meaning depends on the selection.
    pub scores: Vec<f64>,
}

/// A selected batch in the normalized decision space.
#[derive(Clone, Debug, PartialEq)]
pub struct Selected {
    /// Normalized decision vectors to evaluate.
    pub x: Vec<Vec<f64>>,
    /// Pick details.
    pub info: SelectionInfo,
}

impl Selected {
    /// Gather the picked rows of `candidates`.
    #[must_use]
    pub fn from_picks(candidates: &CandidateSet, indices: Vec<usize>, scores: Vec<f64>) -> Self {
        let x = indices.iter().map(|&i| candidates.x[i].clone()).collect();
        Self {
            x,
            info: SelectionInfo { indices, scores },
        }
    }
}

/// A batch selection strategy.
pub trait Selection: Send + Sync {
    /// Short name used in descriptions and logs.
    fn name(&self) -> &'static str;

    /// Capture per-iteration state from the normalized archive.
    fn fit(&self, x: &[Vec<f64>], _y: &[Vec<f64>], ref_point: &[f64]) -> SelectionFit {
        SelectionFit {
            ref_point: ref_point.to_vec(),
            n_samples: x.len(),
        }
    }

    /// Pick the next batch from `candidates`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyCandidates`] if `candidates` is empty.
    fn select(
        &self,
        fit: &SelectionFit,
        candidates: &CandidateSet,
        model: &dyn SurrogateModel,
        status: &Status,
        transform: &FittedTransform,
    ) -> Result<Selected>;
}

/// The built-in selection strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SelectionConfig {
    /// Uniform random picks.
    Random,
    /// Largest predictive uncertainty.
    Uncertainty,
    /// Greedy hypervolume improvement.
    Hvi,
    /// Best candidate per decomposition group.
    Moead,
    /// Family-diverse greedy hypervolume improvement.
    Dgemo,
}

impl SelectionConfig {
    /// The registry kind of this configuration.
    #[must_use]
    pub fn kind(self) -> SelectionKind {
        match self {
            Self::Random => SelectionKind::Random,
            Self::Uncertainty => SelectionKind::Uncertainty,
            Self::Hvi => SelectionKind::Hvi,
            Self::Moead => SelectionKind::Moead,
            Self::Dgemo => SelectionKind::Dgemo,
        }
    }

    /// Instantiate the strategy for batches of `batch_size`.
    #[must_use]
    pub fn build(self, batch_size: usize, seed: Option<u64>) -> Box<dyn Selection> {
        match self {
            Self::Random => Box::new(RandomSelection::new(batch_size, seed)),
            Self::Uncertainty => Box::new(UncertaintySelection::new(batch_size)),
            Self::Hvi => Box::new(HviSelection::new(batch_size, seed)),
            Self::Moead => Box::new(MoeadSelection::new(batch_size, seed)),
            Self::Dgemo => Box::new(DgemoSelection::new(batch_size, seed)),
        }
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Number of picks for a batch, or `EmptyCandidates`.
fn batch_len(candidates: &CandidateSet, batch_size: usize) -> Result<usize> {
    if candidates.is_empty() {
        return Err(Error::EmptyCandidates);
    }
    Ok(batch_size.max(1).min(candidates.len()))
}

/// Current front and reference point in the normalized objective space.
fn normalized_front(
    fit: &SelectionFit,
    status: &Status,
    transform: &FittedTransform,
) -> Result<(Vec<Vec<f64>>, Vec<f64>)> {
    let front = transform.apply_y(&status.pareto_y);
    let ref_point = transform
        .apply_y(core::slice::from_ref(&fit.ref_point))
        .pop()
        .ok_or(Error::Internal("reference point lost in normalization"))?;
    Ok((front, ref_point))
}
