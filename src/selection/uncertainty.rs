use super::{Selected, Selection, SelectionFit, batch_len};
use crate::error::Result;
use crate::pareto;
use crate::solver::CandidateSet;
use crate::status::Status;
use crate::surrogate::SurrogateModel;
use crate::transformation::FittedTransform;

/// Picks the most uncertain candidates.
///
/// Candidates that are non-dominated in acquisition space come first, each
/// group ordered by total predictive standard deviation, largest first.
/// The score of each pick is that total standard deviation.
pub struct UncertaintySelection {
    batch_size: usize,
}

impl UncertaintySelection {
    /// Creates the strategy.
    #[must_use]
    pub fn new(batch_size: usize) -> Self {
        Self { batch_size }
    }
}

impl Selection for UncertaintySelection {
    fn name(&self) -> &'static str {
        "uncertainty"
    }

    fn select(
        &self,
        _fit: &SelectionFit,
        candidates: &CandidateSet,
        model: &dyn SurrogateModel,
        _status: &Status,
        _transform: &FittedTransform,
    ) -> Result<Selected> {
        let n = batch_len(candidates, self.batch_size)?;
        let total_std: Vec<f64> = model
            .predict(&candidates.x)
            .std
            .iter()
            .map(|s| s.iter().sum())
            .collect();

        let mut front = vec![false; candidates.len()];
        for i in pareto::pareto_front_indices(&candidates.y) {
            front[i] = true;
        }

        let mut order: Vec<usize> = (0..candidates.len()).collect();
        order.sort_by(|&a, &b| {
            front[b].cmp(&front[a]).then(
                total_std[b]
                    .partial_cmp(&total_std[a])
                    .unwrap_or(core::cmp::Ordering::Equal),
            )
        });
        order.truncate(n);

        let scores = order.iter().map(|&i| total_std[i]).collect();
        Ok(Selected::from_picks(candidates, order, scores))
    }
}
