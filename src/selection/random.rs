use parking_lot::Mutex;

use super::{Selected, Selection, SelectionFit, batch_len};
use crate::error::Result;
use crate::solver::CandidateSet;
use crate::status::Status;
use crate::surrogate::SurrogateModel;
use crate::transformation::FittedTransform;

/// Uniformly random batch, without replacement.
pub struct RandomSelection {
    batch_size: usize,
    rng: Mutex<fastrand::Rng>,
}

impl RandomSelection {
    /// Creates the strategy. With a seed, picks are reproducible.
    #[must_use]
    pub fn new(batch_size: usize, seed: Option<u64>) -> Self {
        Self {
            batch_size,
            rng: Mutex::new(seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed)),
        }
    }
}

impl Selection for RandomSelection {
    fn name(&self) -> &'static str {
        "random"
    }

    fn select(
        &self,
        _fit: &SelectionFit,
        candidates: &CandidateSet,
        _model: &dyn SurrogateModel,
        _status: &Status,
        _transform: &FittedTransform,
    ) -> Result<Selected> {
        let n = batch_len(candidates, self.batch_size)?;
        let mut order: Vec<usize> = (0..candidates.len()).collect();
        self.rng.lock().shuffle(&mut order);
        order.truncate(n);
        Ok(Selected::from_picks(candidates, order, vec![0.0; n]))
    }
}
