use std::collections::BTreeMap;

use parking_lot::Mutex;

use super::{Selected, Selection, SelectionFit, batch_len, normalized_front};
use crate::error::Result;
use crate::pareto;
use crate::solver::CandidateSet;
use crate::status::Status;
use crate::surrogate::SurrogateModel;
use crate::transformation::FittedTransform;

/// One representative per decomposition group.
///
/// Each group (subproblem or weight vector of the solver) nominates the
/// candidate whose predicted mean adds the most hypervolume to the current
/// front. Groups are then ranked by that improvement, ties broken at random,
/// and the batch is filled from the top. If the batch is larger than the
/// number of groups, the rest is filled with the best remaining candidates.
pub struct MoeadSelection {
    batch_size: usize,
    rng: Mutex<fastrand::Rng>,
}

impl MoeadSelection {
    /// Creates the strategy. The seed drives tie-breaking.
    #[must_use]
    pub fn new(batch_size: usize, seed: Option<u64>) -> Self {
        Self {
            batch_size,
            rng: Mutex::new(seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed)),
        }
    }
}

impl Selection for MoeadSelection {
    fn name(&self) -> &'static str {
        "moead"
    }

    fn select(
        &self,
        fit: &SelectionFit,
        candidates: &CandidateSet,
        model: &dyn SurrogateModel,
        status: &Status,
        transform: &FittedTransform,
    ) -> Result<Selected> {
        let n = batch_len(candidates, self.batch_size)?;
        let (front, ref_point) = normalized_front(fit, status, transform)?;
        let means = model.predict(&candidates.x).mean;
        let hvi: Vec<f64> = means
            .iter()
            .map(|m| pareto::hypervolume_improvement(&front, m, &ref_point))
            .collect();

        let mut order: Vec<usize> = (0..candidates.len()).collect();
        self.rng.lock().shuffle(&mut order);
        // Stable sort keeps the shuffled order among equal scores.
        order.sort_by(|&a, &b| hvi[b].partial_cmp(&hvi[a]).unwrap_or(core::cmp::Ordering::Equal));

        let mut rank = vec![0_usize; order.len()];
        for (pos, &i) in order.iter().enumerate() {
            rank[i] = pos;
        }

        let mut best_of_group: BTreeMap<usize, usize> = BTreeMap::new();
        for &i in &order {
            best_of_group.entry(candidates.group_of(i)).or_insert(i);
        }
        let mut picks: Vec<usize> = best_of_group.into_values().collect();
        picks.sort_by_key(|&i| rank[i]);
        picks.truncate(n);

        for &i in &order {
            if picks.len() >= n {
                break;
            }
            if !picks.contains(&i) {
                picks.push(i);
            }
        }

        let scores = picks.iter().map(|&i| hvi[i]).collect();
        Ok(Selected::from_picks(candidates, picks, scores))
    }
}
