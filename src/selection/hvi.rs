//! Greedy hypervolume-improvement selection.
//!
//! Both strategies here score candidates by the hypervolume their predicted
//! mean would add to the current front (normalized objective space), pick
//! the best, add its prediction to the front and repeat. When no candidate
//! improves the front any more, the remaining picks are random.

use std::collections::HashSet;

use parking_lot::Mutex;

use super::{Selected, Selection, SelectionFit, batch_len, normalized_front};
use crate::error::Result;
use crate::pareto;
use crate::solver::CandidateSet;
use crate::status::Status;
use crate::surrogate::SurrogateModel;
use crate::transformation::FittedTransform;

/// Greedy hypervolume improvement of predicted means.
pub struct HviSelection {
    batch_size: usize,
    rng: Mutex<fastrand::Rng>,
}

impl HviSelection {
    /// Creates the strategy. The seed drives the fallback picks.
    #[must_use]
    pub fn new(batch_size: usize, seed: Option<u64>) -> Self {
        Self {
            batch_size,
            rng: Mutex::new(seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed)),
        }
    }
}

impl Selection for HviSelection {
    fn name(&self) -> &'static str {
        "hvi"
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
        let (picks, scores) = greedy(
            &mut self.rng.lock(),
            &means,
            front,
            &ref_point,
            n,
            None,
        );
        Ok(Selected::from_picks(candidates, picks, scores))
    }
}

/// Greedy hypervolume improvement spread over candidate families.
///
/// While some family has not contributed to the batch yet, only candidates
/// of unused families are eligible. Once every family is used, all
/// remaining candidates become eligible again.
pub struct DgemoSelection {
    batch_size: usize,
    rng: Mutex<fastrand::Rng>,
}

impl DgemoSelection {
    /// Creates the strategy. The seed drives the fallback picks.
    #[must_use]
    pub fn new(batch_size: usize, seed: Option<u64>) -> Self {
        Self {
            batch_size,
            rng: Mutex::new(seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed)),
        }
    }
}

impl Selection for DgemoSelection {
    fn name(&self) -> &'static str {
        "dgemo"
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
        let families: Vec<usize> = (0..candidates.len()).map(|i| candidates.group_of(i)).collect();
        let (picks, scores) = greedy(
            &mut self.rng.lock(),
            &means,
            front,
            &ref_point,
            n,
            Some(&families),
        );
        Ok(Selected::from_picks(candidates, picks, scores))
    }
}

/// Pick `n` distinct candidates by greedy hypervolume improvement.
///
/// With `families`, a candidate is eligible only while its family is unused,
/// unless every family present among the remaining candidates is used.
pub(super) fn greedy(
    rng: &mut fastrand::Rng,
    means: &[Vec<f64>],
    mut front: Vec<Vec<f64>>,
    ref_point: &[f64],
    n: usize,
    families: Option<&[usize]>,
) -> (Vec<usize>, Vec<f64>) {
    let mut remaining: Vec<usize> = (0..means.len()).collect();
    let mut used_families: HashSet<usize> = HashSet::new();
    let mut picks = Vec::with_capacity(n);
    let mut scores = Vec::with_capacity(n);

    while picks.len() < n && !remaining.is_empty() {
        let mut eligible: Vec<usize> = match families {
            Some(f) => remaining
                .iter()
                .copied()
                .filter(|&i| !used_families.contains(&f[i]))
                .collect(),
            None => remaining.clone(),
        };
        if eligible.is_empty() {
            used_families.clear();
            eligible.clone_from(&remaining);
        }

        let mut best: Option<(usize, f64)> = None;
        for &i in &eligible {
            let hvi = pareto::hypervolume_improvement(&front, &means[i], ref_point);
            if hvi > best.map_or(0.0, |(_, b)| b) {
                best = Some((i, hvi));
            }
        }
        let (pick, score) = best.unwrap_or_else(|| (eligible[rng.usize(0..eligible.len())], 0.0));

        remaining.retain(|&i| i != pick);
        if let Some(f) = families {
            used_families.insert(f[pick]);
        }
        front.push(means[pick].clone());
        picks.push(pick);
        scores.push(score);
    }

    (picks, scores)
}
