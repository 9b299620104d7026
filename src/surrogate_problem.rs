//! The cheap stand-in problem handed to the solver each iteration.

use crate::acquisition::AcquisitionScorer;
use crate::error::Result;
use crate::problem::{Evaluation, Problem};
use crate::types::Bounds;

/// The real problem's shape over the normalized decision space, scored by
/// the fitted acquisition function instead of the expensive evaluator.
///
/// Built fresh every iteration and dropped once the solver has run.
pub struct SurrogateProblem {
    bounds: Bounds,
    n_obj: usize,
    n_constr: usize,
    scorer: Box<dyn AcquisitionScorer>,
}

impl SurrogateProblem {
    /// Wraps `scorer` over the normalized `bounds`.
    #[must_use]
    pub fn new(
        bounds: Bounds,
        n_obj: usize,
        n_constr: usize,
        scorer: Box<dyn AcquisitionScorer>,
    ) -> Self {
        Self {
            bounds,
            n_obj,
            n_constr,
            scorer,
        }
    }

    /// Acquisition values of each row of `x`, one column per objective.
    #[must_use]
    pub fn scores(&self, x: &[Vec<f64>]) -> Vec<Vec<f64>> {
        if x.is_empty() {
            return Vec::new();
        }
        self.scorer.evaluate(x)
    }
}

impl Problem for SurrogateProblem {
    fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    fn n_obj(&self) -> usize {
        self.n_obj
    }

    fn n_constr(&self) -> usize {
        self.n_constr
    }

    fn evaluate(&self, x: &[Vec<f64>]) -> Result<Evaluation> {
        Ok(Evaluation::objectives(self.scores(x)))
    }
}

impl core::fmt::Debug for SurrogateProblem {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SurrogateProblem")
            .field("n_var", &self.bounds.n_var())
            .field("n_obj", &self.n_obj)
            .field("n_constr", &self.n_constr)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SumScorer;

    impl AcquisitionScorer for SumScorer {
        fn evaluate(&self, x: &[Vec<f64>]) -> Vec<Vec<f64>> {
            x.iter()
                .map(|r| vec![r.iter().sum(), -r.iter().sum::<f64>()])
                .collect()
        }
    }

    #[test]
    fn test_surrogate_problem_scores_and_reports_shape() {
        let problem = SurrogateProblem::new(Bounds::unit(3), 2, 0, Box::new(SumScorer));
        assert_eq!(problem.n_var(), 3);
        assert_eq!(problem.n_obj(), 2);
        let eval = problem.evaluate(&[vec![0.1, 0.2, 0.3]]).unwrap();
        assert!((eval.objectives[0][0] - 0.6).abs() < 1e-12);
        assert!(eval.constraints.is_none());
        assert!(problem.scores(&[]).is_empty());
    }
}
