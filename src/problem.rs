//! The real, expensive problem being optimized.
//!
//! The optimization loop only reads a problem: its shape (variables,
//! objectives, constraints), its [`Bounds`], and a batch evaluation
//! function. Implementations must be free of side effects across calls.
//!
//! Besides the [`Problem`] trait this module ships [`FnProblem`] for
//! wrapping a closure, and a handful of standard benchmark problems with
//! known Pareto fronts ([`Zdt1`], [`Zdt2`], [`Zdt3`], [`Dtlz2`]) so that
//! inverted generational distance can be tracked.
//!
//! # Examples
//!
//! ```
//! use mobo::problem::{FnProblem, Problem};
//! use mobo::Bounds;
//!
//! let problem = FnProblem::new(Bounds::uniform(1, 0.0, 1.0).unwrap(), 2, |x: &[f64]| {
//!     vec![x[0], 1.0 - x[0]]
//! });
//! let eval = problem.evaluate(&[vec![0.25]]).unwrap();
//! assert_eq!(eval.objectives, vec![vec![0.25, 0.75]]);
//! ```

use core::f64::consts::{FRAC_PI_2, PI};

use crate::error::{Error, Result};
use crate::types::Bounds;

/// The result of evaluating a batch of decision vectors.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    /// One row of objective values per decision vector.
    pub objectives: Vec<Vec<f64>>,
    /// One row of constraint violations per decision vector, if the problem
    /// has constraints (`<= 0.0` means satisfied).
    pub constraints: Option<Vec<Vec<f64>>>,
}

impl Evaluation {
    /// An unconstrained evaluation.
    #[must_use]
    pub fn objectives(objectives: Vec<Vec<f64>>) -> Self {
        Self {
            objectives,
            constraints: None,
        }
    }
}

/// An expensive multi-objective minimization problem.
pub trait Problem {
    /// The box bounds of the decision space.
    fn bounds(&self) -> &Bounds;

    /// Number of objectives.
    fn n_obj(&self) -> usize;

    /// Number of decision variables.
    fn n_var(&self) -> usize {
        self.bounds().n_var()
    }

    /// Number of constraints. Defaults to zero.
    fn n_constr(&self) -> usize {
        0
    }

    /// Evaluate a batch of decision vectors.
    ///
    /// # Errors
    ///
    /// Implementations report failures as [`Error::Evaluation`].
    fn evaluate(&self, x: &[Vec<f64>]) -> Result<Evaluation>;

    /// A sampled approximation of the true Pareto front, if known.
    ///
    /// Used only for the IGD indicator.
    fn pareto_front(&self, _n_points: usize) -> Option<Vec<Vec<f64>>> {
        None
    }
}

// ---------------------------------------------------------------------------
// FnProblem
// ---------------------------------------------------------------------------

/// A [`Problem`] backed by a closure mapping one decision vector to its
/// objective values.
pub struct FnProblem<F> {
    bounds: Bounds,
    n_obj: usize,
    f: F,
}

impl<F> FnProblem<F>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    /// Wraps `f` as an unconstrained problem with `n_obj` objectives.
    pub fn new(bounds: Bounds, n_obj: usize, f: F) -> Self {
        Self { bounds, n_obj, f }
    }
}

impl<F> Problem for FnProblem<F>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    fn n_obj(&self) -> usize {
        self.n_obj
    }

    fn evaluate(&self, x: &[Vec<f64>]) -> Result<Evaluation> {
        let objectives = x
            .iter()
            .map(|xi| {
                let y = (self.f)(xi);
                if y.len() == self.n_obj {
                    Ok(y)
                } else {
                    Err(Error::ObjectiveDimensionMismatch {
                        expected: self.n_obj,
                        got: y.len(),
                    })
                }
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Evaluation::objectives(objectives))
    }
}

// ---------------------------------------------------------------------------
// ZDT family
// ---------------------------------------------------------------------------

/// `g(x) = 1 + 9 / (n - 1) * sum(x[1..])`
#[allow(clippy::cast_precision_loss)]
fn zdt_g(x: &[f64]) -> f64 {
    let n = x.len();
    1.0 + 9.0 / (n - 1) as f64 * x[1..].iter().sum::<f64>()
}

#[allow(clippy::cast_precision_loss)]
fn linspace(n_points: usize) -> impl Iterator<Item = f64> {
    let denom = n_points.saturating_sub(1).max(1) as f64;
    (0..n_points).map(move |i| i as f64 / denom)
}

macro_rules! zdt_problem {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Debug)]
        pub struct $name {
            bounds: Bounds,
        }

        impl $name {
            /// Creates the problem with `n_var` variables in `[0, 1]`.
            ///
            /// # Panics
            ///
            /// Panics if `n_var < 2`.
            #[must_use]
            pub fn new(n_var: usize) -> Self {
                assert!(n_var >= 2, "ZDT problems need at least two variables");
                Self {
                    bounds: Bounds::unit(n_var),
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new(30)
            }
        }
    };
}

zdt_problem!(
    /// ZDT1: convex front `f2 = 1 - sqrt(f1)`.
    Zdt1
);
zdt_problem!(
    /// ZDT2: concave front `f2 = 1 - f1^2`.
    Zdt2
);
zdt_problem!(
    /// ZDT3: disconnected front made of five segments.
    Zdt3
);

fn check_width(x: &[Vec<f64>], n_var: usize) -> Result<()> {
    match x.iter().position(|xi| xi.len() != n_var) {
        Some(row) => Err(Error::DimensionMismatch {
            what: "decision vectors",
            expected: n_var,
            got: x[row].len(),
            row,
        }),
        None => Ok(()),
    }
}

impl Problem for Zdt1 {
    fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    fn n_obj(&self) -> usize {
        2
    }

    fn evaluate(&self, x: &[Vec<f64>]) -> Result<Evaluation> {
        check_width(x, self.n_var())?;
        let objectives = x
            .iter()
            .map(|xi| {
                let f1 = xi[0];
                let g = zdt_g(xi);
                vec![f1, g * (1.0 - (f1 / g).sqrt())]
            })
            .collect();
        Ok(Evaluation::objectives(objectives))
    }

    fn pareto_front(&self, n_points: usize) -> Option<Vec<Vec<f64>>> {
        Some(linspace(n_points).map(|f1| vec![f1, 1.0 - f1.sqrt()]).collect())
    }
}

impl Problem for Zdt2 {
    fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    fn n_obj(&self) -> usize {
        2
    }

    fn evaluate(&self, x: &[Vec<f64>]) -> Result<Evaluation> {
        check_width(x, self.n_var())?;
        let objectives = x
            .iter()
            .map(|xi| {
                let f1 = xi[0];
                let g = zdt_g(xi);
                vec![f1, g * (1.0 - (f1 / g).powi(2))]
            })
            .collect();
        Ok(Evaluation::objectives(objectives))
    }

    fn pareto_front(&self, n_points: usize) -> Option<Vec<Vec<f64>>> {
        Some(linspace(n_points).map(|f1| vec![f1, 1.0 - f1 * f1]).collect())
    }
}

impl Problem for Zdt3 {
    fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    fn n_obj(&self) -> usize {
        2
    }

    fn evaluate(&self, x: &[Vec<f64>]) -> Result<Evaluation> {
        check_width(x, self.n_var())?;
        let objectives = x
            .iter()
            .map(|xi| {
                let f1 = xi[0];
                let g = zdt_g(xi);
                let h = 1.0 - (f1 / g).sqrt() - (f1 / g) * (10.0 * PI * f1).sin();
                vec![f1, g * h]
            })
            .collect();
        Ok(Evaluation::objectives(objectives))
    }

    fn pareto_front(&self, n_points: usize) -> Option<Vec<Vec<f64>>> {
        // The front is the non-dominated part of the g = 1 curve.
        let curve: Vec<Vec<f64>> = linspace(n_points)
            .map(|f1| vec![f1, 1.0 - f1.sqrt() - f1 * (10.0 * PI * f1).sin()])
            .collect();
        let front = crate::pareto::pareto_front_indices(&curve)
            .into_iter()
            .map(|i| curve[i].clone())
            .collect();
        Some(front)
    }
}

// ---------------------------------------------------------------------------
// DTLZ2
// ---------------------------------------------------------------------------

/// DTLZ2: the front is the positive orthant of the unit hypersphere.
#[derive(Clone, Debug)]
pub struct Dtlz2 {
    bounds: Bounds,
    n_obj: usize,
}

impl Dtlz2 {
    /// Creates DTLZ2 with `n_obj` objectives and `n_var` variables in `[0, 1]`.
    ///
    /// # Panics
    ///
    /// Panics if `n_obj < 2` or `n_var < n_obj`.
    #[must_use]
    pub fn new(n_var: usize, n_obj: usize) -> Self {
        assert!(n_obj >= 2, "DTLZ2 needs at least two objectives");
        assert!(n_var >= n_obj, "DTLZ2 needs n_var >= n_obj");
        Self {
            bounds: Bounds::unit(n_var),
            n_obj,
        }
    }
}

impl Problem for Dtlz2 {
    fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    fn n_obj(&self) -> usize {
        self.n_obj
    }

    fn evaluate(&self, x: &[Vec<f64>]) -> Result<Evaluation> {
        check_width(x, self.n_var())?;
        let m = self.n_obj;
        let objectives = x
            .iter()
            .map(|xi| {
                let g: f64 = xi[m - 1..].iter().map(|&v| (v - 0.5).powi(2)).sum();
                (0..m)
                    .map(|i| {
                        let mut f = 1.0 + g;
                        for &v in &xi[..m - 1 - i] {
                            f *= (v * FRAC_PI_2).cos();
                        }
                        if i > 0 {
                            f *= (xi[m - 1 - i] * FRAC_PI_2).sin();
                        }
                        f
                    })
                    .collect()
            })
            .collect();
        Ok(Evaluation::objectives(objectives))
    }

    fn pareto_front(&self, n_points: usize) -> Option<Vec<Vec<f64>>> {
        let divisions = crate::solver::genetic::auto_divisions(self.n_obj, n_points);
        let front = crate::solver::genetic::das_dennis(self.n_obj, divisions)
            .into_iter()
            .map(|w| {
                let norm = w.iter().map(|v| v * v).sum::<f64>().sqrt();
                w.iter().map(|v| v / norm).collect()
            })
            .collect();
        Some(front)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zdt1_on_front() {
        let p = Zdt1::new(5);
        let eval = p.evaluate(&[vec![0.25, 0.0, 0.0, 0.0, 0.0]]).unwrap();
        assert!((eval.objectives[0][0] - 0.25).abs() < 1e-12);
        assert!((eval.objectives[0][1] - 0.5).abs() < 1e-12);
        assert!(eval.constraints.is_none());
    }

    #[test]
    fn test_zdt2_on_front() {
        let p = Zdt2::new(3);
        let eval = p.evaluate(&[vec![0.5, 0.0, 0.0]]).unwrap();
        assert!((eval.objectives[0][1] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_zdt3_front_is_non_dominated() {
        let front = Zdt3::new(3).pareto_front(200).unwrap();
        assert!(!front.is_empty());
        assert!(front.len() < 200);
        for a in &front {
            for b in &front {
                assert!(!crate::pareto::dominates(a, b));
            }
        }
    }

    #[test]
    fn test_dtlz2_on_unit_sphere() {
        let p = Dtlz2::new(5, 3);
        let eval = p.evaluate(&[vec![0.3, 0.7, 0.5, 0.5, 0.5]]).unwrap();
        let norm: f64 = eval.objectives[0].iter().map(|v| v * v).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-12);

        let front = p.pareto_front(20).unwrap();
        assert!(front.len() >= 20);
        for f in &front {
            let n: f64 = f.iter().map(|v| v * v).sum::<f64>().sqrt();
            assert!((n - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_width_is_checked() {
        let err = Zdt1::new(4).evaluate(&[vec![0.1, 0.2]]).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { expected: 4, got: 2, .. }));
    }

    #[test]
    fn test_fn_problem_checks_output_width() {
        let p = FnProblem::new(Bounds::unit(1), 2, |x: &[f64]| vec![x[0]]);
        let err = p.evaluate(&[vec![0.5]]).unwrap_err();
        assert!(matches!(
            err,
            Error::ObjectiveDimensionMismatch {
                expected: 2,
                got: 1
            }
        ));
    }
}
