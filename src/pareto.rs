//! Pareto front analysis for minimization problems.
//!
//! Every objective is minimized. This module provides the dominance
//! relation, non-dominated sorting, and the two convergence indicators the
//! optimization loop tracks: hypervolume and inverted generational distance.
//!
//! # Available functions
//!
//! | Function | Purpose |
//! |---|---|
//! | [`dominates`] | Standard Pareto dominance test |
//! | [`non_dominated_sort`] | Rank solutions into successive fronts (front 0, 1, …) |
//! | [`pareto_front_indices`] | Filter to non-dominated (Pareto-optimal) solutions only |
//! | [`crowding_distance`] | Measure diversity/spread within a single front |
//! | [`hypervolume`] | Volume of objective space dominated by a front |
//! | [`hypervolume_improvement`] | Hypervolume gained by adding one point to a front |
//! | [`igd`] | Mean distance from a reference front to the nearest front point |
//!
//! # Example
//!
//! ```
//! use mobo::pareto::{hypervolume, igd, non_dominated_sort, pareto_front_indices};
//!
//! let solutions = vec![
//!     vec![1.0, 5.0], // Pareto-optimal
//!     vec![5.0, 1.0], // Pareto-optimal
//!     vec![3.0, 3.0], // Pareto-optimal
//!     vec![4.0, 4.0], // Dominated by (3, 3)
//! ];
//!
//! let fronts = non_dominated_sort(&solutions);
//! assert_eq!(fronts.len(), 2);
//!
//! let front = pareto_front_indices(&solutions);
//! assert_eq!(front, vec![0, 1, 2]);
//!
//! let front_values: Vec<_> = front.iter().map(|&i| solutions[i].clone()).collect();
//! let hv = hypervolume(&front_values, &[6.0, 6.0]);
//! assert!(hv > 0.0);
//!
//! assert!(igd(&front_values, &front_values).abs() < 1e-12);
//! ```

/// Returns `true` if `a` Pareto-dominates `b` under minimization.
///
/// `a` dominates `b` when it is no worse in every objective and strictly
/// better in at least one. Equal vectors do not dominate each other.
#[must_use]
pub fn dominates(a: &[f64], b: &[f64]) -> bool {
    debug_assert_eq!(a.len(), b.len());

    let mut strictly_better = false;
    for (&av, &bv) in a.iter().zip(b) {
        if av > bv {
            return false;
        }
        if av < bv {
            strictly_better = true;
        }
    }
    strictly_better
}

/// Fast non-dominated sorting (Deb et al., 2002).
///
/// Returns `Vec<Vec<usize>>` where `fronts[0]` is the Pareto front,
/// each inner vec contains indices into `values` in ascending order.
///
/// Complexity: O(M * N^2) where M = objectives, N = solutions.
pub(crate) fn fast_non_dominated_sort(values: &[Vec<f64>]) -> Vec<Vec<usize>> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }

    // S_p: set of solutions dominated by p
    let mut dominated_by: Vec<Vec<usize>> = vec![Vec::new(); n];
    // n_p: domination count for p
    let mut domination_count: Vec<usize> = vec![0; n];

    for i in 0..n {
        for j in (i + 1)..n {
            if dominates(&values[i], &values[j]) {
                dominated_by[i].push(j);
                domination_count[j] += 1;
            } else if dominates(&values[j], &values[i]) {
                dominated_by[j].push(i);
                domination_count[i] += 1;
            }
        }
    }

    let mut fronts: Vec<Vec<usize>> = Vec::new();
    let mut current_front: Vec<usize> = (0..n).filter(|&i| domination_count[i] == 0).collect();

    while !current_front.is_empty() {
        let mut next_front: Vec<usize> = Vec::new();
        for &p in &current_front {
            for &q in &dominated_by[p] {
                domination_count[q] -= 1;
                if domination_count[q] == 0 {
                    next_front.push(q);
                }
            }
        }
        next_front.sort_unstable();
        fronts.push(current_front);
        current_front = next_front;
    }

    fronts
}

/// Crowding distance for one front (index-based, internal API).
///
/// Boundary solutions get `f64::INFINITY`. Returns one distance value per
/// solution in the front, in the same order as `front_indices`.
pub(crate) fn crowding_distance_indexed(front_indices: &[usize], values: &[Vec<f64>]) -> Vec<f64> {
    let n = front_indices.len();
    if n <= 2 {
        return vec![f64::INFINITY; n];
    }

    let m = values[front_indices[0]].len();
    let mut distances = vec![0.0_f64; n];

    let val = |front_pos: usize, obj: usize| -> f64 { values[front_indices[front_pos]][obj] };

    for obj in 0..m {
        let mut sorted: Vec<usize> = (0..n).collect();
        sorted.sort_by(|&a, &b| val(a, obj).total_cmp(&val(b, obj)));

        distances[sorted[0]] = f64::INFINITY;
        distances[sorted[n - 1]] = f64::INFINITY;

        let range = val(sorted[n - 1], obj) - val(sorted[0], obj);
        if range > 0.0 {
            for i in 1..(n - 1) {
                distances[sorted[i]] += (val(sorted[i + 1], obj) - val(sorted[i - 1], obj)) / range;
            }
        }
    }

    distances
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute non-dominated sorting of a set of solutions.
///
/// Return a vec of fronts, where `fronts[0]` is the Pareto front,
/// `fronts[1]` is the next-best front (dominated only by front 0), and so
/// on. Each inner vec contains indices into `solutions`.
#[must_use]
pub fn non_dominated_sort(solutions: &[Vec<f64>]) -> Vec<Vec<usize>> {
    fast_non_dominated_sort(solutions)
}

/// Indices of the non-dominated solutions, in ascending order.
///
/// Exact duplicates on the front are all kept.
#[must_use]
pub fn pareto_front_indices(solutions: &[Vec<f64>]) -> Vec<usize> {
    let n = solutions.len();
    (0..n)
        .filter(|&i| !(0..n).any(|j| j != i && dominates(&solutions[j], &solutions[i])))
        .collect()
}

/// Compute crowding distance for diversity measurement.
///
/// Return one distance value per solution in `front` (same order).
/// Boundary solutions receive [`f64::INFINITY`].
#[must_use]
pub fn crowding_distance(front: &[Vec<f64>]) -> Vec<f64> {
    let indices: Vec<usize> = (0..front.len()).collect();
    crowding_distance_indexed(&indices, front)
}

/// Compute the hypervolume indicator of a front.
///
/// The hypervolume is the volume of objective space dominated by the
/// front and bounded by `reference_point`. A **higher** hypervolume
/// indicates a better front.
///
/// Points that do not strictly dominate the reference point in every
/// objective contribute nothing, so a reference point that is too
/// small yields zero rather than negative volume.
///
/// Uses recursive slicing on the last objective.
#[must_use]
pub fn hypervolume(front: &[Vec<f64>], reference_point: &[f64]) -> f64 {
    if front.is_empty() {
        return 0.0;
    }
    debug_assert!(front.iter().all(|p| p.len() == reference_point.len()));

    let filtered: Vec<Vec<f64>> = front
        .iter()
        .filter(|p| p.iter().zip(reference_point).all(|(&pv, &rv)| pv < rv))
        .cloned()
        .collect();

    if filtered.is_empty() {
        return 0.0;
    }

    hv_recursive(&filtered, reference_point)
}

/// Hypervolume gained by adding `point` to `front`.
///
/// Zero when `point` is dominated by the front or does not dominate the
/// reference point.
#[must_use]
pub fn hypervolume_improvement(front: &[Vec<f64>], point: &[f64], reference_point: &[f64]) -> f64 {
    let base = hypervolume(front, reference_point);
    let mut extended = front.to_vec();
    extended.push(point.to_vec());
    (hypervolume(&extended, reference_point) - base).max(0.0)
}

/// Inverted generational distance of `front` with respect to `reference_front`.
///
/// The mean, over every point of `reference_front`, of the Euclidean
/// distance to the nearest point of `front`. **Lower** is better.
/// Returns `NaN` if either set is empty.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn igd(front: &[Vec<f64>], reference_front: &[Vec<f64>]) -> f64 {
    if front.is_empty() || reference_front.is_empty() {
        return f64::NAN;
    }

    let total: f64 = reference_front
        .iter()
        .map(|r| {
            front
                .iter()
                .map(|p| {
                    p.iter()
                        .zip(r)
                        .map(|(&a, &b)| (a - b).powi(2))
                        .sum::<f64>()
                        .sqrt()
                })
                .fold(f64::INFINITY, f64::min)
        })
        .sum();

    total / reference_front.len() as f64
}

/// Recursive hypervolume via slicing on the last objective.
///
/// All points are dominated by `reference`.
fn hv_recursive(points: &[Vec<f64>], reference: &[f64]) -> f64 {
    let d = reference.len();

    // 1-D: gap from the best point to ref.
    if d == 1 {
        let min_val = points.iter().map(|p| p[0]).fold(f64::INFINITY, f64::min);
        return (reference[0] - min_val).max(0.0);
    }

    if points.len() == 1 {
        return points[0]
            .iter()
            .zip(reference)
            .map(|(&p, &r)| (r - p).max(0.0))
            .product();
    }

    let mut sorted: Vec<&Vec<f64>> = points.iter().collect();
    sorted.sort_by(|a, b| a[d - 1].total_cmp(&b[d - 1]));

    let sub_ref: Vec<f64> = reference[..d - 1].to_vec();
    let mut result = 0.0;

    for i in 0..sorted.len() {
        let height = if i + 1 < sorted.len() {
            sorted[i + 1][d - 1] - sorted[i][d - 1]
        } else {
            reference[d - 1] - sorted[i][d - 1]
        };

        if height <= 0.0 {
            continue;
        }

        // Project points[0..=i] onto the first d-1 dimensions and
        // keep only the non-dominated subset.
        let projected: Vec<Vec<f64>> = sorted[..=i].iter().map(|p| p[..d - 1].to_vec()).collect();
        let non_dom: Vec<Vec<f64>> = pareto_front_indices(&projected)
            .into_iter()
            .map(|k| projected[k].clone())
            .collect();

        if !non_dom.is_empty() {
            result += height * hv_recursive(&non_dom, &sub_ref);
        }
    }

    result
}
