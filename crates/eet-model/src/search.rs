// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

/// Result of a bounded one-dimensional descent.
#[derive(Clone, Copy, Debug)]
pub struct DescentOutcome {
    pub x: f64,
    pub value: f64,
    pub iterations: usize,
}

/// Seeded downhill search over `[lo, hi]`.
///
/// Walks from `seed` in fixed steps toward lower objective values, halving
/// the step whenever neither neighbor improves, until the step shrinks below
/// `tolerance` or the iteration budget runs out. The search deliberately
/// stays in the basin containing the seed: the reference fits are defined by
/// local convergence from the percentile initial guesses, not by the global
/// optimum of the (multi-modal) profile objective.
pub fn descend_from(
    seed: f64,
    lo: f64,
    hi: f64,
    initial_step: f64,
    tolerance: f64,
    max_iterations: usize,
    objective: impl Fn(f64) -> f64,
) -> DescentOutcome {
    let mut x = seed.clamp(lo, hi);
    let mut best = objective(x);
    let mut step = initial_step;
    let mut iterations = 0;

    while step > tolerance && iterations < max_iterations {
        iterations += 1;
        let mut moved = false;
        for candidate in [x - step, x + step] {
            let clamped = candidate.clamp(lo, hi);
            let value = objective(clamped);
            if value < best {
                x = clamped;
                best = value;
                moved = true;
                break;
            }
        }
        if !moved {
            step /= 2.0;
        }
    }

    DescentOutcome {
        x,
        value: best,
        iterations,
    }
}

#[cfg(test)]
mod tests {
    use super::descend_from;

    #[test]
    fn finds_the_minimum_of_a_parabola() {
        let outcome = descend_from(0.0, -10.0, 10.0, 1.0, 1e-9, 10_000, |x| (x - 3.0).powi(2));
        assert!((outcome.x - 3.0).abs() < 1e-6);
        assert!(outcome.value < 1e-10);
    }

    #[test]
    fn stays_in_the_seeded_basin_of_a_bimodal_objective() {
        // Two basins: minima near -2 and +2, the -2 basin deeper.
        let f = |x: f64| (x * x - 4.0).powi(2) + x;
        let left = descend_from(-1.5, -5.0, 5.0, 0.1, 1e-9, 10_000, f);
        let right = descend_from(1.5, -5.0, 5.0, 0.1, 1e-9, 10_000, f);
        assert!(left.x < 0.0, "left seed should stay left, got {}", left.x);
        assert!(right.x > 0.0, "right seed should stay right, got {}", right.x);
        assert!(left.value < right.value);
    }

    #[test]
    fn respects_bounds() {
        let outcome = descend_from(0.5, 0.0, 1.0, 0.25, 1e-9, 10_000, |x| -x);
        assert!((outcome.x - 1.0).abs() < 1e-9);
    }

    #[test]
    fn iteration_budget_is_honored() {
        let outcome = descend_from(0.0, -1e9, 1e9, 1.0, 0.0, 25, |x| -x);
        assert!(outcome.iterations <= 25);
    }
}
