//! Second-example selection
//!
//! Given a first example that violates the KKT conditions, pick the partner
//! that promises the largest step: the valid cache entry maximizing
//! |E_i - E_k|. While the cache holds nothing but example i itself, fall back
//! to a uniform random partner.

use crate::solver::OptimizationState;
use rand::Rng;

/// Choose the second example for `i` and return it with its current error.
///
/// `e_i` is the current error of example `i`; it is recorded in the cache
/// before the scan. Ties on the gap keep the first index in ascending order.
pub fn select_second_example<R: Rng + ?Sized>(
    i: usize,
    e_i: f64,
    state: &mut OptimizationState<'_>,
    rng: &mut R,
) -> (usize, f64) {
    state.record_error(i, e_i);

    let valid = state.error_cache().valid_indices();
    if valid.len() > 1 {
        let mut best: Option<(usize, f64, f64)> = None;

        for k in valid {
            if k == i {
                continue;
            }

            let e_k = state.refresh_error(k);
            let gap = (e_i - e_k).abs();

            match best {
                Some((_, best_gap, _)) if gap <= best_gap => {}
                _ => best = Some((k, gap, e_k)),
            }
        }

        if let Some((j, _, e_j)) = best {
            return (j, e_j);
        }
    }

    let j = random_index_except(i, state.n(), rng);
    (j, state.error(j))
}

/// Uniform draw from [0, n) that is never `i`.
///
/// `n` must be at least 2.
pub fn random_index_except<R: Rng + ?Sized>(i: usize, n: usize, rng: &mut R) -> usize {
    debug_assert!(n >= 2, "need a second index to choose from");
    loop {
        let j = rng.gen_range(0..n);
        if j != i {
            return j;
        }
    }
}
