//! Simplified SMO driver
//!
//! The textbook warm-up version of SMO: every pass scans the whole training
//! set and pairs each KKT violator with a uniformly random partner. There is
//! no full/unbound alternation. A counter tracks consecutive passes that
//! changed nothing, resets on any change, and training stops once it reaches
//! the configured number of idle passes.

use crate::solver::selection::random_index_except;
use crate::solver::smo::{take_step, violates_kkt};
use crate::solver::OptimizationState;
use log::{debug, info, warn};
use rand::Rng;

/// Run simplified SMO until `max_idle_passes` consecutive passes change
/// nothing, or `pass_limit` passes have run in total.
///
/// Returns the number of passes and whether the idle-pass rule was met.
pub fn simplified_loop<R: Rng + ?Sized>(
    state: &mut OptimizationState<'_>,
    max_idle_passes: usize,
    pass_limit: usize,
    rng: &mut R,
) -> (usize, bool) {
    let mut idle_passes = 0;
    let mut passes = 0;

    while idle_passes < max_idle_passes {
        if passes >= pass_limit {
            warn!("Simplified SMO hit the pass limit ({pass_limit}) after {idle_passes} idle passes");
            return (passes, false);
        }

        let num_changed = simplified_pass(state, rng);
        passes += 1;

        if num_changed == 0 {
            idle_passes += 1;
        } else {
            idle_passes = 0;
        }
        debug!("Simplified pass {passes}: {num_changed} pairs changed, {idle_passes} idle in a row");
    }

    info!("Simplified SMO finished after {passes} passes");
    (passes, true)
}

/// One scan over every example with random partners
pub fn simplified_pass<R: Rng + ?Sized>(state: &mut OptimizationState<'_>, rng: &mut R) -> usize {
    let mut num_changed = 0;

    for i in 0..state.n() {
        let e_i = state.error(i);
        if !violates_kkt(state, i, e_i) {
            continue;
        }

        let j = random_index_except(i, state.n(), rng);
        let e_j = state.error(j);
        if take_step(state, i, j, e_i, e_j) {
            num_changed += 1;
        }
    }

    num_changed
}
