//! Cheapest-insertion construction over pickup/dropoff units.
//!
//! # Algorithm
//!
//! Sequential best-insertion: each iteration evaluates every unplaced unit
//! at every feasible slot of every route and commits the globally cheapest
//! insertion. Mandatory units are placed first; optional units are inserted
//! only while doing so is cheaper than paying their penalty. Equal-cost
//! candidates prefer the unit with the tightest remaining cumulative-range
//! width, which reduces the risk of squeezing out tightly-windowed stops
//! later.
//!
//! # Complexity
//!
//! O(n² · m · L²) for n units, m vehicles, routes of length L.
//!
//! # Reference
//!
//! Li, H. & Lim, A. (2001). "A Metaheuristic for the Pickup and Delivery
//! Problem with Time Windows", *Proc. 13th IEEE ICTAI*, 160-167.

use crate::search::state::{NodeState, SearchState};

/// Places units into routes until nothing profitable remains.
///
/// Mandatory units (no disjunction covers them) must all be placed; returns
/// `false` when one of them has no feasible slot, which makes the whole
/// solve infeasible. When `include_optional` is not set, optional units are
/// left for the improvement phase and marked dropped. Either way, every
/// unit ends up routed or dropped, never unassigned.
pub(crate) fn insert_units(state: &mut SearchState<'_>, include_optional: bool) -> bool {
    // Mandatory units first.
    loop {
        let mut pending = false;
        let mut best: Option<(crate::search::state::Move, i64, i64)> = None;
        for unit in 0..state.units().len() {
            if state.unit_state(unit) != NodeState::Unassigned || !state.is_mandatory(unit) {
                continue;
            }
            pending = true;
            let Some((mv, delta)) = state.best_placement(unit) else {
                return false;
            };
            let slack = state.unit_slack(unit);
            if best
                .as_ref()
                .is_none_or(|&(_, d, s)| (delta, slack) < (d, s))
            {
                best = Some((mv, delta, slack));
            }
        }
        if !pending {
            break;
        }
        let Some((mv, _, _)) = best else {
            return false;
        };
        state.apply(&mv);
    }

    // Optional units, while insertion beats the penalty.
    if include_optional {
        loop {
            let mut best: Option<(crate::search::state::Move, i64, i64)> = None;
            for unit in 0..state.units().len() {
                if state.unit_state(unit) != NodeState::Unassigned || !state.can_activate(unit) {
                    continue;
                }
                let Some((mv, cost_delta)) = state.best_placement(unit) else {
                    continue;
                };
                let delta = cost_delta - state.penalty_freed_by(unit);
                if delta >= 0 {
                    continue;
                }
                let slack = state.unit_slack(unit);
                if best
                    .as_ref()
                    .is_none_or(|&(_, d, s)| (delta, slack) < (d, s))
                {
                    best = Some((mv, delta, slack));
                }
            }
            let Some((mv, _, _)) = best else {
                break;
            };
            state.apply(&mv);
        }
    }

    // Whatever is still unassigned is optional: give it up and pay.
    for unit in 0..state.units().len() {
        if state.unit_state(unit) == NodeState::Unassigned {
            state.mark_dropped(unit);
        }
    }
    true
}
