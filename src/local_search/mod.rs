//! Local search operators for improving an assignment.
//!
//! - `relocate` — unit insertion/drop and node/unit relocation
//! - `swap` — intra- and inter-route node exchange
//! - `two_opt` — intra-route segment reversal
//!
//! Each operator scans its whole neighborhood and reports its single best
//! strictly-improving move; [`best_move`] picks the overall winner by
//! `(objective delta, tie-breaking slack)` in a fixed operator order, which
//! keeps the descent deterministic.

mod relocate;
mod swap;
mod two_opt;

use crate::search::state::{improves, Candidate, SearchState};

/// The best strictly-improving move available, if any.
pub(crate) fn best_move(state: &SearchState<'_>) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    let candidates = [
        relocate::best_insert(state),
        relocate::best_relocate_unit(state),
        relocate::best_relocate_node(state),
        swap::best_swap(state),
        two_opt::best_reversal(state),
        relocate::best_drop(state),
    ];
    for candidate in candidates.into_iter().flatten() {
        if improves(&best, candidate.delta, candidate.slack) {
            best = Some(candidate);
        }
    }
    best
}
