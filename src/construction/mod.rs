//! First-solution construction strategies.
//!
//! - [`FirstSolutionStrategy::AllUnperformed`] — start with every optional
//!   order dropped and let the improvement phase earn insertions back.
//! - [`FirstSolutionStrategy::GreedyInsertion`] — cheapest-insertion of
//!   whole pickup/dropoff units up front.

mod greedy;

pub(crate) use greedy::insert_units;

use serde::{Deserialize, Serialize};

use crate::search::state::SearchState;

/// How the initial assignment is built before local search runs.
///
/// Both strategies place every mandatory node; they differ in whether
/// optional orders are inserted eagerly or left to the improvement phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FirstSolutionStrategy {
    /// Every optional order starts dropped, paying its penalty.
    #[default]
    AllUnperformed,
    /// Optional orders are inserted greedily while cheaper than their
    /// penalty.
    GreedyInsertion,
}

/// Builds the initial assignment. Returns `false` when a mandatory node
/// cannot be placed anywhere.
pub(crate) fn build(state: &mut SearchState<'_>, strategy: FirstSolutionStrategy) -> bool {
    match strategy {
        FirstSolutionStrategy::AllUnperformed => insert_units(state, false),
        FirstSolutionStrategy::GreedyInsertion => insert_units(state, true),
    }
}
