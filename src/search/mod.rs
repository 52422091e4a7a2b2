//! Two-phase search: construction, then steepest-descent improvement.
//!
//! The engine builds a first solution with the configured
//! [`FirstSolutionStrategy`], then repeatedly applies the single best
//! strictly-improving move from the [`local_search`](crate::local_search)
//! neighborhoods until it reaches a local optimum or exhausts the optional
//! move/time budget. Exhausting the budget is not an error; the best
//! assignment found so far is returned.

pub(crate) mod state;

pub use crate::construction::FirstSolutionStrategy;

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::construction;
use crate::evaluation::RouteEvaluator;
use crate::local_search;
use crate::routing::RoutingModel;
use crate::solution::Assignment;
use state::SearchState;

/// Search configuration.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use pd_routing::search::{FirstSolutionStrategy, SearchParameters};
///
/// let params = SearchParameters::default()
///     .with_first_solution_strategy(FirstSolutionStrategy::GreedyInsertion)
///     .with_move_limit(10_000)
///     .with_time_limit(Duration::from_secs(5));
/// assert_eq!(params.move_limit(), Some(10_000));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParameters {
    first_solution_strategy: FirstSolutionStrategy,
    move_limit: Option<u64>,
    time_limit: Option<Duration>,
}

impl SearchParameters {
    /// Selects how the initial solution is built.
    pub fn with_first_solution_strategy(mut self, strategy: FirstSolutionStrategy) -> Self {
        self.first_solution_strategy = strategy;
        self
    }

    /// Caps the number of improvement moves. Unlimited by default.
    pub fn with_move_limit(mut self, limit: u64) -> Self {
        self.move_limit = Some(limit);
        self
    }

    /// Caps the improvement phase's wall-clock time. Unlimited by default.
    /// The limit is checked between moves, so construction always runs to
    /// completion.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// The configured construction strategy.
    pub fn first_solution_strategy(&self) -> FirstSolutionStrategy {
        self.first_solution_strategy
    }

    /// The configured move budget, if any.
    pub fn move_limit(&self) -> Option<u64> {
        self.move_limit
    }

    /// The configured time budget, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }
}

/// Runs the two-phase search over a configured model.
pub(crate) fn run(model: &RoutingModel, parameters: &SearchParameters) -> Option<Assignment> {
    // A vehicle that cannot even travel start -> end makes the whole
    // configuration inconsistent.
    for vehicle in 0..model.num_vehicles() {
        if !RouteEvaluator::new(model, vehicle).is_feasible(&[]) {
            warn!(
                vehicle,
                "depot-to-depot traversal violates a dimension; no assignment exists"
            );
            return None;
        }
    }

    let mut state = SearchState::new(model);

    // Validate constraint nodes against the dimensions' domains: a stop
    // with an empty domain can never be visited.
    for unit in 0..state.units().len() {
        let blocked = state.units()[unit].nodes().into_iter().any(|node| {
            model
                .dimensions()
                .iter()
                .any(|dim| dim.effective(node).is_empty())
        });
        if !blocked {
            continue;
        }
        if state.is_mandatory(unit) {
            warn!(
                unit,
                "mandatory stop has an empty cumulative domain; no assignment exists"
            );
            return None;
        }
        debug!(unit, "stop domain is empty; order dropped before search");
        state.mark_dropped(unit);
    }

    info!(strategy = ?parameters.first_solution_strategy(), "starting route search");
    if !construction::build(&mut state, parameters.first_solution_strategy()) {
        warn!("construction could not place every mandatory stop");
        return None;
    }
    debug!(objective = state.objective(), "construction finished");

    let deadline = parameters.time_limit().map(|limit| Instant::now() + limit);
    let mut moves: u64 = 0;
    let exhausted = loop {
        if parameters.move_limit().is_some_and(|limit| moves >= limit) {
            break true;
        }
        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            break true;
        }
        let Some(candidate) = local_search::best_move(&state) else {
            break false;
        };
        state.apply(&candidate.mv);
        moves += 1;
        trace!(
            delta = candidate.delta,
            objective = state.objective(),
            "applied improving move"
        );
    };
    if exhausted {
        warn!(moves, "search budget exhausted; keeping best assignment found so far");
    }
    info!(objective = state.objective(), moves, "search finished");

    Some(Assignment::extract(
        model,
        state.routes(),
        &state.dropped_nodes(),
        state.objective(),
    ))
}
