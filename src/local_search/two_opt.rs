//! Intra-route segment reversal (2-opt).
//!
//! # Algorithm
//!
//! For every segment `[i, j]` of a route, reverse it and keep the change
//! when the route stays feasible, pickup-before-dropoff ordering survives
//! the reversal, and the arc cost strictly drops. Reversal removes edge
//! crossings that insertion-order construction tends to leave behind.
//!
//! # Complexity
//!
//! O(L²) candidates per route, each re-evaluated in O(L).
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use crate::search::state::{improves, Candidate, Move, SearchState};

/// Best segment reversal across all routes.
pub(crate) fn best_reversal(state: &SearchState<'_>) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    for vehicle in 0..state.model().num_vehicles() {
        let route = state.route(vehicle);
        if route.len() < 2 {
            continue;
        }
        let evaluator = state.evaluator(vehicle);
        for i in 0..route.len() - 1 {
            for j in (i + 1)..route.len() {
                let mut candidate = route.to_vec();
                candidate[i..=j].reverse();
                if !state.model().pairing_order_ok(&candidate) {
                    continue;
                }
                let Some(cost) = evaluator.evaluate(&candidate) else {
                    continue;
                };
                let delta = cost - state.route_cost(vehicle);
                if delta < 0 && improves(&best, delta, i64::MAX) {
                    best = Some(Candidate {
                        mv: Move::Reverse {
                            vehicle,
                            from: i,
                            to: j,
                        },
                        delta,
                        slack: i64::MAX,
                    });
                }
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::CostMatrix;
    use crate::routing::RoutingModel;
    use crate::search::state::SearchState;

    fn square_model() -> RoutingModel {
        // Depot 3 at the origin, stops on three corners of a square.
        let points = [(2, 0), (2, 2), (0, 2), (0, 0)];
        let costs = CostMatrix::manhattan(&points);
        let mut model = RoutingModel::new(4, 1, vec![3], vec![3]).expect("valid");
        let arc = costs.clone();
        model.set_arc_cost(Box::new(move |from, to| arc.get(from, to)));
        model
    }

    #[test]
    fn test_reversal_uncrosses_route() {
        let model = square_model();
        // 0 -> 2 -> 1 crosses the square diagonally twice: 2+4+2+4 = 12.
        let state = SearchState::with_routes(&model, vec![vec![0, 2, 1]]);
        let candidate = best_reversal(&state).expect("improving");
        assert_eq!(
            candidate.mv,
            Move::Reverse {
                vehicle: 0,
                from: 1,
                to: 2,
            }
        );
        // 0 -> 1 -> 2 walks the perimeter: 2+2+2+2 = 8.
        assert_eq!(candidate.delta, -4);
    }

    #[test]
    fn test_reversal_keeps_optimal_route() {
        let model = square_model();
        let state = SearchState::with_routes(&model, vec![vec![0, 1, 2]]);
        assert!(best_reversal(&state).is_none());
    }

    #[test]
    fn test_reversal_respects_pairing() {
        let mut model = square_model();
        model.add_pickup_and_delivery(0, 2).expect("valid");
        // Reversing [0, 1, 2] entirely would put the dropoff first.
        let state = SearchState::with_routes(&model, vec![vec![0, 1, 2]]);
        assert!(best_reversal(&state).is_none());
    }
}
