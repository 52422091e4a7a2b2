//! Node exchange operator.
//!
//! # Algorithm
//!
//! Exchanges the stops at two positions. Within one route any two stops may
//! trade places as long as pickup-before-dropoff ordering survives; across
//! routes only unpaired stops are exchanged, since moving half of a pair to
//! another vehicle would break the same-vehicle constraint.
//!
//! # Complexity
//!
//! O(L² · R²) candidates per pass, each re-evaluated in O(L).
//!
//! # Reference
//!
//! Potvin, J.-Y. & Rousseau, J.-M. (1995). "An Exchange Heuristic for
//! Routeing Problems with Time Windows", *Journal of the Operational
//! Research Society* 46(12), 1433-1446.

use crate::search::state::{improves, Candidate, Move, SearchState};

/// Best exchange of two stops, intra- or inter-route.
pub(crate) fn best_swap(state: &SearchState<'_>) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;

    // Intra-route exchanges.
    for vehicle in 0..state.model().num_vehicles() {
        let route = state.route(vehicle);
        let evaluator = state.evaluator(vehicle);
        for i in 0..route.len() {
            for j in (i + 1)..route.len() {
                let mut candidate = route.to_vec();
                candidate.swap(i, j);
                if !state.model().pairing_order_ok(&candidate) {
                    continue;
                }
                let Some(cost) = evaluator.evaluate(&candidate) else {
                    continue;
                };
                let delta = cost - state.route_cost(vehicle);
                let slack = state.node_slack(route[i]).min(state.node_slack(route[j]));
                if delta < 0 && improves(&best, delta, slack) {
                    best = Some(Candidate {
                        mv: Move::Swap {
                            route_a: vehicle,
                            pos_a: i,
                            route_b: vehicle,
                            pos_b: j,
                        },
                        delta,
                        slack,
                    });
                }
            }
        }
    }

    // Inter-route exchanges of unpaired stops.
    for route_a in 0..state.model().num_vehicles() {
        for route_b in (route_a + 1)..state.model().num_vehicles() {
            for pos_a in 0..state.route(route_a).len() {
                for pos_b in 0..state.route(route_b).len() {
                    let a = state.route(route_a)[pos_a];
                    let b = state.route(route_b)[pos_b];
                    if state.model().pair_link(a).is_some()
                        || state.model().pair_link(b).is_some()
                    {
                        continue;
                    }
                    let mut candidate_a = state.route(route_a).to_vec();
                    let mut candidate_b = state.route(route_b).to_vec();
                    candidate_a[pos_a] = b;
                    candidate_b[pos_b] = a;
                    let Some(cost_a) = state.evaluator(route_a).evaluate(&candidate_a) else {
                        continue;
                    };
                    let Some(cost_b) = state.evaluator(route_b).evaluate(&candidate_b) else {
                        continue;
                    };
                    let delta = (cost_a - state.route_cost(route_a))
                        + (cost_b - state.route_cost(route_b));
                    let slack = state.node_slack(a).min(state.node_slack(b));
                    if delta < 0 && improves(&best, delta, slack) {
                        best = Some(Candidate {
                            mv: Move::Swap {
                                route_a,
                                pos_a,
                                route_b,
                                pos_b,
                            },
                            delta,
                            slack,
                        });
                    }
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

    #[test]
    fn test_intra_route_swap_follows_one_way_costs() {
        // Asymmetric arcs: 2 -> 0 -> 1 -> 2 costs 15, 2 -> 1 -> 0 -> 2
        // costs 3 (stops 0 and 1, depot 2).
        let costs = CostMatrix::from_data(3, vec![0, 5, 1, 1, 0, 5, 5, 1, 0]).expect("valid");
        let mut model = RoutingModel::new(3, 1, vec![2], vec![2]).expect("valid");
        let arc = costs.clone();
        model.set_arc_cost(Box::new(move |from, to| arc.get(from, to)));
        let state = SearchState::with_routes(&model, vec![vec![0, 1]]);
        let candidate = best_swap(&state).expect("improving");
        assert_eq!(
            candidate.mv,
            Move::Swap {
                route_a: 0,
                pos_a: 0,
                route_b: 0,
                pos_b: 1,
            }
        );
        assert_eq!(candidate.delta, -12);
    }

    #[test]
    fn test_inter_route_swap_matches_depots() {
        let points = [(0, 10), (0, 1), (0, 0), (0, 11)];
        let costs = CostMatrix::manhattan(&points);
        let mut model = RoutingModel::new(4, 2, vec![2, 3], vec![2, 3]).expect("valid");
        let arc = costs.clone();
        model.set_arc_cost(Box::new(move |from, to| arc.get(from, to)));
        // Stop 0 is near depot 3, stop 1 near depot 2, served crosswise.
        let state = SearchState::with_routes(&model, vec![vec![0], vec![1]]);
        let candidate = best_swap(&state).expect("improving");
        // Crosswise: 10+10 + 10+10 = 40; matched: 1+1 + 1+1 = 4.
        assert_eq!(candidate.delta, -36);
    }

    #[test]
    fn test_inter_route_swap_skips_paired_nodes() {
        let points = [(0, 10), (0, 1), (0, 0), (0, 11)];
        let costs = CostMatrix::manhattan(&points);
        let mut model = RoutingModel::new(4, 2, vec![2, 3], vec![2, 3]).expect("valid");
        let arc = costs.clone();
        model.set_arc_cost(Box::new(move |from, to| arc.get(from, to)));
        model.add_pickup_and_delivery(0, 1).expect("valid");
        // 0 and 1 form a pair: exchanging them across vehicles would split
        // it, and within one route [0, 1] is the only legal order.
        let state = SearchState::with_routes(&model, vec![vec![0, 1], vec![]]);
        assert!(best_swap(&state).is_none());
    }
}
