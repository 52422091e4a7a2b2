//! Insertion, drop, and relocation moves.
//!
//! # Algorithm
//!
//! Four related neighborhoods over the current assignment:
//!
//! - *insert*: route a currently-dropped unit at its cheapest feasible
//!   slots, trading its disjunction penalty for arc cost;
//! - *drop*: remove an optional unit and pay its penalty instead of its
//!   arcs;
//! - *relocate node*: reposition one stop inside its own route;
//! - *relocate unit*: move a whole pickup/dropoff unit to the best slots of
//!   any route, preserving same-vehicle pairing by construction.
//!
//! Every candidate is re-evaluated under full dimension propagation; only
//! strictly improving moves are returned.
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Blood Banking". PhD thesis.

use crate::search::state::{improves, Candidate, Move, NodeState, SearchState};

/// Best insertion of a dropped unit, penalty savings included.
pub(crate) fn best_insert(state: &SearchState<'_>) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    for unit in 0..state.units().len() {
        if state.unit_state(unit) != NodeState::Dropped || !state.can_activate(unit) {
            continue;
        }
        let Some((mv, cost_delta)) = state.best_placement(unit) else {
            continue;
        };
        let delta = cost_delta - state.penalty_freed_by(unit);
        let slack = state.unit_slack(unit);
        if delta < 0 && improves(&best, delta, slack) {
            best = Some(Candidate { mv, delta, slack });
        }
    }
    best
}

/// Best removal of an optional routed unit, penalty cost included.
pub(crate) fn best_drop(state: &SearchState<'_>) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    for unit in 0..state.units().len() {
        let NodeState::Routed(vehicle) = state.unit_state(unit) else {
            continue;
        };
        if state.is_mandatory(unit) {
            continue;
        }
        let nodes = state.units()[unit].nodes();
        let remaining: Vec<usize> = state
            .route(vehicle)
            .iter()
            .copied()
            .filter(|node| !nodes.contains(node))
            .collect();
        let Some(cost) = state.evaluator(vehicle).evaluate(&remaining) else {
            continue;
        };
        let delta =
            (cost - state.route_cost(vehicle)) + state.penalty_added_by_removal(unit);
        if delta < 0 && improves(&best, delta, i64::MAX) {
            best = Some(Candidate {
                mv: Move::Drop { unit },
                delta,
                slack: i64::MAX,
            });
        }
    }
    best
}

/// Best repositioning of a single stop within its own route.
pub(crate) fn best_relocate_node(state: &SearchState<'_>) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    for vehicle in 0..state.model().num_vehicles() {
        let route = state.route(vehicle);
        if route.len() < 2 {
            continue;
        }
        let evaluator = state.evaluator(vehicle);
        for from in 0..route.len() {
            for to in 0..route.len() {
                if to == from {
                    continue;
                }
                let mut candidate = route.to_vec();
                let node = candidate.remove(from);
                candidate.insert(to, node);
                if !state.model().pairing_order_ok(&candidate) {
                    continue;
                }
                let Some(cost) = evaluator.evaluate(&candidate) else {
                    continue;
                };
                let delta = cost - state.route_cost(vehicle);
                let slack = state.node_slack(node);
                if delta < 0 && improves(&best, delta, slack) {
                    best = Some(Candidate {
                        mv: Move::RelocateNode { vehicle, from, to },
                        delta,
                        slack,
                    });
                }
            }
        }
    }
    best
}

/// Best relocation of a routed unit to another position or vehicle.
pub(crate) fn best_relocate_unit(state: &SearchState<'_>) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    for unit in 0..state.units().len() {
        let NodeState::Routed(origin) = state.unit_state(unit) else {
            continue;
        };
        let nodes = state.units()[unit].nodes();
        let remaining: Vec<usize> = state
            .route(origin)
            .iter()
            .copied()
            .filter(|node| !nodes.contains(node))
            .collect();
        let Some(remaining_cost) = state.evaluator(origin).evaluate(&remaining) else {
            continue;
        };
        let slack = state.unit_slack(unit);
        for vehicle in 0..state.model().num_vehicles() {
            let base: &[usize] = if vehicle == origin {
                &remaining
            } else {
                state.route(vehicle)
            };
            let Some((first, second, cost)) = state.best_slots(state.units()[unit], vehicle, base)
            else {
                continue;
            };
            let delta = if vehicle == origin {
                cost - state.route_cost(origin)
            } else {
                (remaining_cost - state.route_cost(origin)) + (cost - state.route_cost(vehicle))
            };
            if delta < 0 && improves(&best, delta, slack) {
                best = Some(Candidate {
                    mv: Move::RelocateUnit {
                        unit,
                        vehicle,
                        first,
                        second,
                    },
                    delta,
                    slack,
                });
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::CostMatrix;
    use crate::routing::{RoutingModel, UNBOUNDED};
    use crate::search::state::SearchState;

    /// Two single stops 0,1 and a pair (2 -> 3), depots 4 and 5.
    fn two_vehicle_model() -> RoutingModel {
        let points = [(1, 0), (1, 10), (3, 0), (5, 0), (0, 0), (0, 10)];
        let costs = CostMatrix::manhattan(&points);
        let mut model = RoutingModel::new(6, 2, vec![4, 5], vec![4, 5]).expect("valid");
        let transit = costs.clone();
        model
            .add_dimension(
                Box::new(move |from, to| transit.get(from, to)),
                UNBOUNDED,
                UNBOUNDED,
                false,
                "time",
            )
            .expect("valid");
        let arc = costs.clone();
        model.set_arc_cost(Box::new(move |from, to| arc.get(from, to)));
        model.add_pickup_and_delivery(2, 3).expect("valid");
        model.add_disjunction(&[0], 1000).expect("valid");
        model.add_disjunction(&[1], 1000).expect("valid");
        model.add_disjunction(&[2], 1000).expect("valid");
        model
    }

    #[test]
    fn test_insert_recovers_dropped_unit() {
        let model = two_vehicle_model();
        let state = SearchState::with_routes(&model, vec![vec![], vec![]]);
        let candidate = best_insert(&state).expect("improving");
        assert!(candidate.delta < 0);
    }

    #[test]
    fn test_insert_skips_unprofitable() {
        let points = [(500, 0), (600, 0), (0, 0)];
        let costs = CostMatrix::manhattan(&points);
        let mut model = RoutingModel::new(3, 1, vec![2], vec![2]).expect("valid");
        let arc = costs.clone();
        model.set_arc_cost(Box::new(move |from, to| arc.get(from, to)));
        model.add_pickup_and_delivery(0, 1).expect("valid");
        model.add_disjunction(&[0], 10).expect("valid");
        let state = SearchState::with_routes(&model, vec![vec![]]);
        // Routing costs 1200, dropping costs 10.
        assert!(best_insert(&state).is_none());
    }

    #[test]
    fn test_drop_sheds_expensive_unit() {
        let points = [(500, 0), (600, 0), (0, 0)];
        let costs = CostMatrix::manhattan(&points);
        let mut model = RoutingModel::new(3, 1, vec![2], vec![2]).expect("valid");
        let arc = costs.clone();
        model.set_arc_cost(Box::new(move |from, to| arc.get(from, to)));
        model.add_pickup_and_delivery(0, 1).expect("valid");
        model.add_disjunction(&[0], 10).expect("valid");
        let state = SearchState::with_routes(&model, vec![vec![0, 1]]);
        let candidate = best_drop(&state).expect("improving");
        // Saves 1200 in arcs, pays 10 in penalty.
        assert_eq!(candidate.delta, -1190);
    }

    #[test]
    fn test_relocate_unit_moves_to_closer_vehicle() {
        let model = two_vehicle_model();
        // Stop 1 at (1, 10) sits next to depot 5 but is served from depot 4.
        let state = SearchState::with_routes(&model, vec![vec![1], vec![]]);
        let candidate = best_relocate_unit(&state).expect("improving");
        let Move::RelocateUnit { vehicle, .. } = candidate.mv else {
            panic!("unexpected move kind");
        };
        assert_eq!(vehicle, 1);
        // From depot 4: 11 + 11 = 22; from depot 5: 1 + 1 = 2.
        assert_eq!(candidate.delta, -20);
    }

    #[test]
    fn test_relocate_node_fixes_detour() {
        let points = [(1, 0), (2, 0), (3, 0), (0, 0)];
        let costs = CostMatrix::manhattan(&points);
        let mut model = RoutingModel::new(4, 1, vec![3], vec![3]).expect("valid");
        let arc = costs.clone();
        model.set_arc_cost(Box::new(move |from, to| arc.get(from, to)));
        // Visiting 1, 0, 2 zig-zags; 0, 1, 2 is the straight line.
        let state = SearchState::with_routes(&model, vec![vec![1, 0, 2]]);
        let candidate = best_relocate_node(&state).expect("improving");
        assert!(candidate.delta < 0);
    }

    #[test]
    fn test_relocate_node_respects_pairing_order() {
        let model = two_vehicle_model();
        let state = SearchState::with_routes(&model, vec![vec![2, 3], vec![]]);
        // The only repositionings of 2 and 3 would invert the pair; the
        // straight route is already optimal for them anyway.
        assert!(best_relocate_node(&state).is_none());
    }
}
