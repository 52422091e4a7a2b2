//! Search-state bookkeeping: routes, node statuses, penalties, placements.

use crate::evaluation::RouteEvaluator;
use crate::routing::{Constraint, PairRole, RoutingModel};

/// Where a node currently stands during the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeState {
    /// Not yet placed and not yet given up on.
    Unassigned,
    /// On the given vehicle's route.
    Routed(usize),
    /// Deliberately left unvisited; its disjunction penalty is charged.
    Dropped,
}

/// An insertable group of nodes: a pickup/dropoff pair moves as one unit,
/// an unpaired stop moves alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Unit {
    Single(usize),
    Pair { pickup: usize, dropoff: usize },
}

impl Unit {
    pub(crate) fn nodes(&self) -> Vec<usize> {
        match *self {
            Unit::Single(node) => vec![node],
            Unit::Pair { pickup, dropoff } => vec![pickup, dropoff],
        }
    }

    pub(crate) fn first(&self) -> usize {
        match *self {
            Unit::Single(node) => node,
            Unit::Pair { pickup, .. } => pickup,
        }
    }
}

/// A candidate change to the current solution.
///
/// Insertion positions refer to the target route *after* any removal the
/// move implies ([`Move::RelocateNode`], [`Move::RelocateUnit`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Move {
    /// Insert a dropped/unassigned unit; `second` is ignored for singles.
    Insert {
        unit: usize,
        vehicle: usize,
        first: usize,
        second: usize,
    },
    /// Remove an optional unit from its route and pay its penalty.
    Drop { unit: usize },
    /// Reposition one node within its route.
    RelocateNode {
        vehicle: usize,
        from: usize,
        to: usize,
    },
    /// Move a routed unit to (possibly) another vehicle.
    RelocateUnit {
        unit: usize,
        vehicle: usize,
        first: usize,
        second: usize,
    },
    /// Exchange the stops at two positions (same or different routes).
    Swap {
        route_a: usize,
        pos_a: usize,
        route_b: usize,
        pos_b: usize,
    },
    /// Reverse the segment `[from, to]` of one route.
    Reverse {
        vehicle: usize,
        from: usize,
        to: usize,
    },
}

/// A scored move: objective delta plus the tie-breaking slack of the nodes
/// it touches (tighter slack wins among equal deltas).
#[derive(Debug, Clone, Copy)]
pub(crate) struct Candidate {
    pub mv: Move,
    pub delta: i64,
    pub slack: i64,
}

/// Returns `true` if `(delta, slack)` beats the current best candidate.
pub(crate) fn improves(best: &Option<Candidate>, delta: i64, slack: i64) -> bool {
    best.as_ref()
        .is_none_or(|b| (delta, slack) < (b.delta, b.slack))
}

/// Mutable search state over one routing model.
pub(crate) struct SearchState<'a> {
    model: &'a RoutingModel,
    routes: Vec<Vec<usize>>,
    states: Vec<NodeState>,
    route_costs: Vec<i64>,
    units: Vec<Unit>,
}

impl<'a> SearchState<'a> {
    /// Fresh state: empty routes, every visitable node unassigned.
    pub(crate) fn new(model: &'a RoutingModel) -> Self {
        let mut units = Vec::new();
        for node in 0..model.num_nodes() {
            if model.is_depot(node) {
                continue;
            }
            match model.pair_link(node) {
                None => units.push(Unit::Single(node)),
                Some(link) if link.role == PairRole::Pickup => units.push(Unit::Pair {
                    pickup: node,
                    dropoff: link.partner,
                }),
                Some(_) => {} // dropoffs are carried by their pair
            }
        }
        Self {
            model,
            routes: vec![Vec::new(); model.num_vehicles()],
            states: vec![NodeState::Unassigned; model.num_nodes()],
            route_costs: vec![0; model.num_vehicles()],
            units,
        }
    }

    pub(crate) fn model(&self) -> &'a RoutingModel {
        self.model
    }

    pub(crate) fn routes(&self) -> &[Vec<usize>] {
        &self.routes
    }

    pub(crate) fn route(&self, vehicle: usize) -> &[usize] {
        &self.routes[vehicle]
    }

    pub(crate) fn route_cost(&self, vehicle: usize) -> i64 {
        self.route_costs[vehicle]
    }

    pub(crate) fn units(&self) -> &[Unit] {
        &self.units
    }

    pub(crate) fn unit_state(&self, unit: usize) -> NodeState {
        self.states[self.units[unit].first()]
    }

    /// A unit is mandatory when no disjunction makes any of its nodes
    /// droppable.
    pub(crate) fn is_mandatory(&self, unit: usize) -> bool {
        !self.model.is_optional(self.units[unit].first())
    }

    pub(crate) fn evaluator(&self, vehicle: usize) -> RouteEvaluator<'a> {
        RouteEvaluator::new(self.model, vehicle)
    }

    /// Sum of penalties of disjunctions with no routed member.
    pub(crate) fn active_penalty(&self) -> i64 {
        self.model
            .constraints()
            .iter()
            .filter_map(|constraint| match constraint {
                Constraint::Disjunction { nodes, penalty } if self.disjunction_charged(nodes) => {
                    Some(*penalty)
                }
                _ => None,
            })
            .sum()
    }

    /// Total objective: arc costs of all routes plus active penalties.
    pub(crate) fn objective(&self) -> i64 {
        self.route_costs.iter().sum::<i64>() + self.active_penalty()
    }

    /// Sorted node indices currently marked dropped.
    pub(crate) fn dropped_nodes(&self) -> Vec<usize> {
        (0..self.states.len())
            .filter(|&node| self.states[node] == NodeState::Dropped)
            .collect()
    }

    fn disjunction_charged(&self, nodes: &[usize]) -> bool {
        !nodes
            .iter()
            .any(|&node| matches!(self.states[node], NodeState::Routed(_)))
    }

    /// Whether the unit may be routed without visiting a second member of
    /// some disjunction (at most one member may be active).
    pub(crate) fn can_activate(&self, unit: usize) -> bool {
        for node in self.units[unit].nodes() {
            let Some(index) = self.model.disjunction_index(node) else {
                continue;
            };
            let Constraint::Disjunction { nodes, .. } = &self.model.constraints()[index] else {
                continue;
            };
            let other_active = nodes
                .iter()
                .any(|&m| m != node && matches!(self.states[m], NodeState::Routed(_)));
            if other_active {
                return false;
            }
        }
        true
    }

    /// Penalties that stop being charged once this unit is routed.
    pub(crate) fn penalty_freed_by(&self, unit: usize) -> i64 {
        let mut total = 0;
        for index in self.disjunctions_touching(unit) {
            if let Constraint::Disjunction { nodes, penalty } = &self.model.constraints()[index] {
                if self.disjunction_charged(nodes) {
                    total += penalty;
                }
            }
        }
        total
    }

    /// Penalties that start being charged once this unit leaves its route.
    pub(crate) fn penalty_added_by_removal(&self, unit: usize) -> i64 {
        let unit_nodes = self.units[unit].nodes();
        let mut total = 0;
        for index in self.disjunctions_touching(unit) {
            if let Constraint::Disjunction { nodes, penalty } = &self.model.constraints()[index] {
                let routed_outside_unit = nodes.iter().any(|&m| {
                    !unit_nodes.contains(&m) && matches!(self.states[m], NodeState::Routed(_))
                });
                if !routed_outside_unit && !self.disjunction_charged(nodes) {
                    total += penalty;
                }
            }
        }
        total
    }

    fn disjunctions_touching(&self, unit: usize) -> Vec<usize> {
        let mut indices = Vec::new();
        for node in self.units[unit].nodes() {
            if let Some(index) = self.model.disjunction_index(node) {
                if !indices.contains(&index) {
                    indices.push(index);
                }
            }
        }
        indices
    }

    /// Tightest cumulative-range width across the unit's nodes, the
    /// tie-breaking "remaining time-window slack".
    pub(crate) fn unit_slack(&self, unit: usize) -> i64 {
        self.units[unit]
            .nodes()
            .into_iter()
            .map(|node| self.node_slack(node))
            .min()
            .unwrap_or(i64::MAX)
    }

    pub(crate) fn node_slack(&self, node: usize) -> i64 {
        self.model
            .dimensions()
            .iter()
            .map(|dim| dim.effective(node).width())
            .min()
            .unwrap_or(i64::MAX)
    }

    /// Best feasible slots for `unit` in an explicit base route of
    /// `vehicle`, returning `(first, second, new_route_cost)`.
    pub(crate) fn best_slots(
        &self,
        unit: Unit,
        vehicle: usize,
        base: &[usize],
    ) -> Option<(usize, usize, i64)> {
        let evaluator = self.evaluator(vehicle);
        let mut best: Option<(usize, usize, i64)> = None;
        match unit {
            Unit::Single(node) => {
                for position in 0..=base.len() {
                    let mut candidate = base.to_vec();
                    candidate.insert(position, node);
                    if let Some(cost) = evaluator.evaluate(&candidate) {
                        if best.is_none_or(|(_, _, b)| cost < b) {
                            best = Some((position, position, cost));
                        }
                    }
                }
            }
            Unit::Pair { pickup, dropoff } => {
                for p in 0..=base.len() {
                    for d in (p + 1)..=(base.len() + 1) {
                        let mut candidate = base.to_vec();
                        candidate.insert(p, pickup);
                        candidate.insert(d, dropoff);
                        if let Some(cost) = evaluator.evaluate(&candidate) {
                            if best.is_none_or(|(_, _, b)| cost < b) {
                                best = Some((p, d, cost));
                            }
                        }
                    }
                }
            }
        }
        best
    }

    /// Cheapest feasible insertion of a not-yet-routed unit across all
    /// vehicles: `(move, arc_cost_delta)`.
    pub(crate) fn best_placement(&self, unit: usize) -> Option<(Move, i64)> {
        let u = self.units[unit];
        let mut best: Option<(Move, i64)> = None;
        for vehicle in 0..self.model.num_vehicles() {
            if let Some((first, second, cost)) = self.best_slots(u, vehicle, &self.routes[vehicle])
            {
                let delta = cost - self.route_costs[vehicle];
                if best.is_none_or(|(_, b)| delta < b) {
                    best = Some((
                        Move::Insert {
                            unit,
                            vehicle,
                            first,
                            second,
                        },
                        delta,
                    ));
                }
            }
        }
        best
    }

    pub(crate) fn mark_dropped(&mut self, unit: usize) {
        for node in self.units[unit].nodes() {
            self.states[node] = NodeState::Dropped;
        }
    }

    fn place(&mut self, unit: usize, vehicle: usize, first: usize, second: usize) {
        match self.units[unit] {
            Unit::Single(node) => self.routes[vehicle].insert(first, node),
            Unit::Pair { pickup, dropoff } => {
                self.routes[vehicle].insert(first, pickup);
                self.routes[vehicle].insert(second, dropoff);
            }
        }
        for node in self.units[unit].nodes() {
            self.states[node] = NodeState::Routed(vehicle);
        }
        self.recompute_cost(vehicle);
    }

    /// Takes the unit off its route and returns the vehicle it was on.
    /// The caller decides the nodes' next state.
    fn withdraw(&mut self, unit: usize) -> usize {
        let NodeState::Routed(vehicle) = self.unit_state(unit) else {
            unreachable!("withdraw called on a unit that is not routed");
        };
        let nodes = self.units[unit].nodes();
        self.routes[vehicle].retain(|node| !nodes.contains(node));
        self.recompute_cost(vehicle);
        vehicle
    }

    fn recompute_cost(&mut self, vehicle: usize) {
        self.route_costs[vehicle] = self.evaluator(vehicle).arc_cost(&self.routes[vehicle]);
    }

    /// Applies a move. The move must have been generated against the
    /// current state.
    pub(crate) fn apply(&mut self, mv: &Move) {
        match *mv {
            Move::Insert {
                unit,
                vehicle,
                first,
                second,
            } => self.place(unit, vehicle, first, second),
            Move::Drop { unit } => {
                self.withdraw(unit);
                self.mark_dropped(unit);
            }
            Move::RelocateNode { vehicle, from, to } => {
                let node = self.routes[vehicle].remove(from);
                self.routes[vehicle].insert(to, node);
                self.recompute_cost(vehicle);
            }
            Move::RelocateUnit {
                unit,
                vehicle,
                first,
                second,
            } => {
                self.withdraw(unit);
                self.place(unit, vehicle, first, second);
            }
            Move::Swap {
                route_a,
                pos_a,
                route_b,
                pos_b,
            } => {
                if route_a == route_b {
                    self.routes[route_a].swap(pos_a, pos_b);
                    self.recompute_cost(route_a);
                } else {
                    let a = self.routes[route_a][pos_a];
                    let b = self.routes[route_b][pos_b];
                    self.routes[route_a][pos_a] = b;
                    self.routes[route_b][pos_b] = a;
                    self.states[a] = NodeState::Routed(route_b);
                    self.states[b] = NodeState::Routed(route_a);
                    self.recompute_cost(route_a);
                    self.recompute_cost(route_b);
                }
            }
            Move::Reverse { vehicle, from, to } => {
                self.routes[vehicle][from..=to].reverse();
                self.recompute_cost(vehicle);
            }
        }
    }
}

#[cfg(test)]
impl<'a> SearchState<'a> {
    /// Builds a state with the given routes already applied; visitable
    /// nodes absent from every route are marked dropped.
    pub(crate) fn with_routes(model: &'a RoutingModel, routes: Vec<Vec<usize>>) -> Self {
        let mut state = Self::new(model);
        for (vehicle, stops) in routes.into_iter().enumerate() {
            for node in &stops {
                state.states[*node] = NodeState::Routed(vehicle);
            }
            state.routes[vehicle] = stops;
            state.recompute_cost(vehicle);
        }
        for node in 0..model.num_nodes() {
            if !model.is_depot(node) && state.states[node] == NodeState::Unassigned {
                state.states[node] = NodeState::Dropped;
            }
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::CostMatrix;
    use crate::routing::UNBOUNDED;

    /// Two orders (pickups 0,1 / dropoffs 2,3), depot 4, one vehicle.
    fn paired_model(penalty: i64) -> RoutingModel {
        let points = [(0, 0), (4, 0), (2, 0), (6, 0), (0, 0)];
        let costs = CostMatrix::manhattan(&points);
        let mut model = RoutingModel::new(5, 1, vec![4], vec![4]).expect("valid");
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
        model.add_pickup_and_delivery(0, 2).expect("valid");
        model.add_pickup_and_delivery(1, 3).expect("valid");
        model.add_disjunction(&[0], penalty).expect("valid");
        model.add_disjunction(&[1], penalty).expect("valid");
        model
    }

    #[test]
    fn test_units_from_constraints() {
        let model = paired_model(100);
        let state = SearchState::new(&model);
        assert_eq!(
            state.units(),
            &[
                Unit::Pair {
                    pickup: 0,
                    dropoff: 2,
                },
                Unit::Pair {
                    pickup: 1,
                    dropoff: 3,
                },
            ]
        );
        assert!(!state.is_mandatory(0));
    }

    #[test]
    fn test_penalty_bookkeeping() {
        let model = paired_model(100);
        let mut state = SearchState::new(&model);
        assert_eq!(state.active_penalty(), 200);
        assert_eq!(state.penalty_freed_by(0), 100);

        let (mv, delta) = state.best_placement(0).expect("placeable");
        // Route 4 -> 0 -> 2 -> 4 on the line: 0 + 2 + 2.
        assert_eq!(delta, 4);
        state.apply(&mv);
        assert_eq!(state.active_penalty(), 100);
        assert_eq!(state.objective(), 104);
        assert_eq!(state.penalty_added_by_removal(0), 100);
    }

    #[test]
    fn test_drop_restores_penalty() {
        let model = paired_model(100);
        let mut state = SearchState::with_routes(&model, vec![vec![0, 2]]);
        assert_eq!(state.objective(), 4 + 100);
        state.apply(&Move::Drop { unit: 0 });
        assert_eq!(state.route(0), &[] as &[usize]);
        assert_eq!(state.objective(), 200);
        assert_eq!(state.dropped_nodes(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_best_slots_respects_pairing_feasibility() {
        let model = paired_model(100);
        let state = SearchState::new(&model);
        let unit = state.units()[0];
        let (first, second, cost) = state.best_slots(unit, 0, &[]).expect("placeable");
        assert_eq!((first, second), (0, 1));
        assert_eq!(cost, 4);
    }

    #[test]
    fn test_apply_swap_and_reverse() {
        let model = paired_model(100);
        let mut state = SearchState::with_routes(&model, vec![vec![0, 2, 1, 3]]);
        state.apply(&Move::Reverse {
            vehicle: 0,
            from: 1,
            to: 2,
        });
        assert_eq!(state.route(0), &[0, 1, 2, 3]);
        state.apply(&Move::Swap {
            route_a: 0,
            pos_a: 1,
            route_b: 0,
            pos_b: 2,
        });
        assert_eq!(state.route(0), &[0, 2, 1, 3]);
    }
}
