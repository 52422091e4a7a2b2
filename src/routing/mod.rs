//! The routing model: nodes, vehicles, dimensions, and constraints.
//!
//! A [`RoutingModel`] binds a dense node index space, a vehicle fleet with
//! per-vehicle start/end depots, cumulative [`Dimension`]s, pickup/dropoff
//! pairing, and disjunctions with penalties into one constraint problem, and
//! exposes [`RoutingModel::solve_with_parameters`] to run the search.
//!
//! A model is built and solved by a single logical owner and discarded after
//! the solve; it is not thread-safe and holds no global state, so separate
//! instances solve independently.

mod constraint;
mod dimension;
mod error;

pub use constraint::{Constraint, PairRole};
pub use dimension::{ArcCostFn, CumulRange, CumulVar, Dimension, TransitFn, UNBOUNDED};
pub use error::ConfigurationError;

use std::fmt;

use crate::search::SearchParameters;
use crate::solution::Assignment;

/// A node's membership in a pickup/dropoff pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PairLink {
    /// The other node of the pair.
    pub partner: usize,
    /// This node's role.
    pub role: PairRole,
}

/// The central routing problem: nodes, vehicles, dimensions, constraints,
/// and arc costs.
///
/// Nodes are dense integer indices. Every node that is not some vehicle's
/// start or end depot is a visitable stop; stops may be tied into
/// pickup/dropoff pairs and made droppable through disjunctions.
///
/// # Examples
///
/// ```
/// use pd_routing::routing::{RoutingModel, UNBOUNDED};
/// use pd_routing::search::SearchParameters;
///
/// // Nodes 0..2 are stops, node 2 is a shared depot.
/// let mut model = RoutingModel::new(3, 1, vec![2], vec![2]).unwrap();
/// let coords = [0i64, 1, 2];
/// model
///     .add_dimension(
///         Box::new(move |from, to| (coords[from] - coords[to]).abs()),
///         UNBOUNDED,
///         UNBOUNDED,
///         false,
///         "time",
///     )
///     .unwrap();
/// model.add_pickup_and_delivery(0, 1).unwrap();
/// model.add_disjunction(&[0], 500).unwrap();
/// let coords = [0i64, 1, 2];
/// model.set_arc_cost(Box::new(move |from, to| (coords[from] - coords[to]).abs()));
///
/// let assignment = model
///     .solve_with_parameters(&SearchParameters::default())
///     .unwrap();
/// // Routing the order costs 2+1+1 = 4, far below the penalty of 500.
/// assert_eq!(assignment.objective(), 4);
/// assert!(assignment.dropped_nodes().is_empty());
/// ```
pub struct RoutingModel {
    num_nodes: usize,
    starts: Vec<usize>,
    ends: Vec<usize>,
    depot: Vec<bool>,
    dimensions: Vec<Dimension>,
    constraints: Vec<Constraint>,
    pair_of: Vec<Option<PairLink>>,
    disjunction_of: Vec<Option<usize>>,
    arc_cost: Option<ArcCostFn>,
    vehicle_costs: Vec<Option<ArcCostFn>>,
}

impl RoutingModel {
    /// Creates a model with `num_nodes` nodes and one start/end depot node
    /// per vehicle.
    ///
    /// Fails with [`ConfigurationError`] if the depot vectors do not match
    /// `num_vehicles` or reference nodes outside `[0, num_nodes)`.
    pub fn new(
        num_nodes: usize,
        num_vehicles: usize,
        starts: Vec<usize>,
        ends: Vec<usize>,
    ) -> Result<Self, ConfigurationError> {
        if starts.len() != num_vehicles || ends.len() != num_vehicles {
            return Err(ConfigurationError::VehicleCountMismatch {
                vehicles: num_vehicles,
                starts: starts.len(),
                ends: ends.len(),
            });
        }
        let mut depot = vec![false; num_nodes];
        for &node in starts.iter().chain(ends.iter()) {
            if node >= num_nodes {
                return Err(ConfigurationError::UnknownNode { node });
            }
            depot[node] = true;
        }
        Ok(Self {
            num_nodes,
            starts,
            ends,
            depot,
            dimensions: Vec::new(),
            constraints: Vec::new(),
            pair_of: vec![None; num_nodes],
            disjunction_of: vec![None; num_nodes],
            arc_cost: None,
            vehicle_costs: (0..num_vehicles).map(|_| None).collect(),
        })
    }

    /// Total number of nodes, depots included.
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Number of vehicles in the fleet.
    pub fn num_vehicles(&self) -> usize {
        self.starts.len()
    }

    /// Start depot node of `vehicle`.
    ///
    /// # Panics
    ///
    /// Panics if `vehicle` is out of range.
    pub fn start(&self, vehicle: usize) -> usize {
        self.starts[vehicle]
    }

    /// End depot node of `vehicle`.
    ///
    /// # Panics
    ///
    /// Panics if `vehicle` is out of range.
    pub fn end(&self, vehicle: usize) -> usize {
        self.ends[vehicle]
    }

    /// Returns `true` if `node` is some vehicle's start or end depot.
    ///
    /// # Panics
    ///
    /// Panics if `node` is out of range.
    pub fn is_depot(&self, node: usize) -> bool {
        self.depot[node]
    }

    /// Registers a cumulative dimension.
    ///
    /// `transit` yields the amount added along each arc, `slack_max` bounds
    /// waiting between stops, `capacity_max` caps the accumulated value
    /// everywhere, and `fix_start_to_zero` pins the value at route starts
    /// (load) or leaves departure times free (time).
    ///
    /// Fails with [`ConfigurationError`] on a duplicate name or a negative
    /// capacity or slack bound.
    pub fn add_dimension(
        &mut self,
        transit: TransitFn,
        slack_max: i64,
        capacity_max: i64,
        fix_start_to_zero: bool,
        name: &str,
    ) -> Result<(), ConfigurationError> {
        if self.dimensions.iter().any(|d| d.name() == name) {
            return Err(ConfigurationError::DuplicateDimension {
                name: name.to_string(),
            });
        }
        if capacity_max < 0 {
            return Err(ConfigurationError::NegativeCapacity {
                name: name.to_string(),
                capacity: capacity_max,
            });
        }
        if slack_max < 0 {
            return Err(ConfigurationError::NegativeSlack {
                name: name.to_string(),
                slack: slack_max,
            });
        }
        self.dimensions.push(Dimension::new(
            name.to_string(),
            transit,
            slack_max,
            capacity_max,
            fix_start_to_zero,
            self.num_nodes,
        ));
        Ok(())
    }

    /// The registered dimensions, in registration order.
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// Looks up a dimension by name.
    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.name() == name)
    }

    /// Registers a pickup/dropoff pair: both nodes must be served by the
    /// same vehicle, pickup strictly before dropoff, or neither is served.
    ///
    /// Fails with [`ConfigurationError`] if either node is unknown, is a
    /// depot, already belongs to a pair, or `pickup == dropoff`.
    pub fn add_pickup_and_delivery(
        &mut self,
        pickup: usize,
        dropoff: usize,
    ) -> Result<(), ConfigurationError> {
        if pickup == dropoff {
            return Err(ConfigurationError::PickupEqualsDropoff { node: pickup });
        }
        for node in [pickup, dropoff] {
            if node >= self.num_nodes {
                return Err(ConfigurationError::UnknownNode { node });
            }
            if self.depot[node] {
                return Err(ConfigurationError::DepotInConstraint { node });
            }
            if self.pair_of[node].is_some() {
                return Err(ConfigurationError::NodeAlreadyPaired { node });
            }
        }
        self.pair_of[pickup] = Some(PairLink {
            partner: dropoff,
            role: PairRole::Pickup,
        });
        self.pair_of[dropoff] = Some(PairLink {
            partner: pickup,
            role: PairRole::Dropoff,
        });
        self.constraints
            .push(Constraint::PickupDelivery { pickup, dropoff });
        Ok(())
    }

    /// Registers a disjunction: at most one of `nodes` may be visited, and
    /// `penalty` is charged when none is.
    ///
    /// Fails with [`ConfigurationError`] on a negative penalty, an empty
    /// node set, an unknown or depot node, or a node already covered by
    /// another disjunction.
    pub fn add_disjunction(
        &mut self,
        nodes: &[usize],
        penalty: i64,
    ) -> Result<(), ConfigurationError> {
        if penalty < 0 {
            return Err(ConfigurationError::NegativePenalty { penalty });
        }
        if nodes.is_empty() {
            return Err(ConfigurationError::EmptyDisjunction);
        }
        for &node in nodes {
            if node >= self.num_nodes {
                return Err(ConfigurationError::UnknownNode { node });
            }
            if self.depot[node] {
                return Err(ConfigurationError::DepotInConstraint { node });
            }
            if self.disjunction_of[node].is_some() {
                return Err(ConfigurationError::NodeAlreadyInDisjunction { node });
            }
        }
        let index = self.constraints.len();
        for &node in nodes {
            self.disjunction_of[node] = Some(index);
        }
        self.constraints.push(Constraint::Disjunction {
            nodes: nodes.to_vec(),
            penalty,
        });
        Ok(())
    }

    /// Sets the arc-cost function used for every vehicle without a
    /// per-vehicle override. Vehicles with neither contribute zero arc cost.
    pub fn set_arc_cost(&mut self, cost: ArcCostFn) {
        self.arc_cost = Some(cost);
    }

    /// Overrides the arc-cost function for one vehicle (e.g. to scale
    /// distances by that vehicle's cost coefficient).
    ///
    /// Fails with [`ConfigurationError::UnknownVehicle`] on a bad index.
    pub fn set_vehicle_cost(
        &mut self,
        vehicle: usize,
        cost: ArcCostFn,
    ) -> Result<(), ConfigurationError> {
        if vehicle >= self.vehicle_costs.len() {
            return Err(ConfigurationError::UnknownVehicle { vehicle });
        }
        self.vehicle_costs[vehicle] = Some(cost);
        Ok(())
    }

    /// Mutable handle to the cumulative variable of `node` in the named
    /// dimension.
    ///
    /// Fails with [`ConfigurationError`] if the node or dimension is
    /// unknown.
    pub fn cumul_var(
        &mut self,
        node: usize,
        dimension: &str,
    ) -> Result<CumulVar<'_>, ConfigurationError> {
        if node >= self.num_nodes {
            return Err(ConfigurationError::UnknownNode { node });
        }
        let dim = self
            .dimensions
            .iter_mut()
            .find(|d| d.name() == dimension)
            .ok_or_else(|| ConfigurationError::UnknownDimension {
                name: dimension.to_string(),
            })?;
        Ok(CumulVar { dim, node })
    }

    /// The registered constraints, in registration order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Runs construction plus local-search improvement and returns the best
    /// assignment found.
    ///
    /// Returns `None` only when no feasible assignment exists at all: a
    /// mandatory node cannot be placed, or a vehicle's depot-to-depot
    /// traversal violates a dimension's domains. Since orders are normally
    /// wrapped in disjunctions, dropping everything is almost always a
    /// feasible fallback, so `None` signals malformed input rather than an
    /// unlucky search.
    pub fn solve_with_parameters(&self, parameters: &SearchParameters) -> Option<Assignment> {
        crate::search::run(self, parameters)
    }

    /// Arc cost of `(from, to)` as charged to `vehicle`.
    pub(crate) fn arc_cost_for(&self, vehicle: usize, from: usize, to: usize) -> i64 {
        match (&self.vehicle_costs[vehicle], &self.arc_cost) {
            (Some(cost), _) => cost(from, to),
            (None, Some(cost)) => cost(from, to),
            (None, None) => 0,
        }
    }

    pub(crate) fn pair_link(&self, node: usize) -> Option<PairLink> {
        self.pair_of[node]
    }

    pub(crate) fn disjunction_index(&self, node: usize) -> Option<usize> {
        self.disjunction_of[node]
    }

    /// A node is optional when it, or its pair partner, belongs to a
    /// disjunction; the pairing constraint propagates droppability.
    pub(crate) fn is_optional(&self, node: usize) -> bool {
        if self.disjunction_of[node].is_some() {
            return true;
        }
        self.pair_of[node]
            .is_some_and(|link| self.disjunction_of[link.partner].is_some())
    }

    /// Checks pickup-before-dropoff ordering inside one stop sequence.
    ///
    /// Both nodes of every pair touched by `stops` must be present in the
    /// sequence with the pickup first.
    pub(crate) fn pairing_order_ok(&self, stops: &[usize]) -> bool {
        for (position, &node) in stops.iter().enumerate() {
            let Some(link) = self.pair_of[node] else {
                continue;
            };
            let partner_position = stops.iter().position(|&n| n == link.partner);
            match (link.role, partner_position) {
                (PairRole::Pickup, Some(p)) if p > position => {}
                (PairRole::Dropoff, Some(p)) if p < position => {}
                _ => return false,
            }
        }
        true
    }
}

impl fmt::Debug for RoutingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutingModel")
            .field("num_nodes", &self.num_nodes)
            .field("num_vehicles", &self.starts.len())
            .field("dimensions", &self.dimensions)
            .field("constraints", &self.constraints.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> RoutingModel {
        // Nodes 0..4 are stops, 4 and 5 are depots for one vehicle.
        RoutingModel::new(6, 1, vec![4], vec![5]).expect("valid")
    }

    #[test]
    fn test_new_validates_depots() {
        assert_eq!(
            RoutingModel::new(4, 2, vec![0], vec![1, 2]).unwrap_err(),
            ConfigurationError::VehicleCountMismatch {
                vehicles: 2,
                starts: 1,
                ends: 2,
            }
        );
        assert_eq!(
            RoutingModel::new(4, 1, vec![9], vec![0]).unwrap_err(),
            ConfigurationError::UnknownNode { node: 9 }
        );
    }

    #[test]
    fn test_depot_flags() {
        let m = model();
        assert!(m.is_depot(4));
        assert!(m.is_depot(5));
        assert!(!m.is_depot(0));
        assert_eq!(m.start(0), 4);
        assert_eq!(m.end(0), 5);
    }

    #[test]
    fn test_add_dimension_duplicate() {
        let mut m = model();
        m.add_dimension(Box::new(|_, _| 1), 0, 10, true, "capacity")
            .expect("valid");
        assert_eq!(
            m.add_dimension(Box::new(|_, _| 1), 0, 10, true, "capacity")
                .unwrap_err(),
            ConfigurationError::DuplicateDimension {
                name: "capacity".to_string(),
            }
        );
    }

    #[test]
    fn test_add_dimension_negative_bounds() {
        let mut m = model();
        assert_eq!(
            m.add_dimension(Box::new(|_, _| 1), 0, -1, true, "capacity")
                .unwrap_err(),
            ConfigurationError::NegativeCapacity {
                name: "capacity".to_string(),
                capacity: -1,
            }
        );
        assert_eq!(
            m.add_dimension(Box::new(|_, _| 1), -5, 10, true, "capacity")
                .unwrap_err(),
            ConfigurationError::NegativeSlack {
                name: "capacity".to_string(),
                slack: -5,
            }
        );
    }

    #[test]
    fn test_pairing_registration() {
        let mut m = model();
        m.add_pickup_and_delivery(0, 1).expect("valid");
        assert_eq!(
            m.add_pickup_and_delivery(0, 2).unwrap_err(),
            ConfigurationError::NodeAlreadyPaired { node: 0 }
        );
        assert_eq!(
            m.add_pickup_and_delivery(2, 2).unwrap_err(),
            ConfigurationError::PickupEqualsDropoff { node: 2 }
        );
        assert_eq!(
            m.add_pickup_and_delivery(2, 4).unwrap_err(),
            ConfigurationError::DepotInConstraint { node: 4 }
        );
        assert_eq!(
            m.add_pickup_and_delivery(2, 9).unwrap_err(),
            ConfigurationError::UnknownNode { node: 9 }
        );
    }

    #[test]
    fn test_disjunction_registration() {
        let mut m = model();
        m.add_disjunction(&[0], 1000).expect("valid");
        assert_eq!(
            m.add_disjunction(&[0], 500).unwrap_err(),
            ConfigurationError::NodeAlreadyInDisjunction { node: 0 }
        );
        assert_eq!(
            m.add_disjunction(&[1], -5).unwrap_err(),
            ConfigurationError::NegativePenalty { penalty: -5 }
        );
        assert_eq!(
            m.add_disjunction(&[], 10).unwrap_err(),
            ConfigurationError::EmptyDisjunction
        );
        assert_eq!(
            m.add_disjunction(&[4], 10).unwrap_err(),
            ConfigurationError::DepotInConstraint { node: 4 }
        );
    }

    #[test]
    fn test_optionality_propagates_through_pair() {
        let mut m = model();
        m.add_pickup_and_delivery(0, 1).expect("valid");
        m.add_disjunction(&[0], 1000).expect("valid");
        assert!(m.is_optional(0));
        assert!(m.is_optional(1));
        assert!(!m.is_optional(2));
    }

    #[test]
    fn test_cumul_var_unknown() {
        let mut m = model();
        assert_eq!(
            m.cumul_var(0, "time").unwrap_err(),
            ConfigurationError::UnknownDimension {
                name: "time".to_string(),
            }
        );
        m.add_dimension(Box::new(|_, _| 0), 0, 100, false, "time")
            .expect("valid");
        assert_eq!(
            m.cumul_var(42, "time").unwrap_err(),
            ConfigurationError::UnknownNode { node: 42 }
        );
        m.cumul_var(0, "time")
            .expect("valid")
            .set_range(5, 10)
            .expect("valid");
        assert_eq!(
            m.dimension("time").expect("registered").range(0),
            CumulRange::new(5, 10)
        );
    }

    #[test]
    fn test_vehicle_cost_unknown_vehicle() {
        let mut m = model();
        assert_eq!(
            m.set_vehicle_cost(3, Box::new(|_, _| 0)).unwrap_err(),
            ConfigurationError::UnknownVehicle { vehicle: 3 }
        );
    }

    #[test]
    fn test_arc_cost_precedence() {
        let mut m = RoutingModel::new(3, 2, vec![2, 2], vec![2, 2]).expect("valid");
        assert_eq!(m.arc_cost_for(0, 0, 1), 0);
        m.set_arc_cost(Box::new(|_, _| 7));
        assert_eq!(m.arc_cost_for(0, 0, 1), 7);
        m.set_vehicle_cost(1, Box::new(|_, _| 21)).expect("valid");
        assert_eq!(m.arc_cost_for(0, 0, 1), 7);
        assert_eq!(m.arc_cost_for(1, 0, 1), 21);
    }

    #[test]
    fn test_pairing_order_ok() {
        let mut m = model();
        m.add_pickup_and_delivery(0, 1).expect("valid");
        assert!(m.pairing_order_ok(&[0, 1]));
        assert!(m.pairing_order_ok(&[0, 2, 1]));
        assert!(!m.pairing_order_ok(&[1, 0]));
        // A lone half of a pair is never a valid sequence.
        assert!(!m.pairing_order_ok(&[0]));
        assert!(m.pairing_order_ok(&[2, 3]));
    }
}
