//! Assembly of orders, vehicles, and costs into a routing model.

use crate::cost::CostMatrix;
use crate::routing::{ConfigurationError, RoutingModel, UNBOUNDED};
use crate::search::SearchParameters;
use crate::solution::Assignment;

use super::{NodeIndexer, Order, Vehicle};

/// A complete pickup-and-delivery problem instance.
///
/// Owns the orders, the fleet, and a cost matrix over every node (order
/// nodes first, depot nodes after them, matching [`NodeIndexer`]'s layout),
/// plus per-node time windows and per-order penalties. [`Self::build_model`]
/// wires everything into a [`RoutingModel`]:
///
/// - a `"time"` dimension driven by the cost matrix, with free departure
///   times and unbounded waiting;
/// - a `"capacity"` dimension driven by order demands (loaded at the
///   pickup, unloaded at the dropoff), fixed to zero at route starts;
/// - a pickup/dropoff pair per order, and a singleton disjunction on each
///   pickup making the whole order droppable at its penalty;
/// - per-vehicle scaled arc costs and end-time bounds.
///
/// # Examples
///
/// ```
/// use pd_routing::cost::CostMatrix;
/// use pd_routing::models::{Location, Order, RoutingProblem, Vehicle};
/// use pd_routing::search::SearchParameters;
///
/// let orders = vec![Order::new(
///     Location::new("2416 W 3rd Ave", 0),
///     Location::new("1188 Richards St", 3_600),
/// )];
/// // Node layout: pickup 0, dropoff 1, depot 2.
/// let costs = CostMatrix::manhattan(&[(1, 0), (2, 0), (0, 0)]);
/// let vehicles = vec![Vehicle::new(0, 2, 2)];
///
/// let problem = RoutingProblem::new(orders, vehicles, costs, 10).unwrap();
/// let assignment = problem
///     .solve(&SearchParameters::default())
///     .unwrap()
///     .unwrap();
/// assert!(assignment.dropped_nodes().is_empty());
/// assert_eq!(assignment.objective(), 4);
/// ```
#[derive(Debug)]
pub struct RoutingProblem {
    orders: Vec<Order>,
    vehicles: Vec<Vehicle>,
    costs: CostMatrix,
    capacity: i64,
    indexer: NodeIndexer,
    time_windows: Vec<Option<(i64, i64)>>,
    penalties: Vec<i64>,
}

impl RoutingProblem {
    /// Assembles a problem instance.
    ///
    /// The cost matrix must cover all order nodes plus every depot the
    /// vehicles reference; nodes beyond the order range are registered as
    /// depots. Fails with [`ConfigurationError`] when the matrix is too
    /// small, a vehicle references a non-depot node, or `capacity` is
    /// negative.
    pub fn new(
        orders: Vec<Order>,
        vehicles: Vec<Vehicle>,
        costs: CostMatrix,
        capacity: i64,
    ) -> Result<Self, ConfigurationError> {
        if capacity < 0 {
            return Err(ConfigurationError::NegativeCapacity {
                name: "capacity".to_string(),
                capacity,
            });
        }
        let mut indexer = NodeIndexer::new(orders.len());
        if costs.size() < 2 * orders.len() {
            return Err(ConfigurationError::CostMatrixTooSmall {
                size: costs.size(),
                required: 2 * orders.len(),
            });
        }
        while indexer.num_nodes() < costs.size() {
            indexer.add_depot();
        }
        for vehicle in &vehicles {
            for node in [vehicle.start_node(), vehicle.end_node()] {
                if !indexer.is_depot(node) {
                    return Err(ConfigurationError::UnknownNode { node });
                }
            }
        }
        let penalties = vec![UNBOUNDED; orders.len()];
        let time_windows = vec![None; costs.size()];
        Ok(Self {
            orders,
            vehicles,
            costs,
            capacity,
            indexer,
            time_windows,
            penalties,
        })
    }

    /// Imposes a `[min, max]` time window on one node.
    pub fn set_time_window(
        &mut self,
        node: usize,
        min: i64,
        max: i64,
    ) -> Result<(), ConfigurationError> {
        if node >= self.indexer.num_nodes() {
            return Err(ConfigurationError::UnknownNode { node });
        }
        if min > max {
            return Err(ConfigurationError::InvalidRange { min, max });
        }
        self.time_windows[node] = Some((min, max));
        Ok(())
    }

    /// Sets the penalty charged when an order is dropped.
    pub fn set_penalty(&mut self, order: usize, penalty: i64) -> Result<(), ConfigurationError> {
        if order >= self.orders.len() {
            return Err(ConfigurationError::UnknownOrder { order });
        }
        if penalty < 0 {
            return Err(ConfigurationError::NegativePenalty { penalty });
        }
        self.penalties[order] = penalty;
        Ok(())
    }

    /// The configured orders.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// The configured fleet.
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// The node index space of this instance.
    pub fn indexer(&self) -> &NodeIndexer {
        &self.indexer
    }

    /// The arc-cost matrix.
    pub fn costs(&self) -> &CostMatrix {
        &self.costs
    }

    /// The shared vehicle carrying capacity.
    pub fn capacity(&self) -> i64 {
        self.capacity
    }

    /// Builds the fully-registered routing model for this instance.
    pub fn build_model(&self) -> Result<RoutingModel, ConfigurationError> {
        let num_nodes = self.costs.size();
        let starts = self.vehicles.iter().map(Vehicle::start_node).collect();
        let ends = self.vehicles.iter().map(Vehicle::end_node).collect();
        let mut model = RoutingModel::new(num_nodes, self.vehicles.len(), starts, ends)?;

        let travel = self.costs.clone();
        model.add_dimension(
            Box::new(move |from, to| travel.get(from, to)),
            UNBOUNDED,
            UNBOUNDED,
            false,
            "time",
        )?;

        let mut demand = vec![0i64; num_nodes];
        for (order, details) in self.orders.iter().enumerate() {
            let pickup = self
                .indexer
                .pickup(order)
                .ok_or(ConfigurationError::UnknownOrder { order })?;
            let dropoff = self
                .indexer
                .dropoff(order)
                .ok_or(ConfigurationError::UnknownOrder { order })?;
            demand[pickup] = details.demand();
            demand[dropoff] = -details.demand();
        }
        model.add_dimension(
            Box::new(move |from, _| demand[from]),
            0,
            self.capacity,
            true,
            "capacity",
        )?;

        for (index, vehicle) in self.vehicles.iter().enumerate() {
            let arc = self.costs.clone();
            let coefficient = vehicle.cost_coefficient();
            model.set_vehicle_cost(
                index,
                Box::new(move |from, to| coefficient * arc.get(from, to)),
            )?;
            model
                .cumul_var(model.end(index), "time")?
                .set_max(vehicle.end_time_max())?;
        }

        for order in 0..self.orders.len() {
            let pickup = self
                .indexer
                .pickup(order)
                .ok_or(ConfigurationError::UnknownOrder { order })?;
            let dropoff = self
                .indexer
                .dropoff(order)
                .ok_or(ConfigurationError::UnknownOrder { order })?;
            model.add_pickup_and_delivery(pickup, dropoff)?;
            model.add_disjunction(&[pickup], self.penalties[order])?;
        }

        for (node, window) in self.time_windows.iter().enumerate() {
            if let Some((min, max)) = window {
                model.cumul_var(node, "time")?.set_range(*min, *max)?;
            }
        }

        Ok(model)
    }

    /// Builds the model and solves it in one call.
    pub fn solve(
        &self,
        parameters: &SearchParameters,
    ) -> Result<Option<Assignment>, ConfigurationError> {
        let model = self.build_model()?;
        Ok(model.solve_with_parameters(parameters))
    }
}
