//! Vehicle type with depot and cost parameters.

use serde::{Deserialize, Serialize};

use crate::routing::UNBOUNDED;

/// A vehicle in the fleet.
///
/// References its start and end depot nodes by index into the node space
/// (depots may be shared between vehicles or distinct), scales its arc costs
/// by a coefficient, and bounds the accumulated time at its route end.
///
/// # Examples
///
/// ```
/// use pd_routing::models::Vehicle;
///
/// let v = Vehicle::new(0, 4, 5)
///     .with_cost_coefficient(2)
///     .with_end_time_max(1000);
/// assert_eq!(v.start_node(), 4);
/// assert_eq!(v.cost_coefficient(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    id: usize,
    start_node: usize,
    end_node: usize,
    cost_coefficient: i64,
    end_time_max: i64,
}

impl Vehicle {
    /// Creates a vehicle with the given ID and depot nodes.
    ///
    /// Defaults: cost coefficient 1, end time unbounded.
    pub fn new(id: usize, start_node: usize, end_node: usize) -> Self {
        Self {
            id,
            start_node,
            end_node,
            cost_coefficient: 1,
            end_time_max: UNBOUNDED,
        }
    }

    /// Sets the multiplier applied to every arc cost this vehicle incurs.
    pub fn with_cost_coefficient(mut self, coefficient: i64) -> Self {
        self.cost_coefficient = coefficient;
        self
    }

    /// Sets the latest allowed accumulated time at the route end.
    pub fn with_end_time_max(mut self, max: i64) -> Self {
        self.end_time_max = max;
        self
    }

    /// Caller-assigned vehicle ID.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Start depot node index.
    pub fn start_node(&self) -> usize {
        self.start_node
    }

    /// End depot node index.
    pub fn end_node(&self) -> usize {
        self.end_node
    }

    /// Multiplier applied to this vehicle's arc costs.
    pub fn cost_coefficient(&self) -> i64 {
        self.cost_coefficient
    }

    /// Latest allowed accumulated time at the route end.
    pub fn end_time_max(&self) -> i64 {
        self.end_time_max
    }
}
