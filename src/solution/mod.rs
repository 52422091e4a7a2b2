//! Solve output: per-vehicle routes, cumulative bounds, dropped orders.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::evaluation::RouteEvaluator;
use crate::routing::{CumulRange, RoutingModel};

/// Final placement of a node in an assignment.
///
/// The three states are deliberately distinct: a node that was never
/// considered is `Unassigned`, a node on a route is `Routed` with its
/// successor, and a node deliberately left unvisited (its disjunction
/// penalty paid) is `Dropped`. Finished solves only ever contain `Routed`
/// and `Dropped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeStatus {
    /// Not placed and not given up on (never present in a finished solve).
    Unassigned,
    /// Visited by the given vehicle; `next` is `None` at the route end.
    Routed {
        /// The serving vehicle.
        vehicle: usize,
        /// The following node on the route, if any.
        next: Option<usize>,
    },
    /// Left unvisited at a penalty.
    Dropped,
}

/// One visited node with its resolved cumulative bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stop {
    node: usize,
    cumuls: Vec<CumulRange>,
}

impl Stop {
    /// The node visited at this stop.
    pub fn node(&self) -> usize {
        self.node
    }

    /// `[earliest, latest]` bounds per dimension, in registration order.
    pub fn cumuls(&self) -> &[CumulRange] {
        &self.cumuls
    }

    /// Bounds for one dimension by index.
    pub fn cumul(&self, dimension: usize) -> Option<CumulRange> {
        self.cumuls.get(dimension).copied()
    }
}

/// One vehicle's ordered stop sequence, start and end depots included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleRoute {
    vehicle: usize,
    stops: Vec<Stop>,
}

impl VehicleRoute {
    /// The vehicle this route belongs to.
    pub fn vehicle(&self) -> usize {
        self.vehicle
    }

    /// All stops, from start depot to end depot.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// The visited order nodes, depots excluded.
    pub fn visited(&self) -> &[Stop] {
        &self.stops[1..self.stops.len() - 1]
    }

    /// `true` when the vehicle goes straight from its start depot to its
    /// end depot.
    pub fn is_empty(&self) -> bool {
        self.visited().is_empty()
    }
}

/// An immutable solve result.
///
/// Owns the objective value, the per-vehicle routes with resolved
/// cumulative bounds, the dropped-node set, and a per-node [`NodeStatus`].
/// Produced once per solve and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    objective: i64,
    dimension_names: Vec<String>,
    routes: Vec<VehicleRoute>,
    dropped: Vec<usize>,
    status: Vec<NodeStatus>,
}

impl Assignment {
    /// Walks the final routes and resolves cumulative bounds per stop.
    pub(crate) fn extract(
        model: &RoutingModel,
        routes: &[Vec<usize>],
        dropped: &[usize],
        objective: i64,
    ) -> Self {
        let dimension_names: Vec<String> = model
            .dimensions()
            .iter()
            .map(|dim| dim.name().to_string())
            .collect();
        let mut status = vec![NodeStatus::Unassigned; model.num_nodes()];
        for &node in dropped {
            status[node] = NodeStatus::Dropped;
        }

        let mut vehicle_routes = Vec::with_capacity(routes.len());
        for (vehicle, stops) in routes.iter().enumerate() {
            let evaluator = RouteEvaluator::new(model, vehicle);
            let bounds: Vec<Vec<CumulRange>> = model
                .dimensions()
                .iter()
                .map(|dim| {
                    evaluator
                        .cumul_bounds(stops, dim)
                        .expect("final routes satisfy every dimension")
                })
                .collect();

            let mut sequence = Vec::with_capacity(stops.len() + 2);
            sequence.push(model.start(vehicle));
            sequence.extend_from_slice(stops);
            sequence.push(model.end(vehicle));

            for (position, &node) in sequence.iter().enumerate() {
                status[node] = NodeStatus::Routed {
                    vehicle,
                    next: sequence.get(position + 1).copied(),
                };
            }
            let stops = sequence
                .iter()
                .enumerate()
                .map(|(position, &node)| Stop {
                    node,
                    cumuls: bounds.iter().map(|per_dim| per_dim[position]).collect(),
                })
                .collect();
            vehicle_routes.push(VehicleRoute { vehicle, stops });
        }

        Self {
            objective,
            dimension_names,
            routes: vehicle_routes,
            dropped: dropped.to_vec(),
            status,
        }
    }

    /// Total objective: arc costs of all routes plus penalties of all
    /// dropped orders.
    pub fn objective(&self) -> i64 {
        self.objective
    }

    /// Per-vehicle routes, indexed by vehicle.
    pub fn routes(&self) -> &[VehicleRoute] {
        &self.routes
    }

    /// The route of one vehicle.
    pub fn route(&self, vehicle: usize) -> Option<&VehicleRoute> {
        self.routes.get(vehicle)
    }

    /// Nodes left unvisited, sorted ascending. Both nodes of a dropped
    /// order appear; map them back to orders with
    /// [`NodeIndexer::order_of`](crate::models::NodeIndexer::order_of).
    pub fn dropped_nodes(&self) -> &[usize] {
        &self.dropped
    }

    /// Whether the given node was dropped.
    pub fn is_dropped(&self, node: usize) -> bool {
        self.dropped.binary_search(&node).is_ok()
    }

    /// Final status of a node, or `None` for an out-of-range index.
    ///
    /// Depot nodes shared between vehicles report the highest-indexed
    /// vehicle that traverses them; the routes themselves are authoritative.
    pub fn status(&self, node: usize) -> Option<NodeStatus> {
        self.status.get(node).copied()
    }

    /// Dimension names, in the order `Stop::cumuls` uses.
    pub fn dimension_names(&self) -> &[String] {
        &self.dimension_names
    }

    /// Index of a dimension by name.
    pub fn dimension_index(&self, name: &str) -> Option<usize> {
        self.dimension_names.iter().position(|n| n == name)
    }
}

impl fmt::Display for Assignment {
    /// Human-readable summary: total cost, dropped nodes, one line per
    /// vehicle with each stop's cumulative bounds.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total cost: {}", self.objective)?;
        if !self.dropped.is_empty() {
            write!(f, "Dropped orders:")?;
            for node in &self.dropped {
                write!(f, " {node}")?;
            }
            writeln!(f)?;
        }
        for route in &self.routes {
            write!(f, "Vehicle {}: ", route.vehicle())?;
            if route.is_empty() {
                writeln!(f, "Empty")?;
                continue;
            }
            for (position, stop) in route.stops().iter().enumerate() {
                if position > 0 {
                    write!(f, " -> ")?;
                }
                write!(f, "{}", stop.node())?;
                for (name, range) in self.dimension_names.iter().zip(stop.cumuls()) {
                    if range.min == range.max {
                        write!(f, " {name}({})", range.min)?;
                    } else {
                        write!(f, " {name}({}, {})", range.min, range.max)?;
                    }
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
