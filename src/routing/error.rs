//! Model configuration errors.

use std::fmt;

/// An error raised while registering model components.
///
/// Configuration errors are fail-fast: they are returned immediately by the
/// registration call that caused them and are never retried or deferred to
/// the search phase. Absence of a feasible solution is *not* an error — see
/// [`RoutingModel::solve_with_parameters`](crate::routing::RoutingModel::solve_with_parameters).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The start/end depot vectors do not match the vehicle count.
    VehicleCountMismatch {
        /// Number of vehicles the model was created with.
        vehicles: usize,
        /// Length of the start-node vector.
        starts: usize,
        /// Length of the end-node vector.
        ends: usize,
    },
    /// A node index outside `[0, num_nodes)` was referenced.
    UnknownNode {
        /// The offending node index.
        node: usize,
    },
    /// A vehicle index outside `[0, num_vehicles)` was referenced.
    UnknownVehicle {
        /// The offending vehicle index.
        vehicle: usize,
    },
    /// A dimension name that was never registered.
    UnknownDimension {
        /// The requested dimension name.
        name: String,
    },
    /// An order index outside the configured order set.
    UnknownOrder {
        /// The offending order index.
        order: usize,
    },
    /// A dimension with this name is already registered.
    DuplicateDimension {
        /// The duplicated dimension name.
        name: String,
    },
    /// A dimension was registered with a negative global capacity.
    NegativeCapacity {
        /// Dimension name.
        name: String,
        /// The rejected capacity value.
        capacity: i64,
    },
    /// A dimension was registered with a negative slack bound.
    NegativeSlack {
        /// Dimension name.
        name: String,
        /// The rejected slack value.
        slack: i64,
    },
    /// A node already belongs to another pickup/dropoff pair.
    NodeAlreadyPaired {
        /// The offending node index.
        node: usize,
    },
    /// A pickup/dropoff pair referencing the same node twice.
    PickupEqualsDropoff {
        /// The node used on both sides.
        node: usize,
    },
    /// A depot node was used in a pairing or disjunction.
    DepotInConstraint {
        /// The offending depot node.
        node: usize,
    },
    /// A disjunction with no member nodes.
    EmptyDisjunction,
    /// A node already covered by another disjunction.
    NodeAlreadyInDisjunction {
        /// The offending node index.
        node: usize,
    },
    /// A disjunction penalty below zero (dropping must never be profitable).
    NegativePenalty {
        /// The rejected penalty value.
        penalty: i64,
    },
    /// A cumulative range with `min > max`.
    InvalidRange {
        /// Requested lower bound.
        min: i64,
        /// Requested upper bound.
        max: i64,
    },
    /// A cost matrix too small to cover every routing node.
    CostMatrixTooSmall {
        /// Matrix size (number of locations it covers).
        size: usize,
        /// Number of nodes that must be covered.
        required: usize,
    },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VehicleCountMismatch {
                vehicles,
                starts,
                ends,
            } => write!(
                f,
                "expected {vehicles} start and end depots, got {starts} starts and {ends} ends"
            ),
            Self::UnknownNode { node } => write!(f, "unknown node index {node}"),
            Self::UnknownVehicle { vehicle } => write!(f, "unknown vehicle index {vehicle}"),
            Self::UnknownDimension { name } => write!(f, "unknown dimension \"{name}\""),
            Self::UnknownOrder { order } => write!(f, "unknown order index {order}"),
            Self::DuplicateDimension { name } => {
                write!(f, "dimension \"{name}\" is already registered")
            }
            Self::NegativeCapacity { name, capacity } => write!(
                f,
                "dimension \"{name}\" registered with negative capacity {capacity}"
            ),
            Self::NegativeSlack { name, slack } => write!(
                f,
                "dimension \"{name}\" registered with negative slack {slack}"
            ),
            Self::NodeAlreadyPaired { node } => {
                write!(f, "node {node} already belongs to a pickup/dropoff pair")
            }
            Self::PickupEqualsDropoff { node } => {
                write!(f, "pickup and dropoff are both node {node}")
            }
            Self::DepotInConstraint { node } => {
                write!(f, "depot node {node} cannot appear in a constraint")
            }
            Self::EmptyDisjunction => write!(f, "disjunction has no member nodes"),
            Self::NodeAlreadyInDisjunction { node } => {
                write!(f, "node {node} already belongs to a disjunction")
            }
            Self::NegativePenalty { penalty } => {
                write!(f, "disjunction penalty {penalty} is negative")
            }
            Self::InvalidRange { min, max } => {
                write!(f, "invalid cumulative range [{min}, {max}]")
            }
            Self::CostMatrixTooSmall { size, required } => write!(
                f,
                "cost matrix covers {size} locations but {required} nodes are configured"
            ),
        }
    }
}

impl std::error::Error for ConfigurationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ConfigurationError::DuplicateDimension {
            name: "time".to_string(),
        };
        assert_eq!(err.to_string(), "dimension \"time\" is already registered");

        let err = ConfigurationError::InvalidRange { min: 10, max: 5 };
        assert_eq!(err.to_string(), "invalid cumulative range [10, 5]");
    }

    #[test]
    fn test_is_std_error() {
        fn assert_error<E: std::error::Error>(_: &E) {}
        assert_error(&ConfigurationError::EmptyDisjunction);
    }
}
