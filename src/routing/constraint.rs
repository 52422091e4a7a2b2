//! Constraints registered on a routing model.

use serde::{Deserialize, Serialize};

/// Which side of a pickup/dropoff pair a node plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PairRole {
    /// The node where cargo is collected.
    Pickup,
    /// The node where cargo is delivered.
    Dropoff,
}

/// A structural constraint owned by the routing model.
///
/// Constraints are stored as tagged variants in a single model-owned list
/// and validated against the dimensions' node domains before search begins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Constraint {
    /// Two nodes that must be served by the same vehicle, pickup strictly
    /// before dropoff.
    PickupDelivery {
        /// The pickup node.
        pickup: usize,
        /// The dropoff node.
        dropoff: usize,
    },
    /// A set of nodes of which at most one may be visited; when none is,
    /// `penalty` is added to the objective.
    Disjunction {
        /// Member nodes.
        nodes: Vec<usize>,
        /// Cost of leaving every member unvisited.
        penalty: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_variants() {
        let pair = Constraint::PickupDelivery {
            pickup: 0,
            dropoff: 2,
        };
        let disjunction = Constraint::Disjunction {
            nodes: vec![0],
            penalty: 1000,
        };
        assert_ne!(pair, disjunction);
    }
}
