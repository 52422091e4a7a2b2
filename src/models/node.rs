//! Dense node index space.

use serde::{Deserialize, Serialize};

/// What a node index stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopKind {
    /// Pickup node of the given order.
    Pickup(usize),
    /// Dropoff node of the given order.
    Dropoff(usize),
    /// The k-th depot node.
    Depot(usize),
}

/// Maps orders and depots to dense node indices.
///
/// For `n` orders, pickups occupy `[0, n)`, dropoffs `[n, 2n)`, and depot
/// nodes follow from `2n`. Lookups with out-of-range arguments return
/// `None`; this boundary is where bad indices are rejected, so everything
/// downstream (cost callbacks included) can be total over valid nodes.
///
/// # Examples
///
/// ```
/// use pd_routing::models::{NodeIndexer, StopKind};
///
/// let mut indexer = NodeIndexer::new(2);
/// let depot = indexer.add_depot();
/// assert_eq!(indexer.pickup(1), Some(1));
/// assert_eq!(indexer.dropoff(1), Some(3));
/// assert_eq!(depot, 4);
/// assert_eq!(indexer.kind(3), Some(StopKind::Dropoff(1)));
/// assert_eq!(indexer.pickup(2), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeIndexer {
    num_orders: usize,
    num_depots: usize,
}

impl NodeIndexer {
    /// Creates an index space for `num_orders` orders and no depots yet.
    pub fn new(num_orders: usize) -> Self {
        Self {
            num_orders,
            num_depots: 0,
        }
    }

    /// Appends a depot node and returns its index.
    pub fn add_depot(&mut self) -> usize {
        self.num_depots += 1;
        2 * self.num_orders + self.num_depots - 1
    }

    /// Number of orders covered.
    pub fn num_orders(&self) -> usize {
        self.num_orders
    }

    /// Number of depot nodes registered.
    pub fn num_depots(&self) -> usize {
        self.num_depots
    }

    /// Total number of nodes (order nodes plus depots).
    pub fn num_nodes(&self) -> usize {
        2 * self.num_orders + self.num_depots
    }

    /// Pickup node of `order`, or `None` if the order is out of range.
    pub fn pickup(&self, order: usize) -> Option<usize> {
        (order < self.num_orders).then_some(order)
    }

    /// Dropoff node of `order`, or `None` if the order is out of range.
    pub fn dropoff(&self, order: usize) -> Option<usize> {
        (order < self.num_orders).then_some(self.num_orders + order)
    }

    /// Classifies a node index, or `None` if it is out of range.
    pub fn kind(&self, node: usize) -> Option<StopKind> {
        if node < self.num_orders {
            Some(StopKind::Pickup(node))
        } else if node < 2 * self.num_orders {
            Some(StopKind::Dropoff(node - self.num_orders))
        } else if node < self.num_nodes() {
            Some(StopKind::Depot(node - 2 * self.num_orders))
        } else {
            None
        }
    }

    /// The order a node belongs to, or `None` for depots and bad indices.
    pub fn order_of(&self, node: usize) -> Option<usize> {
        match self.kind(node)? {
            StopKind::Pickup(order) | StopKind::Dropoff(order) => Some(order),
            StopKind::Depot(_) => None,
        }
    }

    /// Returns `true` if `node` is a depot.
    pub fn is_depot(&self, node: usize) -> bool {
        matches!(self.kind(node), Some(StopKind::Depot(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let mut indexer = NodeIndexer::new(3);
        assert_eq!(indexer.add_depot(), 6);
        assert_eq!(indexer.add_depot(), 7);
        assert_eq!(indexer.num_nodes(), 8);
        assert_eq!(indexer.pickup(0), Some(0));
        assert_eq!(indexer.dropoff(0), Some(3));
        assert_eq!(indexer.pickup(2), Some(2));
        assert_eq!(indexer.dropoff(2), Some(5));
    }

    #[test]
    fn test_out_of_range_rejected() {
        let indexer = NodeIndexer::new(2);
        assert_eq!(indexer.pickup(2), None);
        assert_eq!(indexer.dropoff(5), None);
        assert_eq!(indexer.kind(4), None);
        assert_eq!(indexer.order_of(4), None);
    }

    #[test]
    fn test_kind() {
        let mut indexer = NodeIndexer::new(2);
        indexer.add_depot();
        assert_eq!(indexer.kind(0), Some(StopKind::Pickup(0)));
        assert_eq!(indexer.kind(1), Some(StopKind::Pickup(1)));
        assert_eq!(indexer.kind(2), Some(StopKind::Dropoff(0)));
        assert_eq!(indexer.kind(4), Some(StopKind::Depot(0)));
        assert!(indexer.is_depot(4));
        assert!(!indexer.is_depot(0));
    }

    #[test]
    fn test_order_of() {
        let indexer = NodeIndexer::new(2);
        assert_eq!(indexer.order_of(1), Some(1));
        assert_eq!(indexer.order_of(3), Some(1));
    }

    #[test]
    fn test_no_orders() {
        let mut indexer = NodeIndexer::new(0);
        assert_eq!(indexer.add_depot(), 0);
        assert_eq!(indexer.kind(0), Some(StopKind::Depot(0)));
        assert_eq!(indexer.pickup(0), None);
    }
}
