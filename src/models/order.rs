//! Delivery order type.

use serde::{Deserialize, Serialize};

use super::Location;

/// A delivery order: one pickup location, one dropoff location.
///
/// Every order becomes exactly two routing nodes, which must be served by
/// the same vehicle with the pickup strictly before the dropoff, or be
/// dropped together at the order's penalty.
///
/// # Examples
///
/// ```
/// use pd_routing::models::{Location, Order};
///
/// let order = Order::new(
///     Location::new("2416 W 3rd Ave", 0),
///     Location::new("1188 Richards St", 3_600),
/// )
/// .with_demand(3);
/// assert_eq!(order.demand(), 3);
/// assert_eq!(order.dropoff().timestamp(), 3_600);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pickup: Location,
    dropoff: Location,
    demand: i64,
}

impl Order {
    /// Creates an order with demand 1.
    pub fn new(pickup: Location, dropoff: Location) -> Self {
        Self {
            pickup,
            dropoff,
            demand: 1,
        }
    }

    /// Sets the cargo quantity picked up and later dropped off.
    pub fn with_demand(mut self, demand: i64) -> Self {
        self.demand = demand;
        self
    }

    /// Pickup location.
    pub fn pickup(&self) -> &Location {
        &self.pickup
    }

    /// Dropoff location.
    pub fn dropoff(&self) -> &Location {
        &self.dropoff
    }

    /// Cargo quantity carried between pickup and dropoff.
    pub fn demand(&self) -> i64 {
        self.demand
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_default_demand() {
        let order = Order::new(Location::new("a", 0), Location::new("b", 10));
        assert_eq!(order.demand(), 1);
        assert_eq!(order.pickup().address(), "a");
        assert_eq!(order.dropoff().address(), "b");
    }

    #[test]
    fn test_order_with_demand() {
        let order = Order::new(Location::new("a", 0), Location::new("b", 0)).with_demand(7);
        assert_eq!(order.demand(), 7);
    }
}
