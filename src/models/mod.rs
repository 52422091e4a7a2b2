//! Input framing types for pickup-and-delivery problems.
//!
//! Provides the order-source surface: locations, orders, vehicles, the
//! dense node index space, and [`RoutingProblem`], which assembles them
//! into a configured [`RoutingModel`](crate::routing::RoutingModel).

mod location;
mod node;
mod order;
mod problem;
mod vehicle;

pub use location::Location;
pub use node::{NodeIndexer, StopKind};
pub use order::Order;
pub use problem::RoutingProblem;
pub use vehicle::Vehicle;
