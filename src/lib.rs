//! # pd-routing
//!
//! Pickup-and-delivery vehicle routing: a routing model with cumulative
//! dimensions (time, load), pickup-before-dropoff pairing, soft-droppable
//! orders, and a two-phase search engine (construction heuristic plus
//! local-search improvement).
//!
//! ## Modules
//!
//! - [`models`] — Input framing types (Location, Order, Vehicle, NodeIndexer,
//!   RoutingProblem)
//! - [`cost`] — Dense integer arc-cost oracle
//! - [`routing`] — The routing model: dimensions, pairing, disjunctions,
//!   configuration errors
//! - [`evaluation`] — Cumulative propagation and route cost evaluation
//! - [`construction`] — First-solution strategies
//! - [`local_search`] — Improvement operators (insertion, drop, relocation,
//!   swap, 2-opt)
//! - [`search`] — Search parameters and the solve driver
//! - [`solution`] — Assignments: routes, cumulative bounds, dropped orders
//!
//! ## Example
//!
//! ```
//! use pd_routing::cost::CostMatrix;
//! use pd_routing::models::{Location, Order, RoutingProblem, Vehicle};
//! use pd_routing::search::SearchParameters;
//!
//! // One order from (1, 0) to (2, 0), one vehicle based at the origin.
//! let orders = vec![Order::new(
//!     Location::new("2416 W 3rd Ave, Vancouver, BC", 0),
//!     Location::new("1188 Richards St, Vancouver, BC", 3_600),
//! )];
//! let costs = CostMatrix::manhattan(&[(1, 0), (2, 0), (0, 0)]);
//! let vehicles = vec![Vehicle::new(0, 2, 2)];
//!
//! let problem = RoutingProblem::new(orders, vehicles, costs, 10).unwrap();
//! let assignment = problem
//!     .solve(&SearchParameters::default())
//!     .unwrap()
//!     .expect("dropping everything is always feasible here");
//!
//! assert!(assignment.dropped_nodes().is_empty());
//! assert_eq!(assignment.objective(), 4);
//! println!("{assignment}");
//! ```

pub mod construction;
pub mod cost;
pub mod evaluation;
pub mod local_search;
pub mod models;
pub mod routing;
pub mod search;
pub mod solution;
