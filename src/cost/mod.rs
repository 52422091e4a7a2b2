//! Arc-cost oracle.
//!
//! Provides [`CostMatrix`], a dense integer cost table usable both as the
//! travel-time transit of the `"time"` dimension and, scaled per vehicle, as
//! the objective's arc cost.

mod matrix;

pub use matrix::CostMatrix;
