//! Cumulative dimensions and their per-node ranges.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ConfigurationError;

/// Sentinel upper bound for dimensions without a meaningful cap.
///
/// Cumulative values are capped by their dimension's capacity rather than
/// true infinity, which keeps range propagation far from `i64` overflow.
pub const UNBOUNDED: i64 = 100_000;

/// Arc transition callback: amount added to a dimension when traversing
/// `(from, to)`.
///
/// Callbacks must be total over `[0, num_nodes)²`; the model never calls them
/// with other indices. Amounts may be negative (a dropoff unloading cargo),
/// but accumulated values are always kept non-negative.
pub type TransitFn = Box<dyn Fn(usize, usize) -> i64 + Send + Sync>;

/// Arc cost callback used for a vehicle's objective contribution.
pub type ArcCostFn = Box<dyn Fn(usize, usize) -> i64 + Send + Sync>;

/// A closed integer range `[min, max]` for a cumulative value at one node.
///
/// # Examples
///
/// ```
/// use pd_routing::routing::CumulRange;
///
/// let r = CumulRange::new(5, 10);
/// assert!(r.contains(7));
/// assert!(!r.is_empty());
/// assert_eq!(r.width(), 5);
/// assert!(CumulRange::new(3, 1).is_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CumulRange {
    /// Lower bound (inclusive).
    pub min: i64,
    /// Upper bound (inclusive).
    pub max: i64,
}

impl CumulRange {
    /// Creates a range. An inverted pair yields an empty range.
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// Returns `true` if no value satisfies this range.
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Returns `true` if `value` lies within the range.
    pub fn contains(&self, value: i64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Width of the range (`max - min`), the remaining slack at this node.
    pub fn width(&self) -> i64 {
        self.max - self.min
    }

    /// Intersection with another range.
    pub fn intersect(&self, other: CumulRange) -> CumulRange {
        CumulRange::new(self.min.max(other.min), self.max.min(other.max))
    }
}

/// A named cumulative resource tracked along every route.
///
/// A dimension accumulates a quantity (elapsed time, carried load) node by
/// node: traversing an arc adds the transit callback's amount, and up to
/// `slack_max` of extra waiting may be inserted between stops. Every node's
/// accumulated value must stay within that node's range, itself capped by
/// the dimension's global capacity.
///
/// When `fix_start_to_zero` is set the accumulated value is pinned to zero
/// at each vehicle's start (carried load). When it is not, the vehicle may
/// delay its departure arbitrarily, so waiting before the first stop is not
/// charged against `slack_max` (staggered start times).
pub struct Dimension {
    name: String,
    transit: TransitFn,
    slack_max: i64,
    capacity_max: i64,
    fix_start_to_zero: bool,
    ranges: Vec<CumulRange>,
}

impl Dimension {
    pub(crate) fn new(
        name: String,
        transit: TransitFn,
        slack_max: i64,
        capacity_max: i64,
        fix_start_to_zero: bool,
        num_nodes: usize,
    ) -> Self {
        Self {
            name,
            transit,
            slack_max,
            capacity_max,
            fix_start_to_zero,
            ranges: vec![CumulRange::new(0, capacity_max); num_nodes],
        }
    }

    /// Dimension name (`"time"`, `"capacity"`, ...).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Transit amount for the arc `(from, to)`.
    ///
    /// # Panics
    ///
    /// May panic if either index is out of node range, depending on the
    /// registered callback.
    pub fn transit(&self, from: usize, to: usize) -> i64 {
        (self.transit)(from, to)
    }

    /// Maximum waiting allowed between consecutive stops.
    pub fn slack_max(&self) -> i64 {
        self.slack_max
    }

    /// Global upper bound on the accumulated value.
    pub fn capacity_max(&self) -> i64 {
        self.capacity_max
    }

    /// Whether the accumulated value is pinned to zero at route starts.
    pub fn fix_start_to_zero(&self) -> bool {
        self.fix_start_to_zero
    }

    /// The configured range at `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is out of range.
    pub fn range(&self, node: usize) -> CumulRange {
        self.ranges[node]
    }

    /// The range at `node` clamped to `[0, capacity_max]`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is out of range.
    pub fn effective(&self, node: usize) -> CumulRange {
        self.ranges[node].intersect(CumulRange::new(0, self.capacity_max))
    }

    pub(crate) fn narrow(&mut self, node: usize, min: i64, max: i64) {
        self.ranges[node] = self.ranges[node].intersect(CumulRange::new(min, max));
    }
}

impl fmt::Debug for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dimension")
            .field("name", &self.name)
            .field("slack_max", &self.slack_max)
            .field("capacity_max", &self.capacity_max)
            .field("fix_start_to_zero", &self.fix_start_to_zero)
            .finish_non_exhaustive()
    }
}

/// Mutable handle to one `(node, dimension)` cumulative variable.
///
/// Obtained from [`RoutingModel::cumul_var`](super::RoutingModel::cumul_var);
/// both setters *narrow* the current domain, so repeated calls intersect.
/// Narrowing to an empty range is not an error — it simply makes the node
/// unroutable, which drops it (if droppable) or makes the solve infeasible.
#[derive(Debug)]
pub struct CumulVar<'a> {
    pub(crate) dim: &'a mut Dimension,
    pub(crate) node: usize,
}

impl CumulVar<'_> {
    /// Narrows the feasible domain to its intersection with `[min, max]`.
    ///
    /// Fails with [`ConfigurationError::InvalidRange`] if `min > max`.
    /// Negative lower bounds are clamped to zero.
    pub fn set_range(&mut self, min: i64, max: i64) -> Result<(), ConfigurationError> {
        if min > max {
            return Err(ConfigurationError::InvalidRange { min, max });
        }
        self.dim.narrow(self.node, min.max(0), max);
        Ok(())
    }

    /// Narrows the upper bound to at most `max`.
    ///
    /// Fails with [`ConfigurationError::InvalidRange`] if `max` is negative.
    pub fn set_max(&mut self, max: i64) -> Result<(), ConfigurationError> {
        if max < 0 {
            return Err(ConfigurationError::InvalidRange { min: 0, max });
        }
        self.dim.narrow(self.node, 0, max);
        Ok(())
    }

    /// The current range of this cumulative variable.
    pub fn range(&self) -> CumulRange {
        self.dim.range(self.node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time_dimension(num_nodes: usize) -> Dimension {
        Dimension::new(
            "time".to_string(),
            Box::new(|from, to| (from as i64 - to as i64).abs()),
            UNBOUNDED,
            UNBOUNDED,
            false,
            num_nodes,
        )
    }

    #[test]
    fn test_range_empty_and_width() {
        assert!(CumulRange::new(5, 3).is_empty());
        assert!(!CumulRange::new(3, 3).is_empty());
        assert_eq!(CumulRange::new(2, 9).width(), 7);
    }

    #[test]
    fn test_range_intersect() {
        let a = CumulRange::new(0, 10);
        let b = CumulRange::new(5, 20);
        assert_eq!(a.intersect(b), CumulRange::new(5, 10));
        assert!(a.intersect(CumulRange::new(11, 20)).is_empty());
    }

    #[test]
    fn test_dimension_defaults() {
        let dim = time_dimension(4);
        assert_eq!(dim.name(), "time");
        assert_eq!(dim.range(2), CumulRange::new(0, UNBOUNDED));
        assert_eq!(dim.transit(1, 3), 2);
        assert!(!dim.fix_start_to_zero());
    }

    #[test]
    fn test_cumul_var_narrows() {
        let mut dim = time_dimension(4);
        let mut var = CumulVar { dim: &mut dim, node: 1 };
        var.set_range(5, 10).expect("valid");
        assert_eq!(var.range(), CumulRange::new(5, 10));
        var.set_max(8).expect("valid");
        assert_eq!(var.range(), CumulRange::new(5, 8));
        // Intersection, not replacement
        var.set_range(0, 20).expect("valid");
        assert_eq!(var.range(), CumulRange::new(5, 8));
    }

    #[test]
    fn test_cumul_var_inverted_range() {
        let mut dim = time_dimension(4);
        let mut var = CumulVar { dim: &mut dim, node: 0 };
        assert_eq!(
            var.set_range(10, 5),
            Err(ConfigurationError::InvalidRange { min: 10, max: 5 })
        );
        assert_eq!(
            var.set_max(-1),
            Err(ConfigurationError::InvalidRange { min: 0, max: -1 })
        );
    }

    #[test]
    fn test_effective_clamps_to_capacity() {
        let mut dim = Dimension::new(
            "capacity".to_string(),
            Box::new(|_, _| 1),
            0,
            30,
            true,
            3,
        );
        dim.narrow(1, 0, 50);
        assert_eq!(dim.range(1), CumulRange::new(0, 30));
        dim.ranges[1] = CumulRange::new(-5, 50);
        assert_eq!(dim.effective(1), CumulRange::new(0, 30));
    }
}
