//! Route evaluator: cumulative propagation and arc costs.

use itertools::Itertools;

use crate::routing::{CumulRange, Dimension, RoutingModel};

/// Evaluates candidate stop sequences for one vehicle.
///
/// A stop sequence holds only the visited order nodes; the vehicle's start
/// and end depots are implied. Feasibility means every registered dimension
/// can be propagated from depot to depot without leaving any node's range:
/// traversing an arc adds the dimension's transit amount, waiting between
/// stops is bounded by the dimension's slack, and accumulated values stay
/// within `[0, capacity_max]` intersected with each node's imposed range.
///
/// # Examples
///
/// ```
/// use pd_routing::cost::CostMatrix;
/// use pd_routing::evaluation::RouteEvaluator;
/// use pd_routing::routing::{RoutingModel, UNBOUNDED};
///
/// let costs = CostMatrix::manhattan(&[(0, 0), (0, 2), (1, 1)]);
/// let mut model = RoutingModel::new(3, 1, vec![2], vec![2]).unwrap();
/// let transit = costs.clone();
/// model
///     .add_dimension(
///         Box::new(move |from, to| transit.get(from, to)),
///         UNBOUNDED,
///         UNBOUNDED,
///         false,
///         "time",
///     )
///     .unwrap();
/// let arc = costs.clone();
/// model.set_arc_cost(Box::new(move |from, to| arc.get(from, to)));
///
/// let evaluator = RouteEvaluator::new(&model, 0);
/// assert_eq!(evaluator.evaluate(&[0, 1]), Some(2 + 2 + 2));
/// assert_eq!(evaluator.arc_cost(&[]), 0);
/// ```
pub struct RouteEvaluator<'a> {
    model: &'a RoutingModel,
    vehicle: usize,
}

impl<'a> RouteEvaluator<'a> {
    /// Creates an evaluator for the given vehicle.
    ///
    /// # Panics
    ///
    /// Panics if `vehicle` is out of range.
    pub fn new(model: &'a RoutingModel, vehicle: usize) -> Self {
        assert!(vehicle < model.num_vehicles());
        Self { model, vehicle }
    }

    /// Returns `true` if the sequence satisfies every dimension.
    pub fn is_feasible(&self, stops: &[usize]) -> bool {
        let sequence = self.sequence(stops);
        self.model
            .dimensions()
            .iter()
            .all(|dim| self.earliest(dim, &sequence).is_some())
    }

    /// Arc cost of the sequence as charged to this vehicle.
    ///
    /// A vehicle with no stops is not dispatched and contributes zero.
    pub fn arc_cost(&self, stops: &[usize]) -> i64 {
        if stops.is_empty() {
            return 0;
        }
        self.sequence(stops)
            .iter()
            .tuple_windows()
            .map(|(&from, &to)| self.model.arc_cost_for(self.vehicle, from, to))
            .sum()
    }

    /// Feasibility and cost in one call: `Some(arc_cost)` when the sequence
    /// satisfies every dimension, `None` otherwise.
    pub fn evaluate(&self, stops: &[usize]) -> Option<i64> {
        if self.is_feasible(stops) {
            Some(self.arc_cost(stops))
        } else {
            None
        }
    }

    /// Resolved `[earliest, latest]` cumulative bounds at every node of the
    /// sequence, depots included (index 0 is the start depot).
    ///
    /// Returns `None` if the sequence is infeasible for this dimension.
    pub fn cumul_bounds(&self, stops: &[usize], dimension: &Dimension) -> Option<Vec<CumulRange>> {
        let sequence = self.sequence(stops);
        let earliest = self.earliest(dimension, &sequence)?;
        let latest = self.latest(dimension, &sequence)?;
        Some(
            earliest
                .into_iter()
                .zip(latest)
                .map(|(lo, hi)| CumulRange::new(lo, hi.max(lo)))
                .collect(),
        )
    }

    fn sequence(&self, stops: &[usize]) -> Vec<usize> {
        let mut sequence = Vec::with_capacity(stops.len() + 2);
        sequence.push(self.model.start(self.vehicle));
        sequence.extend_from_slice(stops);
        sequence.push(self.model.end(self.vehicle));
        sequence
    }

    /// Forward pass: smallest feasible cumulative value at each node, or
    /// `None` when some transition cannot be made without leaving a range
    /// or exceeding the waiting slack.
    fn earliest(&self, dimension: &Dimension, sequence: &[usize]) -> Option<Vec<i64>> {
        let start_range = dimension.effective(sequence[0]);
        if start_range.is_empty() {
            return None;
        }
        let mut cumul = if dimension.fix_start_to_zero() {
            if !start_range.contains(0) {
                return None;
            }
            0
        } else {
            start_range.min
        };
        let mut values = Vec::with_capacity(sequence.len());
        values.push(cumul);
        for (leg, (&prev, &node)) in sequence.iter().tuple_windows().enumerate() {
            let arrived = cumul + dimension.transit(prev, node);
            let range = dimension.effective(node);
            if range.is_empty() {
                return None;
            }
            let target = arrived.max(range.min);
            // A free-start dimension may delay departure arbitrarily, so
            // waiting on the first leg is not charged against the slack.
            let unlimited_wait = leg == 0 && !dimension.fix_start_to_zero();
            if !unlimited_wait && target - arrived > dimension.slack_max() {
                return None;
            }
            if target > range.max {
                return None;
            }
            cumul = target;
            values.push(cumul);
        }
        Some(values)
    }

    /// Backward pass: largest cumulative value at each node that still
    /// reaches the end within every downstream range.
    fn latest(&self, dimension: &Dimension, sequence: &[usize]) -> Option<Vec<i64>> {
        let n = sequence.len();
        let mut values = vec![0; n];
        let end_range = dimension.effective(sequence[n - 1]);
        if end_range.is_empty() {
            return None;
        }
        values[n - 1] = end_range.max;
        for k in (0..n - 1).rev() {
            let range = dimension.effective(sequence[k]);
            if range.is_empty() {
                return None;
            }
            values[k] = range
                .max
                .min(values[k + 1] - dimension.transit(sequence[k], sequence[k + 1]));
        }
        Some(values)
    }
}
