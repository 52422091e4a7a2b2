//! Dense integer cost matrix.

use serde::{Deserialize, Serialize};

/// A dense n×n arc-cost matrix stored in row-major order.
///
/// Costs are non-negative integers. The matrix is a total function over
/// `[0, size)²`: every lookup with valid indices succeeds, and out-of-range
/// indices are a programmer error, not a recoverable condition.
///
/// # Examples
///
/// ```
/// use pd_routing::cost::CostMatrix;
///
/// let m = CostMatrix::manhattan(&[(0, 0), (0, 2), (2, 2)]);
/// assert_eq!(m.get(0, 1), 2);
/// assert_eq!(m.get(0, 2), 4);
/// assert_eq!(m.size(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostMatrix {
    data: Vec<i64>,
    size: usize,
}

impl CostMatrix {
    /// Creates a cost matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0; size * size],
            size,
        }
    }

    /// Computes a Manhattan-distance matrix from grid coordinates.
    pub fn manhattan(points: &[(i64, i64)]) -> Self {
        let n = points.len();
        let mut matrix = Self::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let (xi, yi) = points[i];
                let (xj, yj) = points[j];
                let d = (xi - xj).abs() + (yi - yj).abs();
                matrix.set(i, j, d);
                matrix.set(j, i, d);
            }
        }
        matrix
    }

    /// Creates a cost matrix from an explicit n×n grid.
    ///
    /// Returns `None` if the data length doesn't match `size * size`.
    pub fn from_data(size: usize, data: Vec<i64>) -> Option<Self> {
        if data.len() != size * size {
            return None;
        }
        Some(Self { data, size })
    }

    /// Returns the cost from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> i64 {
        self.data[from * self.size + to]
    }

    /// Sets the cost from location `from` to location `to`.
    pub fn set(&mut self, from: usize, to: usize, cost: i64) {
        self.data[from * self.size + to] = cost;
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if the matrix is symmetric.
    pub fn is_symmetric(&self) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if self.get(i, j) != self.get(j, i) {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_points() -> Vec<(i64, i64)> {
        vec![(0, 0), (0, 2), (2, 2), (1, 1)]
    }

    #[test]
    fn test_manhattan() {
        let m = CostMatrix::manhattan(&sample_points());
        assert_eq!(m.size(), 4);
        assert_eq!(m.get(0, 1), 2);
        assert_eq!(m.get(0, 2), 4);
        assert_eq!(m.get(0, 3), 2);
        assert_eq!(m.get(1, 2), 2);
        assert_eq!(m.get(0, 0), 0);
    }

    #[test]
    fn test_manhattan_symmetric() {
        let m = CostMatrix::manhattan(&sample_points());
        assert!(m.is_symmetric());
    }

    #[test]
    fn test_from_data() {
        let m = CostMatrix::from_data(2, vec![0, 5, 5, 0]).expect("valid");
        assert_eq!(m.get(0, 1), 5);
        assert_eq!(m.get(1, 0), 5);
    }

    #[test]
    fn test_from_data_invalid_size() {
        assert!(CostMatrix::from_data(2, vec![0, 1, 2]).is_none());
    }

    #[test]
    fn test_set_get() {
        let mut m = CostMatrix::new(3);
        m.set(0, 1, 42);
        assert_eq!(m.get(0, 1), 42);
        assert_eq!(m.get(1, 0), 0);
    }

    #[test]
    fn test_asymmetric_matrix() {
        let mut m = CostMatrix::new(2);
        m.set(0, 1, 10);
        m.set(1, 0, 15);
        assert!(!m.is_symmetric());
    }
}
