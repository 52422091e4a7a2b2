//! Location type used to frame orders.

use serde::{Deserialize, Serialize};

/// A geographic stop as supplied by the order source.
///
/// Carries the address string and a timestamp (seconds since the epoch) for
/// the caller's bookkeeping. The solver itself never reads either field; it
/// works on node indices and a cost oracle, and address resolution happens
/// upstream.
///
/// # Examples
///
/// ```
/// use pd_routing::models::Location;
///
/// let loc = Location::new("2416 W 3rd Ave, Vancouver, BC", 1_700_000_000);
/// assert_eq!(loc.address(), "2416 W 3rd Ave, Vancouver, BC");
/// assert_eq!(loc.timestamp(), 1_700_000_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    address: String,
    timestamp: i64,
}

impl Location {
    /// Creates a location from an address and a timestamp.
    pub fn new(address: impl Into<String>, timestamp: i64) -> Self {
        Self {
            address: address.into(),
            timestamp,
        }
    }

    /// Street address as supplied by the order source.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Requested service time, seconds since the epoch.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_new() {
        let loc = Location::new("1188 Richards St", 42);
        assert_eq!(loc.address(), "1188 Richards St");
        assert_eq!(loc.timestamp(), 42);
    }

    #[test]
    fn test_location_equality() {
        let a = Location::new("somewhere", 1);
        let b = a.clone();
        assert_eq!(a, b);
    }
}
