use std::fmt::{Debug, Display, Formatter};

use crate::graph::GraphError;

/// The order of a discocube graph: one of the *uncentered octahedral numbers*
/// `N(m) = 4·m·(m+1)·(m+2)/3` (32, 80, 160, 280, 448, 672, ...), where `m` is the
/// number of accretion shells.  The smallest order handled by the solver is
/// [`Order::MIN`]; the single-cube graph of order 8 has no z = -3 stratum and is
/// excluded.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Order(u32);

impl Order {
    /// The smallest admissible order (m = 2).
    pub const MIN: Order = Order(32);

    /// Checks that `order` is an uncentered octahedral number, and wraps it.
    pub fn new(order: u32) -> Result<Self, GraphError> {
        // Walk the series in 64 bits so that junk near `u32::MAX` is rejected
        // rather than overflowing.
        let mut m = 2u64;
        loop {
            let n = 4 * m * (m + 1) * (m + 2) / 3;
            if n == order as u64 {
                return Ok(Order(order));
            }
            if n > order as u64 {
                return Err(GraphError::InvalidOrder(order));
            }
            m += 1;
        }
    }

    /// The order of the discocube built from `m >= 2` accretion shells.
    pub fn from_shells(m: u32) -> Self {
        let m = m as u64;
        let n = 4 * m * (m + 1) * (m + 2) / 3;
        Order(u32::try_from(n).expect("order should fit in 32 bits"))
    }

    /// Recovers the number of accretion shells which produce this order.
    pub fn shells(self) -> u32 {
        let mut m = 2;
        while Self::from_shells(m) < self {
            m += 1;
        }
        m
    }

    /// The largest L¹ distance from the origin of any vertex: `2m + 1`.
    pub fn radius(self) -> i32 {
        2 * self.shells() as i32 + 1
    }

    /// All admissible orders in `start..=end`, in increasing order.
    pub fn admissible(start: u32, end: u32) -> impl Iterator<Item = Order> {
        (2u64..)
            .map(|m| 4 * m * (m + 1) * (m + 2) / 3)
            .take_while(move |&n| n <= end as u64)
            .filter(move |&n| n >= start as u64)
            .map(|n| Order(n as u32))
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }

    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl Debug for Order {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Order({})", self.0)
    }
}

impl Display for Order {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // Delegate so that width/alignment flags keep working
        Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use quickcheck_macros::quickcheck;

    use super::Order;

    #[test]
    fn series() {
        let first = Order::admissible(0, 700).map(Order::as_u32).collect_vec();
        assert_eq!(first, [32, 80, 160, 280, 448, 672]);
    }

    #[test]
    fn new_accepts_the_series_only() {
        assert!(Order::new(32).is_ok());
        assert!(Order::new(79_040).is_ok());
        assert!(Order::new(8).is_err());
        assert!(Order::new(33).is_err());
        assert!(Order::new(0).is_err());
        assert!(Order::new(u32::MAX).is_err());
    }

    #[test]
    fn radius() {
        assert_eq!(Order::new(32).unwrap().radius(), 5);
        assert_eq!(Order::new(672).unwrap().radius(), 15);
    }

    #[quickcheck]
    fn shells_round_trip(m: u32) -> bool {
        let m = m % 200 + 2;
        Order::from_shells(m).shells() == m
    }
}
