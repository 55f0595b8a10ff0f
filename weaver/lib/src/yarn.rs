//! Coloring of the spun yarn: the two 2D strands from which every stratum's path
//! is cut.

use discocube::{Graph, NodeIdx, Point2};

/// The two colored strands derived from one spin of yarn.  Strata alternate
/// between them by depth: z mod 4 == 3 takes the *natural* strand, z mod 4 == 1
/// the *blue* one.
pub(crate) struct Spool {
    natural: Vec<Point2>,
    blue: Vec<Point2>,
}

impl Spool {
    /// Projects the spin path onto the xy plane (natural), then rotates it 180°
    /// about the z-axis and displaces it one lattice unit in +y (blue).
    pub fn color(path: &[NodeIdx], graph: &Graph) -> Self {
        let natural: Vec<Point2> = path.iter().map(|&n| graph.vert(n).xy()).collect();
        let blue = natural.iter().map(|p| p.rotate180_shift()).collect();
        Self { natural, blue }
    }

    /// The strand used at depth `z`.  Every stratum takes a suffix of its strand,
    /// so callers slice off the last `count` points themselves.
    pub fn strand(&self, z: i32) -> &[Point2] {
        match z.rem_euclid(4) {
            3 => &self.natural,
            1 => &self.blue,
            _ => unreachable!("strata lie at odd z"),
        }
    }
}

#[cfg(test)]
mod tests {
    use discocube::{Graph, Order, Point2};

    use super::Spool;
    use crate::spin::spin;

    #[test]
    fn strands_of_32() {
        let graph = Graph::new(Order::new(32).unwrap());
        let path = spin(&graph).unwrap();
        let spool = Spool::color(&path, &graph);

        let natural: Vec<(i32, i32)> = spool.strand(-1).iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(
            natural,
            [
                (3, 1), (3, -1), (1, -1), (1, -3), (-1, -3), (-1, -1),
                (-3, -1), (-3, 1), (-1, 1), (-1, 3), (1, 3), (1, 1),
            ]
        );

        let blue: Vec<(i32, i32)> = spool.strand(-3).iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(
            blue,
            [
                (-3, 1), (-3, 3), (-1, 3), (-1, 5), (1, 5), (1, 3),
                (3, 3), (3, 1), (1, 1), (1, -1), (-1, -1), (-1, 1),
            ]
        );
    }

    #[test]
    fn depth_picks_the_strand_by_z_mod_4() {
        let graph = Graph::new(Order::new(80).unwrap());
        let path = spin(&graph).unwrap();
        let spool = Spool::color(&path, &graph);
        assert_eq!(spool.strand(-1)[0], spool.strand(-5)[0]);
        assert_eq!(spool.strand(-3)[0], spool.strand(-7)[0]);
        assert_eq!(spool.strand(-1)[0].rotate180_shift(), spool.strand(-3)[0]);
    }
}
