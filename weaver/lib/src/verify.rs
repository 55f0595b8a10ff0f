//! Certification and diagnostics for node sequences.

use std::fmt::{Display, Formatter};

use bit_vec::BitVec;
use discocube::{Graph, NodeIdx};

/// The verdict on a node sequence, as decided by [`certify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Certificate {
    /// A Hamiltonian cycle: covers every node, every step an edge, closed.
    Loop,
    /// A Hamiltonian path whose ends are not adjacent.
    Snake,
    /// The sequence does not have one entry per node.
    WrongLength { len: usize, expected: usize },
    /// A node appears more than once.
    Repeat { node: NodeIdx },
    /// Two consecutive entries are not adjacent in the graph.
    BrokenEdge {
        from: NodeIdx,
        to: NodeIdx,
        position: usize,
    },
}

impl Certificate {
    pub fn is_loop(self) -> bool {
        self == Certificate::Loop
    }
}

impl Display for Certificate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Certificate::Loop => write!(f, "loop"),
            Certificate::Snake => write!(f, "snake"),
            Certificate::WrongLength { len, expected } => {
                write!(f, "broken ({} nodes, expected {})", len, expected)
            }
            Certificate::Repeat { node } => write!(f, "broken (node {} repeats)", node.index()),
            Certificate::BrokenEdge { from, to, position } => write!(
                f,
                "broken ({} -> {} at position {} is not an edge)",
                from.index(),
                to.index(),
                position
            ),
        }
    }
}

/// Certifies a node sequence against a graph: is it a Hamiltonian cycle, an open
/// Hamiltonian path, or broken?
pub fn certify(seq: &[NodeIdx], graph: &Graph) -> Certificate {
    let expected = graph.order().as_usize();
    if seq.len() != expected {
        return Certificate::WrongLength {
            len: seq.len(),
            expected,
        };
    }
    let mut seen = BitVec::from_elem(expected, false);
    for &n in seq {
        if seen[n.index()] {
            return Certificate::Repeat { node: n };
        }
        seen.set(n.index(), true);
    }
    for (position, pair) in seq.windows(2).enumerate() {
        if !graph.are_adjacent(pair[0], pair[1]) {
            return Certificate::BrokenEdge {
                from: pair[0],
                to: pair[1],
                position,
            };
        }
    }
    let (first, last) = (seq[0], seq[seq.len() - 1]);
    if graph.are_adjacent(last, first) {
        Certificate::Loop
    } else {
        Certificate::Snake
    }
}

/// Counts the cycle's edges along each axis and returns `(x, y, z)` totals.
/// A well-woven cycle uses all three axes heavily; the breakdown is logged by the
/// CLI as a sanity diagnostic.
pub fn axis_counts(seq: &[NodeIdx], graph: &Graph) -> (usize, usize, usize) {
    let len = seq.len();
    let mut counts = (0, 0, 0);
    for (i, &n) in seq.iter().enumerate() {
        let prev = graph.vert(seq[(i + len - 1) % len]);
        let here = graph.vert(n);
        if prev.x != here.x {
            counts.0 += 1;
        } else if prev.y != here.y {
            counts.1 += 1;
        } else {
            counts.2 += 1;
        }
    }
    counts
}

/// Counts the non-turns: consecutive edge pairs that continue in the same
/// direction instead of turning.
pub fn nonturn_count(seq: &[NodeIdx], graph: &Graph) -> usize {
    let len = seq.len();
    let mut count = 0;
    for (i, &here) in seq.iter().enumerate() {
        let m = graph.vert(seq[(i + len - 1) % len]);
        let n = graph.vert(here);
        let o = graph.vert(seq[(i + 1) % len]);
        let dot = (n.x - m.x) * (o.x - n.x) + (n.y - m.y) * (o.y - n.y) + (n.z - m.z) * (o.z - n.z);
        if dot > 0 {
            count += 1;
        }
    }
    count
}
