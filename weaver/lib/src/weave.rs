//! The final phase: stitching the mirrored loops into one Hamiltonian cycle.
//!
//! Two disjoint cycles can be merged whenever one has an edge parallel to (and at
//! lattice distance 2 from) an edge of the other: rewiring the two edges into the
//! two "rungs" between them splices the cycles into one.  The loom's loop cover
//! always admits such a bridge between the warp and some remaining weft, so
//! repeatedly bridging terminates with a single cycle.

use discocube::{Edge, Graph, NodeIdx};
use itertools::Itertools;

use crate::{Error, Result};

/// A closed loop held during weaving: a node sequence plus lazily-cached edge
/// data.  The caches are functions of the sequence and are dropped whenever it
/// mutates.
pub(crate) struct Loop {
    nodes: Vec<NodeIdx>,
    cache: Option<LoopCache>,
}

struct LoopCache {
    /// The loop's edges, wrap-around included, sorted.
    edges: Vec<Edge>,
    /// Union of [`Graph::parallels`] over `edges`: every edge which could bridge
    /// this loop to another.  Sorted and deduplicated.
    eadjs: Vec<Edge>,
}

impl Loop {
    fn new(nodes: Vec<NodeIdx>) -> Self {
        Self { nodes, cache: None }
    }

    fn cache(&mut self, graph: &Graph) -> &LoopCache {
        if self.cache.is_none() {
            let mut edges: Vec<Edge> = self
                .nodes
                .iter()
                .circular_tuple_windows()
                .map(|(&a, &b)| Edge::new(a, b))
                .collect();
            edges.sort_unstable();
            let mut eadjs: Vec<Edge> = edges
                .iter()
                .flat_map(|&e| graph.parallels(e).iter().copied())
                .collect();
            eadjs.sort_unstable();
            eadjs.dedup();
            self.cache = Some(LoopCache { edges, eadjs });
        }
        self.cache.as_ref().expect("cache was just filled")
    }

    fn invalidate(&mut self) {
        self.cache = None;
    }

    /// Rewrites the sequence in place so that it begins at `start` and ends at
    /// `end`, leaving the cyclic order unchanged up to rotation and reflection.
    /// `(start, end)` must be an edge of the loop.
    fn rotate_to_edge(&mut self, start: NodeIdx, end: NodeIdx) {
        let nodes = &mut self.nodes;
        let first = nodes[0];
        let last = *nodes.last().expect("loops are never empty");
        if start == first && end == last {
            return; // already in place
        }
        if start == last && end == first {
            nodes.reverse();
        } else {
            let ix_start = nodes
                .iter()
                .position(|&n| n == start)
                .expect("`start` lies on the loop");
            let ix_end = nodes
                .iter()
                .position(|&n| n == end)
                .expect("`end` lies on the loop");
            if ix_start > ix_end {
                nodes.rotate_left(ix_start);
            } else {
                nodes[..ix_end].reverse();
                nodes[ix_end..].reverse();
            }
        }
        self.invalidate();
    }
}

/// Merges the disjoint loop cover into a single cycle.  The first loop is the
/// permanent warp; the remaining loops are tried in order on every pass, so the
/// merge order (and hence the final sequence) is deterministic.
pub(crate) fn weave(graph: &Graph, loops: Vec<Vec<NodeIdx>>) -> Result<Vec<NodeIdx>> {
    let mut loops = loops.into_iter().map(Loop::new);
    let mut warp = loops.next().expect("the loom always yields at least one loop");
    let mut wefts: Vec<Option<Loop>> = loops.map(Some).collect();
    let mut remaining = wefts.len();

    while remaining > 0 {
        let mut joined = false;
        for slot in &mut wefts {
            let weft = match slot.as_mut() {
                Some(weft) => weft,
                None => continue,
            };
            if let Some((warp_edge, weft_edge)) = find_bridge(&mut warp, weft, graph) {
                let weft = slot.take().expect("the slot was just matched");
                join(&mut warp, weft, warp_edge, weft_edge, graph);
                remaining -= 1;
                joined = true;
                break;
            }
        }
        if !joined {
            return Err(Error::BridgeNotFound {
                loops_left: remaining + 1,
            });
        }
    }
    Ok(warp.nodes)
}

/// Finds the first (in edge order) bridge between the warp and this weft: a warp
/// edge parallel-adjacent to the weft, paired with the weft edge it bridges to.
fn find_bridge(warp: &mut Loop, weft: &mut Loop, graph: &Graph) -> Option<(Edge, Edge)> {
    let bridge: Vec<Edge> = {
        let warp_edges = &warp.cache(graph).edges;
        let weft_eadjs = &weft.cache(graph).eadjs;
        sorted_intersection(warp_edges, weft_eadjs)
    };
    for warp_edge in bridge {
        // By the symmetry of edge adjacency this is never empty, but a broken
        // adjacency table must surface as BridgeNotFound rather than a panic.
        let weft_edges = sorted_intersection(graph.parallels(warp_edge), &weft.cache(graph).edges);
        if let Some(&weft_edge) = weft_edges.first() {
            return Some((warp_edge, weft_edge));
        }
    }
    None
}

/// Rewires the bridge: the warp is rotated to end on `warp_edge`, the weft is
/// rotated to start on the endpoint of `weft_edge` adjacent to the warp's new
/// tail, and the two sequences are concatenated.
fn join(warp: &mut Loop, mut weft: Loop, warp_edge: Edge, weft_edge: Edge, graph: &Graph) {
    let (u, v) = warp_edge.ends();
    warp.rotate_to_edge(u, v);
    let (mut near, mut far) = weft_edge.ends();
    if !graph.are_adjacent(v, near) {
        std::mem::swap(&mut near, &mut far);
    }
    weft.rotate_to_edge(near, far);
    log::debug!(
        "bridged {:?} to {:?}, absorbing a loop of {} nodes",
        warp_edge,
        weft_edge,
        weft.nodes.len()
    );
    warp.nodes.extend(weft.nodes);
    warp.invalidate();
}

/// Intersection of two sorted edge slices, by merge walk.
fn sorted_intersection(lhs: &[Edge], rhs: &[Edge]) -> Vec<Edge> {
    let mut out = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < lhs.len() && j < rhs.len() {
        match lhs[i].cmp(&rhs[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(lhs[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use discocube::{Graph, NodeIdx, Order};

    use super::Loop;

    fn lp(ids: &[usize]) -> Loop {
        Loop::new(ids.iter().copied().map(NodeIdx::new).collect())
    }

    fn ids(lp: &Loop) -> Vec<usize> {
        lp.nodes.iter().map(|n| n.index()).collect()
    }

    #[test]
    fn rotate_to_edge_cases() {
        // start after end in the sequence: plain rotation
        let mut a = lp(&[0, 1, 2, 3, 4]);
        a.rotate_to_edge(NodeIdx::new(3), NodeIdx::new(2));
        assert_eq!(ids(&a), [3, 4, 0, 1, 2]);

        // start before end: rotation with a flip
        let mut b = lp(&[0, 1, 2, 3, 4]);
        b.rotate_to_edge(NodeIdx::new(2), NodeIdx::new(3));
        assert_eq!(ids(&b), [2, 1, 0, 4, 3]);

        // the wrap-around edge itself: full reversal
        let mut c = lp(&[0, 1, 2, 3, 4]);
        c.rotate_to_edge(NodeIdx::new(4), NodeIdx::new(0));
        assert_eq!(ids(&c), [4, 3, 2, 1, 0]);

        // already in place: nothing to do
        let mut d = lp(&[0, 1, 2, 3, 4]);
        d.rotate_to_edge(NodeIdx::new(0), NodeIdx::new(4));
        assert_eq!(ids(&d), [0, 1, 2, 3, 4]);
    }

    #[test]
    fn rotate_to_edge_round_trip_preserves_the_cycle() {
        fn cyclically_equal(a: &[usize], b: &[usize]) -> bool {
            a.len() == b.len() && [a, a].concat().windows(a.len()).any(|w| w == b)
        }

        let original = vec![0usize, 1, 2, 3, 4, 5];
        let mut a = lp(&original);
        a.rotate_to_edge(NodeIdx::new(2), NodeIdx::new(3));
        a.rotate_to_edge(NodeIdx::new(3), NodeIdx::new(2));
        let rebuilt = ids(&a);
        let reversed: Vec<usize> = original.iter().rev().copied().collect();
        assert!(
            cyclically_equal(&rebuilt, &original) || cyclically_equal(&rebuilt, &reversed),
            "{:?} is not a rotation of {:?} or its reverse",
            rebuilt,
            original
        );
    }

    #[test]
    fn rotation_does_not_change_the_edge_set() {
        let graph = Graph::new(Order::new(32).unwrap());
        let loops = crate::mirrored_loops(&graph).unwrap();
        let mut warp = Loop::new(loops[0].clone());
        let before = warp.cache(&graph).edges.clone();
        // Pick an edge away from the current ends so the rotation really moves
        let first = warp.nodes[0];
        let last = *warp.nodes.last().unwrap();
        let &edge = before
            .iter()
            .find(|e| !e.contains(first) && !e.contains(last))
            .unwrap();
        let (u, v) = edge.ends();
        warp.rotate_to_edge(u, v);
        assert!(warp.cache.is_none(), "rotation must drop the cache");
        assert_eq!(warp.cache(&graph).edges, before);
    }
}
