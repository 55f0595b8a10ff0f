//! Construction and storage of discocube graphs.
//!
//! A [`Graph`] is fully determined by its [`Order`]: the vertex table, index map,
//! adjacency, edge adjacency, node weights and z-stratification are all pure
//! functions of it.  Everything in here is immutable once built; solvers only ever
//! hold shared references.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::{Debug, Display, Formatter};

use crate::{Order, Point3};

index_vec::define_index_type! {
    /// The index of a vertex within a [`Graph`]'s vertex table.  Node indices are
    /// the canonical node IDs used throughout the solver.
    pub struct NodeIdx = u32;
}

/// A [`Vec`] indexed by [`NodeIdx`]
pub type NodeVec<T> = index_vec::IndexVec<NodeIdx, T>;

/// An undirected edge of a [`Graph`], stored with its endpoints in increasing
/// index order so that every edge has exactly one representation.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge(NodeIdx, NodeIdx);

impl Edge {
    pub fn new(a: NodeIdx, b: NodeIdx) -> Self {
        if a <= b {
            Edge(a, b)
        } else {
            Edge(b, a)
        }
    }

    /// The endpoints of this edge, smaller index first.
    pub fn ends(self) -> (NodeIdx, NodeIdx) {
        (self.0, self.1)
    }

    pub fn contains(self, n: NodeIdx) -> bool {
        self.0 == n || self.1 == n
    }
}

impl Debug for Edge {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Edge({}-{})", self.0.index(), self.1.index())
    }
}

/// The z-stratification of a [`Graph`]'s negative half-space.  Only negative
/// strata are stored; the positive half is recovered by reflection through z = 0.
#[derive(Debug, Clone)]
pub struct Strata {
    /// Full sub-adjacency of the z = -1 slab, the widest stratum.  Neighbour
    /// lists are sorted.
    slab: HashMap<NodeIdx, Vec<NodeIdx>>,
    /// Node count of every negative stratum, keyed by z.  Iteration is ascending
    /// (deepest stratum first, z = -1 last).
    counts: BTreeMap<i32, usize>,
}

impl Strata {
    /// The sub-adjacency restricted to the z = -1 slab.
    pub fn slab(&self) -> &HashMap<NodeIdx, Vec<NodeIdx>> {
        &self.slab
    }

    /// `(z, node count)` for every negative stratum, deepest first.
    pub fn counts(&self) -> impl Iterator<Item = (i32, usize)> + '_ {
        self.counts.iter().map(|(&z, &count)| (z, count))
    }

    /// The number of negative strata (equal to the shell count of the order).
    pub fn depth(&self) -> usize {
        self.counts.len()
    }
}

/// A discocube graph, plus every derived table the solver needs.
#[derive(Debug, Clone)]
pub struct Graph {
    order: Order,
    /// Vertices sorted by (squared distance from origin, x, y, z); the position of
    /// a vertex in this table is its node ID.
    verts: NodeVec<Point3>,
    /// Maps each vertex back to its node ID; total on `verts`.
    index: HashMap<Point3, NodeIdx>,
    /// Sorted neighbour lists.  Interior nodes have six neighbours, outer-shell
    /// nodes three.
    adj: NodeVec<Vec<NodeIdx>>,
    /// Every edge of `adj`, in canonical form.
    edges: Vec<Edge>,
    /// For each edge, the edges parallel to it at lattice distance 2 (sorted).
    /// Symmetric: `f ∈ edge_adj[e] ⇔ e ∈ edge_adj[f]`.
    edge_adj: HashMap<Edge, Vec<Edge>>,
    /// `weights[n]` is the accretion level of `verts[n]`.
    weights: NodeVec<u32>,
    strata: Strata,
}

impl Graph {
    /// Builds the discocube graph of the given order.  The vertex set is every
    /// odd-coordinate point whose L¹ distance from the origin is at most
    /// [`Order::radius`] - exactly the corners of the accreted unit cubes.
    pub fn new(order: Order) -> Self {
        let radius = order.radius();
        let odd = || (-radius..=radius).step_by(2);
        let mut verts: Vec<Point3> = itertools::iproduct!(odd(), odd(), odd())
            .map(|(x, y, z)| Point3::new(x, y, z))
            .filter(|p| p.accretion() <= radius as u32)
            .collect();
        verts.sort_unstable_by_key(|p| (p.dist_sq(), p.x, p.y, p.z));
        Self::from_verts(order, verts).expect("generated vertex table matches its order")
    }

    /// Rebuilds a graph from an already-canonical vertex table (e.g. one loaded
    /// from a cache blob).  The table must be in canonical order; structural
    /// problems beyond a length mismatch are reported by [`Graph::validate`].
    pub fn from_verts(order: Order, verts: Vec<Point3>) -> Result<Self, GraphError> {
        if verts.len() != order.as_usize() {
            return Err(GraphError::Inconsistent {
                reason: format!(
                    "vertex table holds {} points but the order is {}",
                    verts.len(),
                    order
                ),
            });
        }
        let verts: NodeVec<Point3> = verts.into_iter().collect();
        let index: HashMap<Point3, NodeIdx> = verts
            .iter_enumerated()
            .map(|(n, &p)| (p, n))
            .collect();

        // Adjacency and edges
        let mut adj: NodeVec<Vec<NodeIdx>> =
            verts.iter().map(|_| Vec::with_capacity(6)).collect();
        let mut edges = Vec::new();
        for (n, p) in verts.iter_enumerated() {
            for q in p.axis_neighbours() {
                if let Some(&n2) = index.get(&q) {
                    adj[n].push(n2);
                    if n < n2 {
                        edges.push(Edge(n, n2));
                    }
                }
            }
        }
        for neighbours in adj.iter_mut() {
            neighbours.sort_unstable();
        }

        // Edge adjacency: for e = (u, v), every (u', v') with u' ∈ A(u)\{v},
        // v' ∈ A(v)\{u} which is itself an edge.  On this lattice those are
        // precisely the edges parallel to e at distance 2.
        let edge_set: HashSet<Edge> = edges.iter().copied().collect();
        let mut edge_adj = HashMap::with_capacity(edges.len());
        for &e in &edges {
            let (u, v) = e.ends();
            let mut parallels = Vec::new();
            for &u2 in &adj[u] {
                if u2 == v {
                    continue;
                }
                for &v2 in &adj[v] {
                    if v2 == u {
                        continue;
                    }
                    let f = Edge::new(u2, v2);
                    if edge_set.contains(&f) {
                        parallels.push(f);
                    }
                }
            }
            parallels.sort_unstable();
            edge_adj.insert(e, parallels);
        }

        let weights: NodeVec<u32> = verts.iter().map(|p| p.accretion()).collect();

        // Stratify the negative half-space
        let mut counts = BTreeMap::new();
        for p in verts.iter() {
            if p.z < 0 {
                *counts.entry(p.z).or_insert(0) += 1;
            }
        }
        let slab = verts
            .iter_enumerated()
            .filter(|(_, p)| p.z == -1)
            .map(|(n, _)| {
                let in_slab = adj[n]
                    .iter()
                    .copied()
                    .filter(|&n2| verts[n2].z == -1)
                    .collect();
                (n, in_slab)
            })
            .collect();

        Ok(Graph {
            order,
            verts,
            index,
            adj,
            edges,
            edge_adj,
            weights,
            strata: Strata { slab, counts },
        })
    }

    pub fn order(&self) -> Order {
        self.order
    }

    pub fn verts(&self) -> &NodeVec<Point3> {
        &self.verts
    }

    pub fn vert(&self, n: NodeIdx) -> Point3 {
        self.verts[n]
    }

    /// Looks up the node at a given point, if there is one.
    pub fn node_at(&self, p: Point3) -> Option<NodeIdx> {
        self.index.get(&p).copied()
    }

    pub fn neighbours(&self, n: NodeIdx) -> &[NodeIdx] {
        &self.adj[n]
    }

    pub fn are_adjacent(&self, a: NodeIdx, b: NodeIdx) -> bool {
        self.adj[a].binary_search(&b).is_ok()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// The edges parallel to `e` at lattice distance 2: the legal bridge
    /// candidates when merging cycles.
    pub fn parallels(&self, e: Edge) -> &[Edge] {
        self.edge_adj.get(&e).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The accretion level of node `n`.
    pub fn weight(&self, n: NodeIdx) -> u32 {
        self.weights[n]
    }

    pub fn strata(&self) -> &Strata {
        &self.strata
    }

    /// A 2-coloring of the graph grown outwards from node 0.  Discocube graphs
    /// are bipartite, so every edge joins differently-colored nodes; `validate`
    /// and the parity tests rely on this.
    pub fn two_coloring(&self) -> NodeVec<bool> {
        let mut color: NodeVec<Option<bool>> = self.verts.iter().map(|_| None).collect();
        let mut frontier = vec![NodeIdx::new(0)];
        color[NodeIdx::new(0)] = Some(false);
        while let Some(n) = frontier.pop() {
            let c = color[n].expect("frontier nodes are colored");
            for &n2 in &self.adj[n] {
                if color[n2].is_none() {
                    color[n2] = Some(!c);
                    frontier.push(n2);
                }
            }
        }
        color
            .into_iter()
            .map(|c| c.expect("discocube graphs are connected"))
            .collect()
    }

    /// Checks the internal consistency of every derived table, returning the
    /// first violation found.  Cheap enough to run on every cache load.
    pub fn validate(&self) -> Result<(), GraphError> {
        let fail = |reason: String| Err(GraphError::Inconsistent { reason });

        if self.verts.len() != self.order.as_usize() {
            return fail(format!("{} vertices for order {}", self.verts.len(), self.order));
        }
        for (n, &p) in self.verts.iter_enumerated() {
            if self.index.get(&p) != Some(&n) {
                return fail(format!("index map disagrees with vertex table at {:?}", n));
            }
            if self.weights[n] != p.accretion() {
                return fail(format!("weight of {:?} is not its accretion level", n));
            }
        }
        for (n, neighbours) in self.adj.iter_enumerated() {
            if !(3..=6).contains(&neighbours.len()) {
                return fail(format!("{:?} has degree {}", n, neighbours.len()));
            }
            for &n2 in neighbours {
                if !self.are_adjacent(n2, n) {
                    return fail(format!("adjacency is not symmetric at {:?}/{:?}", n, n2));
                }
                let (p, q) = (self.verts[n], self.verts[n2]);
                let diffs = [(p.x - q.x).abs(), (p.y - q.y).abs(), (p.z - q.z).abs()];
                if diffs.iter().sum::<i32>() != 2 || !diffs.contains(&2) {
                    return fail(format!("{:?}-{:?} is not an axis step of length 2", n, n2));
                }
            }
        }
        let degree_sum: usize = self.adj.iter().map(Vec::len).sum();
        if self.edges.len() * 2 != degree_sum {
            return fail(format!("{} edges for a degree sum of {}", self.edges.len(), degree_sum));
        }
        for &e in &self.edges {
            for &f in self.parallels(e) {
                if !self.parallels(f).contains(&e) {
                    return fail(format!("edge adjacency is not symmetric at {:?}/{:?}", e, f));
                }
                let (u, v) = e.ends();
                let (a, b) = f.ends();
                let straight = self.are_adjacent(u, a) && self.are_adjacent(v, b);
                let crossed = self.are_adjacent(u, b) && self.are_adjacent(v, a);
                if !(straight || crossed) {
                    return fail(format!("{:?} is not parallel to {:?}", f, e));
                }
            }
        }
        let stratum_sum: usize = self.strata.counts().map(|(_, count)| count).sum();
        if stratum_sum * 2 != self.order.as_usize() {
            return fail(format!(
                "negative strata hold {} nodes, expected {}",
                stratum_sum,
                self.order.as_usize() / 2
            ));
        }
        if self.strata.counts.get(&-1) != Some(&self.strata.slab.len()) {
            return fail("slab sub-adjacency disagrees with the z = -1 count".to_owned());
        }
        Ok(())
    }
}

/// The ways constructing or checking a [`Graph`] can fail.  Both kinds are fatal:
/// callers should treat an `Inconsistent` graph as a bug in whatever produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// The requested order is not an uncentered octahedral number.
    InvalidOrder(u32),
    /// A derived table violates a structural invariant.
    Inconsistent { reason: String },
}

impl Display for GraphError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::InvalidOrder(order) => write!(
                f,
                "{} is not an uncentered octahedral number (32, 80, 160, 280, ...)",
                order
            ),
            GraphError::Inconsistent { reason } => {
                write!(f, "graph tables are inconsistent: {}", reason)
            }
        }
    }
}

impl std::error::Error for GraphError {}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::Graph;
    use crate::{Order, Point3};

    fn graph(order: u32) -> Graph {
        Graph::new(Order::new(order).unwrap())
    }

    #[test]
    fn first_shell_of_32() {
        // The innermost cube's corners, in canonical order
        let g = graph(32);
        let first_12 = g.verts().iter().take(12).copied().collect_vec();
        assert_eq!(
            first_12,
            [
                Point3::new(-1, -1, -1),
                Point3::new(-1, -1, 1),
                Point3::new(-1, 1, -1),
                Point3::new(-1, 1, 1),
                Point3::new(1, -1, -1),
                Point3::new(1, -1, 1),
                Point3::new(1, 1, -1),
                Point3::new(1, 1, 1),
                Point3::new(-3, -1, -1),
                Point3::new(-3, -1, 1),
                Point3::new(-3, 1, -1),
                Point3::new(-3, 1, 1),
            ]
        );
    }

    #[test]
    fn vertex_counts() {
        for order in [32, 80, 160, 280, 448, 672] {
            assert_eq!(graph(order).verts().len(), order as usize);
        }
    }

    #[test]
    fn validates() {
        for order in [32, 80, 160] {
            graph(order).validate().unwrap();
        }
    }

    #[test]
    fn strata_of_32() {
        let g = graph(32);
        assert_eq!(g.strata().counts().collect_vec(), [(-3, 4), (-1, 12)]);
        assert_eq!(g.strata().slab().len(), 12);
        assert_eq!(g.strata().depth(), 2);
    }

    #[test]
    fn two_coloring_is_proper() {
        let g = graph(80);
        let coloring = g.two_coloring();
        for &e in g.edges() {
            let (u, v) = e.ends();
            assert_ne!(coloring[u], coloring[v]);
        }
    }

    #[test]
    fn round_trips_through_its_own_verts() {
        let g = graph(80);
        let verts = g.verts().iter().copied().collect_vec();
        let rebuilt = Graph::from_verts(g.order(), verts).unwrap();
        rebuilt.validate().unwrap();
        assert_eq!(rebuilt.edges().len(), g.edges().len());
    }

    #[test]
    fn degrees_and_lookup() {
        let g = graph(32);
        for (n, &p) in g.verts().iter_enumerated() {
            assert_eq!(g.node_at(p), Some(n));
            let degree = g.neighbours(n).len();
            assert!(degree == 3 || degree == 6, "unexpected degree {}", degree);
        }
    }

    #[test]
    fn parallels_are_disjoint_from_their_edge() {
        let g = graph(80);
        for &e in g.edges() {
            for &f in g.parallels(e) {
                let (u, v) = e.ends();
                assert!(!f.contains(u) && !f.contains(v));
            }
        }
    }
}
