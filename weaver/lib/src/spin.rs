//! The first phase of the solve: a greedy Hamiltonian path over the z = -1 slab.

use bit_vec::BitVec;
use discocube::{Graph, NodeIdx};

use crate::{Error, Result};

/// Walks a Hamiltonian path over the z = -1 sub-adjacency, starting at the
/// highest-indexed slab node (the outermost corner under the canonical vertex
/// ordering) and always stepping to the unvisited neighbour with the greatest
/// weight, ties broken towards the higher node index.
///
/// Preferring the heaviest (most peripheral) next step traces a
/// boustrophedon-like stroke that spirals inwards without ever backtracking; a
/// dead-end before the slab is covered means the input graph is broken, not that
/// the walk was unlucky.
pub(crate) fn spin(graph: &Graph) -> Result<Vec<NodeIdx>> {
    let slab = graph.strata().slab();
    let start = slab
        .keys()
        .copied()
        .max()
        .expect("every admissible graph has a z = -1 slab");

    let mut path = Vec::with_capacity(slab.len());
    let mut visited = BitVec::from_elem(graph.order().as_usize(), false);
    path.push(start);
    visited.set(start.index(), true);

    let mut current = start;
    for _ in 1..slab.len() {
        let step = slab[&current]
            .iter()
            .copied()
            .filter(|n| !visited[n.index()])
            .max_by_key(|&n| (graph.weight(n), n));
        match step {
            Some(next) => {
                path.push(next);
                visited.set(next.index(), true);
                current = next;
            }
            None => {
                return Err(Error::SpinStuck {
                    covered: path.len(),
                    expected: slab.len(),
                })
            }
        }
    }
    Ok(path)
}
