//! End-to-end solver tests over a spread of admissible orders.

use discocube::{Graph, NodeIdx, NodeVec, Order};

fn graph(order: u32) -> Graph {
    let graph = Graph::new(Order::new(order).unwrap());
    graph.validate().unwrap();
    graph
}

/// Asserts that `cycle` is a Hamiltonian cycle of `graph`, from first principles
/// (without going through `weaver::verify`).
fn assert_hamiltonian(cycle: &weaver::Cycle, graph: &Graph) {
    let order = graph.order().as_usize();
    assert_eq!(cycle.len(), order);
    let mut seen = vec![false; order];
    for n in cycle {
        assert!(!seen[n.index()], "node {} repeats", n.index());
        seen[n.index()] = true;
    }
    assert!(seen.iter().all(|&v| v), "not every node is covered");
    for (from, to) in cycle.steps() {
        assert!(
            graph.are_adjacent(from, to),
            "{} -> {} is not an edge",
            from.index(),
            to.index()
        );
    }
}

#[test]
fn order_32_solves_from_a_single_loop() {
    let graph = graph(32);
    // At the smallest order the loom already closes everything into one loop, so
    // the weave has nothing to merge.
    let loops = weaver::mirrored_loops(&graph).unwrap();
    assert_eq!(loops.len(), 1);
    let cycle = weaver::solve(&graph).unwrap();
    assert_hamiltonian(&cycle, &graph);
}

#[test]
fn order_80_alternates_the_bipartition() {
    let graph = graph(80);
    let cycle = weaver::solve(&graph).unwrap();
    assert_hamiltonian(&cycle, &graph);

    let coloring: NodeVec<bool> = graph.two_coloring();
    for (from, to) in cycle.steps() {
        assert_ne!(coloring[from], coloring[to]);
    }
}

#[test]
fn order_160_is_deterministic() {
    let graph = graph(160);
    let first = weaver::solve(&graph).unwrap();
    let second = weaver::solve(&graph).unwrap();
    assert_eq!(first, second);
    assert_hamiltonian(&first, &graph);
}

#[test]
fn loop_counts_after_mirroring() {
    // The loom yields shells/2 + 1 loops (a single one at the smallest order).
    for (order, expected) in [(32, 1), (80, 2), (160, 3), (280, 3), (448, 4), (672, 4)] {
        let graph = graph(order);
        let loops = weaver::mirrored_loops(&graph).unwrap();
        assert_eq!(loops.len(), expected, "order {}", order);
    }
}

#[test]
fn mirrored_loops_are_symmetric_and_partition_the_nodes() {
    let graph = graph(280);
    let loops = weaver::mirrored_loops(&graph).unwrap();

    let mut all: Vec<NodeIdx> = loops.iter().flatten().copied().collect();
    all.sort_unstable();
    assert!(all.iter().enumerate().all(|(i, n)| n.index() == i));

    for lp in &loops {
        // Closed, and fixed setwise under reflection through z = 0
        let first = graph.vert(lp[0]);
        let last = graph.vert(*lp.last().unwrap());
        assert_eq!(first.mirror_z(), last);

        let mut nodes: Vec<NodeIdx> = lp.clone();
        nodes.sort_unstable();
        let mut reflected: Vec<NodeIdx> = lp
            .iter()
            .map(|&n| graph.node_at(graph.vert(n).mirror_z()).unwrap())
            .collect();
        reflected.sort_unstable();
        assert_eq!(nodes, reflected);
    }
}

#[test]
fn orders_through_672_solve() {
    for order in [280, 448, 672] {
        let graph = graph(order);
        let cycle = weaver::solve(&graph).unwrap();
        assert_hamiltonian(&cycle, &graph);
    }
}

// The full-size run takes a while under `cargo test`; run it explicitly with
// `cargo test --release -- --ignored`.
#[test]
#[ignore]
fn order_79040_solves_with_twenty_loops() {
    let graph = graph(79_040);
    let loops = weaver::mirrored_loops(&graph).unwrap();
    assert_eq!(loops.len(), 20);
    let cycle = weaver::solve(&graph).unwrap();
    assert_hamiltonian(&cycle, &graph);
}
