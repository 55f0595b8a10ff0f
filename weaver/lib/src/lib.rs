//! A deterministic divide-and-conquer constructor for Hamiltonian cycles on
//! discocube graphs.
//!
//! The solver exploits the graph's symmetry about the z = 0 plane and its
//! z-stratified structure, and runs in time linear in the order:
//!
//! 1. **Spin** a greedy Hamiltonian path over the z = -1 slab.
//! 2. **Color** it into two strands (natural and blue), one per z mod 4.
//! 3. **Warp the loom**: per stratum, cut the strand at the bobbin nodes wound
//!    up from the level below and splice the pieces onto the running threads;
//!    then reflect every thread through z = 0, closing it into a loop.
//! 4. **Weave** the loops into a single cycle via parallel-edge bridges.
//!
//! No search and no randomness anywhere: two runs on the same [`Graph`] always
//! produce the same cycle.

#![deny(clippy::all)]
#![deny(rustdoc::broken_intra_doc_links)]

mod cycle;
mod loom;
mod spin;
mod weave;
mod yarn;
pub mod verify;

use std::fmt::{Display, Formatter};

use discocube::{Graph, NodeIdx};

pub use cycle::Cycle;
pub use verify::Certificate;

/// Constructs a Hamiltonian cycle on `graph`.
///
/// The output is certified before it is returned: a [`Cycle`] always visits every
/// node exactly once, every consecutive pair (wrap-around included) is an edge of
/// the graph, and the same graph always yields the same cycle.
pub fn solve(graph: &Graph) -> Result<Cycle> {
    let loops = mirrored_loops(graph)?;
    log::debug!("loom holds {} closed loops", loops.len());
    let nodes = weave::weave(graph, loops)?;
    match verify::certify(&nodes, graph) {
        Certificate::Loop => Ok(Cycle::new(nodes)),
        certificate => Err(Error::Broken(certificate)),
    }
}

/// Runs the solver up to (and including) the mirror step, returning the disjoint
/// closed loops held on the loom before they are woven together.
///
/// [`solve`] is the composition of this and the weave; the intermediate state is
/// exposed because the loop cover has testable structure of its own (the loops
/// partition the node set, and each is fixed under reflection through z = 0).
pub fn mirrored_loops(graph: &Graph) -> Result<Vec<Vec<NodeIdx>>> {
    let path = spin::spin(graph)?;
    let spool = yarn::Spool::color(&path, graph);
    Ok(loom::Loom::warp(graph, &spool))
}

pub type Result<T> = std::result::Result<T, Error>;

/// The ways the solver can fail.  All of them indicate a bug in either the input
/// graph or the solver itself, never a recoverable condition: the solver reports
/// the first failure and returns no partial output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The greedy walk over the z = -1 slab dead-ended before covering it.
    SpinStuck { covered: usize, expected: usize },
    /// Two disjoint loops remained with no parallel bridge between them.
    BridgeNotFound { loops_left: usize },
    /// The woven sequence failed final certification.
    Broken(Certificate),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::SpinStuck { covered, expected } => write!(
                f,
                "spin dead-ended after {} of {} slab nodes",
                covered, expected
            ),
            Error::BridgeNotFound { loops_left } => write!(
                f,
                "no parallel bridge between the {} remaining loops",
                loops_left
            ),
            Error::Broken(certificate) => {
                write!(f, "woven sequence failed certification: {}", certificate)
            }
        }
    }
}

impl std::error::Error for Error {}
