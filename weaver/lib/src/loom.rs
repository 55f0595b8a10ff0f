//! The loom: a stateful multi-level thread manager.
//!
//! Strata are processed strictly ascending in z (deepest first, the z = -1 slab
//! last).  Each stratum's colored strand is lifted to node IDs, cut at the bobbin
//! nodes wound up from the level below, and spliced onto the running threads;
//! winding then promotes every thread's endpoints into the next stratum.  After
//! the slab is spliced, every thread is reflected through z = 0, which closes it
//! into a loop.

use std::collections::{HashSet, VecDeque};

use discocube::{Graph, NodeIdx};

use crate::yarn::Spool;

/// An open path under construction.  Threads grow at both ends, so they are kept
/// as deques until the loom is done with them.
pub(crate) type Thread = VecDeque<NodeIdx>;

pub(crate) struct Loom {
    threads: Vec<Thread>,
}

impl Loom {
    /// Runs the full loom: splice every negative stratum, then mirror.  The
    /// returned loops are sorted by head node, partition the graph's node set,
    /// and are each fixed under reflection through z = 0.
    pub fn warp(graph: &Graph, spool: &Spool) -> Vec<Vec<NodeIdx>> {
        let mut loom = Loom {
            threads: Vec::new(),
        };
        let mut bobbins: HashSet<NodeIdx> = HashSet::new();
        for (z, count) in graph.strata().counts() {
            let strand = spool.strand(z);
            let yarn: Vec<NodeIdx> = strand[strand.len() - count..]
                .iter()
                .map(|p| {
                    graph
                        .node_at(p.lift(z))
                        .expect("colored strands lift onto every stratum")
                })
                .collect();
            let warps = if bobbins.is_empty() {
                vec![yarn]
            } else {
                cut(&yarn, &bobbins)
            };
            loom.splice(warps);
            // The slab is the final stratum; winding past it would leave the
            // negative half-space.
            bobbins = if z == -1 {
                HashSet::new()
            } else {
                loom.wind(graph)
            };
            log::debug!("stratum z = {}: loom holds {} threads", z, loom.threads.len());
        }
        loom.mirror(graph);
        loom.threads
            .sort_by_key(|thread| *thread.front().expect("threads are never empty"));
        loom.threads.into_iter().map(Vec::from).collect()
    }

    /// Splices each warp whose head matches the end of a running thread onto that
    /// end; warps matched at the front are prepended (reversing them in the
    /// process), warps matched at the back are appended.  Unmatched warps start
    /// new threads.
    fn splice(&mut self, warps: Vec<Vec<NodeIdx>>) {
        let mut consumed = vec![false; warps.len()];
        for thread in &mut self.threads {
            for (warp, used) in warps.iter().zip(consumed.iter_mut()) {
                if *used {
                    continue;
                }
                let head = warp[0];
                if *thread.front().expect("threads are never empty") == head {
                    for &n in &warp[1..] {
                        thread.push_front(n);
                    }
                    *used = true;
                } else if *thread.back().expect("threads are never empty") == head {
                    thread.extend(warp[1..].iter().copied());
                    *used = true;
                }
            }
        }
        for (warp, used) in warps.into_iter().zip(consumed) {
            if !used {
                self.threads.push(warp.into_iter().collect());
            }
        }
    }

    /// Promotes both endpoints of every thread one stratum upwards (z + 2) and
    /// returns the promoted nodes: the bobbins around which the next stratum's
    /// yarn is cut.
    fn wind(&mut self, graph: &Graph) -> HashSet<NodeIdx> {
        let mut bobbins = HashSet::with_capacity(self.threads.len() * 2);
        for thread in &mut self.threads {
            let first = graph.vert(*thread.front().expect("threads are never empty"));
            let last = graph.vert(*thread.back().expect("threads are never empty"));
            let left = graph
                .node_at(first.raise_z())
                .expect("every thread endpoint has a node directly above it");
            let right = graph
                .node_at(last.raise_z())
                .expect("every thread endpoint has a node directly above it");
            thread.push_front(left);
            thread.push_back(right);
            bobbins.insert(left);
            bobbins.insert(right);
        }
        bobbins
    }

    /// Extends every thread with the z-reflection of its own reversal.  Both
    /// thread endpoints sit one step below z = 0, so the reflection closes the
    /// thread into a loop whose ends are mirror partners.
    fn mirror(&mut self, graph: &Graph) {
        for thread in &mut self.threads {
            let reflection: Vec<NodeIdx> = thread
                .iter()
                .rev()
                .map(|&n| {
                    graph
                        .node_at(graph.vert(n).mirror_z())
                        .expect("the vertex set is symmetric in z")
                })
                .collect();
            thread.extend(reflection);
        }
    }
}

/// Partitions `tour` at the positions of the bobbin nodes.
///
/// Each bobbin ends one piece (or, for the final bobbin away from the tail,
/// starts the tail piece); pieces whose head is not a bobbin are reversed, so
/// that every bobbin ends up at index 0 of exactly one emitted piece, ready to be
/// spliced onto the thread it pins.  Empty pieces are dropped.
pub(crate) fn cut(tour: &[NodeIdx], bobbins: &HashSet<NodeIdx>) -> Vec<Vec<NodeIdx>> {
    let cut_ixs: Vec<usize> = tour
        .iter()
        .enumerate()
        .filter(|(_, n)| bobbins.contains(n))
        .map(|(ix, _)| ix)
        .collect();
    let last_ix = tour.len() - 1;
    let mut pieces: Vec<Vec<NodeIdx>> = Vec::with_capacity(cut_ixs.len() + 1);
    let mut prev = 0;
    for (e, &ix) in cut_ixs.iter().enumerate() {
        if e == cut_ixs.len() - 1 && ix != last_ix {
            // The final bobbin falls short of the tail: it opens the tail piece
            // instead of closing its own.
            pieces.push(tour[prev..ix].to_vec());
            pieces.push(tour[ix..].to_vec());
        } else {
            pieces.push(tour[prev..=ix].to_vec());
            prev = ix + 1;
        }
    }
    pieces.retain(|piece| !piece.is_empty());
    for piece in &mut pieces {
        if !bobbins.contains(&piece[0]) {
            piece.reverse();
        }
    }
    pieces
}
