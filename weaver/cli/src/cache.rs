//! The graph blob cache.
//!
//! Graphs are pure functions of their order, so the cache only stores the
//! canonical vertex table; the derived tables (adjacency, edge adjacency,
//! weights, strata) are rebuilt on load.  Blobs are bincode files named by order.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::Context;
use discocube::{Graph, Order, Point3};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
struct Blob {
    order: u32,
    verts: Vec<Point3>,
}

/// Loads the graph of `order` from the cache, or builds it (and caches it,
/// unless `rebuild` is set).
pub fn load_or_build(order: Order, dir: &Path, rebuild: bool) -> anyhow::Result<Graph> {
    let path = dir.join(order.to_string());
    if !rebuild && path.exists() {
        let file = File::open(&path)
            .with_context(|| format!("Failed to open graph blob {}", path.display()))?;
        let blob: Blob = bincode::deserialize_from(BufReader::new(file))
            .with_context(|| format!("Failed to deserialize graph blob {}", path.display()))?;
        anyhow::ensure!(
            blob.order == order.as_u32(),
            "graph blob {} holds order {}, not {}",
            path.display(),
            blob.order,
            order
        );
        let graph = Graph::from_verts(order, blob.verts)?;
        log::info!("loaded graph of order {} from {}", order, path.display());
        return Ok(graph);
    }

    let graph = Graph::new(order);
    if !rebuild {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create cache dir {}", dir.display()))?;
        let file = File::create(&path)
            .with_context(|| format!("Failed to create graph blob {}", path.display()))?;
        let blob = Blob {
            order: order.as_u32(),
            verts: graph.verts().iter().copied().collect(),
        };
        bincode::serialize_into(BufWriter::new(file), &blob)
            .with_context(|| format!("Failed to serialize graph blob {}", path.display()))?;
        log::info!("cached graph of order {} at {}", order, path.display());
    }
    Ok(graph)
}
