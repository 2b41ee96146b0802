//! One frontier step: apply a [`Mapper`] along the out-edges of an active set.
//!
//! Two traversals are available, picked per step by frontier density:
//! - **sparse push**: walk the edges of each active vertex, resolving races on
//!   destinations through [`Mapper::update_atomic`]; produces a sparse subset
//! - **dense pull**: every vertex scans its own neighbor list for active
//!   sources through [`Mapper::update`]; produces a dense subset
//!
//! The output representation follows the traversal used, not the input.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::{
    graph::Graph,
    sequence::{self, SlotWriter},
    subset::VertexSubset,
    Vertex,
};

pub mod mapper;

pub use mapper::{FirstVisit, Mapper};

/// Default frontier density divisor: dense when `size > n / 10`.
pub const DEFAULT_SPARSE_DENSE_RATIO: usize = 10;

/// Default minimum neighbor checks per task in sparse traversal.
pub const DEFAULT_SPARSE_GRAIN: usize = 200;

/// Tuning knobs for [`edge_map_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeMapOptions {
    /// A step runs dense when the frontier holds more than
    /// `num_vertices / sparse_dense_ratio` vertices.
    ///
    /// `0` never runs dense; `usize::MAX` runs dense for any non-empty
    /// frontier.
    pub sparse_dense_ratio: usize,
    /// Minimum number of neighbors of one vertex handled per task in sparse
    /// traversal.
    pub sparse_grain: usize,
}

impl Default for EdgeMapOptions {
    fn default() -> Self {
        Self {
            sparse_dense_ratio: DEFAULT_SPARSE_DENSE_RATIO,
            sparse_grain: DEFAULT_SPARSE_GRAIN,
        }
    }
}

impl EdgeMapOptions {
    /// Returns these options with `sparse_dense_ratio` replaced.
    #[must_use]
    pub fn with_ratio(mut self, ratio: usize) -> Self {
        self.sparse_dense_ratio = ratio;
        self
    }

    /// Options that always pick sparse traversal.
    pub fn always_sparse() -> Self {
        Self::default().with_ratio(0)
    }

    /// Options that pick dense traversal for every non-empty frontier.
    pub fn always_dense() -> Self {
        Self::default().with_ratio(usize::MAX)
    }
}

/// The traversal chosen for one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Push from the listed active vertices.
    Sparse,
    /// Pull into every vertex from its active neighbors.
    Dense,
}

impl Strategy {
    /// Picks dense iff `size > n / ratio` (strictly greater).
    ///
    /// A zero ratio makes the threshold unbounded, so sparse is always chosen.
    pub fn select(size: usize, n: usize, ratio: usize) -> Self {
        match n.checked_div(ratio) {
            Some(threshold) if size > threshold => Self::Dense,
            _ => Self::Sparse,
        }
    }
}

/// What one non-empty step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepInfo {
    /// Active vertices going into the step.
    pub frontier: usize,
    /// Traversal the step ran.
    pub strategy: Strategy,
}

/// Runs one step with [`EdgeMapOptions::default`].
pub fn edge_map<M: Mapper + ?Sized>(
    graph: &Graph,
    subset: &VertexSubset,
    mapper: &M,
) -> VertexSubset {
    edge_map_with(graph, subset, mapper, &EdgeMapOptions::default())
}

/// Runs one step: returns the vertices activated by applying `mapper` along the
/// edges of `subset`.
///
/// Dense traversal reads `graph`'s lists as in-neighbors, so this fits
/// symmetric graphs. For directed graphs use [`edge_map_directed`].
///
/// An empty `subset` yields an empty sparse subset without calling `mapper`.
///
/// # Panics
/// Panics if `subset` names a vertex outside the graph, or if the graph holds
/// an edge to one.
pub fn edge_map_with<M: Mapper + ?Sized>(
    graph: &Graph,
    subset: &VertexSubset,
    mapper: &M,
    options: &EdgeMapOptions,
) -> VertexSubset {
    edge_map_directed(graph, graph, subset, mapper, options)
}

/// Like [`edge_map_with`], with separate edge directions: sparse traversal
/// pushes along `out_graph`, dense traversal pulls along `in_graph`.
///
/// `in_graph` is normally `out_graph.transpose()`, built once by the caller and
/// reused across steps.
///
/// # Panics
/// As [`edge_map_with`]; also if the two graphs disagree on the vertex count.
pub fn edge_map_directed<M: Mapper + ?Sized>(
    out_graph: &Graph,
    in_graph: &Graph,
    subset: &VertexSubset,
    mapper: &M,
    options: &EdgeMapOptions,
) -> VertexSubset {
    edge_map_traced(out_graph, in_graph, subset, mapper, options).0
}

/// Like [`edge_map_directed`], also reporting the step's frontier size and the
/// strategy it ran. The info is `None` for an empty frontier, where no
/// traversal runs.
///
/// # Panics
/// As [`edge_map_directed`].
pub fn edge_map_traced<M: Mapper + ?Sized>(
    out_graph: &Graph,
    in_graph: &Graph,
    subset: &VertexSubset,
    mapper: &M,
    options: &EdgeMapOptions,
) -> (VertexSubset, Option<StepInfo>) {
    let n = out_graph.num_vertices();
    assert_eq!(
        n,
        in_graph.num_vertices(),
        "out and in graphs must have the same vertex count"
    );

    let size = subset.size();
    if size == 0 {
        tracing::trace!("edge_map on empty frontier");
        return (VertexSubset::empty(), None);
    }

    let strategy = Strategy::select(size, n, options.sparse_dense_ratio);
    let next = match strategy {
        Strategy::Sparse => {
            edge_map_sparse(out_graph, &subset.get_indices(), mapper, options.sparse_grain)
        }
        Strategy::Dense => edge_map_dense(in_graph, &subset.get_flags(n), mapper),
    };

    // Counting a dense output is a parallel pass; skip it unless it is logged.
    if tracing::enabled!(Level::DEBUG) {
        tracing::debug!(
            ?strategy,
            frontier = size,
            output = next.size(),
            vertices = n,
            "edge_map step"
        );
    }

    let info = StepInfo {
        frontier: size,
        strategy,
    };
    (next, Some(info))
}

/// Push traversal over the listed `frontier`.
///
/// Each active vertex owns a run of output slots sized by its degree, found by
/// an exclusive prefix sum. Every neighbor check writes its own slot: the
/// neighbor if activated, `n` otherwise; a final filter drops the `n`s.
/// A destination activated by several sources appears once per success, and
/// these duplicates are kept.
pub(crate) fn edge_map_sparse<M: Mapper + ?Sized>(
    graph: &Graph,
    frontier: &[Vertex],
    mapper: &M,
    grain: usize,
) -> VertexSubset {
    let n = graph.num_vertices();
    // Graphs hold at most `Vertex::MAX` vertices, so `n` fits and, since ids
    // are < n, never names a real vertex.
    let sentinel = n as Vertex;

    let mut offsets: Vec<usize> = frontier
        .par_iter()
        .map(|&v| graph.degree(v as usize))
        .collect();
    let total = sequence::scan_exclusive(&mut offsets);

    let mut next: Vec<Vertex> = vec![sentinel; total];
    {
        let slots = SlotWriter::new(&mut next);
        frontier
            .par_iter()
            .zip(offsets.par_iter())
            .for_each(|(&v, &base)| {
                graph
                    .neighbors(v as usize)
                    .par_iter()
                    .enumerate()
                    .with_min_len(grain)
                    .for_each(|(j, &ngh)| {
                        let out = if mapper.cond(ngh) && mapper.update_atomic(v, ngh) {
                            ngh
                        } else {
                            sentinel
                        };
                        // SAFETY: the prefix sum reserves slots base..base + degree(v)
                        // for `v` alone, and `j` is unique within that run.
                        unsafe { slots.write(base + j, out) };
                    });
            });
    }

    let active: Vec<Vertex> = next.into_par_iter().filter(|&u| (u as usize) < n).collect();
    VertexSubset::Sparse(active)
}

/// Pull traversal with the active set as per-vertex `flags`.
///
/// One task per destination `d` scans its list in order. The scan stops as soon
/// as `cond(d)` fails, but not on a successful `update`: later active
/// neighbors still get their `update(s, d)` call while `cond(d)` holds, which
/// accumulation-style mappers rely on. `d` is active in the output iff any of
/// its `update` calls succeeded.
pub(crate) fn edge_map_dense<M: Mapper + ?Sized>(
    graph: &Graph,
    flags: &[bool],
    mapper: &M,
) -> VertexSubset {
    let n = graph.num_vertices();
    let out: Vec<bool> = (0..n)
        .into_par_iter()
        .map(|d| {
            let dv = d as Vertex;
            let mut active = false;
            for &s in graph.neighbors(d) {
                if !mapper.cond(dv) {
                    break;
                }
                if flags[s as usize] && mapper.update(s, dv) {
                    active = true;
                }
            }
            active
        })
        .collect();
    VertexSubset::Dense(out)
}
