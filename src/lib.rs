//! # `ligra` - Frontier Traversal Engine
//!
//! A shared-memory, frontier-based graph traversal engine. Given a graph and a
//! set of active vertices, [`edge_map`] propagates a caller-supplied update
//! relation ([`Mapper`]) along edges and returns the next active set.
//!
//! ## Architecture
//!
//! 1. **Graph** ([`Graph`]):
//!    - Immutable compressed sparse row (CSR) adjacency
//!    - Neighbor lists are borrowed slices tied to the graph's lifetime
//!
//! 2. **Active sets** ([`VertexSubset`]):
//!    - Sparse (explicit vertex list) or dense (one flag per vertex)
//!    - Conversions are computed on request and never cached
//!
//! 3. **Edge map** ([`edge_map`], [`edge_map_with`]):
//!    - Sparse push for small frontiers, dense pull for large ones
//!    - The choice is a density threshold ([`EdgeMapOptions::sparse_dense_ratio`])
//!    - The output representation follows the strategy used, not the input
//!
//! 4. **Loading** ([`load_graph`], [`parse_graph`]):
//!    - Whitespace-tokenized text: `tag n m offsets... edges...`
//!    - Token-count mismatch is a distinguished [`LoadError`]
//!
//! All parallel loops run on the global rayon pool as fork-join regions.
//!
//! ## Example
//!
//! ```rust
//! use ligra::{edge_map, FirstVisit, Graph, VertexSubset};
//!
//! // Undirected: 0 - 1, 0 - 2, 1 - 3
//! let g = Graph::from_adjacency(&[vec![1, 2], vec![0, 3], vec![0], vec![1]]);
//! let bfs = FirstVisit::new(g.num_vertices());
//! bfs.visit(0);
//!
//! let frontier = edge_map(&g, &VertexSubset::from_vertex(0), &bfs);
//! let mut next = frontier.into_indices();
//! next.sort_unstable();
//! assert_eq!(next, vec![1, 2]);
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod concurrency;
pub mod edge_map;
pub mod error;
pub mod graph;
pub mod sequence;
pub mod subset;

/// A dense, zero-based vertex identifier in `[0, n)`.
pub type Vertex = u32;

pub use concurrency::AtomicBitset;
pub use edge_map::{
    edge_map, edge_map_directed, edge_map_traced, edge_map_with, EdgeMapOptions, FirstVisit,
    Mapper, StepInfo, Strategy,
};
pub use error::LoadError;
pub use graph::{load_graph, parse_graph, Graph};
pub use subset::VertexSubset;
