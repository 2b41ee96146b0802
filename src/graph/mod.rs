//! A compact CSR (compressed sparse row) graph.
//!
//! Memory layout:
//! - `offsets`: `Vec<usize>` of length `n`; `offsets[i]` is where vertex `i`'s
//!   out-neighbors start inside `edges`
//! - `edges`: flat `Vec<Vertex>` of length `m`
//!
//! Vertex `i`'s neighbor list ends at `offsets[i + 1]`, or at `m` for the last
//! vertex. There is no trailing sentinel offset; this matches the on-disk
//! format read by [`load_graph`].

use core::ops::Index;

use crate::Vertex;

pub mod loader;

pub use loader::{load_graph, parse_graph};

/// Largest vertex count a [`Graph`] holds.
///
/// Traversal uses `n` itself as an out-of-range marker, so `n` must fit
/// [`Vertex`] as well as every id below it.
pub const MAX_VERTICES: usize = Vertex::MAX as usize;

/// An immutable CSR graph.
///
/// Construction is the only write path. Neighbor lists are borrowed slices, so
/// a view can never outlive the graph it came from.
///
/// ### Performance Characteristics
/// | Operation | Complexity | Notes |
/// |-----------|------------|-------|
/// | `from_parts` | \(O(n)\) | Takes ownership of CSR arrays, checks offsets |
/// | `from_adjacency` | \(O(n + m)\) | Builds CSR from adjacency list |
/// | `neighbors` | \(O(1)\) | Returns a slice of out-neighbors |
/// | `degree` | \(O(1)\) | Returns out-degree |
/// | `transpose` | \(O(n + m)\) | Counting sort by destination |
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    offsets: Vec<usize>,
    edges: Vec<Vertex>,
}

impl Graph {
    /// Builds a graph directly from CSR parts.
    ///
    /// Edge targets are not range-checked. An out-of-range target panics on
    /// first use as an index during traversal.
    ///
    /// # Panics
    /// - if there are more than [`MAX_VERTICES`] offsets
    /// - if `offsets` is not non-decreasing
    /// - if the last offset runs past `edges`
    pub fn from_parts(offsets: Vec<usize>, edges: Vec<Vertex>) -> Self {
        assert!(
            offsets.len() <= MAX_VERTICES,
            "{} vertices do not fit the vertex id type",
            offsets.len()
        );
        assert!(
            offsets.windows(2).all(|w| w[0] <= w[1]),
            "offsets must be non-decreasing"
        );
        assert!(
            offsets.last().map_or(true, |&o| o <= edges.len()),
            "offsets must not run past the edge array"
        );
        Self { offsets, edges }
    }

    /// Builds a graph from an adjacency list.
    ///
    /// # Panics
    ///
    /// Panics if any edge references a vertex out of bounds, or if there are
    /// more vertices than [`Vertex`] can name.
    pub fn from_adjacency(adjacency: &[Vec<Vertex>]) -> Self {
        let n = adjacency.len();
        assert!(n <= MAX_VERTICES, "{n} vertices do not fit the vertex id type");

        let mut offsets = Vec::with_capacity(n);
        let mut total_edges = 0usize;
        for nbrs in adjacency {
            offsets.push(total_edges);
            total_edges += nbrs.len();
        }

        let mut edges = Vec::with_capacity(total_edges);
        for (u, nbrs) in adjacency.iter().enumerate() {
            for &v in nbrs {
                assert!((v as usize) < n, "edge {u}->{v} is out of bounds for n={n}");
                edges.push(v);
            }
        }

        Self { offsets, edges }
    }

    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.offsets.len()
    }

    /// Number of edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Returns the out-neighbors of `v`.
    ///
    /// # Panics
    /// Panics if `v >= num_vertices()`.
    #[inline]
    pub fn neighbors(&self, v: usize) -> &[Vertex] {
        let start = self.offsets[v];
        let end = self.end_offset(v);
        &self.edges[start..end]
    }

    /// Returns the out-degree of `v`.
    ///
    /// # Panics
    /// Panics if `v >= num_vertices()`.
    #[inline]
    pub fn degree(&self, v: usize) -> usize {
        self.end_offset(v) - self.offsets[v]
    }

    /// Start position of each vertex's neighbor list.
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// The flat edge array.
    pub fn edges(&self) -> &[Vertex] {
        &self.edges
    }

    /// Returns the graph with every edge reversed.
    ///
    /// Dense traversal reads each vertex's list as *in*-neighbors, so directed
    /// pull traversal needs this graph. In-neighbor lists are ordered by
    /// increasing source.
    pub fn transpose(&self) -> Self {
        let n = self.num_vertices();

        // Count incoming edges for each vertex.
        let mut in_degrees = vec![0usize; n];
        for &v in &self.edges {
            in_degrees[v as usize] += 1;
        }

        // Start offsets are prefix sums of in-degrees.
        let mut offsets = Vec::with_capacity(n);
        let mut total = 0usize;
        for &deg in &in_degrees {
            offsets.push(total);
            total += deg;
        }

        // Fill by position, scanning sources in increasing order.
        let mut edges: Vec<Vertex> = vec![0; total];
        let mut write_pos = offsets.clone();
        for u in 0..n {
            for &v in self.neighbors(u) {
                let slot = &mut write_pos[v as usize];
                // `u < n <= MAX_VERTICES`.
                edges[*slot] = u as Vertex;
                *slot += 1;
            }
        }

        Self { offsets, edges }
    }

    #[inline]
    fn end_offset(&self, v: usize) -> usize {
        if v + 1 == self.offsets.len() {
            self.edges.len()
        } else {
            self.offsets[v + 1]
        }
    }
}

impl Index<usize> for Graph {
    type Output = [Vertex];

    fn index(&self, v: usize) -> &[Vertex] {
        self.neighbors(v)
    }
}
