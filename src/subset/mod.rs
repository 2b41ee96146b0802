//! Active vertex sets in sparse or dense form.
//!
//! A [`VertexSubset`] does not store the vertex count `n`; conversions to the
//! dense form take it as a parameter. Conversions are computed fresh on every
//! call and never cached on the subset. Callers that need the same derived view
//! repeatedly should keep the result themselves.

use std::borrow::Cow;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use crate::Vertex;

/// A set of active vertices.
///
/// Both variants describe the same abstraction and convert losslessly in
/// either direction (as sets; concrete order is not preserved).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VertexSubset {
    /// Explicit vertex ids. Order affects only how parallel work is split.
    Sparse(Vec<Vertex>),
    /// `flags[v]` is `true` iff `v` is active.
    Dense(Vec<bool>),
}

impl VertexSubset {
    /// An empty sparse subset.
    pub fn empty() -> Self {
        Self::Sparse(Vec::new())
    }

    /// A sparse subset holding just `v`.
    pub fn from_vertex(v: Vertex) -> Self {
        Self::Sparse(vec![v])
    }

    /// A sparse subset from explicit vertex ids.
    pub fn from_indices(indices: Vec<Vertex>) -> Self {
        Self::Sparse(indices)
    }

    /// A dense subset from per-vertex flags.
    pub fn from_flags(flags: Vec<bool>) -> Self {
        Self::Dense(flags)
    }

    /// Returns `true` for the dense representation.
    pub fn is_dense(&self) -> bool {
        matches!(self, Self::Dense(_))
    }

    /// Number of active vertices.
    ///
    /// Dense subsets count their flags with a parallel reduction; sparse
    /// subsets report their length.
    pub fn size(&self) -> usize {
        match self {
            Self::Sparse(indices) => indices.len(),
            Self::Dense(flags) => flags.par_iter().filter(|&&f| f).count(),
        }
    }

    /// Returns `true` if no vertex is active.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Dense view over `n` vertices.
    ///
    /// Borrows when already dense; otherwise allocates `n` flags and sets the
    /// listed vertices in parallel.
    ///
    /// # Panics
    /// Panics if a listed vertex is `>= n`.
    pub fn get_flags(&self, n: usize) -> Cow<'_, [bool]> {
        match self {
            Self::Dense(flags) => Cow::Borrowed(flags.as_slice()),
            Self::Sparse(indices) => Cow::Owned(scatter_flags(indices, n)),
        }
    }

    /// Sparse view.
    ///
    /// Borrows when already sparse; otherwise packs the set positions, in
    /// ascending order.
    pub fn get_indices(&self) -> Cow<'_, [Vertex]> {
        match self {
            Self::Sparse(indices) => Cow::Borrowed(indices.as_slice()),
            Self::Dense(flags) => Cow::Owned(pack_flags(flags)),
        }
    }

    /// Consuming form of [`get_flags`](Self::get_flags).
    pub fn into_flags(self, n: usize) -> Vec<bool> {
        match self {
            Self::Dense(flags) => flags,
            Self::Sparse(indices) => scatter_flags(&indices, n),
        }
    }

    /// Consuming form of [`get_indices`](Self::get_indices).
    pub fn into_indices(self) -> Vec<Vertex> {
        match self {
            Self::Sparse(indices) => indices,
            Self::Dense(flags) => pack_flags(&flags),
        }
    }
}

impl Default for VertexSubset {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Vertex> for VertexSubset {
    fn from(v: Vertex) -> Self {
        Self::from_vertex(v)
    }
}

impl From<Vec<Vertex>> for VertexSubset {
    fn from(indices: Vec<Vertex>) -> Self {
        Self::from_indices(indices)
    }
}

impl From<Vec<bool>> for VertexSubset {
    fn from(flags: Vec<bool>) -> Self {
        Self::from_flags(flags)
    }
}

/// Sparse subsets produced by push traversal may repeat a vertex, so two
/// tasks can set the same flag; per-vertex atomics keep that race benign.
fn scatter_flags(indices: &[Vertex], n: usize) -> Vec<bool> {
    let flags: Vec<AtomicBool> = (0..n).into_par_iter().map(|_| AtomicBool::new(false)).collect();
    indices.par_iter().for_each(|&v| {
        flags[v as usize].store(true, Ordering::Relaxed);
    });
    flags.into_par_iter().map(AtomicBool::into_inner).collect()
}

fn pack_flags(flags: &[bool]) -> Vec<Vertex> {
    flags
        .par_iter()
        .enumerate()
        .filter_map(|(i, &f)| f.then_some(i as Vertex))
        .collect()
}
