//! Errors surfaced while loading a graph.
//!
//! Traversal itself defines no failure modes; a step always returns a
//! well-formed [`VertexSubset`](crate::VertexSubset). Every structural problem
//! is caught here, before a [`Graph`](crate::Graph) exists.

use core::fmt;
use std::path::PathBuf;

/// The error type for graph loading failures.
///
/// None of these are recoverable: no partial graph is ever returned.
#[derive(Debug)]
pub enum LoadError {
    /// The graph file could not be read.
    Io {
        /// Path that failed to open or read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Fewer than the three header tokens (`tag n m`) were present.
    MissingHeader {
        /// Number of tokens actually found.
        found: usize,
    },
    /// The header announced a different token count than the input holds.
    TokenCount {
        /// `3 + n + m` as announced by the header.
        expected: usize,
        /// Number of tokens actually found.
        found: usize,
    },
    /// The header announced more vertices than a [`Vertex`](crate::Vertex) can
    /// count.
    TooManyVertices {
        /// Announced vertex count.
        n: usize,
        /// Largest accepted vertex count.
        max: usize,
    },
    /// An offset decreased, or ran past the edge count.
    InvalidOffsets {
        /// Vertex whose offset is out of order.
        vertex: usize,
        /// The offending offset.
        offset: usize,
    },
    /// A token that must be a decimal integer was not one.
    InvalidToken {
        /// Zero-based token position in the input.
        index: usize,
        /// The offending token.
        token: String,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read graph file {}: {source}", path.display())
            }
            Self::MissingHeader { found } => {
                write!(f, "graph header needs 3 tokens (tag n m), found {found}")
            }
            Self::TokenCount { expected, found } => write!(
                f,
                "malformed graph: header announces {expected} tokens, found {found}"
            ),
            Self::TooManyVertices { n, max } => {
                write!(f, "graph has {n} vertices, at most {max} are supported")
            }
            Self::InvalidOffsets { vertex, offset } => write!(
                f,
                "malformed graph: offset {offset} of vertex {vertex} is out of order"
            ),
            Self::InvalidToken { index, token } => {
                write!(f, "token {index} ({token:?}) is not a decimal integer")
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
