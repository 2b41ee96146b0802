//! Reading graphs from the whitespace-tokenized text format.
//!
//! Layout: `tag n m offset_0 .. offset_{n-1} edge_0 .. edge_{m-1}`, all decimal.
//! The tag is skipped. The total token count must be exactly `3 + n + m`.

use std::path::Path;
use std::str::FromStr;

use rayon::prelude::*;

use super::{Graph, MAX_VERTICES};
use crate::{error::LoadError, Vertex};

const HEADER_TOKENS: usize = 3;

/// Reads and parses the graph file at `path`.
///
/// # Errors
/// Returns [`LoadError::Io`] if the file cannot be read, and any error of
/// [`parse_graph`] for malformed content.
pub fn load_graph(path: impl AsRef<Path>) -> Result<Graph, LoadError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let graph = parse_graph(&text)?;
    tracing::info!(
        path = %path.display(),
        vertices = graph.num_vertices(),
        edges = graph.num_edges(),
        "loaded graph"
    );
    Ok(graph)
}

/// Parses a graph from text.
///
/// # Errors
/// - [`LoadError::MissingHeader`] if fewer than three tokens are present
/// - [`LoadError::TooManyVertices`] if `n` exceeds [`MAX_VERTICES`]
/// - [`LoadError::TokenCount`] if the token count is not `3 + n + m`
/// - [`LoadError::InvalidOffsets`] if offsets decrease or run past `m`
/// - [`LoadError::InvalidToken`] if any counted token is not a decimal integer
pub fn parse_graph(text: &str) -> Result<Graph, LoadError> {
    let words: Vec<&str> = text.split_ascii_whitespace().collect();
    if words.len() < HEADER_TOKENS {
        return Err(LoadError::MissingHeader { found: words.len() });
    }

    let n: usize = parse_token(&words, 1)?;
    let m: usize = parse_token(&words, 2)?;
    if n > MAX_VERTICES {
        return Err(LoadError::TooManyVertices {
            n,
            max: MAX_VERTICES,
        });
    }
    let expected = n
        .checked_add(m)
        .and_then(|nm| nm.checked_add(HEADER_TOKENS))
        .unwrap_or(usize::MAX);
    if expected != words.len() {
        tracing::error!(expected, found = words.len(), "graph token count mismatch");
        return Err(LoadError::TokenCount {
            expected,
            found: words.len(),
        });
    }

    let offsets_end = HEADER_TOKENS + n;
    let offsets = (HEADER_TOKENS..offsets_end)
        .into_par_iter()
        .map(|i| parse_token::<usize>(&words, i))
        .collect::<Result<Vec<_>, _>>()?;
    let edges = (offsets_end..words.len())
        .into_par_iter()
        .map(|i| parse_token::<Vertex>(&words, i))
        .collect::<Result<Vec<_>, _>>()?;

    check_offsets(&offsets, m)?;

    Ok(Graph::from_parts(offsets, edges))
}

/// Offsets must be non-decreasing and stay within the `m` edges.
fn check_offsets(offsets: &[usize], m: usize) -> Result<(), LoadError> {
    let bad = offsets
        .par_iter()
        .enumerate()
        .find_first(|&(i, &o)| o > m || (i > 0 && o < offsets[i - 1]));
    match bad {
        Some((vertex, &offset)) => Err(LoadError::InvalidOffsets { vertex, offset }),
        None => Ok(()),
    }
}

fn parse_token<T: FromStr>(words: &[&str], index: usize) -> Result<T, LoadError> {
    words[index].parse().map_err(|_| LoadError::InvalidToken {
        index,
        token: words[index].to_owned(),
    })
}
