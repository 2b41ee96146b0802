//! The update relation applied along edges.

use core::sync::atomic::Ordering;

use crate::{concurrency::AtomicBitset, Vertex};

/// An update relation driven by [`edge_map`](super::edge_map).
///
/// All methods take `&self` and are called from many tasks at once; per-vertex
/// state belongs behind interior mutability (usually atomics). Implementations
/// must assume the engine calls them in any order across vertices.
pub trait Mapper: Sync {
    /// Whether `v` may still be affected (e.g. not yet visited).
    ///
    /// Dense traversal re-checks this for the same destination after each
    /// in-neighbor, so it must be safe to call repeatedly.
    fn cond(&self, v: Vertex) -> bool;

    /// Whether edge `s -> d` activates `d`.
    ///
    /// Only called by dense traversal, where one task owns `d` for the whole
    /// step. It may be called for several active in-neighbors of the same `d`
    /// in one step and may accumulate into `d`'s state.
    fn update(&self, s: Vertex, d: Vertex) -> bool;

    /// Concurrency-safe form of [`update`](Self::update).
    ///
    /// Called by sparse traversal, where several sources may race to activate
    /// the same `d`. The implementation must resolve the race itself.
    fn update_atomic(&self, s: Vertex, d: Vertex) -> bool;
}

/// Activates each vertex the first time any edge reaches it.
///
/// `cond` is "not yet visited", and both update forms atomically mark the
/// destination visited, succeeding only for the call that marked it. Seeding
/// sources with [`visit`](Self::visit) and iterating [`edge_map`](super::edge_map)
/// yields breadth-first reachability.
pub struct FirstVisit {
    visited: AtomicBitset,
}

impl FirstVisit {
    /// Creates a mapper over `n` vertices, none visited.
    pub fn new(n: usize) -> Self {
        Self {
            visited: AtomicBitset::new(n),
        }
    }

    /// Marks `v` visited; returns `true` if it was not visited before.
    pub fn visit(&self, v: Vertex) -> bool {
        self.visited.test_and_set(v as usize, Ordering::AcqRel)
    }

    /// Returns `true` if `v` has been visited.
    pub fn is_visited(&self, v: Vertex) -> bool {
        self.visited.is_set(v as usize)
    }

    /// Number of visited vertices.
    pub fn visited_count(&self) -> usize {
        self.visited.count_ones()
    }

    /// Forgets every visit.
    pub fn reset(&self) {
        self.visited.clear_all();
    }
}

impl Mapper for FirstVisit {
    #[inline]
    fn cond(&self, v: Vertex) -> bool {
        !self.is_visited(v)
    }

    #[inline]
    fn update(&self, _s: Vertex, d: Vertex) -> bool {
        self.visit(d)
    }

    #[inline]
    fn update_atomic(&self, _s: Vertex, d: Vertex) -> bool {
        self.visit(d)
    }
}

impl<M: Mapper + ?Sized> Mapper for &M {
    #[inline]
    fn cond(&self, v: Vertex) -> bool {
        (**self).cond(v)
    }

    #[inline]
    fn update(&self, s: Vertex, d: Vertex) -> bool {
        (**self).update(s, d)
    }

    #[inline]
    fn update_atomic(&self, s: Vertex, d: Vertex) -> bool {
        (**self).update_atomic(s, d)
    }
}
