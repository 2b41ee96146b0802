//! Lock-free primitives shared by traversal state.
//!
//! Mappers use these to resolve activation races: several sources may try to
//! activate the same destination at once, and exactly one must win.

pub mod bitset;

pub use bitset::AtomicBitset;
