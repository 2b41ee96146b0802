//! Parallel sequence primitives the edge map needs beyond what rayon provides.
//!
//! rayon covers map, filter, count and ordered collection. Two pieces are
//! missing and live here:
//! - [`scan_exclusive`]: a blocked two-pass parallel prefix sum
//! - [`SlotWriter`]: shared write access to a buffer whose slots are each
//!   owned by exactly one task

use core::marker::PhantomData;

use rayon::prelude::*;

/// Elements per block in [`scan_exclusive`]. Inputs at or below this size are
/// scanned sequentially.
pub const SCAN_BLOCK: usize = 2048;

/// Replaces `values` by its exclusive prefix sum and returns the total.
///
/// After the call `values[i]` holds the sum of the original `values[..i]`.
///
/// **Time complexity**: \(O(n)\) work, \(O(n / p + n / \text{SCAN\_BLOCK})\) span
pub fn scan_exclusive(values: &mut [usize]) -> usize {
    if values.len() <= SCAN_BLOCK {
        return scan_block(values, 0);
    }

    // Pass 1: per-block totals.
    let block_sums: Vec<usize> = values
        .par_chunks(SCAN_BLOCK)
        .map(|chunk| chunk.iter().sum())
        .collect();

    // Block bases, sequentially; there are only n / SCAN_BLOCK of them.
    let mut bases = block_sums;
    let total = scan_block(&mut bases, 0);

    // Pass 2: scan each block from its base.
    values
        .par_chunks_mut(SCAN_BLOCK)
        .zip(bases.par_iter())
        .for_each(|(chunk, &base)| {
            scan_block(chunk, base);
        });

    total
}

#[inline]
fn scan_block(values: &mut [usize], base: usize) -> usize {
    let mut acc = base;
    for x in values {
        let v = *x;
        *x = acc;
        acc += v;
    }
    acc
}

/// Shared, unsynchronized write access to a mutable slice.
///
/// Used when a prefix sum has already partitioned a buffer so that every slot
/// has exactly one writer. The writer mutably borrows the slice for `'a`, so
/// the buffer cannot be read until every task holding the writer has finished.
pub struct SlotWriter<'a, T> {
    ptr: *mut T,
    len: usize,
    _slice: PhantomData<&'a mut [T]>,
}

// SAFETY: the writer only hands out disjoint slot writes (see `write`), and
// `T: Send` lets values move into slots from other threads.
unsafe impl<T: Send> Send for SlotWriter<'_, T> {}
// SAFETY: as above; concurrent `write` calls never target the same slot.
unsafe impl<T: Send> Sync for SlotWriter<'_, T> {}

impl<'a, T: Copy> SlotWriter<'a, T> {
    /// Wraps `slice` for disjoint parallel writes.
    pub fn new(slice: &'a mut [T]) -> Self {
        Self {
            ptr: slice.as_mut_ptr(),
            len: slice.len(),
            _slice: PhantomData,
        }
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if there are no slots.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Writes `value` into slot `index`.
    ///
    /// # Panics
    /// Panics if `index >= len()`.
    ///
    /// # Safety
    /// No other call may write `index` concurrently.
    #[inline]
    pub unsafe fn write(&self, index: usize, value: T) {
        assert!(index < self.len, "slot {index} out of bounds for {}", self.len);
        // SAFETY: index is in bounds, and the caller guarantees no aliasing write.
        unsafe { self.ptr.add(index).write(value) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_small_input() {
        let mut v = vec![3, 0, 2, 5];
        let total = scan_exclusive(&mut v);
        assert_eq!(v, vec![0, 3, 3, 5]);
        assert_eq!(total, 10);
    }

    #[test]
    fn scan_empty_input() {
        let mut v: Vec<usize> = Vec::new();
        assert_eq!(scan_exclusive(&mut v), 0);
        assert!(v.is_empty());
    }

    #[test]
    fn scan_spans_several_blocks() {
        let n = SCAN_BLOCK * 3 + 17;
        let original: Vec<usize> = (0..n).map(|i| i % 7).collect();
        let mut v = original.clone();
        let total = scan_exclusive(&mut v);

        let mut acc = 0;
        for (i, &x) in original.iter().enumerate() {
            assert_eq!(v[i], acc, "mismatch at {i}");
            acc += x;
        }
        assert_eq!(total, acc);
    }

    #[test]
    fn slot_writer_disjoint_parallel_writes() {
        let mut buf = vec![0u32; 1000];
        {
            let w = SlotWriter::new(&mut buf);
            assert_eq!(w.len(), 1000);
            assert!(!w.is_empty());
            (0..1000usize).into_par_iter().for_each(|i| {
                // SAFETY: each index is written by exactly one iteration.
                unsafe { w.write(i, i as u32 * 2) };
            });
        }
        assert!(buf.iter().enumerate().all(|(i, &x)| x == i as u32 * 2));
    }

    #[test]
    fn slot_writer_over_empty_slice() {
        let mut buf: Vec<u32> = Vec::new();
        let w = SlotWriter::new(&mut buf);
        assert!(w.is_empty());
        assert_eq!(w.len(), 0);
    }
}
