//! ## Dense bitmap
//! Fixed-length packed bit vector backing each half of the presence store.
//!
//! Storage layout:
//! - words[i]      - stores bits `64 * i .. 64 * i + 63`, least significant bit first
//!
//! The vector never grows. Its storage is requested zeroed from the allocator in
//! one piece, so untouched pages stay unbacked until a bit in them is set.

use std::alloc::{self, Layout};
use std::mem::{size_of, size_of_val};
use std::slice;

use crate::error::{Error, Result};

/// Number of bits held by a single storage word
const WORD_BITS: usize = u64::BITS as usize;

pub(crate) struct Bitmap {
    /// Packed bits
    words: Box<[u64]>,
    /// Number of addressable bits
    len: usize,
}

impl Bitmap {
    /// Create new zeroed bitmap holding `len` bits.
    ///
    /// Fails with `Error::Allocation` when the allocator cannot provide the memory.
    pub(crate) fn new(len: usize) -> Result<Self> {
        let n = len.div_ceil(WORD_BITS);
        let bytes = n.saturating_mul(size_of::<u64>());
        let layout = Layout::array::<u64>(n).map_err(|_| Error::Allocation(bytes))?;
        if layout.size() == 0 {
            return Ok(Self {
                words: Box::default(),
                len,
            });
        }

        // SAFETY: `layout` has non-zero size.
        let ptr = unsafe { alloc::alloc_zeroed(layout) } as *mut u64;
        if ptr.is_null() {
            return Err(Error::Allocation(bytes));
        }
        // SAFETY: `ptr` points to `n` zero-initialized `u64` values allocated by the global
        // allocator with the layout `Box<[u64]>` expects for `n` elements.
        let words = unsafe { Box::from_raw(slice::from_raw_parts_mut(ptr, n)) };
        log::debug!("allocated {} bytes for {} bits", bytes, len);

        Ok(Self { words, len })
    }

    /// Set bit `idx`. Returns true if it was previously unset.
    #[inline]
    pub(crate) fn set(&mut self, idx: usize) -> bool {
        debug_assert!(idx < self.len);
        let mask = 1u64 << (idx % WORD_BITS);
        let word = &mut self.words[idx / WORD_BITS];
        let unset = *word & mask == 0;
        *word |= mask;
        unset
    }

    /// Return whether bit `idx` is set
    #[inline]
    pub(crate) fn get(&self, idx: usize) -> bool {
        debug_assert!(idx < self.len);
        self.words[idx / WORD_BITS] & (1u64 << (idx % WORD_BITS)) != 0
    }

    /// Return number of set bits
    pub(crate) fn count_ones(&self) -> u64 {
        self.words.iter().map(|w| u64::from(w.count_ones())).sum()
    }

    /// Set every bit that is set in `rhs`
    pub(crate) fn union(&mut self, rhs: &Bitmap) {
        debug_assert_eq!(self.len, rhs.len);
        // only touch words that change, keeping untouched pages unbacked
        self.words
            .iter_mut()
            .zip(rhs.words.iter())
            .filter(|(_, r)| **r != 0)
            .for_each(|(l, r)| *l |= *r);
    }

    /// Return memory size of bitmap storage
    #[inline]
    pub(crate) fn size_of(&self) -> usize {
        size_of_val(&*self.words)
    }
}
