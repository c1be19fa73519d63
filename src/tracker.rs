//! Tracker records which IPv4 address keys were seen and counts them exactly.
//!
//! # Data-structure design rationale
//!
//! A hash set of up to 2^32 keys costs tens of bytes per entry once load factor
//! and control bytes are included, so billions of distinct addresses need tens of
//! gigabytes. The tracker instead spends exactly one bit per possible key:
//! - 2^32 bits = 512 MiB, fixed, no matter how many distinct keys appear
//! - `record` and `contains` are O(1) shift/mask operations
//! - `count` is O(1), the number of distinct keys is kept up to date on insert
//!
//! # Data storage format
//! The key space is split into three parts:
//! - key `0`                         - stored in the `zero` flag
//! - keys `1..=2^31 - 1` (low range)  - stored in `low` at index `key`
//! - keys `2^31..=2^32 - 1` (high range) - stored in `high` at index `key - 2^31`
//!
//! Bit 0 of `low` is never used.

use std::fmt::{Debug, Formatter};
use std::mem::size_of;

use crate::bitmap::Bitmap;
use crate::error::Result;

/// Largest key stored in the low range
const LOW_MAX: u32 = i32::MAX as u32;
/// Smallest key stored in the high range
const HIGH_MIN: u32 = LOW_MAX + 1;
/// Number of bits in each half of the presence store
const HALF_LEN: usize = 1 << 31;

pub struct Tracker {
    /// Presence bits of the low range
    low: Bitmap,
    /// Presence bits of the high range
    high: Bitmap,
    /// Whether key `0` (address `0.0.0.0`) was seen
    zero: bool,
    /// Number of distinct keys recorded
    distinct: u64,
}

impl Tracker {
    /// Creates new empty `Tracker`, allocating the whole presence store up front.
    ///
    /// Fails with `Error::Allocation` if the host cannot provide 512 MiB.
    pub fn new() -> Result<Self> {
        let low = Bitmap::new(HALF_LEN)?;
        let high = Bitmap::new(HALF_LEN)?;
        Ok(Self {
            low,
            high,
            zero: false,
            distinct: 0,
        })
    }

    /// Record `key` as seen. Returns true if it was not seen before.
    #[inline]
    pub fn record(&mut self, key: u32) -> bool {
        let inserted = match key {
            0 => !std::mem::replace(&mut self.zero, true),
            1..=LOW_MAX => self.low.set(key as usize),
            _ => self.high.set((key - HIGH_MIN) as usize),
        };
        self.distinct += u64::from(inserted);
        inserted
    }

    /// Return whether `key` was recorded
    #[inline]
    pub fn contains(&self, key: u32) -> bool {
        match key {
            0 => self.zero,
            1..=LOW_MAX => self.low.get(key as usize),
            _ => self.high.get((key - HIGH_MIN) as usize),
        }
    }

    /// Return number of distinct keys recorded
    #[inline]
    pub fn count(&self) -> u64 {
        self.distinct
    }

    /// Merge keys recorded by `rhs` into `self`
    pub fn merge(&mut self, rhs: &Tracker) {
        self.low.union(&rhs.low);
        self.high.union(&rhs.high);
        self.zero |= rhs.zero;
        self.distinct = self.popcount();
    }

    /// Return memory size of `Tracker`
    pub fn size_of(&self) -> usize {
        size_of::<Self>() + self.low.size_of() + self.high.size_of()
    }

    /// Count distinct keys by scanning the whole presence store
    fn popcount(&self) -> u64 {
        self.low.count_ones() + self.high.count_ones() + u64::from(self.zero)
    }
}

impl Debug for Tracker {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{ count: {}, size: {} }}", self.count(), self.size_of())
    }
}
