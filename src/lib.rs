//! `unique-ipv4-counter` counts distinct IPv4 addresses in a stream of dotted-quad lines exactly.
//!
//! Presence of every possible address is tracked in a fixed 512 MiB bitmap, one bit per
//! address, instead of a hash set whose footprint grows with every distinct entry.
mod bitmap;
pub mod counter;
pub mod error;
pub mod ipv4;
pub mod tracker;

pub use counter::{
    count_file, count_reader, Counter, Lenient, LinePolicy, LinePolicyTrait, Strict, Summary,
};
pub use error::{Error, FormatError, Result};
pub use tracker::Tracker;
