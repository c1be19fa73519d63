//! Counter drives a line stream through the address encoder into a `Tracker`.
//!
//! Input is consumed in a single pass through a reused line buffer, so working
//! memory stays bounded by the longest line no matter how large the file is.
//! Empty lines (including the usual trailing one) are skipped. Lines which fail
//! to parse are handed to the configured `LinePolicy`.

use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use enum_dispatch::enum_dispatch;
use log::{debug, info, trace, warn};

use crate::error::{Error, FormatError, Result};
use crate::ipv4;
use crate::tracker::Tracker;

/// Policies supported for lines that are not valid IPv4 addresses
#[derive(Debug, Clone, PartialEq, Eq)]
#[enum_dispatch]
pub enum LinePolicy {
    Strict(Strict),
    Lenient(Lenient),
}

/// Line policy trait which must be implemented by all policies.
#[enum_dispatch(LinePolicy)]
pub trait LinePolicyTrait {
    /// Decide what happens to invalid line number `line`.
    /// Returning an error aborts the run.
    fn reject(&mut self, line: u64, content: &[u8], err: FormatError) -> Result<()>;
}

/// Abort on the first invalid line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Strict;

/// Log invalid lines and carry on
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lenient;

impl LinePolicyTrait for Strict {
    fn reject(&mut self, line: u64, _content: &[u8], err: FormatError) -> Result<()> {
        Err(Error::Format { line, source: err })
    }
}

impl LinePolicyTrait for Lenient {
    fn reject(&mut self, line: u64, content: &[u8], err: FormatError) -> Result<()> {
        warn!(
            "skipping line {} {:?}: {}",
            line,
            String::from_utf8_lossy(content),
            err
        );
        Ok(())
    }
}

impl Default for LinePolicy {
    fn default() -> Self {
        Strict.into()
    }
}

/// Outcome of a counting run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "with_serde", derive(serde::Serialize))]
pub struct Summary {
    /// Number of distinct addresses
    pub unique: u64,
    /// Number of lines read
    pub lines: u64,
    /// Number of empty lines skipped
    pub empty: u64,
    /// Number of invalid lines skipped
    pub invalid: u64,
}

impl Display for Summary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "RESULT: {} ipv4 found", self.unique)
    }
}

pub struct Counter {
    tracker: Tracker,
    policy: LinePolicy,
    lines: u64,
    empty: u64,
    invalid: u64,
}

impl Counter {
    /// Creates new `Counter` with an empty tracker
    pub fn new(policy: LinePolicy) -> Result<Self> {
        Ok(Self {
            tracker: Tracker::new()?,
            policy,
            lines: 0,
            empty: 0,
            invalid: 0,
        })
    }

    /// Process one line, without its trailing `\n`
    pub fn push_line(&mut self, line: &[u8]) -> Result<()> {
        self.lines += 1;
        if line.strip_suffix(b"\r").unwrap_or(line).is_empty() {
            debug!("skipping empty line {}", self.lines);
            self.empty += 1;
            return Ok(());
        }

        match ipv4::parse_bytes(line) {
            Ok(key) => {
                trace!("{} to {}", ipv4::to_addr(key), key);
                self.tracker.record(key);
            }
            Err(err) => {
                self.policy.reject(self.lines, line, err)?;
                self.invalid += 1;
            }
        }
        Ok(())
    }

    /// Process every remaining line of `reader`
    ///
    /// Read failures are reported as `Error::Read`.
    pub fn read<R: BufRead>(&mut self, mut reader: R) -> Result<()> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).map_err(Error::Read)? == 0 {
                return Ok(());
            }
            let line = buf.strip_suffix(b"\n").unwrap_or(&buf);
            self.push_line(line)?;
        }
    }

    /// Return the tracker holding recorded addresses
    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    /// Return summary of lines processed so far
    pub fn summary(&self) -> Summary {
        Summary {
            unique: self.tracker.count(),
            lines: self.lines,
            empty: self.empty,
            invalid: self.invalid,
        }
    }
}

/// Count distinct addresses in `reader`
pub fn count_reader<R: BufRead>(reader: R, policy: LinePolicy) -> Result<Summary> {
    let mut counter = Counter::new(policy)?;
    counter.read(reader)?;
    Ok(counter.summary())
}

/// Count distinct addresses in the file at `path`
pub fn count_file<P: AsRef<Path>>(path: P, policy: LinePolicy) -> Result<Summary> {
    let path = path.as_ref();
    let io_err = |source: std::io::Error| Error::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_err)?;
    info!("counting addresses in {} with {:?}", path.display(), policy);

    let summary = count_reader(BufReader::new(file), policy).map_err(|e| match e {
        Error::Read(source) => io_err(source),
        e => e,
    })?;
    info!(
        "{} lines read, {} empty, {} invalid, {} unique",
        summary.lines, summary.empty, summary.invalid, summary.unique
    );

    Ok(summary)
}
