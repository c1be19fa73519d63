use std::path::PathBuf;

use thiserror::Error;

/// Reasons a line cannot be encoded as an IPv4 address key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("expected 4 dot-separated octets, found {0}")]
    OctetCount(usize),

    #[error("octet {0:?} is not a decimal number")]
    InvalidOctet(String),

    #[error("octet {0} is out of range [0, 255]")]
    OctetOutOfRange(u64),
}

/// Errors surfaced while counting addresses.
#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("read failed: {0}")]
    Read(#[source] std::io::Error),

    #[error("line {line}: {source}")]
    Format {
        line: u64,
        #[source]
        source: FormatError,
    },

    #[error("cannot allocate {0} bytes for the presence bitmap")]
    Allocation(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
