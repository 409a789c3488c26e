//! Error types reported when a DEFLATE stream fails to decode.

use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// Reasons a decode can fail.
///
/// Any of these aborts the decode immediately; no partial output is
/// returned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InflateError {
    /// The bit reader ran past the end of the input.
    TruncatedInput,
    /// A block header carried the reserved block type 3.
    InvalidBlockType(u8),
    /// A stored block whose NLEN field is not the one's complement of LEN.
    InvalidStoredLength,
    /// A set of code lengths that oversubscribes the Huffman tree
    /// (Kraft sum above one).
    OversubscribedCode,
    /// A set of code lengths that leaves the Huffman tree incomplete while
    /// holding more than one code (Kraft sum below one).
    IncompleteCode,
    /// A decoded symbol outside its alphabet.
    InvalidSymbol(usize),
    /// A back-reference reaching further back than the output produced so
    /// far.
    InvalidDistance { dist: usize, avail: usize },
    /// Output would grow past the caller-supplied bound.
    DestinationOverflow { limit: usize },
    /// A code-length run that copies a previous length when there is none,
    /// or overruns the table it describes.
    InvalidLengthCodeRun,
}

impl Display for InflateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::TruncatedInput => write!(f, "input ended in the middle of the stream"),
            Self::InvalidBlockType(btype) => write!(f, "reserved block type {btype}"),
            Self::InvalidStoredLength => {
                write!(f, "stored block length check failed (NLEN != !LEN)")
            }
            Self::OversubscribedCode => write!(f, "oversubscribed Huffman code lengths"),
            Self::IncompleteCode => write!(f, "incomplete Huffman code lengths"),
            Self::InvalidSymbol(sym) => write!(f, "invalid symbol {sym}"),
            Self::InvalidDistance { dist, avail } => write!(
                f,
                "match distance {dist} exceeds the {avail} bytes written so far"
            ),
            Self::DestinationOverflow { limit } => {
                write!(f, "output exceeds the {limit} byte limit")
            }
            Self::InvalidLengthCodeRun => write!(f, "invalid code-length run"),
        }
    }
}

impl Error for InflateError {}
