//! # Raw DEFLATE decompression
//! A small, self-contained decompressor for raw DEFLATE streams as defined
//! in RFC 1951. It consumes a bare bitstream with no zlib or gzip framing
//! and produces the original bytes, covering stored, fixed-Huffman and
//! dynamic-Huffman blocks, including overlapping back-references and the
//! degenerate single-code alphabets the format permits.
//! Malformed input is reported through a typed [`InflateError`] rather
//! than trusted; there is no compression side and no streaming interface.

pub mod bit_stream;

pub mod errors;

pub mod huffman;

pub mod inflate;

pub use crate::errors::InflateError;
pub use crate::inflate::{inflate_to_vec, inflate_to_vec_bounded};
