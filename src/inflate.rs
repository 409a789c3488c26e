//! Decompress raw DEFLATE streams.
//!
//! The input is a bare RFC 1951 bitstream: no zlib or gzip framing, no
//! checksums. Blocks are decoded in sequence until one carries the final
//! flag, each either stored verbatim or compressed with fixed or dynamic
//! Huffman codes. Back-references may reach into any previously emitted
//! output, including earlier blocks.

use log::trace;

use crate::bit_stream::BitReader;
use crate::errors::InflateError;
use crate::huffman::HuffmanTable;

// constant values for the DEFLATE format

const BTYPE_STORED: usize = 0b00;
const BTYPE_FIXED_HUFFMAN: usize = 0b01;
const BTYPE_DYNAMIC_HUFFMAN: usize = 0b10;

const END_OF_BLOCK: usize = 256;
const LENGTH_CODE_BASE: usize = 257;
const LENGTH_CODE_MAX: usize = 285;

/// Most literal/length code lengths a dynamic header can carry (HLIT).
const MAX_LITLEN_CODES: usize = 288;
/// Most distance code lengths a dynamic header can carry (HDIST).
const MAX_DIST_CODES: usize = 32;
/// Symbols in the code-length alphabet of a dynamic header.
const CODE_LENGTH_CODES: usize = 19;

/// Base match lengths for symbols 257..=285. Symbol 285 means length 258
/// with no extra bits.
const LENGTH_BASE: [u16; 29] = [
    3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 15, 17, 19, 23, 27, 31, 35, 43, 51, 59, 67, 83, 99, 115, 131,
    163, 195, 227, 258,
];

/// Extra bits read after each length symbol, same order as [`LENGTH_BASE`].
const LENGTH_EXTRA_BITS: [u8; 29] = [
    0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 0,
];

/// Base match distances for distance symbols 0..=29.
const DISTANCE_BASE: [u16; 30] = [
    1, 2, 3, 4, 5, 7, 9, 13, 17, 25, 33, 49, 65, 97, 129, 193, 257, 385, 513, 769, 1025, 1537,
    2049, 3073, 4097, 6145, 8193, 12289, 16385, 24577,
];

/// Extra bits read after each distance symbol, same order as
/// [`DISTANCE_BASE`].
const DISTANCE_EXTRA_BITS: [u8; 30] = [
    0, 0, 0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11, 12, 12, 13,
    13,
];

/// Order in which the code-length-code lengths are stored in a dynamic
/// header. Defined in RFC 1951, section 3.2.7.
const CODE_LENGTH_ORDER: [usize; CODE_LENGTH_CODES] = [
    16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15,
];

/// Decoder state for one stream: the bit reader, the output produced so
/// far and the optional bound on its size.
struct Inflater<'a> {
    reader: BitReader<'a>,
    output: Vec<u8>,
    limit: Option<usize>,
}

impl<'a> Inflater<'a> {
    fn new(data: &'a [u8], limit: Option<usize>) -> Self {
        Self {
            reader: BitReader::new(data),
            output: Vec::new(),
            limit,
        }
    }

    /// Decode blocks until one carries the final-block flag.
    fn run(&mut self) -> Result<(), InflateError> {
        loop {
            let bfinal = self.reader.get(1)?;
            let btype = self.reader.get(2)?;
            trace!("block: bfinal={} btype={:02b}", bfinal, btype);
            match btype {
                BTYPE_STORED => self.inflate_stored_block()?,
                BTYPE_FIXED_HUFFMAN => {
                    let lit_table = HuffmanTable::fixed_literal();
                    let dist_table = HuffmanTable::fixed_distance();
                    self.inflate_compressed_block(&lit_table, &dist_table)?;
                }
                BTYPE_DYNAMIC_HUFFMAN => {
                    let (lit_table, dist_table) = self.read_dynamic_tables()?;
                    self.inflate_compressed_block(&lit_table, &dist_table)?;
                }
                _ => return Err(InflateError::InvalidBlockType(btype as u8)),
            }
            if bfinal == 1 {
                return Ok(());
            }
        }
    }

    /// Stored block: byte-align, check LEN against its one's complement,
    /// then pass the raw bytes through.
    fn inflate_stored_block(&mut self) -> Result<(), InflateError> {
        self.reader.align_to_byte();
        let len = self.reader.read_le16()?;
        let nlen = self.reader.read_le16()?;
        if nlen != !len {
            return Err(InflateError::InvalidStoredLength);
        }
        let bytes = self.reader.read_bytes(usize::from(len))?;
        self.check_room(bytes.len())?;
        self.output.extend_from_slice(bytes);
        Ok(())
    }

    /// Read the HLIT/HDIST/HCLEN descriptor of a dynamic block and build
    /// the literal/length and distance tables from it. Defined in
    /// RFC 1951, section 3.2.7.
    fn read_dynamic_tables(&mut self) -> Result<(HuffmanTable, HuffmanTable), InflateError> {
        let hlit = self.reader.get_with_base(5, 257)?;
        let hdist = self.reader.get_with_base(5, 1)?;
        let hclen = self.reader.get_with_base(4, 4)?;
        trace!("dynamic header: hlit={} hdist={} hclen={}", hlit, hdist, hclen);

        // The first 19 slots hold the code-length-code lengths; the buffer
        // is then reused for the expanded per-symbol lengths, every one of
        // which is written below before the tables read them.
        let mut lengths = [0u8; MAX_LITLEN_CODES + MAX_DIST_CODES];
        for &slot in CODE_LENGTH_ORDER.iter().take(hclen) {
            lengths[slot] = self.reader.get(3)? as u8;
        }
        let code_length_table = HuffmanTable::build(&lengths[..CODE_LENGTH_CODES])?;

        // Run-length expand the code-length stream into HLIT + HDIST
        // per-symbol lengths.
        let mut num = 0;
        while num < hlit + hdist {
            let sym = code_length_table.decode_symbol(&mut self.reader)?;
            let (len, repeat) = match sym {
                0..=15 => (sym as u8, 1),
                16 => {
                    if num == 0 {
                        return Err(InflateError::InvalidLengthCodeRun);
                    }
                    (lengths[num - 1], self.reader.get_with_base(2, 3)?)
                }
                17 => (0, self.reader.get_with_base(3, 3)?),
                18 => (0, self.reader.get_with_base(7, 11)?),
                _ => return Err(InflateError::InvalidSymbol(sym)),
            };
            if num + repeat > hlit + hdist {
                return Err(InflateError::InvalidLengthCodeRun);
            }
            lengths[num..num + repeat].fill(len);
            num += repeat;
        }

        let lit_table = HuffmanTable::build(&lengths[..hlit])?;
        let dist_table = HuffmanTable::build(&lengths[hlit..hlit + hdist])?;
        Ok((lit_table, dist_table))
    }

    /// Decode one compressed block body: literal bytes and length/distance
    /// match copies, ended by symbol 256.
    fn inflate_compressed_block(
        &mut self,
        lit_table: &HuffmanTable,
        dist_table: &HuffmanTable,
    ) -> Result<(), InflateError> {
        loop {
            let sym = lit_table.decode_symbol(&mut self.reader)?;
            match sym {
                END_OF_BLOCK => return Ok(()),
                0..=255 => self.push_byte(sym as u8)?,
                LENGTH_CODE_BASE..=LENGTH_CODE_MAX => {
                    let k = sym - LENGTH_CODE_BASE;
                    let length = self.reader.get_with_base(
                        usize::from(LENGTH_EXTRA_BITS[k]),
                        usize::from(LENGTH_BASE[k]),
                    )?;

                    let dist_sym = dist_table.decode_symbol(&mut self.reader)?;
                    let base = *DISTANCE_BASE
                        .get(dist_sym)
                        .ok_or(InflateError::InvalidSymbol(dist_sym))?;
                    let dist = self.reader.get_with_base(
                        usize::from(DISTANCE_EXTRA_BITS[dist_sym]),
                        usize::from(base),
                    )?;

                    self.copy_match(dist, length)?;
                }
                _ => return Err(InflateError::InvalidSymbol(sym)),
            }
        }
    }

    /// Copy `length` bytes starting `dist` bytes behind the write cursor.
    ///
    /// The copy must stay byte-at-a-time and forward: when `length`
    /// exceeds `dist` each byte read was written earlier in the same copy,
    /// which is how DEFLATE expresses run-length repetition.
    fn copy_match(&mut self, dist: usize, length: usize) -> Result<(), InflateError> {
        if dist > self.output.len() {
            return Err(InflateError::InvalidDistance {
                dist,
                avail: self.output.len(),
            });
        }
        self.check_room(length)?;
        for _ in 0..length {
            let byte = self.output[self.output.len() - dist];
            self.output.push(byte);
        }
        Ok(())
    }

    fn push_byte(&mut self, byte: u8) -> Result<(), InflateError> {
        self.check_room(1)?;
        self.output.push(byte);
        Ok(())
    }

    /// Fail if appending `extra` bytes would push the output past the
    /// caller's bound.
    fn check_room(&self, extra: usize) -> Result<(), InflateError> {
        match self.limit {
            Some(limit) if self.output.len() + extra > limit => {
                Err(InflateError::DestinationOverflow { limit })
            }
            _ => Ok(()),
        }
    }
}

/// Inflate a raw DEFLATE stream into a freshly allocated vector.
///
/// The returned vector holds the decompressed bytes in stream order; its
/// length is the decompressed size.
pub fn inflate_to_vec(data: &[u8]) -> Result<Vec<u8>, InflateError> {
    let mut inflater = Inflater::new(data, None);
    inflater.run()?;
    Ok(inflater.output)
}

/// Like [`inflate_to_vec`], but fails with
/// [`InflateError::DestinationOverflow`] as soon as the output would grow
/// past `limit` bytes. Use this when the input is untrusted and a small
/// stream must not be allowed to expand without bound.
pub fn inflate_to_vec_bounded(data: &[u8], limit: usize) -> Result<Vec<u8>, InflateError> {
    let mut inflater = Inflater::new(data, Some(limit));
    inflater.run()?;
    Ok(inflater.output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stored_block() {
        let data = [0x01, 0x00, 0x00, 0xff, 0xff];
        assert_eq!(inflate_to_vec(&data).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_stored_block_passes_bytes_through() {
        let data = [0x01, 0x03, 0x00, 0xfc, 0xff, b'a', b'b', b'c'];
        assert_eq!(inflate_to_vec(&data).unwrap(), b"abc");
    }

    #[test]
    fn test_stored_block_length_check() {
        let data = [0x01, 0x03, 0x00, 0x00, 0x00, b'a', b'b', b'c'];
        assert_eq!(
            inflate_to_vec(&data),
            Err(InflateError::InvalidStoredLength)
        );
    }

    #[test]
    fn test_reserved_block_type() {
        // BFINAL = 1, BTYPE = 11.
        let data = [0b0000_0111];
        assert_eq!(inflate_to_vec(&data), Err(InflateError::InvalidBlockType(3)));
    }

    #[test]
    fn test_empty_input_is_truncated() {
        assert_eq!(inflate_to_vec(&[]), Err(InflateError::TruncatedInput));
    }

    #[test]
    fn test_fixed_block_single_literal() {
        // BFINAL = 1, BTYPE = 01, literal 'A', end of block.
        let data = [0x73, 0x04, 0x00];
        assert_eq!(inflate_to_vec(&data).unwrap(), b"A");
    }

    #[test]
    fn test_bounded_output_overflow() {
        let data = [0x01, 0x03, 0x00, 0xfc, 0xff, b'a', b'b', b'c'];
        assert_eq!(inflate_to_vec_bounded(&data, 3).unwrap(), b"abc");
        assert_eq!(
            inflate_to_vec_bounded(&data, 2),
            Err(InflateError::DestinationOverflow { limit: 2 })
        );
    }
}
