//! A module that provides a struct to read bits from a byte array.
//!
//! DEFLATE packs bits least-significant-first within each byte (RFC 1951,
//! section 3.1.1). Huffman codes are packed starting from their most
//! significant bit, so callers decode them by pulling one bit at a time.

use crate::errors::InflateError;

/// Largest number of bits a single demand may ask for. Keeps the refill
/// loop within the 32-bit accumulator even with 7 bits already buffered.
const MAX_REFILL_BITS: usize = 24;

/// A struct that reads bits from a byte array.
///
/// Bits not yet consumed are buffered in `bitbuf`, starting at the least
/// significant bit. Refilling shifts whole bytes in above the buffered
/// bits, so `bitcount` stays in `0..32`.
#[derive(Debug)]
pub struct BitReader<'a> {
    source: &'a [u8],
    position: usize,
    bitbuf: u32,
    bitcount: usize,
}

impl<'a> BitReader<'a> {
    /// Create a new BitReader over the given byte array.
    pub fn new(source: &'a [u8]) -> Self {
        Self {
            source,
            position: 0,
            bitbuf: 0,
            bitcount: 0,
        }
    }

    /// Pull whole bytes from the source until at least `n` bits are
    /// buffered.
    fn refill(&mut self, n: usize) -> Result<(), InflateError> {
        debug_assert!(n <= MAX_REFILL_BITS);
        while self.bitcount < n {
            let byte = *self
                .source
                .get(self.position)
                .ok_or(InflateError::TruncatedInput)?;
            self.position += 1;
            self.bitbuf |= u32::from(byte) << self.bitcount;
            self.bitcount += 8;
        }
        Ok(())
    }

    /// Return the low `n` buffered bits and drop them from the buffer.
    fn consume(&mut self, n: usize) -> usize {
        debug_assert!(n <= self.bitcount);
        let bits = (self.bitbuf & ((1u32 << n) - 1)) as usize;
        self.bitbuf >>= n;
        self.bitcount -= n;
        bits
    }

    /// Read the next `n` bits from the stream. `n` may be zero.
    pub fn get(&mut self, n: usize) -> Result<usize, InflateError> {
        self.refill(n)?;
        Ok(self.consume(n))
    }

    /// Read `n` extra bits and add them to `base`. A zero-bit read does
    /// not touch the stream.
    pub fn get_with_base(&mut self, n: usize, base: usize) -> Result<usize, InflateError> {
        if n > 0 {
            Ok(base + self.get(n)?)
        } else {
            Ok(base)
        }
    }

    /// Discard the buffered bits so the next read starts on a byte
    /// boundary. The buffer never holds a whole byte between reads, so
    /// this drops at most the 7-bit remainder of the current byte.
    pub fn align_to_byte(&mut self) {
        self.bitbuf = 0;
        self.bitcount = 0;
    }

    /// Read a little-endian 16-bit value. Only meaningful on a byte
    /// boundary.
    pub fn read_le16(&mut self) -> Result<u16, InflateError> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from(bytes[0]) | u16::from(bytes[1]) << 8)
    }

    /// Borrow the next `n` raw bytes of the source. Only meaningful on a
    /// byte boundary.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], InflateError> {
        debug_assert_eq!(self.bitcount, 0);
        let end = self
            .position
            .checked_add(n)
            .ok_or(InflateError::TruncatedInput)?;
        let bytes = self
            .source
            .get(self.position..end)
            .ok_or(InflateError::TruncatedInput)?;
        self.position = end;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_come_out_lsb_first() {
        let data = [0b1010_1100, 0b0101_0101];
        let mut reader = BitReader::new(&data);
        assert_eq!(reader.get(4).unwrap(), 0b1100);
        assert_eq!(reader.get(4).unwrap(), 0b1010);
        assert_eq!(reader.get(8).unwrap(), 0b0101_0101);
    }

    #[test]
    fn test_reads_across_byte_boundaries() {
        let data = [0b1010_1100, 0b0101_0101];
        let mut reader = BitReader::new(&data);
        assert_eq!(reader.get(12).unwrap(), 0b0101_1010_1100);
    }

    #[test]
    fn test_zero_bit_read_returns_zero() {
        let mut reader = BitReader::new(&[0xff]);
        assert_eq!(reader.get(0).unwrap(), 0);
        assert_eq!(reader.get(8).unwrap(), 0xff);
    }

    #[test]
    fn test_get_with_base_skips_stream_for_zero_bits() {
        let mut reader = BitReader::new(&[0b0000_0011]);
        assert_eq!(reader.get_with_base(0, 11).unwrap(), 11);
        assert_eq!(reader.get_with_base(2, 3).unwrap(), 6);
    }

    #[test]
    fn test_align_discards_partial_byte() {
        let data = [0b0000_0001, 0xab];
        let mut reader = BitReader::new(&data);
        assert_eq!(reader.get(3).unwrap(), 0b001);
        reader.align_to_byte();
        assert_eq!(reader.get(8).unwrap(), 0xab);
    }

    #[test]
    fn test_read_le16() {
        let mut reader = BitReader::new(&[0x0d, 0x00, 0xf2, 0xff]);
        assert_eq!(reader.read_le16().unwrap(), 13);
        assert_eq!(reader.read_le16().unwrap(), !13u16);
    }

    #[test]
    fn test_read_bytes_returns_source_slice() {
        let data = [1, 2, 3, 4];
        let mut reader = BitReader::new(&data);
        assert_eq!(reader.read_bytes(3).unwrap(), &[1, 2, 3]);
        assert_eq!(reader.read_bytes(1).unwrap(), &[4]);
    }

    #[test]
    fn test_reading_past_the_end_is_an_error() {
        let mut reader = BitReader::new(&[0xff]);
        assert_eq!(reader.get(8).unwrap(), 0xff);
        assert_eq!(reader.get(1), Err(InflateError::TruncatedInput));
    }

    #[test]
    fn test_read_bytes_past_the_end_is_an_error() {
        let mut reader = BitReader::new(&[1, 2]);
        assert_eq!(reader.read_bytes(3), Err(InflateError::TruncatedInput));
    }
}
