//! Canonical Huffman tables for the DEFLATE alphabets.
//!
//! A table is stored as the number of codes per bit length plus the
//! symbols sorted by (code length, symbol value). That is all a canonical
//! code needs: decoding walks the implicit tree level by level, where at
//! depth `len` the first `counts[len]` positions are leaves and everything
//! after them continues down.

use crate::bit_stream::BitReader;
use crate::errors::InflateError;

/// Codes are at most 15 bits long in DEFLATE.
const MAX_CODE_LENGTH: usize = 15;

/// The literal/length alphabet is the largest one, with 288 symbols.
const MAX_SYMBOLS: usize = 288;

/// A canonical Huffman code over one alphabet.
#[derive(Debug, Clone)]
pub struct HuffmanTable {
    /// Number of codes of each bit length; index 0 is unused by decode.
    counts: [u16; MAX_CODE_LENGTH + 1],
    /// Symbols in canonical code order.
    symbols: [u16; MAX_SYMBOLS],
    /// Largest symbol with a nonzero code length, `None` for an empty
    /// alphabet. Decoded symbols above this bound are invalid.
    max_sym: Option<u16>,
}

impl HuffmanTable {
    fn empty() -> Self {
        Self {
            counts: [0; MAX_CODE_LENGTH + 1],
            symbols: [0; MAX_SYMBOLS],
            max_sym: None,
        }
    }

    /// Build a table from per-symbol code lengths, zero meaning the symbol
    /// is unused.
    ///
    /// The lengths are validated against Kraft's inequality: a level of
    /// the tree holding more codes than it has slots is oversubscribed,
    /// and leftover slots with more than one code present make the code
    /// incomplete. A single lone code is allowed; it gets a synthetic
    /// sibling mapping to an out-of-range symbol so the decode walk always
    /// terminates.
    pub fn build(lengths: &[u8]) -> Result<Self, InflateError> {
        debug_assert!(lengths.len() <= MAX_SYMBOLS);
        let mut table = Self::empty();

        for (sym, &len) in lengths.iter().enumerate() {
            if len != 0 {
                table.counts[usize::from(len)] += 1;
                table.max_sym = Some(sym as u16);
            }
        }

        // Offsets into the symbol array for each code length, tracking the
        // remaining code slots per level of the tree.
        let mut offs = [0u16; MAX_CODE_LENGTH + 1];
        let mut num_codes = 0u16;
        let mut available = 1i32;
        for (len, &used) in table.counts.iter().enumerate() {
            available = 2 * (available - i32::from(used));
            if available < 0 {
                return Err(InflateError::OversubscribedCode);
            }
            offs[len] = num_codes;
            num_codes += used;
        }
        if available > 0 && num_codes > 1 {
            return Err(InflateError::IncompleteCode);
        }

        for (sym, &len) in lengths.iter().enumerate() {
            if len != 0 {
                let len = usize::from(len);
                table.symbols[usize::from(offs[len])] = sym as u16;
                offs[len] += 1;
            }
        }

        // A lone code leaves the decode walk with only one child to take;
        // synthesize the sibling as a symbol one past the valid range.
        if num_codes == 1 {
            if let Some(max_sym) = table.max_sym {
                table.counts[1] = 2;
                table.symbols[1] = max_sym + 1;
            }
        }

        Ok(table)
    }

    /// The fixed literal/length code of RFC 1951, section 3.2.6.
    ///
    /// Symbols 286 and 287 take part in the code but are reserved, so the
    /// valid range still ends at 285.
    pub fn fixed_literal() -> Self {
        let mut table = Self::empty();
        table.counts[7] = 24;
        table.counts[8] = 152;
        table.counts[9] = 112;
        let canonical = (256u16..280).chain(0..144).chain(280..288).chain(144..256);
        for (i, sym) in canonical.enumerate() {
            table.symbols[i] = sym;
        }
        table.max_sym = Some(285);
        table
    }

    /// The fixed distance code of RFC 1951, section 3.2.6: all 32 symbols
    /// at five bits, of which only 0..=29 are assigned meanings.
    pub fn fixed_distance() -> Self {
        let mut table = Self::empty();
        table.counts[5] = 32;
        for (i, slot) in table.symbols.iter_mut().take(32).enumerate() {
            *slot = i as u16;
        }
        table.max_sym = Some(29);
        table
    }

    /// Decode one symbol from the reader, pulling code bits most
    /// significant first.
    ///
    /// The walk tracks the position of the partial code within the
    /// canonical ordering rather than the code itself: at each length,
    /// codes below `counts[len]` are leaves and map straight into the
    /// symbol array, everything else shifts down a level.
    pub fn decode_symbol(&self, reader: &mut BitReader) -> Result<usize, InflateError> {
        let mut base = 0usize;
        let mut offs = 0usize;
        for &count in &self.counts[1..] {
            offs = 2 * offs + reader.get(1)?;
            let count = usize::from(count);
            if offs < count {
                let sym = self.symbols[base + offs];
                // The synthetic sibling of a lone code lands here, as do
                // the reserved fixed-code symbols 286 and 287.
                return match self.max_sym {
                    Some(max_sym) if sym <= max_sym => Ok(usize::from(sym)),
                    _ => Err(InflateError::InvalidSymbol(usize::from(sym))),
                };
            }
            base += count;
            offs -= count;
        }
        // Only an alphabet with no codes at all runs off the last level.
        Err(InflateError::InvalidSymbol(base + offs))
    }
}
