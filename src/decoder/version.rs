/// Version information extraction for QR codes v7+
use log::trace;

use crate::decoder::tables::VERSION_CODEWORDS;
use crate::error::{Result, ScanError};
use crate::models::{ParsedSymbol, SymbolVersion};

/// Version info is 18 bits (6 data + 12 ECC) for versions 7-40
#[derive(Debug, Clone, Copy)]
pub struct VersionInfoDecoder {
    max_distance: u32,
}

impl Default for VersionInfoDecoder {
    fn default() -> Self {
        Self { max_distance: 3 }
    }
}

impl VersionInfoDecoder {
    /// Read the encoded version, trying the block beside the top-right finder first
    pub fn decode(&self, symbol: &ParsedSymbol) -> Result<SymbolVersion> {
        if symbol.size() < SymbolVersion::new(7)?.size() {
            return Err(ScanError::VersionInfoUnrecoverable);
        }
        [read_top_right(symbol), read_bottom_left(symbol)]
            .into_iter()
            .find_map(|bits| self.decode_bits(bits))
            .ok_or(ScanError::VersionInfoUnrecoverable)
    }

    /// Match an 18-bit word against the 34 valid version codewords
    pub fn decode_bits(&self, bits: u32) -> Option<SymbolVersion> {
        let (index, distance) = VERSION_CODEWORDS
            .iter()
            .enumerate()
            .map(|(i, &codeword)| (i, (codeword ^ bits).count_ones()))
            .min_by_key(|&(_, distance)| distance)?;
        trace!("version word 0x{bits:05X}: nearest v{} at distance {distance}", index + 7);
        if distance > self.max_distance {
            return None;
        }
        SymbolVersion::new(index as i32 + 7).ok()
    }
}

/// Block above the top-right finder: bit i at column size-11+i%3, row i/3
pub fn read_top_right(symbol: &ParsedSymbol) -> u32 {
    let size = symbol.size();
    (0..18).fold(0u32, |bits, i| {
        bits | ((symbol.is_dark(size - 11 + i % 3, i / 3) as u32) << i)
    })
}

/// Block left of the bottom-left finder: bit i at column i/3, row size-11+i%3
pub fn read_bottom_left(symbol: &ParsedSymbol) -> u32 {
    let size = symbol.size();
    (0..18).fold(0u32, |bits, i| {
        bits | ((symbol.is_dark(i / 3, size - 11 + i % 3) as u32) << i)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DARK, LIGHT};

    fn symbol_with_version_blocks(top_right: u32, bottom_left: u32, version: u8) -> ParsedSymbol {
        let version = SymbolVersion::new(version as i32).unwrap();
        let size = version.size();
        let mut modules = vec![LIGHT; size * size];
        for i in 0..18 {
            if (top_right >> i) & 1 == 1 {
                modules[(i / 3) * size + size - 11 + i % 3] = DARK;
            }
            if (bottom_left >> i) & 1 == 1 {
                modules[(size - 11 + i % 3) * size + i / 3] = DARK;
            }
        }
        ParsedSymbol::new(version, modules).unwrap()
    }

    #[test]
    fn test_decode_bits() {
        let decoder = VersionInfoDecoder::default();
        for (i, &codeword) in VERSION_CODEWORDS.iter().enumerate() {
            let expected = i as u8 + 7;
            assert_eq!(decoder.decode_bits(codeword).map(|v| v.number()), Some(expected));
            assert_eq!(
                decoder.decode_bits(codeword ^ 0b1000_0100_0000_0001).map(|v| v.number()),
                Some(expected)
            );
        }
        assert_eq!(decoder.decode_bits(0), None);
    }

    #[test]
    fn test_decode_from_symbol() {
        let v7 = VERSION_CODEWORDS[0];
        let symbol = symbol_with_version_blocks(v7, v7, 7);
        assert_eq!(read_top_right(&symbol), v7);
        assert_eq!(read_bottom_left(&symbol), v7);
        assert_eq!(VersionInfoDecoder::default().decode(&symbol).unwrap().number(), 7);

        // Corrupt top-right beyond repair; the bottom-left copy still reads.
        let v12 = VERSION_CODEWORDS[5];
        let symbol = symbol_with_version_blocks(v12 ^ 0x3FFFF, v12, 7);
        assert_eq!(VersionInfoDecoder::default().decode(&symbol).unwrap().number(), 12);
    }

    #[test]
    fn test_small_symbols_have_no_version_info() {
        let version = SymbolVersion::new(6).unwrap();
        let symbol = ParsedSymbol::new(version, vec![LIGHT; version.size().pow(2)]).unwrap();
        assert_eq!(
            VersionInfoDecoder::default().decode(&symbol),
            Err(ScanError::VersionInfoUnrecoverable)
        );
    }
}
