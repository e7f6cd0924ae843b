/// Format information extraction from QR code
use log::{debug, trace};

use crate::decoder::tables::{FORMAT_CODEWORDS, FORMAT_MASK};
use crate::error::{Result, ScanError};
use crate::models::{FormatInfo, ParsedSymbol};

/// Reads the two 15-bit format copies and corrects them against the BCH(15,5) code
#[derive(Debug, Clone, Copy)]
pub struct FormatInfoDecoder {
    max_distance: u32,
}

impl Default for FormatInfoDecoder {
    fn default() -> Self {
        Self::new(3)
    }
}

impl FormatInfoDecoder {
    /// Decoder accepting matches up to `max_distance` flipped bits
    pub fn new(max_distance: u32) -> Self {
        Self { max_distance }
    }

    /// Recover EC level and mask, trying the copy around the top-left finder first
    pub fn decode(&self, symbol: &ParsedSymbol) -> Result<FormatInfo> {
        let main = read_main(symbol);
        if let Some(info) = self.decode_bits(main) {
            return Ok(info);
        }
        let secondary = read_secondary(symbol);
        debug!("main format copy 0b{main:015b} unreadable, trying secondary 0b{secondary:015b}");
        self.decode_bits(secondary)
            .ok_or(ScanError::FormatInfoUnrecoverable)
    }

    /// Decode a raw (still masked) 15-bit format word
    pub fn decode_bits(&self, raw: u16) -> Option<FormatInfo> {
        let unmasked = (raw ^ FORMAT_MASK) & 0x7FFF;
        let (data, distance) = FORMAT_CODEWORDS
            .iter()
            .enumerate()
            .map(|(data, &codeword)| (data, (codeword ^ unmasked).count_ones()))
            .min_by_key(|&(_, distance)| distance)?;
        trace!("format word 0b{raw:015b}: nearest data 0b{data:05b} at distance {distance}");
        (distance <= self.max_distance).then(|| FormatInfo::from_data_bits(data as u8))
    }
}

fn read_bits(symbol: &ParsedSymbol, coords: impl Iterator<Item = (usize, usize)>) -> u16 {
    coords.fold(0u16, |bits, (x, y)| (bits << 1) | symbol.is_dark(x, y) as u16)
}

/// Copy around the top-left finder, MSB first, skipping the timing modules
pub fn read_main(symbol: &ParsedSymbol) -> u16 {
    let row = (0..6).map(|x| (x, 8)).chain([(7, 8), (8, 8), (8, 7)]);
    let column = (0..6).rev().map(|y| (8, y));
    read_bits(symbol, row.chain(column))
}

/// Copy split between the bottom-left and top-right finders, MSB first
pub fn read_secondary(symbol: &ParsedSymbol) -> u16 {
    let size = symbol.size();
    let column = (size - 7..size).rev().map(|y| (8, y));
    let row = (size - 8..size).map(|x| (x, 8));
    read_bits(symbol, column.chain(row))
}
