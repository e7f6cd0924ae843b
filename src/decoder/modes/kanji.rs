/// Kanji mode decoder (Mode 1000)
/// Each character is 13 bits, expanded back to a Shift-JIS byte pair
use crate::decoder::segment::BitReader;
use crate::error::{Result, ScanError};

/// 13-bit kanji values to Shift-JIS
#[derive(Debug, Clone, Copy, Default)]
pub struct KanjiDecoder;

impl KanjiDecoder {
    /// Character count carried by `bits` payload bits
    pub fn char_count(bits: usize) -> Result<usize> {
        if bits % 13 != 0 {
            return Err(ScanError::SegmentationMalformed(format!(
                "{bits} bits is not a whole number of kanji characters"
            )));
        }
        Ok(bits / 13)
    }

    /// Shift-JIS bytes of `count` characters
    pub fn decode(reader: &mut BitReader<'_>, count: usize) -> Result<Vec<u8>> {
        let mut sjis = Vec::with_capacity(count * 2);
        for _ in 0..count {
            let value = reader
                .read(13)
                .ok_or_else(|| ScanError::SegmentationMalformed("kanji character truncated".into()))?;
            let mut code = ((value / 0xC0) << 8) | (value % 0xC0);
            code += if code < 0x1F00 { 0x8140 } else { 0xC140 };
            sjis.push((code >> 8) as u8);
            sjis.push((code & 0xFF) as u8);
        }
        Ok(sjis)
    }
}
