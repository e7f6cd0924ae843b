/// Splitting corrected data codewords into mode segments
use log::trace;

use crate::error::{Result, ScanError};
use crate::models::{DataSegment, Mode, SymbolVersion};

/// MSB-first reader over a byte slice with a byte index and a sub-byte offset
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    byte: usize,
    bit: usize,
}

impl<'a> BitReader<'a> {
    /// Reader positioned at the first bit of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            byte: 0,
            bit: 0,
        }
    }

    /// Absolute bit position
    pub fn position(&self) -> usize {
        self.byte * 8 + self.bit
    }

    /// Bits left before the end of the input
    pub fn remaining(&self) -> usize {
        (self.data.len() * 8).saturating_sub(self.position())
    }

    /// Read `n` (at most 32) bits as an unsigned value; `None` if fewer remain
    pub fn read(&mut self, n: usize) -> Option<u32> {
        if n > 32 || n > self.remaining() {
            return None;
        }
        let mut value = 0u32;
        let mut left = n;
        while left > 0 {
            let available = 8 - self.bit;
            let take = available.min(left);
            let shift = available - take;
            let chunk = (self.data[self.byte] >> shift) & (0xFFu8 >> (8 - take));
            value = (value << take) | chunk as u32;
            self.bit += take;
            if self.bit == 8 {
                self.byte += 1;
                self.bit = 0;
            }
            left -= take;
        }
        Some(value)
    }

    /// Skip `n` bits, stopping at the end of the input
    pub fn advance(&mut self, n: usize) {
        let pos = (self.position() + n).min(self.data.len() * 8);
        self.byte = pos / 8;
        self.bit = pos % 8;
    }
}

/// Copy `bit_len` bits starting at `bit_offset` into a buffer that starts at bit 0.
/// Bits past the end of `data` read as zero; unused trailing bits are cleared.
pub fn extract_bits(data: &[u8], bit_offset: usize, bit_len: usize) -> Vec<u8> {
    let start = bit_offset / 8;
    let shift = bit_offset % 8;
    let mut out: Vec<u8> = (0..bit_len.div_ceil(8))
        .map(|k| {
            let hi = data.get(start + k).map_or(0, |&b| b << shift);
            let lo = if shift > 0 {
                data.get(start + k + 1).map_or(0, |&b| b >> (8 - shift))
            } else {
                0
            };
            hi | lo
        })
        .collect();
    let tail = bit_len % 8;
    if tail != 0 {
        if let Some(last) = out.last_mut() {
            *last &= 0xFF << (8 - tail);
        }
    }
    out
}

/// Parses {mode, character count, payload} segments out of the data codewords
#[derive(Debug, Clone, Copy, Default)]
pub struct DataSegmenter;

impl DataSegmenter {
    /// Segments up to the terminator or the end of input.
    ///
    /// A mode without a character count (ECI, structured append, FNC1, ...) is
    /// recorded as an empty segment and ends parsing, since its framing is unknown.
    pub fn segment(&self, data: &[u8], version: SymbolVersion) -> Result<Vec<DataSegment>> {
        let mut reader = BitReader::new(data);
        let mut segments = Vec::new();

        while reader.remaining() >= 4 {
            let indicator = reader.read(4).unwrap_or(0) as u8;
            let Some(mode) = Mode::from_indicator(indicator) else {
                break;
            };

            let Some(count_bits) = mode.char_count_bits(version) else {
                trace!("mode {mode:?} at bit {} has no known framing", reader.position() - 4);
                segments.push(DataSegment {
                    mode,
                    valid_bit_count: 0,
                    payload: Vec::new(),
                });
                break;
            };

            let count = reader.read(count_bits).ok_or_else(|| {
                ScanError::SegmentationMalformed(format!(
                    "{mode:?} character count needs {count_bits} bits, {} left",
                    reader.remaining()
                ))
            })? as usize;
            let payload_bits = mode.payload_bits(count).unwrap_or(0);
            if payload_bits > reader.remaining() {
                return Err(ScanError::SegmentationMalformed(format!(
                    "{mode:?} segment of {count} characters needs {payload_bits} bits, {} left",
                    reader.remaining()
                )));
            }

            let payload = extract_bits(data, reader.position(), payload_bits);
            trace!("{mode:?} segment: {count} characters, {payload_bits} bits");
            reader.advance(payload_bits);
            segments.push(DataSegment {
                mode,
                valid_bit_count: payload_bits,
                payload,
            });
        }

        Ok(segments)
    }
}
