/// Byte mode decoder (Mode 0100) for 8-bit data
use crate::error::{Result, ScanError};

/// Byte payloads are read as ISO-8859-1
pub struct ByteDecoder;

impl ByteDecoder {
    /// Byte count carried by `bits` payload bits
    pub fn char_count(bits: usize) -> Result<usize> {
        if bits % 8 != 0 {
            return Err(ScanError::SegmentationMalformed(format!(
                "{bits} bits is not a whole number of bytes"
            )));
        }
        Ok(bits / 8)
    }

    /// Latin-1 text of `bytes`. Control codes other than tab, line feed and
    /// carriage return have no text meaning and fail the conversion.
    pub fn decode(bytes: &[u8]) -> Result<String> {
        bytes
            .iter()
            .enumerate()
            .map(|(offset, &b)| {
                if Self::is_text(b) {
                    Ok(char::from(b))
                } else {
                    Err(ScanError::EncodingConversionFailed { offset })
                }
            })
            .collect()
    }

    fn is_text(b: u8) -> bool {
        matches!(b, b'\t' | b'\n' | b'\r' | 0x20..=0x7E | 0xA0..=0xFF)
    }
}
