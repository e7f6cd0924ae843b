/// Numeric mode decoder (Mode 0001)
/// Groups of 3 digits = 10 bits, 2 digits = 7 bits, 1 digit = 4 bits
use crate::decoder::segment::BitReader;
use crate::error::{Result, ScanError};

/// Digit groups of three, two or one
pub struct NumericDecoder;

impl NumericDecoder {
    /// Digit count carried by `bits` payload bits
    pub fn char_count(bits: usize) -> Result<usize> {
        let tail = match bits % 10 {
            0 => 0,
            4 => 1,
            7 => 2,
            _ => {
                return Err(ScanError::SegmentationMalformed(format!(
                    "{bits} bits is not a whole number of numeric groups"
                )));
            }
        };
        Ok(bits / 10 * 3 + tail)
    }

    /// Decode `count` digits
    pub fn decode(reader: &mut BitReader<'_>, count: usize) -> Result<String> {
        let mut result = String::with_capacity(count);
        let mut remaining = count;

        while remaining > 0 {
            let group = remaining.min(3);
            let (bits, limit) = match group {
                3 => (10, 999),
                2 => (7, 99),
                _ => (4, 9),
            };
            let value = reader
                .read(bits)
                .ok_or_else(|| ScanError::SegmentationMalformed("numeric group truncated".into()))?;
            if value > limit {
                return Err(ScanError::SegmentationMalformed(format!(
                    "numeric group value {value} exceeds {limit}"
                )));
            }
            result.push_str(&format!("{value:0group$}"));
            remaining -= group;
        }

        Ok(result)
    }
}
