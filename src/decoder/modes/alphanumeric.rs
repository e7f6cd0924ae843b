/// Alphanumeric mode decoder (Mode 0010)
/// Alphanumeric character set: 0-9, A-Z, space, $%*+-./:
use crate::decoder::segment::BitReader;
use crate::error::{Result, ScanError};

const ALPHANUMERIC_TABLE: [char; 45] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I',
    'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', ' ', '$',
    '%', '*', '+', '-', '.', '/', ':',
];

/// Pairs = 11 bits, single = 6 bits
pub struct AlphanumericDecoder;

impl AlphanumericDecoder {
    /// Character count carried by `bits` payload bits
    pub fn char_count(bits: usize) -> Result<usize> {
        let tail = match bits % 11 {
            0 => 0,
            6 => 1,
            _ => {
                return Err(ScanError::SegmentationMalformed(format!(
                    "{bits} bits is not a whole number of alphanumeric groups"
                )));
            }
        };
        Ok(bits / 11 * 2 + tail)
    }

    /// Decode `count` characters
    pub fn decode(reader: &mut BitReader<'_>, count: usize) -> Result<String> {
        let mut result = String::with_capacity(count);
        let mut remaining = count;

        while remaining > 0 {
            if remaining >= 2 {
                let value = Self::read(reader, 11)? as usize;
                result.push(Self::lookup(value / 45)?);
                result.push(Self::lookup(value % 45)?);
                remaining -= 2;
            } else {
                let value = Self::read(reader, 6)? as usize;
                result.push(Self::lookup(value)?);
                remaining -= 1;
            }
        }

        Ok(result)
    }

    fn read(reader: &mut BitReader<'_>, bits: usize) -> Result<u32> {
        reader
            .read(bits)
            .ok_or_else(|| ScanError::SegmentationMalformed("alphanumeric group truncated".into()))
    }

    fn lookup(index: usize) -> Result<char> {
        ALPHANUMERIC_TABLE.get(index).copied().ok_or_else(|| {
            ScanError::SegmentationMalformed(format!("alphanumeric index {index} out of range"))
        })
    }
}
