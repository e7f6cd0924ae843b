//! QR code data mode decoders
//!
//! This module contains decoders for the framed QR data modes:
//! - Numeric: Efficient encoding for digits (0-9)
//! - Alphanumeric: Letters, numbers, and symbols
//! - Byte: 8-bit data, read as Latin-1
//! - Kanji: 13-bit Shift-JIS characters
//!
//! [`SegmentDecoder`] dispatches on the segment mode and assembles the
//! content of a whole symbol.

/// Alphanumeric mode (45-character set)
pub mod alphanumeric;
/// Byte mode (Latin-1)
pub mod byte;
/// Kanji mode (Shift-JIS pairs)
pub mod kanji;
/// Numeric mode
pub mod numeric;

use log::debug;

use crate::decoder::segment::BitReader;
use crate::error::{Result, ScanError};
use crate::models::{ContentType, DataSegment, DecodedData, Mode, Payload};

use alphanumeric::AlphanumericDecoder;
use byte::ByteDecoder;
use kanji::KanjiDecoder;
use numeric::NumericDecoder;

/// Text prefixes that mark the content as something to act on
const ACTION_PREFIXES: [&str; 10] = [
    "http://",
    "https://",
    "mailto:",
    "tel:",
    "sms:",
    "smsto:",
    "geo:",
    "wifi:",
    "matmsg:",
    "begin:vcard",
];

/// Converts segments into typed content
#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentDecoder;

impl SegmentDecoder {
    /// Decode one segment
    pub fn decode(&self, segment: &DataSegment) -> Result<DecodedData> {
        let mut reader = BitReader::new(&segment.payload);
        let bits = segment.valid_bit_count;
        let payload = match segment.mode {
            Mode::Numeric => {
                let count = NumericDecoder::char_count(bits)?;
                Payload::Text(NumericDecoder::decode(&mut reader, count)?)
            }
            Mode::Alphanumeric => {
                let count = AlphanumericDecoder::char_count(bits)?;
                Payload::Text(AlphanumericDecoder::decode(&mut reader, count)?)
            }
            Mode::Byte => {
                let count = ByteDecoder::char_count(bits)?;
                let bytes = segment.payload.get(..count).ok_or_else(|| {
                    ScanError::SegmentationMalformed(format!(
                        "byte segment holds {} of {count} bytes",
                        segment.payload.len()
                    ))
                })?;
                Payload::Text(ByteDecoder::decode(bytes)?)
            }
            Mode::Kanji => {
                let count = KanjiDecoder::char_count(bits)?;
                Payload::Binary(KanjiDecoder::decode(&mut reader, count)?)
            }
            mode => return Err(ScanError::UnsupportedMode(mode)),
        };

        let content_type = match &payload {
            Payload::Text(text) => classify(text),
            Payload::Binary(_) => ContentType::Binary,
        };
        Ok(DecodedData {
            content_type,
            payload,
        })
    }

    /// Decode all segments of a symbol in order and join them.
    ///
    /// A byte segment that is not Latin-1 text is kept as raw bytes. Any binary
    /// segment makes the whole result binary.
    pub fn decode_all(&self, segments: &[DataSegment]) -> Result<DecodedData> {
        let mut parts = Vec::with_capacity(segments.len());
        for segment in segments {
            let payload = match self.decode(segment) {
                Ok(decoded) => decoded.payload,
                Err(ScanError::EncodingConversionFailed { offset }) if segment.mode == Mode::Byte => {
                    debug!("byte segment is not text (offset {offset}), keeping raw bytes");
                    let len = segment.valid_bit_count / 8;
                    Payload::Binary(segment.payload[..len.min(segment.payload.len())].to_vec())
                }
                Err(err) => return Err(err),
            };
            parts.push(payload);
        }

        if parts.iter().all(|p| matches!(p, Payload::Text(_))) {
            let text: String = parts.iter().filter_map(Payload::as_text).collect();
            Ok(DecodedData {
                content_type: classify(&text),
                payload: Payload::Text(text),
            })
        } else {
            let bytes = parts.iter().flat_map(Payload::to_bytes).collect();
            Ok(DecodedData {
                content_type: ContentType::Binary,
                payload: Payload::Binary(bytes),
            })
        }
    }
}

/// `Action` for text starting with a known scheme, `Text` otherwise
pub fn classify(text: &str) -> ContentType {
    let is_action = ACTION_PREFIXES.iter().any(|prefix| {
        text.get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    });
    if is_action {
        ContentType::Action
    } else {
        ContentType::Text
    }
}
