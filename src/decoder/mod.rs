//! QR code decoding modules
//!
//! This module contains all the logic for decoding a sampled symbol:
//! - Format and version information extraction
//! - Data area traversal, unmasking and block deinterleaving
//! - Reed-Solomon error correction
//! - Segment parsing and data mode decoding (numeric, alphanumeric, byte, kanji)

/// Data-area traversal order and bit packing
pub mod bitstream;
/// Codeword extraction and per-block correction
pub mod codewords;
/// Format information extraction (mask pattern, EC level)
pub mod format;
/// Function module mask builder (finder/timing/format/alignment/version)
pub mod function_mask;
/// Data mode decoders (numeric, alphanumeric, byte, kanji)
pub mod modes;
/// Reed-Solomon error correction
pub mod reed_solomon;
/// Segment framing over the corrected data codewords
pub mod segment;
/// QR specification tables (ECC codewords/blocks, alignment, BCH codewords)
pub mod tables;
/// Version information extraction (versions 7-40)
pub mod version;

pub use codewords::CodewordAssembler;
pub use format::FormatInfoDecoder;
pub use modes::SegmentDecoder;
pub use reed_solomon::{ErrorCorrector, ReedSolomonDecoder, Uncorrectable};
pub use segment::DataSegmenter;
pub use version::VersionInfoDecoder;
