//! qrscan - QR symbol recovery and decoding from binarized images
//!
//! The pipeline locates the three finder patterns, estimates module size and
//! version, resamples the symbol through an affine or projective transform,
//! then reads format information, corrects the Reed-Solomon blocks and decodes
//! the data segments.
//!
//! ```no_run
//! use qrscan::{BinaryImage, CodeScanner, QrScanner, ScanConfig};
//!
//! # fn load() -> BinaryImage { unimplemented!() }
//! let image: BinaryImage = load();
//! let scanner = QrScanner::new(ScanConfig::from_env());
//! let result = scanner.scan(&image);
//! if let Some(text) = result.text() {
//!     println!("{text}");
//! }
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Scanner tunables
pub mod config;
/// QR code decoding modules (format/version info, error correction, data modes)
pub mod decoder;
/// QR code detection modules (finder patterns, alignment, geometry, sampling)
pub mod detector;
/// Failure taxonomy
pub mod error;
/// Core data structures (images, points, symbols, segments)
pub mod models;
/// The end-to-end scan pipeline
pub mod pipeline;
/// Utility functions (binarization, geometry)
pub mod utils;

pub use config::ScanConfig;
pub use decoder::{ErrorCorrector, ReedSolomonDecoder, Uncorrectable};
pub use detector::{FinderPattern, FinderPatternTrio, SymbolGeometry};
pub use error::{PatternKind, Result, ScanError};
pub use models::{
    BinaryImage, ContentType, DataSegment, DecodedData, ECLevel, FormatInfo, MaskPattern, Mode,
    ParsedSymbol, Payload, Point, Rect, ScanResult, SymbolVersion,
};
pub use pipeline::{CodeScanner, Decoded, QrScanner, Sampled};
pub use utils::binarization::{Binarizer, OtsuBinarizer, ThresholdBinarizer};

/// Scan one image with the default configuration
pub fn scan(image: &BinaryImage) -> ScanResult {
    QrScanner::default().scan(image)
}
