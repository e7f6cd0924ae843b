//! Failure taxonomy shared by every pipeline stage

use std::fmt;

use thiserror::Error;

use crate::models::Mode;

/// Which locator pattern a detection stage was looking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// One of the three corner finder patterns
    Finder,
    /// The bottom-right alignment pattern
    Alignment,
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternKind::Finder => f.write_str("finder"),
            PatternKind::Alignment => f.write_str("alignment"),
        }
    }
}

/// Typed failure of a scan. Every stage returns one of these instead of panicking.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScanError {
    /// The pixel grid handed to the scanner is not a valid binary image
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// A symbol version outside 1..=40 was requested
    #[error("symbol version {0} is outside 1..=40")]
    InvalidVersion(i32),

    /// Not enough locator evidence in the image
    #[error("{pattern} pattern not found ({found} candidate clusters)")]
    PatternNotFound {
        /// Pattern being searched for
        pattern: PatternKind,
        /// Number of distinct candidates that were found
        found: usize,
    },

    /// Finder geometry does not describe a plausible symbol
    #[error("geometry out of range: {0}")]
    GeometryOutOfRange(String),

    /// Neither copy of the format information is within correction distance
    #[error("format information is unrecoverable")]
    FormatInfoUnrecoverable,

    /// Neither copy of the version information is within correction distance
    #[error("version information is unrecoverable")]
    VersionInfoUnrecoverable,

    /// Reed-Solomon decoding failed for one block
    #[error("error correction failed for block {block}")]
    BlockCorrectionFailed {
        /// Index of the failing block in interleaving order
        block: usize,
    },

    /// The corrected bitstream does not follow the segment grammar
    #[error("malformed segment: {0}")]
    SegmentationMalformed(String),

    /// The bitstream uses a mode this decoder does not interpret
    #[error("unsupported segment mode {0:?}")]
    UnsupportedMode(Mode),

    /// A byte segment could not be read as Latin-1 text
    #[error("byte segment is not Latin-1 text (offset {offset})")]
    EncodingConversionFailed {
        /// Offset of the first offending byte within the segment
        offset: usize,
    },
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, ScanError>;
