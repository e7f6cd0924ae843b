//! QR code detection modules
//!
//! This module contains all the logic for locating a symbol in a binary image:
//! - Finder pattern detection (the three square markers)
//! - Alignment pattern detection (for versions 2+)
//! - Geometry estimation (module size, rotation, version)
//! - Perspective transform and module grid sampling

/// Alignment pattern detection for QR versions 2+
pub mod alignment;
/// Connected component labelling with neighbour sets
pub mod connected_components;
/// Finder pattern detection using 1:1:3:1:1 ratio scanning
pub mod finder;
/// Module size, rotation and version from the finder trio
pub mod geometry;
/// Sample grid extraction and perspective correction
pub mod transform;

pub use alignment::AlignmentPatternLocator;
pub use finder::{FinderPattern, FinderPatternLocator, FinderPatternTrio};
pub use geometry::{GeometryEstimator, SymbolGeometry};
pub use transform::PerspectiveSampler;
