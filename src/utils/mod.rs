//! Utility functions around the scanning pipeline
//!
//! - Binarization (Otsu's method and fixed thresholds) for callers holding grayscale images
//! - Geometry (affine and projective transforms, small linear solves)

/// Grayscale to binary conversion
pub mod binarization;
/// Affine and projective transforms
pub mod geometry;
