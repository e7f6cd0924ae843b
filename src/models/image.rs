use crate::error::{Result, ScanError};

use super::Point;

/// Pixel value of a dark (black) pixel or module
pub const DARK: u8 = 0;
/// Pixel value of a light (white) pixel or module
pub const LIGHT: u8 = 255;

/// Binarized pixel grid, row-major, every pixel either [`DARK`] or [`LIGHT`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryImage {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl BinaryImage {
    /// Wrap a pixel buffer, rejecting wrong lengths and non-binary values
    pub fn new(width: usize, height: usize, pixels: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(ScanError::InvalidImage(format!(
                "image has zero area ({width}x{height})"
            )));
        }
        if pixels.len() != width * height {
            return Err(ScanError::InvalidImage(format!(
                "expected {} pixels for {width}x{height}, got {}",
                width * height,
                pixels.len()
            )));
        }
        if let Some(idx) = pixels.iter().position(|&p| p != DARK && p != LIGHT) {
            return Err(ScanError::InvalidImage(format!(
                "pixel ({}, {}) has value {}, expected 0 or 255",
                idx % width,
                idx / width,
                pixels[idx]
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build an image from a predicate returning `true` for dark pixels
    pub fn from_fn(width: usize, height: usize, mut is_dark: impl FnMut(usize, usize) -> bool) -> Self {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                pixels.push(if is_dark(x, y) { DARK } else { LIGHT });
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Image width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw row-major pixels
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Pixel value at (x, y), `None` outside the image
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    /// Whether (x, y) is a dark pixel. Outside the image counts as dark, as in [`Self::sample`].
    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        self.get(x, y).is_none_or(|pixel| pixel == DARK)
    }

    /// Sample at signed coordinates. Anything outside the image reads as [`DARK`].
    pub fn sample(&self, x: i64, y: i64) -> u8 {
        if x < 0 || y < 0 {
            return DARK;
        }
        self.get(x as usize, y as usize).unwrap_or(DARK)
    }

    /// One row of pixels
    pub fn row(&self, y: usize) -> &[u8] {
        &self.pixels[y * self.width..(y + 1) * self.width]
    }
}

/// Axis-aligned pixel rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    /// Left column
    pub x: usize,
    /// Top row
    pub y: usize,
    /// Width in pixels
    pub width: usize,
    /// Height in pixels
    pub height: usize,
}

impl Rect {
    /// Create a new rectangle
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Square of half-size `half` around `center`, clipped to a `width`x`height` image.
    /// Returns `None` when nothing usable remains after clipping.
    pub fn around(center: Point, half: f64, width: usize, height: usize) -> Option<Self> {
        if !center.x.is_finite() || !center.y.is_finite() || !half.is_finite() {
            return None;
        }
        let x0 = (center.x - half).floor().max(0.0);
        let y0 = (center.y - half).floor().max(0.0);
        let x1 = ((center.x + half).ceil() + 1.0).min(width as f64);
        let y1 = ((center.y + half).ceil() + 1.0).min(height as f64);
        if x1 - x0 < 3.0 || y1 - y0 < 3.0 {
            return None;
        }
        Some(Self::new(
            x0 as usize,
            y0 as usize,
            (x1 - x0) as usize,
            (y1 - y0) as usize,
        ))
    }

    /// Geometric centre in pixel-index coordinates
    pub fn center(&self) -> Point {
        Point::new(
            self.x as f64 + (self.width as f64 - 1.0) / 2.0,
            self.y as f64 + (self.height as f64 - 1.0) / 2.0,
        )
    }

    /// Whether the pixel lies inside the rectangle
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && y >= self.y && x < self.x + self.width && y < self.y + self.height
    }
}
