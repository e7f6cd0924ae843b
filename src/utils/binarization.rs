/// Grayscale to binary conversion, the collaborator that feeds the scanner
use image::GrayImage;

use crate::models::BinaryImage;

/// Turns a grayscale image into a 0/255 pixel grid
pub trait Binarizer {
    /// Binarize `gray`; pixels classified as ink become dark
    fn binarize(&self, gray: &GrayImage) -> BinaryImage;
}

/// Fixed global threshold: pixels below `threshold` are dark
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdBinarizer {
    /// Luma cut-off
    pub threshold: u8,
}

impl Binarizer for ThresholdBinarizer {
    fn binarize(&self, gray: &GrayImage) -> BinaryImage {
        BinaryImage::from_fn(gray.width() as usize, gray.height() as usize, |x, y| {
            gray.get_pixel(x as u32, y as u32)[0] < self.threshold
        })
    }
}

/// Global threshold chosen by Otsu's method
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OtsuBinarizer;

impl Binarizer for OtsuBinarizer {
    fn binarize(&self, gray: &GrayImage) -> BinaryImage {
        let threshold = otsu_threshold(gray.as_raw());
        ThresholdBinarizer { threshold }.binarize(gray)
    }
}

/// Threshold maximising the between-class variance of the histogram
pub fn otsu_threshold(gray: &[u8]) -> u8 {
    let mut histogram = [0u64; 256];
    for &pixel in gray {
        histogram[pixel as usize] += 1;
    }

    let total = gray.len() as f64;
    let total_sum: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &count)| i as f64 * count as f64)
        .sum();

    let mut max_variance = 0.0;
    let mut optimal_threshold = 128u8;
    let mut below_pixels = 0.0;
    let mut below_sum = 0.0;

    // Class "below" holds intensities < threshold
    for threshold in 1..=255usize {
        below_pixels += histogram[threshold - 1] as f64;
        below_sum += (threshold - 1) as f64 * histogram[threshold - 1] as f64;
        let above_pixels = total - below_pixels;
        if below_pixels == 0.0 || above_pixels == 0.0 {
            continue;
        }

        let below_mean = below_sum / below_pixels;
        let above_mean = (total_sum - below_sum) / above_pixels;
        let variance = (below_pixels / total) * (above_pixels / total) * (below_mean - above_mean).powi(2);

        if variance > max_variance {
            max_variance = variance;
            optimal_threshold = threshold as u8;
        }
    }

    optimal_threshold
}
