/// Module grid extraction through a symbol-to-image transform
use log::trace;

use crate::detector::finder::FinderPatternTrio;
use crate::error::{Result, ScanError};
use crate::models::{BinaryImage, DARK, ParsedSymbol, Point, SymbolVersion};
use crate::utils::geometry::PerspectiveTransform;

/// Finder centres in module space: top-left, top-right, bottom-left
pub fn finder_module_points(version: SymbolVersion) -> [Point; 3] {
    let size = version.size() as f64;
    [
        Point::new(3.5, 3.5),
        Point::new(size - 3.5, 3.5),
        Point::new(3.5, size - 3.5),
    ]
}

/// Centre of the bottom-right alignment pattern in module space
pub fn alignment_module_point(version: SymbolVersion) -> Point {
    let size = version.size() as f64;
    Point::new(size - 6.5, size - 6.5)
}

/// Maps module centres into the image and reads the module grid
#[derive(Debug, Clone, Copy, Default)]
pub struct PerspectiveSampler;

impl PerspectiveSampler {
    /// Module-to-pixel transform. Affine from the finder centres alone; projective
    /// when an alignment centre is known and the version has alignment patterns.
    pub fn transform(
        &self,
        trio: &FinderPatternTrio,
        alignment: Option<Point>,
        version: SymbolVersion,
    ) -> Result<PerspectiveTransform> {
        let [tl, tr, bl] = finder_module_points(version);
        let image = [
            trio.top_left.centroid,
            trio.top_right.centroid,
            trio.bottom_left.centroid,
        ];

        let transform = match alignment.filter(|_| version.number() > 1) {
            Some(centre) => PerspectiveTransform::from_points(
                &[tl, tr, bl, alignment_module_point(version)],
                &[image[0], image[1], image[2], centre],
            ),
            None => PerspectiveTransform::affine(&[tl, tr, bl], &image),
        };
        transform.ok_or_else(|| {
            ScanError::GeometryOutOfRange("module-to-pixel transform is singular".into())
        })
    }

    /// Where the bottom-right alignment pattern should be, from the finders alone
    pub fn predict_alignment(&self, trio: &FinderPatternTrio, version: SymbolVersion) -> Option<Point> {
        self.transform(trio, None, version)
            .ok()?
            .map(alignment_module_point(version))
    }

    /// Resample the symbol at `version`
    pub fn sample(
        &self,
        image: &BinaryImage,
        trio: &FinderPatternTrio,
        alignment: Option<Point>,
        version: SymbolVersion,
    ) -> Result<ParsedSymbol> {
        let transform = self.transform(trio, alignment, version)?;
        trace!("sampling version {version} through {transform:?}");
        sample_grid(image, &transform, version)
    }
}

/// Read every module centre through `transform`, rounding to the nearest pixel.
/// Centres that map outside the image read as dark.
pub fn sample_grid(
    image: &BinaryImage,
    transform: &PerspectiveTransform,
    version: SymbolVersion,
) -> Result<ParsedSymbol> {
    let size = version.size();
    let mut modules = Vec::with_capacity(size * size);
    for y in 0..size {
        for x in 0..size {
            let centre = Point::new(x as f64 + 0.5, y as f64 + 0.5);
            let value = transform
                .map(centre)
                .map_or(DARK, |p| image.sample(p.x.round() as i64, p.y.round() as i64));
            modules.push(value);
        }
    }
    ParsedSymbol::new(version, modules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::finder::FinderPattern;
    use crate::models::LIGHT;
    use approx::assert_abs_diff_eq;

    fn trio_at(points: [(f64, f64); 3]) -> FinderPatternTrio {
        let pattern = |(x, y): (f64, f64)| FinderPattern::new(Point::new(x, y), 7.0, 7.0);
        FinderPatternTrio {
            top_left: pattern(points[0]),
            top_right: pattern(points[1]),
            bottom_left: pattern(points[2]),
        }
    }

    #[test]
    fn test_identity_resampling() {
        // 1 px per module, finder centres on module (3, 3) etc.
        let version = SymbolVersion::new(2).unwrap();
        let size = version.size();
        let image = BinaryImage::from_fn(size, size, |x, y| (x * 7 + y * 3) % 5 < 2);
        let last = (size - 4) as f64;
        let trio = trio_at([(3.0, 3.0), (last, 3.0), (3.0, last)]);

        let symbol = PerspectiveSampler.sample(&image, &trio, None, version).unwrap();
        assert_eq!(symbol.modules(), image.pixels());
    }

    #[test]
    fn test_out_of_bounds_reads_dark() {
        let version = SymbolVersion::new(1).unwrap();
        let image = BinaryImage::from_fn(10, 10, |_, _| false);
        let trio = trio_at([(3.0, 3.0), (17.0, 3.0), (3.0, 17.0)]);
        let symbol = PerspectiveSampler.sample(&image, &trio, None, version).unwrap();
        assert_eq!(symbol.module(0, 0), LIGHT);
        assert_eq!(symbol.module(9, 9), LIGHT);
        assert_eq!(symbol.module(10, 0), DARK);
        assert_eq!(symbol.module(20, 20), DARK);
    }

    #[test]
    fn test_alignment_point_drives_projective_transform() {
        let version = SymbolVersion::new(3).unwrap();
        let trio = trio_at([(10.0, 10.0), (100.0, 12.0), (8.0, 98.0)]);

        let affine = PerspectiveSampler.transform(&trio, None, version).unwrap();
        assert!(affine.is_affine());
        let predicted = PerspectiveSampler.predict_alignment(&trio, version).unwrap();

        let shifted = Point::new(predicted.x + 3.0, predicted.y - 2.0);
        let projective = PerspectiveSampler
            .transform(&trio, Some(shifted), version)
            .unwrap();
        assert!(!projective.is_affine());
        let mapped = projective.map(alignment_module_point(version)).unwrap();
        assert_abs_diff_eq!(mapped.x, shifted.x, epsilon = 1e-6);
        assert_abs_diff_eq!(mapped.y, shifted.y, epsilon = 1e-6);

        // version 1 has no alignment pattern to use
        let v1 = SymbolVersion::new(1).unwrap();
        assert!(PerspectiveSampler.transform(&trio, Some(shifted), v1).unwrap().is_affine());
    }
}
