/// Symbol geometry from the finder pattern trio
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use log::trace;

use crate::detector::finder::FinderPatternTrio;
use crate::error::{Result, ScanError};
use crate::models::SymbolVersion;

/// Module size, orientation and version implied by the finder patterns
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymbolGeometry {
    /// Pixels per module
    pub module_size: f64,
    /// Angle of the top edge (top-left to top-right) in radians, image y down
    pub rotation: f64,
    /// Version estimated from the finder spacing
    pub version: SymbolVersion,
}

/// Derives [`SymbolGeometry`] from a finder trio
#[derive(Debug, Clone, Copy, Default)]
pub struct GeometryEstimator;

impl GeometryEstimator {
    /// Estimate module size, rotation and version.
    ///
    /// The finder extents are measured along image rows and columns. Below 45
    /// degrees of rotation the row extent (width) is projected onto the top
    /// edge, above it the column extent (height) is used with the complementary
    /// angle. The top-right and bottom-left extents relative to the top-left
    /// one correct for foreshortening.
    pub fn estimate(&self, trio: &FinderPatternTrio) -> Result<SymbolGeometry> {
        let (tl, tr, bl) = (&trio.top_left, &trio.top_right, &trio.bottom_left);
        let edge = tr.centroid - tl.centroid;
        let phi = edge.y.abs().atan2(edge.x.abs());

        let (base, angle, scale) = if phi <= FRAC_PI_4 {
            let base = tl.estimated_width;
            let scale = (tr.estimated_width + bl.estimated_width) / (2.0 * base);
            (base, phi, scale)
        } else {
            let base = tl.estimated_height;
            let scale = (tr.estimated_height + bl.estimated_height) / (2.0 * base);
            (base, FRAC_PI_2 - phi, scale)
        };

        let module_size = angle.cos() * base * scale / 7.0;
        if !module_size.is_finite() || module_size <= 0.0 {
            return Err(ScanError::GeometryOutOfRange(format!(
                "module size {module_size} from finder extent {base}"
            )));
        }

        let distance = tl.centroid.distance(&tr.centroid);
        let estimate = ((distance / module_size - 10.0) / 4.0).round();
        trace!(
            "module size {module_size:.3}px, finder spacing {distance:.1}px, version estimate {estimate}"
        );
        if !(f64::from(SymbolVersion::MIN)..=f64::from(SymbolVersion::MAX)).contains(&estimate) {
            return Err(ScanError::GeometryOutOfRange(format!(
                "estimated version {estimate} from module size {module_size:.3}px"
            )));
        }

        Ok(SymbolGeometry {
            module_size,
            rotation: edge.y.atan2(edge.x),
            version: SymbolVersion::new(estimate as i32)?,
        })
    }
}
