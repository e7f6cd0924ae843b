/// Planar transforms between symbol (module) space and image (pixel) space
use crate::models::Point;

/// Projective transform stored as a row-major 3x3 matrix with `h[8] == 1`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveTransform {
    h: [f64; 9],
}

impl PerspectiveTransform {
    /// Affine transform mapping three source points onto three destination points
    pub fn affine(src: &[Point; 3], dst: &[Point; 3]) -> Option<Self> {
        let a = [
            [src[0].x, src[0].y, 1.0],
            [src[1].x, src[1].y, 1.0],
            [src[2].x, src[2].y, 1.0],
        ];
        let row_x = solve_linear_system(&a, &[dst[0].x, dst[1].x, dst[2].x])?;
        let row_y = solve_linear_system(&a, &[dst[0].y, dst[1].y, dst[2].y])?;
        Some(Self {
            h: [
                row_x[0], row_x[1], row_x[2], row_y[0], row_y[1], row_y[2], 0.0, 0.0, 1.0,
            ],
        })
    }

    /// Full projective transform from four source points to four destination points
    pub fn from_points(src: &[Point; 4], dst: &[Point; 4]) -> Option<Self> {
        // Direct linear transform with h33 fixed to 1
        let mut a = [[0.0f64; 8]; 8];
        let mut b = [0.0f64; 8];

        for i in 0..4 {
            let (sx, sy) = (src[i].x, src[i].y);
            let (dx, dy) = (dst[i].x, dst[i].y);

            let row = i * 2;
            a[row] = [sx, sy, 1.0, 0.0, 0.0, 0.0, -dx * sx, -dx * sy];
            b[row] = dx;
            a[row + 1] = [0.0, 0.0, 0.0, sx, sy, 1.0, -dy * sx, -dy * sy];
            b[row + 1] = dy;
        }

        let s = solve_linear_system(&a, &b)?;
        Some(Self {
            h: [s[0], s[1], s[2], s[3], s[4], s[5], s[6], s[7], 1.0],
        })
    }

    /// Map a point. `None` when it lands on the line at infinity.
    pub fn map(&self, p: Point) -> Option<Point> {
        let h = &self.h;
        let w = h[6] * p.x + h[7] * p.y + h[8];
        if w.abs() < 1e-12 {
            return None;
        }
        let x = (h[0] * p.x + h[1] * p.y + h[2]) / w;
        let y = (h[3] * p.x + h[4] * p.y + h[5]) / w;
        (x.is_finite() && y.is_finite()).then_some(Point::new(x, y))
    }

    /// Whether the transform has no projective component
    pub fn is_affine(&self) -> bool {
        self.h[6] == 0.0 && self.h[7] == 0.0
    }
}

/// Solve an NxN linear system with partial-pivot Gaussian elimination
#[allow(clippy::needless_range_loop)]
pub fn solve_linear_system<const N: usize>(a: &[[f64; N]; N], b: &[f64; N]) -> Option<[f64; N]> {
    let mut a = *a;
    let mut b = *b;

    // Forward elimination
    for i in 0..N {
        let mut max_val = a[i][i].abs();
        let mut max_row = i;
        for k in (i + 1)..N {
            if a[k][i].abs() > max_val {
                max_val = a[k][i].abs();
                max_row = k;
            }
        }

        // Singular or numerically degenerate
        if max_val < 1e-12 {
            return None;
        }

        if max_row != i {
            a.swap(i, max_row);
            b.swap(i, max_row);
        }

        for k in (i + 1)..N {
            let factor = a[k][i] / a[i][i];
            b[k] -= factor * b[i];
            for j in i..N {
                a[k][j] -= factor * a[i][j];
            }
        }
    }

    // Back substitution
    let mut x = [0.0f64; N];
    for i in (0..N).rev() {
        let mut sum = b[i];
        for j in (i + 1)..N {
            sum -= a[i][j] * x[j];
        }
        x[i] = sum / a[i][i];
    }

    x.iter().all(|v| v.is_finite()).then_some(x)
}
