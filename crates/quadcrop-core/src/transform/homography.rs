//! Projective mapping between two quadrangles.

use nalgebra::{SMatrix, SVector};

use crate::geometry::Point;

/// A 3x3 homography matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Homography {
    pub h: SMatrix<f64, 3, 3>,
}

impl Homography {
    /// Compute the homography mapping each `src[i]` onto `dst[i]`.
    ///
    /// Solves the 8x8 linear system obtained by fixing `h[2][2] = 1`.
    /// Returns `None` when the system is singular (three or more collinear
    /// points in either quadrangle).
    #[must_use]
    pub fn from_pairs(src: &[Point; 4], dst: &[Point; 4]) -> Option<Self> {
        let mut m = SMatrix::<f64, 8, 8>::zeros();
        let mut b = SVector::<f64, 8>::zeros();

        for i in 0..4 {
            let (sx, sy) = (src[i].x, src[i].y);
            let (dx, dy) = (dst[i].x, dst[i].y);

            let r = i * 2;
            m[(r, 0)] = sx;
            m[(r, 1)] = sy;
            m[(r, 2)] = 1.0;
            m[(r, 6)] = -sx * dx;
            m[(r, 7)] = -sy * dx;
            b[r] = dx;

            m[(r + 1, 3)] = sx;
            m[(r + 1, 4)] = sy;
            m[(r + 1, 5)] = 1.0;
            m[(r + 1, 6)] = -sx * dy;
            m[(r + 1, 7)] = -sy * dy;
            b[r + 1] = dy;
        }

        let v = m.lu().solve(&b)?;
        if v.iter().any(|c| !c.is_finite()) {
            return None;
        }

        let h = SMatrix::<f64, 3, 3>::new(v[0], v[1], v[2], v[3], v[4], v[5], v[6], v[7], 1.0);
        Some(Self { h })
    }

    /// Project a point through the homography.
    #[must_use]
    pub fn project(&self, p: Point) -> Point {
        let res = self.h * SVector::<f64, 3>::new(p.x, p.y, 1.0);
        let w = res[2];
        Point::new(res[0] / w, res[1] / w)
    }
}
