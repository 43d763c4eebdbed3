//! Quadrangle normalization: convexity test, clockwise ordering and
//! top-left anchoring of four user-picked corners.
//!
//! The user drags four handles over a photo in any order. Before the corners
//! can drive a perspective correction they are put into a canonical form:
//!
//! 1. Reject anything that is not a convex quadrangle
//! 2. Reverse the sequence if it winds counter-clockwise
//! 3. Rotate the sequence so the top-left corner comes first
//!
//! # Sign Convention
//!
//! All coordinates are assumed to be y-down (screen and image pixels). In that
//! space a positive [`signed_area`] means the corners wind clockwise on screen.
//! A y-up caller must flip y before normalizing.
//!
//! # Example
//!
//! ```ignore
//! use quadcrop_core::geometry::{normalize_quadrangle, Point};
//!
//! let quad = [
//!     Point::new(10.0, 0.0),
//!     Point::new(0.0, 0.0),
//!     Point::new(0.0, 10.0),
//!     Point::new(10.0, 10.0),
//! ];
//! let ordered = normalize_quadrangle(&quad)?;
//! assert_eq!(ordered.top_left(), Point::new(0.0, 0.0));
//! ```

use std::ops::Index;

use thiserror::Error;

use super::{cross, Point};

/// Errors produced while normalizing a quadrangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QuadError {
    /// The input does not have exactly four corners.
    #[error("Invalid number of corners: expected 4, got {actual}")]
    InvalidCornerCount { actual: usize },

    /// The corners are concave, self-intersecting or degenerate.
    #[error("Corners do not form a convex quadrangle")]
    NonConvexQuadrangle,

    /// Anchor selection found no minimum. Indicates a bug, not bad input.
    #[error("Internal error: no top-left corner could be selected")]
    Unreachable,
}

/// Four corners in clockwise order (y-down), starting at the top-left corner.
///
/// Only [`normalize_quadrangle`] constructs this type, so holding one
/// guarantees the corners are convex, clockwise and anchored.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct OrderedQuadrangle {
    corners: [Point; 4],
}

impl OrderedQuadrangle {
    /// All four corners: top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> &[Point; 4] {
        &self.corners
    }

    pub fn into_inner(self) -> [Point; 4] {
        self.corners
    }

    pub fn top_left(&self) -> Point {
        self.corners[0]
    }

    pub fn top_right(&self) -> Point {
        self.corners[1]
    }

    pub fn bottom_right(&self) -> Point {
        self.corners[2]
    }

    pub fn bottom_left(&self) -> Point {
        self.corners[3]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.corners.iter()
    }

    /// Scale every corner about the origin.
    ///
    /// Ordering is preserved only for a positive factor; callers validate it.
    pub fn scaled(&self, factor: f64) -> Self {
        debug_assert!(factor > 0.0, "scale factor must be positive");
        Self {
            corners: self.corners.map(|p| p * factor),
        }
    }
}

impl Index<usize> for OrderedQuadrangle {
    type Output = Point;

    fn index(&self, index: usize) -> &Point {
        &self.corners[index]
    }
}

impl AsRef<[Point]> for OrderedQuadrangle {
    fn as_ref(&self) -> &[Point] {
        &self.corners
    }
}

impl TryFrom<&[Point]> for OrderedQuadrangle {
    type Error = QuadError;

    fn try_from(quad: &[Point]) -> Result<Self, Self::Error> {
        normalize_quadrangle(quad)
    }
}

/// Check whether a closed polygon is convex.
///
/// For every cyclic triple `(p0, p1, p2)` the turn `cross(p1 - p0, p2 - p1)`
/// is classified as positive, negative or zero. Zero turns (collinear
/// vertices) count toward neither side. The polygon is convex when all
/// non-zero turns share a sign.
///
/// Returns `false` for fewer than 3 points, for polygons without a single
/// non-zero turn (all vertices on one line), and for non-finite coordinates.
/// Self-intersecting quadrangles always mix turn directions and are rejected
/// like concave ones.
pub fn is_convex(corners: &[Point]) -> bool {
    let n = corners.len();
    if n < 3 {
        return false;
    }
    if !corners.iter().all(|p| p.is_finite()) {
        return false;
    }

    let mut positive = 0usize;
    let mut negative = 0usize;
    for i in 0..n {
        let p0 = corners[i];
        let p1 = corners[(i + 1) % n];
        let p2 = corners[(i + 2) % n];

        let turn = cross(p1 - p0, p2 - p1);
        if turn > 0.0 {
            positive += 1;
        } else if turn < 0.0 {
            negative += 1;
        }
    }

    (positive > 0) != (negative > 0)
}

/// Oriented area of a polygon, doubled.
///
/// Accumulates `cross(p[i] - p[0], p[i + 1] - p[0])` over the fan rooted at
/// the first point. Positive means clockwise in a y-down space.
pub fn signed_area(polygon: &[Point]) -> f64 {
    let Some(&origin) = polygon.first() else {
        return 0.0;
    };
    polygon
        .windows(2)
        .map(|pair| cross(pair[0] - origin, pair[1] - origin))
        .sum()
}

/// Put four corners into canonical order.
///
/// The result winds clockwise (y-down) and starts at the corner with the
/// smallest `x + y`. On ties the first such corner in winding order wins.
/// The output is always a cyclic rotation of the input, possibly reversed;
/// point values are never altered.
///
/// # Errors
///
/// - [`QuadError::InvalidCornerCount`] if `quad` does not hold exactly 4 points
/// - [`QuadError::NonConvexQuadrangle`] if [`is_convex`] rejects the corners
pub fn normalize_quadrangle(quad: &[Point]) -> Result<OrderedQuadrangle, QuadError> {
    let mut corners = <[Point; 4]>::try_from(quad).map_err(|_| QuadError::InvalidCornerCount {
        actual: quad.len(),
    })?;

    if !is_convex(&corners) {
        tracing::warn!(?corners, "rejecting non-convex quadrangle");
        return Err(QuadError::NonConvexQuadrangle);
    }

    if signed_area(&corners) <= 0.0 {
        corners.reverse();
    }

    let anchor = top_left_index(&corners).ok_or(QuadError::Unreachable)?;
    corners.rotate_left(anchor);

    tracing::debug!(?corners, "ordered quadrangle");
    Ok(OrderedQuadrangle { corners })
}

/// Index of the corner with the smallest `x + y`, first occurrence on ties.
fn top_left_index(corners: &[Point]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, p) in corners.iter().enumerate() {
        let shift = p.x + p.y;
        match best {
            Some((_, value)) if value <= shift => {}
            _ => best = Some((i, shift)),
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn test_unit_square_is_convex() {
        let square = pts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        assert!(is_convex(&square));
    }

    #[test]
    fn test_counter_clockwise_square_is_convex() {
        let square = pts(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]);
        assert!(is_convex(&square));
    }

    #[test]
    fn test_bowtie_is_not_convex() {
        let bowtie = pts(&[(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0)]);
        assert!(!is_convex(&bowtie));
    }

    #[test]
    fn test_dart_is_not_convex() {
        // Reflex vertex at (3, 3)
        let dart = pts(&[(0.0, 0.0), (10.0, 0.0), (3.0, 3.0), (0.0, 10.0)]);
        assert!(!is_convex(&dart));
    }

    #[test]
    fn test_fewer_than_three_points_not_convex() {
        assert!(!is_convex(&[]));
        assert!(!is_convex(&pts(&[(0.0, 0.0)])));
        assert!(!is_convex(&pts(&[(0.0, 0.0), (1.0, 1.0)])));
    }

    #[test]
    fn test_triangle_is_convex() {
        let triangle = pts(&[(0.0, 0.0), (4.0, 0.0), (0.0, 3.0)]);
        assert!(is_convex(&triangle));
    }

    #[test]
    fn test_collinear_vertex_is_not_counted() {
        // (5, 0) sits on the top edge; the other turns agree
        let quad = pts(&[(0.0, 0.0), (5.0, 0.0), (10.0, 0.0), (5.0, 5.0)]);
        assert!(is_convex(&quad));
    }

    #[test]
    fn test_all_collinear_is_not_convex() {
        let line = pts(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]);
        assert!(!is_convex(&line));
    }

    #[test]
    fn test_non_finite_is_not_convex() {
        let quad = pts(&[(0.0, 0.0), (f64::NAN, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        assert!(!is_convex(&quad));
    }

    #[test]
    fn test_signed_area_is_positive_for_clockwise_square() {
        // Clockwise on screen (y down): right, down, left
        let clockwise = pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        assert_eq!(signed_area(&clockwise), 200.0);

        let counter_clockwise = pts(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)]);
        assert_eq!(signed_area(&counter_clockwise), -200.0);
    }

    #[test]
    fn test_signed_area_empty() {
        assert_eq!(signed_area(&[]), 0.0);
        assert_eq!(signed_area(&pts(&[(3.0, 4.0)])), 0.0);
    }

    #[test]
    fn test_normalize_counter_clockwise_square() {
        let quad = pts(&[(10.0, 0.0), (0.0, 0.0), (0.0, 10.0), (10.0, 10.0)]);
        let ordered = normalize_quadrangle(&quad).unwrap();

        assert_eq!(
            ordered.corners(),
            &[
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 10.0),
                Point::new(0.0, 10.0),
            ]
        );
    }

    #[test]
    fn test_normalize_already_ordered_is_unchanged() {
        let quad = pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let ordered = normalize_quadrangle(&quad).unwrap();
        assert_eq!(ordered.corners().as_slice(), quad.as_slice());
    }

    #[test]
    fn test_normalize_rotated_clockwise_input() {
        // Clockwise, but starting at the bottom-right corner
        let quad = pts(&[(110.0, 90.0), (5.0, 100.0), (0.0, 3.0), (100.0, 0.0)]);
        let ordered = normalize_quadrangle(&quad).unwrap();

        assert_eq!(ordered.top_left(), Point::new(0.0, 3.0));
        assert_eq!(ordered.top_right(), Point::new(100.0, 0.0));
        assert_eq!(ordered.bottom_right(), Point::new(110.0, 90.0));
        assert_eq!(ordered.bottom_left(), Point::new(5.0, 100.0));
    }

    #[test]
    fn test_normalize_tie_picks_first_in_winding_order() {
        // Diamond: (0, 10) and (10, 0) both have x + y = 10
        let diamond = pts(&[(10.0, 0.0), (20.0, 10.0), (10.0, 20.0), (0.0, 10.0)]);
        let ordered = normalize_quadrangle(&diamond).unwrap();
        assert_eq!(ordered.top_left(), Point::new(10.0, 0.0));

        // Same diamond starting elsewhere: the first tie in clockwise order wins
        let shifted = pts(&[(0.0, 10.0), (10.0, 0.0), (20.0, 10.0), (10.0, 20.0)]);
        let ordered = normalize_quadrangle(&shifted).unwrap();
        assert_eq!(ordered.top_left(), Point::new(0.0, 10.0));
    }

    #[test]
    fn test_normalize_rejects_wrong_corner_count() {
        let three = pts(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
        assert_eq!(
            normalize_quadrangle(&three),
            Err(QuadError::InvalidCornerCount { actual: 3 })
        );

        let five = pts(&[(0.0, 0.0), (1.0, 0.0), (2.0, 1.0), (1.0, 2.0), (0.0, 1.0)]);
        assert_eq!(
            normalize_quadrangle(&five),
            Err(QuadError::InvalidCornerCount { actual: 5 })
        );

        assert_eq!(
            normalize_quadrangle(&[]),
            Err(QuadError::InvalidCornerCount { actual: 0 })
        );
    }

    #[test]
    fn test_normalize_rejects_concave() {
        let dart = pts(&[(0.0, 0.0), (10.0, 0.0), (3.0, 3.0), (0.0, 10.0)]);
        assert_eq!(
            normalize_quadrangle(&dart),
            Err(QuadError::NonConvexQuadrangle)
        );
    }

    #[test]
    fn test_normalize_rejects_bowtie() {
        let bowtie = pts(&[(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0)]);
        assert_eq!(
            normalize_quadrangle(&bowtie),
            Err(QuadError::NonConvexQuadrangle)
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let quad = pts(&[(40.0, 35.0), (380.0, 10.0), (300.0, 420.0), (20.0, 390.0)]);
        let once = normalize_quadrangle(&quad).unwrap();
        let twice = normalize_quadrangle(once.as_ref()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_try_from_slice() {
        let quad = pts(&[(10.0, 0.0), (0.0, 0.0), (0.0, 10.0), (10.0, 10.0)]);
        let ordered = OrderedQuadrangle::try_from(quad.as_slice()).unwrap();
        assert_eq!(ordered[0], Point::new(0.0, 0.0));
        assert_eq!(ordered[2], Point::new(10.0, 10.0));
    }

    #[test]
    fn test_scaled_keeps_order() {
        let quad = pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 5.0), (0.0, 5.0)]);
        let ordered = normalize_quadrangle(&quad).unwrap().scaled(2.0);
        assert_eq!(ordered.bottom_right(), Point::new(20.0, 10.0));
        assert!(signed_area(ordered.as_ref()) > 0.0);
    }

    #[test]
    fn test_quad_error_display() {
        let err = QuadError::InvalidCornerCount { actual: 5 };
        assert_eq!(
            err.to_string(),
            "Invalid number of corners: expected 4, got 5"
        );

        let err = QuadError::NonConvexQuadrangle;
        assert_eq!(err.to_string(), "Corners do not form a convex quadrangle");
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
