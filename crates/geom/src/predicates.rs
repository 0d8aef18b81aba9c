//! Floating point predicates shared by the triangulation algorithms.
//!
//! All predicates use the same sign convention: in a y-up frame a positive
//! cross product means a counter-clockwise turn.

use crate::scalar::Scalar;
use crate::Point;

/// The turn direction of three points.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum Orientation {
    Clockwise,
    Collinear,
    CounterClockwise,
}

impl Orientation {
    /// `-1`, `0` or `1`.
    #[inline]
    pub fn sign(self) -> i32 {
        match self {
            Orientation::Clockwise => -1,
            Orientation::Collinear => 0,
            Orientation::CounterClockwise => 1,
        }
    }

    #[inline]
    pub fn reversed(self) -> Self {
        match self {
            Orientation::Clockwise => Orientation::CounterClockwise,
            Orientation::Collinear => Orientation::Collinear,
            Orientation::CounterClockwise => Orientation::Clockwise,
        }
    }
}

/// Sign of the cross product `(p2 - p1) x (p3 - p2)`.
///
/// Exactly collinear points return `Orientation::Collinear`.
pub fn orientation<S: Scalar>(p1: Point<S>, p2: Point<S>, p3: Point<S>) -> Orientation {
    let cross = (p2 - p1).cross(p3 - p2);

    if cross > S::ZERO {
        Orientation::CounterClockwise
    } else if cross < S::ZERO {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

/// Returns true if the segments `p1 q1` and `p2 q2` straddle each other.
///
/// This is the classic orientation-based test without the special case for
/// collinear segments: two overlapping collinear segments are reported as not
/// intersecting. Segments that merely touch at an endpoint are reported as
/// intersecting, so callers that care must filter shared endpoints out.
pub fn segments_intersect<S: Scalar>(
    p1: Point<S>,
    q1: Point<S>,
    p2: Point<S>,
    q2: Point<S>,
) -> bool {
    orientation(p1, q1, p2) != orientation(p1, q1, q2)
        && orientation(p2, q2, p1) != orientation(p2, q2, q1)
}

/// Barycentric point-in-triangle test.
///
/// Points on the edges are outside. Degenerate (zero area) triangles don't
/// contain any point.
pub fn point_in_triangle<S: Scalar>(p: Point<S>, a: Point<S>, b: Point<S>, c: Point<S>) -> bool {
    let v0 = c - a;
    let v1 = b - a;
    let v2 = p - a;

    let dot00 = v0.dot(v0);
    let dot01 = v0.dot(v1);
    let dot02 = v0.dot(v2);
    let dot11 = v1.dot(v1);
    let dot12 = v1.dot(v2);

    let denom = dot00 * dot11 - dot01 * dot01;
    if denom == S::ZERO {
        return false;
    }

    let inv = S::ONE / denom;
    let u = (dot11 * dot02 - dot01 * dot12) * inv;
    let v = (dot00 * dot12 - dot01 * dot02) * inv;

    u > S::ZERO && v > S::ZERO && u + v < S::ONE
}

/// Returns true if `p0 p1 p2` turns clockwise.
///
/// Agrees with `orientation(p0, p1, p2) == Orientation::Clockwise`.
#[inline]
pub fn is_clockwise<S: Scalar>(p0: Point<S>, p1: Point<S>, p2: Point<S>) -> bool {
    (p1 - p0).cross(p2 - p0) < S::ZERO
}

/// Signed area of the triangle `a b c`, positive if counter-clockwise.
#[inline]
pub fn signed_area<S: Scalar>(a: Point<S>, b: Point<S>, c: Point<S>) -> S {
    (b - a).cross(c - a) * S::HALF
}

#[cfg(test)]
use crate::point;

#[test]
fn test_orientation_and_clockwise_agree() {
    let ccw = [point(0.0f32, 0.0), point(1.0, 0.0), point(0.0, 1.0)];
    let cw = [ccw[0], ccw[2], ccw[1]];

    assert_eq!(orientation(ccw[0], ccw[1], ccw[2]), Orientation::CounterClockwise);
    assert_eq!(orientation(cw[0], cw[1], cw[2]), Orientation::Clockwise);
    assert_eq!(
        orientation(ccw[0], ccw[1], ccw[2]).sign(),
        -orientation(cw[0], cw[1], cw[2]).sign()
    );

    assert!(!is_clockwise(ccw[0], ccw[1], ccw[2]));
    assert!(is_clockwise(cw[0], cw[1], cw[2]));

    assert!(signed_area(ccw[0], ccw[1], ccw[2]) > 0.0);
    assert!(signed_area(cw[0], cw[1], cw[2]) < 0.0);
}

#[test]
fn test_orientation_collinear() {
    let o = orientation(point(0.0f64, 0.0), point(1.0, 1.0), point(3.0, 3.0));
    assert_eq!(o, Orientation::Collinear);
    assert_eq!(o.sign(), 0);
    assert!(!is_clockwise(point(0.0f64, 0.0), point(1.0, 1.0), point(3.0, 3.0)));
}

#[test]
fn test_segments_intersect() {
    // Crossing diagonals of a square.
    assert!(segments_intersect(
        point(0.0f32, 0.0),
        point(1.0, 1.0),
        point(0.0, 1.0),
        point(1.0, 0.0),
    ));

    // Parallel.
    assert!(!segments_intersect(
        point(0.0f32, 0.0),
        point(1.0, 0.0),
        point(0.0, 1.0),
        point(1.0, 1.0),
    ));

    // The lines cross but not the segments.
    assert!(!segments_intersect(
        point(0.0f32, 0.0),
        point(1.0, 0.0),
        point(2.0, -1.0),
        point(2.0, 1.0),
    ));

    // Collinear overlapping segments are not reported.
    assert!(!segments_intersect(
        point(0.0f32, 0.0),
        point(2.0, 0.0),
        point(1.0, 0.0),
        point(3.0, 0.0),
    ));
}

#[test]
fn test_point_in_triangle() {
    let a = point(0.0f32, 0.0);
    let b = point(4.0, 0.0);
    let c = point(0.0, 4.0);

    assert!(point_in_triangle(point(1.0, 1.0), a, b, c));
    // Winding doesn't matter.
    assert!(point_in_triangle(point(1.0, 1.0), a, c, b));
    assert!(!point_in_triangle(point(3.0, 3.0), a, b, c));
    // On the boundary.
    assert!(!point_in_triangle(point(2.0, 0.0), a, b, c));
    assert!(!point_in_triangle(a, a, b, c));

    // Degenerate triangle.
    assert!(!point_in_triangle(
        point(1.0, 1.0),
        point(0.0, 0.0),
        point(1.0, 1.0),
        point(2.0, 2.0),
    ));
}
