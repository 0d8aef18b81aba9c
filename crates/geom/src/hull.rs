use crate::predicates::{point_in_triangle, segments_intersect};
use crate::scalar::Scalar;
use crate::Point;

use arrayvec::ArrayVec;

/// Up to three triangles, as indices into the four control points.
pub type HullTriangles = ArrayVec<[u8; 3], 3>;

/// Triangulates the convex hull of four points (typically the control points
/// of a cubic bézier curve).
///
/// - If two points coincide, a single triangle made of the other three is produced.
/// - If one point is inside of the triangle formed by the other three, three
///   triangles fanning around it are produced.
/// - Otherwise the quadrilateral is split along its shortest diagonal.
pub fn quad_hull_triangles<S: Scalar>(points: &[Point<S>; 4]) -> HullTriangles {
    let mut triangles = ArrayVec::new();

    for i in 0..4 {
        for j in (i + 1)..4 {
            if points[i] == points[j] {
                let mut tri = [0u8; 3];
                let mut n = 0;
                for k in 0..4u8 {
                    if k as usize != j {
                        tri[n] = k;
                        n += 1;
                    }
                }
                triangles.push(tri);
                return triangles;
            }
        }
    }

    for i in 0..4u8 {
        let mut others = [0u8; 3];
        let mut n = 0;
        for j in 0..4u8 {
            if i != j {
                others[n] = j;
                n += 1;
            }
        }

        let p = |idx: u8| points[idx as usize];
        if point_in_triangle(p(i), p(others[0]), p(others[1]), p(others[2])) {
            for j in 0..3 {
                triangles.push([others[j], others[(j + 1) % 3], i]);
            }
            return triangles;
        }
    }

    let d = |a: usize, b: usize| (points[b] - points[a]).square_length();

    //  0--3  0--2  0--3
    //  |\ |  |\ |  |\ |
    //  | \|  | \|  | \|
    //  1--2  1--3  2--1
    if segments_intersect(points[0], points[2], points[1], points[3]) {
        if d(0, 2) < d(1, 3) {
            triangles.push([0, 1, 2]);
            triangles.push([0, 2, 3]);
        } else {
            triangles.push([0, 1, 3]);
            triangles.push([1, 2, 3]);
        }
    } else if segments_intersect(points[0], points[3], points[1], points[2]) {
        if d(0, 3) < d(1, 2) {
            triangles.push([0, 1, 3]);
            triangles.push([0, 3, 2]);
        } else {
            triangles.push([0, 1, 2]);
            triangles.push([2, 1, 3]);
        }
    } else {
        // 0-1 and 2-3 are the diagonals, modulo precision issues.
        if d(0, 1) < d(2, 3) {
            triangles.push([0, 2, 1]);
            triangles.push([0, 1, 3]);
        } else {
            triangles.push([0, 2, 3]);
            triangles.push([3, 2, 1]);
        }
    }

    triangles
}

#[cfg(test)]
use crate::point;

#[cfg(test)]
fn hull_area(points: &[Point<f64>; 4], triangles: &HullTriangles) -> f64 {
    triangles
        .iter()
        .map(|t| {
            crate::signed_area(
                points[t[0] as usize],
                points[t[1] as usize],
                points[t[2] as usize],
            )
            .abs()
        })
        .sum()
}

#[test]
fn convex_quad() {
    // Arch shaped curve, the control points form a square.
    let points = [
        point(0.0f64, 0.0),
        point(0.0, 1.0),
        point(1.0, 1.0),
        point(1.0, 0.0),
    ];
    let triangles = quad_hull_triangles(&points);
    assert_eq!(triangles.len(), 2);
    assert!((hull_area(&points, &triangles) - 1.0).abs() < 1e-12);
}

#[test]
fn crossed_control_polygon() {
    // The control polygon 0-1-2-3 crosses itself, the hull is still the unit square.
    let points = [
        point(0.0f64, 0.0),
        point(1.0, 1.0),
        point(0.0, 1.0),
        point(1.0, 0.0),
    ];
    let triangles = quad_hull_triangles(&points);
    assert_eq!(triangles.len(), 2);
    assert!((hull_area(&points, &triangles) - 1.0).abs() < 1e-12);
}

#[test]
fn interior_point() {
    let points = [
        point(0.0f64, 0.0),
        point(1.0, 1.0),
        point(4.0, 0.0),
        point(0.0, 4.0),
    ];
    let triangles = quad_hull_triangles(&points);
    assert_eq!(triangles.len(), 3);
    for tri in &triangles {
        assert_eq!(tri[2], 1);
    }
    assert!((hull_area(&points, &triangles) - 8.0).abs() < 1e-12);
}

#[test]
fn coincident_points() {
    let points = [
        point(0.0f64, 0.0),
        point(0.0, 0.0),
        point(2.0, 2.0),
        point(4.0, 0.0),
    ];
    let triangles = quad_hull_triangles(&points);
    assert_eq!(triangles.len(), 1);
    assert_eq!(triangles[0], [0, 2, 3]);
}
