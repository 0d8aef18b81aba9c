//! Various math tools that are mostly useful for the tessellators.

use crate::delaunay::DPoint;
use crate::math::{Box2D, Point};
use crate::VertexId;

use alloc::vec::Vec;

/// Area of the convex hull of a point set.
///
/// Andrew's monotone chain. Collinear points on the hull are dropped, fewer
/// than three distinct points have an area of zero.
pub fn convex_hull_area(points: &[DPoint]) -> f64 {
    let mut sorted: Vec<DPoint> = points.to_vec();
    sorted.sort_by(|a, b| {
        a.x.partial_cmp(&b.x)
            .unwrap_or(core::cmp::Ordering::Equal)
            .then(a.y.partial_cmp(&b.y).unwrap_or(core::cmp::Ordering::Equal))
    });
    sorted.dedup();

    if sorted.len() < 3 {
        return 0.0;
    }

    fn turn(o: DPoint, a: DPoint, b: DPoint) -> f64 {
        (a - o).cross(b - o)
    }

    let mut hull: Vec<DPoint> = Vec::with_capacity(sorted.len() * 2);
    for &p in &sorted {
        while hull.len() >= 2 && turn(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }

    let lower_len = hull.len() + 1;
    for &p in sorted.iter().rev().skip(1) {
        while hull.len() >= lower_len && turn(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }
    // The last point is the first one.
    hull.pop();

    polygon_area(&hull)
}

/// The vertices on the boundary of the convex hull, counter-clockwise.
///
/// Unlike `convex_hull_area`, points in the middle of a hull edge are kept so
/// that consecutive vertices are never separated by another point. Returns an
/// empty vector if the points are collinear.
pub fn convex_hull(positions: &[DPoint], vertices: &[VertexId]) -> Vec<VertexId> {
    let position = |v: VertexId| positions[v.to_usize()];

    let mut sorted: Vec<VertexId> = vertices.to_vec();
    sorted.sort_by(|a, b| {
        let (pa, pb) = (position(*a), position(*b));
        pa.x.partial_cmp(&pb.x)
            .unwrap_or(core::cmp::Ordering::Equal)
            .then(pa.y.partial_cmp(&pb.y).unwrap_or(core::cmp::Ordering::Equal))
    });
    sorted.dedup_by(|a, b| position(*a) == position(*b));

    if sorted.len() < 3 {
        return Vec::new();
    }

    let turn = |o: VertexId, a: VertexId, b: VertexId| {
        (position(a) - position(o)).cross(position(b) - position(o))
    };

    let mut hull: Vec<VertexId> = Vec::with_capacity(sorted.len() * 2);
    for &v in &sorted {
        while hull.len() >= 2 && turn(hull[hull.len() - 2], hull[hull.len() - 1], v) < 0.0 {
            hull.pop();
        }
        hull.push(v);
    }

    let lower_len = hull.len() + 1;
    for &v in sorted.iter().rev().skip(1) {
        while hull.len() >= lower_len && turn(hull[hull.len() - 2], hull[hull.len() - 1], v) < 0.0 {
            hull.pop();
        }
        hull.push(v);
    }
    hull.pop();

    let outline: Vec<DPoint> = hull.iter().map(|v| position(*v)).collect();
    if polygon_area(&outline) <= 0.0 {
        return Vec::new();
    }

    hull
}

/// Signed area of a closed polygon, positive if counter-clockwise.
pub fn polygon_area(polygon: &[DPoint]) -> f64 {
    if polygon.len() < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    let mut prev = polygon[polygon.len() - 1];
    for &p in polygon {
        area += prev.x * p.y - p.x * prev.y;
        prev = p;
    }

    area * 0.5
}

/// The smallest rectangle containing all of the points.
///
/// Returns `None` for an empty slice.
pub fn bounding_box(points: &[Point]) -> Option<Box2D> {
    let first = *points.first()?;
    let mut min = first;
    let mut max = first;
    for p in &points[1..] {
        min = min.min(*p);
        max = max.max(*p);
    }

    Some(Box2D { min, max })
}

/// Returns true if the box has no NaN coordinate and isn't inverted.
///
/// A box reduced to a point or a segment is valid.
pub fn is_valid_bounds(bounds: &Box2D) -> bool {
    let coords = [bounds.min.x, bounds.min.y, bounds.max.x, bounds.max.y];
    !coords.iter().any(|c| c.is_nan()) && bounds.min.x <= bounds.max.x && bounds.min.y <= bounds.max.y
}

/// Same as `Box2D::contains` with the max edges included.
#[inline]
pub fn bounds_contain(bounds: &Box2D, p: Point) -> bool {
    p.x >= bounds.min.x && p.x <= bounds.max.x && p.y >= bounds.min.y && p.y <= bounds.max.y
}

#[cfg(test)]
use crate::math::point;

#[test]
fn test_convex_hull_area() {
    use crate::geom::point;

    let square = [
        point(0.0, 0.0),
        point(1.0, 0.0),
        point(1.0, 1.0),
        point(0.0, 1.0),
        point(0.5, 0.5),
        point(0.5, 0.0),
    ];
    assert!((convex_hull_area(&square) - 1.0).abs() < 1e-12);

    // An L shape covers the bounding square.
    let l_shape = [
        point(0.0, 0.0),
        point(2.0, 0.0),
        point(2.0, 1.0),
        point(1.0, 1.0),
        point(1.0, 2.0),
        point(0.0, 2.0),
    ];
    assert!((convex_hull_area(&l_shape) - 3.5).abs() < 1e-12);

    let collinear = [point(0.0, 0.0), point(1.0, 1.0), point(2.0, 2.0)];
    assert_eq!(convex_hull_area(&collinear), 0.0);
    assert_eq!(convex_hull_area(&[]), 0.0);
}

#[test]
fn test_convex_hull_keeps_points_on_edges() {
    use crate::geom::point;

    let positions = [
        point(0.0, 0.0),
        point(1.0, 1.0),
        point(2.0, 0.0),
        point(2.0, 2.0),
        point(0.0, 2.0),
        point(0.0, 1.0),
        point(4.0, 0.0),
    ];
    let vertices: Vec<VertexId> = (0..positions.len() as u32).map(VertexId).collect();

    let hull = convex_hull(&positions, &vertices);
    assert_eq!(
        hull,
        alloc::vec![
            VertexId(0),
            VertexId(2),
            VertexId(6),
            VertexId(3),
            VertexId(4),
            VertexId(5),
        ]
    );

    let collinear = [point(0.0, 0.0), point(1.0, 1.0), point(3.0, 3.0)];
    assert!(convex_hull(&collinear, &vertices[..3]).is_empty());
}

#[test]
fn test_polygon_area() {
    use crate::geom::point;

    let ccw = [point(0.0, 0.0), point(4.0, 0.0), point(0.0, 3.0)];
    assert_eq!(polygon_area(&ccw), 6.0);

    let cw = [point(0.0, 0.0), point(0.0, 3.0), point(4.0, 0.0)];
    assert_eq!(polygon_area(&cw), -6.0);
}

#[test]
fn test_bounds() {
    let points = [point(1.0, 2.0), point(-1.0, 5.0), point(3.0, 0.0)];
    let bounds = bounding_box(&points).unwrap();
    assert_eq!(bounds.min, point(-1.0, 0.0));
    assert_eq!(bounds.max, point(3.0, 5.0));
    assert!(bounds_contain(&bounds, point(3.0, 5.0)));
    assert!(!bounds_contain(&bounds, point(3.1, 5.0)));
    assert!(is_valid_bounds(&bounds));

    assert!(bounding_box(&[]).is_none());

    let inverted = Box2D {
        min: point(1.0, 0.0),
        max: point(0.0, 1.0),
    };
    assert!(!is_valid_bounds(&inverted));

    let nan = Box2D {
        min: point(f32::NAN, 0.0),
        max: point(0.0, 1.0),
    };
    assert!(!is_valid_bounds(&nan));
}
