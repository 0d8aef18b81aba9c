//! Triangles for rendering cubic bézier curves with their implicit form.
//!
//! A glyph outline is triangulated with its curves replaced by their baselines
//! (the segment joining the endpoints). The area between a curve and its
//! baseline is then covered with the triangles of the curve's control hull.
//! Each hull vertex carries the `(k, l, m)` coordinates computed by the
//! [cubic classifier](../geom/cubic_classification/index.html). Interpolated
//! over a triangle, they let a fragment shader keep the pixels for which
//! `k³ - l·m` is negative and discard the others.
//!
//! Loops that fold over themselves within the curve are split at the double
//! point first, and each half is classified with the orientation the split
//! reported for it.

use crate::geom::CubicBezierSegment;
use crate::math::Point;

use alloc::vec::Vec;

/// A vertex of a curve hull triangle.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct CurveVertex {
    pub position: Point,
    /// The `(k, l, m)` coordinates of the vertex, already oriented.
    pub coords: [f32; 3],
}

impl CurveVertex {
    /// `k³ - l·m`. Zero on the curve.
    #[inline]
    pub fn implicit_value(&self) -> f32 {
        let [k, l, m] = self.coords;
        k * k * k - l * m
    }
}

/// Appends the hull triangles of a cubic bézier curve to `output`, three vertices
/// per triangle.
///
/// Returns the number of vertices added. Straight lines add nothing.
pub fn fill_cubic(curve: &CubicBezierSegment<f32>, output: &mut Vec<CurveVertex>) -> usize {
    let start = output.len();
    let classification = curve.classify();

    match classification.split {
        Some(split) => {
            let (first, second) = curve.split(split.t);
            add_hull(&first, first.classify_with_hint(split.hints[0]), output);
            add_hull(&second, second.classify_with_hint(split.hints[1]), output);
        }
        None => {
            add_hull(curve, classification, output);
        }
    }

    output.len() - start
}

fn add_hull(
    curve: &CubicBezierSegment<f32>,
    classification: crate::geom::CubicClassification<f32>,
    output: &mut Vec<CurveVertex>,
) {
    if classification.is_line() {
        return;
    }

    let coords = classification.oriented_coords();
    let points = curve.points();
    for triangle in curve.hull_triangles() {
        for idx in triangle {
            let i = idx as usize;
            output.push(CurveVertex {
                position: points[i],
                coords: coords[i],
            });
        }
    }
}

#[cfg(test)]
use crate::math::point;

#[cfg(test)]
fn cubic(points: [Point; 4]) -> CubicBezierSegment<f32> {
    CubicBezierSegment {
        from: points[0],
        ctrl1: points[1],
        ctrl2: points[2],
        to: points[3],
    }
}

#[cfg(test)]
fn assert_on_curve(vertex: &CurveVertex) {
    let [k, l, m] = vertex.coords;
    let scale = (k * k * k).abs().max((l * m).abs()).max(1.0);
    assert!(
        vertex.implicit_value().abs() <= 1e-4 * scale,
        "{:?} is not on the curve",
        vertex
    );
}

#[test]
fn test_line_adds_nothing() {
    let mut output = Vec::new();
    let line = cubic([
        point(0.0, 0.0),
        point(1.0, 1.0),
        point(2.0, 2.0),
        point(3.0, 3.0),
    ]);

    assert_eq!(fill_cubic(&line, &mut output), 0);
    assert!(output.is_empty());
}

#[test]
fn test_quadratic_hull() {
    let mut output = Vec::new();
    let curve = cubic([
        point(0.0, 0.0),
        point(1.0, 1.0),
        point(2.0, 1.0),
        point(3.0, 0.0),
    ]);

    // The control points form a convex quad.
    assert_eq!(fill_cubic(&curve, &mut output), 6);

    for v in &output {
        if v.position == curve.from {
            assert_eq!(v.coords, [0.0, 0.0, 0.0]);
        }
        if v.position == curve.to {
            assert_eq!(v.coords, [1.0, 1.0, 1.0]);
        }
    }
}

#[test]
fn test_serpentine_endpoints_are_on_the_curve() {
    let mut output = Vec::new();
    let curve = cubic([
        point(0.0, 0.0),
        point(1.0, 2.0),
        point(2.0, -2.0),
        point(4.0, 1.0),
    ]);

    let n = fill_cubic(&curve, &mut output);
    assert!(n > 0);
    assert_eq!(n % 3, 0);

    let mut endpoints = 0;
    for v in &output {
        if v.position == curve.from || v.position == curve.to {
            assert_on_curve(v);
            endpoints += 1;
        }
    }
    assert!(endpoints >= 2);
}

#[test]
fn test_loop_is_split() {
    let mut output = alloc::vec![CurveVertex {
        position: point(0.0, 0.0),
        coords: [0.0; 3],
    }];
    let curve = cubic([
        point(0.0, 0.0),
        point(3.0, 3.0),
        point(-1.0, 3.0),
        point(2.0, 0.0),
    ]);

    let split = curve.classify().split.unwrap();
    let (first, second) = curve.split(split.t);

    let n = fill_cubic(&curve, &mut output);
    assert_eq!(output.len(), n + 1);
    assert_eq!(n % 3, 0);
    assert_eq!(
        n,
        (first.hull_triangles().len() + second.hull_triangles().len()) * 3
    );

    for v in &output[1..] {
        if v.position == curve.from || v.position == curve.to {
            assert_on_curve(v);
        }
    }
}

#[test]
fn test_random_loops_are_split_once() {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(17);
    let mut splits = 0;
    for _ in 0..2000 {
        let mut points = [point(0.0, 0.0); 4];
        for p in &mut points {
            *p = point(rng.random_range(-10.0..10.0), rng.random_range(-10.0..10.0));
        }
        let curve = cubic(points);

        let split = match curve.classify().split {
            Some(split) => split,
            None => continue,
        };
        splits += 1;
        assert!(split.t > 0.0 && split.t < 1.0);

        // The halves are never split again.
        let (first, second) = curve.split(split.t);
        assert_eq!(first.classify_with_hint(split.hints[0]).split, None);
        assert_eq!(second.classify_with_hint(split.hints[1]).split, None);

        let mut output = Vec::new();
        let n = fill_cubic(&curve, &mut output);
        assert_eq!(n % 3, 0);
        assert!(n <= 18);
    }

    assert!(splits > 0);
}
