use crate::geometry_builder::VertexBuffers;
use crate::math::*;
use crate::{
    constrained_triangulate, triangulate, CdtOptions, ContourPoint, DelaunayTessellator,
    InvalidContourError, Outline, Side, TessellationError, UnsupportedParameter,
};

use alloc::vec::Vec;
use core::f32::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn build_contours(contours: &[&[Point]]) -> (Vec<Point>, Vec<ContourPoint>) {
    let mut points = Vec::new();
    let mut contour = Vec::new();
    for (c, polygon) in contours.iter().enumerate() {
        for p in polygon.iter() {
            contour.push(ContourPoint::new(points.len() as u32, c as u32));
            points.push(*p);
        }
    }

    (points, contour)
}

fn bounds_of(points: &[Point]) -> Box2D {
    let mut min = points[0];
    let mut max = points[0];
    for p in points {
        min = min.min(*p);
        max = max.max(*p);
    }

    Box2D { min, max }
}

fn triangle_points(buffers: &VertexBuffers<Point, u32>, t: [u32; 3]) -> [Point; 3] {
    [
        buffers.vertices[t[0] as usize],
        buffers.vertices[t[1] as usize],
        buffers.vertices[t[2] as usize],
    ]
}

fn signed_area(t: [Point; 3]) -> f64 {
    let [a, b, c] = t;
    let (a, b, c) = (a.to_f64(), b.to_f64(), c.to_f64());
    (b - a).cross(c - a) * 0.5
}

fn polygon_area(polygon: &[Point]) -> f64 {
    let mut area = 0.0;
    for i in 0..polygon.len() {
        let a = polygon[i].to_f64();
        let b = polygon[(i + 1) % polygon.len()].to_f64();
        area += a.x * b.y - b.x * a.y;
    }

    area * 0.5
}

/// Even-odd test.
fn is_inside(p: Point, contours: &[&[Point]]) -> bool {
    let p = p.to_f64();
    let mut inside = false;
    for polygon in contours {
        let n = polygon.len();
        for i in 0..n {
            let a = polygon[i].to_f64();
            let b = polygon[(i + n - 1) % n].to_f64();
            if (a.y > p.y) != (b.y > p.y) {
                let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if p.x < x {
                    inside = !inside;
                }
            }
        }
    }

    inside
}

fn has_edge(buffers: &VertexBuffers<Point, u32>, a: u32, b: u32) -> bool {
    buffers.triangles().any(|t| t.contains(&a) && t.contains(&b))
}

fn check_indices(buffers: &VertexBuffers<Point, u32>) {
    assert_eq!(buffers.indices.len() % 3, 0);
    for &i in &buffers.indices {
        assert!((i as usize) < buffers.vertices.len());
    }
}

/// Triangulates the contours and checks that the result covers exactly the
/// interior of the contours.
///
/// The area of the contours is counted positively for counter-clockwise
/// outer contours when the interior is on the left.
fn test_contours(contours: &[&[Point]], options: &CdtOptions) -> VertexBuffers<Point, u32> {
    let (points, contour) = build_contours(contours);
    let mut buffers: VertexBuffers<Point, u32> = VertexBuffers::new();
    let mut tess = DelaunayTessellator::new();
    tess.constrained_triangulate(&bounds_of(&points), &points, &contour, options, &mut buffers)
        .unwrap();

    check_indices(&buffers);
    assert_eq!(buffers.vertices, points);

    let mut area = 0.0;
    for t in buffers.triangles() {
        let tri = triangle_points(&buffers, t);
        let signed = signed_area(tri);
        assert!(signed > 0.0, "triangle {:?} is not counter-clockwise", tri);
        area += signed;

        let centroid = point(
            (tri[0].x + tri[1].x + tri[2].x) / 3.0,
            (tri[0].y + tri[1].y + tri[2].y) / 3.0,
        );
        assert!(is_inside(centroid, contours), "triangle {:?} is outside", tri);
    }

    let mut expected: f64 = contours.iter().map(|c| polygon_area(c)).sum();
    if options.interior == Side::Right {
        expected = -expected;
    }
    assert!(
        (area - expected).abs() <= 1e-5 * expected.abs().max(1.0),
        "area {} expected {}",
        area,
        expected
    );

    for i in 0..contour.len() {
        let next = contour
            .get(i + 1)
            .filter(|cp| cp.contour == contour[i].contour)
            .unwrap_or_else(|| {
                contour
                    .iter()
                    .find(|cp| cp.contour == contour[i].contour)
                    .unwrap()
            });
        assert!(
            has_edge(&buffers, contour[i].point, next.point),
            "missing edge {}-{}",
            contour[i].point,
            next.point
        );
    }

    buffers
}

/// Checks that no point is inside of the circumcircle of a triangle.
fn check_delaunay(buffers: &VertexBuffers<Point, u32>) {
    for t in buffers.triangles() {
        let tri = triangle_points(buffers, t);
        let circle = crate::geom::Circumcircle::new(tri[0].to_f64(), tri[1].to_f64(), tri[2].to_f64());
        for (i, p) in buffers.vertices.iter().enumerate() {
            if t.contains(&(i as u32)) || tri.contains(p) {
                continue;
            }

            let d = (p.to_f64() - circle.center).square_length();
            assert!(
                d >= circle.square_radius * (1.0 - 1e-9),
                "point {:?} is inside of the circumcircle of {:?}",
                p,
                tri
            );
        }
    }
}

fn total_area(buffers: &VertexBuffers<Point, u32>) -> f64 {
    buffers
        .triangles()
        .map(|t| signed_area(triangle_points(buffers, t)))
        .sum()
}

fn circle(center: Point, radius: f32, n: usize) -> Vec<Point> {
    (0..n)
        .map(|i| {
            let angle = 2.0 * PI * i as f32 / n as f32;
            point(center.x + radius * angle.cos(), center.y + radius * angle.sin())
        })
        .collect()
}

fn rotated(polygon: &[Point], angle: f32) -> Vec<Point> {
    let (s, c) = (angle.sin(), angle.cos());
    polygon
        .iter()
        .map(|p| point(p.x * c - p.y * s, p.x * s + p.y * c))
        .collect()
}

fn l_shape() -> Vec<Point> {
    alloc::vec![
        point(0.0, 0.0),
        point(2.0, 0.0),
        point(2.0, 1.0),
        point(1.0, 1.0),
        point(1.0, 2.0),
        point(0.0, 2.0),
    ]
}

fn e_shape() -> Vec<Point> {
    alloc::vec![
        point(0.0, 0.0),
        point(3.0, 0.0),
        point(3.0, 1.0),
        point(1.0, 1.0),
        point(1.0, 2.0),
        point(2.0, 2.0),
        point(2.0, 3.0),
        point(1.0, 3.0),
        point(1.0, 4.0),
        point(3.0, 4.0),
        point(3.0, 5.0),
        point(0.0, 5.0),
    ]
}

fn comb() -> Vec<Point> {
    alloc::vec![
        point(0.0, 0.0),
        point(10.0, 0.0),
        point(10.0, 5.0),
        point(9.0, 5.0),
        point(9.0, 1.0),
        point(8.0, 1.0),
        point(8.0, 5.0),
        point(7.0, 5.0),
        point(7.0, 1.0),
        point(6.0, 1.0),
        point(6.0, 5.0),
        point(5.0, 5.0),
        point(5.0, 1.0),
        point(4.0, 1.0),
        point(4.0, 5.0),
        point(3.0, 5.0),
        point(3.0, 1.0),
        point(2.0, 1.0),
        point(2.0, 5.0),
        point(1.0, 5.0),
        point(1.0, 1.0),
        point(0.0, 1.0),
    ]
}

#[test]
fn test_square() {
    let square = [
        point(0.0, 0.0),
        point(1.0, 0.0),
        point(1.0, 1.0),
        point(0.0, 1.0),
    ];

    let buffers = triangulate(point(0.0, 0.0), point(1.0, 1.0), &square).unwrap();
    check_indices(&buffers);
    assert_eq!(buffers.vertices.len(), 4);
    assert_eq!(buffers.triangle_count(), 2);
    assert!((total_area(&buffers) - 1.0).abs() < 1e-9);

    let buffers = test_contours(&[&square], &CdtOptions::default());
    assert_eq!(buffers.triangle_count(), 2);
}

#[test]
fn test_l_shape() {
    let buffers = test_contours(&[&l_shape()], &CdtOptions::default());
    assert_eq!(buffers.triangle_count(), 4);
}

#[test]
fn test_l_shape_rotations() {
    for i in 0..37 {
        let shape = rotated(&l_shape(), i as f32 * 0.17);
        let buffers = test_contours(&[&shape], &CdtOptions::default());
        assert_eq!(buffers.triangle_count(), 4);
    }
}

#[test]
fn test_e_shape() {
    let buffers = test_contours(&[&e_shape()], &CdtOptions::default());
    assert_eq!(buffers.triangle_count(), 10);

    for i in 0..37 {
        let shape = rotated(&e_shape(), i as f32 * 0.17);
        test_contours(&[&shape], &CdtOptions::default());
    }
}

#[test]
fn test_comb() {
    let buffers = test_contours(&[&comb()], &CdtOptions::default());
    assert_eq!(buffers.triangle_count(), 20);

    for i in 0..37 {
        let shape = rotated(&comb(), i as f32 * 0.17);
        test_contours(&[&shape], &CdtOptions::default());
    }
}

#[test]
fn test_square_with_hole() {
    let outer = [
        point(0.0, 0.0),
        point(4.0, 0.0),
        point(4.0, 4.0),
        point(0.0, 4.0),
    ];
    let hole = [
        point(1.0, 1.0),
        point(1.0, 3.0),
        point(3.0, 3.0),
        point(3.0, 1.0),
    ];

    let buffers = test_contours(&[&outer, &hole], &CdtOptions::default());
    assert_eq!(buffers.triangle_count(), 8);
}

#[test]
fn test_annulus() {
    let outer = circle(point(0.0, 0.0), 10.0, 40);
    let mut hole = circle(point(0.0, 0.0), 5.0, 24);
    hole.reverse();

    let buffers = test_contours(&[&outer, &hole], &CdtOptions::default());
    assert_eq!(buffers.triangle_count(), 64);
}

#[test]
fn test_star() {
    // Every other point is on the same circle.
    let star: Vec<Point> = (0..20)
        .map(|i| {
            let angle = 2.0 * PI * i as f32 / 20.0;
            let radius = if i % 2 == 0 { 10.0 } else { 3.0 };
            point(radius * angle.cos(), radius * angle.sin())
        })
        .collect();

    let buffers = test_contours(&[&star], &CdtOptions::default());
    assert_eq!(buffers.triangle_count(), 18);
}

#[test]
fn test_zigzag() {
    let mut zigzag = Vec::new();
    for i in 0..11 {
        let y = if i % 2 == 1 { 0.3 } else { 0.0 };
        zigzag.push(point(i as f32, y));
    }
    for i in (0..11).rev() {
        let y = if i % 2 == 1 { 0.9 } else { 0.6 };
        zigzag.push(point(i as f32, y));
    }

    let buffers = test_contours(&[&zigzag], &CdtOptions::default());
    assert_eq!(buffers.triangle_count(), 20);
}

#[test]
fn test_spike() {
    // The fourth point is close to the bottom edge.
    let spike = [
        point(0.0, 0.0),
        point(10.0, 0.0),
        point(10.0, 1.0),
        point(5.0, 0.2),
        point(0.0, 1.0),
    ];

    let buffers = triangulate(point(0.0, 0.0), point(10.0, 1.0), &spike).unwrap();
    check_indices(&buffers);
    assert!((total_area(&buffers) - 10.0).abs() < 1e-5);
    check_delaunay(&buffers);

    let buffers = test_contours(&[&spike], &CdtOptions::default());
    assert_eq!(buffers.triangle_count(), 3);
}

#[test]
fn test_separate_contours() {
    let a = [
        point(0.0, 0.0),
        point(1.0, 0.0),
        point(1.0, 1.0),
        point(0.0, 1.0),
    ];
    let b = [
        point(2.0, 0.0),
        point(3.0, 0.0),
        point(3.0, 1.0),
        point(2.0, 1.0),
    ];

    let buffers = test_contours(&[&a, &b], &CdtOptions::default());
    assert_eq!(buffers.triangle_count(), 4);
}

#[test]
fn test_clockwise_contour() {
    let mut shape = l_shape();
    shape.reverse();

    let buffers = test_contours(&[&shape], &CdtOptions::clockwise());
    assert_eq!(buffers.triangle_count(), 4);
}

#[test]
fn test_closing_point_repeated() {
    let mut shape = l_shape();
    shape.push(point(0.0, 0.0));
    let (points, contour) = build_contours(&[&shape]);

    let buffers =
        constrained_triangulate(point(0.0, 0.0), point(2.0, 2.0), &points, &contour).unwrap();
    check_indices(&buffers);
    assert_eq!(buffers.vertices.len(), 7);
    assert_eq!(buffers.triangle_count(), 4);
    assert!((total_area(&buffers) - 3.0).abs() < 1e-9);
    // The duplicate is never referenced.
    assert!(!buffers.indices.contains(&6));
}

#[test]
fn test_duplicate_points() {
    let square = [
        point(0.0, 0.0),
        point(1.0, 0.0),
        point(1.0, 1.0),
        point(0.0, 1.0),
    ];
    let mut with_duplicate = square.to_vec();
    with_duplicate.push(point(1.0, 1.0));

    let a = triangulate(point(0.0, 0.0), point(1.0, 1.0), &square).unwrap();
    let b = triangulate(point(0.0, 0.0), point(1.0, 1.0), &with_duplicate).unwrap();

    assert_eq!(b.vertices.len(), 5);
    assert_eq!(a.indices, b.indices);
    assert!(!b.indices.contains(&4));
}

#[test]
fn test_degenerate_inputs() {
    let min = point(-1.0, -1.0);
    let max = point(5.0, 5.0);

    let empty = triangulate(min, max, &[]).unwrap();
    assert!(empty.vertices.is_empty());
    assert!(empty.is_empty());

    let two = [point(0.0, 0.0), point(1.0, 1.0)];
    let buffers = triangulate(min, max, &two).unwrap();
    assert_eq!(buffers.vertices.len(), 2);
    assert!(buffers.is_empty());

    let collinear = [point(0.0, 0.0), point(1.0, 1.0), point(3.0, 3.0)];
    assert!(triangulate(min, max, &collinear).unwrap().is_empty());

    let same = [point(1.0, 1.0); 5];
    assert!(triangulate(min, max, &same).unwrap().is_empty());

    // A contour with two points has no interior.
    let contour = [ContourPoint::new(0, 0), ContourPoint::new(1, 0)];
    let buffers = constrained_triangulate(min, max, &two, &contour).unwrap();
    assert!(buffers.is_empty());

    // No contour at all.
    let square = [
        point(0.0, 0.0),
        point(1.0, 0.0),
        point(1.0, 1.0),
        point(0.0, 1.0),
    ];
    assert!(constrained_triangulate(min, max, &square, &[])
        .unwrap()
        .is_empty());
}

#[test]
fn test_thin_triangle() {
    let points = [point(0.0, 0.0), point(5.0, 0.0), point(2.0, 0.01)];
    let buffers = triangulate(point(0.0, 0.0), point(5.0, 0.01), &points).unwrap();
    assert_eq!(buffers.triangle_count(), 1);
    assert!((total_area(&buffers) - 0.025).abs() < 1e-6);
}

#[test]
fn test_invalid_parameters() {
    let square = [
        point(0.0, 0.0),
        point(1.0, 0.0),
        point(1.0, 1.0),
        point(0.0, 1.0),
    ];
    let bounds = Box2D {
        min: point(0.0, 0.0),
        max: point(1.0, 1.0),
    };
    let mut tess = DelaunayTessellator::new();
    let mut buffers: VertexBuffers<Point, u32> = VertexBuffers::new();

    assert_eq!(
        tess.triangulate(&bounds, &square, &CdtOptions::margin(0.0), &mut buffers),
        Err(TessellationError::UnsupportedParameter(
            UnsupportedParameter::InvalidMargin
        ))
    );
    assert_eq!(
        tess.triangulate(&bounds, &square, &CdtOptions::margin(f32::NAN), &mut buffers),
        Err(UnsupportedParameter::InvalidMargin.into())
    );

    let inverted = Box2D {
        min: point(1.0, 1.0),
        max: point(0.0, 0.0),
    };
    assert_eq!(
        tess.triangulate(&inverted, &square, &CdtOptions::default(), &mut buffers),
        Err(UnsupportedParameter::InvalidBounds.into())
    );

    let nan = [point(0.0, 0.0), point(f32::NAN, 0.0), point(1.0, 1.0)];
    assert_eq!(
        tess.triangulate(&bounds, &nan, &CdtOptions::default(), &mut buffers),
        Err(UnsupportedParameter::PositionIsNaN.into())
    );

    let small = Box2D {
        min: point(0.0, 0.0),
        max: point(1.0, 0.5),
    };
    assert_eq!(
        tess.triangulate(&small, &square, &CdtOptions::default(), &mut buffers),
        Err(TessellationError::PointOutsideBounds { index: 2 })
    );

    // Nothing is written on error.
    assert!(buffers.vertices.is_empty());
    assert!(buffers.is_empty());
}

#[test]
fn test_u16_index_overflow() {
    let square = [
        point(0.0, 0.0),
        point(1.0, 0.0),
        point(1.0, 1.0),
        point(0.0, 1.0),
    ];
    let (points, contour) = build_contours(&[&square]);
    let bounds = Box2D {
        min: point(0.0, 0.0),
        max: point(1.0, 1.0),
    };
    let mut tess = DelaunayTessellator::new();

    // The four points would get indices up to 65535.
    let mut buffers: VertexBuffers<Point, u16> = VertexBuffers::new();
    buffers.vertices.resize(65532, point(5.0, 5.0));
    assert_eq!(
        tess.triangulate(&bounds, &square, &CdtOptions::default(), &mut buffers),
        Err(TessellationError::TooManyVertices)
    );
    assert_eq!(
        tess.constrained_triangulate(
            &bounds,
            &points,
            &contour,
            &CdtOptions::default(),
            &mut buffers
        ),
        Err(TessellationError::TooManyVertices)
    );
    assert_eq!(buffers.vertices.len(), 65532);
    assert!(buffers.indices.is_empty());

    // The largest index that fits is 65534.
    buffers.vertices.truncate(65531);
    tess.triangulate(&bounds, &square, &CdtOptions::default(), &mut buffers)
        .unwrap();
    assert_eq!(buffers.vertices.len(), 65535);
    assert_eq!(buffers.triangle_count(), 2);
    assert!(buffers.indices.iter().all(|&i| (65531..65535).contains(&i)));

    // u32 indices have room for it.
    let mut buffers: VertexBuffers<Point, u32> = VertexBuffers::new();
    buffers.vertices.resize(65534, point(5.0, 5.0));
    tess.triangulate(&bounds, &square, &CdtOptions::default(), &mut buffers)
        .unwrap();
    assert!(buffers.indices.iter().all(|&i| (65534..65538).contains(&i)));
}

#[test]
fn test_invalid_contours() {
    let square = [
        point(0.0, 0.0),
        point(1.0, 0.0),
        point(1.0, 1.0),
        point(0.0, 1.0),
    ];
    let min = point(0.0, 0.0);
    let max = point(1.0, 1.0);

    let out_of_range = [
        ContourPoint::new(0, 0),
        ContourPoint::new(1, 0),
        ContourPoint::new(4, 0),
    ];
    assert_eq!(
        constrained_triangulate(min, max, &square, &out_of_range).map(|_| ()),
        Err(TessellationError::InvalidContour(
            InvalidContourError::PointOutOfRange { index: 2, point: 4 }
        ))
    );

    let interleaved = [
        ContourPoint::new(0, 0),
        ContourPoint::new(1, 1),
        ContourPoint::new(2, 0),
    ];
    assert_eq!(
        constrained_triangulate(min, max, &square, &interleaved).map(|_| ()),
        Err(InvalidContourError::NonContiguousContour { contour: 0 }.into())
    );
}

#[test]
fn test_output_accumulation() {
    let mut buffers: VertexBuffers<Point, u32> = VertexBuffers::new();
    let mut tess = DelaunayTessellator::new();
    let options = CdtOptions::default();

    let mut builder = Outline::builder();
    builder.add_polygon(&l_shape());
    let l = builder.build();

    let mut builder = Outline::builder();
    builder.add_polygon(&e_shape());
    let e = builder.build();

    l.triangulate(&mut tess, &options, &mut buffers).unwrap();
    e.triangulate(&mut tess, &options, &mut buffers).unwrap();

    check_indices(&buffers);
    assert_eq!(buffers.vertices.len(), 18);
    assert_eq!(buffers.triangle_count(), 14);
    for (i, t) in buffers.triangles().enumerate() {
        if i < 4 {
            assert!(t.iter().all(|&v| v < 6));
        } else {
            assert!(t.iter().all(|&v| v >= 6));
        }
    }
}

#[test]
fn test_margin_and_logging() {
    let mut tess = DelaunayTessellator::new();
    tess.set_logging(true);

    for margin in [0.01, 1.0, 100.0] {
        let points = e_shape();
        let (points, contour) = build_contours(&[&points]);
        let mut buffers: VertexBuffers<Point, u32> = VertexBuffers::new();
        tess.constrained_triangulate(
            &bounds_of(&points),
            &points,
            &contour,
            &CdtOptions::margin(margin),
            &mut buffers,
        )
        .unwrap();
        assert_eq!(buffers.triangle_count(), 10);
        assert!((total_area(&buffers) - 10.0).abs() < 1e-9);

        let mut buffers: VertexBuffers<Point, u32> = VertexBuffers::new();
        tess.triangulate(
            &bounds_of(&points),
            &points,
            &CdtOptions::margin(margin),
            &mut buffers,
        )
        .unwrap();
        assert!((total_area(&buffers) - 15.0).abs() < 1e-9);
    }
}

#[test]
fn test_random_points_delaunay() {
    let mut rng = StdRng::seed_from_u64(5);

    for _ in 0..100 {
        let n = rng.random_range(3..60);
        let points: Vec<Point> = (0..n)
            .map(|_| point(rng.random_range(0.0..100.0), rng.random_range(0.0..100.0)))
            .collect();

        let buffers = triangulate(point(0.0, 0.0), point(100.0, 100.0), &points).unwrap();
        check_indices(&buffers);
        check_delaunay(&buffers);

        let hull: Vec<_> = points.iter().map(|p| p.to_f64()).collect();
        let expected = crate::math_utils::convex_hull_area(&hull);
        let area = total_area(&buffers);
        assert!((area - expected).abs() <= 1e-9 * expected.max(1.0));

        for t in buffers.triangles() {
            assert!(signed_area(triangle_points(&buffers, t)) > 0.0);
        }
    }
}

#[test]
fn test_random_grid_points() {
    // Lots of collinear and cocircular points.
    let mut rng = StdRng::seed_from_u64(11);

    for _ in 0..100 {
        let n = rng.random_range(3..60);
        let points: Vec<Point> = (0..n)
            .map(|_| {
                point(
                    rng.random_range(0..7) as f32,
                    rng.random_range(0..7) as f32,
                )
            })
            .collect();

        let buffers = triangulate(point(0.0, 0.0), point(6.0, 6.0), &points).unwrap();
        check_indices(&buffers);
        check_delaunay(&buffers);

        let hull: Vec<_> = points.iter().map(|p| p.to_f64()).collect();
        let expected = crate::math_utils::convex_hull_area(&hull);
        assert!((total_area(&buffers) - expected).abs() <= 1e-9 * expected.max(1.0));
    }
}

#[test]
fn test_random_star_polygons() {
    let mut rng = StdRng::seed_from_u64(3);

    for scale in [1.0, 100.0, 2048.0] {
        for _ in 0..50 {
            let n = rng.random_range(5..30);
            // Sorted angles less than a half turn apart around the origin make a
            // simple polygon.
            let polygon: Vec<Point> = (0..n)
                .map(|i| {
                    let angle = (i as f32 + rng.random_range(0.0..0.8)) * 2.0 * PI / n as f32;
                    let radius = rng.random_range(2.0..10.0) * scale;
                    point(radius * angle.cos(), radius * angle.sin())
                })
                .collect();

            let buffers = test_contours(&[&polygon], &CdtOptions::default());
            assert_eq!(buffers.triangle_count(), n - 2);
        }
    }
}
