//! Shared fixtures for the integration tests and benchmarks.

use vecmesh::geom::CubicBezierSegment;
use vecmesh::math::{point, Point};
use vecmesh::tessellation::Outline;

/// Routes the tessellator's debug output to the test harness.
///
/// Run with `RUST_LOG=debug` to see it.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// `n` points on a circle, counter-clockwise.
pub fn circle(center: Point, radius: f32, n: usize) -> Vec<Point> {
    (0..n)
        .map(|i| {
            let angle = 2.0 * std::f32::consts::PI * i as f32 / n as f32;
            point(center.x + radius * angle.cos(), center.y + radius * angle.sin())
        })
        .collect()
}

/// A ring: a circle with a circular hole.
pub fn ring(radius: f32, n: usize) -> Outline {
    let mut hole = circle(point(0.0, 0.0), radius * 0.5, n / 2);
    hole.reverse();

    let mut builder = Outline::builder();
    builder.add_polygon(&circle(point(0.0, 0.0), radius, n));
    builder.add_polygon(&hole);

    builder.build()
}

/// An uppercase `E`, 3 units wide and 5 units tall.
pub fn letter_e() -> Outline {
    let mut builder = Outline::builder();
    builder.add_polygon(&[
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
    ]);

    builder.build()
}

/// An uppercase `A` with a triangular counter.
pub fn letter_a() -> Outline {
    let mut builder = Outline::builder();
    builder.add_polygon(&[
        point(0.0, 0.0),
        point(1.0, 0.0),
        point(1.5, 2.0),
        point(3.5, 2.0),
        point(4.0, 0.0),
        point(5.0, 0.0),
        point(3.0, 8.0),
        point(2.0, 8.0),
    ]);
    builder.add_polygon(&[point(2.0, 3.0), point(2.5, 5.5), point(3.0, 3.0)]);

    builder.build()
}

/// A comb with `teeth` teeth of height 4.
pub fn comb(teeth: u32) -> Outline {
    let width = (2 * teeth - 1) as f32;
    let mut builder = Outline::builder();
    builder.begin(point(0.0, 0.0)).line_to(point(width, 0.0));
    for i in (0..teeth).rev() {
        let x = (2 * i) as f32;
        builder
            .line_to(point(x + 1.0, 5.0))
            .line_to(point(x, 5.0));
        if i > 0 {
            builder.line_to(point(x, 1.0)).line_to(point(x - 1.0, 1.0));
        }
    }
    builder.close();

    builder.build()
}

/// A regular grid of `n` by `n` points spaced by one unit.
pub fn grid(n: u32) -> Vec<Point> {
    let mut points = Vec::with_capacity((n * n) as usize);
    for y in 0..n {
        for x in 0..n {
            points.push(point(x as f32, y as f32));
        }
    }

    points
}

/// The signed area of a polygon, positive if counter-clockwise.
pub fn polygon_area(polygon: &[Point]) -> f64 {
    let mut area = 0.0;
    for i in 0..polygon.len() {
        let a = polygon[i].to_f64();
        let b = polygon[(i + 1) % polygon.len()].to_f64();
        area += a.x * b.y - b.x * a.y;
    }

    area * 0.5
}

/// The area enclosed by the contours of an outline.
pub fn outline_area(outline: &Outline) -> f64 {
    outline
        .contours()
        .map(|contour| {
            let polygon: Vec<Point> = contour
                .iter()
                .map(|cp| outline.points()[cp.point as usize])
                .collect();
            polygon_area(&polygon)
        })
        .sum()
}

/// The sum of the signed areas of the triangles.
pub fn mesh_area(vertices: &[Point], indices: &[u32]) -> f64 {
    indices
        .chunks_exact(3)
        .map(|t| {
            let a = vertices[t[0] as usize].to_f64();
            let b = vertices[t[1] as usize].to_f64();
            let c = vertices[t[2] as usize].to_f64();
            (b - a).cross(c - a) * 0.5
        })
        .sum()
}

/// A few curves of each family.
pub fn curves() -> Vec<CubicBezierSegment<f32>> {
    vec![
        // Serpentine.
        CubicBezierSegment {
            from: point(0.0, 0.0),
            ctrl1: point(1.0, 2.0),
            ctrl2: point(2.0, -2.0),
            to: point(3.0, 0.0),
        },
        // Loop.
        CubicBezierSegment {
            from: point(0.0, 0.0),
            ctrl1: point(3.0, 3.0),
            ctrl2: point(-1.0, 3.0),
            to: point(2.0, 0.0),
        },
        // Arch.
        CubicBezierSegment {
            from: point(0.0, 0.0),
            ctrl1: point(0.0, 2.0),
            ctrl2: point(4.0, 2.0),
            to: point(4.0, 0.0),
        },
        // Quadratic.
        CubicBezierSegment {
            from: point(0.0, 0.0),
            ctrl1: point(2.0 / 3.0, 2.0 / 3.0),
            ctrl2: point(4.0 / 3.0, 2.0 / 3.0),
            to: point(2.0, 0.0),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use vecmesh::math::Box2D;
    use vecmesh::tessellation::batch::{triangulate_all, Shape};
    use vecmesh::tessellation::curve::fill_cubic;
    use vecmesh::tessellation::{CdtOptions, DelaunayTessellator, VertexBuffers};

    #[test]
    fn fixtures() {
        assert_eq!(polygon_area(letter_e().points()), 10.0);
        assert_eq!(outline_area(&letter_a()), 17.75);
        assert_eq!(comb(5).points().len(), 20);
        assert_eq!(outline_area(&comb(5)), 9.0 + 5.0 * 4.0);
    }

    #[test]
    fn batch_of_outlines() {
        init_logging();

        let outlines = vec![letter_e(), letter_a(), comb(5), comb(12), ring(10.0, 40)];
        let shapes: Vec<Shape> = outlines.iter().cloned().map(Shape::from).collect();
        let results = triangulate_all(&shapes, &CdtOptions::default());

        assert_eq!(results.len(), outlines.len());
        for (outline, result) in outlines.iter().zip(results) {
            let buffers = result.unwrap();
            let expected = outline_area(outline);
            let area = mesh_area(&buffers.vertices, &buffers.indices);
            assert!((area - expected).abs() <= 1e-5 * expected, "{} {}", area, expected);

            // A polygon with n points and h holes has n + 2h - 2 triangles.
            let n = outline.points().len();
            let holes = outline.num_contours() - 1;
            assert_eq!(buffers.triangle_count(), n + 2 * holes - 2);
        }
    }

    #[test]
    fn grid_with_logging() {
        init_logging();

        let points = grid(8);
        let bounds = Box2D {
            min: point(0.0, 0.0),
            max: point(7.0, 7.0),
        };

        let mut tessellator = DelaunayTessellator::new();
        tessellator.set_logging(true);
        let mut buffers: VertexBuffers<Point, u32> = VertexBuffers::new();
        tessellator
            .triangulate(&bounds, &points, &CdtOptions::default(), &mut buffers)
            .unwrap();

        // Every cell of the grid is split in two.
        assert_eq!(buffers.triangle_count(), 2 * 7 * 7);
        assert!((mesh_area(&buffers.vertices, &buffers.indices) - 49.0).abs() < 1e-9);
    }

    #[test]
    fn curve_hulls() {
        let mut vertices = Vec::new();
        for curve in curves() {
            let added = fill_cubic(&curve, &mut vertices);
            assert!(added > 0);
            assert_eq!(added % 3, 0);
        }
    }
}
