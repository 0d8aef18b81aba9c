//! Triangulating many shapes at once.
//!
//! Shapes are independent so each one is a separate unit of work. With the
//! `parallel` feature the shapes are distributed over rayon's thread pool with
//! one tessellator per worker, otherwise they are processed in order on the
//! calling thread. The results are in the order of the shapes either way.

use crate::geometry_builder::VertexBuffers;
use crate::math::{Box2D, Point};
use crate::{CdtOptions, DelaunayTessellator, Outline, TessellationError};

use alloc::vec::Vec;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// The result of the triangulation of one shape.
pub type ShapeResult = Result<VertexBuffers<Point, u32>, TessellationError>;

/// A unit of work.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// A point set to triangulate without constraints.
    Points { bounds: Box2D, points: Vec<Point> },
    /// The interior of an outline.
    Outline(Outline),
}

impl Shape {
    pub fn triangulate(
        &self,
        tessellator: &mut DelaunayTessellator,
        options: &CdtOptions,
    ) -> ShapeResult {
        let mut output = VertexBuffers::with_capacity(0, 0);
        match self {
            Shape::Points { bounds, points } => {
                tessellator.triangulate(bounds, points, options, &mut output)?;
            }
            Shape::Outline(outline) => {
                outline.triangulate(tessellator, options, &mut output)?;
            }
        }

        Ok(output)
    }
}

impl From<Outline> for Shape {
    fn from(outline: Outline) -> Self {
        Shape::Outline(outline)
    }
}

/// Triangulates each shape with the same options.
#[cfg(feature = "parallel")]
pub fn triangulate_all(shapes: &[Shape], options: &CdtOptions) -> Vec<ShapeResult> {
    shapes
        .par_iter()
        .map_init(DelaunayTessellator::new, |tessellator, shape| {
            shape.triangulate(tessellator, options)
        })
        .collect()
}

/// Triangulates each shape with the same options.
#[cfg(not(feature = "parallel"))]
pub fn triangulate_all(shapes: &[Shape], options: &CdtOptions) -> Vec<ShapeResult> {
    let mut tessellator = DelaunayTessellator::new();
    shapes
        .iter()
        .map(|shape| shape.triangulate(&mut tessellator, options))
        .collect()
}

#[cfg(test)]
use crate::math::point;

#[test]
fn test_results_follow_shape_order() {
    let square = [
        point(0.0, 0.0),
        point(1.0, 0.0),
        point(1.0, 1.0),
        point(0.0, 1.0),
    ];
    let mut builder = Outline::builder();
    builder.add_polygon(&square);

    let shapes = alloc::vec![
        Shape::Points {
            bounds: Box2D {
                min: point(0.0, 0.0),
                max: point(1.0, 1.0),
            },
            points: square.to_vec(),
        },
        Shape::Outline(builder.build()),
        // The bounds don't contain the points.
        Shape::Points {
            bounds: Box2D {
                min: point(0.0, 0.0),
                max: point(0.5, 0.5),
            },
            points: square.to_vec(),
        },
        Shape::Points {
            bounds: Box2D::zero(),
            points: Vec::new(),
        },
    ];

    let results = triangulate_all(&shapes, &CdtOptions::default());
    assert_eq!(results.len(), 4);
    assert_eq!(results[0].as_ref().unwrap().triangle_count(), 2);
    assert_eq!(results[1].as_ref().unwrap().triangle_count(), 2);
    assert_eq!(
        results[2].as_ref().err(),
        Some(&TessellationError::PointOutsideBounds { index: 1 })
    );
    assert!(results[3].as_ref().unwrap().is_empty());

    let mut tessellator = DelaunayTessellator::new();
    for (shape, result) in shapes.iter().zip(results.iter()) {
        let sequential = shape.triangulate(&mut tessellator, &CdtOptions::default());
        match (&sequential, result) {
            (Ok(a), Ok(b)) => {
                assert_eq!(a.vertices, b.vertices);
                assert_eq!(a.indices, b.indices);
            }
            _ => assert_eq!(sequential.is_err(), result.is_err()),
        }
    }
}
