//! The input of the constrained tessellator.
//!
//! An [`Outline`](struct.Outline.html) is a set of closed polylines stored the way
//! the tessellator consumes them: a flat point buffer, a contour buffer that
//! refers to the points by index, and the bounding box of the points.
//!
//! Curves are expected to be flattened or replaced by their baselines by the
//! producer of the outline (see the [curve module](../curve/index.html)).
//!
//! ```
//! use vecmesh_tessellation::{CdtOptions, DelaunayTessellator, Outline, VertexBuffers};
//! use vecmesh_tessellation::math::{point, Point};
//!
//! // A square with a square hole.
//! let mut builder = Outline::builder();
//! builder.add_polygon(&[
//!     point(0.0, 0.0),
//!     point(4.0, 0.0),
//!     point(4.0, 4.0),
//!     point(0.0, 4.0),
//! ]);
//! builder.add_polygon(&[
//!     point(1.0, 1.0),
//!     point(1.0, 3.0),
//!     point(3.0, 3.0),
//!     point(3.0, 1.0),
//! ]);
//! let outline = builder.build();
//!
//! let mut buffers: VertexBuffers<Point, u32> = VertexBuffers::new();
//! let mut tessellator = DelaunayTessellator::new();
//! outline.triangulate(&mut tessellator, &CdtOptions::default(), &mut buffers).unwrap();
//!
//! assert_eq!(outline.num_contours(), 2);
//! assert_eq!(buffers.triangle_count(), 8);
//! ```

use crate::geometry_builder::{MaxIndex, VertexBuffers};
use crate::math::{Box2D, Point};
use crate::math_utils::bounding_box;
use crate::{CdtOptions, ContourPoint, DelaunayTessellator, TessellationResult, VertexId};

use alloc::vec::Vec;

/// A set of closed polylines.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Outline {
    points: Vec<Point>,
    contour: Vec<ContourPoint>,
    bounds: Box2D,
}

impl Outline {
    pub fn builder() -> OutlineBuilder {
        OutlineBuilder::new()
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The contour points, grouped by sub-contour.
    #[inline]
    pub fn contour(&self) -> &[ContourPoint] {
        &self.contour
    }

    /// The bounding box of the points. Empty outlines have zero-sized bounds at
    /// the origin.
    #[inline]
    pub fn bounds(&self) -> Box2D {
        self.bounds
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterates over the sub-contours.
    pub fn contours(&self) -> impl Iterator<Item = &[ContourPoint]> + '_ {
        let contour = &self.contour[..];
        let mut start = 0;
        core::iter::from_fn(move || {
            let first = contour.get(start)?;
            let len = contour[start..]
                .iter()
                .take_while(|cp| cp.contour == first.contour)
                .count();
            let sub = &contour[start..start + len];
            start += len;
            Some(sub)
        })
    }

    pub fn num_contours(&self) -> usize {
        self.contours().count()
    }

    /// Triangulates the interior of the outline.
    pub fn triangulate<OutputIndex>(
        &self,
        tessellator: &mut DelaunayTessellator,
        options: &CdtOptions,
        output: &mut VertexBuffers<Point, OutputIndex>,
    ) -> TessellationResult
    where
        OutputIndex: From<VertexId> + MaxIndex,
    {
        tessellator.constrained_triangulate(
            &self.bounds,
            &self.points,
            &self.contour,
            options,
            output,
        )
    }
}

/// Builds an [`Outline`](struct.Outline.html) one closed polyline at a time.
///
/// Sub-contours are implicitly closed: `close` doesn't add any point, and
/// beginning a new sub-contour closes the current one.
#[derive(Clone, Debug, Default)]
pub struct OutlineBuilder {
    points: Vec<Point>,
    contour: Vec<ContourPoint>,
    current_contour: Option<u32>,
    num_contours: u32,
}

impl OutlineBuilder {
    pub fn new() -> Self {
        OutlineBuilder {
            points: Vec::new(),
            contour: Vec::new(),
            current_contour: None,
            num_contours: 0,
        }
    }

    pub fn with_capacity(num_points: usize) -> Self {
        OutlineBuilder {
            points: Vec::with_capacity(num_points),
            contour: Vec::with_capacity(num_points),
            current_contour: None,
            num_contours: 0,
        }
    }

    /// Starts a new sub-contour at `to`.
    pub fn begin(&mut self, to: Point) -> &mut Self {
        self.close();
        self.current_contour = Some(self.num_contours);
        self.num_contours += 1;
        self.push(to);

        self
    }

    /// Adds a point to the current sub-contour, starting one if needed.
    pub fn line_to(&mut self, to: Point) -> &mut Self {
        if self.current_contour.is_none() {
            return self.begin(to);
        }

        self.push(to);

        self
    }

    /// Ends the current sub-contour.
    pub fn close(&mut self) -> &mut Self {
        self.current_contour = None;

        self
    }

    /// Adds a closed polyline.
    pub fn add_polygon(&mut self, polygon: &[Point]) -> &mut Self {
        if let Some((first, rest)) = polygon.split_first() {
            self.begin(*first);
            for p in rest {
                self.line_to(*p);
            }
            self.close();
        }

        self
    }

    pub fn build(mut self) -> Outline {
        self.close();
        let bounds = bounding_box(&self.points).unwrap_or_else(Box2D::zero);

        Outline {
            points: self.points,
            contour: self.contour,
            bounds,
        }
    }

    fn push(&mut self, p: Point) {
        let contour = self.current_contour.unwrap_or(0);
        let index = self.points.len() as u32;
        self.points.push(p);
        self.contour.push(ContourPoint::new(index, contour));
    }
}

#[cfg(test)]
use crate::math::point;

#[test]
fn test_builder_contours() {
    let mut builder = OutlineBuilder::with_capacity(8);
    builder
        .begin(point(0.0, 0.0))
        .line_to(point(2.0, 0.0))
        .line_to(point(1.0, 2.0))
        .close();
    // Begin implicitly closes the previous contour.
    builder.begin(point(5.0, 5.0)).line_to(point(6.0, 5.0));
    builder.begin(point(-1.0, 3.0));
    builder.line_to(point(0.0, 3.0)).line_to(point(0.0, 4.0));
    let outline = builder.build();

    assert_eq!(outline.points().len(), 8);
    assert_eq!(outline.num_contours(), 3);

    let sizes: Vec<usize> = outline.contours().map(|c| c.len()).collect();
    assert_eq!(sizes, alloc::vec![3, 2, 3]);

    for (i, cp) in outline.contour().iter().enumerate() {
        assert_eq!(cp.point as usize, i);
    }
    assert_eq!(outline.contour()[3].contour, 1);
    assert_eq!(outline.contour()[7].contour, 2);

    assert_eq!(outline.bounds().min, point(-1.0, 0.0));
    assert_eq!(outline.bounds().max, point(6.0, 5.0));
}

#[test]
fn test_line_to_without_begin() {
    let mut builder = Outline::builder();
    builder.line_to(point(1.0, 1.0)).line_to(point(2.0, 1.0));
    let outline = builder.build();

    assert_eq!(outline.num_contours(), 1);
    assert_eq!(outline.points().len(), 2);
}

#[test]
fn test_empty_outline() {
    let outline = Outline::builder().build();
    assert!(outline.is_empty());
    assert_eq!(outline.num_contours(), 0);
    assert_eq!(outline.bounds(), Box2D::zero());

    let mut buffers: VertexBuffers<Point, u32> = VertexBuffers::new();
    outline
        .triangulate(
            &mut DelaunayTessellator::new(),
            &CdtOptions::default(),
            &mut buffers,
        )
        .unwrap();
    assert!(buffers.vertices.is_empty());
    assert!(buffers.is_empty());
}

#[test]
fn test_triangulate_polygon_with_hole() {
    let mut builder = Outline::builder();
    builder.add_polygon(&[
        point(0.0, 0.0),
        point(4.0, 0.0),
        point(4.0, 4.0),
        point(0.0, 4.0),
    ]);
    builder.add_polygon(&[
        point(1.0, 1.0),
        point(1.0, 3.0),
        point(3.0, 3.0),
        point(3.0, 1.0),
    ]);
    let outline = builder.build();

    let mut buffers: VertexBuffers<Point, u32> = VertexBuffers::new();
    outline
        .triangulate(
            &mut DelaunayTessellator::new(),
            &CdtOptions::default(),
            &mut buffers,
        )
        .unwrap();

    let mut area = 0.0;
    for t in buffers.triangles() {
        let a = buffers.vertices[t[0] as usize];
        let b = buffers.vertices[t[1] as usize];
        let c = buffers.vertices[t[2] as usize];
        let signed = (b - a).cross(c - a) * 0.5;
        assert!(signed > 0.0);
        area += signed;
    }

    assert!((area - 12.0).abs() < 1e-4);
}
