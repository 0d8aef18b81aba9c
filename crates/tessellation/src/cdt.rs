use crate::constraint::{collect_segments, ConstraintEnforcer};
use crate::delaunay::{DelaunayMesh, Edge};
use crate::geometry_builder::{MaxIndex, VertexBuffers};
use crate::math::{Box2D, Point};
use crate::math_utils::{bounds_contain, convex_hull, convex_hull_area, is_valid_bounds};
use crate::{
    CdtOptions, ContourPoint, InvalidContourError, Side, TessellationError, TessellationResult,
    UnsupportedParameter, VertexId,
};

use alloc::collections::btree_set::BTreeSet;
use alloc::vec::Vec;

/// Constrained Delaunay tessellator.
///
/// ## Overview
///
/// The tessellator triangulates point sets (`triangulate`) and the interior of
/// closed contours (`constrained_triangulate`). It appends the input points to the
/// vertex buffer of the output and the triangles to its index buffer. Triangles
/// are wound counter-clockwise in a y-up coordinate system.
///
/// Each call is independent: the scratch data of a triangulation is dropped when
/// the call returns. Separate shapes can be triangulated in parallel with one
/// tessellator per thread, see the `batch` module.
///
/// ## Bounds
///
/// The triangulation is seeded with a rectangle around the `bounds` parameter
/// (inflated by `CdtOptions::margin`), so the bounds must contain all of the
/// points. Smaller bounds are rejected with `TessellationError::PointOutsideBounds`.
///
/// ## Duplicate points
///
/// A point at the same position as an earlier point is skipped. It is still
/// written to the vertex buffer but no triangle refers to it: contours that
/// refer to it are connected to the earlier point instead.
///
/// ## Examples
///
/// ```
/// use vecmesh_tessellation::{CdtOptions, ContourPoint, DelaunayTessellator, VertexBuffers};
/// use vecmesh_tessellation::math::{point, Box2D, Point};
///
/// // An L shape.
/// let points = [
///     point(0.0, 0.0),
///     point(2.0, 0.0),
///     point(2.0, 1.0),
///     point(1.0, 1.0),
///     point(1.0, 2.0),
///     point(0.0, 2.0),
/// ];
/// let contour: Vec<ContourPoint> = (0..6).map(|i| ContourPoint::new(i, 0)).collect();
/// let bounds = Box2D { min: point(0.0, 0.0), max: point(2.0, 2.0) };
///
/// let mut buffers: VertexBuffers<Point, u16> = VertexBuffers::new();
/// let mut tessellator = DelaunayTessellator::new();
/// tessellator.constrained_triangulate(
///     &bounds,
///     &points,
///     &contour,
///     &CdtOptions::default(),
///     &mut buffers,
/// ).unwrap();
///
/// assert_eq!(buffers.vertices.len(), 6);
/// assert_eq!(buffers.triangle_count(), 4);
/// ```
pub struct DelaunayTessellator {
    log: bool,
}

impl Default for DelaunayTessellator {
    fn default() -> Self {
        Self::new()
    }
}

impl DelaunayTessellator {
    /// Constructor.
    pub fn new() -> Self {
        #[cfg(all(debug_assertions, feature = "std"))]
        let log = std::env::var("VECMESH_FORCE_LOGGING").is_ok();
        #[cfg(not(all(debug_assertions, feature = "std")))]
        let log = false;

        DelaunayTessellator { log }
    }

    /// Enable/disable some verbose logging during the tessellation, for
    /// debugging purposes.
    pub fn set_logging(&mut self, is_enabled: bool) {
        #[cfg(all(debug_assertions, feature = "std"))]
        let forced = std::env::var("VECMESH_FORCE_LOGGING").is_ok();

        #[cfg(not(all(debug_assertions, feature = "std")))]
        let forced = false;

        self.log = is_enabled || forced;
    }

    /// Computes the Delaunay triangulation of a point set.
    ///
    /// The triangles cover the convex hull of the points. Fewer than three
    /// distinct points, or collinear points, produce no triangle.
    ///
    /// The edges of the convex hull are forced into the mesh before the seeding
    /// rectangle is removed, so the result doesn't depend on the margin.
    pub fn triangulate<OutputIndex>(
        &mut self,
        bounds: &Box2D,
        points: &[Point],
        options: &CdtOptions,
        output: &mut VertexBuffers<Point, OutputIndex>,
    ) -> TessellationResult
    where
        OutputIndex: From<VertexId> + MaxIndex,
    {
        validate(bounds, points, options)?;
        check_index_range::<OutputIndex>(output.vertices.len(), points.len())?;

        cdt_log!(self, "triangulate {} point(s)", points.len());

        let mut mesh = DelaunayMesh::new(points, options.circumcircle_tolerance as f64);
        mesh.reset(&bounds.to_f64(), options.margin as f64);
        let canonical = mesh.insert_all();

        let unique: Vec<VertexId> = canonical
            .iter()
            .enumerate()
            .filter(|(i, v)| v.to_usize() == *i)
            .map(|(_, v)| *v)
            .collect();
        let hull = convex_hull(&mesh.positions, &unique);

        if hull.is_empty() {
            // Fewer than three distinct points, or collinear points.
            cdt_log!(self, "degenerate point set");
            mesh.store.clear();
        } else {
            let segments = (0..hull.len())
                .map(|i| Edge::new(hull[i], hull[(i + 1) % hull.len()]))
                .collect();

            ConstraintEnforcer::new(
                &mut mesh,
                segments,
                Side::Left,
                options.margin as f64,
                self.log,
            )
            .insert_missing_segments();
        }

        mesh.remove_bootstrap_triangles();

        if self.log {
            let expected = convex_hull_area(&mesh.positions[..points.len()]);
            let area = mesh.store.signed_area(&mesh.positions);
            cdt_log!(self, "covered area {}, convex hull area {}", area, expected);
        }

        write_output(&mesh, points, output);

        Ok(())
    }

    /// Triangulates the interior of closed contours.
    ///
    /// Every edge of the contours is an edge of the output and no triangle is
    /// outside of the contours. Which side of an edge is inside is given by
    /// `CdtOptions::interior`.
    ///
    /// The contours must not intersect themselves or each other. Such contours
    /// are not detected and produce an unspecified (but valid) set of triangles.
    pub fn constrained_triangulate<OutputIndex>(
        &mut self,
        bounds: &Box2D,
        points: &[Point],
        contour: &[ContourPoint],
        options: &CdtOptions,
        output: &mut VertexBuffers<Point, OutputIndex>,
    ) -> TessellationResult
    where
        OutputIndex: From<VertexId> + MaxIndex,
    {
        validate(bounds, points, options)?;
        check_index_range::<OutputIndex>(output.vertices.len(), points.len())?;
        validate_contour(points.len(), contour)?;

        cdt_log!(
            self,
            "constrained triangulation of {} point(s), {} contour point(s)",
            points.len(),
            contour.len()
        );

        let mut mesh = DelaunayMesh::new(points, options.circumcircle_tolerance as f64);
        mesh.reset(&bounds.to_f64(), options.margin as f64);
        let canonical = mesh.insert_all();

        // The seeding triangles stay while the edges are forced in so that
        // the cavities around the hull are closed.
        let mut enforcer = ConstraintEnforcer::new(
            &mut mesh,
            collect_segments(&canonical, contour),
            options.interior,
            options.margin as f64,
            self.log,
        );
        cdt_log!(self, "{} contour edge(s)", enforcer.segments().len());
        enforcer.enforce();

        write_output(&mesh, points, output);

        Ok(())
    }
}

fn validate(bounds: &Box2D, points: &[Point], options: &CdtOptions) -> TessellationResult {
    if options.margin.is_nan() || options.margin <= 0.0 {
        return Err(UnsupportedParameter::InvalidMargin.into());
    }

    if !is_valid_bounds(bounds) {
        return Err(UnsupportedParameter::InvalidBounds.into());
    }

    for (index, p) in points.iter().enumerate() {
        if p.x.is_nan() || p.y.is_nan() {
            return Err(UnsupportedParameter::PositionIsNaN.into());
        }

        if !bounds_contain(bounds, *p) {
            return Err(TessellationError::PointOutsideBounds {
                index: index as u32,
            });
        }
    }

    Ok(())
}

/// The indices written by a call must fit in the output index type.
fn check_index_range<OutputIndex: MaxIndex>(
    num_vertices: usize,
    num_points: usize,
) -> TessellationResult {
    if num_vertices + num_points > OutputIndex::MAX {
        return Err(TessellationError::TooManyVertices);
    }

    Ok(())
}

fn validate_contour(num_points: usize, contour: &[ContourPoint]) -> TessellationResult {
    let mut finished: BTreeSet<u32> = BTreeSet::new();
    let mut current = None;

    for (index, cp) in contour.iter().enumerate() {
        if cp.point as usize >= num_points {
            return Err(InvalidContourError::PointOutOfRange {
                index: index as u32,
                point: cp.point,
            }
            .into());
        }

        if current != Some(cp.contour) {
            if let Some(prev) = current {
                finished.insert(prev);
            }

            if finished.contains(&cp.contour) {
                return Err(InvalidContourError::NonContiguousContour {
                    contour: cp.contour,
                }
                .into());
            }

            current = Some(cp.contour);
        }
    }

    Ok(())
}

fn write_output<OutputIndex>(
    mesh: &DelaunayMesh,
    points: &[Point],
    output: &mut VertexBuffers<Point, OutputIndex>,
) where
    OutputIndex: From<VertexId>,
{
    let vertex_offset = output.vertices.len() as u32;
    output.vertices.extend_from_slice(points);

    for (_, triangle, _) in mesh.store.iter() {
        debug_assert!(triangle.iter().all(|v| !mesh.is_bootstrap(*v)));
        output.push_triangle(vertex_offset, triangle);
    }
}

/// Computes the Delaunay triangulation of `points`.
///
/// `min` and `max` are the corners of a rectangle containing all of the points.
/// Uses the default options.
///
/// ```
/// use vecmesh_tessellation::triangulate;
/// use vecmesh_tessellation::math::point;
///
/// let square = [point(0.0, 0.0), point(1.0, 0.0), point(1.0, 1.0), point(0.0, 1.0)];
/// let mesh = triangulate(point(0.0, 0.0), point(1.0, 1.0), &square).unwrap();
///
/// assert_eq!(mesh.vertices.len(), 4);
/// assert_eq!(mesh.indices.len(), 6);
/// ```
pub fn triangulate(
    min: Point,
    max: Point,
    points: &[Point],
) -> Result<VertexBuffers<Point, u32>, TessellationError> {
    let mut output = VertexBuffers::with_capacity(points.len(), points.len() * 6);
    DelaunayTessellator::new().triangulate(
        &Box2D { min, max },
        points,
        &CdtOptions::DEFAULT,
        &mut output,
    )?;

    Ok(output)
}

/// Triangulates the interior of closed contours with the default options.
///
/// `min` and `max` are the corners of a rectangle containing all of the points.
pub fn constrained_triangulate(
    min: Point,
    max: Point,
    points: &[Point],
    contour: &[ContourPoint],
) -> Result<VertexBuffers<Point, u32>, TessellationError> {
    let mut output = VertexBuffers::with_capacity(points.len(), points.len() * 6);
    DelaunayTessellator::new().constrained_triangulate(
        &Box2D { min, max },
        points,
        contour,
        &CdtOptions::DEFAULT,
        &mut output,
    )?;

    Ok(output)
}
