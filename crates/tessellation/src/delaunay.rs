//! Incremental Bowyer-Watson triangulation.
//!
//! Points are inserted one at a time into a mesh seeded with a rectangle that
//! encloses all of them. For each point:
//!
//! - the triangles whose circumcircle contains the point form the cavity,
//! - the cavity is removed and each of its boundary edges is connected to the
//!   point, producing a fan of new triangles.
//!
//! With floating point predicates the set of triangles whose circumcircle
//! contains the point is not always a star-shaped region around the point
//! (cocircular points are the usual culprit). The cavity is grown from the
//! triangle that contains the point through adjacent bad triangles, then across
//! any boundary edge the point doesn't see from the inside. This keeps the new
//! fan from overlapping the rest of the mesh.

use crate::geom::{is_clockwise, orientation, point, Box2D, Orientation, Point};
use crate::math::Point as InputPoint;
use crate::store::{triangle_at, TriangleId, TriangleStore};
use crate::VertexId;

use alloc::collections::btree_map::{BTreeMap, Entry};
use alloc::vec::Vec;
use core::ops::Range;

pub(crate) type DPoint = Point<f64>;

/// Number of points of the seeding rectangle.
pub(crate) const BOOTSTRAP_VERTICES: u32 = 4;

/// An edge between two vertices.
///
/// Equality doesn't depend on the direction of the edge. The direction is kept
/// for the boundary of a cavity, which has the cavity on its left.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Edge {
    pub from: VertexId,
    pub to: VertexId,
}

impl Edge {
    #[inline]
    pub fn new(from: VertexId, to: VertexId) -> Self {
        Edge { from, to }
    }

    /// Direction independent key.
    #[inline]
    pub fn key(&self) -> (u32, u32) {
        if self.from.0 < self.to.0 {
            (self.from.0, self.to.0)
        } else {
            (self.to.0, self.from.0)
        }
    }

    #[inline]
    pub fn is_side_of(&self, triangle: &[VertexId; 3]) -> bool {
        triangle.contains(&self.from) && triangle.contains(&self.to)
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        (self.from == other.from && self.to == other.to)
            || (self.from == other.to && self.to == other.from)
    }
}

impl Eq for Edge {}

/// The three sides of a triangle in winding order.
#[inline]
pub(crate) fn sides(t: [VertexId; 3]) -> [Edge; 3] {
    [
        Edge::new(t[0], t[1]),
        Edge::new(t[1], t[2]),
        Edge::new(t[2], t[0]),
    ]
}

/// The edges used by exactly one of the triangles.
///
/// Edges used by two triangles are interior to the union and are discarded.
pub(crate) fn boundary_edges<I>(triangles: I) -> Vec<Edge>
where
    I: IntoIterator<Item = [VertexId; 3]>,
{
    let mut edges: Vec<Edge> = Vec::new();
    let mut interior: Vec<Edge> = Vec::new();

    for triangle in triangles {
        for edge in sides(triangle) {
            if interior.contains(&edge) {
                continue;
            }

            if let Some(idx) = edges.iter().position(|e| *e == edge) {
                edges.remove(idx);
                interior.push(edge);
            } else {
                edges.push(edge);
            }
        }
    }

    edges
}

/// Writes the seeding rectangle at `positions[first..first + 4]` and adds its two
/// triangles to the store.
///
/// The rectangle is `bounds` inflated by `margin`, split along its min-max diagonal.
pub(crate) fn bootstrap(
    positions: &mut [DPoint],
    first: VertexId,
    bounds: &Box2D<f64>,
    margin: f64,
    store: &mut TriangleStore,
) {
    let min = bounds.min;
    let max = bounds.max;
    let i = first.to_usize();

    positions[i] = point(min.x - margin, min.y - margin);
    positions[i + 1] = point(min.x - margin, max.y + margin);
    positions[i + 2] = point(max.x + margin, max.y + margin);
    positions[i + 3] = point(max.x + margin, min.y - margin);

    store.add([first, first + 2, first + 1], positions);
    store.add([first, first + 3, first + 2], positions);
}

/// Inserts the point `v` into the triangulation.
///
/// Returns false if no triangle contains the point, in which case the mesh is
/// left untouched.
pub(crate) fn insert_point(
    store: &mut TriangleStore,
    positions: &[DPoint],
    v: VertexId,
    tolerance: f64,
) -> bool {
    let p = positions[v.to_usize()];

    let cavity = match cavity(store, positions, p, tolerance) {
        Some(cavity) => cavity,
        None => return false,
    };

    let boundary = boundary_edges(cavity.iter().filter_map(|id| store.get(*id)));

    for id in cavity {
        store.remove(id);
    }

    for edge in boundary {
        let a = positions[edge.from.to_usize()];
        let b = positions[edge.to.to_usize()];
        let triangle = if is_clockwise(a, b, p) {
            [edge.from, v, edge.to]
        } else {
            [edge.from, edge.to, v]
        };

        store.add(triangle, positions);
    }

    true
}

fn cavity(
    store: &TriangleStore,
    positions: &[DPoint],
    p: DPoint,
    tolerance: f64,
) -> Option<Vec<TriangleId>> {
    let mut bad = Vec::new();
    let mut seed = None;
    for (id, triangle, circle) in store.iter() {
        if !circle.contains_point_with_tolerance(p, tolerance) {
            continue;
        }

        if seed.is_none() && triangle_at(triangle, positions).contains_point_inclusive(p, 0.0) {
            seed = Some(id);
        }

        bad.push(id);
    }

    // Imprecise circumcircles can miss the triangle that contains the point.
    let seed = seed.or_else(|| {
        store
            .iter()
            .find(|(_, t, _)| triangle_at(*t, positions).contains_point_inclusive(p, 0.0))
            .map(|(id, _, _)| id)
    })?;

    let mut cavity = alloc::vec![seed];
    let mut stack = alloc::vec![seed];
    while let Some(id) = stack.pop() {
        let triangle = match store.get(id) {
            Some(t) => t,
            None => continue,
        };

        for edge in sides(triangle) {
            for &other in &bad {
                if cavity.contains(&other) {
                    continue;
                }

                if store.get(other).map_or(false, |t| edge.is_side_of(&t)) {
                    cavity.push(other);
                    stack.push(other);
                }
            }
        }
    }

    'grow: loop {
        for edge in boundary_edges(cavity.iter().filter_map(|id| store.get(*id))) {
            let a = positions[edge.from.to_usize()];
            let b = positions[edge.to.to_usize()];
            if orientation(a, b, p) == Orientation::CounterClockwise {
                continue;
            }

            let neighbor = store
                .iter()
                .find(|(id, t, _)| !cavity.contains(id) && edge.is_side_of(t))
                .map(|(id, _, _)| id);

            if let Some(id) = neighbor {
                cavity.push(id);
                continue 'grow;
            }
        }

        break;
    }

    cavity.sort();

    Some(cavity)
}

/// Removes every triangle that has a vertex in `vertices`.
pub(crate) fn remove_triangles_touching(store: &mut TriangleStore, vertices: Range<u32>) {
    let touching: Vec<TriangleId> = store
        .iter()
        .filter(|(_, t, _)| t.iter().any(|v| vertices.contains(&v.0)))
        .map(|(id, _, _)| id)
        .collect();

    for id in touching {
        store.remove(id);
    }
}

/// Duplicate detection key. `-0.0` and `0.0` map to the same key.
#[inline]
fn position_key(p: DPoint) -> (u64, u64) {
    ((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits())
}

/// The point buffer and the triangles of a triangulation pass.
///
/// The positions are the input points followed by two reserved runs of
/// `BOOTSTRAP_VERTICES` points: the first one for the rectangle of the main
/// triangulation, the second one for the temporary triangulations of the
/// constraint pass.
pub(crate) struct DelaunayMesh {
    pub positions: Vec<DPoint>,
    pub num_points: u32,
    pub store: TriangleStore,
    pub tolerance: f64,
}

impl DelaunayMesh {
    pub fn new(points: &[InputPoint], tolerance: f64) -> Self {
        let reserved = 2 * BOOTSTRAP_VERTICES as usize;
        let mut positions = Vec::with_capacity(points.len() + reserved);
        positions.extend(points.iter().map(|p| p.to_f64()));
        positions.resize(points.len() + reserved, point(0.0, 0.0));

        DelaunayMesh {
            positions,
            num_points: points.len() as u32,
            store: TriangleStore::with_capacity(points.len() * 2 + 2),
            tolerance,
        }
    }

    #[inline]
    pub fn main_bootstrap(&self) -> VertexId {
        VertexId(self.num_points)
    }

    #[inline]
    pub fn scratch_bootstrap(&self) -> VertexId {
        VertexId(self.num_points + BOOTSTRAP_VERTICES)
    }

    #[inline]
    pub fn is_bootstrap(&self, v: VertexId) -> bool {
        v.0 >= self.num_points
    }

    #[inline]
    pub fn position(&self, v: VertexId) -> DPoint {
        self.positions[v.to_usize()]
    }

    /// Clears the triangles and seeds the mesh with the main rectangle.
    pub fn reset(&mut self, bounds: &Box2D<f64>, margin: f64) {
        let first = self.main_bootstrap();
        self.store.clear();
        bootstrap(&mut self.positions, first, bounds, margin, &mut self.store);
    }

    /// Inserts the input points in order.
    ///
    /// Returns, for each input point, the vertex that represents it in the mesh:
    /// itself, or the first point at the same position.
    pub fn insert_all(&mut self) -> Vec<VertexId> {
        let mut first_at: BTreeMap<(u64, u64), VertexId> = BTreeMap::new();
        let mut canonical = Vec::with_capacity(self.num_points as usize);

        for i in 0..self.num_points {
            let v = VertexId(i);
            match first_at.entry(position_key(self.positions[i as usize])) {
                Entry::Occupied(entry) => {
                    canonical.push(*entry.get());
                }
                Entry::Vacant(entry) => {
                    entry.insert(v);
                    canonical.push(v);
                    insert_point(&mut self.store, &self.positions, v, self.tolerance);
                }
            }
        }

        canonical
    }

    /// Removes the triangles that touch any of the reserved points.
    pub fn remove_bootstrap_triangles(&mut self) {
        let start = self.num_points;
        remove_triangles_touching(&mut self.store, start..start + 2 * BOOTSTRAP_VERTICES);
    }

    /// Triangulates `vertices` separately from the main mesh.
    ///
    /// The result is seeded with the scratch rectangle around `bounds` and only
    /// contains triangles between `vertices`.
    pub fn sub_triangulation(
        &mut self,
        vertices: &[VertexId],
        bounds: &Box2D<f64>,
        margin: f64,
    ) -> TriangleStore {
        let first = self.scratch_bootstrap();
        let mut store = TriangleStore::with_capacity(vertices.len() * 2 + 2);
        bootstrap(&mut self.positions, first, bounds, margin, &mut store);

        for &v in vertices {
            insert_point(&mut store, &self.positions, v, self.tolerance);
        }

        remove_triangles_touching(&mut store, first.0..first.0 + BOOTSTRAP_VERTICES);

        store
    }
}

#[cfg(test)]
use crate::math::point as fpoint;

#[cfg(test)]
fn test_mesh(points: &[InputPoint]) -> DelaunayMesh {
    let mut min = points[0];
    let mut max = points[0];
    for p in points {
        min = min.min(*p);
        max = max.max(*p);
    }

    let mut mesh = DelaunayMesh::new(points, 0.0);
    mesh.reset(
        &Box2D {
            min: min.to_f64(),
            max: max.to_f64(),
        },
        1.0,
    );

    mesh
}

#[test]
fn test_edge_equality() {
    let a = Edge::new(VertexId(1), VertexId(2));
    assert_eq!(a, Edge::new(VertexId(2), VertexId(1)));
    assert_ne!(a, Edge::new(VertexId(1), VertexId(3)));
    assert_eq!(a.key(), Edge::new(VertexId(2), VertexId(1)).key());
    assert!(a.is_side_of(&[VertexId(2), VertexId(0), VertexId(1)]));
}

#[test]
fn test_boundary_edges() {
    // Two triangles sharing the 0-2 diagonal of a quad.
    let edges = boundary_edges([
        [VertexId(0), VertexId(1), VertexId(2)],
        [VertexId(0), VertexId(2), VertexId(3)],
    ]);

    assert_eq!(edges.len(), 4);
    assert!(!edges.contains(&Edge::new(VertexId(0), VertexId(2))));
    for (from, to) in [(0, 1), (1, 2), (2, 3), (3, 0)] {
        let edge = edges
            .iter()
            .find(|e| e.from == VertexId(from))
            .unwrap();
        assert_eq!(edge.to, VertexId(to));
    }
}

#[test]
fn test_bootstrap_is_counter_clockwise() {
    let mut mesh = test_mesh(&[fpoint(0.0, 0.0), fpoint(4.0, 2.0)]);
    assert_eq!(mesh.store.len(), 2);

    for (_, t, _) in mesh.store.iter() {
        assert!(triangle_at(t, &mesh.positions).signed_area() > 0.0);
    }

    // (4 + 2) * (2 + 2)
    assert!((mesh.store.signed_area(&mesh.positions) - 24.0).abs() < 1e-9);

    mesh.remove_bootstrap_triangles();
    assert!(mesh.store.is_empty());
}

#[test]
fn test_insertion_keeps_the_rectangle_covered() {
    let points = [
        fpoint(0.0, 0.0),
        fpoint(3.0, 0.5),
        fpoint(1.0, 2.0),
        fpoint(2.0, 2.0),
        fpoint(1.5, 1.0),
        fpoint(0.0, 3.0),
        fpoint(3.0, 3.0),
    ];
    let mut mesh = test_mesh(&points);
    let rectangle_area = 5.0 * 5.0;

    for i in 0..points.len() as u32 {
        assert!(insert_point(
            &mut mesh.store,
            &mesh.positions,
            VertexId(i),
            0.0
        ));

        assert!((mesh.store.signed_area(&mesh.positions) - rectangle_area).abs() < 1e-9);
        for (_, t, _) in mesh.store.iter() {
            assert!(triangle_at(t, &mesh.positions).signed_area() > 0.0);
        }
    }
}

#[test]
fn test_cocircular_points() {
    // Every other point of this star is on the same circle.
    let mut points = Vec::new();
    for i in 0..20 {
        let angle = core::f32::consts::PI * 2.0 * i as f32 / 20.0;
        let radius = if i % 2 == 0 { 10.0 } else { 3.0 };
        points.push(fpoint(radius * angle.cos(), radius * angle.sin()));
    }

    let mut mesh = test_mesh(&points);
    let expected = mesh.store.signed_area(&mesh.positions);
    let canonical = mesh.insert_all();

    assert_eq!(canonical.len(), points.len());
    assert!((mesh.store.signed_area(&mesh.positions) - expected).abs() < 1e-6);
    for (_, t, _) in mesh.store.iter() {
        assert!(triangle_at(t, &mesh.positions).signed_area() > 0.0);
    }
}

#[test]
fn test_duplicates_are_not_inserted() {
    let points = [
        fpoint(0.0, 0.0),
        fpoint(1.0, 0.0),
        fpoint(1.0, 1.0),
        fpoint(1.0, 0.0),
        fpoint(-0.0, 0.0),
    ];
    let mut mesh = test_mesh(&points);
    let canonical = mesh.insert_all();

    assert_eq!(
        canonical,
        alloc::vec![VertexId(0), VertexId(1), VertexId(2), VertexId(1), VertexId(0)]
    );

    for (_, t, _) in mesh.store.iter() {
        assert!(!t.contains(&VertexId(3)));
        assert!(!t.contains(&VertexId(4)));
    }
}

#[test]
fn test_sub_triangulation_only_uses_given_vertices() {
    let points = [
        fpoint(0.0, 0.0),
        fpoint(4.0, 0.0),
        fpoint(4.0, 4.0),
        fpoint(0.0, 4.0),
        fpoint(2.0, 1.0),
    ];
    let mut mesh = test_mesh(&points);
    mesh.insert_all();

    let vertices = [VertexId(0), VertexId(1), VertexId(4)];
    let bounds = Box2D {
        min: point(0.0, 0.0),
        max: point(4.0, 1.0),
    };
    let sub = mesh.sub_triangulation(&vertices, &bounds, 1.0);

    assert_eq!(sub.len(), 1);
    for (_, t, _) in sub.iter() {
        for v in &t {
            assert!(vertices.contains(v));
        }
        assert!((triangle_at(t, &mesh.positions).signed_area() - 2.0).abs() < 1e-9);
    }
}
