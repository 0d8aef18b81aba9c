//! Constraint enforcement.
//!
//! After all points are inserted, the contour edges that are missing from the
//! Delaunay triangulation are forced in one at a time. For a missing edge `a b`:
//!
//! - the triangles crossed by the edge are removed, which leaves a cavity split
//!   in two halves by the edge,
//! - the vertices of the removed triangles are sorted by the side of the edge
//!   they are on,
//! - each side is triangulated together with `a` and `b` using a separate
//!   Bowyer-Watson pass, and the triangles that land inside of the cavity fill it.
//!
//! When the separate passes don't tile the cavity exactly (which can happen when
//! the cavity isn't convex enough for a Delaunay triangulation of its vertices
//! to follow its boundary), each half of the cavity is triangulated as a pseudo
//! polygon instead: the polygon walked along the cavity boundary from `a` to `b`.
//!
//! Once the edges are in, the triangles on the exterior side of the contours are
//! removed along with the triangles connected to the seeding rectangle.
//!
//! The unconstrained triangulation forces the edges of the convex hull in the
//! same way before it drops the seeding rectangle. When the rectangle is close
//! to the points, some triangles along the hull have a circumcircle that
//! contains a corner of the rectangle and never make it into the mesh.

use crate::delaunay::{sides, DelaunayMesh, DPoint, Edge};
use crate::geom::{is_clockwise, Box2D, Circumcircle, LineSegment, Vector};
use crate::store::{triangle_at, TriangleId};
use crate::{ContourPoint, Side, VertexId};

use alloc::collections::btree_map::BTreeMap;
use alloc::collections::btree_set::BTreeSet;
use alloc::vec::Vec;

/// Number of passes over the missing edges.
///
/// Forcing an edge in can occasionally remove an edge that was forced in
/// earlier, so missing edges are looked up again after each pass.
const MAX_SWEEPS: u32 = 4;

pub(crate) struct ConstraintEnforcer<'l> {
    mesh: &'l mut DelaunayMesh,
    segments: Vec<Edge>,
    interior: Side,
    margin: f64,
    log: bool,
}

impl<'l> ConstraintEnforcer<'l> {
    pub fn new(
        mesh: &'l mut DelaunayMesh,
        segments: Vec<Edge>,
        interior: Side,
        margin: f64,
        log: bool,
    ) -> Self {
        ConstraintEnforcer {
            mesh,
            segments,
            interior,
            margin,
            log,
        }
    }

    pub fn segments(&self) -> &[Edge] {
        &self.segments
    }

    /// Inserts the missing edges and removes the exterior triangles.
    pub fn enforce(&mut self) {
        self.insert_missing_segments();
        self.remove_exterior();
    }

    /// Forces the edges into the mesh.
    pub fn insert_missing_segments(&mut self) {
        for sweep in 0..MAX_SWEEPS {
            let missing: Vec<Edge> = self
                .segments
                .iter()
                .filter(|e| !self.mesh.store.has_edge(e.from, e.to))
                .cloned()
                .collect();

            if missing.is_empty() {
                break;
            }

            cdt_log!(self, "sweep {}: {} missing edge(s)", sweep, missing.len());

            for edge in missing {
                if !self.mesh.store.has_edge(edge.from, edge.to) {
                    self.insert_segment(edge);
                }
            }
        }

        for edge in &self.segments {
            if !self.mesh.store.has_edge(edge.from, edge.to) {
                log::warn!(
                    "contour edge {:?}-{:?} is missing from the triangulation",
                    edge.from,
                    edge.to
                );
            }
        }
    }

    /// Points towards the interior of the shape.
    fn interior_normal(&self, edge: Edge) -> Vector<f64> {
        let normal = LineSegment {
            from: self.mesh.position(edge.from),
            to: self.mesh.position(edge.to),
        }
        .left_normal();

        match self.interior {
            Side::Left => normal,
            Side::Right => -normal,
        }
    }

    fn insert_segment(&mut self, edge: Edge) {
        let (a, b) = (edge.from, edge.to);
        let pa = self.mesh.position(a);
        let pb = self.mesh.position(b);
        let segment = LineSegment { from: pa, to: pb };
        let normal = self.interior_normal(edge);

        let blocking: Vec<TriangleId> = self
            .mesh
            .store
            .iter()
            .filter(|(_, t, _)| triangle_at(*t, &self.mesh.positions).is_crossed_by(&segment))
            .map(|(id, _, _)| id)
            .collect();

        if blocking.is_empty() {
            return;
        }

        cdt_log!(self, "insert edge {:?}-{:?} across {} triangle(s)", a, b, blocking.len());

        let mut bounds = Box2D {
            min: pa.min(pb),
            max: pa.max(pb),
        };
        let mut inside = Vec::new();
        let mut outside = Vec::new();
        for &id in &blocking {
            let triangle = match self.mesh.store.get(id) {
                Some(t) => t,
                None => continue,
            };

            for v in triangle {
                if v == a || v == b || inside.contains(&v) || outside.contains(&v) {
                    continue;
                }

                let p = self.mesh.position(v);
                if (p - pa).dot(normal) > 0.0 {
                    inside.push(v);
                } else {
                    outside.push(v);
                }

                bounds.min = bounds.min.min(p);
                bounds.max = bounds.max.max(p);
            }
        }

        let removed: Vec<[VertexId; 3]> = blocking
            .iter()
            .filter_map(|id| self.mesh.store.remove(*id))
            .collect();
        let cavity_area: f64 = removed
            .iter()
            .map(|t| triangle_at(*t, &self.mesh.positions).area())
            .sum();

        let mut patch = Vec::new();
        for side in [&inside, &outside] {
            if side.is_empty() {
                continue;
            }

            let mut vertices = Vec::with_capacity(side.len() + 2);
            vertices.push(a);
            vertices.push(b);
            vertices.extend_from_slice(side);

            let sub = self
                .mesh
                .sub_triangulation(&vertices, &bounds, self.margin);

            for (_, t, _) in sub.iter() {
                let centroid = triangle_at(t, &self.mesh.positions).centroid();
                let in_cavity = removed.iter().any(|r| {
                    triangle_at(*r, &self.mesh.positions).contains_point_inclusive(centroid, 0.0)
                });

                if in_cavity {
                    patch.push(t);
                }
            }
        }

        let patch_area: f64 = patch
            .iter()
            .map(|t| triangle_at(*t, &self.mesh.positions).area())
            .sum();
        let tiles_cavity = (patch_area - cavity_area).abs() <= 1e-9 * cavity_area.max(1e-30);
        let has_edge = patch.iter().any(|t| edge.is_side_of(t));

        if !(tiles_cavity && has_edge) {
            match cavity_chains(&removed, a, b) {
                Some((right, left)) => {
                    cdt_log!(self, "edge {:?}-{:?}: pseudo-polygon fallback", a, b);
                    patch.clear();
                    triangulate_pseudo_polygon(&self.mesh.positions, &right, a, b, &mut patch);
                    triangulate_pseudo_polygon(&self.mesh.positions, &left, b, a, &mut patch);
                }
                None => {
                    log::warn!(
                        "could not retriangulate the cavity of edge {:?}-{:?}",
                        a,
                        b
                    );
                }
            }
        }

        for triangle in patch {
            self.mesh.store.add(triangle, &self.mesh.positions);
        }
    }

    /// Removes the triangles that are outside of the contours or connected to
    /// the seeding rectangle.
    fn remove_exterior(&mut self) {
        let live: Vec<(TriangleId, [VertexId; 3])> =
            self.mesh.store.iter().map(|(id, t, _)| (id, t)).collect();

        let mut incident: Vec<Vec<usize>> = alloc::vec![Vec::new(); self.mesh.positions.len()];
        for (i, (_, t)) in live.iter().enumerate() {
            for v in t {
                incident[v.to_usize()].push(i);
            }
        }

        let mut marked: Vec<bool> = live
            .iter()
            .map(|(_, t)| t.iter().any(|v| self.mesh.is_bootstrap(*v)))
            .collect();

        for &edge in &self.segments {
            let pa = self.mesh.position(edge.from);
            let normal = self.interior_normal(edge);
            for &i in &incident[edge.from.to_usize()] {
                let t = live[i].1;
                if !t.contains(&edge.to) {
                    continue;
                }

                let opposite = t.iter().find(|v| **v != edge.from && **v != edge.to);
                if let Some(&c) = opposite {
                    if (self.mesh.position(c) - pa).dot(normal) <= 0.0 {
                        marked[i] = true;
                    }
                }
            }
        }

        let contour_edges: BTreeSet<(u32, u32)> = self.segments.iter().map(Edge::key).collect();
        let is_contour = |e: &Edge| contour_edges.contains(&e.key());

        let mut stack: Vec<usize> = (0..live.len()).filter(|i| marked[*i]).collect();
        while let Some(i) = stack.pop() {
            for side in sides(live[i].1) {
                if is_contour(&side) {
                    continue;
                }

                for &j in &incident[side.from.to_usize()] {
                    if j == i || marked[j] {
                        continue;
                    }

                    let t = live[j].1;
                    if t.contains(&side.to) && !sides(t).iter().any(|e| is_contour(e)) {
                        marked[j] = true;
                        stack.push(j);
                    }
                }
            }
        }

        let mut removed = 0;
        for (i, (id, _)) in live.iter().enumerate() {
            if marked[i] {
                self.mesh.store.remove(*id);
                removed += 1;
            }
        }

        cdt_log!(self, "removed {} exterior triangle(s)", removed);
    }
}

/// The directed edges of the contours, in terms of canonical vertices.
///
/// `canonical` maps each point to the vertex that represents it in the mesh.
/// Consecutive duplicates are skipped, including the closing point of a
/// contour that repeats its first point. Contours with less than three
/// distinct points are ignored.
pub(crate) fn collect_segments(canonical: &[VertexId], contour: &[ContourPoint]) -> Vec<Edge> {
    let mut segments = Vec::new();
    let mut points: Vec<VertexId> = Vec::new();

    for (i, cp) in contour.iter().enumerate() {
        let v = canonical[cp.point as usize];
        if points.last() != Some(&v) {
            points.push(v);
        }

        let last_of_contour = contour
            .get(i + 1)
            .map_or(true, |next| next.contour != cp.contour);

        if last_of_contour {
            while points.len() > 1 && points.last() == points.first() {
                points.pop();
            }

            if points.len() >= 3 {
                for k in 0..points.len() {
                    let from = points[k];
                    let to = points[(k + 1) % points.len()];
                    if from != to {
                        segments.push(Edge::new(from, to));
                    }
                }
            }

            points.clear();
        }
    }

    segments
}

/// The two halves of the boundary of a cavity cut by the edge `a b`.
///
/// The removed triangles are wound counter-clockwise so their boundary, walked
/// in the direction of their sides, goes around the cavity counter-clockwise.
/// Returns the vertices strictly between `a` and `b` when walking from `a`
/// (right of `a b`) and when walking from `b` (left of `a b`).
///
/// Returns `None` if the boundary isn't a simple cycle through `a` and `b`.
pub(crate) fn cavity_chains(
    removed: &[[VertexId; 3]],
    a: VertexId,
    b: VertexId,
) -> Option<(Vec<VertexId>, Vec<VertexId>)> {
    let directed: Vec<(VertexId, VertexId)> = removed
        .iter()
        .flat_map(|t| sides(*t))
        .map(|e| (e.from, e.to))
        .collect();

    let mut next: BTreeMap<VertexId, VertexId> = BTreeMap::new();
    let mut boundary_len = 0;
    for &(from, to) in &directed {
        if directed.contains(&(to, from)) {
            continue;
        }

        if next.insert(from, to).is_some() {
            return None;
        }
        boundary_len += 1;
    }

    let walk = |start: VertexId, end: VertexId| -> Option<Vec<VertexId>> {
        let mut chain = Vec::new();
        let mut v = *next.get(&start)?;
        while v != end {
            if chain.len() > boundary_len {
                return None;
            }
            chain.push(v);
            v = *next.get(&v)?;
        }

        Some(chain)
    };

    Some((walk(a, b)?, walk(b, a)?))
}

/// Triangulates the polygon formed by the edge `a b` and `chain`.
///
/// Picks the chain vertex `c` such that the circle through `a`, `b` and `c`
/// contains no other chain vertex, emits `a c b` and recurses on both sides
/// of `c`. The emitted triangles are wound counter-clockwise.
pub(crate) fn triangulate_pseudo_polygon(
    positions: &[DPoint],
    chain: &[VertexId],
    a: VertexId,
    b: VertexId,
    output: &mut Vec<[VertexId; 3]>,
) {
    if chain.is_empty() {
        return;
    }

    let pa = positions[a.to_usize()];
    let pb = positions[b.to_usize()];

    let mut ci = 0;
    for i in 1..chain.len() {
        let circle = Circumcircle::new(pa, pb, positions[chain[ci].to_usize()]);
        if circle.contains_point(positions[chain[i].to_usize()]) {
            ci = i;
        }
    }

    let c = chain[ci];
    triangulate_pseudo_polygon(positions, &chain[..ci], a, c, output);
    triangulate_pseudo_polygon(positions, &chain[ci + 1..], c, b, output);

    if is_clockwise(pa, positions[c.to_usize()], pb) {
        output.push([a, b, c]);
    } else {
        output.push([a, c, b]);
    }
}

#[cfg(test)]
use crate::geom::point;

#[test]
fn test_collect_segments() {
    let canonical: Vec<VertexId> = (0..8).map(VertexId).collect();
    let contour = [
        // A closed triangle that repeats its first point.
        ContourPoint::new(0, 0),
        ContourPoint::new(1, 0),
        ContourPoint::new(2, 0),
        ContourPoint::new(0, 0),
        // Two points only.
        ContourPoint::new(3, 1),
        ContourPoint::new(4, 1),
        // A square with a repeated point.
        ContourPoint::new(4, 2),
        ContourPoint::new(5, 2),
        ContourPoint::new(5, 2),
        ContourPoint::new(6, 2),
        ContourPoint::new(7, 2),
    ];

    let segments = collect_segments(&canonical, &contour);
    let pairs: Vec<(u32, u32)> = segments.iter().map(|e| (e.from.0, e.to.0)).collect();
    assert_eq!(
        pairs,
        alloc::vec![(0, 1), (1, 2), (2, 0), (4, 5), (5, 6), (6, 7), (7, 4)]
    );
}

#[test]
fn test_collect_segments_uses_canonical_vertices() {
    // Point 3 is a duplicate of point 0.
    let canonical = [VertexId(0), VertexId(1), VertexId(2), VertexId(0)];
    let contour = [
        ContourPoint::new(0, 0),
        ContourPoint::new(1, 0),
        ContourPoint::new(2, 0),
        ContourPoint::new(3, 0),
    ];

    let segments = collect_segments(&canonical, &contour);
    assert_eq!(segments.len(), 3);
    assert_eq!(segments[2], Edge::new(VertexId(2), VertexId(0)));
}

#[test]
fn test_cavity_chains() {
    // A quad 0 1 2 3 split along 1-3, cut by the edge 0-2.
    let removed = [
        [VertexId(0), VertexId(1), VertexId(3)],
        [VertexId(1), VertexId(2), VertexId(3)],
    ];

    let (right, left) = cavity_chains(&removed, VertexId(0), VertexId(2)).unwrap();
    assert_eq!(right, alloc::vec![VertexId(1)]);
    assert_eq!(left, alloc::vec![VertexId(3)]);
}

#[test]
fn test_pseudo_polygon() {
    // A convex fan above the edge 0-1.
    let positions = [
        point(0.0, 0.0),
        point(6.0, 0.0),
        point(5.0, 2.0),
        point(3.0, 3.0),
        point(1.0, 2.0),
    ];

    let mut output = Vec::new();
    triangulate_pseudo_polygon(
        &positions,
        &[VertexId(2), VertexId(3), VertexId(4)],
        VertexId(1),
        VertexId(0),
        &mut output,
    );

    assert_eq!(output.len(), 3);
    let mut area = 0.0;
    for t in &output {
        let signed = triangle_at(*t, &positions).signed_area();
        assert!(signed > 0.0);
        area += signed;
    }

    // Shoelace area of the pentagon.
    assert!((area - 12.0).abs() < 1e-9);
}
