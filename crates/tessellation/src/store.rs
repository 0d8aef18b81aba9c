//! Storage for the triangles of a triangulation in progress.
//!
//! Each triangle lives in a slot next to its circumcircle, which is computed once
//! when the triangle is added. Removing a triangle frees its slot for reuse
//! without moving any other triangle, so the ids of the remaining triangles stay
//! valid. Ids carry a generation counter: an id that refers to a removed
//! triangle never resolves to the triangle that reused its slot.

use crate::geom::{Circumcircle, Point, Triangle};
use crate::VertexId;

use alloc::vec::Vec;

/// A stable handle to a triangle in a [`TriangleStore`](struct.TriangleStore.html).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TriangleId {
    index: u32,
    generation: u32,
}

impl TriangleId {
    #[inline]
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

#[derive(Clone, Debug)]
struct Slot {
    vertices: [VertexId; 3],
    circle: Circumcircle<f64>,
    generation: u32,
    alive: bool,
}

/// A generational arena of triangles and their circumcircles.
#[derive(Clone, Debug, Default)]
pub struct TriangleStore {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl TriangleStore {
    pub fn new() -> Self {
        TriangleStore {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    pub fn with_capacity(cap: usize) -> Self {
        TriangleStore {
            slots: Vec::with_capacity(cap),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Number of live triangles.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.len = 0;
    }

    /// Adds a triangle and memoizes its circumcircle.
    ///
    /// `positions` is indexed by the triangle's vertices.
    pub fn add(&mut self, vertices: [VertexId; 3], positions: &[Point<f64>]) -> TriangleId {
        debug_assert!(
            vertices[0] != vertices[1] && vertices[1] != vertices[2] && vertices[2] != vertices[0],
            "degenerate triangle {:?}",
            vertices
        );

        let circle = Circumcircle::new(
            positions[vertices[0].to_usize()],
            positions[vertices[1].to_usize()],
            positions[vertices[2].to_usize()],
        );

        self.len += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            debug_assert!(!slot.alive);
            slot.vertices = vertices;
            slot.circle = circle;
            slot.alive = true;

            return TriangleId {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            vertices,
            circle,
            generation: 0,
            alive: true,
        });

        TriangleId {
            index,
            generation: 0,
        }
    }

    /// Removes a triangle along with its circumcircle.
    ///
    /// Returns `None` if the id is stale.
    pub fn remove(&mut self, id: TriangleId) -> Option<[VertexId; 3]> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if !slot.alive || slot.generation != id.generation {
            return None;
        }

        slot.alive = false;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;

        Some(slot.vertices)
    }

    #[inline]
    fn slot(&self, id: TriangleId) -> Option<&Slot> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.alive && slot.generation == id.generation)
    }

    #[inline]
    pub fn contains(&self, id: TriangleId) -> bool {
        self.slot(id).is_some()
    }

    #[inline]
    pub fn get(&self, id: TriangleId) -> Option<[VertexId; 3]> {
        self.slot(id).map(|slot| slot.vertices)
    }

    #[inline]
    pub fn circumcircle(&self, id: TriangleId) -> Option<&Circumcircle<f64>> {
        self.slot(id).map(|slot| &slot.circle)
    }

    /// Iterates over the live triangles in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (TriangleId, [VertexId; 3], &Circumcircle<f64>)> + '_ {
        self.slots.iter().enumerate().filter(|(_, slot)| slot.alive).map(|(index, slot)| {
            (
                TriangleId {
                    index: index as u32,
                    generation: slot.generation,
                },
                slot.vertices,
                &slot.circle,
            )
        })
    }

    /// The ids of the live triangles in slot order.
    pub fn ids(&self) -> Vec<TriangleId> {
        self.iter().map(|(id, _, _)| id).collect()
    }

    /// Returns the first live triangle that has both `a` and `b` as vertices.
    pub fn find_edge(&self, a: VertexId, b: VertexId) -> Option<TriangleId> {
        self.iter()
            .find(|(_, t, _)| t.contains(&a) && t.contains(&b))
            .map(|(id, _, _)| id)
    }

    #[inline]
    pub fn has_edge(&self, a: VertexId, b: VertexId) -> bool {
        self.find_edge(a, b).is_some()
    }

    /// Builds the geometric triangle of `id`.
    pub fn triangle(&self, id: TriangleId, positions: &[Point<f64>]) -> Option<Triangle<f64>> {
        self.get(id).map(|t| triangle_at(t, positions))
    }

    /// Sum of the signed areas of the live triangles.
    pub fn signed_area(&self, positions: &[Point<f64>]) -> f64 {
        self.iter()
            .map(|(_, t, _)| triangle_at(t, positions).signed_area())
            .sum()
    }
}

/// The geometric triangle formed by three vertices.
#[inline]
pub(crate) fn triangle_at(vertices: [VertexId; 3], positions: &[Point<f64>]) -> Triangle<f64> {
    Triangle {
        a: positions[vertices[0].to_usize()],
        b: positions[vertices[1].to_usize()],
        c: positions[vertices[2].to_usize()],
    }
}

#[cfg(test)]
use crate::geom::point;

#[cfg(test)]
fn test_positions() -> Vec<Point<f64>> {
    alloc::vec![
        point(0.0, 0.0),
        point(2.0, 0.0),
        point(2.0, 2.0),
        point(0.0, 2.0),
    ]
}

#[test]
fn test_add_remove() {
    let positions = test_positions();
    let mut store = TriangleStore::new();

    let a = store.add([VertexId(0), VertexId(1), VertexId(2)], &positions);
    let b = store.add([VertexId(0), VertexId(2), VertexId(3)], &positions);
    assert_eq!(store.len(), 2);
    assert!(store.has_edge(VertexId(2), VertexId(0)));
    assert!(!store.has_edge(VertexId(1), VertexId(3)));

    let circle = store.circumcircle(a).unwrap();
    assert!((circle.center - point(1.0, 1.0)).length() < 1e-12);
    assert!((circle.square_radius - 2.0).abs() < 1e-12);

    assert_eq!(store.remove(a), Some([VertexId(0), VertexId(1), VertexId(2)]));
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(b), Some([VertexId(0), VertexId(2), VertexId(3)]));
    assert!((store.signed_area(&positions) - 2.0).abs() < 1e-12);
}

#[test]
fn test_stale_ids() {
    let positions = test_positions();
    let mut store = TriangleStore::new();

    let a = store.add([VertexId(0), VertexId(1), VertexId(2)], &positions);
    assert!(store.remove(a).is_some());
    assert!(store.remove(a).is_none());

    // The slot is reused, the old id must not resolve to the new triangle.
    let c = store.add([VertexId(0), VertexId(2), VertexId(3)], &positions);
    assert_eq!(c.index(), a.index());
    assert_ne!(c, a);
    assert!(!store.contains(a));
    assert!(store.get(a).is_none());
    assert!(store.circumcircle(a).is_none());
    assert!(store.contains(c));
    assert_eq!(store.ids(), alloc::vec![c]);
}

#[test]
fn test_iteration_skips_removed_slots() {
    let positions = test_positions();
    let mut store = TriangleStore::with_capacity(3);

    let a = store.add([VertexId(0), VertexId(1), VertexId(2)], &positions);
    let b = store.add([VertexId(0), VertexId(2), VertexId(3)], &positions);
    let c = store.add([VertexId(1), VertexId(2), VertexId(3)], &positions);
    store.remove(b);

    let ids: Vec<TriangleId> = store.iter().map(|(id, _, _)| id).collect();
    assert_eq!(ids, alloc::vec![a, c]);

    store.clear();
    assert!(store.is_empty());
    assert_eq!(store.iter().count(), 0);
}
