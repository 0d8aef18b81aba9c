//! Vertex and index buffers.
//!
//! ## Overview
//!
//! The tessellators write their output into a [`VertexBuffers`](struct.VertexBuffers.html),
//! a pair of vectors holding the vertices and the indices of the triangles (three indices
//! per triangle).
//!
//! The output of several tessellations can be accumulated in the same buffers: the indices
//! written by a tessellation are offset by the number of vertices that were in the buffers
//! before it started, so that each shape's triangles refer to its own vertices.
//!
//! ```
//! use vecmesh_tessellation::{CdtOptions, DelaunayTessellator, VertexBuffers};
//! use vecmesh_tessellation::math::{point, Box2D};
//!
//! let mut buffers: VertexBuffers<_, u32> = VertexBuffers::new();
//! let mut tessellator = DelaunayTessellator::new();
//!
//! let square = [point(0.0, 0.0), point(1.0, 0.0), point(1.0, 1.0), point(0.0, 1.0)];
//! let bounds = Box2D { min: point(0.0, 0.0), max: point(1.0, 1.0) };
//!
//! tessellator.triangulate(&bounds, &square, &CdtOptions::default(), &mut buffers).unwrap();
//! tessellator.triangulate(&bounds, &square, &CdtOptions::default(), &mut buffers).unwrap();
//!
//! assert_eq!(buffers.vertices.len(), 8);
//! assert_eq!(buffers.triangle_count(), 4);
//! assert!(buffers.indices[6..].iter().all(|&i| i >= 4));
//! ```

use crate::VertexId;

use alloc::vec::Vec;

/// Structure that holds the vertex and index data.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct VertexBuffers<OutputVertex, OutputIndex> {
    pub vertices: Vec<OutputVertex>,
    pub indices: Vec<OutputIndex>,
}

impl<OutputVertex, OutputIndex> VertexBuffers<OutputVertex, OutputIndex> {
    /// Constructor
    pub fn new() -> Self {
        VertexBuffers::with_capacity(512, 1024)
    }

    /// Constructor
    pub fn with_capacity(num_vertices: usize, num_indices: usize) -> Self {
        VertexBuffers {
            vertices: Vec::with_capacity(num_vertices),
            indices: Vec::with_capacity(num_indices),
        }
    }

    /// Empty the buffers without freeing memory, for reuse without reallocation.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

impl<OutputVertex, OutputIndex: Copy> VertexBuffers<OutputVertex, OutputIndex> {
    /// Iterates over the triangles as triplets of indices.
    pub fn triangles(&self) -> impl Iterator<Item = [OutputIndex; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }
}

impl<OutputVertex, OutputIndex> VertexBuffers<OutputVertex, OutputIndex>
where
    OutputIndex: From<VertexId>,
{
    /// Appends a triangle, offsetting its vertices by `vertex_offset`.
    #[inline]
    pub(crate) fn push_triangle(&mut self, vertex_offset: u32, triangle: [VertexId; 3]) {
        for v in triangle {
            self.indices.push(OutputIndex::from(v + vertex_offset));
        }
    }
}

/// The largest number of vertices an index type can address.
///
/// The tessellator returns `TessellationError::TooManyVertices` instead of
/// writing indices that don't fit.
pub trait MaxIndex {
    const MAX: usize;
}

impl MaxIndex for u16 {
    const MAX: usize = u16::MAX as usize;
}
impl MaxIndex for u32 {
    const MAX: usize = u32::MAX as usize;
}
impl MaxIndex for usize {
    const MAX: usize = u32::MAX as usize;
}

#[test]
fn test_push_triangle_with_offset() {
    let mut buffers: VertexBuffers<(), u32> = VertexBuffers::with_capacity(0, 6);
    buffers.push_triangle(0, [VertexId(0), VertexId(1), VertexId(2)]);
    buffers.push_triangle(10, [VertexId(2), VertexId(1), VertexId(0)]);

    assert_eq!(buffers.triangle_count(), 2);
    let triangles: alloc::vec::Vec<_> = buffers.triangles().collect();
    assert_eq!(triangles, alloc::vec![[0, 1, 2], [12, 11, 10]]);

    buffers.clear();
    assert!(buffers.is_empty());
}
