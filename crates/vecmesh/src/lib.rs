#![deny(bare_trait_objects)]
#![no_std]

//! Triangulation of vector shapes for GPU rendering.
//!
//! # Crates
//!
//! This meta-crate (`vecmesh`) reexports the following sub-crates for convenience:
//!
//! * **vecmesh_tessellation** - Constrained Delaunay triangulation of outlines and the
//!   hull meshes of cubic bézier curves.
//! * **vecmesh_geom** - Triangles, circumcircles, orientation predicates and the
//!   classification of cubic bézier curves.
//!
//! Each `vecmesh_<name>` crate is reexported as a `<name>` module in `vecmesh`. For example:
//!
//! ```ignore
//! extern crate vecmesh_tessellation;
//! use vecmesh_tessellation::DelaunayTessellator;
//! ```
//!
//! Is equivalent to:
//!
//! ```ignore
//! extern crate vecmesh;
//! use vecmesh::tessellation::DelaunayTessellator;
//! ```
//!
//! # Feature flags
//!
//! * `serialization`: serde support for the options, outlines and output buffers.
//! * `parallel`: the `tessellation::batch` module distributes shapes over rayon's thread pool.
//! * `std` (default): without it the crates only depend on `core` and `alloc`.
//!
//! # Examples
//!
//! ## Triangulating a glyph-like outline
//!
//! The straight edges of the outline go to the constrained tessellator, the curves are
//! rendered separately using the triangles of their control hulls.
//!
//! ```
//! use vecmesh::math::{point, Point};
//! use vecmesh::geom::CubicBezierSegment;
//! use vecmesh::tessellation::curve::{fill_cubic, CurveVertex};
//! use vecmesh::tessellation::{CdtOptions, DelaunayTessellator, Outline, VertexBuffers};
//!
//! // The baseline of the curve closes the outline.
//! let curve = CubicBezierSegment {
//!     from: point(4.0, 0.0),
//!     ctrl1: point(5.0, 1.0),
//!     ctrl2: point(5.0, 3.0),
//!     to: point(4.0, 4.0),
//! };
//!
//! let mut builder = Outline::builder();
//! builder.add_polygon(&[point(0.0, 0.0), curve.from, curve.to, point(0.0, 4.0)]);
//! let outline = builder.build();
//!
//! let mut geometry: VertexBuffers<Point, u16> = VertexBuffers::new();
//! let mut tessellator = DelaunayTessellator::new();
//! outline.triangulate(&mut tessellator, &CdtOptions::default(), &mut geometry).unwrap();
//!
//! let mut curves: Vec<CurveVertex> = Vec::new();
//! fill_cubic(&curve, &mut curves);
//!
//! assert_eq!(geometry.triangle_count(), 2);
//! assert_eq!(curves.len() % 3, 0);
//! ```

pub extern crate vecmesh_tessellation;

pub use vecmesh_tessellation as tessellation;
pub use tessellation::geom;

pub use tessellation::math;
