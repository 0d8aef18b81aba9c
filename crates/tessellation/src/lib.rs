#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::float_cmp)]
#![allow(clippy::too_many_arguments)]
#![no_std]

//! Constrained Delaunay triangulation of vector outlines.
//!
//! This crate is reexported in [vecmesh](../vecmesh/index.html).
//!
//! ## Overview
//!
//! The most interesting types of this crate are:
//!
//! * [DelaunayTessellator](struct.DelaunayTessellator.html) - Triangulates point sets and
//!   the interior of closed outlines.
//! * [Outline](outline/struct.Outline.html) - The flat point and contour buffers the
//!   tessellator consumes, built from closed polylines.
//! * [VertexBuffers](geometry_builder/struct.VertexBuffers.html) - The output: a vertex
//!   buffer and an index buffer with three indices per triangle.
//!
//! ## The triangulation pipeline
//!
//! Triangulating an outline happens in two steps:
//!
//! 1. All points are inserted one at a time in a Bowyer-Watson triangulation seeded with
//!    a rectangle that encloses the outline. Inserting a point removes the triangles whose
//!    circumcircle contains it and connects the point to the boundary of the resulting
//!    cavity.
//! 2. Every contour edge that is not already an edge of the mesh is forced in: the triangles
//!    it crosses are removed, the points on each side of the edge are triangulated again
//!    and the result is stitched back into the hole. Finally, the triangles that are not
//!    inside of the contours are removed.
//!
//! The output triangles are wound counter-clockwise (in a y-up coordinate system).
//!
//! Internally the positions are processed as `f64`. The vertex buffer contains the input
//! positions unmodified.
//!
//! ## Curves
//!
//! Glyph outlines are made of curves. The usual approach is to triangulate the outline
//! joining the curve endpoints (the curves being approximated by their baselines) and to
//! render the curves separately using the triangles of their control hulls. See the
//! [curve module](curve/index.html).
//!
//! ## Logging
//!
//! Verbose output can be enabled with `DelaunayTessellator::set_logging` (or by setting the
//! `VECMESH_FORCE_LOGGING` environment variable in debug builds). Messages are emitted at the
//! debug level through the [log](https://docs.rs/log/) facade.

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

pub use vecmesh_geom as geom;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

macro_rules! cdt_log {
    ($obj:ident, $fmt:expr) => (
        if $obj.log {
            log::debug!($fmt);
        }
    );
    ($obj:ident, $fmt:expr, $($arg:tt)*) => (
        if $obj.log {
            log::debug!($fmt, $($arg)*);
        }
    );
}

pub mod batch;
mod cdt;
mod constraint;
pub mod curve;
mod delaunay;
mod error;
pub mod geometry_builder;
mod math_utils;
pub mod outline;
pub mod store;

#[cfg(test)]
mod cdt_tests;

pub mod math {
    //! f32 aliases of the geometry types used in the public API.

    pub use crate::geom::{point, vector};

    /// Alias for `euclid::default::Point2D<f32>`.
    pub type Point = crate::geom::Point<f32>;

    /// Alias for `euclid::default::Vector2D<f32>`.
    pub type Vector = crate::geom::Vector<f32>;

    /// Alias for `euclid::default::Box2D<f32>`.
    pub type Box2D = crate::geom::Box2D<f32>;
}

#[doc(inline)]
pub use crate::cdt::*;

#[doc(inline)]
pub use crate::error::*;

#[doc(inline)]
pub use crate::geometry_builder::{MaxIndex, VertexBuffers};

#[doc(inline)]
pub use crate::outline::Outline;

use core::ops::Add;

/// Which side of a contour edge is the inside of the shape, when walking the
/// edge from its first point to its second point in a y-up coordinate system.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum Side {
    /// Counter-clockwise outer contours, clockwise holes.
    Left,
    /// Clockwise outer contours, counter-clockwise holes.
    Right,
}

/// Parameters for the delaunay tessellator.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub struct CdtOptions {
    /// Distance between the bounds and the rectangle that seeds the triangulation.
    ///
    /// Must be positive.
    ///
    /// Default value: `CdtOptions::DEFAULT_MARGIN`.
    pub margin: f32,

    /// Which side of the contour edges is filled.
    ///
    /// Default value: `Left`.
    pub interior: Side,

    /// Added to the squared radius of the circumcircles when testing whether a
    /// point is inside of them.
    ///
    /// Zero means that points exactly on a circle are outside of it.
    ///
    /// Default value: `0.0`.
    pub circumcircle_tolerance: f32,
}

impl CdtOptions {
    /// Default bootstrap margin.
    pub const DEFAULT_MARGIN: f32 = 1.0;
    /// Default inside of the contours.
    pub const DEFAULT_INTERIOR: Side = Side::Left;

    pub const DEFAULT: Self = CdtOptions {
        margin: Self::DEFAULT_MARGIN,
        interior: Self::DEFAULT_INTERIOR,
        circumcircle_tolerance: 0.0,
    };

    #[inline]
    pub fn margin(margin: f32) -> Self {
        Self::DEFAULT.with_margin(margin)
    }

    /// Options for clockwise outer contours.
    #[inline]
    pub fn clockwise() -> Self {
        Self::DEFAULT.with_interior(Side::Right)
    }

    #[inline]
    pub const fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    #[inline]
    pub const fn with_interior(mut self, interior: Side) -> Self {
        self.interior = interior;
        self
    }

    #[inline]
    pub const fn with_circumcircle_tolerance(mut self, tolerance: f32) -> Self {
        self.circumcircle_tolerance = tolerance;
        self
    }
}

impl Default for CdtOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

type Index = u32;

/// The index of a point in the point buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct VertexId(pub Index);

impl VertexId {
    #[inline]
    pub fn to_usize(self) -> usize {
        self.0 as usize
    }
}

impl Add<u32> for VertexId {
    type Output = Self;
    fn add(self, rhs: u32) -> Self {
        VertexId(self.0 + rhs)
    }
}

/// Truncates: the tessellator checks `MaxIndex` before converting.
impl From<VertexId> for u16 {
    fn from(v: VertexId) -> Self {
        v.0 as u16
    }
}
impl From<VertexId> for u32 {
    fn from(v: VertexId) -> Self {
        v.0
    }
}
impl From<VertexId> for usize {
    fn from(v: VertexId) -> Self {
        v.0 as usize
    }
}

/// A point of a contour: the index of its position in the point buffer and the
/// sub-contour it belongs to.
///
/// The points of a sub-contour are consecutive and implicitly closed (the last
/// point is connected to the first one).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct ContourPoint {
    pub point: u32,
    pub contour: u32,
}

impl ContourPoint {
    #[inline]
    pub fn new(point: u32, contour: u32) -> Self {
        ContourPoint { point, contour }
    }

    #[inline]
    pub fn vertex(&self) -> VertexId {
        VertexId(self.point)
    }
}

#[test]
fn test_default_options() {
    let options = CdtOptions::default();
    assert_eq!(options.margin, 1.0);
    assert_eq!(options.interior, Side::Left);
    assert_eq!(options.circumcircle_tolerance, 0.0);
    assert_eq!(options, CdtOptions::DEFAULT);
}

#[test]
fn test_options_builder() {
    let options = CdtOptions::margin(4.0).with_circumcircle_tolerance(0.5);
    assert_eq!(options.margin, 4.0);
    assert_eq!(options.circumcircle_tolerance, 0.5);
    assert_eq!(CdtOptions::clockwise().interior, Side::Right);
}
