#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::excessive_precision)]
#![allow(clippy::let_and_return)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::float_cmp)]
#![no_std]

//! Simple 2D geometric primitives on top of euclid.
//!
//! This crate is reexported in [vecmesh](../vecmesh/index.html).
//!
//! # Overview.
//!
//! This crate implements the maths needed to mesh vector outlines:
//!
//! - orientation, segment intersection and point-in-triangle predicates,
//! - triangles and their circumscribed circles,
//! - line segments,
//! - cubic bézier curves and their classification into the canonical
//!   families used for implicit curve rendering.
//!
//! # Predicates
//!
//! All of the predicates are plain floating point tests. They do not try to be
//! robust in the sense of exact arithmetic: ties are broken in a consistent way
//! (collinear points have no orientation, points on a circle are outside of it)
//! and the algorithms built on top of them are expected to tolerate imprecise
//! answers near degenerate configurations.
//!
//! # Cubic classification
//!
//! A cubic bézier curve is either a serpentine, a loop, a cusp, a quadratic
//! curve or a line, depending on the sign of the discriminant of its
//! implicit form. [`CubicBezierSegment::classify`] computes that family along with
//! the per-control-point `(k, l, m)` coefficients that a fragment shader can
//! interpolate to evaluate `k³ - l·m` and decide which side of the curve a
//! pixel is on.

#[cfg(any(test, feature = "std"))]
extern crate std;

// Reexport dependencies.
pub use arrayvec;
pub use euclid;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

mod circle;
pub mod cubic_bezier;
pub mod cubic_classification;
mod hull;
mod line;
pub mod predicates;
mod triangle;

#[doc(inline)]
pub use crate::circle::Circumcircle;
#[doc(inline)]
pub use crate::cubic_bezier::CubicBezierSegment;
#[doc(inline)]
pub use crate::cubic_classification::{
    classify_cubic, CubicClassification, CurveType, LoopSplit, OrientationHint,
};
#[doc(inline)]
pub use crate::hull::{quad_hull_triangles, HullTriangles};
#[doc(inline)]
pub use crate::line::LineSegment;
#[doc(inline)]
pub use crate::predicates::{
    is_clockwise, orientation, point_in_triangle, segments_intersect, signed_area, Orientation,
};
#[doc(inline)]
pub use crate::triangle::Triangle;

pub use crate::scalar::Scalar;

mod scalar {
    pub(crate) use num_traits::{Float, NumCast};

    use core::fmt::{Debug, Display};
    use core::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

    pub trait Scalar:
        Float + NumCast + Sized + Display + Debug + AddAssign + SubAssign + MulAssign + DivAssign
    {
        const HALF: Self;
        const ZERO: Self;
        const ONE: Self;
        const TWO: Self;
        const THREE: Self;
        const FOUR: Self;
        const SIX: Self;
        const NINE: Self;
        const TWELVE: Self;

        const ONE_THIRD: Self;
        const TWO_THIRDS: Self;
    }

    impl Scalar for f32 {
        const HALF: Self = 0.5;
        const ZERO: Self = 0.0;
        const ONE: Self = 1.0;
        const TWO: Self = 2.0;
        const THREE: Self = 3.0;
        const FOUR: Self = 4.0;
        const SIX: Self = 6.0;
        const NINE: Self = 9.0;
        const TWELVE: Self = 12.0;

        const ONE_THIRD: Self = 1.0 / 3.0;
        const TWO_THIRDS: Self = 2.0 / 3.0;
    }

    impl Scalar for f64 {
        const HALF: Self = 0.5;
        const ZERO: Self = 0.0;
        const ONE: Self = 1.0;
        const TWO: Self = 2.0;
        const THREE: Self = 3.0;
        const FOUR: Self = 4.0;
        const SIX: Self = 6.0;
        const NINE: Self = 9.0;
        const TWELVE: Self = 12.0;

        const ONE_THIRD: Self = 1.0 / 3.0;
        const TWO_THIRDS: Self = 2.0 / 3.0;
    }
}

/// Alias for `euclid::default::Point2D`.
pub use euclid::default::Point2D as Point;

/// Alias for `euclid::default::Vector2D`.
pub use euclid::default::Vector2D as Vector;

/// Alias for `euclid::default::Box2D`
pub use euclid::default::Box2D;

/// Shorthand for `Vector::new(x, y)`.
#[inline]
pub fn vector<S>(x: S, y: S) -> Vector<S> {
    Vector::new(x, y)
}

/// Shorthand for `Point::new(x, y)`.
#[inline]
pub fn point<S>(x: S, y: S) -> Point<S> {
    Point::new(x, y)
}
