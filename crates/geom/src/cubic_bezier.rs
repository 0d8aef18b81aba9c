use crate::cubic_classification::{classify_cubic_with_hint, CubicClassification, OrientationHint};
use crate::hull::{quad_hull_triangles, HullTriangles};
use crate::scalar::Scalar;
use crate::{point, Box2D, LineSegment, Point};

/// A 2d curve segment defined by four points: the beginning of the segment, two control
/// points and the end of the segment.
///
/// The curve is defined by equation:
/// ```∀ t ∈ [0..1],  P(t) = (1 - t)³ * from + 3 * (1 - t)² * t * ctrl1 + 3 * t² * (1 - t) * ctrl2 + t³ * to```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct CubicBezierSegment<S> {
    pub from: Point<S>,
    pub ctrl1: Point<S>,
    pub ctrl2: Point<S>,
    pub to: Point<S>,
}

impl<S: Scalar> CubicBezierSegment<S> {
    /// Sample the curve at t (expecting t between 0 and 1).
    pub fn sample(&self, t: S) -> Point<S> {
        let t2 = t * t;
        let t3 = t2 * t;
        let one_t = S::ONE - t;
        let one_t2 = one_t * one_t;
        let one_t3 = one_t2 * one_t;

        self.from * one_t3
            + self.ctrl1.to_vector() * S::THREE * one_t2 * t
            + self.ctrl2.to_vector() * S::THREE * one_t * t2
            + self.to.to_vector() * t3
    }

    /// Split this curve into two sub-curves using de Casteljau's algorithm.
    pub fn split(&self, t: S) -> (CubicBezierSegment<S>, CubicBezierSegment<S>) {
        let ctrl1a = self.from + (self.ctrl1 - self.from) * t;
        let ctrl2a = self.ctrl1 + (self.ctrl2 - self.ctrl1) * t;
        let ctrl1aa = ctrl1a + (ctrl2a - ctrl1a) * t;
        let ctrl3a = self.ctrl2 + (self.to - self.ctrl2) * t;
        let ctrl2aa = ctrl2a + (ctrl3a - ctrl2a) * t;
        let ctrl1aaa = ctrl1aa + (ctrl2aa - ctrl1aa) * t;

        (
            CubicBezierSegment {
                from: self.from,
                ctrl1: ctrl1a,
                ctrl2: ctrl1aa,
                to: ctrl1aaa,
            },
            CubicBezierSegment {
                from: ctrl1aaa,
                ctrl1: ctrl2aa,
                ctrl2: ctrl3a,
                to: self.to,
            },
        )
    }

    #[inline]
    pub fn baseline(&self) -> LineSegment<S> {
        LineSegment {
            from: self.from,
            to: self.to,
        }
    }

    /// Swap the beginning and the end of the segment.
    pub fn flip(&self) -> Self {
        CubicBezierSegment {
            from: self.to,
            ctrl1: self.ctrl2,
            ctrl2: self.ctrl1,
            to: self.from,
        }
    }

    /// The four points in curve order.
    #[inline]
    pub fn points(&self) -> [Point<S>; 4] {
        [self.from, self.ctrl1, self.ctrl2, self.to]
    }

    /// Returns a conservative rectangle the curve is contained in.
    pub fn fast_bounding_box(&self) -> Box2D<S> {
        let min_x = self.from.x.min(self.ctrl1.x).min(self.ctrl2.x).min(self.to.x);
        let max_x = self.from.x.max(self.ctrl1.x).max(self.ctrl2.x).max(self.to.x);
        let min_y = self.from.y.min(self.ctrl1.y).min(self.ctrl2.y).min(self.to.y);
        let max_y = self.from.y.max(self.ctrl1.y).max(self.ctrl2.y).max(self.to.y);

        Box2D {
            min: point(min_x, min_y),
            max: point(max_x, max_y),
        }
    }

    /// Classifies the curve, see the [cubic_classification module](../cubic_classification/index.html).
    #[inline]
    pub fn classify(&self) -> CubicClassification<S> {
        self.classify_with_hint(OrientationHint::Auto)
    }

    #[inline]
    pub fn classify_with_hint(&self, hint: OrientationHint) -> CubicClassification<S> {
        classify_cubic_with_hint(self.from, self.ctrl1, self.ctrl2, self.to, hint)
    }

    /// Triangulates the control hull, as indices into `points()`.
    #[inline]
    pub fn hull_triangles(&self) -> HullTriangles {
        quad_hull_triangles(&self.points())
    }

    pub fn to_f32(&self) -> CubicBezierSegment<f32> {
        CubicBezierSegment {
            from: self.from.to_f32(),
            ctrl1: self.ctrl1.to_f32(),
            ctrl2: self.ctrl2.to_f32(),
            to: self.to.to_f32(),
        }
    }

    pub fn to_f64(&self) -> CubicBezierSegment<f64> {
        CubicBezierSegment {
            from: self.from.to_f64(),
            ctrl1: self.ctrl1.to_f64(),
            ctrl2: self.ctrl2.to_f64(),
            to: self.to.to_f64(),
        }
    }
}

#[test]
fn fast_bounding_box_for_cubic_bezier_segment() {
    let a = CubicBezierSegment {
        from: Point::new(0.0, 0.0),
        ctrl1: Point::new(0.5, 1.0),
        ctrl2: Point::new(1.5, -1.0),
        to: Point::new(2.0, 0.0),
    };

    let expected_aabb = Box2D {
        min: point(0.0, -1.0),
        max: point(2.0, 1.0),
    };

    let actual_aabb = a.fast_bounding_box();

    assert_eq!(expected_aabb, actual_aabb)
}

#[test]
fn split_matches_samples() {
    let curve = CubicBezierSegment {
        from: point(0.0f64, 0.0),
        ctrl1: point(3.0, 3.0),
        ctrl2: point(-1.0, 3.0),
        to: point(2.0, 0.0),
    };

    let t = 0.3;
    let (a, b) = curve.split(t);

    assert_eq!(a.from, curve.from);
    assert_eq!(b.to, curve.to);
    assert_eq!(a.to, b.from);
    assert!((a.to - curve.sample(t)).length() < 1e-12);

    for i in 0..=10 {
        let s = i as f64 / 10.0;
        assert!((a.sample(s) - curve.sample(s * t)).length() < 1e-9);
        assert!((b.sample(s) - curve.sample(t + s * (1.0 - t))).length() < 1e-9);
    }
}

#[test]
fn flipped_curve_has_same_shape() {
    let curve = CubicBezierSegment {
        from: point(0.0f32, 0.0),
        ctrl1: point(1.0, 2.0),
        ctrl2: point(2.0, -2.0),
        to: point(4.0, 1.0),
    };

    let flipped = curve.flip();
    assert_eq!(flipped.flip(), curve);
    assert_eq!(flipped.sample(0.0), curve.sample(1.0));
    assert_eq!(flipped.baseline(), curve.baseline().flip());
    assert_eq!(flipped.classify().curve_type, curve.classify().curve_type);
    assert_eq!(curve.hull_triangles().len(), 2);
}
