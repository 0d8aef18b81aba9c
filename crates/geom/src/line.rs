use crate::predicates::{orientation, segments_intersect, Orientation};
use crate::scalar::Scalar;
use crate::{point, vector, Box2D, Point, Vector};

/// A linear segment.
///
/// Contour edges and triangle sides are both expressed as line segments when
/// testing them against each other.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct LineSegment<S> {
    pub from: Point<S>,
    pub to: Point<S>,
}

impl<S: Scalar> LineSegment<S> {
    /// Sample the segment at t (expecting t between 0 and 1).
    #[inline]
    pub fn sample(&self, t: S) -> Point<S> {
        self.from.lerp(self.to, t)
    }

    /// Returns an inverted version of this segment where the beginning and the end
    /// points are swapped.
    #[inline]
    pub fn flip(&self) -> Self {
        LineSegment {
            from: self.to,
            to: self.from,
        }
    }

    /// Return the smallest rectangle containing this segment.
    #[inline]
    pub fn bounding_box(&self) -> Box2D<S> {
        Box2D {
            min: point(self.from.x.min(self.to.x), self.from.y.min(self.to.y)),
            max: point(self.from.x.max(self.to.x), self.from.y.max(self.to.y)),
        }
    }

    /// Returns the vector between this segment's `from` and `to` points.
    #[inline]
    pub fn to_vector(&self) -> Vector<S> {
        self.to - self.from
    }

    /// Computes the length of this segment.
    #[inline]
    pub fn length(&self) -> S {
        self.to_vector().length()
    }

    /// Computes the squared length of this segment.
    #[inline]
    pub fn square_length(&self) -> S {
        self.to_vector().square_length()
    }

    #[inline]
    pub fn mid_point(&self) -> Point<S> {
        self.from.lerp(self.to, S::HALF)
    }

    /// The segment's direction rotated a quarter turn counter-clockwise.
    ///
    /// Not normalized. In a y-up frame it points to the left of the segment,
    /// towards the interior of a counter-clockwise contour.
    #[inline]
    pub fn left_normal(&self) -> Vector<S> {
        let v = self.to_vector();
        vector(-v.y, v.x)
    }

    /// Which side of the supporting line `p` is on.
    ///
    /// `CounterClockwise` means left of the segment.
    #[inline]
    pub fn side_of(&self, p: Point<S>) -> Orientation {
        orientation(self.from, self.to, p)
    }

    /// Straddle test, see [`segments_intersect`](../predicates/fn.segments_intersect.html).
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        segments_intersect(self.from, self.to, other.from, other.to)
    }

    /// Returns true if the two segments share at least one endpoint.
    #[inline]
    pub fn shares_endpoint(&self, other: &Self) -> bool {
        self.from == other.from
            || self.from == other.to
            || self.to == other.from
            || self.to == other.to
    }

    pub fn to_f32(&self) -> LineSegment<f32> {
        LineSegment {
            from: self.from.to_f32(),
            to: self.to.to_f32(),
        }
    }

    pub fn to_f64(&self) -> LineSegment<f64> {
        LineSegment {
            from: self.from.to_f64(),
            to: self.to.to_f64(),
        }
    }
}

#[test]
fn bounding_box() {
    let l1 = LineSegment {
        from: point(1.0, 5.0),
        to: point(5.0, 7.0),
    };
    let r1 = Box2D {
        min: point(1.0, 5.0),
        max: point(5.0, 7.0),
    };

    let l2 = LineSegment {
        from: point(5.0, 5.0),
        to: point(1.0, 1.0),
    };
    let r2 = Box2D {
        min: point(1.0, 1.0),
        max: point(5.0, 5.0),
    };

    for &(seg, r) in &[(l1, r1), (l2, r2)] {
        assert_eq!(seg.bounding_box(), r);
    }
}

#[test]
fn left_normal() {
    let l = LineSegment {
        from: point(0.0f32, 0.0),
        to: point(2.0, 0.0),
    };

    assert_eq!(l.left_normal(), vector(0.0, 2.0));
    assert_eq!(l.flip().left_normal(), vector(0.0, -2.0));
    assert_eq!(l.side_of(point(1.0, 1.0)), Orientation::CounterClockwise);
    assert_eq!(l.side_of(point(1.0, -1.0)), Orientation::Clockwise);
    assert_eq!(l.side_of(point(5.0, 0.0)), Orientation::Collinear);
}

#[test]
fn intersection_touching() {
    let l1 = LineSegment {
        from: point(0.0f32, 0.0),
        to: point(10.0, 10.0),
    };

    let l2 = LineSegment {
        from: point(10.0, 10.0),
        to: point(10.0, 0.0),
    };

    // Touching segments count as straddling, callers filter shared endpoints.
    assert!(l1.shares_endpoint(&l2));
    assert!(l1.intersects(&l2));

    let l3 = LineSegment {
        from: point(0.0, 10.0),
        to: point(10.0, 0.0),
    };
    assert!(!l1.shares_endpoint(&l3));
    assert!(l1.intersects(&l3));
    assert!(!l2.flip().intersects(&LineSegment {
        from: point(0.0, 1.0),
        to: point(5.0, 1.0),
    }));
}
