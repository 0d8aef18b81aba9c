use crate::predicates::{is_clockwise, point_in_triangle, signed_area};
use crate::scalar::Scalar;
use crate::{point, Box2D, Circumcircle, LineSegment, Point};

/// A 2D triangle defined by three points `a`, `b` and `c`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Triangle<S> {
    pub a: Point<S>,
    pub b: Point<S>,
    pub c: Point<S>,
}

impl<S: Scalar> Triangle<S> {
    /// Points on the edges are outside. Winding doesn't matter.
    #[inline]
    pub fn contains_point(&self, p: Point<S>) -> bool {
        point_in_triangle(p, self.a, self.b, self.c)
    }

    /// Same as `contains_point` except that points on the edges (within
    /// `tolerance` in barycentric units) are inside.
    pub fn contains_point_inclusive(&self, p: Point<S>, tolerance: S) -> bool {
        let v0 = self.b - self.a;
        let v1 = self.c - self.a;
        let v2 = p - self.a;
        let det = v0.cross(v1);
        if det == S::ZERO {
            return false;
        }

        let inv = S::ONE / det;
        let u = v2.cross(v1) * inv;
        let v = v0.cross(v2) * inv;
        let w = S::ONE - u - v;

        u >= -tolerance && v >= -tolerance && w >= -tolerance
    }

    /// Positive if the triangle is wound counter-clockwise in a y-up frame.
    #[inline]
    pub fn signed_area(&self) -> S {
        signed_area(self.a, self.b, self.c)
    }

    #[inline]
    pub fn area(&self) -> S {
        self.signed_area().abs()
    }

    #[inline]
    pub fn is_clockwise(&self) -> bool {
        is_clockwise(self.a, self.b, self.c)
    }

    #[inline]
    pub fn centroid(&self) -> Point<S> {
        let sum = self.a.to_vector() + self.b.to_vector() + self.c.to_vector();
        (sum / S::THREE).to_point()
    }

    #[inline]
    pub fn circumcircle(&self) -> Circumcircle<S> {
        Circumcircle::new(self.a, self.b, self.c)
    }

    /// Returns the same triangle with `b` and `c` swapped.
    #[inline]
    pub fn flip(&self) -> Self {
        Triangle {
            a: self.a,
            b: self.c,
            c: self.b,
        }
    }

    /// Returns the smallest rectangle that contains this triangle.
    #[inline]
    pub fn bounding_box(&self) -> Box2D<S> {
        let min_x = self.a.x.min(self.b.x).min(self.c.x);
        let max_x = self.a.x.max(self.b.x).max(self.c.x);
        let min_y = self.a.y.min(self.b.y).min(self.c.y);
        let max_y = self.a.y.max(self.b.y).max(self.c.y);

        Box2D {
            min: point(min_x, min_y),
            max: point(max_x, max_y),
        }
    }

    #[inline]
    pub fn ab(&self) -> LineSegment<S> {
        LineSegment {
            from: self.a,
            to: self.b,
        }
    }

    #[inline]
    pub fn bc(&self) -> LineSegment<S> {
        LineSegment {
            from: self.b,
            to: self.c,
        }
    }

    #[inline]
    pub fn ca(&self) -> LineSegment<S> {
        LineSegment {
            from: self.c,
            to: self.a,
        }
    }

    /// The three sides in winding order.
    #[inline]
    pub fn sides(&self) -> [LineSegment<S>; 3] {
        [self.ab(), self.bc(), self.ca()]
    }

    /// Returns true if `segment` crosses one of the sides that doesn't share an
    /// endpoint with it.
    pub fn is_crossed_by(&self, segment: &LineSegment<S>) -> bool {
        self.sides()
            .iter()
            .any(|side| !side.shares_endpoint(segment) && side.intersects(segment))
    }
}

#[test]
fn test_triangle_contains() {
    assert!(Triangle {
        a: point(0.0, 0.0),
        b: point(1.0, 0.0),
        c: point(0.0, 1.0),
    }
    .contains_point(point(0.2, 0.2)));
    assert!(!Triangle {
        a: point(0.0, 0.0),
        b: point(1.0, 0.0),
        c: point(0.0, 1.0),
    }
    .contains_point(point(1.2, 0.2)));

    // Triangle vertex winding should not matter
    assert!(Triangle {
        a: point(1.0, 0.0),
        b: point(0.0, 0.0),
        c: point(0.0, 1.0),
    }
    .contains_point(point(0.2, 0.2)));

    // Point exactly on the edge counts as outside the triangle.
    assert!(!Triangle {
        a: point(0.0, 0.0),
        b: point(1.0, 0.0),
        c: point(0.0, 1.0),
    }
    .contains_point(point(0.0, 0.0)));
}

#[test]
fn test_triangle_contains_inclusive() {
    let t = Triangle {
        a: point(0.0f32, 0.0),
        b: point(1.0, 0.0),
        c: point(0.0, 1.0),
    };

    assert!(t.contains_point_inclusive(point(0.0, 0.0), 0.0));
    assert!(t.contains_point_inclusive(point(0.5, 0.0), 0.0));
    assert!(t.flip().contains_point_inclusive(point(0.2, 0.2), 0.0));
    assert!(!t.contains_point_inclusive(point(0.6, 0.6), 0.0));
    assert!(t.contains_point_inclusive(point(0.6, 0.6), 0.5));
}

#[test]
fn test_area_and_winding() {
    let t = Triangle {
        a: point(0.0f64, 0.0),
        b: point(4.0, 0.0),
        c: point(0.0, 3.0),
    };

    assert_eq!(t.signed_area(), 6.0);
    assert_eq!(t.flip().signed_area(), -6.0);
    assert_eq!(t.flip().area(), 6.0);
    assert!(!t.is_clockwise());
    assert!(t.flip().is_clockwise());

    let c = t.centroid();
    assert!((c.x - 4.0 / 3.0).abs() < 1e-12);
    assert!((c.y - 1.0).abs() < 1e-12);

    let circle = t.circumcircle();
    assert!((circle.center - point(2.0, 1.5)).length() < 1e-9);
}

#[test]
fn test_crossed_by() {
    let tri = Triangle {
        a: point(1.0f32, 1.0),
        b: point(6.0, 1.0),
        c: point(3.0, 6.0),
    };

    let crossing = LineSegment {
        from: point(2.0, 0.0),
        to: point(3.0, 4.0),
    };
    assert!(tri.is_crossed_by(&crossing));

    let outside = LineSegment {
        from: point(1.0, 3.0),
        to: point(0.0, 4.0),
    };
    assert!(!tri.is_crossed_by(&outside));

    // A segment starting at a vertex and leaving through the opposite side.
    let from_vertex = LineSegment {
        from: point(1.0, 1.0),
        to: point(6.0, 6.0),
    };
    assert!(tri.is_crossed_by(&from_vertex));

    // A triangle is not crossed by its own sides.
    assert!(!tri.is_crossed_by(&tri.ab()));
    assert!(!tri.is_crossed_by(&tri.bc()));
    assert!(!tri.is_crossed_by(&tri.ca()));
}

#[test]
fn test_bounding_box() {
    let t1 = Triangle {
        a: point(10.0, 20.0),
        b: point(35.0, 40.0),
        c: point(50.0, 10.0),
    };
    let r1 = Box2D {
        min: point(10.0, 10.0),
        max: point(50.0, 40.0),
    };

    let t2 = Triangle {
        a: point(5.0, 30.0),
        b: point(25.0, 10.0),
        c: point(35.0, 40.0),
    };
    let r2 = Box2D {
        min: point(5.0, 10.0),
        max: point(35.0, 40.0),
    };

    let cases = std::vec![(t1, r1), (t2, r2)];
    for &(tri, r) in &cases {
        assert_eq!(tri.bounding_box(), r);
    }
}
