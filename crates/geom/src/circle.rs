use crate::scalar::{Float, Scalar};
use crate::{point, Point};

/// The circle passing through the three vertices of a triangle.
///
/// Only the squared radius is stored since the triangulation only ever
/// compares squared distances against it.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Circumcircle<S> {
    pub center: Point<S>,
    pub square_radius: S,
}

impl<S: Scalar> Circumcircle<S> {
    /// Computes the circumscribed circle of `p0 p1 p2`.
    ///
    /// The machine epsilon is added to the denominator so that collinear
    /// points produce a huge (but finite in most cases) circle instead of
    /// dividing by zero. The result is imprecise for near-degenerate triangles.
    pub fn new(p0: Point<S>, p1: Point<S>, p2: Point<S>) -> Self {
        let d0 = p0.to_vector().square_length();
        let d1 = p1.to_vector().square_length();
        let d2 = p2.to_vector().square_length();

        let aux1 = d0 * (p2.y - p1.y) + d1 * (p0.y - p2.y) + d2 * (p1.y - p0.y);
        let aux2 = -(d0 * (p2.x - p1.x) + d1 * (p0.x - p2.x) + d2 * (p1.x - p0.x));
        let div = S::TWO * (p0.x * (p2.y - p1.y) + p1.x * (p0.y - p2.y) + p2.x * (p1.y - p0.y))
            + <S as Float>::epsilon();

        let center = point(aux1 / div, aux2 / div);

        Circumcircle {
            center,
            square_radius: (center - p0).square_length(),
        }
    }

    /// Strict containment test: points exactly on the circle are outside.
    #[inline]
    pub fn contains_point(&self, p: Point<S>) -> bool {
        (p - self.center).square_length() < self.square_radius
    }

    /// Same as `contains_point` with the squared radius inflated by `tolerance`.
    #[inline]
    pub fn contains_point_with_tolerance(&self, p: Point<S>, tolerance: S) -> bool {
        (p - self.center).square_length() < self.square_radius + tolerance
    }

    pub fn radius(&self) -> S {
        self.square_radius.sqrt()
    }

    pub fn to_f32(&self) -> Circumcircle<f32> {
        Circumcircle {
            center: self.center.to_f32(),
            square_radius: self.square_radius.to_f32().unwrap_or(f32::MAX),
        }
    }

    pub fn to_f64(&self) -> Circumcircle<f64> {
        Circumcircle {
            center: self.center.to_f64(),
            square_radius: self.square_radius.to_f64().unwrap_or(f64::MAX),
        }
    }
}

#[test]
fn test_right_triangle() {
    let c = Circumcircle::new(point(0.0f64, 0.0), point(2.0, 0.0), point(0.0, 2.0));
    assert!((c.center - point(1.0, 1.0)).length() < 1e-9);
    assert!((c.square_radius - 2.0).abs() < 1e-9);

    // Same circle regardless of the winding.
    let c2 = Circumcircle::new(point(0.0f64, 0.0), point(0.0, 2.0), point(2.0, 0.0));
    assert!((c2.center - c.center).length() < 1e-9);
}

#[test]
fn test_contains_point_is_strict() {
    let c = Circumcircle::new(point(0.0f64, 0.0), point(2.0, 0.0), point(0.0, 2.0));

    assert!(c.contains_point(point(1.0, 1.0)));
    assert!(c.contains_point(point(0.5, 0.5)));
    assert!(!c.contains_point(point(3.0, 3.0)));
    // The fourth corner of the square lies exactly on the circle.
    assert!(!c.contains_point(point(2.0, 2.0)));
    assert!(c.contains_point_with_tolerance(point(2.0, 2.0), 0.001));
}

#[test]
fn test_collinear_points_do_not_divide_by_zero() {
    let c = Circumcircle::new(point(0.0f32, 0.0), point(1.0, 0.0), point(2.0, 0.0));
    assert!(!c.center.x.is_nan());
    assert!(!c.center.y.is_nan());
}
