//! Classification of cubic bézier curves for implicit rendering.
//!
//! The implicit form of a cubic is `k³ - l·m = 0` where `k`, `l` and `m` are
//! linear functionals of the position. Assigning `(k, l, m)` coordinates to the
//! four control points and interpolating them across the control hull lets a
//! fragment shader evaluate the sign of the implicit function per pixel.
//!
//! The coordinates depend on the family of the curve, which is given by the
//! sign of the discriminant of the cubic's inflection point polynomial:
//!
//! | discriminant           | family                          |
//! |------------------------|---------------------------------|
//! | `> 0`                  | serpentine                      |
//! | `< 0`                  | loop                            |
//! | `= 0`, `d1 ≠ 0`        | cusp                            |
//! | `= 0`, `d1 = d2 = 0`   | quadratic (line if `d3 = 0` too) |
//!
//! Loops may double back on themselves inside of the `[0, 1]` range, in which
//! case the control hull can't be rendered with a single set of coordinates
//! and the curve has to be split at the reported parameter.

use crate::scalar::Scalar;
use crate::Point;

/// The canonical families of cubic bézier curves.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum CurveType {
    Serpentine,
    Loop,
    Cusp,
    Quadratic,
    Line,
}

/// Forced orientation for the halves of a loop that was split.
///
/// `Auto` is used for a curve seen for the first time. The two halves of a
/// split loop are classified with `Keep` and `Reverse` so that they don't
/// report the same split again and so that they end up oriented consistently.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum OrientationHint {
    Auto,
    Keep,
    Reverse,
}

impl Default for OrientationHint {
    fn default() -> Self {
        OrientationHint::Auto
    }
}

/// The result of `classify_cubic`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct CubicClassification<S> {
    pub curve_type: CurveType,
    /// `(k, l, m)` for `from`, `ctrl1`, `ctrl2` and `to`, before orientation.
    pub coords: [[S; 3]; 4],
    /// Whether the sign of `k` and `l` must be inverted so that the inside of the
    /// curve is on the expected side.
    pub flip: bool,
    /// For loops that self-intersect inside of `]0, 1[`, where the curve must be split
    /// before rendering.
    pub split: Option<LoopSplit<S>>,
}

/// Where to split a self-intersecting loop and how to orient the two halves.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct LoopSplit<S> {
    /// The curve parameter of the split, in `]0, 1[`.
    pub t: S,
    /// The hints to classify the `[0, t]` and `[t, 1]` halves with.
    pub hints: [OrientationHint; 2],
}

impl<S: Scalar> CubicClassification<S> {
    /// The coordinates with `k` and `l` negated if `flip` is set.
    pub fn oriented_coords(&self) -> [[S; 3]; 4] {
        let mut coords = self.coords;
        if self.flip {
            for c in &mut coords {
                c[0] = -c[0];
                c[1] = -c[1];
            }
        }

        coords
    }

    /// Returns true if there is nothing to render for this curve.
    #[inline]
    pub fn is_line(&self) -> bool {
        self.curve_type == CurveType::Line
    }
}

/// The `d1`, `d2` and `d3` terms of the inflection point polynomial.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct InflectionTerms<S> {
    pub d1: S,
    pub d2: S,
    pub d3: S,
}

impl<S: Scalar> InflectionTerms<S> {
    pub fn new(p0: Point<S>, p1: Point<S>, p2: Point<S>, p3: Point<S>) -> Self {
        // Mixed products of the control points lifted to homogeneous coordinates.
        let a1 = homogeneous_det(p0, p3, p2);
        let a2 = homogeneous_det(p1, p0, p3);
        let a3 = homogeneous_det(p2, p1, p0);

        InflectionTerms {
            d1: a1 - S::TWO * a2 + S::THREE * a3,
            d2: -a2 + S::THREE * a3,
            d3: S::THREE * a3,
        }
    }

    /// `3·d2² - 4·d1·d3`
    #[inline]
    pub fn discriminant(&self) -> S {
        S::THREE * self.d2 * self.d2 - S::FOUR * self.d1 * self.d3
    }

    pub fn curve_type(&self) -> CurveType {
        let big_d = self.discriminant();
        let disc = self.d1 * self.d1 * big_d;

        if disc == S::ZERO {
            if self.d1 == S::ZERO && self.d2 == S::ZERO {
                if self.d3 == S::ZERO {
                    return CurveType::Line;
                }
                return CurveType::Quadratic;
            }

            if self.d1 != S::ZERO {
                return CurveType::Cusp;
            }

            if big_d < S::ZERO {
                return CurveType::Loop;
            }

            return CurveType::Serpentine;
        }

        if disc > S::ZERO {
            CurveType::Serpentine
        } else {
            CurveType::Loop
        }
    }
}

/// `a · (b × c)` with `a`, `b` and `c` lifted to `(x, y, 1)`.
#[inline]
fn homogeneous_det<S: Scalar>(a: Point<S>, b: Point<S>, c: Point<S>) -> S {
    let x = b.y - c.y;
    let y = c.x - b.x;
    let z = b.x * c.y - b.y * c.x;

    a.x * x + a.y * y + z
}

/// Classifies the cubic bézier curve `p0 p1 p2 p3`.
///
/// Equivalent to `classify_cubic_with_hint(p0, p1, p2, p3, OrientationHint::Auto)`.
pub fn classify_cubic<S: Scalar>(
    p0: Point<S>,
    p1: Point<S>,
    p2: Point<S>,
    p3: Point<S>,
) -> CubicClassification<S> {
    classify_cubic_with_hint(p0, p1, p2, p3, OrientationHint::Auto)
}

/// Classifies the cubic bézier curve `p0 p1 p2 p3` with a forced orientation.
///
/// With `Keep` or `Reverse` no split parameter is reported and the loop's own
/// orientation test is skipped. `Reverse` inverts the resulting flip flag.
pub fn classify_cubic_with_hint<S: Scalar>(
    p0: Point<S>,
    p1: Point<S>,
    p2: Point<S>,
    p3: Point<S>,
    hint: OrientationHint,
) -> CubicClassification<S> {
    let terms = InflectionTerms::new(p0, p1, p2, p3);
    let curve_type = terms.curve_type();

    let mut result = match curve_type {
        CurveType::Serpentine => serpentine(&terms),
        CurveType::Loop => loop_coords(&terms, hint),
        CurveType::Cusp => cusp(&terms),
        CurveType::Quadratic => quadratic(&terms),
        CurveType::Line => CubicClassification {
            curve_type,
            coords: [[S::ZERO; 3]; 4],
            flip: false,
            split: None,
        },
    };

    if hint == OrientationHint::Reverse && curve_type != CurveType::Line {
        result.flip = !result.flip;
    }

    result
}

fn serpentine<S: Scalar>(terms: &InflectionTerms<S>) -> CubicClassification<S> {
    let InflectionTerms { d1, d2, d3 } = *terms;

    let t1 = (S::NINE * d2 * d2 - S::TWELVE * d1 * d3).sqrt();
    let ls = S::THREE * d2 - t1;
    let lt = S::SIX * d1;
    let ms = S::THREE * d2 + t1;
    let mt = lt;
    let lt_ls = lt - ls;
    let mt_ms = mt - ms;

    let coords = [
        [ls * ms, ls * ls * ls, ms * ms * ms],
        [
            S::ONE_THIRD * (S::THREE * ls * ms - ls * mt - lt * ms),
            ls * ls * (ls - lt),
            ms * ms * (ms - mt),
        ],
        [
            S::ONE_THIRD * (lt * (mt - S::TWO * ms) + ls * (S::THREE * ms - S::TWO * mt)),
            lt_ls * lt_ls * ls,
            mt_ms * mt_ms * ms,
        ],
        [lt_ls * mt_ms, -(lt_ls * lt_ls * lt_ls), -(mt_ms * mt_ms * mt_ms)],
    ];

    CubicClassification {
        curve_type: CurveType::Serpentine,
        coords,
        flip: d1 < S::ZERO,
        split: None,
    }
}

fn loop_coords<S: Scalar>(
    terms: &InflectionTerms<S>,
    hint: OrientationHint,
) -> CubicClassification<S> {
    let InflectionTerms { d1, d2, d3 } = *terms;

    let t1 = (S::FOUR * d1 * d3 - S::THREE * d2 * d2).sqrt();
    let ls = d2 - t1;
    let lt = S::TWO * d1;
    let ms = d2 + t1;
    let mt = lt;

    // The double point's parameters. If one of them lies in the curve's range the
    // curve folds over itself there.
    // The half on the side of the offending parameter gets its orientation reversed.
    let mut split = None;
    let ql = ls / lt;
    let qm = ms / mt;
    if ql > S::ZERO && ql < S::ONE {
        split = Some(LoopSplit {
            t: ql,
            hints: [OrientationHint::Keep, OrientationHint::Reverse],
        });
    }
    if qm > S::ZERO && qm < S::ONE {
        split = Some(LoopSplit {
            t: qm,
            hints: [OrientationHint::Reverse, OrientationHint::Keep],
        });
    }

    let lt_ls = lt - ls;
    let mt_ms = mt - ms;

    let coords = [
        [ls * ms, ls * ls * ms, ls * ms * ms],
        [
            S::ONE_THIRD * (-ls * mt - lt * ms + S::THREE * ls * ms),
            -S::ONE_THIRD * ls * (ls * (mt - S::THREE * ms) + S::TWO * lt * ms),
            -S::ONE_THIRD * ms * (ls * (S::TWO * mt - S::THREE * ms) + lt * ms),
        ],
        [
            S::ONE_THIRD * (lt * (mt - S::TWO * ms) + ls * (S::THREE * ms - S::TWO * mt)),
            S::ONE_THIRD * lt_ls * (ls * (S::TWO * mt - S::THREE * ms) + lt * ms),
            S::ONE_THIRD * mt_ms * (ls * (mt - S::THREE * ms) + S::TWO * lt * ms),
        ],
        [lt_ls * mt_ms, -(lt_ls * lt_ls) * mt_ms, -lt_ls * mt_ms * mt_ms],
    ];

    let (flip, split) = match hint {
        OrientationHint::Auto => {
            let k0 = coords[0][0];
            let flip = (d1 > S::ZERO && k0 < S::ZERO) || (d1 < S::ZERO && k0 > S::ZERO);
            (flip, split)
        }
        OrientationHint::Keep | OrientationHint::Reverse => (false, None),
    };

    CubicClassification {
        curve_type: CurveType::Loop,
        coords,
        flip,
        split,
    }
}

fn cusp<S: Scalar>(terms: &InflectionTerms<S>) -> CubicClassification<S> {
    let ls = terms.d3;
    let lt = S::THREE * terms.d2;
    let ls_lt = ls - lt;

    let coords = [
        [ls, ls * ls * ls, S::ONE],
        [ls - S::TWO_THIRDS * lt, ls * ls * ls_lt, S::ONE],
        [ls - S::TWO_THIRDS * lt, ls_lt * ls_lt * ls, S::ONE],
        [ls_lt, ls_lt * ls_lt * ls_lt, S::ONE],
    ];

    CubicClassification {
        curve_type: CurveType::Cusp,
        coords,
        flip: false,
        split: None,
    }
}

fn quadratic<S: Scalar>(terms: &InflectionTerms<S>) -> CubicClassification<S> {
    let coords = [
        [S::ZERO, S::ZERO, S::ZERO],
        [S::ONE_THIRD, S::ZERO, S::ONE_THIRD],
        [S::TWO_THIRDS, S::ONE_THIRD, S::TWO_THIRDS],
        [S::ONE, S::ONE, S::ONE],
    ];

    CubicClassification {
        curve_type: CurveType::Quadratic,
        coords,
        flip: terms.d3 < S::ZERO,
        split: None,
    }
}

#[cfg(test)]
use crate::point;

#[test]
fn straight_line() {
    let c = classify_cubic(
        point(0.0f32, 0.0),
        point(1.0, 0.0),
        point(2.0, 0.0),
        point(3.0, 0.0),
    );
    assert_eq!(c.curve_type, CurveType::Line);
    assert!(c.is_line());
    assert_eq!(c.split, None);

    // Diagonal line, evenly spaced.
    let c = classify_cubic(
        point(0.0f64, 0.0),
        point(1.0, 2.0),
        point(2.0, 4.0),
        point(3.0, 6.0),
    );
    assert_eq!(c.curve_type, CurveType::Line);
}

#[test]
fn elevated_quadratic() {
    // The degree elevation of the quadratic curve (0, 0) (1.5, 1.5) (3, 0).
    let c = classify_cubic(
        point(0.0f32, 0.0),
        point(1.0, 1.0),
        point(2.0, 1.0),
        point(3.0, 0.0),
    );
    assert_eq!(c.curve_type, CurveType::Quadratic);
    assert!(!c.flip);
    assert_eq!(c.coords[0], [0.0, 0.0, 0.0]);
    assert_eq!(c.coords[3], [1.0, 1.0, 1.0]);

    // Same curve, traversed in the other direction flips.
    let c = classify_cubic(
        point(3.0f32, 0.0),
        point(2.0, 1.0),
        point(1.0, 1.0),
        point(0.0, 0.0),
    );
    assert_eq!(c.curve_type, CurveType::Quadratic);
    assert!(c.flip);
}

#[test]
fn self_intersecting_loop() {
    let p = [
        point(0.0f64, 0.0),
        point(3.0, 3.0),
        point(-1.0, 3.0),
        point(2.0, 0.0),
    ];
    let c = classify_cubic(p[0], p[1], p[2], p[3]);
    assert_eq!(c.curve_type, CurveType::Loop);

    let split = c.split.unwrap();
    let t = split.t;
    assert!(t > 0.0 && t < 1.0);
    assert!((t - 0.172673).abs() < 1e-5);
    assert_eq!(
        split.hints,
        [OrientationHint::Reverse, OrientationHint::Keep]
    );

    // The curve passes twice through its double point.
    let curve = crate::CubicBezierSegment {
        from: p[0],
        ctrl1: p[1],
        ctrl2: p[2],
        to: p[3],
    };
    let a = curve.sample(t);
    let b = curve.sample(1.0 - t);
    assert!((a - b).length() < 1e-6);
}

#[test]
fn loop_hints() {
    let p = [
        point(0.0f32, 0.0),
        point(3.0, 3.0),
        point(-1.0, 3.0),
        point(2.0, 0.0),
    ];

    let auto = classify_cubic_with_hint(p[0], p[1], p[2], p[3], OrientationHint::Auto);
    assert!(auto.split.is_some());
    assert!(auto.flip);

    let keep = classify_cubic_with_hint(p[0], p[1], p[2], p[3], OrientationHint::Keep);
    assert_eq!(keep.curve_type, CurveType::Loop);
    assert_eq!(keep.split, None);
    assert!(!keep.flip);

    let reverse = classify_cubic_with_hint(p[0], p[1], p[2], p[3], OrientationHint::Reverse);
    assert_eq!(reverse.split, None);
    assert!(reverse.flip);
    assert_eq!(reverse.coords, keep.coords);
}

#[test]
fn cusp_and_serpentine() {
    let c = classify_cubic(
        point(0.0f32, 0.0),
        point(1.0, 1.0),
        point(0.0, 1.0),
        point(1.0, 0.0),
    );
    assert_eq!(c.curve_type, CurveType::Cusp);
    assert!(!c.flip);
    for coords in &c.coords {
        assert_eq!(coords[2], 1.0);
    }

    let c = classify_cubic(
        point(0.0f32, 0.0),
        point(1.0, 2.0),
        point(2.0, -2.0),
        point(4.0, 1.0),
    );
    assert_eq!(c.curve_type, CurveType::Serpentine);
    assert!(c.flip);
    assert_eq!(c.split, None);

    let oriented = c.oriented_coords();
    for i in 0..4 {
        assert_eq!(oriented[i][0], -c.coords[i][0]);
        assert_eq!(oriented[i][1], -c.coords[i][1]);
        assert_eq!(oriented[i][2], c.coords[i][2]);
    }
}

#[test]
fn classification_is_deterministic() {
    let p = [
        point(10.0f32, 3.0),
        point(-4.0, 7.5),
        point(8.0, 12.0),
        point(0.5, -1.0),
    ];

    let first = classify_cubic(p[0], p[1], p[2], p[3]);
    for _ in 0..10 {
        assert_eq!(classify_cubic(p[0], p[1], p[2], p[3]), first);
    }
}
