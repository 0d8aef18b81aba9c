extern crate thiserror;

use self::thiserror::Error;

/// The delaunay tessellator's result type.
pub type TessellationResult = Result<(), TessellationError>;

/// The delaunay tessellator's error enumeration.
///
/// Numerical degeneracies (collinear or cocircular points, near-zero area
/// triangles) are never errors. Only inputs the triangulation can't make sense
/// of are rejected, before anything is written to the output.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum TessellationError {
    #[error("Unsupported parameter: {0}")]
    UnsupportedParameter(#[from] UnsupportedParameter),
    #[error("Point {index} is outside of the bounds")]
    PointOutsideBounds { index: u32 },
    #[error("Invalid contour: {0}")]
    InvalidContour(#[from] InvalidContourError),
    /// The vertex buffer would hold more vertices than the index type can address.
    #[error("Too many vertices")]
    TooManyVertices,
}

#[derive(Error, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnsupportedParameter {
    #[error("Position is not a number")]
    PositionIsNaN,
    #[error("Margin is not a positive number")]
    InvalidMargin,
    #[error("Bounds are inverted or not a number")]
    InvalidBounds,
}

#[derive(Error, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InvalidContourError {
    /// A contour point refers to a position that isn't in the point buffer.
    #[error("Contour point {index} refers to point {point} which doesn't exist")]
    PointOutOfRange { index: u32, point: u32 },
    /// The points of a sub-contour are not consecutive.
    #[error("The points of sub-contour {contour} are not consecutive")]
    NonContiguousContour { contour: u32 },
}

#[cfg(feature = "std")]
#[test]
fn test_error_messages() {
    use std::string::ToString;

    let err: TessellationError = UnsupportedParameter::PositionIsNaN.into();
    assert_eq!(
        err.to_string(),
        "Unsupported parameter: Position is not a number"
    );

    let err: TessellationError = InvalidContourError::NonContiguousContour { contour: 2 }.into();
    assert_eq!(
        err.to_string(),
        "Invalid contour: The points of sub-contour 2 are not consecutive"
    );

    assert_eq!(
        TessellationError::PointOutsideBounds { index: 7 }.to_string(),
        "Point 7 is outside of the bounds"
    );

    let err: TessellationError = UnsupportedParameter::InvalidMargin.into();
    assert_eq!(
        err.to_string(),
        "Unsupported parameter: Margin is not a positive number"
    );
}
