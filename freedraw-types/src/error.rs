//! Error types used by the crate.

use thiserror::Error;

/// Errors of geometry construction and conversion.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// Geometry conversion error.
    #[error("invalid input geometry: {0}")]
    Conversion(String),
    /// A ring was constructed from too few points.
    #[error("a ring must have at least 4 points including the closing one, got {0}")]
    InvalidRing(usize),
}

/// Reasons the self-intersection repair of a ring can fail.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepairError {
    /// Not enough distinct vertices to form an area.
    #[error("ring has only {0} distinct vertices")]
    TooFewPoints(usize),
    /// One of the vertices has NaN or infinite coordinates.
    #[error("ring contains non-finite coordinates")]
    NonFinite,
    /// Two segments of the ring lie on the same line and share a piece.
    #[error("ring has overlapping collinear segments")]
    CollinearOverlap,
    /// The ring required more splits than the iteration guard allows.
    #[error("ring is too complex to repair after {0} splits")]
    TooComplex(usize),
    /// None of the parts produced by the repair has a non-zero area.
    #[error("repaired ring has no area")]
    NoArea,
}
