//! Error types used by the crate.

use freedraw_types::error::GeometryError;
use thiserror::Error;

/// Freedraw error type.
#[derive(Debug, Error)]
pub enum FreeDrawError {
    /// The drawn line does not have enough distinct points to form an area.
    #[error("drawn geometry is degenerate: {points} distinct points")]
    DegenerateGeometry {
        /// Number of distinct points left after cleaning.
        points: usize,
    },
    /// The control was used before it was added to a map.
    #[error("draw control is not attached to a map")]
    NotAttached,
    /// Control options could not be parsed.
    #[error("invalid draw control options: {0}")]
    Options(#[from] serde_json::Error),
    /// Invalid input geometry.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}
