//! Geometry types and algorithms used by freehand map drawing.
//!
//! Geometries are described by traits ([`Contour`], [`ClosedContour`], [`Polygon`]), and all the
//! algorithms ([`CartesianPolygon::contains_point`], [`repair::unkink`] etc.) work with any type implementing them.
//! Simple implementations of the traits live in the [`impls`] module.

pub mod cartesian;
pub mod geo;

pub mod contour;
pub use contour::*;

pub mod polygon;
pub use polygon::*;

pub mod error;
#[cfg(feature = "geojson")]
pub mod geojson;
pub mod impls;
pub mod repair;
pub mod ring;
pub mod segment;
