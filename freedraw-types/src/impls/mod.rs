//! Owned geometries produced by drawing and repair.

mod contour;
mod multi_polygon;
mod polygon;

pub use contour::ClosedContour;
pub use multi_polygon::MultiPolygon;
pub use polygon::Polygon;
