//! Types and traits for 2d cartesian geometry.
//!
//! Geographic points implement [`CartesianPoint2d`] with longitude as `x` and latitude as `y`, so all the algorithms
//! of this module can be applied to them directly. This planar approximation is what interactive drawing on a map
//! needs: the user draws on a flat screen.

mod orient;
mod point;
mod rect;
mod size;

pub use orient::Orientation;
pub use point::{CartesianPoint2d, CartesianPoint2dFloat, NewCartesianPoint2d, Point2d, Vector2};
pub use rect::Rect;
pub use size::Size;
