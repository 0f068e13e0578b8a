use serde::{Deserialize, Serialize};

/// Closed contour stored without the repeated closing point. Parts produced by the ring repair use this type.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ClosedContour<P> {
    /// Vertices of the contour.
    pub points: Vec<P>,
}

impl<P> ClosedContour<P> {
    /// Wraps the vertices. The closing segment from the last vertex back to the first one is implied.
    pub fn new(points: Vec<P>) -> Self {
        Self { points }
    }
}

impl<P> crate::contour::ClosedContour for ClosedContour<P> {
    type Point = P;

    fn iter_points(&self) -> impl Iterator<Item = &'_ P> {
        self.points.iter()
    }
}
