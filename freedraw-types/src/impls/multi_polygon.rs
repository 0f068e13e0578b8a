use serde::{Deserialize, Serialize};

use crate::cartesian::{CartesianPoint2d, Rect};
use crate::impls::polygon::Polygon;
use crate::polygon::CartesianPolygon;

/// A set of polygons.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MultiPolygon<P> {
    /// Inner polygons.
    pub parts: Vec<Polygon<P>>,
}

impl<P> From<Vec<Polygon<P>>> for MultiPolygon<P> {
    fn from(parts: Vec<Polygon<P>>) -> Self {
        Self { parts }
    }
}

impl<P> MultiPolygon<P> {
    /// Returns reference to the inner polygons.
    pub fn parts(&self) -> &[Polygon<P>] {
        &self.parts
    }
}

impl<P: CartesianPoint2d> MultiPolygon<P> {
    /// Returns true if any of the parts contains the point.
    pub fn contains_point(&self, point: &impl CartesianPoint2d<Num = P::Num>) -> bool {
        self.parts.iter().any(|part| part.contains_point(point))
    }

    /// Bounding rectangle of all the parts.
    pub fn bounding_rect(&self) -> Option<Rect<P::Num>> {
        Rect::merge_all(self.parts.iter().filter_map(|part| part.bounding_rect()))
    }
}
