use serde::{Deserialize, Serialize};

use crate::impls::contour::ClosedContour;

/// A drawn area: one outer contour with optional holes.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Polygon<P> {
    /// Outer contour.
    pub outer_contour: ClosedContour<P>,
    /// Holes cut out of the outer contour.
    pub inner_contours: Vec<ClosedContour<P>>,
}

impl<P> Polygon<P> {
    /// Polygon with the given holes.
    pub fn with_holes(outer_contour: ClosedContour<P>, holes: Vec<ClosedContour<P>>) -> Self {
        Self {
            outer_contour,
            inner_contours: holes,
        }
    }
}

impl<P> crate::polygon::Polygon for Polygon<P> {
    type Contour = ClosedContour<P>;

    fn outer_contour(&self) -> &ClosedContour<P> {
        &self.outer_contour
    }

    fn inner_contours(&self) -> impl Iterator<Item = &'_ ClosedContour<P>> {
        self.inner_contours.iter()
    }
}

impl<P> From<ClosedContour<P>> for Polygon<P> {
    fn from(outer_contour: ClosedContour<P>) -> Self {
        Self::with_holes(outer_contour, Vec::new())
    }
}

impl<P> From<Vec<P>> for Polygon<P> {
    fn from(vertices: Vec<P>) -> Self {
        ClosedContour::new(vertices).into()
    }
}
