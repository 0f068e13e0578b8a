use serde::Serialize;

use crate::cartesian::CartesianPoint2d;
use crate::error::GeometryError;
use crate::impls::ClosedContour;

/// Closed sequence of points with the first point explicitly repeated at the end.
///
/// This is the representation renderers and GeoJSON expect. A ring always has at least 4 points, so it can only be
/// constructed through [`Ring::close`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ring<P> {
    points: Vec<P>,
}

impl<P: CartesianPoint2d + Copy> Ring<P> {
    /// Closes the sequence by appending the first point (unless the sequence is already closed) and checks that the
    /// result has at least 4 points.
    pub fn close(mut points: Vec<P>) -> Result<Self, GeometryError> {
        let first = points.first().copied();
        let last = points.last();
        if let (Some(first), Some(last)) = (first, last) {
            if points.len() == 1 || !first.equal(last) {
                points.push(first);
            }
        }

        if points.len() < 4 {
            return Err(GeometryError::InvalidRing(points.len()));
        }

        Ok(Self { points })
    }
}

impl<P> Ring<P> {
    /// All points of the ring including the closing one.
    pub fn points(&self) -> &[P] {
        &self.points
    }

    /// Number of points including the closing one.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false, a ring has at least 4 points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The first (and the last) point of the ring.
    pub fn start(&self) -> &P {
        &self.points[0]
    }

    /// Vertices of the ring without the closing point.
    pub fn vertices(&self) -> &[P] {
        &self.points[..self.points.len() - 1]
    }

    /// Converts the ring into a contour that does not repeat the first point.
    pub fn into_closed_contour(mut self) -> ClosedContour<P> {
        self.points.pop();
        ClosedContour::new(self.points)
    }
}

impl<P> crate::contour::ClosedContour for Ring<P> {
    type Point = P;

    fn iter_points(&self) -> impl Iterator<Item = &'_ P> {
        self.vertices().iter()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::cartesian::Point2d;
    use crate::contour::{CartesianClosedContour, Contour};

    #[test]
    fn close_appends_first_point() {
        let ring = Ring::close(vec![
            Point2d::new(0.0, 0.0),
            Point2d::new(0.0, 1.0),
            Point2d::new(1.0, 1.0),
        ])
        .expect("valid ring");

        assert_eq!(ring.len(), 4);
        assert_eq!(ring.points().first(), ring.points().last());
        assert_eq!(ring.vertices().len(), 3);
        assert_eq!(ring.iter_segments().count(), 3);
        assert_eq!(ring.area_signed(), -0.5);
    }

    #[test]
    fn close_keeps_explicit_closing_point() {
        let ring = Ring::close(vec![
            Point2d::new(0.0, 0.0),
            Point2d::new(0.0, 1.0),
            Point2d::new(1.0, 1.0),
            Point2d::new(0.0, 0.0),
        ])
        .expect("valid ring");

        assert_eq!(ring.len(), 4);
        assert_eq!(ring.into_closed_contour().points.len(), 3);
    }

    #[test]
    fn too_few_points() {
        assert_matches!(
            Ring::<Point2d>::close(vec![]),
            Err(GeometryError::InvalidRing(0))
        );
        assert_matches!(
            Ring::close(vec![Point2d::new(0.0, 0.0)]),
            Err(GeometryError::InvalidRing(2))
        );
        assert_matches!(
            Ring::close(vec![Point2d::new(0.0, 0.0), Point2d::new(1.0, 0.0)]),
            Err(GeometryError::InvalidRing(3))
        );
    }
}
