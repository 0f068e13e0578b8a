use num_traits::Zero;

use crate::cartesian::{CartesianPoint2d, Rect};
use crate::contour::{CartesianContour, ClosedContour, Contour};
use crate::segment::Segment;

/// Polygon geometry. Polygon consists of one outer contour, and zero or more inner contours.
///
/// Inner contours represent *holes* in a polygon.
pub trait Polygon {
    /// Contour type.
    type Contour: Contour;

    /// Outer contour of the polygon.
    fn outer_contour(&self) -> &Self::Contour;
    /// Iterates over inner contours.
    fn inner_contours(&self) -> impl Iterator<Item = &'_ Self::Contour>;

    /// Iterates over all contours of the polygon starting with the outer one.
    fn iter_contours(&self) -> impl Iterator<Item = &'_ Self::Contour> {
        std::iter::once(self.outer_contour()).chain(self.inner_contours())
    }

    /// Iterates over all segments of the polygon contour lines.
    fn iter_segments(
        &self,
    ) -> impl Iterator<Item = Segment<'_, <Self::Contour as Contour>::Point>> {
        self.iter_contours().flat_map(Self::Contour::iter_segments)
    }
}

/// Polygon in 2d cartesian coordinates. This trait is auto-implemented for all eligible types.
pub trait CartesianPolygon {
    /// Type of the points of the polygon.
    type Point: CartesianPoint2d;

    /// Returns true if the `point` lies inside the polygon or on one of its sides.
    ///
    /// A point inside a hole is outside the polygon, unless it lies on the hole boundary.
    fn contains_point<P>(&self, point: &P) -> bool
    where
        P: CartesianPoint2d<Num = <Self::Point as CartesianPoint2d>::Num>;

    /// Bounding rectangle of the outer contour.
    fn bounding_rect(&self) -> Option<Rect<<Self::Point as CartesianPoint2d>::Num>>;
}

impl<P, C, T> CartesianPolygon for T
where
    P: CartesianPoint2d,
    C: ClosedContour<Point = P>,
    T: Polygon<Contour = C>,
{
    type Point = P;

    fn contains_point<Point: CartesianPoint2d<Num = P::Num>>(&self, point: &Point) -> bool {
        let on_boundary = self
            .iter_segments()
            .any(|segment| segment.distance_to_point_sq(point) == P::Num::zero());
        if on_boundary {
            return true;
        }

        winding_number(self.outer_contour(), point) != 0
            && self
                .inner_contours()
                .all(|hole| winding_number(hole, point) == 0)
    }

    fn bounding_rect(&self) -> Option<Rect<P::Num>> {
        CartesianContour::bounding_rect(self.outer_contour())
    }
}

/// Number of times the contour winds around the point (Sunday's algorithm). Zero means the point is outside.
pub fn winding_number<N, P, C>(contour: &C, point: &impl CartesianPoint2d<Num = N>) -> i64
where
    N: num_traits::Num + Copy + PartialOrd,
    P: CartesianPoint2d<Num = N>,
    C: Contour<Point = P>,
{
    let x = point.x();
    let y = point.y();
    let mut wn = 0i64;

    for Segment(a, b) in contour.iter_segments() {
        let is_left = (b.x() - a.x()) * (y - a.y()) - (x - a.x()) * (b.y() - a.y());
        if a.y() <= y {
            if b.y() > y && is_left > N::zero() {
                wn += 1;
            }
        } else if b.y() <= y && is_left < N::zero() {
            wn -= 1;
        }
    }

    wn
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartesian::Point2d;
    use crate::impls;

    fn square(x0: f64, y0: f64, size: f64) -> impls::ClosedContour<Point2d> {
        impls::ClosedContour::new(vec![
            Point2d::new(x0, y0),
            Point2d::new(x0, y0 + size),
            Point2d::new(x0 + size, y0 + size),
            Point2d::new(x0 + size, y0),
        ])
    }

    #[test]
    fn contains_point() {
        let polygon = impls::Polygon::from(impls::ClosedContour::new(vec![
            Point2d::new(0.0, 0.0),
            Point2d::new(1.0, 1.0),
            Point2d::new(1.0, 0.0),
        ]));

        assert!(polygon.contains_point(&Point2d::new(0.0, 0.0)));
        assert!(polygon.contains_point(&Point2d::new(1.0, 1.0)));
        assert!(polygon.contains_point(&Point2d::new(0.5, 0.0)));
        assert!(polygon.contains_point(&Point2d::new(0.2, 0.1)));
        assert!(!polygon.contains_point(&Point2d::new(0.2, 0.3)));
        assert!(!polygon.contains_point(&Point2d::new(0.2, -0.3)));
        assert!(!polygon.contains_point(&Point2d::new(1.1, 0.0)));
    }

    #[test]
    fn contains_point_does_not_depend_on_winding() {
        let clockwise = impls::Polygon::from(square(0.0, 0.0, 2.0));
        let mut points = square(0.0, 0.0, 2.0).points;
        points.reverse();
        let counterclockwise = impls::Polygon::from(impls::ClosedContour::new(points));

        for polygon in [clockwise, counterclockwise] {
            assert!(polygon.contains_point(&Point2d::new(1.0, 1.0)));
            assert!(polygon.contains_point(&Point2d::new(2.0, 1.0)));
            assert!(!polygon.contains_point(&Point2d::new(3.0, 3.0)));
            assert!(!polygon.contains_point(&Point2d::new(-0.1, 1.0)));
        }
    }

    #[test]
    fn holes() {
        let polygon = impls::Polygon::with_holes(square(0.0, 0.0, 4.0), vec![square(1.0, 1.0, 2.0)]);

        assert!(polygon.contains_point(&Point2d::new(0.5, 0.5)));
        assert!(!polygon.contains_point(&Point2d::new(2.0, 2.0)));
        assert!(polygon.contains_point(&Point2d::new(1.0, 2.0)));
    }

    #[test]
    fn bounding_rect() {
        let polygon = impls::Polygon::from(square(1.0, 2.0, 3.0));
        assert_eq!(polygon.bounding_rect(), Some(Rect::new(1.0, 2.0, 4.0, 5.0)));
    }

    #[test]
    fn matches_geo_containment() {
        use geo::Contains;

        let points = [
            (0.0, 0.0),
            (4.0, 1.0),
            (3.0, 4.0),
            (1.5, 2.0),
            (0.5, 3.5),
        ];
        let polygon = impls::Polygon::from(impls::ClosedContour::new(
            points.iter().map(|(x, y)| Point2d::new(*x, *y)).collect(),
        ));
        let reference = geo::Polygon::new(geo::LineString::from(points.to_vec()), vec![]);

        for x in 0..20 {
            for y in 0..20 {
                let (x, y) = (x as f64 * 0.23 - 0.1, y as f64 * 0.23 - 0.1);
                // geo excludes the boundary, so only strictly inner points are compared
                let expected = reference.contains(&geo::Point::new(x, y));
                if expected {
                    assert!(polygon.contains_point(&Point2d::new(x, y)), "({x}, {y})");
                } else if polygon.contains_point(&Point2d::new(x, y)) {
                    assert!(
                        polygon
                            .iter_segments()
                            .any(|s| s.distance_to_point_sq(&Point2d::new(x, y)) == 0.0),
                        "({x}, {y})"
                    );
                }
            }
        }
    }
}
