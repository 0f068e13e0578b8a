//! Contour is a sequence of points.
//!
//! Contours can be:
//! * **open** - meaning that the first and the last points of the contour are not connected. A line that the user is
//!   still drawing is an open contour.
//! * **closed** - when the first and the last points of the contour are connected. The boundary of a finished drawn
//!   polygon is a closed contour.
//!
//! Both open and closed contours are represented by the [`Contour`] trait, but there is also a separate
//! [`ClosedContour`] trait for situations when only closed contour makes sense. For example, a
//! [`Polygon`](crate::polygon::Polygon) can consist only of closed contours. All closed contours also implement the
//! `Contour` trait automatically.
//!
//! # Contour vs GeoJSON LineString
//!
//! In GeoJSON a ring is considered to be closed when the first and the last points in the sequence are exactly same.
//! `Contour` does not have that requirement. Even more, it should not duplicate the first and the last points.
//! `Contour` trait deals with the last segment of closed contours with [`Contour::iter_points_closing`] and
//! [`Contour::iter_segments`] methods instead. When the explicit closing point is needed (for example to publish
//! the geometry to a renderer), use [`Ring`](crate::ring::Ring).

use num_traits::{Float, One, Zero};

use crate::cartesian::{CartesianPoint2d, Rect};
use crate::segment::Segment;

/// Sequence of points. See module level documentation for details.
pub trait Contour {
    /// Type of the points the contour is consisted of.
    type Point;

    /// Whether the contour is closed.
    ///
    /// A closed contour has a segment connecting the last and the first points.
    fn is_closed(&self) -> bool;

    /// Iterate over the points of the contour.
    ///
    /// Note, that the last point shall not be the same as the first one even for the closed contours. If you want to
    /// include the first point at the end of iterator for closed contours, use [`Contour::iter_points_closing`]
    /// instead.
    fn iter_points(&self) -> impl Iterator<Item = &'_ Self::Point>;

    /// Same as [`Contour::iter_points`] but for closed contours repeats the first point again at the end of the iterator.
    fn iter_points_closing(&self) -> impl Iterator<Item = &Self::Point> {
        ContourPointsIterator::new(self.iter_points(), self.is_closed())
    }

    /// Iterates over segments of the contour. For closed contours this includes the segment between the last and the
    /// first points of the contour.
    fn iter_segments(&self) -> impl Iterator<Item = Segment<'_, Self::Point>> {
        ContourSegmentIterator::new(ContourPointsIterator::new(
            self.iter_points(),
            self.is_closed(),
        ))
    }
}

/// A closed contour. See module documentation for details.
pub trait ClosedContour {
    /// Type of the points the contour is consisted of.
    type Point;

    /// Iterate over the points of the contour.
    ///
    /// Note, that the last point shall not be the same as the first one.
    fn iter_points(&self) -> impl Iterator<Item = &'_ Self::Point>;
}

impl<P, T: ClosedContour<Point = P>> Contour for T {
    type Point = P;

    fn is_closed(&self) -> bool {
        true
    }

    fn iter_points(&self) -> impl Iterator<Item = &'_ Self::Point> {
        ClosedContour::iter_points(self)
    }
}

/// Cartesian properties of contours. This trait is auto-implemented for all contours with cartesian points.
pub trait CartesianContour<P: CartesianPoint2d>: Contour<Point = P> {
    /// Squared distance from the point to the closest segment of the contour. Returns `None` for contours without
    /// segments.
    fn distance_to_point_sq<Point>(&self, point: &Point) -> Option<P::Num>
    where
        Point: CartesianPoint2d<Num = P::Num>,
    {
        self.iter_segments()
            .map(|v| v.distance_to_point_sq(point))
            .reduce(|a, b| if b < a { b } else { a })
    }

    /// Bounding rectangle of the contour points. Returns `None` for empty contours.
    fn bounding_rect(&self) -> Option<Rect<P::Num>> {
        Rect::from_points(self.iter_points())
    }
}

impl<T: Contour<Point = P>, P: CartesianPoint2d> CartesianContour<P> for T {}

/// Area and orientation of closed contours. This trait is auto-implemented for all closed contours with cartesian
/// points.
pub trait CartesianClosedContour {
    /// Type of the contour points.
    type Point: CartesianPoint2d;

    /// Signed area of the contour (shoelace formula). Positive for counterclockwise contours.
    fn area_signed(&self) -> <Self::Point as CartesianPoint2d>::Num;

    /// Winding direction of the contour.
    fn winding(&self) -> Winding;
}

impl<P, T> CartesianClosedContour for T
where
    P: CartesianPoint2d,
    T: ClosedContour<Point = P>,
{
    type Point = P;

    fn area_signed(&self) -> P::Num {
        let mut iter = self.iter_points_closing();
        let Some(mut prev) = iter.next() else {
            return P::Num::zero();
        };

        let mut aggr = P::Num::zero();
        for p in iter {
            aggr = aggr + prev.x() * p.y() - p.x() * prev.y();
            prev = p;
        }

        aggr / (P::Num::one() + P::Num::one())
    }

    fn winding(&self) -> Winding {
        if self.area_signed() <= P::Num::zero() {
            Winding::Clockwise
        } else {
            Winding::CounterClockwise
        }
    }
}

/// Absolute area of a closed contour.
pub fn area<N: Float, C: CartesianClosedContour>(contour: &C) -> N
where
    C::Point: CartesianPoint2d<Num = N>,
{
    contour.area_signed().abs()
}

/// Direction of a closed contour.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Winding {
    /// Clockwise.
    Clockwise,
    /// Counterclockwise.
    CounterClockwise,
}

/// Iterator of contour points.
#[derive(Debug, Clone)]
pub struct ContourPointsIterator<'a, P, Iter>
where
    Iter: Iterator<Item = &'a P>,
{
    points_iter: Iter,
    is_closed: bool,
    first_point: Option<&'a P>,
}

impl<'a, P: 'a, Iter> ContourPointsIterator<'a, P, Iter>
where
    Iter: Iterator<Item = &'a P>,
{
    fn new(points_iter: Iter, is_closed: bool) -> Self {
        Self {
            points_iter,
            is_closed,
            first_point: None,
        }
    }
}

impl<'a, P, Iter> Iterator for ContourPointsIterator<'a, P, Iter>
where
    Iter: Iterator<Item = &'a P>,
{
    type Item = &'a P;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.points_iter.next();
        if self.is_closed && self.first_point.is_none() {
            self.first_point = next;
        }

        if next.is_none() {
            self.first_point.take()
        } else {
            next
        }
    }
}

/// Iterator of contour segments.
#[derive(Debug, Clone)]
pub struct ContourSegmentIterator<'a, P: 'a, Iter>
where
    Iter: Iterator<Item = &'a P>,
{
    points_iter: ContourPointsIterator<'a, P, Iter>,
    prev_point: Option<&'a P>,
}

impl<'a, P, Iter> ContourSegmentIterator<'a, P, Iter>
where
    Iter: Iterator<Item = &'a P>,
{
    fn new(points_iter: ContourPointsIterator<'a, P, Iter>) -> Self {
        Self {
            points_iter,
            prev_point: None,
        }
    }
}

impl<'a, P, Iter> Iterator for ContourSegmentIterator<'a, P, Iter>
where
    Iter: Iterator<Item = &'a P>,
{
    type Item = Segment<'a, P>;

    fn next(&mut self) -> Option<Self::Item> {
        let next_point = self.points_iter.next()?;
        let prev_point = self.prev_point.replace(next_point);

        match prev_point {
            Some(prev) => Some(Segment(prev, next_point)),
            None => self.next(),
        }
    }
}
