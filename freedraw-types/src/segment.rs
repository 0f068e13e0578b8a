use num_traits::{Float, One, Zero};

use crate::cartesian::{CartesianPoint2d, Orientation, Point2d};

/// A straight line segment between two points.
#[derive(Debug, PartialEq)]
pub struct Segment<'a, Point>(pub &'a Point, pub &'a Point);

/// Result of intersecting two segments.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SegmentIntersection<N> {
    /// Segments have no common points.
    None,
    /// Segments have exactly one common point.
    Point(Point2d<N>),
    /// Segments are collinear and share a piece of non-zero length.
    Overlap,
}

impl<'a, P: CartesianPoint2d> Segment<'a, P> {
    /// Shortest euclidean distance (squared) between a point and the segment:
    ///
    /// * if the normal from the point to the segment ends inside the segment, the returned value is the squared length
    ///   of the normal
    /// * if the normal from the point to the segment ends outside of the segment, the returned value is the smaller one
    ///   of the distances between the point and the segment's endpoints
    pub fn distance_to_point_sq<Point: CartesianPoint2d<Num = P::Num>>(
        &self,
        point: &Point,
    ) -> P::Num {
        if self.0.equal(self.1) {
            return self.0.distance_sq(point);
        }

        let ds = self.1.sub(self.0);
        let dp = point.sub(self.0);
        let ds_len = ds.length_sq();

        let r = dp.dot(&ds) / ds_len;
        if r <= P::Num::zero() {
            self.0.distance_sq(point)
        } else if r >= P::Num::one() {
            self.1.distance_sq(point)
        } else {
            let s = dp.cross(&ds);
            s * s / ds_len
        }
    }

    /// Returns true, if the segment has at least one common point with the `other` segment.
    pub fn intersects<Point: CartesianPoint2d<Num = P::Num>>(
        &self,
        other: &Segment<Point>,
    ) -> bool {
        fn on_segment<Num: num_traits::Num + Copy + PartialOrd>(
            p: &impl CartesianPoint2d<Num = Num>,
            q: &impl CartesianPoint2d<Num = Num>,
            r: &impl CartesianPoint2d<Num = Num>,
        ) -> bool {
            let x_max = if p.x() >= r.x() { p.x() } else { r.x() };
            let x_min = if p.x() <= r.x() { p.x() } else { r.x() };
            let y_max = if p.y() >= r.y() { p.y() } else { r.y() };
            let y_min = if p.y() <= r.y() { p.y() } else { r.y() };

            q.x() <= x_max && q.x() >= x_min && q.y() <= y_max && q.y() >= y_min
        }

        let o1 = Orientation::triplet(self.0, other.0, self.1);
        let o2 = Orientation::triplet(self.0, other.1, self.1);
        let o3 = Orientation::triplet(other.0, self.0, other.1);
        let o4 = Orientation::triplet(other.0, self.1, other.1);

        if o1 != o2 && o3 != o4 {
            return true;
        }

        if o1 == Orientation::Collinear && on_segment(self.0, other.0, self.1) {
            return true;
        }
        if o2 == Orientation::Collinear && on_segment(self.0, other.1, self.1) {
            return true;
        }
        if o3 == Orientation::Collinear && on_segment(other.0, self.0, other.1) {
            return true;
        }
        if o4 == Orientation::Collinear && on_segment(other.0, self.1, other.1) {
            return true;
        }

        false
    }
}

impl<'a, N: Float, P: CartesianPoint2d<Num = N>> Segment<'a, P> {
    /// Computes the common points of two segments.
    ///
    /// Zero-length segments never intersect anything.
    pub fn intersection<Point: CartesianPoint2d<Num = N>>(
        &self,
        other: &Segment<Point>,
    ) -> SegmentIntersection<N> {
        let r = self.1.sub(self.0);
        let s = other.1.sub(other.0);
        let r_len = r.length_sq();
        if r_len == N::zero() || s.length_sq() == N::zero() {
            return SegmentIntersection::None;
        }

        let qp = other.0.sub(self.0);
        let denom = r.cross(&s);

        if denom == N::zero() {
            if qp.cross(&r) != N::zero() {
                // parallel
                return SegmentIntersection::None;
            }

            let t0 = qp.dot(&r) / r_len;
            let t1 = t0 + s.dot(&r) / r_len;
            let (lo, hi) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };
            let lo = lo.max(N::zero());
            let hi = hi.min(N::one());

            return if lo > hi {
                SegmentIntersection::None
            } else if lo == hi {
                SegmentIntersection::Point(self.point_at(lo))
            } else {
                SegmentIntersection::Overlap
            };
        }

        let t = qp.cross(&s) / denom;
        let u = qp.cross(&r) / denom;
        let unit = N::zero()..=N::one();
        if unit.contains(&t) && unit.contains(&u) {
            SegmentIntersection::Point(self.point_at(t))
        } else {
            SegmentIntersection::None
        }
    }

    fn point_at(&self, t: N) -> Point2d<N> {
        Point2d::new(
            self.0.x() + (self.1.x() - self.0.x()) * t,
            self.0.y() + (self.1.y() - self.0.y()) * t,
        )
    }
}
