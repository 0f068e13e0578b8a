//! Cleaning and self-intersection repair of freehand rings.
//!
//! A ring drawn by hand often crosses itself. [`unkink`] splits such a ring at its crossing points into a set of
//! simple rings, each of which can be used as a separate polygon part.

use num_traits::Float;
use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{RTree, RTreeObject};

use crate::cartesian::{CartesianPoint2d, CartesianPoint2dFloat, NewCartesianPoint2d, Orientation};
use crate::contour::CartesianClosedContour;
use crate::error::RepairError;
use crate::impls::ClosedContour;
use crate::ring::Ring;
use crate::segment::{Segment, SegmentIntersection};

/// Removes consecutive duplicate points. If the sequence ends with the repeated first point, the closing point is
/// removed too.
pub fn dedup_points<P: CartesianPoint2d + Copy>(points: &[P]) -> Vec<P> {
    let mut result: Vec<P> = Vec::with_capacity(points.len());
    for point in points {
        if result.last().map_or(true, |last| !last.equal(point)) {
            result.push(*point);
        }
    }

    while result.len() > 1 && result[0].equal(&result[result.len() - 1]) {
        result.pop();
    }

    result
}

/// Returns the vertices of the ring (without the closing point) with duplicates and zero-turn vertices removed.
///
/// A vertex is removed when it lies on the line through its neighbours. This also removes spikes where the line goes
/// forward and immediately returns along the same path. The first vertex is always kept, so the cleaned ring still
/// starts and closes at the point where the line started. The result may have less than 3 vertices if all the points
/// of the ring lie on one line.
pub fn clean_ring<P: CartesianPoint2d + Copy>(ring: &Ring<P>) -> Vec<P> {
    let mut vertices = dedup_points(ring.vertices());

    'outer: while vertices.len() >= 3 {
        let len = vertices.len();
        for i in 1..len {
            let prev = &vertices[(i + len - 1) % len];
            let curr = &vertices[i];
            let next = &vertices[(i + 1) % len];

            if curr.equal(next) || Orientation::triplet(prev, curr, next) == Orientation::Collinear {
                vertices.remove(i);
                continue 'outer;
            }
        }

        break;
    }

    vertices
}

/// Splits a ring into simple (not self-intersecting) rings.
///
/// `vertices` is the ring without the closing point. Every time two non-adjacent segments of a ring cross, the ring
/// is cut at the crossing point into two loops, and both loops are processed further. Loops without area are dropped.
/// If the ring is already simple, it is returned as the only part.
///
/// Candidate segment pairs are found through an R-tree of segment bounding boxes, so only segments with overlapping
/// boxes are tested for intersection.
pub fn unkink<N, P>(vertices: &[P]) -> Result<Vec<ClosedContour<P>>, RepairError>
where
    N: Float,
    P: NewCartesianPoint2d<N> + Copy,
{
    if vertices.iter().any(|p| !p.is_finite()) {
        return Err(RepairError::NonFinite);
    }

    let vertices = dedup_points(vertices);
    if vertices.len() < 3 {
        return Err(RepairError::TooFewPoints(vertices.len()));
    }

    let max_splits = 4 * vertices.len() * vertices.len() + 16;
    let mut splits = 0;
    let mut pending = vec![(vertices, 0)];
    let mut parts = vec![];

    while let Some((ring, checked)) = pending.pop() {
        match find_crossing(&ring, checked)? {
            Some((i, j, point)) => {
                splits += 1;
                if splits > max_splits {
                    return Err(RepairError::TooComplex(splits));
                }

                let (inner, outer) = split_at(&ring, i, j, point);
                log::trace!(
                    "Split ring of {} points into loops of {} and {} points",
                    ring.len(),
                    inner.len(),
                    outer.len()
                );

                // Segments before `i` crossed nothing in the ring, and the outer loop keeps them unchanged.
                if inner.len() >= 3 {
                    pending.push((inner, 0));
                }
                if outer.len() >= 3 {
                    pending.push((outer, i));
                }
            }
            None => {
                let contour = ClosedContour::new(ring);
                if contour.area_signed() != N::zero() {
                    parts.push(contour);
                }
            }
        }
    }

    if parts.is_empty() {
        return Err(RepairError::NoArea);
    }

    // Splitting pops loops from the end, restore the drawing order.
    parts.reverse();
    Ok(parts)
}

/// Bounding box of the ring segment starting at the vertex with the given index.
type SegmentBox = GeomWithData<Rectangle<[f64; 2]>, usize>;

fn segment_box<N, P>(ring: &[P], index: usize) -> Result<SegmentBox, RepairError>
where
    N: Float,
    P: CartesianPoint2d<Num = N>,
{
    let corner = |p: &P| -> Result<[f64; 2], RepairError> {
        match (p.x().to_f64(), p.y().to_f64()) {
            (Some(x), Some(y)) => Ok([x, y]),
            _ => Err(RepairError::NonFinite),
        }
    };

    let from = corner(&ring[index])?;
    let to = corner(&ring[(index + 1) % ring.len()])?;
    Ok(GeomWithData::new(Rectangle::from_corners(from, to), index))
}

/// Finds the first crossing of two non-adjacent segments of the ring, skipping segments before `from` as the first
/// segment of the pair.
fn find_crossing<N, P>(ring: &[P], from: usize) -> Result<Option<(usize, usize, P)>, RepairError>
where
    N: Float,
    P: NewCartesianPoint2d<N> + Copy,
{
    let n = ring.len();
    let boxes = (0..n)
        .map(|index| segment_box(ring, index))
        .collect::<Result<Vec<_>, _>>()?;
    let tree = RTree::bulk_load(boxes.clone());

    let mut candidates = vec![];
    for i in from..n {
        let segment_i = Segment(&ring[i], &ring[(i + 1) % n]);

        candidates.clear();
        candidates.extend(
            tree.locate_in_envelope_intersecting(&boxes[i].envelope())
                .map(|candidate| candidate.data)
                .filter(|&j| j >= i + 2 && !(i == 0 && j == n - 1)),
        );
        candidates.sort_unstable();

        for &j in &candidates {
            let segment_j = Segment(&ring[j], &ring[(j + 1) % n]);
            match segment_i.intersection(&segment_j) {
                SegmentIntersection::None => {}
                SegmentIntersection::Point(p) => return Ok(Some((i, j, P::new(p.x(), p.y())))),
                SegmentIntersection::Overlap => return Err(RepairError::CollinearOverlap),
            }
        }
    }

    Ok(None)
}

/// Cuts the ring at the crossing of segments `i` and `j` (`i < j`) into the loop between the two segments and the
/// rest of the ring.
fn split_at<P: CartesianPoint2d + Copy>(ring: &[P], i: usize, j: usize, point: P) -> (Vec<P>, Vec<P>) {
    let mut inner = Vec::with_capacity(j - i + 1);
    inner.push(point);
    inner.extend_from_slice(&ring[i + 1..=j]);

    let mut outer = Vec::with_capacity(ring.len() - (j - i) + 1);
    outer.extend_from_slice(&ring[..=i]);
    outer.push(point);
    outer.extend_from_slice(&ring[j + 1..]);

    (dedup_points(&inner), dedup_points(&outer))
}
