use maybe_sync::{MaybeSend, MaybeSync};

use crate::draw::builder::DrawnPolygon;
use crate::filter::FilterResult;

/// What the application receives when the user finishes drawing a polygon.
#[derive(Debug, Clone, PartialEq)]
pub enum PolygonReady<F> {
    /// Rendered features inside the polygon. Used with [`Delivery::Filtered`](super::Delivery::Filtered).
    FilteredFeatures {
        /// The drawn polygon.
        polygon: DrawnPolygon,
        /// Features inside the polygon.
        result: FilterResult<F>,
    },
    /// The drawn polygon. Used with [`Delivery::Raw`](super::Delivery::Raw).
    RawPolygon(DrawnPolygon),
}

impl<F> PolygonReady<F> {
    /// The drawn polygon.
    pub fn polygon(&self) -> &DrawnPolygon {
        match self {
            Self::FilteredFeatures { polygon, .. } | Self::RawPolygon(polygon) => polygon,
        }
    }
}

/// Receiver of the drawn polygons.
pub trait PolygonConsumer<F>: MaybeSend + MaybeSync {
    /// Called exactly once for every successfully finished drawing session.
    fn on_polygon(&self, ready: PolygonReady<F>);
}

impl<F, T: Fn(PolygonReady<F>) + MaybeSend + MaybeSync> PolygonConsumer<F> for T {
    fn on_polygon(&self, ready: PolygonReady<F>) {
        self(ready)
    }
}
