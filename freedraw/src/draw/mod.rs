//! Freehand polygon drawing.
//!
//! [`DrawController`] is the entry point. It collects the pointer positions into a [`GeometryBuilder`], shows the
//! result with a [`PolygonSurface`] and gives the finished [`DrawnPolygon`] to a [`PolygonConsumer`].

mod builder;
mod consumer;
mod context;
mod controller;
mod options;
mod surface;

pub use builder::{DrawnPolygon, GeometryBuilder, LinePreview, RepairOutcome};
pub use consumer::{PolygonConsumer, PolygonReady};
pub use context::{
    Cursor, DrawContext, FeatureSource, ListenerKind, MapHost, PointFeature, RenderSurface,
};
pub use controller::{DrawController, DrawState};
pub use options::{ButtonStyle, Delivery, DrawControlOptions, DEFAULT_INTERACTIVE_LAYERS};
pub use surface::{LayerDefinition, LayerPaint, PolygonSurface, RenderedPolygonHandle, SurfaceStyle};
