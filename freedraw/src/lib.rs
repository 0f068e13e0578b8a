//! Freedraw is a freehand polygon drawing control for interactive maps. The user switches the drawing mode on, draws
//! a line over the map with the mouse or a finger, and the control turns the line into a polygon, shows it, and gives
//! the application either the polygon itself or the rendered point features inside it.
//!
//! # Quick start
//!
//! ```no_run
//! use freedraw::draw::{DrawController, DrawControlOptions, PolygonReady};
//! use freedraw::events::DrawEvent;
//!
//! let options = DrawControlOptions::from_json(r#"{ "message": "Draw an area" }"#)?;
//! let controller = DrawController::new(options).with_consumer(|ready: PolygonReady<geojson::Feature>| {
//!     if let PolygonReady::FilteredFeatures { result, .. } = ready {
//!         println!("{} features selected", result.features().len());
//!     }
//! });
//!
//! controller.events().register(|event: &DrawEvent| println!("{event:?}"));
//! # Ok::<(), freedraw::error::FreeDrawError>(())
//! ```
//!
//! # Main components
//!
//! The control knows nothing about the map library or the UI toolkit of the application. It talks to the map through
//! the [`MapHost`](draw::MapHost) traits, and the application feeds it with [`PointerEvent`](control::PointerEvent)s
//! already converted into geographic coordinates.
//!
//! * [`DrawController`](draw::DrawController) is the drawing state machine.
//! * [`GeometryBuilder`](draw::GeometryBuilder) collects the line points and closes them into a
//!   [`DrawnPolygon`](draw::DrawnPolygon), splitting self-intersecting lines into simple parts.
//! * [`PolygonSurface`](draw::PolygonSurface) shows the line and the polygon on the map.
//! * [`SpatialFilter`](filter::SpatialFilter) selects the rendered features inside the polygon.
//! * [`EventBus`](events::EventBus) notifies listeners about the lifecycle of the control.

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

mod color;
pub mod control;
pub mod draw;
pub mod error;
pub mod events;
pub mod filter;
pub mod view;

#[cfg(test)]
pub(crate) mod tests;

pub use color::Color;
pub use view::Viewport;

pub use freedraw_types;
