//! Pointer input of the drawing control.
//!
//! The host application converts its native mouse and touch events into [`PointerEvent`]s with the pointer position
//! already unprojected into longitude and latitude, and gives them to the [`EventDispatcher`]. The dispatcher passes
//! each event to its [`PointerEventHandler`]s in order until one of them stops the propagation.
//!
//! Some handlers need to run logic after all the handlers of the current tick have seen an event (for example to
//! resolve a duplicate pointer release). The host calls [`EventDispatcher::end_tick`] for that once it has dispatched
//! all the events of the tick.

use std::sync::Arc;

use freedraw_types::geo::GeoPoint2d;
use maybe_sync::{MaybeSend, MaybeSync};
use parking_lot::{Mutex, MutexGuard};

mod event_dispatcher;

pub use event_dispatcher::EventDispatcher;

/// Pointer input handler.
pub trait PointerEventHandler<H> {
    /// Handle the event.
    fn handle(&mut self, event: &PointerEvent, host: &mut H) -> EventPropagation;

    /// Called by the dispatcher at the end of every tick, after all the events of the tick were handled.
    fn run_deferred(&mut self, _host: &mut H) {}
}

impl<H, T: for<'a> FnMut(&'a PointerEvent, &'a mut H) -> EventPropagation> PointerEventHandler<H>
    for T
where
    T: MaybeSync + MaybeSend,
{
    fn handle(&mut self, event: &PointerEvent, host: &mut H) -> EventPropagation {
        self(event, host)
    }
}

/// Handler shared between the dispatcher and the application.
///
/// The dispatcher owns its handlers, so a handler the application also needs to call directly (for example to toggle
/// the drawing mode from a button) is wrapped into `SharedHandler` and cloned.
pub struct SharedHandler<T>(Arc<Mutex<T>>);

impl<T> SharedHandler<T> {
    /// Wraps the handler.
    pub fn new(handler: T) -> Self {
        Self(Arc::new(Mutex::new(handler)))
    }

    /// Locks the handler for direct access.
    pub fn lock(&self) -> MutexGuard<'_, T> {
        self.0.lock()
    }
}

impl<T> Clone for SharedHandler<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<H, T: PointerEventHandler<H>> PointerEventHandler<H> for SharedHandler<T> {
    fn handle(&mut self, event: &PointerEvent, host: &mut H) -> EventPropagation {
        self.lock().handle(event, host)
    }

    fn run_deferred(&mut self, host: &mut H) {
        self.lock().run_deferred(host)
    }
}

/// Pointer interaction event with the position given in geographic coordinates.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PointerEvent {
    /// Mouse button pressed or touch started over the map.
    Down(PointerInput),
    /// Pointer moved over the map.
    Move(PointerInput),
    /// Mouse button released or touch ended over the map.
    Up(PointerInput),
    /// Pointer released anywhere in the host window, including outside the map. Hosts fire this in addition to
    /// [`PointerEvent::Up`] so that a release outside the map does not leave a drawing session hanging.
    DocumentUp,
}

impl PointerEvent {
    /// Position of the pointer, if the event has one.
    pub fn position(&self) -> Option<GeoPoint2d> {
        match self {
            Self::Down(input) | Self::Move(input) | Self::Up(input) => Some(input.position),
            Self::DocumentUp => None,
        }
    }
}

/// Position and source of a pointer event.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerInput {
    /// Pointer position.
    pub position: GeoPoint2d,
    /// Device that produced the event.
    pub source: PointerSource,
}

impl PointerInput {
    /// Mouse input at the position.
    pub fn mouse(position: GeoPoint2d) -> Self {
        Self {
            position,
            source: PointerSource::Mouse,
        }
    }

    /// Touch input at the position.
    pub fn touch(position: GeoPoint2d) -> Self {
        Self {
            position,
            source: PointerSource::Touch,
        }
    }
}

/// Device that produced a pointer event.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PointerSource {
    /// Mouse or pen.
    Mouse,
    /// Single finger touch.
    Touch,
}

/// Value returned by a [`PointerEventHandler`] to indicate the status of the event.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EventPropagation {
    /// Event should be propagated to the next handler.
    Propagate,
    /// Event should not be propagated to the next handler.
    Stop,
    /// Event should not be propagated to the next handler, and the current handler owns the gesture: all following
    /// events until the pointer is released should be given to it first.
    Consume,
}
