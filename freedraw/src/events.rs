//! Lifecycle events of the drawing control.

use std::sync::Arc;

use maybe_sync::{MaybeSend, MaybeSync};
use parking_lot::RwLock;

/// Identifier of a drawing session. Ids grow monotonically for the lifetime of a controller.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(pub(crate) u64);

impl SessionId {
    /// Numeric value of the id.
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// How a drawing session ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// A polygon was created and delivered.
    Completed,
    /// The drawn line did not form an area. Nothing was shown or delivered.
    Degenerate,
    /// The session was aborted (pointer released outside the map, or the control was deactivated).
    Cancelled,
}

/// Where a shown polygon came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PolygonOrigin {
    /// Drawn by the user.
    Draw,
    /// Provided programmatically.
    Preload,
}

/// Event emitted by the drawing control.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawEvent {
    /// Drawing mode was switched on or off.
    DrawModeChanged {
        /// Whether drawing mode is on now.
        active: bool,
        /// Whether the switch was requested by the user (button press) rather than by the application.
        by_user: bool,
    },
    /// The user started drawing a line.
    SessionStarted {
        /// Id of the session.
        session: SessionId,
    },
    /// Drawing session ended.
    SessionEnded {
        /// Id of the session.
        session: SessionId,
        /// How the session ended.
        outcome: SessionOutcome,
    },
    /// A polygon was shown on the map.
    PolygonAdded {
        /// Where the polygon came from.
        origin: PolygonOrigin,
        /// GeoJSON geometry of the polygon.
        geometry: geojson::Geometry,
    },
    /// The shown polygon was removed. Listeners that filtered other layers by the polygon should release the filter.
    PolygonRemoved,
}

/// Listener of [`DrawEvent`]s.
pub trait DrawEventListener: MaybeSend + MaybeSync {
    /// Called for every emitted event.
    fn on_event(&self, event: &DrawEvent);
}

impl<T: Fn(&DrawEvent) + MaybeSend + MaybeSync> DrawEventListener for T {
    fn on_event(&self, event: &DrawEvent) {
        self(event)
    }
}

/// Event channel shared by the control components.
///
/// Cloning the bus gives a handle to the same listener list. Listeners must not register new listeners from inside
/// the callback.
#[derive(Clone, Default)]
pub struct EventBus {
    listeners: Arc<RwLock<Vec<Box<dyn DrawEventListener>>>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.read().len())
            .finish()
    }
}

impl EventBus {
    /// Adds a listener.
    pub fn register(&self, listener: impl DrawEventListener + 'static) {
        self.listeners.write().push(Box::new(listener));
    }

    /// Calls all the listeners with the event.
    pub fn fire(&self, event: &DrawEvent) {
        log::debug!("Draw event: {event:?}");
        for listener in self.listeners.read().iter() {
            listener.on_event(event);
        }
    }

    /// Removes all the listeners.
    pub fn reset(&self) {
        self.listeners.write().clear();
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }
}
