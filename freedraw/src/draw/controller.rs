use freedraw_types::geo::GeoPoint2d;

use crate::control::{EventPropagation, PointerEvent, PointerEventHandler};
use crate::draw::builder::{DrawnPolygon, GeometryBuilder};
use crate::draw::consumer::{PolygonConsumer, PolygonReady};
use crate::draw::context::{Cursor, DrawContext, FeatureSource, ListenerKind, MapHost};
use crate::draw::options::{Delivery, DrawControlOptions};
use crate::draw::surface::PolygonSurface;
use crate::error::FreeDrawError;
use crate::events::{DrawEvent, EventBus, PolygonOrigin, SessionId, SessionOutcome};
use crate::filter::SpatialFilter;

/// State of a [`DrawController`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DrawState {
    /// Drawing mode is off. The map behaves as usual.
    Inactive,
    /// Drawing mode is on, waiting for the user to press the pointer.
    Armed,
    /// The user is drawing a line.
    Drawing {
        /// Current session.
        session: SessionId,
    },
}

/// Freehand polygon drawing control.
///
/// The controller is driven by pointer events and switches between [`DrawState`]s:
///
/// * `Inactive -> Armed` when the drawing mode is switched on ([`DrawController::toggle`]). Panning the map and the
///   interactive layers are disabled.
/// * `Armed -> Drawing` on pointer press. Every following pointer move adds a point to the line, which is shown as a
///   live preview.
/// * `Drawing -> Armed` on pointer release. The line is closed into a polygon, the polygon is shown and given to the
///   [`PolygonConsumer`]. Panning and the interactive layers are restored until the next press.
/// * `Armed | Drawing -> Inactive` when the drawing mode is switched off.
///
/// The map is not owned by the controller. Every operation receives the [`MapHost`] to work with, and the feature type
/// of the host must match the type the consumer receives.
pub struct DrawController<F = geojson::Feature> {
    options: DrawControlOptions,
    state: DrawState,
    builder: GeometryBuilder,
    surface: PolygonSurface,
    bus: EventBus,
    consumer: Option<Box<dyn PolygonConsumer<F>>>,
    attached: bool,
    suppressed: bool,
    last_session: u64,
    pending_release_check: Option<SessionId>,
}

impl<F> Default for DrawController<F> {
    fn default() -> Self {
        Self::new(DrawControlOptions::default())
    }
}

impl<F> DrawController<F> {
    /// Creates a new controller.
    pub fn new(options: DrawControlOptions) -> Self {
        let bus = EventBus::default();
        Self {
            surface: PolygonSurface::new(options.surface().clone(), bus.clone()),
            options,
            state: DrawState::Inactive,
            builder: GeometryBuilder::new(),
            bus,
            consumer: None,
            attached: false,
            suppressed: false,
            last_session: 0,
            pending_release_check: None,
        }
    }

    /// Sets the receiver of the drawn polygons.
    pub fn with_consumer(mut self, consumer: impl PolygonConsumer<F> + 'static) -> Self {
        self.set_consumer(consumer);
        self
    }

    /// Sets the receiver of the drawn polygons.
    pub fn set_consumer(&mut self, consumer: impl PolygonConsumer<F> + 'static) {
        self.consumer = Some(Box::new(consumer));
    }

    /// Event bus the controller emits its [`DrawEvent`]s to.
    pub fn events(&self) -> &EventBus {
        &self.bus
    }

    /// Current state.
    pub fn state(&self) -> DrawState {
        self.state
    }

    /// Returns true if the drawing mode is on.
    pub fn is_active(&self) -> bool {
        self.state != DrawState::Inactive
    }

    /// Returns true if the control was added to a map.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Configuration of the controller.
    pub fn options(&self) -> &DrawControlOptions {
        &self.options
    }

    /// Points of the current (or last) drawing session.
    pub fn builder(&self) -> &GeometryBuilder {
        &self.builder
    }

    /// Rendered polygon surface.
    pub fn surface(&self) -> &PolygonSurface {
        &self.surface
    }

    /// Adds the control to the map.
    pub fn on_add<H: MapHost<Feature = F>>(&mut self, host: &mut H) {
        log::debug!("Draw control added to the map");
        self.attached = true;
        host.set_control_visible(true);
        host.set_control_state(false, self.options.button());
    }

    /// Removes the control from the map. The drawing mode is switched off and the rendered polygon is removed.
    pub fn on_remove<H: MapHost<Feature = F>>(&mut self, host: &mut H) {
        if !self.attached {
            return;
        }

        if self.is_active() {
            self.switch_off(host, false);
        } else {
            self.surface.clear(host);
        }

        host.set_control_visible(false);
        self.attached = false;
        log::debug!("Draw control removed from the map");
    }

    /// Switches the drawing mode on or off.
    pub fn toggle<H: MapHost<Feature = F>>(
        &mut self,
        host: &mut H,
        by_user: bool,
    ) -> Result<(), FreeDrawError> {
        self.ensure_attached()?;
        match self.state {
            DrawState::Inactive => self.switch_on(host, by_user),
            DrawState::Armed | DrawState::Drawing { .. } => self.switch_off(host, by_user),
        }

        Ok(())
    }

    /// Switches the drawing mode on. Does nothing if it is already on.
    pub fn activate<H: MapHost<Feature = F>>(&mut self, host: &mut H) -> Result<(), FreeDrawError> {
        self.ensure_attached()?;
        if !self.is_active() {
            self.switch_on(host, false);
        }

        Ok(())
    }

    /// Switches the drawing mode off, discarding the line being drawn. Does nothing if the mode is already off.
    pub fn deactivate<H: MapHost<Feature = F>>(
        &mut self,
        host: &mut H,
    ) -> Result<(), FreeDrawError> {
        self.ensure_attached()?;
        if self.is_active() {
            self.switch_off(host, false);
        }

        Ok(())
    }

    /// Shows or hides the control button.
    pub fn set_control_visible<H: MapHost<Feature = F>>(
        &mut self,
        host: &mut H,
        visible: bool,
    ) -> Result<(), FreeDrawError> {
        self.ensure_attached()?;
        host.set_control_visible(visible);
        Ok(())
    }

    /// Shows a polygon given by the application (`Polygon` or `MultiPolygon` geometry).
    ///
    /// The polygon replaces the rendered one. It is not given to the consumer.
    pub fn preload_polygon<H: MapHost<Feature = F>>(
        &mut self,
        host: &mut H,
        geometry: &geojson::Geometry,
    ) -> Result<DrawnPolygon, FreeDrawError> {
        self.ensure_attached()?;

        let parts = freedraw_types::geojson::polygons_from_geometry(geometry)?;
        let polygon = DrawnPolygon::from_parts(parts)?;
        self.surface
            .add_polygon(host, &polygon, PolygonOrigin::Preload);

        Ok(polygon)
    }

    /// Handles a pointer event.
    pub fn handle<H: MapHost<Feature = F>>(
        &mut self,
        event: &PointerEvent,
        host: &mut H,
    ) -> EventPropagation {
        debug_assert!(self.attached, "draw control is not attached to a map");
        if !self.attached {
            log::error!("Pointer event {event:?} given to a draw control that is not attached to a map");
            return EventPropagation::Propagate;
        }

        match (self.state, event) {
            (DrawState::Armed, PointerEvent::Down(input)) => {
                self.start_session(input.position, host);
                EventPropagation::Consume
            }
            (DrawState::Drawing { .. }, PointerEvent::Move(input)) => {
                if let Some(preview) = self.builder.add_point(input.position) {
                    self.surface.show_line(host, preview.to_geometry());
                }

                EventPropagation::Stop
            }
            (DrawState::Drawing { session }, PointerEvent::Up(_)) => {
                self.finish_session(session, host);
                EventPropagation::Stop
            }
            (DrawState::Drawing { session }, PointerEvent::DocumentUp) => {
                self.pending_release_check = Some(session);
                EventPropagation::Propagate
            }
            _ => EventPropagation::Propagate,
        }
    }

    /// Runs the checks deferred to the end of the tick. The host must call this after all pointer events of the tick
    /// were handled.
    ///
    /// If the pointer was released outside the map and no release over the map finished the session in the same
    /// tick, the session is cancelled.
    pub fn run_deferred<H: MapHost<Feature = F>>(&mut self, host: &mut H) {
        let Some(session) = self.pending_release_check.take() else {
            return;
        };

        if self.state == (DrawState::Drawing { session }) {
            log::debug!("Pointer released outside of the map, cancelling session {session:?}");
            host.listen(ListenerKind::PointerMove, false);
            self.builder.reset();
            self.surface.clear(host);
            self.release_map(host);
            self.state = DrawState::Armed;
            self.bus.fire(&DrawEvent::SessionEnded {
                session,
                outcome: SessionOutcome::Cancelled,
            });
        }
    }

    fn ensure_attached(&self) -> Result<(), FreeDrawError> {
        if self.attached {
            Ok(())
        } else {
            log::error!("Draw control is used before it was added to a map");
            Err(FreeDrawError::NotAttached)
        }
    }

    fn switch_on<H: MapHost<Feature = F>>(&mut self, host: &mut H, by_user: bool) {
        log::debug!("Draw mode on");
        if self.surface.handle(host).is_some() {
            self.builder.reset();
            self.surface.clear(host);
        }

        self.suppress_map(host);
        host.set_cursor(Cursor::Crosshair);
        host.set_control_state(true, self.options.active_button());
        if self.options.cancel_badge() {
            host.set_cancel_badge_visible(true);
        }
        host.listen(ListenerKind::PointerDown, true);
        host.listen(ListenerKind::PointerUp, true);
        if let Some(message) = self.options.message() {
            host.show_message(message);
        }

        self.state = DrawState::Armed;
        self.bus
            .fire(&DrawEvent::DrawModeChanged { active: true, by_user });
    }

    fn switch_off<H: MapHost<Feature = F>>(&mut self, host: &mut H, by_user: bool) {
        log::debug!("Draw mode off");
        if let DrawState::Drawing { session } = self.state {
            host.listen(ListenerKind::PointerMove, false);
            self.bus.fire(&DrawEvent::SessionEnded {
                session,
                outcome: SessionOutcome::Cancelled,
            });
        }

        self.builder.reset();
        self.pending_release_check = None;
        host.listen(ListenerKind::PointerDown, false);
        host.listen(ListenerKind::PointerUp, false);
        self.release_map(host);
        host.set_cursor(Cursor::Default);
        host.hide_message();
        host.set_control_state(false, self.options.button());
        if self.options.cancel_badge() {
            host.set_cancel_badge_visible(false);
        }
        self.surface.clear(host);

        self.state = DrawState::Inactive;
        self.bus.fire(&DrawEvent::DrawModeChanged {
            active: false,
            by_user,
        });
    }

    fn start_session<H: MapHost<Feature = F>>(&mut self, position: GeoPoint2d, host: &mut H) {
        self.builder.reset();
        self.surface.clear(host);
        self.suppress_map(host);
        host.hide_message();
        host.listen(ListenerKind::PointerMove, true);

        self.last_session += 1;
        let session = SessionId(self.last_session);
        self.state = DrawState::Drawing { session };
        log::debug!("Drawing session {session:?} started");

        self.builder.add_point(position);
        self.bus.fire(&DrawEvent::SessionStarted { session });
    }

    fn finish_session<H: MapHost<Feature = F>>(&mut self, session: SessionId, host: &mut H) {
        host.listen(ListenerKind::PointerMove, false);
        self.state = DrawState::Armed;

        let outcome = match self.builder.finalize() {
            Ok(polygon) => {
                self.surface
                    .add_polygon(host, &polygon, PolygonOrigin::Draw);
                self.deliver(polygon, host);
                SessionOutcome::Completed
            }
            Err(err) => {
                log::debug!("Discarding drawing session {session:?}: {err}");
                self.surface.clear(host);
                SessionOutcome::Degenerate
            }
        };

        self.release_map(host);
        self.bus
            .fire(&DrawEvent::SessionEnded { session, outcome });
    }

    fn deliver<H: FeatureSource<Feature = F>>(&self, polygon: DrawnPolygon, host: &H) {
        let Some(consumer) = &self.consumer else {
            return;
        };

        let ready = match self.options.delivery() {
            Delivery::Filtered(filter) => {
                let layers = if filter.layers().is_empty() {
                    self.options.interactive_layers()
                } else {
                    filter.layers()
                };

                let result = SpatialFilter::from(filter).query(&polygon, layers, host);
                PolygonReady::FilteredFeatures { polygon, result }
            }
            Delivery::Raw => PolygonReady::RawPolygon(polygon),
        };

        consumer.on_polygon(ready);
    }

    fn suppress_map(&mut self, host: &mut impl DrawContext) {
        if self.suppressed {
            return;
        }

        let layers = self.options.interactive_layers();
        host.set_pan_enabled(false);
        host.set_layers_visible(layers, false);
        host.set_click_handlers_enabled(layers, false);
        self.suppressed = true;
    }

    fn release_map(&mut self, host: &mut impl DrawContext) {
        if !self.suppressed {
            return;
        }

        let layers = self.options.interactive_layers();
        host.set_pan_enabled(true);
        host.set_layers_visible(layers, true);
        host.set_click_handlers_enabled(layers, true);
        self.suppressed = false;
    }
}

impl<F, H: MapHost<Feature = F>> PointerEventHandler<H> for DrawController<F> {
    fn handle(&mut self, event: &PointerEvent, host: &mut H) -> EventPropagation {
        DrawController::handle(self, event, host)
    }

    fn run_deferred(&mut self, host: &mut H) {
        DrawController::run_deferred(self, host)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use assert_matches::assert_matches;
    use freedraw_types::lonlat;
    use parking_lot::Mutex;

    use super::*;
    use crate::control::{EventDispatcher, PointerInput, SharedHandler};
    use crate::draw::{PointFeature, RenderSurface, RepairOutcome};
    use crate::filter::{FilterOptions, FilterResult};
    use crate::tests::{point_feature, recorded_events, square_geometry, TestMap, SQUARE};

    type Delivered = Arc<Mutex<Vec<PolygonReady<geojson::Feature>>>>;

    struct Setup {
        controller: DrawController,
        map: TestMap,
        events: Arc<Mutex<Vec<DrawEvent>>>,
        delivered: Delivered,
    }

    fn setup(options: DrawControlOptions) -> Setup {
        let delivered: Delivered = Arc::default();
        let sink = delivered.clone();
        let mut controller = DrawController::new(options)
            .with_consumer(move |ready: PolygonReady<geojson::Feature>| sink.lock().push(ready));
        let events = recorded_events(controller.events());

        let mut map = TestMap::default();
        controller.on_add(&mut map);

        Setup {
            controller,
            map,
            events,
            delivered,
        }
    }

    fn down(lon: f64, lat: f64) -> PointerEvent {
        PointerEvent::Down(PointerInput::mouse(lonlat!(lon, lat)))
    }

    fn moved(lon: f64, lat: f64) -> PointerEvent {
        PointerEvent::Move(PointerInput::mouse(lonlat!(lon, lat)))
    }

    fn up(lon: f64, lat: f64) -> PointerEvent {
        PointerEvent::Up(PointerInput::mouse(lonlat!(lon, lat)))
    }

    /// Presses the pointer at the first point and moves it through the rest, without releasing.
    fn draw_line(s: &mut Setup, points: &[(f64, f64)]) {
        let Some(((lon, lat), rest)) = points.split_first() else {
            return;
        };

        assert_eq!(
            s.controller.handle(&down(*lon, *lat), &mut s.map),
            EventPropagation::Consume
        );
        for (lon, lat) in rest {
            assert_eq!(
                s.controller.handle(&moved(*lon, *lat), &mut s.map),
                EventPropagation::Stop
            );
        }
    }

    fn session_outcomes(events: &[DrawEvent]) -> Vec<SessionOutcome> {
        events
            .iter()
            .filter_map(|event| match event {
                DrawEvent::SessionEnded { outcome, .. } => Some(*outcome),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn draw_square() {
        let mut s = setup(DrawControlOptions::default().with_delivery(Delivery::Raw));
        s.controller.toggle(&mut s.map, true).expect("attached");

        assert_eq!(s.controller.state(), DrawState::Armed);
        assert!(!s.map.pan_enabled);
        assert_eq!(s.map.cursor, Cursor::Crosshair);
        assert!(s.map.control_active);
        assert_eq!(s.map.hidden_layers.len(), 5);
        assert_eq!(s.map.disabled_clicks.len(), 5);
        assert!(s.map.listeners.contains(&ListenerKind::PointerDown));

        draw_line(&mut s, &SQUARE);
        assert_matches!(s.controller.state(), DrawState::Drawing { .. });
        assert!(s.map.listeners.contains(&ListenerKind::PointerMove));
        assert!(s.map.has_layer("line"));
        assert!(!s.map.has_layer("fill"));

        assert_eq!(
            s.controller.handle(&up(2.0, 0.0), &mut s.map),
            EventPropagation::Stop
        );

        assert_eq!(s.controller.state(), DrawState::Armed);
        assert!(s.map.pan_enabled);
        assert!(s.map.hidden_layers.is_empty());
        assert!(s.map.disabled_clicks.is_empty());
        assert_eq!(s.map.cursor, Cursor::Crosshair);
        assert!(!s.map.listeners.contains(&ListenerKind::PointerMove));
        assert_eq!(s.map.layers.len(), 2);

        let delivered = s.delivered.lock();
        assert_eq!(delivered.len(), 1);
        assert_matches!(&delivered[0], PolygonReady::RawPolygon(polygon) if polygon.ring().len() == 5);

        assert_matches!(
            s.events.lock().as_slice(),
            [
                DrawEvent::DrawModeChanged {
                    active: true,
                    by_user: true
                },
                DrawEvent::PolygonRemoved,
                DrawEvent::SessionStarted { .. },
                DrawEvent::PolygonAdded {
                    origin: PolygonOrigin::Draw,
                    ..
                },
                DrawEvent::SessionEnded {
                    outcome: SessionOutcome::Completed,
                    ..
                },
            ]
        );
    }

    #[test]
    fn live_line_and_closed_polygon() {
        let mut s = setup(DrawControlOptions::default().with_delivery(Delivery::Raw));
        s.controller.activate(&mut s.map).expect("attached");

        draw_line(&mut s, &[(1.0, 1.0), (1.0, 2.0), (2.0, 2.0), (2.0, 1.0)]);
        assert_eq!(s.controller.builder().len(), 4);
        assert_matches!(
            s.map.sources.get("line_source").map(|g| &g.value),
            Some(geojson::Value::LineString(line)) if line.len() == 4
        );

        s.controller.handle(&up(2.0, 1.0), &mut s.map);

        assert_eq!(s.controller.state(), DrawState::Armed);
        let expected = geojson::Value::Polygon(vec![vec![
            vec![1.0, 1.0],
            vec![1.0, 2.0],
            vec![2.0, 2.0],
            vec![2.0, 1.0],
            vec![1.0, 1.0],
        ]]);
        assert_eq!(s.map.sources.get("fill_source").map(|g| &g.value), Some(&expected));
        assert_eq!(s.map.sources.get("line_source").map(|g| &g.value), Some(&expected));
        assert_matches!(
            s.events.lock().iter().rev().nth(1),
            Some(DrawEvent::PolygonAdded { origin: PolygonOrigin::Draw, geometry }) if geometry.value == expected
        );
    }

    #[test]
    fn filtered_delivery() {
        let mut s = setup(
            DrawControlOptions::default()
                .with_delivery(Delivery::Filtered(FilterOptions::new(["pois"]))),
        );
        s.map.add_feature("pois", point_feature(1.0, 1.0, "inside"));
        s.map.add_feature("pois", point_feature(5.0, 5.0, "outside"));
        s.controller.activate(&mut s.map).expect("attached");

        draw_line(&mut s, &SQUARE);
        s.controller.handle(&up(2.0, 0.0), &mut s.map);

        let delivered = s.delivered.lock();
        assert_eq!(delivered.len(), 1);
        assert_matches!(
            &delivered[0],
            PolygonReady::FilteredFeatures { result: FilterResult::Features(features), .. }
                if features.len() == 1 && features[0].position() == Some(lonlat!(1.0, 1.0))
        );
    }

    #[test]
    fn filtered_delivery_at_high_zoom() {
        let mut s = setup(DrawControlOptions::default());
        s.map.zoom = 16.0;
        s.map.add_feature("pois", point_feature(1.0, 1.0, "inside"));
        s.controller.activate(&mut s.map).expect("attached");

        draw_line(&mut s, &SQUARE);
        s.controller.handle(&up(2.0, 0.0), &mut s.map);

        let delivered = s.delivered.lock();
        assert_matches!(
            &delivered[..],
            [PolygonReady::FilteredFeatures { result: FilterResult::ZoomTooHigh { .. }, .. }]
        );
    }

    #[test]
    fn degenerate_sessions_deliver_nothing() {
        let mut s = setup(DrawControlOptions::default());
        s.controller.activate(&mut s.map).expect("attached");

        s.controller.handle(&down(1.0, 1.0), &mut s.map);
        s.controller.handle(&up(1.0, 1.0), &mut s.map);

        draw_line(&mut s, &[(1.0, 1.0), (2.0, 2.0)]);
        s.controller.handle(&up(2.0, 2.0), &mut s.map);

        draw_line(&mut s, &[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);
        s.controller.handle(&up(2.0, 2.0), &mut s.map);

        assert_eq!(s.controller.state(), DrawState::Armed);
        assert!(s.map.layers.is_empty());
        assert!(s.map.sources.is_empty());
        assert!(s.map.pan_enabled);
        assert!(s.delivered.lock().is_empty());
        assert_eq!(
            session_outcomes(&s.events.lock()),
            [SessionOutcome::Degenerate; 3]
        );
    }

    #[test]
    fn release_outside_cancels_session() {
        let mut s = setup(DrawControlOptions::default());
        s.controller.activate(&mut s.map).expect("attached");

        draw_line(&mut s, &SQUARE);
        assert_eq!(
            s.controller.handle(&PointerEvent::DocumentUp, &mut s.map),
            EventPropagation::Propagate
        );
        assert_matches!(s.controller.state(), DrawState::Drawing { .. });

        s.controller.run_deferred(&mut s.map);

        assert_eq!(s.controller.state(), DrawState::Armed);
        assert!(s.controller.builder().is_empty());
        assert!(s.map.layers.is_empty());
        assert!(s.map.pan_enabled);
        assert!(!s.map.listeners.contains(&ListenerKind::PointerMove));
        assert!(s.delivered.lock().is_empty());
        assert_eq!(
            session_outcomes(&s.events.lock()),
            [SessionOutcome::Cancelled]
        );
    }

    #[test]
    fn duplicate_release_is_resolved_once() {
        let mut s = setup(DrawControlOptions::default());
        s.controller.activate(&mut s.map).expect("attached");

        // Release over the map reported before the document release.
        draw_line(&mut s, &SQUARE);
        s.controller.handle(&up(2.0, 0.0), &mut s.map);
        s.controller.handle(&PointerEvent::DocumentUp, &mut s.map);
        s.controller.run_deferred(&mut s.map);

        // And after it.
        draw_line(&mut s, &SQUARE);
        s.controller.handle(&PointerEvent::DocumentUp, &mut s.map);
        s.controller.handle(&up(2.0, 0.0), &mut s.map);
        s.controller.run_deferred(&mut s.map);

        assert_eq!(
            session_outcomes(&s.events.lock()),
            [SessionOutcome::Completed; 2]
        );
        assert_eq!(s.delivered.lock().len(), 2);
        assert_eq!(s.map.layers.len(), 2);
    }

    #[test]
    fn unexpected_events_are_ignored() {
        let mut s = setup(DrawControlOptions::default());

        assert_eq!(
            s.controller.handle(&down(0.0, 0.0), &mut s.map),
            EventPropagation::Propagate
        );
        assert_eq!(s.controller.state(), DrawState::Inactive);

        s.controller.activate(&mut s.map).expect("attached");
        assert_eq!(
            s.controller.handle(&moved(1.0, 1.0), &mut s.map),
            EventPropagation::Propagate
        );
        assert_eq!(
            s.controller.handle(&up(1.0, 1.0), &mut s.map),
            EventPropagation::Propagate
        );
        s.controller.handle(&PointerEvent::DocumentUp, &mut s.map);
        s.controller.run_deferred(&mut s.map);

        assert_eq!(s.controller.state(), DrawState::Armed);
        assert!(s.controller.builder().is_empty());
        assert!(session_outcomes(&s.events.lock()).is_empty());
    }

    #[test]
    fn deactivation_restores_map() {
        let mut s = setup(DrawControlOptions::default().with_message("Draw an area"));
        s.controller.toggle(&mut s.map, true).expect("attached");
        assert_eq!(s.map.message.as_deref(), Some("Draw an area"));

        draw_line(&mut s, &SQUARE);
        assert!(s.map.message.is_none());
        s.controller.handle(&up(2.0, 0.0), &mut s.map);
        s.controller.toggle(&mut s.map, true).expect("attached");

        assert_eq!(s.controller.state(), DrawState::Inactive);
        assert!(s.map.is_pristine());
        assert_eq!(s.map.control_style.as_ref(), Some(s.controller.options().button()));
        assert_matches!(
            s.events.lock().last(),
            Some(DrawEvent::DrawModeChanged {
                active: false,
                by_user: true
            })
        );
    }

    #[test]
    fn deactivation_while_drawing() {
        let mut s = setup(DrawControlOptions::default());
        s.controller.activate(&mut s.map).expect("attached");

        draw_line(&mut s, &SQUARE);
        s.controller.deactivate(&mut s.map).expect("attached");

        assert_eq!(s.controller.state(), DrawState::Inactive);
        assert!(s.map.is_pristine());
        assert!(s.delivered.lock().is_empty());
        assert_eq!(
            session_outcomes(&s.events.lock()),
            [SessionOutcome::Cancelled]
        );

        // The release arriving after deactivation changes nothing.
        s.controller.handle(&up(2.0, 0.0), &mut s.map);
        s.controller.run_deferred(&mut s.map);
        assert!(s.map.is_pristine());
        assert_eq!(session_outcomes(&s.events.lock()).len(), 1);
    }

    #[test]
    fn activate_and_deactivate_are_idempotent() {
        let mut s = setup(DrawControlOptions::default());

        s.controller.deactivate(&mut s.map).expect("attached");
        s.controller.activate(&mut s.map).expect("attached");
        s.controller.activate(&mut s.map).expect("attached");
        assert_eq!(s.controller.state(), DrawState::Armed);

        let mode_changes = s
            .events
            .lock()
            .iter()
            .filter(|e| matches!(e, DrawEvent::DrawModeChanged { .. }))
            .count();
        assert_eq!(mode_changes, 1);
    }

    #[test]
    fn sessions_have_growing_ids() {
        let mut s = setup(DrawControlOptions::default());
        s.controller.activate(&mut s.map).expect("attached");

        for _ in 0..3 {
            draw_line(&mut s, &SQUARE);
            s.controller.handle(&up(2.0, 0.0), &mut s.map);
        }

        let ids: Vec<u64> = s
            .events
            .lock()
            .iter()
            .filter_map(|e| match e {
                DrawEvent::SessionStarted { session } => Some(session.value()),
                _ => None,
            })
            .collect();
        assert_eq!(ids, [1, 2, 3]);
        // Every new session replaces the previous polygon.
        assert_eq!(s.map.layers.len(), 2);
    }

    #[test]
    fn self_intersecting_line() {
        let mut s = setup(DrawControlOptions::default().with_delivery(Delivery::Raw));
        s.controller.activate(&mut s.map).expect("attached");

        draw_line(&mut s, &[(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0)]);
        s.controller.handle(&up(0.0, 2.0), &mut s.map);

        let delivered = s.delivered.lock();
        assert_eq!(
            delivered[0].polygon().repair_outcome(),
            RepairOutcome::Repaired { parts: 2 }
        );
        assert_matches!(
            s.map.sources.get("fill_source").map(|g| &g.value),
            Some(geojson::Value::MultiPolygon(_))
        );
        assert_eq!(
            s.map.sources.get("line_source"),
            Some(&delivered[0].polygon().ring_geometry())
        );
    }

    #[test]
    fn preload() {
        let mut s = setup(DrawControlOptions::default());

        let polygon = s
            .controller
            .preload_polygon(&mut s.map, &square_geometry())
            .expect("valid polygon");
        assert_eq!(polygon.parts().len(), 1);
        assert_eq!(s.map.layers.len(), 2);
        assert!(s.delivered.lock().is_empty());
        assert_matches!(
            s.events.lock().as_slice(),
            [DrawEvent::PolygonAdded {
                origin: PolygonOrigin::Preload,
                ..
            }]
        );

        // Switching the drawing mode on removes the preloaded polygon.
        s.controller.activate(&mut s.map).expect("attached");
        assert!(s.map.layers.is_empty());

        let point = geojson::Geometry::new(geojson::Value::Point(vec![1.0, 1.0]));
        assert_matches!(
            s.controller.preload_polygon(&mut s.map, &point),
            Err(FreeDrawError::Geometry(_))
        );
    }

    #[test]
    fn detached_control() {
        let mut controller = DrawController::<geojson::Feature>::default();
        let mut map = TestMap::default();

        assert_matches!(
            controller.toggle(&mut map, true),
            Err(FreeDrawError::NotAttached)
        );
        assert_matches!(
            controller.preload_polygon(&mut map, &square_geometry()),
            Err(FreeDrawError::NotAttached)
        );
        assert_eq!(controller.state(), DrawState::Inactive);
        assert!(map.is_pristine());
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "not attached"))]
    fn pointer_events_on_detached_control() {
        let mut controller = DrawController::<geojson::Feature>::default();
        let mut map = TestMap::default();

        assert_eq!(
            controller.handle(&down(0.0, 0.0), &mut map),
            EventPropagation::Propagate
        );
    }

    #[test]
    fn control_visibility() {
        let mut s = setup(DrawControlOptions::default());

        s.controller.set_control_visible(&mut s.map, false).expect("attached");
        assert!(!s.map.control_visible);
        s.controller.set_control_visible(&mut s.map, true).expect("attached");
        assert!(s.map.control_visible);
        assert_eq!(s.controller.state(), DrawState::Inactive);
    }

    #[test]
    fn cancel_badge_follows_draw_mode() {
        let mut s = setup(DrawControlOptions::default().with_cancel_badge(true));

        s.controller.activate(&mut s.map).expect("attached");
        assert!(s.map.cancel_badge);
        draw_line(&mut s, &SQUARE);
        assert!(s.map.cancel_badge);
        s.controller.deactivate(&mut s.map).expect("attached");
        assert!(!s.map.cancel_badge);
    }

    #[test]
    fn cancel_badge_is_off_by_default() {
        let mut s = setup(DrawControlOptions::default());

        s.controller.activate(&mut s.map).expect("attached");
        assert!(!s.map.cancel_badge);
    }

    #[test]
    fn remove_from_map() {
        let mut s = setup(DrawControlOptions::default());
        assert!(s.map.control_visible);

        s.controller.activate(&mut s.map).expect("attached");
        draw_line(&mut s, &SQUARE);
        s.controller.handle(&up(2.0, 0.0), &mut s.map);
        s.controller.on_remove(&mut s.map);

        assert!(!s.controller.is_attached());
        assert!(!s.map.control_visible);
        assert!(s.map.is_pristine());
        assert_matches!(
            s.controller.activate(&mut s.map),
            Err(FreeDrawError::NotAttached)
        );
    }

    #[test]
    fn through_dispatcher() {
        let mut map = TestMap::default();
        let controller = SharedHandler::new(DrawController::<geojson::Feature>::default());
        let events = recorded_events(controller.lock().events());

        let mut dispatcher = EventDispatcher::default();
        dispatcher.add_handler(controller.clone());

        controller.lock().on_add(&mut map);
        controller
            .lock()
            .toggle(&mut map, true)
            .expect("attached");

        assert_eq!(
            dispatcher.handle(down(0.0, 0.0), &mut map),
            EventPropagation::Consume
        );
        dispatcher.handle(moved(0.0, 2.0), &mut map);
        dispatcher.handle(PointerEvent::DocumentUp, &mut map);
        dispatcher.end_tick(&mut map);

        assert_eq!(controller.lock().state(), DrawState::Armed);
        assert_eq!(
            session_outcomes(&events.lock()),
            [SessionOutcome::Cancelled]
        );
    }
}
