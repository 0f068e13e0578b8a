use crate::control::{EventPropagation, PointerEvent, PointerEventHandler};

/// Dispatches pointer events to a list of handlers.
///
/// Handlers are called in the order they were added until one of them returns [`EventPropagation::Stop`] or
/// [`EventPropagation::Consume`]. A handler that consumes a [`PointerEvent::Down`] event becomes the owner of the
/// gesture: the following move and up events are given only to it until the pointer is released.
/// [`PointerEvent::DocumentUp`] is always given to every handler.
pub struct EventDispatcher<H> {
    handlers: Vec<Box<dyn PointerEventHandler<H>>>,
    gesture_owner: Option<usize>,
}

impl<H> Default for EventDispatcher<H> {
    fn default() -> Self {
        Self {
            handlers: vec![],
            gesture_owner: None,
        }
    }
}

impl<H> EventDispatcher<H> {
    /// Adds a handler to the end of the list.
    pub fn add_handler(&mut self, handler: impl PointerEventHandler<H> + 'static) {
        self.handlers.push(Box::new(handler));
    }

    /// Gives the event to the handlers.
    pub fn handle(&mut self, event: PointerEvent, host: &mut H) -> EventPropagation {
        match event {
            PointerEvent::DocumentUp => {
                self.gesture_owner = None;
                for handler in &mut self.handlers {
                    handler.handle(&event, host);
                }

                EventPropagation::Propagate
            }
            PointerEvent::Move(_) | PointerEvent::Up(_) if self.gesture_owner.is_some() => {
                let owner = self.gesture_owner;
                if matches!(event, PointerEvent::Up(_)) {
                    self.gesture_owner = None;
                }

                match owner.and_then(|index| self.handlers.get_mut(index)) {
                    Some(handler) => handler.handle(&event, host),
                    None => EventPropagation::Propagate,
                }
            }
            _ => {
                for (index, handler) in self.handlers.iter_mut().enumerate() {
                    match handler.handle(&event, host) {
                        EventPropagation::Propagate => {}
                        EventPropagation::Stop => return EventPropagation::Stop,
                        EventPropagation::Consume => {
                            if matches!(event, PointerEvent::Down(_)) {
                                self.gesture_owner = Some(index);
                            }

                            return EventPropagation::Consume;
                        }
                    }
                }

                EventPropagation::Propagate
            }
        }
    }

    /// Runs the deferred logic of all handlers. Call this after all the events of the current tick were dispatched.
    pub fn end_tick(&mut self, host: &mut H) {
        for handler in &mut self.handlers {
            handler.run_deferred(host);
        }
    }
}
