//! A minimal synchronous event bus owned by the world.
//!
//! Events are identified by [`EventId`]s, which are usually declared as constants:
//!
//! ```
//! use nexus_ecs::event::{EventId, ParamId};
//!
//! const QUIT: EventId = EventId::named("Window::Quit");
//! const BUTTONS: ParamId = ParamId::named("Window::Input::Buttons");
//! ```
//!
//! Listeners run in registration order, immediately when the event is sent.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use crate::error::{self, Error, Result};

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

const fn fnv1a(name: &str) -> u64 {
    let bytes = name.as_bytes();
    let mut hash = FNV_OFFSET;
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
        i += 1;
    }
    hash
}

/// Identifies a type of event.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventId(u64);

impl EventId {
    /// Derives an ID from a name.
    pub const fn named(name: &str) -> Self { Self(fnv1a(name)) }
}

impl fmt::Debug for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "EventId({:#018x})", self.0) }
}

/// Identifies a parameter within an event.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParamId(u64);

impl ParamId {
    /// Derives an ID from a name.
    pub const fn named(name: &str) -> Self { Self(fnv1a(name)) }
}

impl fmt::Debug for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "ParamId({:#018x})", self.0) }
}

/// An event with typed parameters.
pub struct Event {
    id:     EventId,
    params: HashMap<ParamId, Box<dyn Any + Send>>,
}

impl Event {
    /// Creates an event without parameters.
    pub fn new(id: EventId) -> Self { Self { id, params: HashMap::new() } }

    /// The type of this event.
    pub fn id(&self) -> EventId { self.id }

    /// Sets a parameter, replacing any previous value.
    pub fn set_param<T: Any + Send>(&mut self, param: ParamId, value: T) {
        self.params.insert(param, Box::new(value));
    }

    /// Builder-style variant of [`set_param`](Self::set_param).
    #[must_use]
    pub fn with_param<T: Any + Send>(mut self, param: ParamId, value: T) -> Self {
        self.set_param(param, value);
        self
    }

    /// Reads a parameter.
    ///
    /// Fails if the parameter is absent or was set with a different type.
    pub fn param<T: Any + Send>(&self, param: ParamId) -> Result<&T> {
        self.params
            .get(&param)
            .and_then(|value| value.downcast_ref::<T>())
            .ok_or_else(|| error::reject(Error::MissingParam { event: self.id, param }))
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("id", &self.id)
            .field("params", &self.params.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A callback invoked when an event is sent.
pub type Listener = Box<dyn FnMut(&Event) + Send>;

/// Dispatches events to listeners by event ID.
#[derive(Default)]
pub struct Bus {
    listeners: HashMap<EventId, Vec<Listener>>,
}

impl Bus {
    /// Registers `listener` for events with ID `id`.
    pub fn add_listener(&mut self, id: EventId, listener: impl FnMut(&Event) + Send + 'static) {
        self.listeners.entry(id).or_default().push(Box::new(listener));
    }

    /// Calls every listener of `event.id()` with `event`.
    pub fn send(&mut self, event: &Event) {
        match self.listeners.get_mut(&event.id) {
            Some(listeners) => {
                for listener in listeners {
                    listener(event);
                }
            }
            None => log::trace!("no listener for {:?}", event.id),
        }
    }

    /// Sends a parameterless event.
    pub fn send_id(&mut self, id: EventId) { self.send(&Event::new(id)); }

    /// The number of listeners registered for `id`.
    pub fn listener_count(&self, id: EventId) -> usize { self.listeners.get(&id).map_or(0, Vec::len) }
}
