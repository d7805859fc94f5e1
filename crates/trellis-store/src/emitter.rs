//! Event Emitter
//!
//! Listener registry keyed by event name. Registration returns a handle so
//! subscriptions can be released; emission is synchronous, in registration
//! order. Listeners receive the data snapshot by reference and must not
//! re-borrow the store that is emitting.

use std::collections::HashMap;
use std::rc::Rc;

use crate::StoreData;

/// Listener callback
pub type Listener = Rc<dyn Fn(&StoreData)>;

/// Subscription handle returned by `on`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Listener registry
#[derive(Default)]
pub struct EventEmitter {
    listeners: HashMap<String, Vec<(ListenerId, Listener)>>,
    next_id: u64,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener, returning its handle
    pub fn on(&mut self, event: &str, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners
            .entry(event.to_string())
            .or_default()
            .push((id, listener));
        id
    }

    /// Remove a listener by handle, returning whether it was registered
    pub fn off(&mut self, id: ListenerId) -> bool {
        for slot in self.listeners.values_mut() {
            if let Some(pos) = slot.iter().position(|(lid, _)| *lid == id) {
                slot.remove(pos);
                return true;
            }
        }
        false
    }

    /// Invoke every listener for an event, in registration order
    pub fn emit(&self, event: &str, data: &StoreData) {
        let Some(slot) = self.listeners.get(event) else {
            return;
        };
        // Clone the callbacks out so a listener cannot observe the registry
        // mid-iteration
        let callbacks: Vec<Listener> = slot.iter().map(|(_, l)| l.clone()).collect();
        for callback in callbacks {
            callback(data);
        }
    }

    /// Number of listeners registered for an event
    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.get(event).map_or(0, |slot| slot.len())
    }
}
