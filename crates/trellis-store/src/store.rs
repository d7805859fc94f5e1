//! Observable store
//!
//! Mutation goes through `set` and `reset` only; both emit the change events
//! bindings subscribe to. The store never inspects what its listeners do.

use std::cell::RefCell;
use std::rc::Rc;

use crate::{EventEmitter, Listener, ListenerId, StoreData, Value};

/// Shared single-threaded store handle
pub type SharedStore = Rc<RefCell<Store>>;

/// Event name fired when a property changes
pub fn change_event(prop: &str) -> String {
    format!("change {prop}")
}

/// Observable property map
#[derive(Default)]
pub struct Store {
    data: StoreData,
    emitter: EventEmitter,
}

impl Store {
    /// Create a store, empty when no data is given
    pub fn new(data: impl Into<Option<StoreData>>) -> Self {
        Self {
            data: data.into().unwrap_or_default(),
            emitter: EventEmitter::new(),
        }
    }

    /// Create a shared store handle
    pub fn shared(data: impl Into<Option<StoreData>>) -> SharedStore {
        Rc::new(RefCell::new(Self::new(data)))
    }

    /// Current data
    pub fn data(&self) -> &StoreData {
        &self.data
    }

    /// Read one property
    pub fn get(&self, prop: &str) -> Option<&Value> {
        self.data.get(prop)
    }

    /// Write one property and emit its change event.
    ///
    /// Writing an unchanged value still emits; deduplication is the
    /// listener's concern, not the store's.
    pub fn set(&mut self, prop: &str, value: impl Into<Value>) {
        self.data.insert(prop.to_string(), value.into());
        tracing::trace!("set {:?}", prop);
        self.emitter.emit(&change_event(prop), &self.data);
    }

    /// Replace the data wholesale and emit a change event for every property
    /// in the union of the old and new key sets, old keys first.
    pub fn reset(&mut self, new_data: StoreData) {
        let mut affected: Vec<String> = self.data.keys().cloned().collect();
        for key in new_data.keys() {
            if !affected.iter().any(|k| k == key) {
                affected.push(key.clone());
            }
        }

        self.data = new_data;
        tracing::debug!("store reset, {} properties affected", affected.len());
        for prop in &affected {
            self.emitter.emit(&change_event(prop), &self.data);
        }
    }

    /// Register a listener for an event, returning its handle
    pub fn on(&mut self, event: &str, listener: Listener) -> ListenerId {
        self.emitter.on(event, listener)
    }

    /// Release a subscription
    pub fn off(&mut self, id: ListenerId) -> bool {
        self.emitter.off(id)
    }

    /// Number of listeners registered for an event
    pub fn listener_count(&self, event: &str) -> usize {
        self.emitter.listener_count(event)
    }
}
