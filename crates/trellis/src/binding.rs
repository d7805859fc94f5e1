//! Binding handles
//!
//! Every subscription a bind operation registers is tracked here, so a built
//! tree can be released from its store instead of updating forever.

use trellis_store::{ListenerId, SharedStore};

/// Subscriptions registered by one or more bind operations
#[derive(Default)]
pub struct Bindings {
    subscriptions: Vec<(String, ListenerId)>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track one subscription
    pub fn push(&mut self, event: String, id: ListenerId) {
        self.subscriptions.push((event, id));
    }

    /// Absorb another set of handles
    pub fn merge(&mut self, other: Bindings) {
        self.subscriptions.extend(other.subscriptions);
    }

    /// Number of tracked subscriptions
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Release every tracked subscription against the store it was registered
    /// on. Returns how many were actually released; draining makes a second
    /// call a no-op.
    pub fn release(&mut self, store: &SharedStore) -> usize {
        let mut released = 0;
        let mut store = store.borrow_mut();
        for (_, id) in self.subscriptions.drain(..) {
            if store.off(id) {
                released += 1;
            }
        }
        released
    }
}
