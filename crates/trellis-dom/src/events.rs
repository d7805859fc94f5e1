//! DOM Events
//!
//! Element event handlers and synchronous dispatch. Each element carries at
//! most one handler per event name; assigning again replaces the previous
//! handler, matching element-property handler semantics.

use std::collections::HashMap;
use std::rc::Rc;

use crate::{NodeId, SharedDocument};

/// Event handler callback
pub type EventHandler = Rc<dyn Fn(&mut Event)>;

/// Dispatched event
#[derive(Debug, Clone)]
pub struct Event {
    /// Event name ("click", "input", ...)
    pub name: String,
    /// Element the event was dispatched to
    pub target: NodeId,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl Event {
    pub fn new(name: impl Into<String>, target: NodeId) -> Self {
        Self {
            name: name.into(),
            target,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Stop propagation
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Check if default was prevented
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Check if propagation was stopped
    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Per-document handler storage
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<NodeId, HashMap<String, EventHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a handler, replacing any previous one for this slot
    pub fn set(&mut self, node: NodeId, event: &str, handler: EventHandler) {
        self.handlers
            .entry(node)
            .or_default()
            .insert(event.to_string(), handler);
    }

    /// Remove a handler, returning whether one was installed
    pub fn remove(&mut self, node: NodeId, event: &str) -> bool {
        match self.handlers.get_mut(&node) {
            Some(slots) => slots.remove(event).is_some(),
            None => false,
        }
    }

    /// Get the handler for a slot
    pub fn get(&self, node: NodeId, event: &str) -> Option<EventHandler> {
        self.handlers.get(&node)?.get(event).cloned()
    }

    /// Check whether a handler is installed
    pub fn has(&self, node: NodeId, event: &str) -> bool {
        self.handlers
            .get(&node)
            .is_some_and(|slots| slots.contains_key(event))
    }
}

/// Dispatch an event to a node's handler, if any.
///
/// The handler is cloned out of the document borrow before it runs, so it may
/// re-enter the document or mutate a store that re-enters it.
/// Returns `false` when the handler called `prevent_default`.
pub fn dispatch(doc: &SharedDocument, target: NodeId, name: &str) -> bool {
    let handler = doc.borrow().handlers().get(target, name);

    let mut event = Event::new(name, target);
    if let Some(handler) = handler {
        tracing::trace!("dispatching {:?} to node {:?}", name, target);
        handler(&mut event);
    }
    !event.is_default_prevented()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Document;
    use std::cell::Cell;

    #[test]
    fn test_event_flags() {
        let mut event = Event::new("click", NodeId(1));

        assert!(!event.is_default_prevented());
        event.prevent_default();
        event.stop_propagation();
        assert!(event.is_default_prevented());
        assert!(event.is_propagation_stopped());
    }

    #[test]
    fn test_handler_replaced_on_set() {
        let mut registry = HandlerRegistry::new();
        let node = NodeId(0);
        let first = Rc::new(Cell::new(false));
        let second = Rc::new(Cell::new(false));

        let hit = first.clone();
        registry.set(node, "click", Rc::new(move |_| hit.set(true)));
        let hit = second.clone();
        registry.set(node, "click", Rc::new(move |_| hit.set(true)));

        let handler = registry.get(node, "click").unwrap();
        handler(&mut Event::new("click", node));
        assert!(!first.get());
        assert!(second.get());
    }

    #[test]
    fn test_dispatch_runs_handler() {
        let doc = Document::shared();
        let button = doc.borrow_mut().create_element("button");
        let clicked = Rc::new(Cell::new(false));

        let hit = clicked.clone();
        doc.borrow_mut()
            .set_event_handler(button, "click", Rc::new(move |_| hit.set(true)));

        assert!(dispatch(&doc, button, "click"));
        assert!(clicked.get());
    }

    #[test]
    fn test_dispatch_without_handler_is_noop() {
        let doc = Document::shared();
        let button = doc.borrow_mut().create_element("button");

        assert!(dispatch(&doc, button, "click"));
    }

    #[test]
    fn test_handler_may_reenter_document() {
        let doc = Document::shared();
        let button = doc.borrow_mut().create_element("button");

        let doc_handle = doc.clone();
        doc.borrow_mut().set_event_handler(
            button,
            "click",
            Rc::new(move |event| {
                doc_handle
                    .borrow_mut()
                    .set_attribute(event.target, "data-clicked", "yes")
                    .unwrap();
            }),
        );

        dispatch(&doc, button, "click");
        let doc = doc.borrow();
        assert_eq!(doc.get_attribute(button, "data-clicked"), Some("yes"));
    }

    #[test]
    fn test_prevent_default_reported() {
        let doc = Document::shared();
        let link = doc.borrow_mut().create_element("a");
        doc.borrow_mut().set_event_handler(
            link,
            "click",
            Rc::new(|event| event.prevent_default()),
        );

        assert!(!dispatch(&doc, link, "click"));
    }
}
