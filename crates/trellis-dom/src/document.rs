//! Document - High-level document API

use std::cell::RefCell;
use std::rc::Rc;

use crate::{DomResult, DomTree, EventHandler, HandlerRegistry, NodeId};

/// Shared single-threaded document handle
pub type SharedDocument = Rc<RefCell<Document>>;

/// Document: a DOM tree plus its event handler registry
#[derive(Default)]
pub struct Document {
    tree: DomTree,
    handlers: HandlerRegistry,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self {
            tree: DomTree::new(),
            handlers: HandlerRegistry::new(),
        }
    }

    /// Create a shared document handle
    pub fn shared() -> SharedDocument {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Mutable access to the DOM tree
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// Access the handler registry
    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.tree.create_element(tag)
    }

    /// Create a detached element from a `tag.class#id` fragment
    pub fn create_element_from_selector(&mut self, selector: &str) -> NodeId {
        self.tree.create_element_from_selector(selector)
    }

    /// Create a detached text node
    pub fn create_text_node(&mut self, content: impl Into<String>) -> NodeId {
        self.tree.create_text(content)
    }

    /// Append a child node
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.tree.append_child(parent, child)
    }

    /// Set an attribute value
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        self.tree.set_attribute(id, name, value)
    }

    /// Get an attribute value
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.tree.get_attribute(id, name)
    }

    /// Canonical (uppercase) tag name of an element
    pub fn tag_name(&self, id: NodeId) -> Option<String> {
        self.tree.tag_name(id)
    }

    /// Replace a text node's content
    pub fn set_text(&mut self, id: NodeId, content: impl Into<String>) -> DomResult<()> {
        self.tree.set_text(id, content)
    }

    /// Concatenated text of a node and its descendants
    pub fn text_content(&self, id: NodeId) -> String {
        self.tree.text_content(id)
    }

    /// Serialized markup of a node's children
    pub fn inner_html(&self, id: NodeId) -> String {
        self.tree.inner_html(id)
    }

    /// Serialized markup of a node itself
    pub fn outer_html(&self, id: NodeId) -> String {
        self.tree.outer_html(id)
    }

    /// Find an element by its id attribute
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree.get_element_by_id(id)
    }

    /// Install an event handler, replacing any previous one for the slot
    pub fn set_event_handler(&mut self, node: NodeId, event: &str, handler: EventHandler) {
        self.handlers.set(node, event, handler);
    }

    /// Remove an event handler
    pub fn remove_event_handler(&mut self, node: NodeId, event: &str) -> bool {
        self.handlers.remove(node, event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_facade() {
        let mut doc = Document::new();
        let button = doc.create_element("button");
        let text = doc.create_text_node("hello");
        doc.append_child(button, text).unwrap();
        doc.set_attribute(button, "class", "btn").unwrap();

        assert_eq!(doc.tag_name(button).as_deref(), Some("BUTTON"));
        assert_eq!(doc.get_attribute(button, "class"), Some("btn"));
        assert_eq!(doc.text_content(button), "hello");
        assert_eq!(doc.inner_html(button), "hello");
        assert_eq!(doc.outer_html(button), "<button class=\"btn\">hello</button>");
    }

    #[test]
    fn test_shared_handle() {
        let doc = Document::shared();
        let el = doc.borrow_mut().create_element_from_selector("span#tag");

        assert_eq!(doc.borrow().get_element_by_id("tag"), Some(el));
    }
}
