//! DOM Tree (arena-based allocation)

use crate::{
    DomError, DomResult, ElementData, Node, NodeId, SelectorFragment, StringInterner,
};

/// Tags serialized without a closing tag
const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

/// Arena-based DOM tree
#[derive(Default)]
pub struct DomTree {
    nodes: Vec<Node>,
    interner: StringInterner,
}

impl DomTree {
    /// Create a new empty DOM tree
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            interner: StringInterner::new(),
        }
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if !id.is_valid() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if !id.is_valid() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)
    }

    fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.get(id).ok_or(DomError::NotFound)
    }

    fn node_mut(&mut self, id: NodeId) -> DomResult<&mut Node> {
        self.get_mut(id).ok_or(DomError::NotFound)
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Access the string interner
    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    // -- construction --------------------------------------------------

    /// Create a detached element with the given tag name
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let name = self.interner.intern(&tag.to_ascii_lowercase());
        self.alloc(Node::element(ElementData::new(name)))
    }

    /// Create a detached element from a `tag.class#id` fragment
    pub fn create_element_from_selector(&mut self, selector: &str) -> NodeId {
        let fragment = SelectorFragment::parse(selector);
        if fragment.tag.is_none() && !selector.trim().is_empty() {
            tracing::debug!("selector {:?} names no tag, using default container", selector);
        }

        let id = self.create_element(fragment.tag_or_default());
        if let Some(elem_id) = &fragment.id {
            // Infallible: `id` was just created as an element
            let _ = self.set_attribute(id, "id", elem_id);
        }
        if let Some(classes) = fragment.class_attr() {
            let _ = self.set_attribute(id, "class", &classes);
        }
        id
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: impl Into<String>) -> NodeId {
        self.alloc(Node::text(content.into()))
    }

    // -- hierarchy -----------------------------------------------------

    /// Append a child node, detaching it from any previous parent
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        if !self.node(parent)?.is_element() {
            return Err(DomError::HierarchyRequest);
        }
        self.node(child)?;
        // A node cannot contain itself or an ancestor
        let mut cursor = parent;
        while cursor.is_valid() {
            if cursor == child {
                return Err(DomError::HierarchyRequest);
            }
            cursor = self.node(cursor)?.parent;
        }

        self.detach(child)?;

        let last = self.node(parent)?.last_child;
        {
            let child_node = self.node_mut(child)?;
            child_node.parent = parent;
            child_node.prev_sibling = last;
            child_node.next_sibling = NodeId::NONE;
        }
        if last.is_valid() {
            self.node_mut(last)?.next_sibling = child;
        } else {
            self.node_mut(parent)?.first_child = child;
        }
        self.node_mut(parent)?.last_child = child;

        Ok(child)
    }

    /// Unlink a node from its parent and siblings
    pub fn detach(&mut self, id: NodeId) -> DomResult<()> {
        let (parent, prev, next) = {
            let node = self.node(id)?;
            (node.parent, node.prev_sibling, node.next_sibling)
        };
        if !parent.is_valid() {
            return Ok(());
        }

        if prev.is_valid() {
            self.node_mut(prev)?.next_sibling = next;
        } else {
            self.node_mut(parent)?.first_child = next;
        }
        if next.is_valid() {
            self.node_mut(next)?.prev_sibling = prev;
        } else {
            self.node_mut(parent)?.last_child = prev;
        }

        let node = self.node_mut(id)?;
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
        Ok(())
    }

    /// Iterate the direct children of a node
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.get(id).map(|n| n.first_child).unwrap_or(NodeId::NONE),
        }
    }

    /// Number of direct element children
    pub fn element_child_count(&self, id: NodeId) -> usize {
        self.children(id).filter(|(_, n)| n.is_element()).count()
    }

    // -- element access ------------------------------------------------

    /// Canonical (uppercase) tag name of an element
    pub fn tag_name(&self, id: NodeId) -> Option<String> {
        let elem = self.get(id)?.as_element()?;
        Some(self.interner.resolve(elem.name).to_ascii_uppercase())
    }

    /// Lowercase tag name of an element
    pub fn local_name(&self, id: NodeId) -> Option<&str> {
        let elem = self.get(id)?.as_element()?;
        Some(self.interner.resolve(elem.name))
    }

    /// Set an attribute; `id` and `class` writes refresh the lookup caches
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        let lower = name.to_ascii_lowercase();
        let name_interned = self.interner.intern(&lower);

        let id_cache = match lower.as_str() {
            "id" => Some(self.interner.intern(value)),
            _ => None,
        };
        let class_cache = match lower.as_str() {
            "class" => Some(
                value
                    .split_ascii_whitespace()
                    .map(|c| self.interner.intern(c))
                    .collect::<Vec<_>>(),
            ),
            _ => None,
        };

        let elem = self
            .node_mut(id)?
            .as_element_mut()
            .ok_or(DomError::NotAnElement)?;
        elem.set_attr(name_interned, value.to_string());
        if let Some(cached) = id_cache {
            elem.id = Some(cached);
        }
        if let Some(cached) = class_cache {
            elem.classes = cached;
        }
        Ok(())
    }

    /// Get an attribute value
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        let elem = self.get(id)?.as_element()?;
        let name_interned = self.interner.lookup(&name.to_ascii_lowercase())?;
        elem.get_attr(name_interned)
    }

    /// Check whether an attribute is present
    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.get_attribute(id, name).is_some()
    }

    /// Remove an attribute, returning whether it was present
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> DomResult<bool> {
        let lower = name.to_ascii_lowercase();
        let Some(name_interned) = self.interner.lookup(&lower) else {
            return Ok(false);
        };
        let elem = self
            .node_mut(id)?
            .as_element_mut()
            .ok_or(DomError::NotAnElement)?;
        let removed = elem.remove_attr(name_interned);
        match lower.as_str() {
            "id" => elem.id = None,
            "class" => elem.classes.clear(),
            _ => {}
        }
        Ok(removed)
    }

    /// Find an element whose id attribute matches, scanning the arena
    pub fn get_element_by_id(&self, target: &str) -> Option<NodeId> {
        let target_interned = self.interner.lookup(target)?;
        self.nodes.iter().enumerate().find_map(|(i, node)| {
            let elem = node.as_element()?;
            if elem.id == Some(target_interned) {
                Some(NodeId(i as u32))
            } else {
                None
            }
        })
    }

    // -- text ----------------------------------------------------------

    /// Replace a text node's content
    pub fn set_text(&mut self, id: NodeId, content: impl Into<String>) -> DomResult<()> {
        match &mut self.node_mut(id)?.data {
            crate::NodeData::Text(t) => {
                t.content = content.into();
                Ok(())
            }
            _ => Err(DomError::NotAText),
        }
    }

    /// Concatenated text of a node and its descendants
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.get(id) else { return };
        if let Some(text) = node.as_text() {
            out.push_str(text);
            return;
        }
        for (child_id, _) in self.children(id) {
            self.collect_text(child_id, out);
        }
    }

    // -- serialization -------------------------------------------------

    /// Serialized markup of a node's children
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for (child_id, _) in self.children(id) {
            self.serialize_node(child_id, &mut out);
        }
        out
    }

    /// Serialized markup of a node itself
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.serialize_node(id, &mut out);
        out
    }

    fn serialize_node(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.get(id) else { return };

        if let Some(text) = node.as_text() {
            out.push_str(&escape_text(text));
            return;
        }
        let Some(elem) = node.as_element() else { return };

        let tag = self.interner.resolve(elem.name);
        out.push('<');
        out.push_str(tag);
        for attr in elem.attrs() {
            out.push(' ');
            out.push_str(self.interner.resolve(attr.name));
            out.push_str("=\"");
            out.push_str(&escape_attr(&attr.value));
            out.push('"');
        }
        out.push('>');

        if VOID_TAGS.contains(&tag) {
            return;
        }

        for (child_id, _) in self.children(id) {
            self.serialize_node(child_id, out);
        }
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;").replace('"', "&quot;")
}

/// Iterator over direct children
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_append() {
        let mut tree = DomTree::new();
        let ul = tree.create_element("ul");
        let li = tree.create_element("li");
        let text = tree.create_text("hello");

        tree.append_child(ul, li).unwrap();
        tree.append_child(li, text).unwrap();

        assert_eq!(tree.tag_name(ul).as_deref(), Some("UL"));
        assert_eq!(tree.children(ul).count(), 1);
        assert_eq!(tree.text_content(ul), "hello");
    }

    #[test]
    fn test_children_in_order() {
        let mut tree = DomTree::new();
        let ul = tree.create_element("ul");
        let a = tree.create_element("li");
        let b = tree.create_element("li");
        tree.append_child(ul, a).unwrap();
        tree.append_child(ul, b).unwrap();

        let ids: Vec<NodeId> = tree.children(ul).map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, b]);
        assert_eq!(tree.element_child_count(ul), 2);
    }

    #[test]
    fn test_append_to_text_fails() {
        let mut tree = DomTree::new();
        let text = tree.create_text("hi");
        let div = tree.create_element("div");

        assert_eq!(
            tree.append_child(text, div),
            Err(DomError::HierarchyRequest)
        );
    }

    #[test]
    fn test_append_ancestor_fails() {
        let mut tree = DomTree::new();
        let outer = tree.create_element("div");
        let inner = tree.create_element("div");
        tree.append_child(outer, inner).unwrap();

        assert_eq!(
            tree.append_child(inner, outer),
            Err(DomError::HierarchyRequest)
        );
        assert_eq!(
            tree.append_child(outer, outer),
            Err(DomError::HierarchyRequest)
        );
    }

    #[test]
    fn test_reappend_moves_node() {
        let mut tree = DomTree::new();
        let a = tree.create_element("div");
        let b = tree.create_element("div");
        let child = tree.create_element("span");

        tree.append_child(a, child).unwrap();
        tree.append_child(b, child).unwrap();

        assert_eq!(tree.children(a).count(), 0);
        assert_eq!(tree.children(b).count(), 1);
    }

    #[test]
    fn test_attributes() {
        let mut tree = DomTree::new();
        let el = tree.create_element("button");

        tree.set_attribute(el, "class", "btn").unwrap();
        assert_eq!(tree.get_attribute(el, "class"), Some("btn"));
        assert!(tree.has_attribute(el, "class"));

        tree.set_attribute(el, "class", "btn primary").unwrap();
        assert_eq!(tree.get_attribute(el, "class"), Some("btn primary"));

        assert!(tree.remove_attribute(el, "class").unwrap());
        assert!(!tree.has_attribute(el, "class"));
    }

    #[test]
    fn test_selector_creation() {
        let mut tree = DomTree::new();
        let el = tree.create_element_from_selector("button.btn.primary#go");

        assert_eq!(tree.tag_name(el).as_deref(), Some("BUTTON"));
        assert_eq!(tree.get_attribute(el, "id"), Some("go"));
        assert_eq!(tree.get_attribute(el, "class"), Some("btn primary"));
    }

    #[test]
    fn test_get_element_by_id() {
        let mut tree = DomTree::new();
        let root = tree.create_element("div");
        let el = tree.create_element_from_selector("span#here");
        tree.append_child(root, el).unwrap();

        assert_eq!(tree.get_element_by_id("here"), Some(el));
        assert_eq!(tree.get_element_by_id("missing"), None);
    }

    #[test]
    fn test_set_text() {
        let mut tree = DomTree::new();
        let text = tree.create_text("hello");
        tree.set_text(text, "world").unwrap();

        assert_eq!(tree.text_content(text), "world");

        let el = tree.create_element("div");
        assert_eq!(tree.set_text(el, "nope"), Err(DomError::NotAText));
    }

    #[test]
    fn test_inner_html() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let hello = tree.create_text("hello");
        let ul = tree.create_element("ul");
        tree.append_child(div, hello).unwrap();
        tree.append_child(div, ul).unwrap();
        for word in ["hello", "world"] {
            let li = tree.create_element("li");
            let text = tree.create_text(word);
            tree.append_child(li, text).unwrap();
            tree.append_child(ul, li).unwrap();
        }

        assert_eq!(
            tree.inner_html(div),
            "hello<ul><li>hello</li><li>world</li></ul>"
        );
    }

    #[test]
    fn test_outer_html_attrs_and_void() {
        let mut tree = DomTree::new();
        let img = tree.create_element("img");
        tree.set_attribute(img, "src", "hello").unwrap();

        assert_eq!(tree.outer_html(img), "<img src=\"hello\">");
    }

    #[test]
    fn test_text_escaped() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let text = tree.create_text("a < b & c");
        tree.append_child(div, text).unwrap();

        assert_eq!(tree.inner_html(div), "a &lt; b &amp; c");
    }
}
