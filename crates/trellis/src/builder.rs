//! Tree Builder
//!
//! `build(tag, content)` returns a factory: a callable that realizes one DOM
//! subtree on its first call and routes new data into the existing store on
//! every call after that. The element is never rebuilt.

use std::cell::RefCell;
use std::rc::Rc;

use trellis_dom::{NodeId, SharedDocument};
use trellis_store::{SharedStore, Store, StoreData, Value};

use crate::{bind_attributes, bind_text, AttrMap, BindOptions, Bindings, BuildError};

/// Tag argument: a `tag.class#id` fragment or a pre-built element
pub enum Tag {
    Selector(String),
    Existing(NodeId),
}

impl From<&str> for Tag {
    fn from(value: &str) -> Self {
        Self::Selector(value.to_string())
    }
}

impl From<String> for Tag {
    fn from(value: String) -> Self {
        Self::Selector(value)
    }
}

impl From<NodeId> for Tag {
    fn from(value: NodeId) -> Self {
        Self::Existing(value)
    }
}

/// Child descriptor entry
pub enum Child {
    /// Literal or template string, bound as a text node
    Text(String),
    /// Nested factory; invoked with empty data and its element appended
    Factory(Factory),
    /// Already-built node, appended as-is
    Node(NodeId),
}

impl From<&str> for Child {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Child {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Factory> for Child {
    fn from(value: Factory) -> Self {
        Self::Factory(value)
    }
}

impl From<NodeId> for Child {
    fn from(value: NodeId) -> Self {
        Self::Node(value)
    }
}

/// Children descriptor: one text value or a list of entries
pub enum Children {
    Text(String),
    List(Vec<Child>),
}

impl From<&str> for Children {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Children {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<Child>> From<Vec<T>> for Children {
    fn from(value: Vec<T>) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}

/// What a descriptor carries besides its tag
#[derive(Default)]
pub struct Content {
    pub attrs: Option<AttrMap>,
    pub children: Option<Children>,
}

impl From<()> for Content {
    fn from(_: ()) -> Self {
        Self::default()
    }
}

impl From<&str> for Content {
    fn from(value: &str) -> Self {
        Self {
            attrs: None,
            children: Some(value.into()),
        }
    }
}

impl From<String> for Content {
    fn from(value: String) -> Self {
        Self {
            attrs: None,
            children: Some(value.into()),
        }
    }
}

impl<T: Into<Child>> From<Vec<T>> for Content {
    fn from(value: Vec<T>) -> Self {
        Self {
            attrs: None,
            children: Some(value.into()),
        }
    }
}

impl From<AttrMap> for Content {
    fn from(value: AttrMap) -> Self {
        Self {
            attrs: Some(value),
            children: None,
        }
    }
}

impl<C: Into<Children>> From<(AttrMap, C)> for Content {
    fn from((attrs, children): (AttrMap, C)) -> Self {
        Self {
            attrs: Some(attrs),
            children: Some(children.into()),
        }
    }
}

/// Data argument for a factory call
pub enum DataInput {
    /// No data; an empty store
    Empty,
    /// Initial data for a store the factory owns
    Data(StoreData),
    /// Caller-owned store to bind against
    Store(SharedStore),
}

impl From<()> for DataInput {
    fn from(_: ()) -> Self {
        Self::Empty
    }
}

impl From<StoreData> for DataInput {
    fn from(value: StoreData) -> Self {
        Self::Data(value)
    }
}

impl From<Value> for DataInput {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::Data(map),
            Value::Null => Self::Empty,
            other => {
                tracing::warn!("non-object data {:?} ignored", other);
                Self::Empty
            }
        }
    }
}

impl From<&SharedStore> for DataInput {
    fn from(value: &SharedStore) -> Self {
        Self::Store(value.clone())
    }
}

impl From<SharedStore> for DataInput {
    fn from(value: SharedStore) -> Self {
        Self::Store(value)
    }
}

/// Build a factory for one DOM subtree
pub fn build(tag: impl Into<Tag>, content: impl Into<Content>) -> Factory {
    Factory::new(tag.into(), content.into())
}

struct Built {
    root: NodeId,
    store: SharedStore,
    bindings: Bindings,
}

struct FactoryInner {
    tag: Tag,
    content: Content,
    options: BindOptions,
    built: Option<Built>,
}

/// The callable a descriptor compiles to.
///
/// Owns exactly one constructed subtree and at most one store. The first
/// call constructs and binds; subsequent calls forward data into the
/// existing store's `reset` and return the same root.
#[derive(Clone)]
pub struct Factory {
    inner: Rc<RefCell<FactoryInner>>,
}

impl Factory {
    fn new(tag: Tag, content: Content) -> Self {
        Self {
            inner: Rc::new(RefCell::new(FactoryInner {
                tag,
                content,
                options: BindOptions::default(),
                built: None,
            })),
        }
    }

    /// Configure attribute binding before the first call
    pub fn bind_options(self, options: BindOptions) -> Self {
        self.inner.borrow_mut().options = options;
        self
    }

    /// Realize the subtree, or route new data into it.
    ///
    /// Calling with `()` is always safe: templates over missing properties
    /// render empty.
    pub fn call(
        &self,
        doc: &SharedDocument,
        input: impl Into<DataInput>,
    ) -> Result<NodeId, BuildError> {
        let input = input.into();
        let mut inner = self.inner.borrow_mut();

        if let Some(built) = &inner.built {
            let root = built.root;
            let store = built.store.clone();
            // Reset runs listeners synchronously; release the factory borrow
            // first so a listener may re-enter it
            drop(inner);
            match input {
                DataInput::Data(data) => store.borrow_mut().reset(data),
                DataInput::Empty => store.borrow_mut().reset(StoreData::new()),
                DataInput::Store(_) => {
                    tracing::warn!("factory already bound to a store; new store ignored");
                }
            }
            return Ok(root);
        }

        let store = match input {
            DataInput::Store(store) => store,
            DataInput::Data(data) => Store::shared(data),
            DataInput::Empty => Store::shared(None),
        };

        let root = match &inner.tag {
            Tag::Selector(selector) => doc.borrow_mut().create_element_from_selector(selector),
            Tag::Existing(id) => {
                if doc.borrow().tree().get(*id).is_none() {
                    return Err(BuildError::ForeignNode);
                }
                *id
            }
        };

        let mut bindings = Bindings::new();
        if let Some(attrs) = &inner.content.attrs {
            bindings.merge(bind_attributes(doc, root, attrs, &store, inner.options)?);
        }
        match &inner.content.children {
            Some(Children::Text(text)) => {
                bindings.merge(bind_text(doc, root, text, &store)?.bindings);
            }
            Some(Children::List(children)) => {
                for child in children {
                    match child {
                        Child::Text(text) => {
                            bindings.merge(bind_text(doc, root, text, &store)?.bindings);
                        }
                        Child::Factory(factory) => {
                            let el = factory.call(doc, ())?;
                            doc.borrow_mut().append_child(root, el)?;
                        }
                        Child::Node(id) => {
                            doc.borrow_mut().append_child(root, *id)?;
                        }
                    }
                }
            }
            None => {}
        }

        tracing::debug!(
            "built subtree rooted at {:?}, {} bindings",
            root,
            bindings.len()
        );
        inner.built = Some(Built {
            root,
            store,
            bindings,
        });
        Ok(root)
    }

    /// Root element, once built
    pub fn root(&self) -> Option<NodeId> {
        self.inner.borrow().built.as_ref().map(|b| b.root)
    }

    /// The bound store, once built
    pub fn store(&self) -> Option<SharedStore> {
        self.inner.borrow().built.as_ref().map(|b| b.store.clone())
    }

    /// Whether the subtree has been realized
    pub fn is_built(&self) -> bool {
        self.inner.borrow().built.is_some()
    }

    /// Release every store subscription this factory's bindings registered.
    ///
    /// The built element stays in the document but stops updating.
    /// Idempotent; returns how many subscriptions were released.
    pub fn dispose(&self) -> usize {
        let mut inner = self.inner.borrow_mut();
        match &mut inner.built {
            Some(built) => {
                let released = built.bindings.release(&built.store);
                if released > 0 {
                    tracing::debug!("released {} bindings", released);
                }
                released
            }
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AttrValue, StyleMap};
    use serde_json::json;
    use std::cell::Cell;
    use trellis_dom::{dispatch, Document};
    use trellis_store::change_event;

    fn data(value: Value) -> StoreData {
        match value {
            Value::Object(map) => map,
            _ => panic!("test data must be an object"),
        }
    }

    #[test]
    fn test_build_returns_unbuilt_factory() {
        let factory = build("button", ());

        assert!(!factory.is_built());
        assert_eq!(factory.root(), None);
    }

    #[test]
    fn test_creates_element_with_tag() {
        let doc = Document::shared();
        let el = build("button", ()).call(&doc, ()).unwrap();

        assert_eq!(doc.borrow().tag_name(el).as_deref(), Some("BUTTON"));
    }

    #[test]
    fn test_sets_inner_text() {
        let doc = Document::shared();
        let el = build("button", "hello").call(&doc, ()).unwrap();

        assert_eq!(doc.borrow().text_content(el), "hello");
        assert_eq!(doc.borrow().inner_html(el), "hello");
    }

    #[test]
    fn test_selector_tag() {
        let doc = Document::shared();
        let el = build("button.btn.primary#go", ()).call(&doc, ()).unwrap();

        let doc = doc.borrow();
        assert_eq!(doc.tag_name(el).as_deref(), Some("BUTTON"));
        assert_eq!(doc.get_attribute(el, "class"), Some("btn primary"));
        assert_eq!(doc.get_attribute(el, "id"), Some("go"));
    }

    #[test]
    fn test_appends_one_child() {
        let doc = Document::shared();
        let ul = build("ul", vec![build("li", "hello")])
            .call(&doc, ())
            .unwrap();

        let doc = doc.borrow();
        let (li, _) = doc.tree().children(ul).next().unwrap();
        assert_eq!(doc.tag_name(li).as_deref(), Some("LI"));
        assert_eq!(doc.text_content(li), "hello");
    }

    #[test]
    fn test_appends_multiple_children_in_order() {
        let doc = Document::shared();
        let ul = build("ul", vec![build("li", "hello"), build("li", "world")])
            .call(&doc, ())
            .unwrap();

        let doc = doc.borrow();
        assert_eq!(doc.tree().element_child_count(ul), 2);
        let texts: Vec<String> = doc
            .tree()
            .children(ul)
            .map(|(id, _)| doc.text_content(id))
            .collect();
        assert_eq!(texts, vec!["hello", "world"]);
    }

    #[test]
    fn test_string_child_in_list() {
        let doc = Document::shared();
        let ul = build("ul", vec!["hello"]).call(&doc, ()).unwrap();

        assert_eq!(doc.borrow().inner_html(ul), "hello");
    }

    #[test]
    fn test_mixed_text_and_element_children() {
        let doc = Document::shared();
        let div = build(
            "div",
            vec![
                Child::from("hello"),
                Child::from(build("ul", vec![build("li", "hello"), build("li", "world")])),
            ],
        )
        .call(&doc, ())
        .unwrap();

        assert_eq!(
            doc.borrow().inner_html(div),
            "hello<ul><li>hello</li><li>world</li></ul>"
        );
    }

    #[test]
    fn test_attribute_map() {
        let doc = Document::shared();
        let el = build("button", AttrMap::new().with("class", "btn"))
            .call(&doc, ())
            .unwrap();

        assert_eq!(doc.borrow().get_attribute(el, "class"), Some("btn"));
    }

    #[test]
    fn test_attributes_and_element_children() {
        let doc = Document::shared();
        let el = build(
            "button",
            (
                AttrMap::new().with("class", "btn"),
                vec![build("img", AttrMap::new().with("src", "hello"))],
            ),
        )
        .call(&doc, ())
        .unwrap();

        let doc = doc.borrow();
        let (img, _) = doc.tree().children(el).next().unwrap();
        assert_eq!(doc.tag_name(img).as_deref(), Some("IMG"));
        assert_eq!(doc.get_attribute(img, "src"), Some("hello"));
    }

    #[test]
    fn test_attributes_and_text_child() {
        let doc = Document::shared();
        let el = build("button", (AttrMap::new().with("class", "btn"), "hello"))
            .call(&doc, ())
            .unwrap();

        assert_eq!(doc.borrow().text_content(el), "hello");
        assert_eq!(doc.borrow().get_attribute(el, "class"), Some("btn"));
    }

    #[test]
    fn test_prebuilt_node_child() {
        let doc = Document::shared();
        let img = doc.borrow_mut().create_element("img");
        let el = build("figure", vec![Child::from(img)]).call(&doc, ()).unwrap();

        let doc = doc.borrow();
        let (child, _) = doc.tree().children(el).next().unwrap();
        assert_eq!(child, img);
    }

    #[test]
    fn test_existing_element_as_tag() {
        let doc = Document::shared();
        let el = doc.borrow_mut().create_element("section");
        let factory = build(el, "hello");

        assert_eq!(factory.call(&doc, ()).unwrap(), el);
        assert_eq!(doc.borrow().text_content(el), "hello");
    }

    #[test]
    fn test_foreign_node_rejected() {
        let doc = Document::shared();
        let factory = build(NodeId::NONE, ());

        assert_eq!(factory.call(&doc, ()), Err(BuildError::ForeignNode));
    }

    #[test]
    fn test_template_text_substitution() {
        let doc = Document::shared();
        let el = build("button", "${label}")
            .call(&doc, json!({ "label": "hello" }))
            .unwrap();

        assert_eq!(doc.borrow().text_content(el), "hello");
    }

    #[test]
    fn test_template_attribute_substitution() {
        let doc = Document::shared();
        let el = build(
            "button",
            (AttrMap::new().with("class", "btn ${label}"), "${label}"),
        )
        .call(&doc, json!({ "label": "hello" }))
        .unwrap();

        let doc = doc.borrow();
        assert_eq!(doc.get_attribute(el, "class"), Some("btn hello"));
        assert_eq!(doc.text_content(el), "hello");
    }

    #[test]
    fn test_no_data_is_safe() {
        let doc = Document::shared();
        let el = build("button", "${label}").call(&doc, ()).unwrap();

        assert_eq!(doc.borrow().text_content(el), "");
    }

    #[test]
    fn test_text_updates_when_store_changes() {
        let doc = Document::shared();
        let store = Store::shared(data(json!({ "label": "hello" })));
        let el = build("button", "${label}").call(&doc, &store).unwrap();
        assert_eq!(doc.borrow().text_content(el), "hello");

        store.borrow_mut().set("label", json!("world"));

        assert_eq!(doc.borrow().text_content(el), "world");
    }

    #[test]
    fn test_attribute_updates_when_store_changes() {
        let doc = Document::shared();
        let store = Store::shared(data(json!({ "label": "hello" })));
        let el = build("button", AttrMap::new().with("class", "btn ${label}"))
            .call(&doc, &store)
            .unwrap();
        assert_eq!(doc.borrow().get_attribute(el, "class"), Some("btn hello"));

        store.borrow_mut().set("label", json!("world"));

        assert_eq!(doc.borrow().get_attribute(el, "class"), Some("btn world"));
    }

    #[test]
    fn test_element_identity_preserved_across_updates() {
        let doc = Document::shared();
        let factory = build("button", "${label}");
        let first = factory.call(&doc, json!({ "label": "hello" })).unwrap();

        factory.store().unwrap().borrow_mut().set("label", json!("world"));
        let second = factory.call(&doc, json!({ "label": "again" })).unwrap();

        assert_eq!(first, second);
        assert_eq!(doc.borrow().text_content(first), "again");
    }

    #[test]
    fn test_second_call_resets_instead_of_rebuilding() {
        let doc = Document::shared();
        let factory = build("button", "${label}");

        factory.call(&doc, json!({ "label": "hello" })).unwrap();
        let nodes_after_first = doc.borrow().tree().len();
        factory.call(&doc, json!({ "label": "world" })).unwrap();

        assert_eq!(doc.borrow().tree().len(), nodes_after_first);
        assert_eq!(
            doc.borrow().text_content(factory.root().unwrap()),
            "world"
        );
    }

    #[test]
    fn test_second_call_without_data_clears_bindings_output() {
        let doc = Document::shared();
        let factory = build("button", "v=${v}");

        let el = factory.call(&doc, json!({ "v": 1 })).unwrap();
        assert_eq!(doc.borrow().text_content(el), "v=1");

        factory.call(&doc, ()).unwrap();
        assert_eq!(doc.borrow().text_content(el), "v=");
    }

    #[test]
    fn test_second_call_ignores_new_store() {
        let doc = Document::shared();
        let factory = build("button", "${label}");
        let original = Store::shared(data(json!({ "label": "one" })));

        factory.call(&doc, &original).unwrap();
        let other = Store::shared(data(json!({ "label": "two" })));
        let el = factory.call(&doc, &other).unwrap();

        assert_eq!(doc.borrow().text_content(el), "one");
        assert!(Rc::ptr_eq(&factory.store().unwrap(), &original));
    }

    #[test]
    fn test_nested_factories_get_their_own_empty_store() {
        let doc = Document::shared();
        let ul = build("ul", vec![build("li", "${label}")])
            .call(&doc, json!({ "label": "outer" }))
            .unwrap();

        // The nested factory was invoked without data, so its template
        // renders against an empty store
        assert_eq!(doc.borrow().inner_html(ul), "<li></li>");
    }

    #[test]
    fn test_function_attribute_gets_store_data() {
        let doc = Document::shared();
        let el = build(
            "h1",
            AttrMap::new().with(
                "class",
                AttrValue::call(|data| data.get("type").cloned().unwrap_or(Value::Null)),
            ),
        )
        .call(&doc, json!({ "type": "title" }))
        .unwrap();

        assert_eq!(doc.borrow().get_attribute(el, "class"), Some("title"));
    }

    #[test]
    fn test_click_handler_through_build() {
        let doc = Document::shared();
        let clicked = Rc::new(Cell::new(false));

        let hit = clicked.clone();
        let el = build(
            "button",
            AttrMap::new().with("onclick", AttrValue::handler(move |_| hit.set(true))),
        )
        .call(&doc, ())
        .unwrap();

        dispatch(&doc, el, "click");
        assert!(clicked.get());
    }

    #[test]
    fn test_styles_from_map() {
        let doc = Document::shared();
        let el = build(
            "button",
            AttrMap::new().with(
                "style",
                StyleMap::new()
                    .with("background", "red")
                    .with("width", "100px"),
            ),
        )
        .call(&doc, ())
        .unwrap();

        assert_eq!(
            doc.borrow().get_attribute(el, "style"),
            Some("background:red;width:100px;")
        );
    }

    #[test]
    fn test_dispose_stops_updates_but_keeps_element() {
        let doc = Document::shared();
        let store = Store::shared(data(json!({ "label": "hello" })));
        let factory = build("button", "${label}");
        let el = factory.call(&doc, &store).unwrap();

        assert_eq!(factory.dispose(), 1);
        store.borrow_mut().set("label", json!("world"));

        assert_eq!(doc.borrow().text_content(el), "hello");
        assert_eq!(store.borrow().listener_count(&change_event("label")), 0);
        // Idempotent
        assert_eq!(factory.dispose(), 0);
    }

    #[test]
    fn test_handler_can_mutate_store_through_dispatch() {
        let doc = Document::shared();
        let store = Store::shared(data(json!({ "count": 0 })));

        let handler_store = store.clone();
        let el = build(
            "button",
            AttrMap::new().with(
                "onclick",
                AttrValue::handler(move |_| {
                    let next = handler_store
                        .borrow()
                        .get("count")
                        .and_then(Value::as_i64)
                        .unwrap_or(0)
                        + 1;
                    handler_store.borrow_mut().set("count", json!(next));
                }),
            ),
        )
        .call(&doc, &store)
        .unwrap();

        dispatch(&doc, el, "click");
        dispatch(&doc, el, "click");

        assert_eq!(store.borrow().get("count"), Some(&json!(2)));
    }
}
