//! Attribute Binder
//!
//! Applies an ordered attribute map to an element. String values are
//! template-bound like text nodes; style maps flatten to a CSS string;
//! function values run once at bind time; `on*` handler values are wired as
//! event handlers.

use std::rc::Rc;

use trellis_dom::{Event, EventHandler, NodeId, SharedDocument};
use trellis_store::{change_event, display_value, SharedStore, StoreData, Value};

use crate::{Bindings, BuildError, Template};

/// Function attribute: runs once against the store's data at bind time
pub type AttrFn = Box<dyn Fn(&StoreData) -> Value>;

/// One attribute value in a descriptor
pub enum AttrValue {
    /// Template string, bound to the store like a text node
    Text(String),
    /// Style map, flattened to a CSS string
    Style(StyleMap),
    /// Function called once with the store's data; result applied statically
    Call(AttrFn),
    /// Event handler, wired under an `on*` key
    Handler(EventHandler),
}

impl AttrValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn call(f: impl Fn(&StoreData) -> Value + 'static) -> Self {
        Self::Call(Box::new(f))
    }

    pub fn handler(f: impl Fn(&mut Event) + 'static) -> Self {
        Self::Handler(Rc::new(f))
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<StyleMap> for AttrValue {
    fn from(value: StyleMap) -> Self {
        Self::Style(value)
    }
}

/// Insertion-ordered style declarations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleMap {
    entries: Vec<(String, String)>,
}

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a declaration, overwriting in place when the property repeats
    pub fn set(&mut self, prop: &str, value: impl Into<String>) {
        let value = value.into();
        for entry in self.entries.iter_mut() {
            if entry.0 == prop {
                entry.1 = value;
                return;
            }
        }
        self.entries.push((prop.to_string(), value));
    }

    /// Chainable `set`
    pub fn with(mut self, prop: &str, value: impl Into<String>) -> Self {
        self.set(prop, value);
        self
    }

    /// Build from a JSON object, in the object's order
    pub fn from_object(map: &serde_json::Map<String, Value>) -> Self {
        let mut style = Self::new();
        for (prop, value) in map {
            style.set(prop, display_value(value));
        }
        style
    }

    /// Flatten to `prop:value;` pairs in declaration order
    pub fn css_text(&self) -> String {
        let mut out = String::new();
        for (prop, value) in &self.entries {
            out.push_str(prop);
            out.push(':');
            out.push_str(value);
            out.push(';');
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Insertion-ordered attribute descriptor
#[derive(Default)]
pub struct AttrMap {
    entries: Vec<(String, AttrValue)>,
}

impl AttrMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute, overwriting in place when the key repeats
    pub fn set(&mut self, key: &str, value: impl Into<AttrValue>) {
        let value = value.into();
        for entry in self.entries.iter_mut() {
            if entry.0 == key {
                entry.1 = value;
                return;
            }
        }
        self.entries.push((key.to_string(), value));
    }

    /// Chainable `set`
    pub fn with(mut self, key: &str, value: impl Into<AttrValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Attribute binder configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct BindOptions {
    /// Keep processing attributes after wiring an `on*` handler.
    ///
    /// Off by default: wiring a handler stops the pass, which is the
    /// binder's long-standing behavior and what existing descriptors expect.
    pub continue_after_handler: bool,
}

/// Apply an attribute map to an element, in map order.
///
/// Returns the subscriptions registered for template-bound values.
pub fn bind_attributes(
    doc: &SharedDocument,
    element: NodeId,
    attrs: &AttrMap,
    store: &SharedStore,
    options: BindOptions,
) -> Result<Bindings, BuildError> {
    let mut bindings = Bindings::new();

    for (key, value) in attrs.iter() {
        match value {
            AttrValue::Handler(handler) => {
                let event = key.strip_prefix("on").filter(|e| !e.is_empty());
                let Some(event) = event else {
                    tracing::warn!("handler under non-event attribute {:?} ignored", key);
                    continue;
                };
                doc.borrow_mut()
                    .set_event_handler(element, event, handler.clone());
                if !options.continue_after_handler {
                    // Wiring a handler ends the pass; remaining attributes
                    // are not applied
                    tracing::debug!("handler {:?} wired, attribute pass stopped", key);
                    break;
                }
            }
            AttrValue::Call(f) => {
                let result = {
                    let store = store.borrow();
                    f(store.data())
                };
                let text = match (&result, key) {
                    (Value::Object(map), "style") => StyleMap::from_object(map).css_text(),
                    _ => display_value(&result),
                };
                doc.borrow_mut().set_attribute(element, key, &text)?;
            }
            AttrValue::Style(style) => {
                doc.borrow_mut()
                    .set_attribute(element, key, &style.css_text())?;
            }
            AttrValue::Text(text) => {
                bindings.merge(bind_attribute_template(doc, element, key, text, store)?);
            }
        }
    }

    Ok(bindings)
}

/// Bind one template-valued attribute: set the rendered value now, re-render
/// on every referenced property's change event.
fn bind_attribute_template(
    doc: &SharedDocument,
    element: NodeId,
    key: &str,
    text: &str,
    store: &SharedStore,
) -> Result<Bindings, BuildError> {
    let template = Template::parse(text);

    let rendered = template.render(store.borrow().data());
    doc.borrow_mut().set_attribute(element, key, &rendered)?;

    let mut bindings = Bindings::new();
    if template.is_static() {
        return Ok(bindings);
    }

    let template = Rc::new(template);
    for prop in template.props() {
        let event = change_event(prop);
        let doc = doc.clone();
        let template = template.clone();
        let key = key.to_string();
        let id = store.borrow_mut().on(
            &event,
            Rc::new(move |data: &StoreData| {
                let rendered = template.render(data);
                if let Err(err) = doc.borrow_mut().set_attribute(element, &key, &rendered) {
                    tracing::warn!("attribute binding lost element {:?}: {}", element, err);
                }
            }),
        );
        bindings.push(event, id);
    }

    Ok(bindings)
}
