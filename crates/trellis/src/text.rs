//! Text Binder
//!
//! Appends one text node rendered from a template, then keeps it current by
//! subscribing to the change event of every referenced property. Static
//! strings register no subscription at all.

use std::rc::Rc;

use trellis_dom::{NodeId, SharedDocument};
use trellis_store::{change_event, SharedStore, StoreData};

use crate::{Bindings, BuildError, Template};

/// A bound text node and the subscriptions keeping it current
pub struct TextBinding {
    /// The created text node
    pub node: NodeId,
    /// Store subscriptions registered for it
    pub bindings: Bindings,
}

/// Append a text node under `parent` and bind its template placeholders.
///
/// The node is rendered once against the store's current data; afterwards
/// each referenced property's change event rewrites the node in place. The
/// subscriptions live until released or the store is dropped.
pub fn bind_text(
    doc: &SharedDocument,
    parent: NodeId,
    text: &str,
    store: &SharedStore,
) -> Result<TextBinding, BuildError> {
    let template = Template::parse(text);

    let rendered = template.render(store.borrow().data());
    let node = {
        let mut doc = doc.borrow_mut();
        let node = doc.create_text_node(rendered);
        doc.append_child(parent, node)?;
        node
    };

    let mut bindings = Bindings::new();
    if template.is_static() {
        return Ok(TextBinding { node, bindings });
    }

    let template = Rc::new(template);
    for prop in template.props() {
        let event = change_event(prop);
        let doc = doc.clone();
        let template = template.clone();
        let id = store.borrow_mut().on(
            &event,
            Rc::new(move |data: &StoreData| {
                if let Err(err) = doc.borrow_mut().set_text(node, template.render(data)) {
                    tracing::warn!("text binding lost node {:?}: {}", node, err);
                }
            }),
        );
        bindings.push(event, id);
    }

    Ok(TextBinding { node, bindings })
}
