//! trellis
//!
//! Declarative DOM tree builder with observable data bindings.
//!
//! Nested tag/attribute/child descriptors are realized into an arena DOM;
//! `${prop}` placeholders in text and attribute values are bound to a store
//! so the affected node is rewritten in place when a property changes.
//!
//! # Example
//! ```rust,ignore
//! use trellis::{build, Document};
//! use serde_json::json;
//!
//! let doc = Document::shared();
//! let button = build("button.btn", "${label}");
//! let root = button.call(&doc, json!({ "label": "hello" }))?;
//! // later: factory call with new data routes through the store
//! button.call(&doc, json!({ "label": "world" }))?;
//! ```

mod attrs;
mod binding;
mod builder;
mod error;
mod template;
mod text;

pub use attrs::{bind_attributes, AttrFn, AttrMap, AttrValue, BindOptions, StyleMap};
pub use binding::Bindings;
pub use builder::{build, Child, Children, Content, DataInput, Factory, Tag};
pub use error::BuildError;
pub use template::Template;
pub use text::{bind_text, TextBinding};

// Re-export sub-crates
pub use trellis_dom as dom;
pub use trellis_store as store;

// Re-export commonly used items
pub use trellis_dom::{dispatch, Document, Event, NodeId, SharedDocument};
pub use trellis_store::{SharedStore, Store, StoreData, Value};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
