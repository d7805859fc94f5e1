//! trellis DOM - Document Object Model
//!
//! Arena-based DOM tree the builder constructs into. The document is the
//! injected construction capability: everything works without a browser.

mod document;
mod error;
mod events;
mod interner;
mod node;
mod selector;
mod tree;

pub use document::{Document, SharedDocument};
pub use error::{DomError, DomResult};
pub use events::{dispatch, Event, EventHandler, HandlerRegistry};
pub use interner::{InternedString, StringInterner};
pub use node::{Attribute, ElementData, Node, NodeData, TextData};
pub use selector::SelectorFragment;
pub use tree::{Children, DomTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this ID refers to a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }
}
