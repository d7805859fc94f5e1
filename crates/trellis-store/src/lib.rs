//! trellis store - Observable data
//!
//! A flat property map with change events. `set` mutates one property and
//! emits `"change <prop>"`; `reset` swaps the whole map and re-fires change
//! events for every property that existed before or after the swap, so
//! bindings refresh across a full data replacement.

mod emitter;
mod store;
mod value;

pub use emitter::{EventEmitter, Listener, ListenerId};
pub use store::{change_event, SharedStore, Store};
pub use value::{display_property, display_value, StoreData, Value};
