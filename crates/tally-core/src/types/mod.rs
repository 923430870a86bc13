pub mod keys;
pub mod meta;

pub use keys::EntityKind;
pub use meta::{EventMeta, EventPosition};
