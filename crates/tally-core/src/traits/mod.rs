pub mod store;

pub use store::{Entity, EntityRead, EntityReadExt, EntityStore, EntityStoreExt};
