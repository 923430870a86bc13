pub mod projector;
pub mod store;

pub use projector::{ProjectorConfig, ScanWindow};
pub use store::{StoreConfig, SyncMode};
