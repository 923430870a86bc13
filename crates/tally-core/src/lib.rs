//! Tally Core: traits and types for the tally state projector
//!
//! This crate defines the shared abstractions used by the projection engine
//! and its storage backends:
//! - Entity store traits: keyed load / overwrite / delete plus prefix and range scans
//! - Entity key encoding that keeps sequential numeric ids in sort order
//! - Chain metadata attached to every contract event
//! - Projector and store configuration
//! - Optional metrics hooks (`observe` feature)

pub mod config;
pub mod error;
pub mod observe;
pub mod traits;
pub mod types;

pub use config::{ProjectorConfig, ScanWindow, StoreConfig, SyncMode};
pub use error::{Result, TallyError};
pub use traits::{Entity, EntityRead, EntityReadExt, EntityStore, EntityStoreExt};
pub use types::{EntityKind, EventMeta, EventPosition};
