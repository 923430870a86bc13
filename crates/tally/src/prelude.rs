//! Tally Prelude
//!
//! Import this to get all commonly used types and traits:
//!
//! ```
//! use tally::prelude::*;
//! ```

// Core types
pub use crate::{ApplyOutcome, EventMeta, EventPosition, ReplayStats, Result, TallyError};

// Configs
pub use crate::{ProjectorConfig, ScanWindow, StoreConfig, SyncMode};

// Traits
pub use crate::{Entity, EntityRead, EntityReadExt, EntityStore, EntityStoreExt};

// Implementations
pub use crate::{EventRouter, JsonLinesSource, MemoryStore, TallyDb};

// Events
pub use crate::{ContractEvent, LoggedEvent};

// Entities
pub use crate::{
    Bid, Prize, PrizeKind, PrizeStatus, ProtocolStats, Transaction, TransactionKind, User,
};

// Re-export common external deps
pub use alloy_primitives::{Address, B256, U256};
pub use tracing;
