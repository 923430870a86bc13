//! Tally: deterministic state projector for lottery/auction contract events
//!
//! Consumes an ordered log of contract events and maintains a small set of
//! read-optimized entities:
//! - [`Transaction`]: the most recent mints, redeems and fee-pool transfers,
//!   capped by count
//! - [`Prize`]: one record per lottery/auction day, kept for a window of days
//!   behind the latest win of each kind
//! - [`User`]: per-address aggregates, never rotated
//! - [`Bid`]: append-only bid log
//! - [`ProtocolStats`]: protocol-wide totals and the transaction sequence counter
//!
//! Projection is a pure function of the event sequence: replaying the same
//! events into an empty store always yields byte-identical state.
//!
//! # Example
//!
//! ```no_run
//! use tally::prelude::*;
//!
//! let db = TallyDb::open("./tally-data")?;
//! let stats = db.replay(JsonLinesSource::open("events.jsonl")?)?;
//! println!("applied {} events", stats.applied);
//! # Ok::<(), tally::TallyError>(())
//! ```

pub mod accessors;
pub mod correlator;
pub mod db;
pub mod entities;
pub mod events;
pub mod memory;
pub mod prelude;
pub mod prizes;
pub mod query;
pub mod router;
pub mod source;
pub mod transactions;

pub use correlator::Correlator;
pub use db::{ReplayStats, TallyDb};
pub use entities::{
    Bid, Prize, PrizeKind, PrizeStatus, ProtocolStats, Transaction, TransactionKind, User,
    PROTOCOL_STATS_ID,
};
pub use events::{ContractEvent, LoggedEvent};
pub use memory::MemoryStore;
pub use prizes::PrizeProjector;
pub use router::{ApplyOutcome, EventRouter};
pub use source::JsonLinesSource;
pub use transactions::TransactionProjector;

pub use tally_core::{
    Entity, EntityRead, EntityReadExt, EntityStore, EntityStoreExt, EventMeta, EventPosition,
    ProjectorConfig, Result, ScanWindow, StoreConfig, SyncMode, TallyError,
};
