//! LMDB-backed entity store
//!
//! Provides the persistent key-value store the projector writes into.
//!
//! Key features:
//! - Keyed load / overwrite / delete over a single `state` database
//! - Ordered range and prefix scans (entity keys sort numerically by id)
//! - Replay cursor kept in a separate `meta` database, committed in the
//!   same transaction as the projection it describes
//! - Read-only transactions for the query side

pub mod keys;
pub mod scan;
pub mod store;
pub mod txn;

pub use store::LmdbEntityStore;
pub use txn::{CommitInfo, LmdbReadTxn, LmdbWriteTxn};
