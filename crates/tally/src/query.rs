//! Read helpers for the query side
//!
//! Thin typed views over any [`EntityRead`]; a `MemoryStore` or an LMDB
//! read transaction both work.

use crate::entities::{Bid, Prize, PrizeKind, ProtocolStats, Transaction, User};
use alloy_primitives::Address;
use tally_core::{EntityRead, EntityReadExt, Result};

pub fn stats<S: EntityRead + ?Sized>(store: &S) -> Result<ProtocolStats> {
    crate::accessors::protocol_stats(store)
}

/// Live transactions, newest first
pub fn recent_transactions<S: EntityRead + ?Sized>(store: &S) -> Result<Vec<Transaction>> {
    let mut transactions = store.scan::<Transaction>()?;
    transactions.reverse();
    Ok(transactions)
}

/// Live prizes of one kind, by ascending day
pub fn prizes<S: EntityRead + ?Sized>(store: &S, kind: PrizeKind) -> Result<Vec<Prize>> {
    let mut prizes: Vec<Prize> = store
        .scan::<Prize>()?
        .into_iter()
        .filter(|prize| prize.kind == kind)
        .collect();
    prizes.sort_by_key(|prize| prize.day);
    Ok(prizes)
}

pub fn user<S: EntityRead + ?Sized>(store: &S, address: Address) -> Result<Option<User>> {
    store.load(&User::id_for(address))
}

/// Bids placed on one day's auction, in key order
pub fn bids_for_day<S: EntityRead + ?Sized>(store: &S, day: u64) -> Result<Vec<Bid>> {
    Ok(store
        .scan::<Bid>()?
        .into_iter()
        .filter(|bid| bid.day == day)
        .collect())
}
