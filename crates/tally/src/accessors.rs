//! Get-or-create access to the aggregate records.
//!
//! Every handler loads the aggregates it touches through these functions,
//! mutates them in memory and saves them back before returning.

use crate::entities::{ProtocolStats, User, PROTOCOL_STATS_ID};
use alloy_primitives::Address;
use tally_core::{EntityRead, EntityReadExt, EntityStore, EntityStoreExt, EventMeta, Result};

/// Load the protocol singleton, or a zeroed one if none was saved yet
pub fn protocol_stats<S: EntityRead + ?Sized>(store: &S) -> Result<ProtocolStats> {
    Ok(store
        .load::<ProtocolStats>(PROTOCOL_STATS_ID)?
        .unwrap_or_default())
}

/// Load the user for `address`, creating it if this is its first event
///
/// A newly created user is counted in `stats` but not saved; the caller
/// saves it with the rest of its changes.
pub fn user<S: EntityRead + ?Sized>(
    store: &S,
    stats: &mut ProtocolStats,
    address: Address,
    meta: &EventMeta,
) -> Result<User> {
    match store.load::<User>(&User::id_for(address))? {
        Some(user) => Ok(user),
        None => {
            stats.user_count += 1;
            tracing::debug!(user = %User::id_for(address), "New user");
            Ok(User::new(address, meta.block_number))
        }
    }
}

/// Save the protocol singleton
pub fn save_stats<S: EntityStore + ?Sized>(store: &mut S, stats: &ProtocolStats) -> Result<()> {
    store.save(stats)
}
