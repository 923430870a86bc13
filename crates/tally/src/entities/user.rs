use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use tally_core::{Entity, EntityKind};

/// Per-address aggregates
///
/// Lazily created on the first event naming the address. Users are never
/// rotated; per-user history stays queryable indefinitely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub address: Address,
    pub total_minted: U256,
    pub total_redeemed: U256,
    pub transaction_count: u64,
    pub lottery_wins: u64,
    pub lottery_winnings: U256,
    pub auction_wins: u64,
    pub auction_winnings: U256,
    pub auction_spent: U256,
    pub bid_count: u64,
    pub first_seen_block: u64,
}

impl User {
    pub fn new(address: Address, first_seen_block: u64) -> Self {
        Self {
            address,
            total_minted: U256::ZERO,
            total_redeemed: U256::ZERO,
            transaction_count: 0,
            lottery_wins: 0,
            lottery_winnings: U256::ZERO,
            auction_wins: 0,
            auction_winnings: U256::ZERO,
            auction_spent: U256::ZERO,
            bid_count: 0,
            first_seen_block,
        }
    }

    /// Store id for an address: lower-case, 0x-prefixed hex
    pub fn id_for(address: Address) -> String {
        format!("{:#x}", address)
    }
}

impl Entity for User {
    const KIND: EntityKind = EntityKind::User;

    fn id(&self) -> String {
        Self::id_for(self.address)
    }
}
